//! Filter + sort projection over the record store.

use std::cmp::Reverse;

use shared::{
    domain::MovieRecord,
    protocol::{GenreFilter, SortOrder},
};

/// Records to display, in display order. Never mutates `records`; ties keep store order.
pub fn project<'a>(
    records: &'a [MovieRecord],
    genre_filter: GenreFilter,
    sort_order: SortOrder,
) -> Vec<&'a MovieRecord> {
    let mut view: Vec<&MovieRecord> = records
        .iter()
        .filter(|record| genre_filter.matches(record.genre))
        .collect();

    // `sort_by_key` is stable, which the tie rule depends on.
    match sort_order {
        SortOrder::RatingHigh => view.sort_by_key(|record| Reverse(record.rating)),
        SortOrder::RatingLow => view.sort_by_key(|record| record.rating),
        SortOrder::Newest => view.sort_by_key(|record| Reverse(record.date)),
        SortOrder::Oldest => view.sort_by_key(|record| record.date),
        SortOrder::Unordered => {}
    }

    view
}

#[cfg(test)]
#[path = "tests/projection_tests.rs"]
mod tests;
