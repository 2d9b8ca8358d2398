//! Per-record display hints derived on demand.

use shared::{
    domain::{MovieRecord, Timestamp},
    protocol::RecordCard,
};

pub const DEFAULT_PREVIEW_CHARS: usize = 100;
const PREVIEW_ELLIPSIS: &str = "...";

pub fn review_preview(review: &str, max_chars: usize) -> String {
    match review.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}{PREVIEW_ELLIPSIS}", &review[..cut]),
        None => review.to_string(),
    }
}

pub fn date_label(date: Timestamp) -> String {
    date.format("%d.%m.%Y, %H:%M").to_string()
}

pub fn record_card(record: &MovieRecord, preview_chars: usize) -> RecordCard {
    RecordCard {
        record: record.clone(),
        tier: record.rating_tier(),
        review_preview: review_preview(&record.review, preview_chars),
        date_label: date_label(record.date),
    }
}
