use chrono::{Duration, TimeZone, Utc};
use shared::domain::{Draft, Genre};
use storage::{Clock, ManualClock, RecordStore, SequentialIds};

#[test]
fn store_tracks_a_viewing_session() {
    let clock = ManualClock::new(Utc.with_ymd_and_hms(2024, 2, 10, 20, 0, 0).unwrap());
    let mut store = RecordStore::new(Box::new(SequentialIds::default()), Box::new(clock.clone()));

    let mut draft = Draft::empty(clock.now());
    draft.title = "Dune".to_string();
    draft.genre = Genre::SciFi;
    draft.rating = 9;
    let dune = store.add(&draft).expect("dune");

    clock.advance(Duration::days(1));
    draft.title = "Saw".to_string();
    draft.genre = Genre::Horror;
    draft.rating = 6;
    let saw = store.add(&draft).expect("saw");

    let titles: Vec<_> = store.all().iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, ["Saw", "Dune"]);
    assert_eq!(dune.as_str(), "movie-1");
    assert_eq!(saw.as_str(), "movie-2");

    assert!(store.remove(&dune));
    assert_eq!(store.len(), 1);
    assert_eq!(store.revision(), 3);
}
