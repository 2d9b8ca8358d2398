use super::*;

use chrono::TimeZone;
use shared::{domain::Genre, error::ValidationError};

fn start() -> Timestamp {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
}

fn store_with_clock() -> (RecordStore, ManualClock) {
    let clock = ManualClock::new(start());
    let store = RecordStore::new(Box::new(SequentialIds::default()), Box::new(clock.clone()));
    (store, clock)
}

fn draft(title: &str, genre: Genre, rating: u8) -> Draft {
    let mut draft = Draft::empty(start());
    draft.title = title.to_string();
    draft.genre = genre;
    draft.rating = rating;
    draft
}

struct RepeatingIds {
    issued: Vec<&'static str>,
}

impl IdGenerator for RepeatingIds {
    fn next_id(&mut self) -> MovieId {
        MovieId::from(self.issued.remove(0))
    }
}

#[test]
fn add_prepends_and_stamps_creation_time() {
    let (mut store, clock) = store_with_clock();
    let first = store.add(&draft("Alien", Genre::Horror, 8)).expect("first");
    clock.advance(Duration::minutes(5));
    let second = store.add(&draft("Heat", Genre::Action, 7)).expect("second");

    let all = store.all();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].id, second);
    assert_eq!(all[1].id, first);
    assert_eq!(all[1].date, start());
    assert_eq!(all[0].date, start() + Duration::minutes(5));
}

#[test]
fn add_ignores_draft_date() {
    let (mut store, _clock) = store_with_clock();
    let mut pending = draft("Alien", Genre::Horror, 8);
    pending.date = Utc.with_ymd_and_hms(1999, 1, 1, 0, 0, 0).unwrap();
    let id = store.add(&pending).expect("add");
    assert_eq!(store.get(&id).expect("stored").date, start());
}

#[test]
fn add_rejects_blank_title_without_mutating() {
    let (mut store, _clock) = store_with_clock();
    let rx = store.subscribe();
    let err = store.add(&draft("   ", Genre::Drama, 5)).expect_err("blank title");
    assert_eq!(err, LogError::Validation(ValidationError::EmptyTitle));
    assert!(store.is_empty());
    assert_eq!(store.revision(), 0);
    assert!(rx.try_recv().is_err());
}

#[test]
fn add_skips_ids_already_in_use() {
    let clock = ManualClock::new(start());
    let mut store = RecordStore::new(
        Box::new(RepeatingIds {
            issued: vec!["dup", "dup", "fresh"],
        }),
        Box::new(clock),
    );
    let a = store.add(&draft("One", Genre::Drama, 5)).expect("one");
    let b = store.add(&draft("Two", Genre::Drama, 5)).expect("two");
    assert_eq!(a.as_str(), "dup");
    assert_eq!(b.as_str(), "fresh");
}

struct StuckIds;

impl IdGenerator for StuckIds {
    fn next_id(&mut self) -> MovieId {
        MovieId::from("same")
    }
}

#[test]
fn add_gives_up_when_generator_only_repeats() {
    let mut store = RecordStore::new(Box::new(StuckIds), Box::new(ManualClock::new(start())));
    let rx = store.subscribe();
    store.add(&draft("One", Genre::Drama, 5)).expect("first id is free");

    let err = store
        .add(&draft("Two", Genre::Drama, 5))
        .expect_err("every draw collides");
    assert_eq!(
        err,
        LogError::IdCollision {
            id: MovieId::from("same")
        }
    );
    assert_eq!(store.len(), 1);
    assert_eq!(store.revision(), 1);
    assert_eq!(rx.try_iter().count(), 1);
}

#[test]
fn update_keeps_id_date_and_position() {
    let (mut store, clock) = store_with_clock();
    let older = store.add(&draft("Alien", Genre::Horror, 8)).expect("older");
    clock.advance(Duration::hours(1));
    let newer = store.add(&draft("Heat", Genre::Action, 7)).expect("newer");
    clock.advance(Duration::hours(1));

    let mut edit = draft("Aliens", Genre::Action, 9);
    edit.review = "Better sequel".to_string();
    edit.date = start() + Duration::days(30);
    store.update(&older, &edit).expect("update");

    let all = store.all();
    assert_eq!(all[0].id, newer);
    assert_eq!(all[1].id, older);
    assert_eq!(all[1].title, "Aliens");
    assert_eq!(all[1].genre, Genre::Action);
    assert_eq!(all[1].rating, 9);
    assert_eq!(all[1].review, "Better sequel");
    assert_eq!(all[1].date, start());
}

#[test]
fn update_of_missing_id_is_not_found() {
    let (mut store, _clock) = store_with_clock();
    let missing = MovieId::from("ghost");
    let err = store
        .update(&missing, &draft("Heat", Genre::Action, 7))
        .expect_err("missing");
    assert_eq!(err, LogError::NotFound { id: missing });
}

#[test]
fn update_rejects_blank_title() {
    let (mut store, _clock) = store_with_clock();
    let id = store.add(&draft("Heat", Genre::Action, 7)).expect("add");
    let err = store
        .update(&id, &draft("", Genre::Action, 7))
        .expect_err("blank");
    assert!(matches!(err, LogError::Validation(_)));
    assert_eq!(store.get(&id).expect("kept").title, "Heat");
}

#[test]
fn remove_is_idempotent() {
    let (mut store, _clock) = store_with_clock();
    let keep = store.add(&draft("Heat", Genre::Action, 7)).expect("keep");
    let drop_id = store.add(&draft("Saw", Genre::Horror, 6)).expect("drop");

    assert!(store.remove(&drop_id));
    let after_once: Vec<_> = store.all().to_vec();
    assert!(!store.remove(&drop_id));
    assert_eq!(store.all(), after_once.as_slice());
    assert_eq!(store.all()[0].id, keep);
}

#[test]
fn subscribers_see_each_mutation_with_rising_revision() {
    let (mut store, _clock) = store_with_clock();
    let rx = store.subscribe();

    let id = store.add(&draft("Heat", Genre::Action, 7)).expect("add");
    store.update(&id, &draft("Heat (1995)", Genre::Action, 8)).expect("update");
    store.remove(&id);
    store.remove(&id);

    let changes: Vec<_> = rx.try_iter().collect();
    assert_eq!(
        changes,
        vec![
            StoreChange::Added {
                id: id.clone(),
                revision: 1
            },
            StoreChange::Updated {
                id: id.clone(),
                revision: 2
            },
            StoreChange::Removed { id, revision: 3 },
        ]
    );
}

#[test]
fn dropped_subscribers_are_pruned() {
    let (mut store, _clock) = store_with_clock();
    let rx = store.subscribe();
    drop(rx);
    store.add(&draft("Heat", Genre::Action, 7)).expect("add");
    assert!(store.subscribers.is_empty());
}

#[test]
fn uuid_generator_yields_distinct_ids() {
    let mut ids = UuidGenerator;
    assert_ne!(ids.next_id(), ids.next_id());
}
