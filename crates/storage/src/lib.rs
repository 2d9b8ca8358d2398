use std::{cell::Cell, rc::Rc};

use chrono::{Duration, Utc};
use crossbeam_channel::{unbounded, Receiver, Sender};
use tracing::{debug, info};
use uuid::Uuid;

use shared::{
    domain::{Draft, MovieId, MovieRecord, Timestamp},
    error::LogError,
};

/// Source of record ids. Each call should return an id not handed out before;
/// the store redraws a colliding id at most [`MAX_ID_DRAWS`] times in total.
pub trait IdGenerator {
    fn next_id(&mut self) -> MovieId;
}

pub const MAX_ID_DRAWS: usize = 8;

#[derive(Debug, Default, Clone, Copy)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn next_id(&mut self) -> MovieId {
        MovieId(Uuid::new_v4().to_string())
    }
}

/// Deterministic ids (`movie-1`, `movie-2`, ...) for tests and scripted sessions.
#[derive(Debug, Default, Clone)]
pub struct SequentialIds {
    next: u64,
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self) -> MovieId {
        self.next += 1;
        MovieId(format!("movie-{}", self.next))
    }
}

pub trait Clock {
    fn now(&self) -> Timestamp;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Utc::now()
    }
}

/// Hand-driven clock; clones share the same instant.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Rc<Cell<Timestamp>>,
}

impl ManualClock {
    pub fn new(start: Timestamp) -> Self {
        Self {
            now: Rc::new(Cell::new(start)),
        }
    }

    pub fn set(&self, instant: Timestamp) {
        self.now.set(instant);
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        self.now.get()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreChange {
    Added { id: MovieId, revision: u64 },
    Updated { id: MovieId, revision: u64 },
    Removed { id: MovieId, revision: u64 },
}

impl StoreChange {
    pub fn revision(&self) -> u64 {
        match self {
            StoreChange::Added { revision, .. }
            | StoreChange::Updated { revision, .. }
            | StoreChange::Removed { revision, .. } => *revision,
        }
    }

    pub fn id(&self) -> &MovieId {
        match self {
            StoreChange::Added { id, .. }
            | StoreChange::Updated { id, .. }
            | StoreChange::Removed { id, .. } => id,
        }
    }
}

/// Sole owner of the movie records, newest-created first.
pub struct RecordStore {
    records: Vec<MovieRecord>,
    ids: Box<dyn IdGenerator>,
    clock: Box<dyn Clock>,
    revision: u64,
    subscribers: Vec<Sender<StoreChange>>,
}

impl Default for RecordStore {
    fn default() -> Self {
        Self::new(Box::new(UuidGenerator), Box::new(SystemClock))
    }
}

impl RecordStore {
    pub fn new(ids: Box<dyn IdGenerator>, clock: Box<dyn Clock>) -> Self {
        Self {
            records: Vec::new(),
            ids,
            clock,
            revision: 0,
            subscribers: Vec::new(),
        }
    }

    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn all(&self) -> &[MovieRecord] {
        &self.records
    }

    pub fn get(&self, id: &MovieId) -> Option<&MovieRecord> {
        self.records.iter().find(|record| &record.id == id)
    }

    pub fn subscribe(&mut self) -> Receiver<StoreChange> {
        let (tx, rx) = unbounded();
        self.subscribers.push(tx);
        rx
    }

    pub fn add(&mut self, draft: &Draft) -> Result<MovieId, LogError> {
        draft.validate()?;

        let id = self.fresh_id()?;

        let record = MovieRecord {
            id: id.clone(),
            title: draft.title.clone(),
            genre: draft.genre,
            rating: draft.rating,
            review: draft.review.clone(),
            date: self.clock.now(),
        };
        self.records.insert(0, record);
        info!(%id, title = %draft.title, "movie added");

        let revision = self.bump();
        self.notify(StoreChange::Added {
            id: id.clone(),
            revision,
        });
        Ok(id)
    }

    /// Overwrites the editable fields in place; `id`, `date` and position stay.
    pub fn update(&mut self, id: &MovieId, draft: &Draft) -> Result<(), LogError> {
        draft.validate()?;

        let record = self
            .records
            .iter_mut()
            .find(|record| &record.id == id)
            .ok_or_else(|| LogError::NotFound { id: id.clone() })?;
        record.title = draft.title.clone();
        record.genre = draft.genre;
        record.rating = draft.rating;
        record.review = draft.review.clone();
        info!(%id, title = %draft.title, "movie updated");

        let revision = self.bump();
        self.notify(StoreChange::Updated {
            id: id.clone(),
            revision,
        });
        Ok(())
    }

    /// Returns whether a record was removed; an absent id is a no-op.
    pub fn remove(&mut self, id: &MovieId) -> bool {
        let Some(index) = self.records.iter().position(|record| &record.id == id) else {
            debug!(%id, "remove of absent movie ignored");
            return false;
        };
        self.records.remove(index);
        info!(%id, "movie removed");

        let revision = self.bump();
        self.notify(StoreChange::Removed {
            id: id.clone(),
            revision,
        });
        true
    }

    fn fresh_id(&mut self) -> Result<MovieId, LogError> {
        let mut id = self.ids.next_id();
        let mut draws = 1;
        while self.get(&id).is_some() {
            if draws == MAX_ID_DRAWS {
                return Err(LogError::IdCollision { id });
            }
            debug!(%id, "id generator repeated a live id; drawing another");
            id = self.ids.next_id();
            draws += 1;
        }
        Ok(id)
    }

    fn bump(&mut self) -> u64 {
        self.revision += 1;
        self.revision
    }

    fn notify(&mut self, change: StoreChange) {
        self.subscribers
            .retain(|subscriber| subscriber.send(change.clone()).is_ok());
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
