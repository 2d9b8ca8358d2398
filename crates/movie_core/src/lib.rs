//! Movie log core: the record store, the edit form session and the projected
//! view, owned together by [`MovieLog`] and driven by user [`Intent`]s.

use crossbeam_channel::{unbounded, Receiver, Sender};
use shared::{
    domain::{DraftField, MovieId, MovieRecord, REVIEW_MAX_CHARS},
    error::{LogError, Notice},
    protocol::{
        DraftView, GenreFilter, Intent, IntentOutcome, LogEvent, RecordCard, SessionMode,
        SortOrder, ViewSnapshot,
    },
};
use storage::{RecordStore, StoreChange};
use tracing::{debug, warn};

pub mod edit_session;
pub mod hints;
pub mod projection;

pub use edit_session::EditSession;
pub use hints::DEFAULT_PREVIEW_CHARS;
pub use projection::project;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogOptions {
    pub genre_filter: GenreFilter,
    pub sort_order: SortOrder,
    pub preview_chars: usize,
}

impl Default for LogOptions {
    fn default() -> Self {
        Self {
            genre_filter: GenreFilter::All,
            sort_order: SortOrder::Newest,
            preview_chars: DEFAULT_PREVIEW_CHARS,
        }
    }
}

/// Owns the store, the edit session and view settings for one process.
pub struct MovieLog {
    store: RecordStore,
    store_changes: Receiver<StoreChange>,
    session: EditSession,
    genre_filter: GenreFilter,
    sort_order: SortOrder,
    preview_chars: usize,
    projection: Vec<MovieRecord>,
    subscribers: Vec<Sender<LogEvent>>,
}

impl MovieLog {
    pub fn new(mut store: RecordStore, options: LogOptions) -> Self {
        let store_changes = store.subscribe();
        let session = EditSession::new(store.now());
        let mut log = Self {
            store,
            store_changes,
            session,
            genre_filter: options.genre_filter,
            sort_order: options.sort_order,
            preview_chars: options.preview_chars,
            projection: Vec::new(),
            subscribers: Vec::new(),
        };
        log.reproject();
        log
    }

    pub fn subscribe(&mut self) -> Receiver<LogEvent> {
        let (tx, rx) = unbounded();
        self.subscribers.push(tx);
        rx
    }

    /// Applies one intent. Failures are reported to subscribers as a notice and
    /// returned; state is left as the failing operation found it.
    pub fn dispatch(&mut self, intent: Intent) -> Result<IntentOutcome, LogError> {
        let name = intent.name();
        debug!(intent = name, "dispatching intent");

        let result = match intent {
            Intent::StartCreate => {
                self.start_create();
                Ok(IntentOutcome::Applied)
            }
            Intent::StartEdit { id } => self.start_edit(&id).map(|()| IntentOutcome::Applied),
            Intent::UpdateDraftField { field, value } => self
                .update_draft_field(&field, &value)
                .map(|()| IntentOutcome::Applied),
            Intent::SubmitDraft => self.submit_draft(),
            Intent::CancelEdit => {
                self.cancel_edit();
                Ok(IntentOutcome::Applied)
            }
            Intent::DeleteRecord { id } => {
                let existed = self.delete_record(&id);
                Ok(IntentOutcome::Removed { id, existed })
            }
            Intent::SetGenreFilter { value } => self
                .set_genre_filter(&value)
                .map(|()| IntentOutcome::Applied),
            Intent::SetSortOrder { value } => {
                self.set_sort_order(&value);
                Ok(IntentOutcome::Applied)
            }
        };

        if let Err(err) = &result {
            warn!(intent = name, error = %err, "intent rejected");
            self.emit(LogEvent::Notice(Notice::from(err)));
        }
        result
    }

    pub fn start_create(&mut self) {
        let now = self.store.now();
        self.session.start_create(now);
        self.emit_session();
    }

    pub fn start_edit(&mut self, id: &MovieId) -> Result<(), LogError> {
        let record = self
            .store
            .get(id)
            .ok_or_else(|| LogError::NotFound { id: id.clone() })?;
        self.session.start_edit(record);
        self.emit_session();
        Ok(())
    }

    pub fn update_draft_field(&mut self, field: &str, value: &str) -> Result<(), LogError> {
        let field: DraftField = field.parse()?;
        self.session.update_draft_field(field, value)
    }

    pub fn submit_draft(&mut self) -> Result<IntentOutcome, LogError> {
        let now = self.store.now();
        let before = self.session.mode().clone();
        let result = self.session.submit(&mut self.store, now);

        self.sync_records();
        if self.session.mode() != &before || result.is_ok() {
            self.emit_session();
        }
        result
    }

    pub fn cancel_edit(&mut self) {
        let now = self.store.now();
        self.session.cancel(now);
        self.emit_session();
    }

    /// Confirmation is the caller's job; deleting an absent id is a no-op.
    pub fn delete_record(&mut self, id: &MovieId) -> bool {
        let existed = self.store.remove(id);
        self.sync_records();
        existed
    }

    pub fn set_genre_filter(&mut self, value: &str) -> Result<(), LogError> {
        let filter = GenreFilter::parse(value)?;
        if filter != self.genre_filter {
            self.genre_filter = filter;
            self.reproject();
            self.emit(LogEvent::ViewChanged);
        }
        Ok(())
    }

    pub fn set_sort_order(&mut self, value: &str) {
        let order = SortOrder::from_key(value);
        if order != self.sort_order {
            self.sort_order = order;
            self.reproject();
            self.emit(LogEvent::ViewChanged);
        }
    }

    pub fn records(&self) -> &[MovieRecord] {
        self.store.all()
    }

    pub fn session(&self) -> &EditSession {
        &self.session
    }

    pub fn mode(&self) -> &SessionMode {
        self.session.mode()
    }

    pub fn genre_filter(&self) -> GenreFilter {
        self.genre_filter
    }

    pub fn sort_order(&self) -> SortOrder {
        self.sort_order
    }

    /// The current filtered and sorted records.
    pub fn projection(&self) -> &[MovieRecord] {
        &self.projection
    }

    pub fn cards(&self) -> Vec<RecordCard> {
        self.projection
            .iter()
            .map(|record| hints::record_card(record, self.preview_chars))
            .collect()
    }

    pub fn snapshot(&self) -> ViewSnapshot {
        let draft = self.session.draft();
        ViewSnapshot {
            session: self.session.mode().clone(),
            draft: DraftView {
                draft: draft.clone(),
                tier: draft.rating_tier(),
                review_chars: draft.review_chars(),
                review_limit: REVIEW_MAX_CHARS,
            },
            genre_filter: self.genre_filter,
            sort_order: self.sort_order,
            total_records: self.store.len(),
            records: self.cards(),
        }
    }

    fn sync_records(&mut self) {
        let Some(revision) = self.store_changes.try_iter().map(|c| c.revision()).max() else {
            return;
        };
        self.reproject();
        self.emit(LogEvent::RecordsChanged { revision });
        self.emit(LogEvent::ViewChanged);
    }

    fn reproject(&mut self) {
        self.projection = project(self.store.all(), self.genre_filter, self.sort_order)
            .into_iter()
            .cloned()
            .collect();
        debug!(
            shown = self.projection.len(),
            total = self.store.len(),
            filter = %self.genre_filter,
            sort = %self.sort_order,
            "view recomputed"
        );
    }

    fn emit_session(&mut self) {
        let session = self.session.mode().clone();
        self.emit(LogEvent::SessionChanged { session });
    }

    fn emit(&mut self, event: LogEvent) {
        self.subscribers
            .retain(|subscriber| subscriber.send(event.clone()).is_ok());
    }
}

impl Default for MovieLog {
    fn default() -> Self {
        Self::new(RecordStore::default(), LogOptions::default())
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
