use chrono::{DateTime, Utc};
use shared::{
    domain::{Draft, DraftField, MovieRecord, Timestamp, REVIEW_MAX_CHARS},
    error::LogError,
    protocol::{IntentOutcome, SessionMode},
};
use storage::RecordStore;
use tracing::{debug, warn};

/// Tracks whether the form creates or edits, and owns the draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSession {
    mode: SessionMode,
    draft: Draft,
}

impl EditSession {
    pub fn new(now: Timestamp) -> Self {
        Self {
            mode: SessionMode::Creating,
            draft: Draft::empty(now),
        }
    }

    pub fn mode(&self) -> &SessionMode {
        &self.mode
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn start_create(&mut self, now: Timestamp) {
        self.mode = SessionMode::Creating;
        self.draft = Draft::empty(now);
    }

    pub fn start_edit(&mut self, record: &MovieRecord) {
        debug!(id = %record.id, "editing movie");
        self.mode = SessionMode::Editing {
            target: record.id.clone(),
        };
        self.draft = Draft::from_record(record);
    }

    /// Rejected input leaves the draft untouched.
    pub fn update_draft_field(&mut self, field: DraftField, value: &str) -> Result<(), LogError> {
        match field {
            DraftField::Title => self.draft.title = value.to_string(),
            DraftField::Genre => self.draft.genre = value.parse()?,
            DraftField::Rating => self.draft.rating = parse_rating(value)?,
            DraftField::Review => self.draft.review = clip_review(value),
            DraftField::Date => self.draft.date = parse_date(value)?,
        }
        Ok(())
    }

    /// Commits the draft. Validation failures keep mode and draft as they were;
    /// a vanished edit target drops the session back to creating.
    pub fn submit(
        &mut self,
        store: &mut RecordStore,
        now: Timestamp,
    ) -> Result<IntentOutcome, LogError> {
        let outcome = match self.mode.clone() {
            SessionMode::Creating => {
                let id = store.add(&self.draft)?;
                IntentOutcome::Added { id }
            }
            SessionMode::Editing { target } => match store.update(&target, &self.draft) {
                Ok(()) => IntentOutcome::Updated { id: target },
                Err(err @ LogError::NotFound { .. }) => {
                    warn!(id = %target, "edit target no longer exists; resetting form");
                    self.start_create(now);
                    return Err(err);
                }
                Err(err) => return Err(err),
            },
        };
        self.start_create(now);
        Ok(outcome)
    }

    pub fn cancel(&mut self, now: Timestamp) {
        if let SessionMode::Editing { target } = &self.mode {
            debug!(id = %target, "edit cancelled");
        }
        self.start_create(now);
    }
}

/// Integer coercion with leading-integer semantics (`"7.5"` reads as 7); no clamping.
fn parse_rating(value: &str) -> Result<u8, LogError> {
    let trimmed = value.trim();
    let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let digits_end = unsigned
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(unsigned.len());

    unsigned[..digits_end]
        .parse::<u8>()
        .map_err(|err| LogError::InvalidField {
            field: "rating".to_string(),
            reason: format!("'{value}' is not a rating: {err}"),
        })
}

fn clip_review(value: &str) -> String {
    match value.char_indices().nth(REVIEW_MAX_CHARS) {
        Some((cut, _)) => value[..cut].to_string(),
        None => value.to_string(),
    }
}

fn parse_date(value: &str) -> Result<Timestamp, LogError> {
    DateTime::parse_from_rfc3339(value.trim())
        .map(|date| date.with_timezone(&Utc))
        .map_err(|err| LogError::InvalidField {
            field: "date".to_string(),
            reason: err.to_string(),
        })
}

#[cfg(test)]
#[path = "tests/edit_session_tests.rs"]
mod tests;
