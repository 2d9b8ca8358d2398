use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    domain::{Draft, Genre, MovieId, MovieRecord, RatingTier},
    error::{LogError, Notice},
};

/// User intents forwarded by the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum Intent {
    StartCreate,
    StartEdit { id: MovieId },
    UpdateDraftField { field: String, value: String },
    SubmitDraft,
    CancelEdit,
    DeleteRecord { id: MovieId },
    SetGenreFilter { value: String },
    SetSortOrder { value: String },
}

impl Intent {
    pub fn name(&self) -> &'static str {
        match self {
            Intent::StartCreate => "start_create",
            Intent::StartEdit { .. } => "start_edit",
            Intent::UpdateDraftField { .. } => "update_draft_field",
            Intent::SubmitDraft => "submit_draft",
            Intent::CancelEdit => "cancel_edit",
            Intent::DeleteRecord { .. } => "delete_record",
            Intent::SetGenreFilter { .. } => "set_genre_filter",
            Intent::SetSortOrder { .. } => "set_sort_order",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IntentOutcome {
    Added { id: MovieId },
    Updated { id: MovieId },
    Removed { id: MovieId, existed: bool },
    Applied,
}

pub const ALL_GENRES_KEY: &str = "all";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum GenreFilter {
    #[default]
    All,
    Only(Genre),
}

impl GenreFilter {
    pub fn parse(value: &str) -> Result<Self, LogError> {
        if value == ALL_GENRES_KEY {
            return Ok(GenreFilter::All);
        }
        value.parse().map(GenreFilter::Only)
    }

    pub fn matches(self, genre: Genre) -> bool {
        match self {
            GenreFilter::All => true,
            GenreFilter::Only(wanted) => wanted == genre,
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            GenreFilter::All => ALL_GENRES_KEY,
            GenreFilter::Only(genre) => genre.key(),
        }
    }
}

impl fmt::Display for GenreFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl TryFrom<String> for GenreFilter {
    type Error = LogError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        GenreFilter::parse(&value)
    }
}

impl From<GenreFilter> for String {
    fn from(value: GenreFilter) -> Self {
        value.key().to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SortOrder {
    #[default]
    Newest,
    Oldest,
    RatingHigh,
    RatingLow,
    /// Keeps store order; any unrecognized key lands here.
    Unordered,
}

impl SortOrder {
    /// Selectable orders, in the order the form lists them.
    pub const OPTIONS: [SortOrder; 4] = [
        SortOrder::Newest,
        SortOrder::Oldest,
        SortOrder::RatingHigh,
        SortOrder::RatingLow,
    ];

    pub fn from_key(value: &str) -> Self {
        match value {
            "newest" => SortOrder::Newest,
            "oldest" => SortOrder::Oldest,
            "rating-high" => SortOrder::RatingHigh,
            "rating-low" => SortOrder::RatingLow,
            _ => SortOrder::Unordered,
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            SortOrder::Newest => "newest",
            SortOrder::Oldest => "oldest",
            SortOrder::RatingHigh => "rating-high",
            SortOrder::RatingLow => "rating-low",
            SortOrder::Unordered => "unordered",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SortOrder::Newest => "Newest first",
            SortOrder::Oldest => "Oldest first",
            SortOrder::RatingHigh => "Rating (high to low)",
            SortOrder::RatingLow => "Rating (low to high)",
            SortOrder::Unordered => "As entered",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl From<String> for SortOrder {
    fn from(value: String) -> Self {
        SortOrder::from_key(&value)
    }
}

impl From<SortOrder> for String {
    fn from(value: SortOrder) -> Self {
        value.key().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SessionMode {
    #[default]
    Creating,
    Editing {
        target: MovieId,
    },
}

impl SessionMode {
    pub fn is_editing(&self) -> bool {
        matches!(self, SessionMode::Editing { .. })
    }

    pub fn target(&self) -> Option<&MovieId> {
        match self {
            SessionMode::Creating => None,
            SessionMode::Editing { target } => Some(target),
        }
    }
}

/// A projected record together with its display hints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordCard {
    #[serde(flatten)]
    pub record: MovieRecord,
    pub tier: RatingTier,
    pub review_preview: String,
    pub date_label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftView {
    #[serde(flatten)]
    pub draft: Draft,
    pub tier: RatingTier,
    pub review_chars: usize,
    pub review_limit: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewSnapshot {
    pub session: SessionMode,
    pub draft: DraftView,
    pub genre_filter: GenreFilter,
    pub sort_order: SortOrder,
    pub total_records: usize,
    pub records: Vec<RecordCard>,
}

/// Notifications for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum LogEvent {
    RecordsChanged { revision: u64 },
    ViewChanged,
    SessionChanged { session: SessionMode },
    Notice(Notice),
}
