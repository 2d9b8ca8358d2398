use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{LogError, ValidationError};

/// Creation instants are compared as immutable UTC values.
pub type Timestamp = DateTime<Utc>;

pub const REVIEW_MAX_CHARS: usize = 500;
pub const DEFAULT_RATING: u8 = 5;

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

id_newtype!(MovieId);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Genre {
    #[default]
    Drama,
    Comedy,
    Action,
    Thriller,
    SciFi,
    Horror,
    Documentary,
    Other,
}

impl Genre {
    pub const ALL: [Genre; 8] = [
        Genre::Drama,
        Genre::Comedy,
        Genre::Action,
        Genre::Thriller,
        Genre::SciFi,
        Genre::Horror,
        Genre::Documentary,
        Genre::Other,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Genre::Drama => "drama",
            Genre::Comedy => "comedy",
            Genre::Action => "action",
            Genre::Thriller => "thriller",
            Genre::SciFi => "sci-fi",
            Genre::Horror => "horror",
            Genre::Documentary => "documentary",
            Genre::Other => "other",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Genre::Drama => "Drama",
            Genre::Comedy => "Comedy",
            Genre::Action => "Action",
            Genre::Thriller => "Thriller",
            Genre::SciFi => "Sci-Fi",
            Genre::Horror => "Horror",
            Genre::Documentary => "Documentary",
            Genre::Other => "Other",
        }
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Genre {
    type Err = LogError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Genre::ALL
            .into_iter()
            .find(|genre| genre.key() == value)
            .ok_or_else(|| LogError::UnknownGenre {
                value: value.to_string(),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RatingTier {
    Excellent,
    Good,
    Average,
    Poor,
}

impl RatingTier {
    pub fn for_rating(rating: u8) -> Self {
        match rating {
            9..=u8::MAX => RatingTier::Excellent,
            7..=8 => RatingTier::Good,
            5..=6 => RatingTier::Average,
            _ => RatingTier::Poor,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieRecord {
    pub id: MovieId,
    pub title: String,
    pub genre: Genre,
    pub rating: u8,
    pub review: String,
    pub date: Timestamp,
}

impl MovieRecord {
    pub fn rating_tier(&self) -> RatingTier {
        RatingTier::for_rating(self.rating)
    }
}

/// Working copy of a record's editable fields while the form is open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Draft {
    pub title: String,
    pub genre: Genre,
    pub rating: u8,
    pub review: String,
    pub date: Timestamp,
}

impl Draft {
    pub fn empty(now: Timestamp) -> Self {
        Self {
            title: String::new(),
            genre: Genre::default(),
            rating: DEFAULT_RATING,
            review: String::new(),
            date: now,
        }
    }

    pub fn from_record(record: &MovieRecord) -> Self {
        Self {
            title: record.title.clone(),
            genre: record.genre,
            rating: record.rating,
            review: record.review.clone(),
            date: record.date,
        }
    }

    /// The single submission rule: a title must survive trimming.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        Ok(())
    }

    pub fn review_chars(&self) -> usize {
        self.review.chars().count()
    }

    pub fn rating_tier(&self) -> RatingTier {
        RatingTier::for_rating(self.rating)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DraftField {
    Title,
    Genre,
    Rating,
    Review,
    Date,
}

impl FromStr for DraftField {
    type Err = LogError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "title" => Ok(DraftField::Title),
            "genre" => Ok(DraftField::Genre),
            "rating" => Ok(DraftField::Rating),
            "review" => Ok(DraftField::Review),
            "date" => Ok(DraftField::Date),
            other => Err(LogError::InvalidField {
                field: other.to_string(),
                reason: "unknown draft field".to_string(),
            }),
        }
    }
}
