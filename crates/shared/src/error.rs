use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::MovieId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    NotFound,
    Validation,
    InvalidInput,
    Internal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("movie title is required")]
    EmptyTitle,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LogError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("no movie with id {id}")]
    NotFound { id: MovieId },
    #[error("invalid value for field '{field}': {reason}")]
    InvalidField { field: String, reason: String },
    #[error("unknown genre '{value}'")]
    UnknownGenre { value: String },
    #[error("id generator kept returning ids already in use (last: {id})")]
    IdCollision { id: MovieId },
}

impl LogError {
    pub fn code(&self) -> ErrorCode {
        match self {
            LogError::Validation(_) => ErrorCode::Validation,
            LogError::NotFound { .. } => ErrorCode::NotFound,
            LogError::InvalidField { .. } | LogError::UnknownGenre { .. } => {
                ErrorCode::InvalidInput
            }
            LogError::IdCollision { .. } => ErrorCode::Internal,
        }
    }
}

/// Boundary form of a failure, shown to the user as a notice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub code: ErrorCode,
    pub message: String,
}

impl Notice {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl From<&LogError> for Notice {
    fn from(value: &LogError) -> Self {
        Self::new(value.code(), value.to_string())
    }
}
