// Domain layer - business logic with no HTTP concerns.
// `handicap`, `competition` and `handicap_calculation` are pure; `player_handicap` and
// `gift_codes` orchestrate them against the database.

pub mod competition;
pub mod gift_codes;
pub mod handicap;
pub mod handicap_calculation;
pub mod player_handicap;

use crate::db::DatabaseError;
use gift_codes::GiftCodeError;
use handicap::HandicapError;

#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sqlx::Error> for DomainError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::RowNotFound => DomainError::NotFound("Resource not found".to_string()),
            _ => DomainError::Database(e.to_string()),
        }
    }
}

impl From<DatabaseError> for DomainError {
    fn from(e: DatabaseError) -> Self {
        match e {
            DatabaseError::NotFound(msg) => DomainError::NotFound(msg),
            DatabaseError::InvalidData(msg) => DomainError::Validation(msg),
            DatabaseError::SerializationError(e) => DomainError::Internal(e.to_string()),
            DatabaseError::QueryError(e) => e.into(),
            other => DomainError::Database(other.to_string()),
        }
    }
}

impl From<HandicapError> for DomainError {
    fn from(e: HandicapError) -> Self {
        match e {
            HandicapError::InvalidInput(msg) => DomainError::Validation(msg),
        }
    }
}

impl From<GiftCodeError> for DomainError {
    fn from(e: GiftCodeError) -> Self {
        match e {
            GiftCodeError::Database(e) => e.into(),
            exhausted @ GiftCodeError::Exhausted { .. } => DomainError::Internal(exhausted.to_string()),
        }
    }
}

pub use competition::{
    score_session, should_apply_handicap, AdjustedScore, RuleSet, ScoredSession, ScoringMode,
    SessionResult,
};
pub use handicap::{adjust_shootout, adjust_timed, format_handicap, handicap_difference, HandicapComparison};
pub use handicap_calculation::{calculate_handicap_from_sessions, HandicapCalculation, PercentileData};
