pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod domain;
pub mod models;

// Re-export commonly used types
pub use config::{Config, ConfigError};

pub use db::{create_lazy_pool, create_pool, health_check, DatabaseError};

pub use domain::{
    adjust_shootout, adjust_timed, calculate_handicap_from_sessions, format_handicap, AdjustedScore,
    handicap_difference, score_session, should_apply_handicap, DomainError, HandicapCalculation,
    HandicapComparison, RuleSet, ScoredSession, ScoringMode, SessionResult,
};
pub use domain::handicap::{HandicapError, DEFAULT_AVG_PUTTS_PER_MINUTE};
pub use domain::gift_codes::{generate_gift_code, generate_unique_gift_codes, GiftCodeError};

pub use api::{server::create_app, AppState};
