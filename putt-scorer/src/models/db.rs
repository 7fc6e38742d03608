use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde_json::Value;
use sqlx::FromRow;

/// Handicap columns of the users table
#[derive(Debug, Clone, FromRow)]
pub struct PlayerHandicapRecord {
    pub id: i32,
    pub handicap: Option<Decimal>,
    pub handicap_last_calculated: Option<DateTime<Utc>>,
    pub handicap_qualifying_sessions: Option<i32>,
}

impl PlayerHandicapRecord {
    pub fn handicap_mpm(&self) -> Option<f64> {
        self.handicap.and_then(|h| h.to_f64())
    }
}

/// sessions table row; `data` is the uploaded session summary blob
#[derive(Debug, Clone, FromRow)]
pub struct SessionRecord {
    pub data: Value,
    pub created_at: DateTime<Utc>,
}

/// players table
#[derive(Debug, Clone, FromRow)]
pub struct PlayerRecord {
    pub player_id: i32,
    pub name: Option<String>,
    pub email: Option<String>,
    pub is_admin: Option<bool>,
}

impl PlayerRecord {
    pub fn is_admin(&self) -> bool {
        self.is_admin.unwrap_or(false)
    }
}
