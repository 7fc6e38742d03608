use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::domain::competition::{AdjustedScore, RuleSet, ScoringMode, SessionResult};
use crate::domain::handicap_calculation::PercentileData;

/// Distinguish a field that was sent as `null` (`Some(None)`) from one that was left out (`None`)
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

/// GET /api/calculate-handicap
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerHandicapResponse {
    pub success: bool,
    pub handicap: Option<f64>,
    pub last_calculated: Option<DateTime<Utc>>,
    pub qualifying_sessions: i32,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecalculateRequest {
    #[serde(default)]
    pub force: bool,
}

/// POST /api/calculate-handicap
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecalculateResponse {
    pub success: bool,
    pub handicap: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qualifying_sessions: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percentile_data: Option<PercentileData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hours_since_last_calc: Option<f64>,
    pub message: String,
}

/// PUT /api/calculate-handicap. Omitted fields are left untouched, `null` clears the column.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileUpdateRequest {
    #[serde(default, deserialize_with = "present")]
    pub profile_picture_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub bio: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub social_links: Option<Option<Value>>,
}

impl ProfileUpdateRequest {
    pub fn is_empty(&self) -> bool {
        self.profile_picture_url.is_none() && self.bio.is_none() && self.social_links.is_none()
    }
}

/// POST /api/handicap/adjust
#[derive(Debug, Clone, Deserialize)]
pub struct AdjustScoreRequest {
    #[serde(default)]
    pub rules: Option<RuleSet>,
    pub session: SessionResult,
    #[serde(default)]
    pub handicap: Option<f64>,
    #[serde(default)]
    pub avg_putts_per_minute: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdjustScoreResponse {
    pub success: bool,
    pub mode: ScoringMode,
    pub raw_score: i64,
    pub adjusted_score: AdjustedScore,
    pub handicap_applied: bool,
    pub display_handicap: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerHandicapSummary {
    pub player_id: i32,
    pub handicap: Option<f64>,
    pub display: String,
}

/// GET /api/handicap/compare
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompareResponse {
    pub success: bool,
    pub player1: PlayerHandicapSummary,
    pub player2: PlayerHandicapSummary,
    pub stronger: Option<u8>,
    pub weaker: Option<u8>,
    pub difference: f64,
}

/// POST /api/admin/gift-codes/generate
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrantGiftCodesRequest {
    pub player_id: Option<i32>,
    pub quantity: Option<i64>,
    pub bundle_id: Option<i32>,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrantedGiftCodes {
    pub player_id: i32,
    pub player_name: Option<String>,
    pub quantity: usize,
    pub reason: String,
    pub gift_codes: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrantGiftCodesResponse {
    pub success: bool,
    pub message: String,
    pub data: GrantedGiftCodes,
}
