use serde::{Deserialize, Deserializer, Serialize};

use super::handicap::{adjust_shootout, adjust_timed, HandicapError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ScoringMode {
    #[default]
    Timed,
    Shootout,
}

/// Per-duel / per-league rules that decide whether and how handicaps apply
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleSet {
    #[serde(default, deserialize_with = "strict_true")]
    pub handicap_enabled: bool,
    #[serde(default)]
    pub mode: ScoringMode,
}

/// Only a JSON `true` enables the flag; `"true"`, `1`, `null` and friends do not.
fn strict_true<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(matches!(value, serde_json::Value::Bool(true)))
}

/// Measured outcome of one practice or competition attempt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResult {
    pub total_makes: i64,
    #[serde(default)]
    pub duration_seconds: Option<f64>,
    #[serde(default)]
    pub max_attempts: Option<i64>,
}

/// Shootout scores are whole makes; timed scores keep their fraction
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AdjustedScore {
    Whole(u64),
    Fractional(f64),
}

impl AdjustedScore {
    pub fn as_f64(self) -> f64 {
        match self {
            Self::Whole(score) => score as f64,
            Self::Fractional(score) => score,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredSession {
    pub mode: ScoringMode,
    pub raw_score: i64,
    pub adjusted_score: AdjustedScore,
    pub handicap_applied: bool,
}

pub fn should_apply_handicap(rules: Option<&RuleSet>) -> bool {
    rules.is_some_and(|r| r.handicap_enabled)
}

/// Score a session under a competition's rules.
///
/// When the rules disable handicaps the player's stored handicap is ignored, but the
/// session still has to be well-formed for its mode.
#[tracing::instrument(skip(session, rules), fields(total_makes = session.total_makes))]
pub fn score_session(
    session: &SessionResult,
    handicap_mpm: Option<f64>,
    rules: Option<&RuleSet>,
    avg_putts_per_minute: f64,
) -> Result<ScoredSession> {
    let mode = rules.map(|r| r.mode).unwrap_or_default();
    let apply = should_apply_handicap(rules);
    let handicap = if apply { handicap_mpm } else { None };

    let adjusted_score = match mode {
        ScoringMode::Timed => {
            let duration = session.duration_seconds.ok_or_else(|| {
                HandicapError::InvalidInput("duration_seconds is required for timed sessions".to_string())
            })?;
            AdjustedScore::Fractional(adjust_timed(session.total_makes, duration, handicap)?)
        }
        ScoringMode::Shootout => {
            let attempts = session.max_attempts.ok_or_else(|| {
                HandicapError::InvalidInput("max_attempts is required for shootout sessions".to_string())
            })?;
            AdjustedScore::Whole(adjust_shootout(
                session.total_makes,
                attempts,
                handicap,
                avg_putts_per_minute,
            )?)
        }
    };

    Ok(ScoredSession {
        mode,
        raw_score: session.total_makes,
        adjusted_score,
        handicap_applied: handicap.is_some_and(|h| h != 0.0),
    })
}
