use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

/// Sessions needed before a handicap is assigned
pub const MIN_QUALIFYING_SESSIONS: usize = 21;

/// Shortest session (5 minutes) that counts toward a handicap
pub const MIN_SESSION_DURATION_SECONDS: i64 = 300;

const QUALIFYING_SESSION_TYPES: [&str; 2] = ["timed", "practice"];

/// Spread of the MPM values the handicap was averaged from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PercentileData {
    pub p50: f64,
    pub p75: f64,
    pub values_used: usize,
    pub range: [f64; 2],
}

#[derive(Debug, Clone, PartialEq)]
pub enum HandicapCalculation {
    Calculated {
        handicap: f64,
        qualifying_sessions: usize,
        percentile_data: PercentileData,
    },
    Insufficient {
        qualifying_sessions: usize,
        message: String,
    },
}

impl HandicapCalculation {
    pub fn qualifying_sessions(&self) -> usize {
        match self {
            Self::Calculated { qualifying_sessions, .. } => *qualifying_sessions,
            Self::Insufficient { qualifying_sessions, .. } => *qualifying_sessions,
        }
    }
}

/// Read a numeric field that may have been stored as a JSON number or a numeric string
fn numeric_field(data: &Value, key: &str) -> Option<f64> {
    match data.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// MPM of a session if it counts toward the handicap
pub fn qualifying_mpm(data: &Value) -> Option<f64> {
    let session_type = data
        .get("session_type")
        .and_then(Value::as_str)
        .unwrap_or("practice");
    if !QUALIFYING_SESSION_TYPES.contains(&session_type) {
        return None;
    }

    let duration = numeric_field(data, "session_duration")
        .filter(|d| d.is_finite())
        .map(|d| d.trunc() as i64)
        .unwrap_or(0);
    if duration < MIN_SESSION_DURATION_SECONDS {
        return None;
    }

    numeric_field(data, "makes_per_minute").filter(|mpm| mpm.is_finite() && *mpm > 0.0)
}

/// Calculate a handicap from raw session blobs.
///
/// The handicap is the mean of the 50th to 75th percentile of qualifying MPM values,
/// rounded to two decimals. Below `MIN_QUALIFYING_SESSIONS` no handicap is produced.
pub fn calculate_handicap_from_sessions<'a, I>(sessions: I) -> HandicapCalculation
where
    I: IntoIterator<Item = &'a Value>,
{
    let mut mpm_values: Vec<f64> = sessions.into_iter().filter_map(qualifying_mpm).collect();
    let qualifying = mpm_values.len();

    info!(qualifying_sessions = qualifying, "Filtered qualifying sessions");

    if qualifying < MIN_QUALIFYING_SESSIONS {
        return HandicapCalculation::Insufficient {
            qualifying_sessions: qualifying,
            message: format!(
                "Need {} more qualifying sessions (5+ minutes, timed/practice)",
                MIN_QUALIFYING_SESSIONS - qualifying
            ),
        };
    }

    mpm_values.sort_by(f64::total_cmp);

    let p50_index = (qualifying as f64 * 0.50).floor() as usize;
    let p75_index = (qualifying as f64 * 0.75).ceil() as usize;
    let middle_upper = &mpm_values[p50_index..p75_index];

    let mean = middle_upper.iter().sum::<f64>() / middle_upper.len() as f64;
    let min = middle_upper.iter().copied().fold(f64::INFINITY, f64::min);
    let max = middle_upper.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    info!(
        handicap = mean,
        values_used = middle_upper.len(),
        "Calculated handicap from 50-75th percentile"
    );

    HandicapCalculation::Calculated {
        handicap: round_to(mean, 2),
        qualifying_sessions: qualifying,
        percentile_data: PercentileData {
            p50: mpm_values[p50_index],
            p75: mpm_values[p75_index - 1],
            values_used: middle_upper.len(),
            range: [min, max],
        },
    }
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

pub fn hours_since(last_calculated: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    (now - last_calculated).num_milliseconds() as f64 / 3_600_000.0
}

/// Hours since the last calculation (one decimal) while it is still inside the cooldown
pub fn within_cooldown(
    last_calculated: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    cooldown_hours: f64,
) -> Option<f64> {
    let hours = hours_since(last_calculated?, now);
    (hours < cooldown_hours).then(|| round_to(hours, 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use serde_json::json;

    fn session(kind: &str, duration: i64, mpm: f64) -> Value {
        json!({
            "session_type": kind,
            "session_duration": duration,
            "makes_per_minute": mpm,
        })
    }

    #[test]
    fn test_qualifying_filter() {
        assert_eq!(qualifying_mpm(&session("timed", 300, 4.2)), Some(4.2));
        assert_eq!(qualifying_mpm(&session("practice", 900, 3.0)), Some(3.0));
        assert_eq!(qualifying_mpm(&session("shootout", 900, 3.0)), None);
        assert_eq!(qualifying_mpm(&session("timed", 299, 3.0)), None);
        assert_eq!(qualifying_mpm(&session("timed", 600, 0.0)), None);
        assert_eq!(qualifying_mpm(&session("timed", 600, -1.0)), None);
    }

    #[test]
    fn test_qualifying_defaults_and_string_values() {
        let data = json!({"session_duration": "420.9", "makes_per_minute": "5.5"});
        assert_eq!(qualifying_mpm(&data), Some(5.5));

        let missing_mpm = json!({"session_duration": 600});
        assert_eq!(qualifying_mpm(&missing_mpm), None);

        let garbage = json!({"session_duration": "long", "makes_per_minute": 5});
        assert_eq!(qualifying_mpm(&garbage), None);
    }

    #[test]
    fn test_insufficient_sessions() {
        let sessions: Vec<Value> = (0..20).map(|i| session("timed", 600, 1.0 + i as f64)).collect();
        let result = calculate_handicap_from_sessions(&sessions);

        assert_eq!(
            result,
            HandicapCalculation::Insufficient {
                qualifying_sessions: 20,
                message: "Need 1 more qualifying sessions (5+ minutes, timed/practice)".to_string(),
            }
        );
    }

    #[test]
    fn test_non_qualifying_sessions_are_not_counted() {
        let mut sessions: Vec<Value> = (0..21).map(|_| session("shootout", 600, 3.0)).collect();
        sessions.push(session("timed", 600, 3.0));

        let result = calculate_handicap_from_sessions(&sessions);
        assert_eq!(result.qualifying_sessions(), 1);
    }

    #[test]
    fn test_percentile_average() {
        // MPM values 1..=24 in descending order; p50 index 12, p75 index 18
        let sessions: Vec<Value> = (1..=24)
            .rev()
            .map(|i| session("practice", 600, i as f64))
            .collect();

        match calculate_handicap_from_sessions(&sessions) {
            HandicapCalculation::Calculated {
                handicap,
                qualifying_sessions,
                percentile_data,
            } => {
                // mean of 13..=18
                assert_eq!(handicap, 15.5);
                assert_eq!(qualifying_sessions, 24);
                assert_eq!(percentile_data.p50, 13.0);
                assert_eq!(percentile_data.p75, 18.0);
                assert_eq!(percentile_data.values_used, 6);
                assert_eq!(percentile_data.range, [13.0, 18.0]);
            }
            other => panic!("expected a handicap, got {:?}", other),
        }
    }

    #[test]
    fn test_outliers_fall_outside_percentile_band() {
        // 21 values: p50 index 10, p75 index 16 (ceil 15.75)
        let mut sessions: Vec<Value> = (0..21).map(|_| session("timed", 600, 4.0)).collect();
        sessions[0] = session("timed", 600, 100.0);
        sessions[1] = session("timed", 600, 4.1);
        sessions[2] = session("timed", 600, 4.1);

        match calculate_handicap_from_sessions(&sessions) {
            HandicapCalculation::Calculated { handicap, percentile_data, .. } => {
                assert_eq!(percentile_data.values_used, 6);
                // sorted: eighteen 4.0, two 4.1, one 100; slice 10..16 is all 4.0
                assert_eq!(handicap, 4.0);
            }
            other => panic!("expected a handicap, got {:?}", other),
        }
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(3.14159, 2), 3.14);
        assert_eq!(round_to(4.126, 2), 4.13);
        assert_eq!(round_to(1.44, 1), 1.4);
    }

    #[test]
    fn test_cooldown() {
        let now = Utc::now();

        assert_eq!(within_cooldown(None, now, 24.0), None);
        assert_eq!(within_cooldown(Some(now - Duration::hours(25)), now, 24.0), None);
        assert_eq!(
            within_cooldown(Some(now - Duration::minutes(90)), now, 24.0),
            Some(1.5)
        );
    }

    #[test]
    fn test_percentile_data_serializes_camel_case() {
        let data = PercentileData {
            p50: 3.0,
            p75: 4.0,
            values_used: 6,
            range: [3.0, 4.0],
        };
        assert_eq!(
            serde_json::to_value(&data).unwrap(),
            json!({"p50": 3.0, "p75": 4.0, "valuesUsed": 6, "range": [3.0, 4.0]})
        );
    }
}
