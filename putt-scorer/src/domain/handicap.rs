use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use thiserror::Error;

/// Reference putting pace used to turn a shootout's attempt count into minutes
pub const DEFAULT_AVG_PUTTS_PER_MINUTE: f64 = 12.0;

/// Display placeholder for players without a handicap
pub const NO_HANDICAP_PLACEHOLDER: &str = "\u{2014}";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum HandicapError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, HandicapError>;

/// Which player (1 or 2) is stronger, and by how many makes per minute
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HandicapComparison {
    pub stronger: Option<u8>,
    pub weaker: Option<u8>,
    pub difference: f64,
}

/// A handicap counts only when it is present and non-zero
fn active_handicap(handicap_mpm: Option<f64>) -> Option<f64> {
    handicap_mpm.filter(|h| *h != 0.0 && !h.is_nan())
}

fn validate_makes(total_makes: i64) -> Result<f64> {
    if total_makes < 0 {
        return Err(HandicapError::InvalidInput(format!(
            "total_makes must be non-negative, got {}",
            total_makes
        )));
    }
    Ok(total_makes as f64)
}

fn validate_handicap(handicap_mpm: Option<f64>) -> Result<()> {
    match handicap_mpm {
        Some(h) if h.is_infinite() || h < 0.0 => Err(HandicapError::InvalidInput(format!(
            "handicap must be a non-negative number, got {}",
            h
        ))),
        _ => Ok(()),
    }
}

/// Apply a handicap to a timed session.
///
/// The handicap is the player's expected makes per minute. The adjustment is the gap
/// between what the player made and what the handicap predicts over the same duration,
/// so beating the handicap raises the score and falling short lowers it, never below 0.
///
/// # Arguments
/// * `total_makes` - Raw makes recorded in the session
/// * `duration_seconds` - Session length, must be positive
/// * `handicap_mpm` - Stored handicap; `None` or `0.0` returns the raw makes
pub fn adjust_timed(
    total_makes: i64,
    duration_seconds: f64,
    handicap_mpm: Option<f64>,
) -> Result<f64> {
    let makes = validate_makes(total_makes)?;
    if !duration_seconds.is_finite() || duration_seconds <= 0.0 {
        return Err(HandicapError::InvalidInput(format!(
            "duration_seconds must be positive, got {}",
            duration_seconds
        )));
    }
    validate_handicap(handicap_mpm)?;

    let Some(handicap) = active_handicap(handicap_mpm) else {
        return Ok(makes);
    };

    let duration_minutes = duration_seconds / 60.0;
    // (actual_mpm - handicap) * minutes, with actual_mpm * minutes folded back to makes
    let adjustment = makes - handicap * duration_minutes;

    Ok((makes + adjustment).max(0.0))
}

/// Apply a handicap to a shootout (fixed number of attempts).
///
/// Shootouts have no clock, so the duration is estimated from `max_attempts` at
/// `avg_putts_per_minute`, then the same expected-vs-actual delta as the timed mode is
/// applied. The result is rounded to a whole number.
pub fn adjust_shootout(
    total_makes: i64,
    max_attempts: i64,
    handicap_mpm: Option<f64>,
    avg_putts_per_minute: f64,
) -> Result<u64> {
    let makes = validate_makes(total_makes)?;
    if max_attempts <= 0 {
        return Err(HandicapError::InvalidInput(format!(
            "max_attempts must be positive, got {}",
            max_attempts
        )));
    }
    if !avg_putts_per_minute.is_finite() || avg_putts_per_minute <= 0.0 {
        return Err(HandicapError::InvalidInput(format!(
            "avg_putts_per_minute must be positive, got {}",
            avg_putts_per_minute
        )));
    }
    validate_handicap(handicap_mpm)?;

    let Some(handicap) = active_handicap(handicap_mpm) else {
        return Ok(total_makes as u64);
    };

    let estimated_minutes = max_attempts as f64 / avg_putts_per_minute;
    let expected_makes = handicap * estimated_minutes;
    let handicap_strokes = makes - expected_makes;

    Ok((makes + handicap_strokes).max(0.0).round() as u64)
}

/// Compare two players' handicaps. A missing or zero handicap always loses to a present one.
pub fn handicap_difference(handicap1: Option<f64>, handicap2: Option<f64>) -> HandicapComparison {
    match (active_handicap(handicap1), active_handicap(handicap2)) {
        (None, None) => HandicapComparison {
            stronger: None,
            weaker: None,
            difference: 0.0,
        },
        (None, Some(h2)) => HandicapComparison {
            stronger: Some(2),
            weaker: Some(1),
            difference: h2,
        },
        (Some(h1), None) => HandicapComparison {
            stronger: Some(1),
            weaker: Some(2),
            difference: h1,
        },
        (Some(h1), Some(h2)) => {
            let (stronger, weaker) = if h1 > h2 { (1, 2) } else { (2, 1) };
            HandicapComparison {
                stronger: Some(stronger),
                weaker: Some(weaker),
                difference: (h1 - h2).abs(),
            }
        }
    }
}

/// Format a handicap for display
pub fn format_handicap(handicap: Option<f64>, round_for_shootout: bool) -> String {
    let Some(handicap) = active_handicap(handicap) else {
        return NO_HANDICAP_PLACEHOLDER.to_string();
    };

    if round_for_shootout {
        // halves round up, e.g. 4.5 -> 5 and -4.5 -> -4
        format!("{}", (handicap + 0.5).floor() as i64)
    } else {
        format_two_places(handicap)
    }
}

/// Two decimal places with exact ties rounded away from zero (4.125 -> "4.13").
/// The exact binary value is kept, so 1.005 (stored just below the tie) still gives "1.00".
fn format_two_places(value: f64) -> String {
    match Decimal::from_f64_retain(value) {
        Some(exact) => format!(
            "{:.2}",
            exact.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        ),
        None => format!("{:.2}", value),
    }
}
