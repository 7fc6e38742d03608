use chrono::Utc;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::info;

use crate::db::queries;
use crate::models::api::ProfileUpdateRequest;
use crate::models::db::PlayerHandicapRecord;
use super::handicap::{handicap_difference, HandicapComparison};
use super::handicap_calculation::{
    calculate_handicap_from_sessions, within_cooldown, HandicapCalculation, PercentileData,
};
use super::DomainError;

#[derive(Debug, Clone, PartialEq)]
pub enum RecalculationOutcome {
    /// Skipped because the last calculation is inside the cooldown window
    RecentlyCalculated {
        handicap: Option<f64>,
        hours_since_last_calc: f64,
    },
    Insufficient {
        qualifying_sessions: usize,
        message: String,
    },
    Calculated {
        handicap: f64,
        qualifying_sessions: usize,
        percentile_data: PercentileData,
    },
}

#[tracing::instrument(skip(pool))]
pub async fn get_player_handicap(
    pool: &PgPool,
    player_id: i32,
) -> Result<PlayerHandicapRecord, DomainError> {
    queries::get_player_handicap(pool, player_id)
        .await?
        .ok_or_else(|| DomainError::NotFound("Player not found".to_string()))
}

/// Recalculate a player's handicap from their session history and persist it.
///
/// Unless `force` is set, a calculation younger than `cooldown_hours` is reused.
#[tracing::instrument(skip(pool))]
pub async fn recalculate_player_handicap(
    pool: &PgPool,
    player_id: i32,
    force: bool,
    cooldown_hours: f64,
) -> Result<RecalculationOutcome, DomainError> {
    let current = get_player_handicap(pool, player_id).await?;

    if !force {
        if let Some(hours) = within_cooldown(current.handicap_last_calculated, Utc::now(), cooldown_hours) {
            info!(hours_since_last_calc = hours, "Handicap recently calculated, skipping");
            return Ok(RecalculationOutcome::RecentlyCalculated {
                handicap: current.handicap_mpm(),
                hours_since_last_calc: hours,
            });
        }
    }

    let sessions = queries::load_player_sessions(pool, player_id).await?;
    let calculation = calculate_handicap_from_sessions(sessions.iter().map(|s| &s.data));

    let qualifying = i32::try_from(calculation.qualifying_sessions())
        .map_err(|e| DomainError::Internal(format!("Qualifying session count overflow: {}", e)))?;

    let mut tx = pool.begin().await?;

    let outcome = match calculation {
        HandicapCalculation::Insufficient {
            qualifying_sessions,
            message,
        } => {
            queries::record_insufficient_sessions(&mut tx, player_id, qualifying).await?;
            RecalculationOutcome::Insufficient {
                qualifying_sessions,
                message,
            }
        }
        HandicapCalculation::Calculated {
            handicap,
            qualifying_sessions,
            percentile_data,
        } => {
            let stored = Decimal::from_f64(handicap)
                .ok_or_else(|| DomainError::Internal(format!("Handicap {} is not representable", handicap)))?
                .round_dp(2);
            queries::record_handicap(&mut tx, player_id, stored, qualifying, &percentile_data).await?;
            RecalculationOutcome::Calculated {
                handicap,
                qualifying_sessions,
                percentile_data,
            }
        }
    };

    tx.commit().await?;

    Ok(outcome)
}

/// Load two players' handicaps and compare them
#[tracing::instrument(skip(pool))]
pub async fn compare_players(
    pool: &PgPool,
    player1: i32,
    player2: i32,
) -> Result<(PlayerHandicapRecord, PlayerHandicapRecord, HandicapComparison), DomainError> {
    let first = get_player_handicap(pool, player1).await?;
    let second = get_player_handicap(pool, player2).await?;
    let comparison = handicap_difference(first.handicap_mpm(), second.handicap_mpm());

    Ok((first, second, comparison))
}

#[tracing::instrument(skip(pool, update))]
pub async fn update_player_profile(
    pool: &PgPool,
    player_id: i32,
    update: &ProfileUpdateRequest,
) -> Result<(), DomainError> {
    if update.is_empty() {
        return Err(DomainError::Validation("No fields to update".to_string()));
    }

    let updated = queries::update_profile(pool, player_id, update).await?;
    if updated == 0 {
        return Err(DomainError::NotFound("Player not found".to_string()));
    }

    Ok(())
}
