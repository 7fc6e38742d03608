// Handicap endpoints: stored handicap lookup, recalculation, profile update,
// score adjustment and player comparison

use std::collections::HashMap;

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::HeaderMap,
    Json,
};
use tracing::info;

use crate::api::error::ApiResult;
use crate::api::state::AppState;
use crate::auth::authenticate;
use crate::domain::competition::{score_session, ScoringMode};
use crate::domain::handicap::format_handicap;
use crate::domain::player_handicap::{self, RecalculationOutcome};
use crate::models::api::{
    AdjustScoreRequest, AdjustScoreResponse, CompareResponse, MessageResponse,
    PlayerHandicapResponse, PlayerHandicapSummary, ProfileUpdateRequest, RecalculateRequest,
    RecalculateResponse,
};
use crate::models::db::PlayerHandicapRecord;
use super::{optional_json, query_id};

/// GET /api/calculate-handicap?player_id=N
#[tracing::instrument(skip(state))]
pub async fn get_handicap_handler(
    Query(params): Query<HashMap<String, String>>,
    State(state): State<AppState>,
) -> ApiResult<Json<PlayerHandicapResponse>> {
    let player_id = query_id(&params, "player_id")?;

    let record = player_handicap::get_player_handicap(&state.pool, player_id).await?;

    Ok(Json(PlayerHandicapResponse {
        success: true,
        handicap: record.handicap_mpm(),
        last_calculated: record.handicap_last_calculated,
        qualifying_sessions: record.handicap_qualifying_sessions.unwrap_or(0),
    }))
}

/// POST /api/calculate-handicap
/// Authentication: JWT; recalculates the token holder's handicap
#[tracing::instrument(skip(state, headers, body))]
pub async fn recalculate_handicap_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Json<RecalculateResponse>> {
    let player_id = authenticate(&headers, &state.config.jwt_secret)?;
    let request: RecalculateRequest = optional_json(&body)?;

    info!(player_id, force = request.force, "Processing handicap recalculation");

    let outcome = player_handicap::recalculate_player_handicap(
        &state.pool,
        player_id,
        request.force,
        state.config.handicap_cooldown_hours,
    )
    .await?;

    Ok(Json(recalculation_response(outcome)))
}

fn recalculation_response(outcome: RecalculationOutcome) -> RecalculateResponse {
    match outcome {
        RecalculationOutcome::RecentlyCalculated {
            handicap,
            hours_since_last_calc,
        } => RecalculateResponse {
            success: true,
            handicap,
            qualifying_sessions: None,
            percentile_data: None,
            hours_since_last_calc: Some(hours_since_last_calc),
            message: "Handicap was recently calculated. Use force=true to recalculate.".to_string(),
        },
        RecalculationOutcome::Insufficient {
            qualifying_sessions,
            message,
        } => RecalculateResponse {
            success: true,
            handicap: None,
            qualifying_sessions: Some(qualifying_sessions),
            percentile_data: None,
            hours_since_last_calc: None,
            message,
        },
        RecalculationOutcome::Calculated {
            handicap,
            qualifying_sessions,
            percentile_data,
        } => RecalculateResponse {
            success: true,
            handicap: Some(handicap),
            qualifying_sessions: Some(qualifying_sessions),
            percentile_data: Some(percentile_data),
            hours_since_last_calc: None,
            message: "Handicap calculated successfully".to_string(),
        },
    }
}

/// PUT /api/calculate-handicap
/// Authentication: JWT; updates the token holder's profile fields
#[tracing::instrument(skip(state, headers, body))]
pub async fn update_profile_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Json<MessageResponse>> {
    let player_id = authenticate(&headers, &state.config.jwt_secret)?;
    let update: ProfileUpdateRequest = optional_json(&body)?;

    player_handicap::update_player_profile(&state.pool, player_id, &update).await?;

    Ok(Json(MessageResponse::ok("Profile updated successfully")))
}

/// POST /api/handicap/adjust
/// Scores one session under a competition's rules; no database access
#[tracing::instrument(skip(state, body))]
pub async fn adjust_score_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<Json<AdjustScoreResponse>> {
    let request: AdjustScoreRequest = serde_json::from_slice(&body)?;

    let pace = request
        .avg_putts_per_minute
        .unwrap_or(state.config.shootout_avg_putts_per_minute);

    let scored = score_session(&request.session, request.handicap, request.rules.as_ref(), pace)?;

    Ok(Json(AdjustScoreResponse {
        success: true,
        mode: scored.mode,
        raw_score: scored.raw_score,
        adjusted_score: scored.adjusted_score,
        handicap_applied: scored.handicap_applied,
        display_handicap: format_handicap(request.handicap, scored.mode == ScoringMode::Shootout),
    }))
}

fn summary(record: &PlayerHandicapRecord) -> PlayerHandicapSummary {
    PlayerHandicapSummary {
        player_id: record.id,
        handicap: record.handicap_mpm(),
        display: format_handicap(record.handicap_mpm(), false),
    }
}

/// GET /api/handicap/compare?player1=A&player2=B
#[tracing::instrument(skip(state))]
pub async fn compare_handicaps_handler(
    Query(params): Query<HashMap<String, String>>,
    State(state): State<AppState>,
) -> ApiResult<Json<CompareResponse>> {
    let player1 = query_id(&params, "player1")?;
    let player2 = query_id(&params, "player2")?;

    let (first, second, comparison) =
        player_handicap::compare_players(&state.pool, player1, player2).await?;

    Ok(Json(CompareResponse {
        success: true,
        player1: summary(&first),
        player2: summary(&second),
        stronger: comparison.stronger,
        weaker: comparison.weaker,
        difference: comparison.difference,
    }))
}
