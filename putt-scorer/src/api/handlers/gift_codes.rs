use axum::{body::Bytes, extract::State, http::HeaderMap, Json};
use tracing::info;

use crate::api::error::ApiResult;
use crate::api::state::AppState;
use crate::auth::require_admin;
use crate::domain::gift_codes::grant_gift_codes;
use crate::models::api::{GrantGiftCodesRequest, GrantGiftCodesResponse};
use super::optional_json;

/// POST /api/admin/gift-codes/generate
/// Authentication: JWT of a player with the admin role
#[tracing::instrument(skip(state, headers, body))]
pub async fn generate_gift_codes_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Json<GrantGiftCodesResponse>> {
    let admin = require_admin(&state.pool, &headers, &state.config.jwt_secret).await?;
    let request: GrantGiftCodesRequest = optional_json(&body)?;

    info!(admin_id = admin.player_id, "Admin generating gift codes");

    let granted = grant_gift_codes(&state.pool, admin.player_id, &request).await?;

    Ok(Json(GrantGiftCodesResponse {
        success: true,
        message: format!("Successfully generated {} gift codes", granted.quantity),
        data: granted,
    }))
}
