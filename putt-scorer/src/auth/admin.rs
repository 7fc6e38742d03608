use axum::http::HeaderMap;
use sqlx::PgPool;
use tracing::warn;

use crate::api::error::ApiError;
use crate::db::queries;
use crate::models::db::PlayerRecord;
use super::jwt::authenticate;

/// Authenticate the request and require the player to hold the admin role
#[tracing::instrument(skip(pool, headers, secret))]
pub async fn require_admin(
    pool: &PgPool,
    headers: &HeaderMap,
    secret: &str,
) -> Result<PlayerRecord, ApiError> {
    let player_id = authenticate(headers, secret)?;

    let player = queries::get_player(pool, player_id)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Authentication required".to_string()))?;

    if !player.is_admin() {
        warn!(player_id, "Non-admin attempted admin action");
        return Err(ApiError::Forbidden("Admin access required".to_string()));
    }

    Ok(player)
}
