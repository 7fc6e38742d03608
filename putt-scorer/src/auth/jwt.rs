use axum::http::HeaderMap;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::error::ApiError;

/// Claims issued by the login endpoint. `playerId` has been written both as a
/// number and as a numeric string over time.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    #[serde(rename = "playerId")]
    player_id: Value,
    exp: i64,
}

fn player_id_from_claim(claim: &Value) -> Option<i32> {
    match claim {
        Value::Number(n) => n.as_i64().and_then(|id| i32::try_from(id).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Validate an HS256 token and return the player it was issued to
pub fn validate_jwt_and_extract_player_id(token: &str, secret: &str) -> Result<i32, ApiError> {
    let validation = Validation::new(Algorithm::HS256);

    let token_data = decode::<Claims>(token, &DecodingKey::from_secret(secret.as_bytes()), &validation)
        .map_err(|e| {
            tracing::warn!("JWT validation failed: {}", e);
            ApiError::Unauthorized("Authentication required".to_string())
        })?;

    player_id_from_claim(&token_data.claims.player_id)
        .ok_or_else(|| ApiError::Unauthorized("Token does not identify a player".to_string()))
}

/// Extract JWT token from Authorization header
/// Expected format: "Bearer <token>"
pub fn extract_jwt_from_header(auth_header: Option<&str>) -> Result<&str, ApiError> {
    let auth_value = auth_header.ok_or_else(|| {
        ApiError::Unauthorized("Authentication required".to_string())
    })?;

    auth_value
        .strip_prefix("Bearer ")
        .filter(|token| !token.is_empty())
        .ok_or_else(|| {
            ApiError::Unauthorized("Invalid Authorization header format, expected 'Bearer <token>'".to_string())
        })
}

/// Authenticate a request from its headers and return the player id
pub fn authenticate(headers: &HeaderMap, secret: &str) -> Result<i32, ApiError> {
    let auth_header = headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());
    let token = extract_jwt_from_header(auth_header)?;
    validate_jwt_and_extract_player_id(token, secret)
}
