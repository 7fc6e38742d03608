// API handlers - thin HTTP orchestration layer
// Handlers only deal with HTTP concerns:
// 1. Extract parameters from request
// 2. Perform authentication/authorization
// 3. Call domain logic
// 4. Transform domain result to HTTP response

pub mod gift_codes;
pub mod handicap;

pub use gift_codes::generate_gift_codes_handler;
pub use handicap::{
    adjust_score_handler, compare_handicaps_handler, get_handicap_handler,
    recalculate_handicap_handler, update_profile_handler,
};

use std::collections::HashMap;

use super::error::ApiError;

/// Parse a required integer id from the query string
pub(crate) fn query_id(params: &HashMap<String, String>, key: &str) -> Result<i32, ApiError> {
    let raw = params
        .get(key)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::BadRequest(format!("{} is required", key)))?;

    raw.parse::<i32>()
        .map_err(|_| ApiError::BadRequest(format!("{} must be an integer", key)))
}

/// Parse an optional JSON body; an empty body yields the type's default
pub(crate) fn optional_json<T>(body: &[u8]) -> Result<T, ApiError>
where
    T: serde::de::DeserializeOwned + Default,
{
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    Ok(serde_json::from_slice(body)?)
}
