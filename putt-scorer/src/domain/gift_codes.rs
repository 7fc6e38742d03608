use std::future::Future;

use rand::{rngs::OsRng, RngCore};
use serde_json::json;
use sqlx::PgPool;
use thiserror::Error;
use tracing::{info, warn};

use crate::db::queries;
use crate::db::DatabaseError;
use crate::models::api::{GrantGiftCodesRequest, GrantedGiftCodes};
use super::DomainError;

pub const GIFT_CODE_ALPHABET: &[u8; 36] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
pub const GIFT_CODE_LENGTH: usize = 7;
pub const MAX_GRANT_QUANTITY: i64 = 100;

/// Draws allowed per requested code before giving up
const ATTEMPTS_PER_CODE: usize = 10;

#[derive(Error, Debug)]
pub enum GiftCodeError {
    #[error("Failed to generate {quantity} unique codes after {attempts} attempts")]
    Exhausted { quantity: usize, attempts: usize },

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

/// A 7-character uppercase alphanumeric code from the OS random source, e.g. `A3K9M2P`
pub fn generate_gift_code() -> String {
    let mut bytes = [0u8; GIFT_CODE_LENGTH];
    OsRng.fill_bytes(&mut bytes);

    bytes
        .iter()
        .map(|b| GIFT_CODE_ALPHABET[*b as usize % GIFT_CODE_ALPHABET.len()] as char)
        .collect()
}

/// Generate `quantity` distinct codes that `exists` reports as unused
pub async fn generate_unique_gift_codes<F, Fut>(
    quantity: usize,
    exists: F,
) -> Result<Vec<String>, GiftCodeError>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<bool, DatabaseError>>,
{
    generate_unique_with(quantity, generate_gift_code, exists).await
}

async fn generate_unique_with<G, F, Fut>(
    quantity: usize,
    mut generate: G,
    mut exists: F,
) -> Result<Vec<String>, GiftCodeError>
where
    G: FnMut() -> String,
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<bool, DatabaseError>>,
{
    let max_attempts = quantity * ATTEMPTS_PER_CODE;
    let mut codes: Vec<String> = Vec::with_capacity(quantity);
    let mut attempts = 0;

    while codes.len() < quantity && attempts < max_attempts {
        let code = generate();
        attempts += 1;

        if codes.contains(&code) {
            continue;
        }
        if !exists(code.clone()).await? {
            codes.push(code);
        }
    }

    if codes.len() < quantity {
        warn!(quantity, attempts, "Gift code generation exhausted");
        return Err(GiftCodeError::Exhausted {
            quantity,
            attempts: max_attempts,
        });
    }

    Ok(codes)
}

/// Grant freshly generated gift codes to a player on behalf of an admin
#[tracing::instrument(skip(pool, request), fields(player_id = ?request.player_id, quantity = ?request.quantity))]
pub async fn grant_gift_codes(
    pool: &PgPool,
    admin_id: i32,
    request: &GrantGiftCodesRequest,
) -> Result<GrantedGiftCodes, DomainError> {
    let (Some(player_id), Some(quantity), Some(reason)) = (
        request.player_id,
        request.quantity,
        request.reason.as_deref().map(str::trim).filter(|r| !r.is_empty()),
    ) else {
        return Err(DomainError::Validation(
            "playerId, quantity, and reason are required".to_string(),
        ));
    };

    if !(1..=MAX_GRANT_QUANTITY).contains(&quantity) {
        return Err(DomainError::Validation(format!(
            "Quantity must be between 1 and {}",
            MAX_GRANT_QUANTITY
        )));
    }

    let player = queries::get_player(pool, player_id)
        .await?
        .ok_or_else(|| DomainError::NotFound(format!("Player with ID {} not found", player_id)))?;

    let codes = generate_unique_gift_codes(quantity as usize, |code| async move {
        queries::gift_code_exists(pool, &code).await
    })
    .await?;

    let mut tx = pool.begin().await?;

    for code in &codes {
        queries::insert_gift_code(&mut tx, player_id, code, request.bundle_id, admin_id, reason)
            .await
            .map_err(|e| {
                if e.is_unique_violation() {
                    DomainError::Conflict(format!("Gift code {} was claimed concurrently", code))
                } else {
                    e.into()
                }
            })?;
    }

    queries::log_admin_action(
        &mut tx,
        admin_id,
        "manual_gift_code_generation",
        "player",
        player_id,
        json!({
            "quantity": quantity,
            "bundle_id": request.bundle_id,
            "reason": reason,
            "gift_codes": codes,
        }),
    )
    .await?;

    tx.commit().await?;

    info!(admin_id, player_id, count = codes.len(), "Granted gift codes");

    Ok(GrantedGiftCodes {
        player_id,
        player_name: player.name,
        quantity: codes.len(),
        reason: reason.to_string(),
        gift_codes: codes,
    })
}
