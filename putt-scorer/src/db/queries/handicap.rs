use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::{debug, info};

use crate::db::errors::Result;
use crate::domain::handicap_calculation::PercentileData;
use crate::models::db::SessionRecord;

/// All sessions with data for a player, oldest first
#[tracing::instrument(skip(pool))]
pub async fn load_player_sessions(pool: &PgPool, player_id: i32) -> Result<Vec<SessionRecord>> {
    let records = sqlx::query_as::<_, SessionRecord>(
        r#"
        SELECT data, created_at
        FROM sessions
        WHERE player_id = $1 AND data IS NOT NULL
        ORDER BY created_at ASC
        "#,
    )
    .bind(player_id)
    .fetch_all(pool)
    .await?;

    debug!("Loaded {} sessions for player {}", records.len(), player_id);
    Ok(records)
}

/// Record that a calculation ran but the player is still short of qualifying sessions.
/// The stored handicap is left as it was.
#[tracing::instrument(skip(tx))]
pub async fn record_insufficient_sessions(
    tx: &mut Transaction<'_, Postgres>,
    player_id: i32,
    qualifying_sessions: i32,
) -> Result<()> {
    sqlx::query(
        r#"
        UPDATE users
        SET handicap_qualifying_sessions = $1,
            handicap_last_calculated = NOW()
        WHERE id = $2
        "#,
    )
    .bind(qualifying_sessions)
    .bind(player_id)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

/// Store a new handicap on the player and append it to handicap_history
#[tracing::instrument(skip(tx, percentile_data))]
pub async fn record_handicap(
    tx: &mut Transaction<'_, Postgres>,
    player_id: i32,
    handicap: Decimal,
    qualifying_sessions: i32,
    percentile_data: &PercentileData,
) -> Result<()> {
    sqlx::query(
        r#"
        UPDATE users
        SET handicap = $1,
            handicap_last_calculated = NOW(),
            handicap_qualifying_sessions = $2
        WHERE id = $3
        "#,
    )
    .bind(handicap)
    .bind(qualifying_sessions)
    .bind(player_id)
    .execute(&mut **tx)
    .await?;

    sqlx::query(
        r#"
        INSERT INTO handicap_history (player_id, handicap_value, qualifying_sessions, calculation_data)
        VALUES ($1, $2, $3, $4)
        "#,
    )
    .bind(player_id)
    .bind(handicap)
    .bind(qualifying_sessions)
    .bind(serde_json::to_value(percentile_data)?)
    .execute(&mut **tx)
    .await?;

    info!(%handicap, "Stored handicap and history entry");
    Ok(())
}
