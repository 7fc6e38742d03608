use sqlx::{PgPool, Postgres, Transaction};
use serde_json::Value;

use crate::db::errors::Result;

#[tracing::instrument(skip(pool))]
pub async fn gift_code_exists(pool: &PgPool, gift_code: &str) -> Result<bool> {
    let exists: bool = sqlx::query_scalar(
        r#"
        SELECT EXISTS(
            SELECT 1 FROM user_gift_subscriptions
            WHERE gift_code = $1
        )
        "#,
    )
    .bind(gift_code)
    .fetch_one(pool)
    .await?;

    Ok(exists)
}

#[tracing::instrument(skip(tx, reason))]
pub async fn insert_gift_code(
    tx: &mut Transaction<'_, Postgres>,
    owner_player_id: i32,
    gift_code: &str,
    bundle_id: Option<i32>,
    admin_id: i32,
    reason: &str,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO user_gift_subscriptions (
            owner_user_id,
            gift_code,
            bundle_id,
            is_redeemed,
            granted_by_admin_id,
            grant_reason,
            granted_at,
            created_at
        ) VALUES ($1, $2, $3, FALSE, $4, $5, NOW(), NOW())
        "#,
    )
    .bind(owner_player_id)
    .bind(gift_code)
    .bind(bundle_id)
    .bind(admin_id)
    .bind(reason)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

#[tracing::instrument(skip(tx, action_data))]
pub async fn log_admin_action(
    tx: &mut Transaction<'_, Postgres>,
    admin_id: i32,
    action_type: &str,
    target_type: &str,
    target_id: i32,
    action_data: Value,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO admin_action_logs (admin_id, action_type, target_type, target_id, action_data, created_at)
        VALUES ($1, $2, $3, $4, $5, NOW())
        ON CONFLICT DO NOTHING
        "#,
    )
    .bind(admin_id)
    .bind(action_type)
    .bind(target_type)
    .bind(target_id)
    .bind(action_data)
    .execute(&mut **tx)
    .await?;

    Ok(())
}
