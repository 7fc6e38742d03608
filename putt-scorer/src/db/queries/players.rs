use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::debug;

use crate::db::errors::{DatabaseError, Result};
use crate::models::api::ProfileUpdateRequest;
use crate::models::db::{PlayerHandicapRecord, PlayerRecord};

/// Load the stored handicap for a player
#[tracing::instrument(skip(pool))]
pub async fn get_player_handicap(
    pool: &PgPool,
    player_id: i32,
) -> Result<Option<PlayerHandicapRecord>> {
    let record = sqlx::query_as::<_, PlayerHandicapRecord>(
        r#"
        SELECT id, handicap, handicap_last_calculated, handicap_qualifying_sessions
        FROM users
        WHERE id = $1
        "#,
    )
    .bind(player_id)
    .fetch_optional(pool)
    .await?;

    Ok(record)
}

#[tracing::instrument(skip(executor))]
pub async fn get_player<'e, E>(executor: E, player_id: i32) -> Result<Option<PlayerRecord>>
where
    E: sqlx::Executor<'e, Database = Postgres>,
{
    let record = sqlx::query_as::<_, PlayerRecord>(
        r#"
        SELECT player_id, name, email, is_admin
        FROM players
        WHERE player_id = $1
        "#,
    )
    .bind(player_id)
    .fetch_optional(executor)
    .await?;

    Ok(record)
}

/// Apply the fields present in `update` to the player's profile
#[tracing::instrument(skip(pool, update))]
pub async fn update_profile(
    pool: &PgPool,
    player_id: i32,
    update: &ProfileUpdateRequest,
) -> Result<u64> {
    if update.is_empty() {
        return Err(DatabaseError::InvalidData("No fields to update".to_string()));
    }

    let mut builder: QueryBuilder<Postgres> = QueryBuilder::new("UPDATE users SET ");
    let mut fields = builder.separated(", ");

    if let Some(url) = &update.profile_picture_url {
        fields.push("profile_picture_url = ").push_bind_unseparated(url.clone());
    }
    if let Some(bio) = &update.bio {
        fields.push("bio = ").push_bind_unseparated(bio.clone());
    }
    if let Some(links) = &update.social_links {
        fields.push("social_links = ").push_bind_unseparated(links.clone());
    }

    builder.push(" WHERE id = ").push_bind(player_id);

    debug!(sql = builder.sql(), "Updating profile");

    let result = builder.build().execute(pool).await?;
    Ok(result.rows_affected())
}
