use sqlx::PgPool;
use uuid::Uuid;

use crate::actions::validate::validate_action;
use crate::actions::{ActionError, ActionHandlerRegistry};
use crate::models::{Action, ActionDraft};

/// Failure on the action write path. Validation failures roll the write
/// back before anything is persisted.
#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    #[error(transparent)]
    Invalid(#[from] ActionError),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub async fn list(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<Action>, sqlx::Error> {
    sqlx::query_as::<_, Action>(
        "SELECT * FROM actions ORDER BY date_added DESC LIMIT $1 OFFSET $2",
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Action>, sqlx::Error> {
    sqlx::query_as::<_, Action>("SELECT * FROM actions WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn create(
    pool: &PgPool,
    registry: &ActionHandlerRegistry,
    draft: &ActionDraft,
) -> Result<Action, WriteError> {
    let mut tx = pool.begin().await?;

    let action_type = validate_action(registry, &draft.action_type, &draft.config, &draft.data)?;

    let action = sqlx::query_as::<_, Action>(
        "INSERT INTO actions (id, action_type, config, data, integration_id)
         VALUES ($1, $2, $3, $4, $5) RETURNING *",
    )
    .bind(Uuid::now_v7())
    .bind(action_type.as_str())
    .bind(&draft.config)
    .bind(&draft.data)
    .bind(draft.integration_id)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(action)
}

/// Returns `Ok(None)` when no action has this id.
pub async fn update(
    pool: &PgPool,
    registry: &ActionHandlerRegistry,
    id: Uuid,
    draft: &ActionDraft,
) -> Result<Option<Action>, WriteError> {
    let mut tx = pool.begin().await?;

    let action_type = validate_action(registry, &draft.action_type, &draft.config, &draft.data)?;

    let action = sqlx::query_as::<_, Action>(
        "UPDATE actions
         SET action_type = $2, config = $3, data = $4, integration_id = $5, date_updated = now()
         WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(action_type.as_str())
    .bind(&draft.config)
    .bind(&draft.data)
    .bind(draft.integration_id)
    .fetch_optional(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(action)
}

/// Returns whether a row was deleted.
pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM actions WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
