use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{NewNotificationMessage, NotificationMessage};

pub async fn create(
    pool: &PgPool,
    data: &NewNotificationMessage,
) -> Result<NotificationMessage, sqlx::Error> {
    sqlx::query_as::<_, NotificationMessage>(
        "INSERT INTO notification_messages
            (action_id, group_id, open_period_start, message_identifier,
             parent_notification_message_id, error_code, error_details)
         VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *",
    )
    .bind(data.action_id)
    .bind(data.group_id)
    .bind(data.open_period_start)
    .bind(&data.message_identifier)
    .bind(data.parent_notification_message_id)
    .bind(data.error_code)
    .bind(&data.error_details)
    .fetch_one(pool)
    .await
}

/// The earliest successful top-level message for an action and group,
/// scoped to the open period when one is given.
pub async fn find_parent(
    pool: &PgPool,
    action_id: Uuid,
    group_id: i64,
    open_period_start: Option<DateTime<Utc>>,
) -> Result<Option<NotificationMessage>, sqlx::Error> {
    sqlx::query_as::<_, NotificationMessage>(
        "SELECT * FROM notification_messages
         WHERE action_id = $1 AND group_id = $2
           AND open_period_start IS NOT DISTINCT FROM $3
           AND parent_notification_message_id IS NULL
           AND error_code IS NULL AND error_details IS NULL
         ORDER BY date_added ASC LIMIT 1",
    )
    .bind(action_id)
    .bind(group_id)
    .bind(open_period_start)
    .fetch_optional(pool)
    .await
}

pub async fn list_by_action(
    pool: &PgPool,
    action_id: Uuid,
    limit: i64,
    offset: i64,
) -> Result<Vec<NotificationMessage>, sqlx::Error> {
    sqlx::query_as::<_, NotificationMessage>(
        "SELECT * FROM notification_messages WHERE action_id = $1
         ORDER BY date_added DESC LIMIT $2 OFFSET $3",
    )
    .bind(action_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
}
