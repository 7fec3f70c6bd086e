//! Notification thread bookkeeping.
//!
//! Follow-up notifications for the same group are threaded under the first
//! delivered message. All of this is best effort: a failure here is logged
//! and never blocks the notification itself.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::db;
use crate::models::notification_message::NotificationMessageValidationError;
use crate::models::{NewNotificationMessage, NotificationMessage};

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error(transparent)]
    Validation(#[from] NotificationMessageValidationError),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[async_trait]
pub trait NotificationMessageRepository: Send + Sync {
    async fn create_notification_message(
        &self,
        data: &NewNotificationMessage,
    ) -> Result<NotificationMessage, RepositoryError>;

    /// The first successfully delivered message for this action and group.
    async fn get_parent_notification_message(
        &self,
        action_id: Uuid,
        group_id: i64,
        open_period_start: Option<DateTime<Utc>>,
    ) -> Result<Option<NotificationMessage>, RepositoryError>;
}

pub struct PgNotificationMessageRepository {
    pool: PgPool,
}

impl PgNotificationMessageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationMessageRepository for PgNotificationMessageRepository {
    async fn create_notification_message(
        &self,
        data: &NewNotificationMessage,
    ) -> Result<NotificationMessage, RepositoryError> {
        data.validate()?;
        db::notification_messages::create(&self.pool, data)
            .await
            .map_err(|e| {
                tracing::error!(action_id = %data.action_id, "Failed to save notification message: {e}");
                RepositoryError::from(e)
            })
    }

    async fn get_parent_notification_message(
        &self,
        action_id: Uuid,
        group_id: i64,
        open_period_start: Option<DateTime<Utc>>,
    ) -> Result<Option<NotificationMessage>, RepositoryError> {
        db::notification_messages::find_parent(&self.pool, action_id, group_id, open_period_start)
            .await
            .map_err(|e| {
                tracing::error!(%action_id, group_id, "Failed to load parent notification message: {e}");
                RepositoryError::from(e)
            })
    }
}

#[derive(Clone)]
pub struct NotificationThreads {
    repository: Arc<dyn NotificationMessageRepository>,
    enabled: bool,
}

impl NotificationThreads {
    pub fn new(repository: Arc<dyn NotificationMessageRepository>, enabled: bool) -> Self {
        Self {
            repository,
            enabled,
        }
    }

    /// Message to reply to, or `None` to post a top-level notification.
    pub async fn parent_message(
        &self,
        action_id: Uuid,
        group_id: i64,
        open_period_start: Option<DateTime<Utc>>,
    ) -> Option<NotificationMessage> {
        if !self.enabled {
            return None;
        }

        match self
            .repository
            .get_parent_notification_message(action_id, group_id, open_period_start)
            .await
        {
            Ok(parent) => parent,
            Err(e) => {
                tracing::warn!(%action_id, group_id, "Skipping notification thread lookup: {e}");
                None
            }
        }
    }

    pub async fn save_message(&self, data: NewNotificationMessage) {
        match self.repository.create_notification_message(&data).await {
            Ok(_) => {}
            Err(RepositoryError::Validation(e)) => {
                tracing::info!(
                    action_id = %data.action_id,
                    group_id = data.group_id,
                    "Validation error for new notification message: {e}"
                );
            }
            // Already logged by the repository.
            Err(RepositoryError::Database(_)) => {}
        }
    }
}
