use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct NotificationMessage {
    pub id: i64,
    pub action_id: Uuid,
    pub group_id: i64,
    pub open_period_start: Option<DateTime<Utc>>,
    pub message_identifier: Option<String>,
    pub parent_notification_message_id: Option<i64>,
    pub error_code: Option<i32>,
    pub error_details: Option<serde_json::Value>,
    pub date_added: DateTime<Utc>,
}

/// A record of one delivered (or failed) notification, used to thread
/// follow-up notifications for the same group under the first one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewNotificationMessage {
    pub action_id: Uuid,
    pub group_id: i64,
    pub open_period_start: Option<DateTime<Utc>>,
    pub message_identifier: Option<String>,
    pub parent_notification_message_id: Option<i64>,
    pub error_code: Option<i32>,
    pub error_details: Option<serde_json::Value>,
}

#[derive(Debug, thiserror::Error)]
#[error("notification message needs either a message identifier or error details")]
pub struct NotificationMessageValidationError;

impl NewNotificationMessage {
    pub fn validate(&self) -> Result<(), NotificationMessageValidationError> {
        let has_identifier = self
            .message_identifier
            .as_deref()
            .is_some_and(|s| !s.is_empty());
        let has_error = self.error_code.is_some() || self.error_details.is_some();

        if has_identifier || has_error {
            Ok(())
        } else {
            Err(NotificationMessageValidationError)
        }
    }
}
