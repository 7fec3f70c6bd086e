use std::collections::BTreeMap;
use std::sync::LazyLock;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use super::config::{decode, AlertTarget};
use super::notification::{NotificationRequest, Notifier};
use super::schema::Schema;
use super::template::{self, TemplateContext};
use super::threads::NotificationThreads;
use super::HandlerError;
use crate::models::NewNotificationMessage;

/// Header carrying the identifier recorded for this delivery.
pub const NOTIFICATION_ID_HEADER: &str = "X-Notification-Id";
/// Header carrying the identifier of the message this one replies to.
pub const NOTIFICATION_THREAD_HEADER: &str = "X-Notification-Thread";

const MAX_RESPONSE_BODY: usize = 1024;

pub static DATA_SCHEMA: LazyLock<Schema> =
    LazyLock::new(|| Schema::compile(data_schema()).unwrap());

/// Schema for webhook action data. Webhook bodies are arbitrary third-party
/// payloads, so this stays a schema rather than a fixed struct.
pub fn data_schema() -> serde_json::Value {
    json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "description": "Delivery settings for a webhook action",
        "type": "object",
        "properties": {
            "url": {
                "type": "string",
                "pattern": "^https?://",
                "description": "Webhook URL (supports {{...}} placeholders)"
            },
            "method": { "type": "string", "enum": ["POST", "PUT"], "default": "POST" },
            "headers": {
                "type": "object",
                "additionalProperties": { "type": "string" },
                "description": "Custom headers"
            },
            "body_template": {
                "type": "string",
                "description": "Custom body template (JSON). If empty, sends the event summary."
            }
        },
        "required": ["url"]
    })
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub enum WebhookMethod {
    #[default]
    #[serde(rename = "POST")]
    Post,
    #[serde(rename = "PUT")]
    Put,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WebhookData {
    pub url: String,
    #[serde(default)]
    pub method: WebhookMethod,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    #[serde(default)]
    pub body_template: Option<String>,
}

pub struct WebhookNotifier {
    client: reqwest::Client,
    threads: NotificationThreads,
}

impl WebhookNotifier {
    pub fn new(timeout: Duration, threads: NotificationThreads) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: reqwest::Client::builder().timeout(timeout).build()?,
            threads,
        })
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn notify(&self, request: &NotificationRequest<'_>) -> Result<(), HandlerError> {
        let data: WebhookData = decode(&request.action.data, "data")?;
        let ctx = TemplateContext {
            job: request.job,
            action: request.action,
            detector: request.detector,
        };
        let event = &request.job.event;

        let parent = self
            .threads
            .parent_message(request.action.id, event.group_id, request.job.open_period_start)
            .await;
        let thread_id = parent.as_ref().and_then(|p| p.message_identifier.clone());
        let message_id = Uuid::now_v7().to_string();

        let url = template::render(&data.url, &ctx);

        let body = match data.body_template.as_deref() {
            Some(tmpl) if !tmpl.is_empty() => {
                let rendered = template::render(tmpl, &ctx);
                serde_json::from_str(&rendered).unwrap_or(json!(rendered))
            }
            _ => default_payload(request, thread_id.as_deref()),
        };

        let mut req = match data.method {
            WebhookMethod::Put => self.client.put(&url),
            WebhookMethod::Post => self.client.post(&url),
        };

        req = req
            .header("Content-Type", "application/json")
            .header(NOTIFICATION_ID_HEADER, &message_id);

        if let Some(thread_id) = &thread_id {
            req = req.header(NOTIFICATION_THREAD_HEADER, thread_id);
        }

        for (k, v) in &data.headers {
            req = req.header(k, template::render(v, &ctx));
        }

        let mut record = NewNotificationMessage {
            action_id: request.action.id,
            group_id: event.group_id,
            open_period_start: request.job.open_period_start,
            parent_notification_message_id: parent.as_ref().map(|p| p.id),
            ..Default::default()
        };

        let resp = match req.json(&body).send().await {
            Ok(resp) => resp,
            Err(e) => {
                let error = format!("Webhook request failed: {e}");
                record.error_details = Some(json!({ "error": &error }));
                self.threads.save_message(record).await;
                return Err(HandlerError::from(error));
            }
        };

        let status = resp.status();
        if status.is_success() {
            tracing::debug!(
                action_id = %request.action.id,
                status = status.as_u16(),
                "Webhook delivered"
            );
            record.message_identifier = Some(message_id);
            self.threads.save_message(record).await;
            return Ok(());
        }

        let resp_body = resp
            .text()
            .await
            .unwrap_or_default()
            .chars()
            .take(MAX_RESPONSE_BODY)
            .collect::<String>();

        record.error_code = Some(i32::from(status.as_u16()));
        record.error_details = Some(json!({ "body": resp_body }));
        self.threads.save_message(record).await;

        Err(HandlerError::from(format!(
            "Webhook returned status {}",
            status.as_u16()
        )))
    }
}

fn default_payload(request: &NotificationRequest<'_>, thread_id: Option<&str>) -> serde_json::Value {
    let event = &request.job.event;
    let target = request.target.as_ref().map(|t| match t {
        AlertTarget::User(id) => json!({ "type": "user", "id": id }),
        AlertTarget::Team(id) => json!({ "type": "team", "id": id }),
        AlertTarget::Specific(identifier) => json!({ "type": "specific", "identifier": identifier }),
    });

    json!({
        "kind": request.kind,
        "action_id": request.action.id,
        "thread_id": thread_id,
        "target": target,
        "event": {
            "id": &event.event_id,
            "title": &event.title,
            "culprit": &event.culprit,
            "level": &event.level,
            "platform": &event.platform,
            "tags": &event.tags,
            "data": &event.data,
            "occurred_at": &event.occurred_at,
        },
        "group_id": event.group_id,
        "project_id": event.project_id,
        "detector": {
            "id": request.detector.id,
            "name": &request.detector.name,
            "type": &request.detector.detector_type,
        },
        "workflow_id": request.job.workflow_id,
        "has_reappeared": request.job.has_reappeared,
        "has_escalated": request.job.has_escalated,
    })
}
