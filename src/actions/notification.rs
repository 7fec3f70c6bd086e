use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::config::{self, AlertTarget, NotificationConfig};
use super::schema::Schema;
use super::{ActionHandler, HandlerError, HandlerGroup};
use crate::models::detector::{ERROR_GROUP_TYPE, METRIC_ISSUE_GROUP_TYPE};
use crate::models::{Action, ActionType, Detector, WorkflowJob};

/// Which alert flow a notification is delivered through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    IssueAlert,
    MetricAlert,
}

impl fmt::Display for AlertKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlertKind::IssueAlert => f.write_str("issue alert"),
            AlertKind::MetricAlert => f.write_str("metric alert"),
        }
    }
}

pub struct NotificationRequest<'a> {
    pub kind: AlertKind,
    pub job: &'a WorkflowJob,
    pub action: &'a Action,
    pub detector: &'a Detector,
    pub target: Option<AlertTarget>,
}

/// Delivers a notification for one action type.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, request: &NotificationRequest<'_>) -> Result<(), HandlerError>;
}

#[derive(Debug, thiserror::Error)]
pub enum NotificationHandlerError {
    #[error("No {kind} handler found for action type: {action_type}")]
    NoHandler {
        kind: AlertKind,
        action_type: ActionType,
    },
    #[error("{0}")]
    Failed(HandlerError),
}

impl From<NotificationHandlerError> for HandlerError {
    fn from(err: NotificationHandlerError) -> Self {
        HandlerError::from(err.to_string())
    }
}

/// Per-alert-kind table of notifiers keyed by action type.
pub struct AlertInvoker {
    kind: AlertKind,
    notifiers: HashMap<ActionType, Arc<dyn Notifier>>,
}

impl AlertInvoker {
    pub fn new(kind: AlertKind) -> Self {
        Self {
            kind,
            notifiers: HashMap::new(),
        }
    }

    pub fn kind(&self) -> AlertKind {
        self.kind
    }

    pub fn register(&mut self, action_type: ActionType, notifier: Arc<dyn Notifier>) {
        self.notifiers.insert(action_type, notifier);
    }

    pub async fn invoke(
        &self,
        job: &WorkflowJob,
        action: &Action,
        detector: &Detector,
    ) -> Result<(), NotificationHandlerError> {
        let Some(notifier) = self.notifiers.get(&action.action_type) else {
            tracing::error!(
                action_id = %action.id,
                "No {} handler found for action type: {}",
                self.kind,
                action.action_type
            );
            return Err(NotificationHandlerError::NoHandler {
                kind: self.kind,
                action_type: action.action_type,
            });
        };

        let target = match self.kind {
            AlertKind::MetricAlert => NotificationConfig::from_value(&action.config)
                .map_err(NotificationHandlerError::Failed)?
                .target(),
            AlertKind::IssueAlert => None,
        };

        let request = NotificationRequest {
            kind: self.kind,
            job,
            action,
            detector,
            target,
        };

        notifier.notify(&request).await.map_err(|e| {
            tracing::error!(action_id = %action.id, "Error invoking {} handler: {e}", self.kind);
            NotificationHandlerError::Failed(e)
        })
    }
}

/// Routes notifications to an alert invoker by the detector's group type.
#[derive(Default)]
pub struct GroupTypeRouter {
    invokers: HashMap<String, Arc<AlertInvoker>>,
}

impl GroupTypeRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Router with the issue alert invoker on `error` and the metric alert
    /// invoker on `metric_issue_poc`.
    pub fn with_alert_invokers(issue: AlertInvoker, metric: AlertInvoker) -> Self {
        let mut router = Self::new();
        router.register(ERROR_GROUP_TYPE, Arc::new(issue));
        router.register(METRIC_ISSUE_GROUP_TYPE, Arc::new(metric));
        router
    }

    pub fn register(&mut self, group_type: &str, invoker: Arc<AlertInvoker>) {
        self.invokers.insert(group_type.to_string(), invoker);
    }

    pub fn get(&self, group_type: &str) -> Option<&Arc<AlertInvoker>> {
        self.invokers.get(group_type)
    }

    /// Dispatch through the invoker for the detector's group type.
    ///
    /// A detector type without an invoker is logged and skipped rather than
    /// failing the workflow.
    pub async fn route(
        &self,
        job: &WorkflowJob,
        action: &Action,
        detector: &Detector,
    ) -> Result<(), NotificationHandlerError> {
        match self.get(&detector.detector_type) {
            Some(invoker) => invoker.invoke(job, action, detector).await,
            None => {
                tracing::error!(
                    detector_id = detector.id,
                    action_id = %action.id,
                    "No notification handler found for detector type: {}",
                    detector.detector_type
                );
                Ok(())
            }
        }
    }
}

/// Handler for chat, paging, email, app and webhook actions.
pub struct NotificationActionHandler {
    group: HandlerGroup,
    config_schema: &'static Schema,
    data_schema: Option<&'static Schema>,
    router: Arc<GroupTypeRouter>,
}

impl NotificationActionHandler {
    pub fn new(group: HandlerGroup, router: Arc<GroupTypeRouter>) -> Self {
        Self {
            group,
            config_schema: &config::NOTIFICATION_CONFIG_SCHEMA,
            data_schema: None,
            router,
        }
    }

    pub fn with_data_schema(mut self, schema: &'static Schema) -> Self {
        self.data_schema = Some(schema);
        self
    }
}

#[async_trait]
impl ActionHandler for NotificationActionHandler {
    fn group(&self) -> HandlerGroup {
        self.group
    }

    fn config_schema(&self) -> Option<&Schema> {
        Some(self.config_schema)
    }

    fn data_schema(&self) -> Option<&Schema> {
        self.data_schema
    }

    async fn execute(
        &self,
        job: &WorkflowJob,
        action: &Action,
        detector: &Detector,
    ) -> Result<(), HandlerError> {
        self.router
            .route(job, action, detector)
            .await
            .map_err(HandlerError::from)
    }
}

/// Handler for ticket creation actions. Always goes through the issue alert
/// flow so ticketing shares its notification threads.
pub struct TicketingActionHandler {
    config_schema: &'static Schema,
    data_schema: &'static Schema,
    router: Arc<GroupTypeRouter>,
}

impl TicketingActionHandler {
    pub fn new(router: Arc<GroupTypeRouter>) -> Self {
        Self {
            config_schema: &config::TICKETING_CONFIG_SCHEMA,
            data_schema: &config::TICKETING_DATA_SCHEMA,
            router,
        }
    }
}

#[async_trait]
impl ActionHandler for TicketingActionHandler {
    fn group(&self) -> HandlerGroup {
        HandlerGroup::TicketCreation
    }

    fn config_schema(&self) -> Option<&Schema> {
        Some(self.config_schema)
    }

    fn data_schema(&self) -> Option<&Schema> {
        Some(self.data_schema)
    }

    async fn execute(
        &self,
        job: &WorkflowJob,
        action: &Action,
        detector: &Detector,
    ) -> Result<(), HandlerError> {
        let invoker = self
            .router
            .get(ERROR_GROUP_TYPE)
            .ok_or_else(|| HandlerError::from("Issue alert invoker is not registered"))?;

        invoker
            .invoke(job, action, detector)
            .await
            .map_err(HandlerError::from)
    }
}
