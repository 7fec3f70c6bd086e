pub mod config;
pub mod dispatch;
pub mod notification;
pub mod schema;
pub mod template;
pub mod threads;
pub mod validate;
pub mod webhook;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::models::{Action, ActionType, Detector, WorkflowJob};
use schema::Schema;

#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    #[error("No handler registered for action type: {0}")]
    UnknownActionType(String),
    #[error("{0}")]
    ConfigValidation(String),
    #[error("{0}")]
    DataValidation(String),
    #[error(transparent)]
    Execution(#[from] HandlerError),
}

/// Failure raised by a handler while executing an action.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct HandlerError {
    pub message: String,
}

impl From<String> for HandlerError {
    fn from(s: String) -> Self {
        HandlerError { message: s }
    }
}

impl From<&str> for HandlerError {
    fn from(s: &str) -> Self {
        HandlerError {
            message: s.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandlerGroup {
    Notification,
    TicketCreation,
    Other,
}

#[async_trait]
pub trait ActionHandler: Send + Sync {
    fn group(&self) -> HandlerGroup;

    /// JSON Schema the action's `config` must satisfy, if any.
    fn config_schema(&self) -> Option<&Schema>;

    /// JSON Schema the action's `data` must satisfy, if any.
    fn data_schema(&self) -> Option<&Schema>;

    async fn execute(
        &self,
        job: &WorkflowJob,
        action: &Action,
        detector: &Detector,
    ) -> Result<(), HandlerError>;
}

/// Maps each action type to its handler. Populated once at startup and
/// read-only afterwards.
#[derive(Default)]
pub struct ActionHandlerRegistry {
    handlers: HashMap<ActionType, Arc<dyn ActionHandler>>,
}

impl ActionHandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, action_type: ActionType, handler: Arc<dyn ActionHandler>) {
        self.handlers.insert(action_type, handler);
    }

    pub fn get(&self, action_type: ActionType) -> Result<Arc<dyn ActionHandler>, ActionError> {
        self.handlers
            .get(&action_type)
            .cloned()
            .ok_or_else(|| ActionError::UnknownActionType(action_type.to_string()))
    }

    /// Parse a raw type tag and look up its handler.
    pub fn resolve(&self, tag: &str) -> Result<(ActionType, Arc<dyn ActionHandler>), ActionError> {
        let action_type: ActionType = tag.parse()?;
        Ok((action_type, self.get(action_type)?))
    }

    pub fn list(&self) -> Vec<(ActionType, &Arc<dyn ActionHandler>)> {
        let mut entries: Vec<_> = self.handlers.iter().map(|(t, h)| (*t, h)).collect();
        entries.sort_by_key(|(t, _)| t.as_str());
        entries
    }
}

/// Build the registry with a handler for every known action type.
pub fn default_registry(router: Arc<notification::GroupTypeRouter>) -> ActionHandlerRegistry {
    use notification::{NotificationActionHandler, TicketingActionHandler};

    let mut registry = ActionHandlerRegistry::new();

    for action_type in [
        ActionType::Slack,
        ActionType::Msteams,
        ActionType::Discord,
        ActionType::Pagerduty,
        ActionType::Opsgenie,
        ActionType::Email,
        ActionType::SentryApp,
        ActionType::Plugin,
    ] {
        registry.register(
            action_type,
            Arc::new(NotificationActionHandler::new(
                HandlerGroup::Notification,
                router.clone(),
            )),
        );
    }

    registry.register(
        ActionType::Webhook,
        Arc::new(
            NotificationActionHandler::new(HandlerGroup::Other, router.clone())
                .with_data_schema(&webhook::DATA_SCHEMA),
        ),
    );

    for action_type in [
        ActionType::Github,
        ActionType::GithubEnterprise,
        ActionType::Jira,
        ActionType::JiraServer,
        ActionType::AzureDevops,
    ] {
        registry.register(action_type, Arc::new(TicketingActionHandler::new(router.clone())));
    }

    registry
}
