use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::actions::ActionError;

/// The closed set of action kinds a workflow can fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    Slack,
    Msteams,
    Discord,

    Pagerduty,
    Opsgenie,

    Github,
    GithubEnterprise,
    Jira,
    JiraServer,
    AzureDevops,

    Email,
    SentryApp,

    Plugin,
    Webhook,
}

impl ActionType {
    pub const ALL: [ActionType; 14] = [
        ActionType::Slack,
        ActionType::Msteams,
        ActionType::Discord,
        ActionType::Pagerduty,
        ActionType::Opsgenie,
        ActionType::Github,
        ActionType::GithubEnterprise,
        ActionType::Jira,
        ActionType::JiraServer,
        ActionType::AzureDevops,
        ActionType::Email,
        ActionType::SentryApp,
        ActionType::Plugin,
        ActionType::Webhook,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActionType::Slack => "slack",
            ActionType::Msteams => "msteams",
            ActionType::Discord => "discord",
            ActionType::Pagerduty => "pagerduty",
            ActionType::Opsgenie => "opsgenie",
            ActionType::Github => "github",
            ActionType::GithubEnterprise => "github_enterprise",
            ActionType::Jira => "jira",
            ActionType::JiraServer => "jira_server",
            ActionType::AzureDevops => "azure_devops",
            ActionType::Email => "email",
            ActionType::SentryApp => "sentry_app",
            ActionType::Plugin => "plugin",
            ActionType::Webhook => "webhook",
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionType {
    type Err = ActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ActionType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ActionError::UnknownActionType(s.to_string()))
    }
}

impl TryFrom<String> for ActionType {
    type Error = ActionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// An action configured to run when a workflow's conditions are satisfied.
///
/// `config` and `data` are owned by the handler for `action_type` and are
/// checked against its schemas before every write.
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct Action {
    pub id: Uuid,
    #[serde(rename = "type")]
    #[sqlx(try_from = "String")]
    pub action_type: ActionType,
    pub config: serde_json::Value,
    pub data: serde_json::Value,
    /// LEGACY: maps to the integration used by the alert rule this action
    /// was migrated from.
    pub integration_id: Option<i64>,
    pub date_added: DateTime<Utc>,
    pub date_updated: DateTime<Utc>,
}

/// Fields supplied when creating or updating an action. The type is kept as
/// a raw tag so unknown values surface as a validation failure.
#[derive(Debug, Clone, Deserialize)]
pub struct ActionDraft {
    #[serde(rename = "type")]
    pub action_type: String,
    #[serde(default = "empty_object")]
    pub config: serde_json::Value,
    #[serde(default = "empty_object")]
    pub data: serde_json::Value,
    #[serde(default)]
    pub integration_id: Option<i64>,
}

fn empty_object() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}
