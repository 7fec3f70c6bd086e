use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The event that caused a workflow to fire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupEvent {
    pub event_id: String,
    pub group_id: i64,
    pub project_id: i64,
    pub title: String,
    #[serde(default)]
    pub culprit: Option<String>,
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default)]
    pub platform: Option<String>,
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
    #[serde(default)]
    pub data: serde_json::Value,
    pub occurred_at: DateTime<Utc>,
}

/// Context handed to every action triggered by one workflow evaluation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowJob {
    pub event: GroupEvent,
    #[serde(default)]
    pub workflow_id: Option<i64>,
    #[serde(default)]
    pub has_reappeared: bool,
    #[serde(default)]
    pub has_escalated: bool,
    /// Start of the open period for metric issues; scopes notification threads.
    #[serde(default)]
    pub open_period_start: Option<DateTime<Utc>>,
}
