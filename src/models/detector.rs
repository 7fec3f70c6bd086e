use serde::{Deserialize, Serialize};

/// Group type slug for error issues.
pub const ERROR_GROUP_TYPE: &str = "error";
/// Group type slug for metric issues.
pub const METRIC_ISSUE_GROUP_TYPE: &str = "metric_issue_poc";

/// The monitoring rule that fired. Owned by the caller and passed through
/// dispatch untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Detector {
    pub id: i64,
    pub name: String,
    /// Group type slug, used to pick the alert path for notifications.
    #[serde(rename = "type")]
    pub detector_type: String,
    pub project_id: i64,
}
