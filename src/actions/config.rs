//! Typed views over action `config` and `data` blobs.
//!
//! Schemas gate what gets persisted; handlers decode into these structs at
//! execution time instead of poking at raw JSON.

use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use serde_json::json;

use super::schema::Schema;
use super::HandlerError;

/// Who a notification is addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum ActionTarget {
    User,
    Team,
    SentryApp,
    IssueOwners,
    Specific,
}

impl ActionTarget {
    pub const ALL: [ActionTarget; 5] = [
        ActionTarget::User,
        ActionTarget::Team,
        ActionTarget::SentryApp,
        ActionTarget::IssueOwners,
        ActionTarget::Specific,
    ];

    pub fn value(self) -> i64 {
        match self {
            ActionTarget::User => 0,
            ActionTarget::Team => 1,
            ActionTarget::SentryApp => 2,
            ActionTarget::IssueOwners => 3,
            ActionTarget::Specific => 4,
        }
    }
}

impl TryFrom<i64> for ActionTarget {
    type Error = String;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        ActionTarget::ALL
            .into_iter()
            .find(|t| t.value() == value)
            .ok_or_else(|| format!("unknown target type: {value}"))
    }
}

impl From<ActionTarget> for i64 {
    fn from(target: ActionTarget) -> Self {
        target.value()
    }
}

fn target_values() -> Vec<serde_json::Value> {
    ActionTarget::ALL.iter().map(|t| json!(t.value())).collect()
}

// Compiled on first use and shared by every handler of the kind.
pub static NOTIFICATION_CONFIG_SCHEMA: LazyLock<Schema> =
    LazyLock::new(|| Schema::compile(notification_config_schema()).unwrap());
pub static TICKETING_CONFIG_SCHEMA: LazyLock<Schema> =
    LazyLock::new(|| Schema::compile(ticketing_config_schema()).unwrap());
pub static TICKETING_DATA_SCHEMA: LazyLock<Schema> =
    LazyLock::new(|| Schema::compile(ticketing_data_schema()).unwrap());

pub fn notification_config_schema() -> serde_json::Value {
    let mut target_types = target_values();
    target_types.push(serde_json::Value::Null);

    json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "description": "The configuration schema for Notification Actions",
        "type": "object",
        "properties": {
            "target_identifier": { "type": ["string", "null"] },
            "target_display": { "type": ["string", "null"] },
            "target_type": {
                "type": ["integer", "null"],
                "enum": target_types
            }
        }
    })
}

pub fn ticketing_config_schema() -> serde_json::Value {
    json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "description": "The configuration schema for a Ticketing Action",
        "type": "object",
        "properties": {
            "target_identifier": { "type": ["null"] },
            "target_display": { "type": ["null"] },
            "target_type": {
                "type": ["integer"],
                "enum": target_values()
            }
        }
    })
}

pub fn ticketing_data_schema() -> serde_json::Value {
    json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "type": "object",
        "description": "Schema for ticket creation action data blob",
        "properties": {
            "dynamic_form_fields": {
                "type": "array",
                "description": "Dynamic form fields from customer configuration",
                "items": { "type": "object" },
                "default": []
            },
            "additional_fields": {
                "type": "object",
                "description": "Additional fields that aren't part of standard fields",
                "additionalProperties": true,
                "default": {}
            }
        },
        "additionalProperties": false
    })
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NotificationConfig {
    #[serde(default)]
    pub target_identifier: Option<String>,
    #[serde(default)]
    pub target_display: Option<String>,
    #[serde(default)]
    pub target_type: Option<ActionTarget>,
}

/// A resolved notification recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlertTarget {
    User(i64),
    Team(i64),
    Specific(String),
}

impl NotificationConfig {
    pub fn from_value(config: &serde_json::Value) -> Result<Self, HandlerError> {
        decode(config, "config")
    }

    /// Recipient named by the config, if it can be resolved without lookups.
    pub fn target(&self) -> Option<AlertTarget> {
        let identifier = self.target_identifier.as_deref()?;
        match self.target_type? {
            ActionTarget::User => identifier.parse().ok().map(AlertTarget::User),
            ActionTarget::Team => identifier.parse().ok().map(AlertTarget::Team),
            ActionTarget::Specific => Some(AlertTarget::Specific(identifier.to_string())),
            ActionTarget::SentryApp | ActionTarget::IssueOwners => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TicketingConfig {
    #[serde(default)]
    pub target_type: Option<ActionTarget>,
}

impl TicketingConfig {
    pub fn from_value(config: &serde_json::Value) -> Result<Self, HandlerError> {
        decode(config, "config")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TicketingData {
    #[serde(default)]
    pub dynamic_form_fields: Vec<serde_json::Map<String, serde_json::Value>>,
    #[serde(default)]
    pub additional_fields: serde_json::Map<String, serde_json::Value>,
}

impl TicketingData {
    pub fn from_value(data: &serde_json::Value) -> Result<Self, HandlerError> {
        decode(data, "data")
    }
}

pub(crate) fn decode<T: serde::de::DeserializeOwned>(
    value: &serde_json::Value,
    what: &str,
) -> Result<T, HandlerError> {
    // Actions persisted before a column default existed may hold null.
    let value = if value.is_null() { json!({}) } else { value.clone() };
    serde_json::from_value(value).map_err(|e| HandlerError::from(format!("Invalid {what}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handler_schemas_compile() {
        assert!(NOTIFICATION_CONFIG_SCHEMA.check(&json!({ "target_type": 4 })).is_ok());
        assert!(NOTIFICATION_CONFIG_SCHEMA.check(&json!({ "target_type": 99 })).is_err());
        assert!(TICKETING_CONFIG_SCHEMA.check(&json!({ "target_type": 0 })).is_ok());
        assert!(TICKETING_DATA_SCHEMA.check(&json!({ "dynamic_form_fields": [] })).is_ok());
        assert_eq!(
            NOTIFICATION_CONFIG_SCHEMA.as_value(),
            &notification_config_schema()
        );
    }

    #[test]
    fn decodes_notification_config() {
        let config = NotificationConfig::from_value(&json!({
            "target_identifier": "12",
            "target_display": "Alice",
            "target_type": 0
        }))
        .unwrap();
        assert_eq!(config.target_type, Some(ActionTarget::User));
        assert_eq!(config.target(), Some(AlertTarget::User(12)));
    }

    #[test]
    fn target_resolution() {
        let team = NotificationConfig {
            target_identifier: Some("5".to_string()),
            target_display: None,
            target_type: Some(ActionTarget::Team),
        };
        assert_eq!(team.target(), Some(AlertTarget::Team(5)));

        let specific = NotificationConfig {
            target_identifier: Some("oncall@example.com".to_string()),
            target_display: None,
            target_type: Some(ActionTarget::Specific),
        };
        assert_eq!(
            specific.target(),
            Some(AlertTarget::Specific("oncall@example.com".to_string()))
        );

        let unparsable = NotificationConfig {
            target_identifier: Some("not-a-number".to_string()),
            target_display: None,
            target_type: Some(ActionTarget::User),
        };
        assert_eq!(unparsable.target(), None);

        assert_eq!(NotificationConfig::default().target(), None);
    }

    #[test]
    fn rejects_unknown_target_value() {
        let err = NotificationConfig::from_value(&json!({ "target_type": 9 })).unwrap_err();
        assert!(err.message.contains("unknown target type"), "{}", err.message);
    }

    #[test]
    fn null_blob_decodes_as_empty() {
        let data = TicketingData::from_value(&serde_json::Value::Null).unwrap();
        assert_eq!(data, TicketingData::default());
    }

    #[test]
    fn target_serializes_as_integer() {
        assert_eq!(serde_json::to_value(ActionTarget::Specific).unwrap(), json!(4));
    }
}
