use super::{ActionError, ActionHandler, ActionHandlerRegistry};
use crate::models::ActionType;

/// Check `config` and `data` against the schemas the handler declares.
///
/// Called on the write path before an action is inserted or updated; a
/// failure aborts the write.
pub fn enforce_schemas(
    handler: &dyn ActionHandler,
    config: &serde_json::Value,
    data: &serde_json::Value,
) -> Result<(), ActionError> {
    if let Some(config_schema) = handler.config_schema() {
        config_schema
            .check(config)
            .map_err(|e| ActionError::ConfigValidation(format!("Invalid config: {e}")))?;
    }

    if let Some(data_schema) = handler.data_schema() {
        data_schema
            .check(data)
            .map_err(|e| ActionError::DataValidation(format!("Invalid data: {e}")))?;
    }

    Ok(())
}

/// Resolve the handler for a raw type tag and validate against it.
pub fn validate_action(
    registry: &ActionHandlerRegistry,
    tag: &str,
    config: &serde_json::Value,
    data: &serde_json::Value,
) -> Result<ActionType, ActionError> {
    let (action_type, handler) = registry.resolve(tag)?;
    enforce_schemas(handler.as_ref(), config, data)?;
    Ok(action_type)
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;

    use serde_json::json;

    use crate::actions::notification::GroupTypeRouter;
    use crate::actions::schema::Schema;
    use crate::actions::tests::CountingHandler;
    use crate::actions::default_registry;

    fn profile_schema() -> Schema {
        Schema::compile(json!({
            "$schema": "https://json-schema.org/draft/2020-12/schema",
            "type": "object",
            "properties": { "foo": { "type": "string" } },
            "additionalProperties": false
        }))
        .unwrap()
    }

    fn schema_handler() -> CountingHandler {
        let mut handler = CountingHandler::new();
        handler.config_schema = Some(profile_schema());
        handler.data_schema = Some(profile_schema());
        handler
    }

    fn registry() -> ActionHandlerRegistry {
        default_registry(Arc::new(GroupTypeRouter::new()))
    }

    #[test]
    fn valid_config_and_data_pass() {
        let handler = schema_handler();
        let result = enforce_schemas(&handler, &json!({ "foo": "bar" }), &json!({ "foo": "bar" }));
        assert!(result.is_ok());
    }

    #[test]
    fn invalid_config_fails() {
        let handler = schema_handler();
        let err = enforce_schemas(&handler, &json!({ "baz": 42 }), &json!({ "foo": "bar" }))
            .unwrap_err();
        match err {
            ActionError::ConfigValidation(msg) => {
                assert!(msg.starts_with("Invalid config: "), "{msg}");
                assert!(msg.contains("baz"), "{msg}");
            }
            other => panic!("expected config validation error, got {other:?}"),
        }
    }

    #[test]
    fn invalid_data_fails() {
        let handler = schema_handler();
        let err = enforce_schemas(&handler, &json!({ "foo": "bar" }), &json!({ "baz": 42 }))
            .unwrap_err();
        match err {
            ActionError::DataValidation(msg) => {
                assert!(msg.starts_with("Invalid data: "), "{msg}");
                assert!(msg.contains("baz"), "{msg}");
            }
            other => panic!("expected data validation error, got {other:?}"),
        }
    }

    #[test]
    fn config_is_checked_before_data() {
        let handler = schema_handler();
        let err = enforce_schemas(&handler, &json!({ "baz": 1 }), &json!({ "baz": 2 }))
            .unwrap_err();
        assert!(matches!(err, ActionError::ConfigValidation(_)));
    }

    #[test]
    fn handler_without_schemas_accepts_anything() {
        let handler = CountingHandler::new();
        let result = enforce_schemas(&handler, &json!({ "x": [1] }), &json!("not even an object"));
        assert!(result.is_ok());
    }

    #[test]
    fn email_with_empty_config_passes() {
        let action_type = validate_action(&registry(), "email", &json!({}), &json!({})).unwrap();
        assert_eq!(action_type, ActionType::Email);
    }

    #[test]
    fn webhook_without_url_fails_data_validation() {
        let err = validate_action(&registry(), "webhook", &json!({}), &json!({})).unwrap_err();
        match err {
            ActionError::DataValidation(msg) => assert!(msg.contains("url"), "{msg}"),
            other => panic!("expected data validation error, got {other:?}"),
        }
    }

    #[test]
    fn webhook_with_url_passes() {
        let data = json!({ "url": "https://hooks.example.com/alerts", "method": "PUT" });
        assert!(validate_action(&registry(), "webhook", &json!({}), &data).is_ok());
    }

    #[test]
    fn unknown_type_fails_before_validation() {
        let err = validate_action(&registry(), "unknown_type", &json!({}), &json!({})).unwrap_err();
        assert!(matches!(err, ActionError::UnknownActionType(_)));
    }

    #[test]
    fn notification_config_rejects_unknown_target_type() {
        let config = json!({ "target_identifier": "C123", "target_type": 99 });
        let err = validate_action(&registry(), "slack", &config, &json!({})).unwrap_err();
        assert!(matches!(err, ActionError::ConfigValidation(_)));

        let config = json!({ "target_identifier": "C123", "target_display": "#alerts", "target_type": 4 });
        assert!(validate_action(&registry(), "slack", &config, &json!({})).is_ok());
    }

    #[test]
    fn ticketing_rejects_target_identifier_and_extra_data() {
        let registry = registry();

        let config = json!({ "target_identifier": "PROJ", "target_type": 0 });
        let err = validate_action(&registry, "jira", &config, &json!({})).unwrap_err();
        assert!(matches!(err, ActionError::ConfigValidation(_)));

        let config = json!({ "target_identifier": null, "target_display": null, "target_type": 2 });
        let err = validate_action(&registry, "jira", &config, &json!({ "priority": "high" }))
            .unwrap_err();
        assert!(matches!(err, ActionError::DataValidation(_)));

        let data = json!({
            "dynamic_form_fields": [{ "name": "project", "value": "10000" }],
            "additional_fields": { "labels": ["backend"] }
        });
        assert!(validate_action(&registry, "jira", &config, &data).is_ok());
    }

    #[test]
    fn validation_does_not_mutate_inputs() {
        let config = json!({ "target_identifier": "C123", "target_type": 4 });
        let data = json!({});
        let before = (config.clone(), data.clone());
        validate_action(&registry(), "slack", &config, &data).unwrap();
        assert_eq!((config, data), before);
    }
}
