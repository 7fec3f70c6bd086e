//! JSON Schema checks for action config and data payloads.

use serde::{Serialize, Serializer};

/// A draft 2020-12 schema compiled once and reused for every check.
pub struct Schema {
    raw: serde_json::Value,
    validator: jsonschema::Validator,
}

impl Schema {
    pub fn compile(raw: serde_json::Value) -> Result<Self, String> {
        let validator = jsonschema::draft202012::options()
            .build(&raw)
            .map_err(|e| format!("schema is invalid: {e}"))?;
        Ok(Self { raw, validator })
    }

    pub fn as_value(&self) -> &serde_json::Value {
        &self.raw
    }

    /// Check `instance` against the schema.
    ///
    /// On failure returns the message of the first violation, which names the
    /// rule that failed (e.g. `"url" is a required property`).
    pub fn check(&self, instance: &serde_json::Value) -> Result<(), String> {
        match self.validator.iter_errors(instance).next() {
            Some(err) => Err(err.to_string()),
            None => Ok(()),
        }
    }
}

impl std::fmt::Debug for Schema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Schema").field(&self.raw).finish()
    }
}

impl Serialize for Schema {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.raw.serialize(serializer)
    }
}
