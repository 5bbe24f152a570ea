use crate::error::MixinError;
use crate::step::ActionPayload;

/// JSON schema of the action payload read on stdin.
pub fn action_schema() -> Result<String, MixinError> {
    let schema = schemars::schema_for!(ActionPayload);
    Ok(serde_json::to_string_pretty(&schema)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_describes_step_fields() {
        let schema = action_schema().unwrap();
        let value: serde_json::Value = serde_json::from_str(&schema).unwrap();

        assert!(value.is_object());
        for field in ["logLevel", "workingDir", "backendConfig", "disableVarFile", "outputs"] {
            assert!(schema.contains(field), "schema is missing {}", field);
        }
    }
}
