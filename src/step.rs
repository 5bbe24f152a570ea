use std::collections::{BTreeMap, HashSet};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::MixinError;

/// Raw action document: one action name mapped to its list of steps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct ActionPayload(pub BTreeMap<String, Vec<Instruction>>);

/// Wrapper key identifying a step as belonging to this mixin.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct Instruction {
    pub terraform: Step,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct Step {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,

    /// Passed to terraform as `TF_LOG`.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub log_level: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub working_dir: Option<String>,

    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub backend_config: BTreeMap<String, serde_json::Value>,

    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub vars: BTreeMap<String, serde_json::Value>,

    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub disable_var_file: bool,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub arguments: Vec<String>,

    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub flags: BTreeMap<String, serde_json::Value>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub outputs: Vec<Output>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct Output {
    pub name: String,
}

impl Output {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    // The name becomes a file name inside the outputs directory.
    fn validate(&self) -> Result<(), MixinError> {
        let name = self.name.as_str();
        if name.is_empty() {
            return Err(MixinError::InvalidStep("output name must not be empty".to_string()));
        }
        if name == "." || name == ".." || name.contains(['/', '\\']) {
            return Err(MixinError::InvalidStep(format!(
                "output name '{}' is not a valid file name",
                name
            )));
        }
        Ok(())
    }
}

impl Step {
    pub fn validate(&self) -> Result<(), MixinError> {
        let mut seen = HashSet::new();
        for output in &self.outputs {
            output.validate()?;
            if !seen.insert(output.name.as_str()) {
                return Err(MixinError::InvalidStep(format!(
                    "output '{}' is declared more than once",
                    output.name
                )));
            }
        }
        Ok(())
    }
}

/// A parsed action: its name as written in the payload and its single step.
#[derive(Debug, Clone, PartialEq)]
pub struct Action {
    pub name: String,
    pub step: Step,
}

impl Action {
    pub fn parse(payload: &[u8]) -> Result<Self, MixinError> {
        if payload.iter().all(u8::is_ascii_whitespace) {
            return Err(MixinError::InvalidStep("the payload is empty".to_string()));
        }

        let ActionPayload(actions) = serde_yaml::from_slice(payload)?;
        if actions.len() != 1 {
            return Err(MixinError::InvalidStep(format!(
                "expected a single action, but got {}",
                actions.len()
            )));
        }

        let Some((name, mut instructions)) = actions.into_iter().next() else {
            return Err(MixinError::InvalidStep("the payload has no action".to_string()));
        };
        if instructions.len() != 1 {
            return Err(MixinError::InvalidStep(format!(
                "expected a single step for action '{}', but got {}",
                name,
                instructions.len()
            )));
        }

        let Some(Instruction { terraform: step }) = instructions.pop() else {
            return Err(MixinError::InvalidStep(format!("action '{}' has no step", name)));
        };
        step.validate()?;

        tracing::debug!(action = %name, outputs = step.outputs.len(), "parsed step");
        Ok(Self { name, step })
    }
}
