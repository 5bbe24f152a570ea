use std::collections::BTreeMap;

use serde_json::Value;

/// Renders a payload value the way terraform expects it on the command line:
/// strings verbatim, everything else as JSON.
pub fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

pub fn backend_config_args(backend_config: &BTreeMap<String, Value>) -> Vec<String> {
    backend_config
        .iter()
        .map(|(key, value)| format!("-backend-config={}={}", key, render_value(value)))
        .collect()
}

/// `-name=value` per entry, a bare `-name` for empty values and one flag per
/// element for lists.
pub fn flag_args(flags: &BTreeMap<String, Value>) -> Vec<String> {
    let mut args = Vec::new();
    for (name, value) in flags {
        let name = name.trim_start_matches('-');
        match value {
            Value::Array(items) => {
                args.extend(items.iter().map(|item| flag(name, &render_value(item))));
            }
            other => args.push(flag(name, &render_value(other))),
        }
    }
    args
}

fn flag(name: &str, value: &str) -> String {
    if value.is_empty() {
        format!("-{}", name)
    } else {
        format!("-{}={}", name, value)
    }
}

pub fn var_args(vars: &BTreeMap<String, Value>) -> Vec<String> {
    vars.iter()
        .flat_map(|(name, value)| ["-var".to_string(), format!("{}={}", name, render_value(value))])
        .collect()
}
