//! Per-invocation configuration snapshot.

use std::path::PathBuf;

use crate::app::error::{Error, Result};

/// Immutable configuration for one orchestrator invocation. Built once by
/// the CLI layer and shared by reference for the whole call.
#[derive(Debug, Clone, Default)]
pub struct OperationOptions {
    pub region: Option<String>,
    pub profile: Option<String>,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,

    /// Template parameters, already merged from `key=value` pairs and the
    /// JSON blob (see [`merge_parameters`]).
    pub parameters: Vec<(String, String)>,

    pub deletion_policy_retain: bool,

    // Per-operation CloudFormation API flags.
    pub disable_rollback: Option<bool>,
    pub timeout_in_minutes: Option<i32>,
    pub notification_arns: Vec<String>,
    pub capabilities: Vec<String>,
    pub resource_types: Vec<String>,
    pub on_failure: Option<String>,
    pub stack_policy_body: Option<String>,
    pub stack_policy_url: Option<String>,
    pub use_previous_template: Option<bool>,
    pub stack_policy_during_update_body: Option<String>,
    pub stack_policy_during_update_url: Option<String>,

    /// Output format for `export`/`convert` (plugin extension name).
    pub output_format: Option<String>,
    /// When set, create/update persist `{StackName, StackResourceSummaries,
    /// Outputs}` to this path.
    pub result_log: Option<PathBuf>,

    /// Fire-and-forget: submit the operation and skip polling.
    pub detach: bool,
    /// Skip the interactive confirmation on delete.
    pub force: bool,
    pub color: bool,
    pub ignore_all_space: bool,
}

/// Merge `key=value` pairs with an optional JSON object of parameters.
/// JSON keys override same-named pairs; relative order of first appearance
/// is preserved.
pub fn merge_parameters(
    key_values: &[String],
    json_parameters: Option<&str>,
) -> Result<Vec<(String, String)>> {
    let mut merged: Vec<(String, String)> = Vec::new();

    for pair in key_values {
        let (key, value) = pair
            .split_once('=')
            .ok_or_else(|| Error::TemplateParse(format!("Invalid parameter: {pair}")))?;
        upsert(&mut merged, key, value.to_string());
    }

    if let Some(json) = json_parameters {
        let object: serde_json::Map<String, serde_json::Value> = serde_json::from_str(json)?;
        for (key, value) in object {
            let value = match value {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            };
            upsert(&mut merged, &key, value);
        }
    }

    Ok(merged)
}

fn upsert(parameters: &mut Vec<(String, String)>, key: &str, value: String) {
    match parameters.iter_mut().find(|(k, _)| k == key) {
        Some((_, v)) => *v = value,
        None => parameters.push((key.to_string(), value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn merges_key_values_and_json() {
        let merged = merge_parameters(
            &["Size=small".into(), "Env=dev".into()],
            Some(r#"{"Env": "prod", "Count": 3}"#),
        )
        .unwrap();

        assert_eq!(
            merged,
            vec![
                ("Size".to_string(), "small".to_string()),
                ("Env".to_string(), "prod".to_string()),
                ("Count".to_string(), "3".to_string()),
            ]
        );
    }

    #[test]
    fn value_may_contain_equals_sign() {
        let merged = merge_parameters(&["Token=a=b".into()], None).unwrap();
        assert_eq!(merged, vec![("Token".to_string(), "a=b".to_string())]);
    }

    #[test]
    fn rejects_pair_without_equals() {
        assert!(merge_parameters(&["NoValue".into()], None).is_err());
    }
}
