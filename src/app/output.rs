//! Caller-facing output: progress lines, the result block, and the
//! persisted result log.

use std::collections::HashMap;
use std::path::Path;

use chrono::Local;
use serde_json::json;

use crate::app::api::ResourceSummary;
use crate::app::error::Result;
use crate::app::events::StackEvent;

/// One progress line per newly observed event:
/// `<local-timestamp>: {LogicalResourceId, ResourceStatus, ResourceStatusReason}`.
pub fn progress_line(event: &StackEvent) -> String {
    let timestamp = event
        .timestamp
        .with_timezone(&Local)
        .format("%Y/%m/%d %H:%M:%S %Z");
    let summary = json!({
        "LogicalResourceId": event.logical_resource_id,
        "ResourceStatus": event.resource_status,
        "ResourceStatusReason": event.resource_status_reason,
    });
    format!("{timestamp}: {summary}")
}

pub fn print_progress_line(event: &StackEvent) {
    println!("{}", progress_line(event));
}

/// The human-readable result block emitted after create/update.
pub fn result_block(
    summaries: &[ResourceSummary],
    outputs: &HashMap<String, String>,
) -> Result<String> {
    Ok(format!(
        "\nStack Resource Summaries:\n{}\n\nOutputs:\n{}",
        serde_json::to_string_pretty(summaries)?,
        serde_json::to_string_pretty(outputs)?,
    ))
}

pub fn print_result_block(
    summaries: &[ResourceSummary],
    outputs: &HashMap<String, String>,
) -> Result<()> {
    println!("{}", result_block(summaries, outputs)?);
    Ok(())
}

/// Persist `{StackName, StackResourceSummaries, Outputs}` as pretty JSON.
pub fn write_result_log(
    path: &Path,
    stack_name: &str,
    summaries: &[ResourceSummary],
    outputs: &HashMap<String, String>,
) -> Result<()> {
    let payload = json!({
        "StackName": stack_name,
        "StackResourceSummaries": summaries,
        "Outputs": outputs,
    });
    std::fs::write(path, format!("{}\n", serde_json::to_string_pretty(&payload)?))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn event() -> StackEvent {
        StackEvent {
            event_id: "e1".into(),
            logical_resource_id: Some("Bucket".into()),
            physical_resource_id: None,
            resource_properties: None,
            resource_status: "CREATE_COMPLETE".into(),
            resource_status_reason: None,
            resource_type: Some("AWS::S3::Bucket".into()),
            stack_id: None,
            stack_name: "test".into(),
            timestamp: Utc.timestamp_opt(1700000000, 0).unwrap(),
        }
    }

    #[test]
    fn progress_line_has_timestamp_and_summary() {
        let line = progress_line(&event());
        let (_timestamp, summary) = line.split_once(": ").expect("separator");
        let value: serde_json::Value = serde_json::from_str(summary).unwrap();
        assert_eq!(value["LogicalResourceId"], "Bucket");
        assert_eq!(value["ResourceStatus"], "CREATE_COMPLETE");
        assert!(value.get("ResourceStatusReason").is_some());
    }

    #[test]
    fn result_log_shape() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("result.json");
        let outputs = HashMap::from([("Url".to_string(), "https://x".to_string())]);
        write_result_log(&path, "my-stack", &[], &outputs).unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["StackName"], "my-stack");
        assert_eq!(written["Outputs"]["Url"], "https://x");
        assert!(written["StackResourceSummaries"].is_array());
    }
}
