//! Stack event records and the per-operation event log.
//!
//! The event log is created at the start of an orchestration call and
//! discarded at the end. Update/delete pre-seed it with the stack's
//! existing history so old events are not reprinted as new.

use aws_sdk_cloudformation as cfn;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;

/// One resource-level lifecycle event, immutable once observed.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct StackEvent {
    pub event_id: String,
    pub logical_resource_id: Option<String>,
    pub physical_resource_id: Option<String>,
    pub resource_properties: Option<String>,
    pub resource_status: String,
    pub resource_status_reason: Option<String>,
    pub resource_type: Option<String>,
    pub stack_id: Option<String>,
    pub stack_name: String,
    pub timestamp: DateTime<Utc>,
}

impl From<cfn::types::StackEvent> for StackEvent {
    fn from(aws_event: cfn::types::StackEvent) -> Self {
        Self {
            event_id: aws_event.event_id().unwrap_or_default().to_string(),
            logical_resource_id: aws_event.logical_resource_id().map(str::to_string),
            physical_resource_id: aws_event.physical_resource_id().map(str::to_string),
            resource_properties: aws_event.resource_properties().map(str::to_string),
            resource_status: aws_event
                .resource_status()
                .map(|s| s.as_str().to_string())
                .unwrap_or_default(),
            resource_status_reason: aws_event.resource_status_reason().map(str::to_string),
            resource_type: aws_event.resource_type().map(str::to_string),
            stack_id: aws_event.stack_id().map(str::to_string),
            stack_name: aws_event.stack_name().unwrap_or_default().to_string(),
            timestamp: aws_event
                .timestamp()
                .map(|t| {
                    DateTime::from_timestamp(t.secs(), t.subsec_nanos()).unwrap_or_else(Utc::now)
                })
                .unwrap_or_else(Utc::now),
        }
    }
}

/// Deduplicated record of the events already observed during one
/// orchestration call, keyed by `EventId`.
#[derive(Debug, Default)]
pub struct EventLog {
    seen: HashMap<String, StackEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an event history as already seen, without emitting anything.
    pub fn seed(&mut self, events: Vec<StackEvent>) {
        self.drain(events);
    }

    /// Sort the fetched events ascending by timestamp, drop any whose id
    /// was observed before, record the rest, and return them for display.
    pub fn drain(&mut self, mut events: Vec<StackEvent>) -> Vec<StackEvent> {
        events.sort_by_key(|e| e.timestamp);
        events
            .into_iter()
            .filter(|event| {
                self.seen
                    .insert(event.event_id.clone(), event.clone())
                    .is_none()
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn event(id: &str, secs: i64) -> StackEvent {
        StackEvent {
            event_id: id.to_string(),
            logical_resource_id: Some("Bucket".to_string()),
            physical_resource_id: None,
            resource_properties: None,
            resource_status: "CREATE_IN_PROGRESS".to_string(),
            resource_status_reason: None,
            resource_type: Some("AWS::S3::Bucket".to_string()),
            stack_id: None,
            stack_name: "test".to_string(),
            timestamp: Utc.timestamp_opt(secs, 0).unwrap(),
        }
    }

    #[test]
    fn drain_sorts_ascending_by_timestamp() {
        let mut log = EventLog::new();
        let drained = log.drain(vec![event("b", 20), event("a", 10), event("c", 30)]);
        let ids: Vec<_> = drained.iter().map(|e| e.event_id.as_str()).collect();
        assert_eq!(ids, ["a", "b", "c"]);
    }

    #[test]
    fn drain_never_returns_a_previously_seen_event() {
        let mut log = EventLog::new();
        log.drain(vec![event("a", 10), event("b", 20)]);
        let drained = log.drain(vec![event("a", 10), event("b", 20), event("c", 30)]);
        let ids: Vec<_> = drained.iter().map(|e| e.event_id.as_str()).collect();
        assert_eq!(ids, ["c"]);

        // A third fetch with nothing new yields nothing.
        assert!(log.drain(vec![event("c", 30)]).is_empty());
    }

    #[test]
    fn seeded_history_is_not_reprinted() {
        let mut log = EventLog::new();
        log.seed(vec![event("old-1", 1), event("old-2", 2)]);
        let drained = log.drain(vec![event("old-1", 1), event("new", 3)]);
        let ids: Vec<_> = drained.iter().map(|e| e.event_id.as_str()).collect();
        assert_eq!(ids, ["new"]);
        assert_eq!(log.len(), 3);
    }

    #[test]
    fn event_serializes_with_contract_field_names() {
        let value = serde_json::to_value(event("e1", 0)).unwrap();
        for key in [
            "EventId",
            "LogicalResourceId",
            "PhysicalResourceId",
            "ResourceProperties",
            "ResourceStatus",
            "ResourceStatusReason",
            "ResourceType",
            "StackId",
            "StackName",
            "Timestamp",
        ] {
            assert!(value.get(key).is_some(), "missing field {key}");
        }
    }
}
