//! Template documents: normalization, submission serialization, and the
//! deletion-policy rewrite applied before a stack is submitted.

pub mod plugin;

use serde_json::Value;
use tracing::debug;

use crate::app::error::{Error, Result};

/// A parsed template. Format plugins all parse into the same JSON value
/// model regardless of the source encoding.
pub type Document = Value;

/// The synthetic metadata key written by the metadata touch. CloudFormation
/// treats a template as unchanged when only `DeletionPolicy` differs, so an
/// update that merely rewrites the policy would be rejected as a no-op; a
/// fresh metadata value forces the update through.
pub const METADATA_TOUCH_KEY: &str = "DeletionPolicyUpdateKeyForKumogata";
const METADATA_TOUCH_VALUE_PREFIX: &str = "DeletionPolicyUpdateValueForKumogata";

/// Recursively convert every scalar leaf to its string form, preserving
/// sequence order and mapping keys. Run before diffing so numeric/boolean
/// type differences between source encodings do not produce spurious
/// diffs. Idempotent.
pub fn stringify(doc: &Document) -> Document {
    match doc {
        Value::Array(items) => Value::Array(items.iter().map(stringify).collect()),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), stringify(v)))
                .collect(),
        ),
        Value::Null => Value::String(String::new()),
        Value::Bool(b) => Value::String(b.to_string()),
        Value::Number(n) => Value::String(n.to_string()),
        Value::String(_) => doc.clone(),
    }
}

/// The remote API accepts a single textual encoding; every template is
/// submitted as JSON regardless of its source format.
pub fn submission_body(doc: &Document) -> Result<String> {
    Ok(serde_json::to_string(doc)?)
}

/// Which deletion-policy handling applies to the current operation.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeletionPolicy {
    /// The stack is auto-named and will be deleted right after creation;
    /// provisioned resources must survive that delete.
    pub ephemeral: bool,
    /// `--deletion-policy-retain` was given.
    pub retain_option: bool,
    /// Update path only: also write the metadata touch so a policy-only
    /// change is recognized by the remote API.
    pub touch_metadata: bool,
}

/// Rewrite each resource's `DeletionPolicy` to `Retain` (only when absent)
/// for ephemeral stacks or when the retain option is on. Resources of type
/// `AWS::CloudFormation::*` are left alone.
pub fn update_deletion_policy(template: &mut Document, policy: DeletionPolicy) {
    if !(policy.ephemeral || policy.retain_option) {
        return;
    }

    let Some(resources) = template
        .get_mut("Resources")
        .and_then(Value::as_object_mut)
    else {
        return;
    };

    let epoch = chrono::Utc::now().timestamp();
    for (logical_id, resource) in resources.iter_mut() {
        let resource_type = resource.get("Type").and_then(Value::as_str).unwrap_or("");
        if resource_type.starts_with("AWS::CloudFormation::") {
            continue;
        }

        if let Some(obj) = resource.as_object_mut() {
            obj.entry("DeletionPolicy")
                .or_insert_with(|| Value::String("Retain".to_string()));
        }

        if policy.touch_metadata {
            debug!("Touching metadata of resource {logical_id}");
            touch_metadata(resource, epoch);
        }
    }
}

/// Write the metadata touch marker into one resource. Kept as its own step
/// so the update-only trigger stays visible and testable.
pub fn touch_metadata(resource: &mut Document, epoch_seconds: i64) {
    let Some(obj) = resource.as_object_mut() else {
        return;
    };
    let metadata = obj
        .entry("Metadata")
        .or_insert_with(|| Value::Object(Default::default()));
    if let Some(metadata) = metadata.as_object_mut() {
        metadata.insert(
            METADATA_TOUCH_KEY.to_string(),
            Value::String(format!("{METADATA_TOUCH_VALUE_PREFIX}{epoch_seconds}")),
        );
    }
}

/// Read a template source, either a local file path or an http(s) URL.
pub async fn read_source(path_or_url: &str) -> Result<String> {
    if path_or_url.starts_with("http://") || path_or_url.starts_with("https://") {
        let response = reqwest::get(path_or_url)
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| Error::TemplateRead {
                source_name: path_or_url.to_string(),
                reason: e.to_string(),
            })?;
        response.text().await.map_err(|e| Error::TemplateRead {
            source_name: path_or_url.to_string(),
            reason: e.to_string(),
        })
    } else {
        std::fs::read_to_string(path_or_url).map_err(|e| Error::TemplateRead {
            source_name: path_or_url.to_string(),
            reason: e.to_string(),
        })
    }
}

/// File extension of a path or URL, used to select a format plugin.
pub fn extension_of(path_or_url: &str) -> String {
    std::path::Path::new(path_or_url)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_string()
}
