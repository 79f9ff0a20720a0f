//! Remote API boundary.
//!
//! Every read returns an immutable snapshot; nothing here caches remote
//! state. Callers that need fresh status after a mutation re-fetch
//! explicitly (the update/delete paths depend on that). [`CloudApi`] is the
//! seam tests script against; [`AwsCloudFormation`] is the production
//! implementation.

use async_trait::async_trait;
use aws_sdk_cloudformation as cfn;
use aws_sdk_cloudformation::error::{ProvideErrorMetadata, SdkError};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::HashMap;
use tracing::debug;

use crate::app::error::ApiError;
use crate::app::events::StackEvent;

/// One row of the stack summary list.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct StackSummary {
    pub stack_name: String,
    pub creation_time: Option<DateTime<Utc>>,
    pub stack_status: String,
    pub description: Option<String>,
}

/// Immutable snapshot of a stack's remote state at one describe call.
#[derive(Debug, Clone, Default)]
pub struct StackSnapshot {
    pub name: String,
    pub stack_id: Option<String>,
    pub status: String,
    pub status_reason: Option<String>,
    pub creation_time: Option<DateTime<Utc>>,
    pub last_updated_time: Option<DateTime<Utc>>,
    pub description: Option<String>,
    pub parameters: Vec<(String, String)>,
    pub capabilities: Vec<String>,
    pub notification_arns: Vec<String>,
    pub timeout_in_minutes: Option<i32>,
    pub disable_rollback: Option<bool>,
    pub tags: Vec<(String, String)>,
    pub outputs: Vec<(String, String)>,
}

impl StackSnapshot {
    /// A stack is terminal once its status no longer ends in
    /// `_IN_PROGRESS`. Terminal is not success; callers compare the final
    /// status against the expected complete value separately.
    pub fn is_terminal(&self) -> bool {
        !self.status.ends_with("_IN_PROGRESS")
    }

    pub fn outputs_map(&self) -> HashMap<String, String> {
        self.outputs.iter().cloned().collect()
    }

    /// Caller-facing describe payload, mirroring the remote stack record.
    pub fn to_detail(&self) -> Value {
        let parameters: Vec<Value> = self
            .parameters
            .iter()
            .map(|(k, v)| json!({"ParameterKey": k, "ParameterValue": v}))
            .collect();
        let tags: Vec<Value> = self
            .tags
            .iter()
            .map(|(k, v)| json!({"Key": k, "Value": v}))
            .collect();

        json!({
            "StackId": self.stack_id,
            "StackName": self.name,
            "StackStatus": self.status,
            "StackStatusReason": self.status_reason,
            "CreationTime": self.creation_time,
            "LastUpdatedTime": self.last_updated_time,
            "Description": self.description,
            "Parameters": parameters,
            "Capabilities": self.capabilities,
            "NotificationARNs": self.notification_arns,
            "TimeoutInMinutes": self.timeout_in_minutes,
            "DisableRollback": self.disable_rollback,
            "Tags": tags,
            "Outputs": self.outputs_map(),
        })
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ResourceSummary {
    pub logical_resource_id: String,
    pub physical_resource_id: Option<String>,
    pub resource_type: String,
    pub resource_status: String,
    pub resource_status_reason: Option<String>,
    pub last_updated_timestamp: Option<DateTime<Utc>>,
}

/// One pending change reported by a change set.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Change {
    pub action: Option<String>,
    pub logical_resource_id: Option<String>,
    pub physical_resource_id: Option<String>,
    pub resource_type: Option<String>,
    pub details: Vec<ChangeDetail>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChangeDetail {
    pub attribute: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ChangeSetSnapshot {
    pub status: String,
    pub status_reason: Option<String>,
    pub changes: Vec<Change>,
}

impl ChangeSetSnapshot {
    /// Change sets additionally pass through `*_PENDING` states before any
    /// in-progress status.
    pub fn is_terminal(&self) -> bool {
        !(self.status.ends_with("_PENDING") || self.status.ends_with("_IN_PROGRESS"))
    }
}

/// Parameters for a create/update submission. Optional fields are sent
/// only when set.
#[derive(Debug, Clone, Default)]
pub struct StackParams {
    pub stack_name: String,
    pub template_body: String,
    pub parameters: Vec<(String, String)>,
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
}

/// Parameters for a change-set submission. Previews take only the subset
/// of flags that apply to them; rollback/timeout/stack-policy do not.
#[derive(Debug, Clone, Default)]
pub struct ChangeSetParams {
    pub stack_name: String,
    pub change_set_name: String,
    pub template_body: String,
    pub parameters: Vec<(String, String)>,
    pub use_previous_template: Option<bool>,
    pub notification_arns: Vec<String>,
    pub capabilities: Vec<String>,
    pub resource_types: Vec<String>,
}

#[derive(Debug, Clone)]
pub enum TemplateSummarySource {
    StackName(String),
    TemplateBody(String),
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// The CloudFormation operations the orchestrator consumes.
#[async_trait]
pub trait CloudApi: Send + Sync {
    async fn describe_stack(&self, stack_name: &str) -> ApiResult<StackSnapshot>;
    async fn list_stacks(&self, stack_name: Option<&str>) -> ApiResult<Vec<StackSummary>>;
    async fn create_stack(&self, params: StackParams) -> ApiResult<()>;
    async fn update_stack(&self, params: StackParams) -> ApiResult<()>;
    async fn delete_stack(&self, stack_name: &str) -> ApiResult<()>;
    async fn stack_events(&self, stack_name: &str) -> ApiResult<Vec<StackEvent>>;
    async fn stack_resources(&self, stack_name: &str) -> ApiResult<Vec<ResourceSummary>>;
    async fn get_template(&self, stack_name: &str) -> ApiResult<String>;
    async fn validate_template(&self, template_body: &str) -> ApiResult<()>;
    async fn get_template_summary(&self, source: TemplateSummarySource) -> ApiResult<Value>;
    /// Returns the change set id (ARN).
    async fn create_change_set(&self, params: ChangeSetParams) -> ApiResult<String>;
    async fn describe_change_set(&self, change_set: &str) -> ApiResult<ChangeSetSnapshot>;
    async fn delete_change_set(&self, change_set: &str) -> ApiResult<()>;
}

/// Production implementation over the AWS SDK client.
#[derive(Clone)]
pub struct AwsCloudFormation {
    client: cfn::Client,
}

impl AwsCloudFormation {
    pub fn new(client: cfn::Client) -> Self {
        Self { client }
    }
}

/// Map an SDK error onto the boundary taxonomy. CloudFormation signals a
/// missing stack as a `ValidationError` whose message contains "does not
/// exist"; a missing change set has its own `ChangeSetNotFound` code.
fn classify<E>(err: SdkError<E>) -> ApiError
where
    E: ProvideErrorMetadata,
    SdkError<E>: std::fmt::Display,
{
    let code = err
        .as_service_error()
        .and_then(|e| e.code())
        .map(str::to_string);
    let message = err
        .as_service_error()
        .and_then(|e| e.message())
        .map(str::to_string)
        .unwrap_or_else(|| err.to_string());

    debug!("CloudFormation error: code={code:?} message={message}");

    match code.as_deref() {
        Some("ChangeSetNotFound") => ApiError::NotFound(message),
        Some("ValidationError") if message.contains("does not exist") => {
            ApiError::NotFound(message)
        }
        _ => ApiError::Remote(message),
    }
}

fn to_chrono(t: &aws_smithy_types::DateTime) -> DateTime<Utc> {
    DateTime::from_timestamp(t.secs(), t.subsec_nanos()).unwrap_or_else(Utc::now)
}

fn to_parameters(parameters: &[(String, String)]) -> Vec<cfn::types::Parameter> {
    parameters
        .iter()
        .map(|(key, value)| {
            cfn::types::Parameter::builder()
                .parameter_key(key)
                .parameter_value(value)
                .build()
        })
        .collect()
}

fn snapshot_from(stack: &cfn::types::Stack) -> StackSnapshot {
    let outputs = stack
        .outputs()
        .iter()
        .filter_map(|o| match (o.output_key(), o.output_value()) {
            (Some(k), Some(v)) => Some((k.to_string(), v.to_string())),
            _ => None,
        })
        .collect();

    let parameters = stack
        .parameters()
        .iter()
        .filter_map(|p| match (p.parameter_key(), p.parameter_value()) {
            (Some(k), Some(v)) => Some((k.to_string(), v.to_string())),
            _ => None,
        })
        .collect();
    let tags = stack
        .tags()
        .iter()
        .filter_map(|t| match (t.key(), t.value()) {
            (Some(k), Some(v)) => Some((k.to_string(), v.to_string())),
            _ => None,
        })
        .collect();

    StackSnapshot {
        name: stack.stack_name().unwrap_or_default().to_string(),
        stack_id: stack.stack_id().map(str::to_string),
        status: stack
            .stack_status()
            .map(|s| s.as_str().to_string())
            .unwrap_or_default(),
        status_reason: stack.stack_status_reason().map(str::to_string),
        creation_time: stack.creation_time().map(to_chrono),
        last_updated_time: stack.last_updated_time().map(to_chrono),
        description: stack.description().map(str::to_string),
        parameters,
        capabilities: stack
            .capabilities()
            .iter()
            .map(|c| c.as_str().to_string())
            .collect(),
        notification_arns: stack.notification_arns().to_vec(),
        timeout_in_minutes: stack.timeout_in_minutes(),
        disable_rollback: stack.disable_rollback(),
        tags,
        outputs,
    }
}

#[async_trait]
impl CloudApi for AwsCloudFormation {
    async fn describe_stack(&self, stack_name: &str) -> ApiResult<StackSnapshot> {
        let resp = self
            .client
            .describe_stacks()
            .stack_name(stack_name)
            .send()
            .await
            .map_err(classify)?;

        resp.stacks()
            .first()
            .map(snapshot_from)
            .ok_or_else(|| ApiError::NotFound(format!("Stack '{stack_name}' does not exist")))
    }

    async fn list_stacks(&self, stack_name: Option<&str>) -> ApiResult<Vec<StackSummary>> {
        let mut request = self.client.describe_stacks();
        if let Some(name) = stack_name {
            request = request.stack_name(name);
        }
        let mut paginator = request.into_paginator().send();

        let mut summaries = Vec::new();
        while let Some(page) = paginator.next().await {
            let page = page.map_err(classify)?;
            for stack in page.stacks() {
                summaries.push(StackSummary {
                    stack_name: stack.stack_name().unwrap_or_default().to_string(),
                    creation_time: stack.creation_time().map(to_chrono),
                    stack_status: stack
                        .stack_status()
                        .map(|s| s.as_str().to_string())
                        .unwrap_or_default(),
                    description: stack.description().map(str::to_string),
                });
            }
        }
        Ok(summaries)
    }

    async fn create_stack(&self, params: StackParams) -> ApiResult<()> {
        let mut request = self
            .client
            .create_stack()
            .stack_name(&params.stack_name)
            .template_body(&params.template_body);

        if !params.parameters.is_empty() {
            request = request.set_parameters(Some(to_parameters(&params.parameters)));
        }
        if let Some(disable_rollback) = params.disable_rollback {
            request = request.disable_rollback(disable_rollback);
        }
        if let Some(timeout) = params.timeout_in_minutes {
            request = request.timeout_in_minutes(timeout);
        }
        for arn in &params.notification_arns {
            request = request.notification_arns(arn);
        }
        for capability in &params.capabilities {
            request = request.capabilities(capability.as_str().into());
        }
        for resource_type in &params.resource_types {
            request = request.resource_types(resource_type);
        }
        if let Some(on_failure) = &params.on_failure {
            request = request.on_failure(on_failure.as_str().into());
        }
        if let Some(body) = &params.stack_policy_body {
            request = request.stack_policy_body(body);
        }
        if let Some(url) = &params.stack_policy_url {
            request = request.stack_policy_url(url);
        }

        request.send().await.map_err(classify)?;
        Ok(())
    }

    async fn update_stack(&self, params: StackParams) -> ApiResult<()> {
        let mut request = self
            .client
            .update_stack()
            .stack_name(&params.stack_name)
            .template_body(&params.template_body);

        if !params.parameters.is_empty() {
            request = request.set_parameters(Some(to_parameters(&params.parameters)));
        }
        if let Some(use_previous) = params.use_previous_template {
            request = request.use_previous_template(use_previous);
        }
        for arn in &params.notification_arns {
            request = request.notification_arns(arn);
        }
        for capability in &params.capabilities {
            request = request.capabilities(capability.as_str().into());
        }
        for resource_type in &params.resource_types {
            request = request.resource_types(resource_type);
        }
        if let Some(body) = &params.stack_policy_body {
            request = request.stack_policy_body(body);
        }
        if let Some(url) = &params.stack_policy_url {
            request = request.stack_policy_url(url);
        }
        if let Some(body) = &params.stack_policy_during_update_body {
            request = request.stack_policy_during_update_body(body);
        }
        if let Some(url) = &params.stack_policy_during_update_url {
            request = request.stack_policy_during_update_url(url);
        }

        request.send().await.map_err(classify)?;
        Ok(())
    }

    async fn delete_stack(&self, stack_name: &str) -> ApiResult<()> {
        self.client
            .delete_stack()
            .stack_name(stack_name)
            .send()
            .await
            .map_err(classify)?;
        Ok(())
    }

    async fn stack_events(&self, stack_name: &str) -> ApiResult<Vec<StackEvent>> {
        let resp = self
            .client
            .describe_stack_events()
            .stack_name(stack_name)
            .send()
            .await
            .map_err(classify)?;

        Ok(resp.stack_events().iter().cloned().map(Into::into).collect())
    }

    async fn stack_resources(&self, stack_name: &str) -> ApiResult<Vec<ResourceSummary>> {
        // A stack can exceed one page of resource summaries; follow the
        // pagination tokens so the listing stays complete.
        let mut paginator = self
            .client
            .list_stack_resources()
            .stack_name(stack_name)
            .into_paginator()
            .send();

        let mut resources = Vec::new();
        while let Some(page) = paginator.next().await {
            let page = page.map_err(classify)?;
            for summary in page.stack_resource_summaries() {
                resources.push(ResourceSummary {
                    logical_resource_id: summary
                        .logical_resource_id()
                        .unwrap_or_default()
                        .to_string(),
                    physical_resource_id: summary.physical_resource_id().map(str::to_string),
                    resource_type: summary.resource_type().unwrap_or_default().to_string(),
                    resource_status: summary
                        .resource_status()
                        .map(|s| s.as_str().to_string())
                        .unwrap_or_default(),
                    resource_status_reason: summary.resource_status_reason().map(str::to_string),
                    last_updated_timestamp: summary.last_updated_timestamp().map(to_chrono),
                });
            }
        }
        Ok(resources)
    }

    async fn get_template(&self, stack_name: &str) -> ApiResult<String> {
        let resp = self
            .client
            .get_template()
            .stack_name(stack_name)
            .send()
            .await
            .map_err(classify)?;

        Ok(resp.template_body().unwrap_or_default().to_string())
    }

    async fn validate_template(&self, template_body: &str) -> ApiResult<()> {
        self.client
            .validate_template()
            .template_body(template_body)
            .send()
            .await
            .map_err(classify)?;
        Ok(())
    }

    async fn get_template_summary(&self, source: TemplateSummarySource) -> ApiResult<Value> {
        let request = match source {
            TemplateSummarySource::StackName(name) => {
                self.client.get_template_summary().stack_name(name)
            }
            TemplateSummarySource::TemplateBody(body) => {
                self.client.get_template_summary().template_body(body)
            }
        };
        let resp = request.send().await.map_err(classify)?;

        let parameters: Vec<Value> = resp
            .parameters()
            .iter()
            .map(|p| {
                json!({
                    "ParameterKey": p.parameter_key(),
                    "ParameterType": p.parameter_type(),
                    "DefaultValue": p.default_value(),
                    "NoEcho": p.no_echo(),
                    "Description": p.description(),
                })
            })
            .collect();

        Ok(json!({
            "Parameters": parameters,
            "Description": resp.description(),
            "Capabilities": resp.capabilities().iter().map(|c| c.as_str()).collect::<Vec<_>>(),
            "CapabilitiesReason": resp.capabilities_reason(),
            "ResourceTypes": resp.resource_types(),
            "Version": resp.version(),
            "Metadata": resp.metadata(),
            "DeclaredTransforms": resp.declared_transforms(),
        }))
    }

    async fn create_change_set(&self, params: ChangeSetParams) -> ApiResult<String> {
        let mut request = self
            .client
            .create_change_set()
            .stack_name(&params.stack_name)
            .change_set_name(&params.change_set_name)
            .template_body(&params.template_body);

        if !params.parameters.is_empty() {
            request = request.set_parameters(Some(to_parameters(&params.parameters)));
        }
        if let Some(use_previous) = params.use_previous_template {
            request = request.use_previous_template(use_previous);
        }
        for arn in &params.notification_arns {
            request = request.notification_arns(arn);
        }
        for capability in &params.capabilities {
            request = request.capabilities(capability.as_str().into());
        }
        for resource_type in &params.resource_types {
            request = request.resource_types(resource_type);
        }

        let resp = request.send().await.map_err(classify)?;
        Ok(resp.id().unwrap_or_default().to_string())
    }

    async fn describe_change_set(&self, change_set: &str) -> ApiResult<ChangeSetSnapshot> {
        let resp = self
            .client
            .describe_change_set()
            .change_set_name(change_set)
            .send()
            .await
            .map_err(classify)?;

        let changes = resp
            .changes()
            .iter()
            .filter_map(|change| change.resource_change())
            .map(|rc| Change {
                action: rc.action().map(|a| a.as_str().to_string()),
                logical_resource_id: rc.logical_resource_id().map(str::to_string),
                physical_resource_id: rc.physical_resource_id().map(str::to_string),
                resource_type: rc.resource_type().map(str::to_string),
                details: rc
                    .details()
                    .iter()
                    .map(|detail| ChangeDetail {
                        attribute: detail
                            .target()
                            .and_then(|t| t.attribute())
                            .map(|a| a.as_str().to_string()),
                        name: detail
                            .target()
                            .and_then(|t| t.name())
                            .map(str::to_string),
                    })
                    .collect(),
            })
            .collect();

        Ok(ChangeSetSnapshot {
            status: resp
                .status()
                .map(|s| s.as_str().to_string())
                .unwrap_or_default(),
            status_reason: resp.status_reason().map(str::to_string),
            changes,
        })
    }

    async fn delete_change_set(&self, change_set: &str) -> ApiResult<()> {
        self.client
            .delete_change_set()
            .change_set_name(change_set)
            .send()
            .await
            .map_err(classify)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stack_terminal_predicate() {
        let mut snap = StackSnapshot {
            name: "s".into(),
            status: "CREATE_IN_PROGRESS".into(),
            ..Default::default()
        };
        assert!(!snap.is_terminal());

        for status in ["CREATE_COMPLETE", "ROLLBACK_COMPLETE", "CREATE_FAILED"] {
            snap.status = status.into();
            assert!(snap.is_terminal(), "{status} should be terminal");
        }
    }

    #[test]
    fn describe_detail_carries_the_full_stack_record() {
        let snap = StackSnapshot {
            name: "my-stack".into(),
            stack_id: Some("arn:aws:cloudformation:stack/my-stack/1".into()),
            status: "CREATE_COMPLETE".into(),
            parameters: vec![("Env".into(), "dev".into())],
            capabilities: vec!["CAPABILITY_IAM".into()],
            tags: vec![("team".into(), "infra".into())],
            timeout_in_minutes: Some(30),
            disable_rollback: Some(false),
            outputs: vec![("Url".into(), "https://example.com".into())],
            ..Default::default()
        };

        let detail = snap.to_detail();
        assert_eq!(detail["StackId"], "arn:aws:cloudformation:stack/my-stack/1");
        assert_eq!(detail["Parameters"][0]["ParameterKey"], "Env");
        assert_eq!(detail["Parameters"][0]["ParameterValue"], "dev");
        assert_eq!(detail["Capabilities"][0], "CAPABILITY_IAM");
        assert_eq!(detail["Tags"][0]["Key"], "team");
        assert_eq!(detail["TimeoutInMinutes"], 30);
        assert_eq!(detail["DisableRollback"], false);
        assert_eq!(detail["Outputs"]["Url"], "https://example.com");
    }

    fn resource_summary(id: &str) -> cfn::types::StackResourceSummary {
        cfn::types::StackResourceSummary::builder()
            .logical_resource_id(id)
            .resource_type("AWS::S3::Bucket")
            .resource_status(cfn::types::ResourceStatus::CreateComplete)
            .last_updated_timestamp(aws_smithy_types::DateTime::from_secs(0))
            .build()
    }

    fn stack(name: &str) -> cfn::types::Stack {
        cfn::types::Stack::builder()
            .stack_name(name)
            .creation_time(aws_smithy_types::DateTime::from_secs(0))
            .stack_status(cfn::types::StackStatus::CreateComplete)
            .build()
    }

    #[tokio::test]
    async fn stack_resources_follows_pagination_tokens() {
        use aws_smithy_mocks::{mock, mock_client, RuleMode};
        use cfn::operation::list_stack_resources::ListStackResourcesOutput;

        let first_page = mock!(cfn::Client::list_stack_resources).then_output(|| {
            ListStackResourcesOutput::builder()
                .stack_resource_summaries(resource_summary("First"))
                .next_token("page-2")
                .build()
        });
        let last_page = mock!(cfn::Client::list_stack_resources).then_output(|| {
            ListStackResourcesOutput::builder()
                .stack_resource_summaries(resource_summary("Second"))
                .build()
        });
        let client = mock_client!(
            aws_sdk_cloudformation,
            RuleMode::Sequential,
            [&first_page, &last_page]
        );

        let resources = AwsCloudFormation::new(client)
            .stack_resources("my-stack")
            .await
            .unwrap();

        let ids: Vec<_> = resources
            .iter()
            .map(|r| r.logical_resource_id.as_str())
            .collect();
        assert_eq!(ids, ["First", "Second"]);
    }

    #[tokio::test]
    async fn list_stacks_follows_pagination_tokens() {
        use aws_smithy_mocks::{mock, mock_client, RuleMode};
        use cfn::operation::describe_stacks::DescribeStacksOutput;

        let first_page = mock!(cfn::Client::describe_stacks).then_output(|| {
            DescribeStacksOutput::builder()
                .stacks(stack("alpha"))
                .next_token("page-2")
                .build()
        });
        let last_page = mock!(cfn::Client::describe_stacks)
            .then_output(|| DescribeStacksOutput::builder().stacks(stack("beta")).build());
        let client = mock_client!(
            aws_sdk_cloudformation,
            RuleMode::Sequential,
            [&first_page, &last_page]
        );

        let stacks = AwsCloudFormation::new(client).list_stacks(None).await.unwrap();

        let names: Vec<_> = stacks.iter().map(|s| s.stack_name.as_str()).collect();
        assert_eq!(names, ["alpha", "beta"]);
    }

    #[test]
    fn change_set_terminal_predicate() {
        let mut snap = ChangeSetSnapshot {
            status: "CREATE_PENDING".into(),
            status_reason: None,
            changes: vec![],
        };
        assert!(!snap.is_terminal());
        snap.status = "CREATE_IN_PROGRESS".into();
        assert!(!snap.is_terminal());
        snap.status = "CREATE_COMPLETE".into();
        assert!(snap.is_terminal());
        snap.status = "FAILED".into();
        assert!(snap.is_terminal());
    }

    #[test]
    fn change_serializes_with_contract_field_names() {
        let change = Change {
            action: Some("Add".into()),
            logical_resource_id: Some("Bucket".into()),
            physical_resource_id: None,
            resource_type: Some("AWS::S3::Bucket".into()),
            details: vec![ChangeDetail {
                attribute: Some("Properties".into()),
                name: Some("BucketName".into()),
            }],
        };
        let value = serde_json::to_value(&change).unwrap();
        assert_eq!(value["Action"], "Add");
        assert_eq!(value["LogicalResourceId"], "Bucket");
        assert_eq!(value["Details"][0]["attribute"], "Properties");
        assert_eq!(value["Details"][0]["name"], "BucketName");
    }
}
