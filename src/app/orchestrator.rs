//! Stack operation orchestration.
//!
//! [`StackManager`] sequences every operation: it validates the stack
//! name, prepares the template, submits the remote call, drives the
//! completion poller while streaming new events, classifies the terminal
//! status, and shapes the result payloads. One invocation owns one event
//! log; nothing is cached across operations.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::app::api::{
    Change, ChangeSetParams, CloudApi, StackParams, StackSnapshot, TemplateSummarySource,
};
use crate::app::changeset;
use crate::app::diff::{self, DiffOptions};
use crate::app::error::{Error, Result};
use crate::app::events::EventLog;
use crate::app::naming::{normalize_stack_name, random_stack_name, validate_stack_name};
use crate::app::options::OperationOptions;
use crate::app::output;
use crate::app::poller::{wait_until_terminal, PollTarget};
use crate::app::prompt::ConfirmPrompt;
use crate::app::template::{
    self, plugin::FormatRegistry, submission_body, stringify, DeletionPolicy, Document,
};

pub struct StackManager {
    api: Arc<dyn CloudApi>,
    registry: FormatRegistry,
    prompt: Box<dyn ConfirmPrompt>,
    options: OperationOptions,
}

/// Polls one stack to a terminal state, draining and printing newly
/// observed events on every tick.
struct StackPoll<'a> {
    api: &'a dyn CloudApi,
    stack_name: &'a str,
    log: &'a mut EventLog,
}

#[async_trait]
impl PollTarget for StackPoll<'_> {
    type Snapshot = StackSnapshot;

    async fn fetch(&mut self) -> Result<StackSnapshot> {
        Ok(self.api.describe_stack(self.stack_name).await?)
    }

    fn is_terminal(&self, snapshot: &StackSnapshot) -> bool {
        snapshot.is_terminal()
    }

    async fn on_tick(&mut self, _snapshot: &StackSnapshot) -> Result<()> {
        let events = self.api.stack_events(self.stack_name).await?;
        for event in self.log.drain(events) {
            output::print_progress_line(&event);
        }
        Ok(())
    }
}

impl StackManager {
    pub fn new(
        api: Arc<dyn CloudApi>,
        registry: FormatRegistry,
        prompt: Box<dyn ConfirmPrompt>,
        options: OperationOptions,
    ) -> Self {
        Self {
            api,
            registry,
            prompt,
            options,
        }
    }

    /// Create a stack from a template source. Without a name an ephemeral
    /// stack is created under a generated name, its results are collected,
    /// and it is deleted again. Returns `None` when detached.
    pub async fn create(
        &self,
        path_or_url: &str,
        stack_name: Option<&str>,
    ) -> Result<Option<HashMap<String, String>>> {
        let stack_name = stack_name.map(normalize_stack_name);
        if let Some(name) = stack_name {
            validate_stack_name(name)?;
        }

        let mut template = self.open_template(path_or_url).await?;
        let ephemeral = stack_name.is_none();
        template::update_deletion_policy(
            &mut template,
            DeletionPolicy {
                ephemeral,
                retain_option: self.options.deletion_policy_retain,
                touch_metadata: false,
            },
        );

        let stack_name = stack_name
            .map(str::to_string)
            .unwrap_or_else(random_stack_name);
        info!("Creating stack: {stack_name}");

        let params = self.create_params(&stack_name, submission_body(&template)?);
        self.api.create_stack(params).await?;

        if self.options.detach {
            return Ok(None);
        }

        let mut log = EventLog::new();
        let (snapshot, completed) = self
            .wait_stack(&stack_name, "CREATE_COMPLETE", &mut log)
            .await?;
        if !completed {
            return Err(Error::stack_operation(
                "Create failed",
                &stack_name,
                snapshot.status_reason.as_deref(),
            ));
        }

        let outputs = snapshot.outputs_map();
        let summaries = self.api.stack_resources(&stack_name).await?;

        if ephemeral {
            self.delete_stack(&stack_name).await?;
        }

        output::print_result_block(&summaries, &outputs)?;
        self.save_result_log(&stack_name, &summaries, &outputs)?;
        self.post_process(path_or_url, &outputs)?;

        Ok(Some(outputs))
    }

    /// Update an existing stack. A missing stack surfaces as a remote
    /// not-found error from the initial describe. Returns `None` when
    /// detached.
    pub async fn update(
        &self,
        path_or_url: &str,
        stack_name: &str,
    ) -> Result<Option<HashMap<String, String>>> {
        let stack_name = normalize_stack_name(stack_name);
        validate_stack_name(stack_name)?;

        let mut template = self.open_template(path_or_url).await?;
        template::update_deletion_policy(
            &mut template,
            DeletionPolicy {
                ephemeral: false,
                retain_option: self.options.deletion_policy_retain,
                touch_metadata: true,
            },
        );

        // Existence check; doubles as the pre-update fetch.
        self.api.describe_stack(stack_name).await?;

        info!("Updating stack: {stack_name}");

        // Seed with existing history so it is not reprinted as new.
        let mut log = EventLog::new();
        log.seed(self.api.stack_events(stack_name).await?);

        let params = self.update_params(stack_name, submission_body(&template)?);
        self.api.update_stack(params).await?;

        if self.options.detach {
            return Ok(None);
        }

        // The submit may invalidate the previously held snapshot; polling
        // re-fetches from scratch.
        let (snapshot, completed) = self
            .wait_stack(stack_name, "UPDATE_COMPLETE", &mut log)
            .await?;
        if !completed {
            return Err(Error::stack_operation(
                "Update failed",
                stack_name,
                snapshot.status_reason.as_deref(),
            ));
        }

        let outputs = snapshot.outputs_map();
        let summaries = self.api.stack_resources(stack_name).await?;

        output::print_result_block(&summaries, &outputs)?;
        self.save_result_log(stack_name, &summaries, &outputs)?;
        self.post_process(path_or_url, &outputs)?;

        Ok(Some(outputs))
    }

    /// Delete a stack after confirmation (unless forced).
    pub async fn delete(&self, stack_name: &str) -> Result<()> {
        let stack_name = normalize_stack_name(stack_name);
        validate_stack_name(stack_name)?;

        // Existence check before prompting.
        self.api.describe_stack(stack_name).await?;

        let confirmed = self.options.force
            || self
                .prompt
                .confirm(&format!("Are you sure you want to delete `{stack_name}`? "))?;
        if confirmed {
            self.delete_stack(stack_name).await?;
        }
        Ok(())
    }

    /// Compute a change preview for applying a template. Returns `None`
    /// when the preview failed to materialize changes.
    pub async fn dry_run(
        &self,
        path_or_url: &str,
        stack_name: Option<&str>,
    ) -> Result<Option<Vec<Change>>> {
        let stack_name = stack_name.map(normalize_stack_name);
        if let Some(name) = stack_name {
            validate_stack_name(name)?;
        }

        let mut template = self.open_template(path_or_url).await?;
        template::update_deletion_policy(
            &mut template,
            DeletionPolicy {
                ephemeral: stack_name.is_none(),
                retain_option: self.options.deletion_policy_retain,
                touch_metadata: false,
            },
        );

        let stack_name = stack_name.unwrap_or_default();
        let params = self.change_set_params(stack_name, submission_body(&template)?);
        changeset::preview(self.api.as_ref(), params).await
    }

    /// Pretty JSON of a stack's current remote state.
    pub async fn describe(&self, stack_name: &str) -> Result<String> {
        let stack_name = normalize_stack_name(stack_name);
        validate_stack_name(stack_name)?;
        let snapshot = self.api.describe_stack(stack_name).await?;
        Ok(serde_json::to_string_pretty(&snapshot.to_detail())?)
    }

    /// Summary list of stacks, optionally filtered to one name.
    pub async fn list(&self, stack_name: Option<&str>) -> Result<String> {
        let stack_name = stack_name.map(normalize_stack_name);
        if let Some(name) = stack_name {
            validate_stack_name(name)?;
        }
        let stacks = self.api.list_stacks(stack_name).await?;
        Ok(serde_json::to_string_pretty(&stacks)?)
    }

    /// Remote-side template validation.
    pub async fn validate(&self, path_or_url: &str) -> Result<()> {
        let template = self.open_template(path_or_url).await?;
        self.api.validate_template(&submission_body(&template)?).await?;
        info!("Template validated successfully");
        Ok(())
    }

    /// Export a stack's current template in the requested output format.
    pub async fn export(&self, stack_name: &str) -> Result<String> {
        let stack_name = normalize_stack_name(stack_name);
        validate_stack_name(stack_name)?;
        let template = self.export_template(stack_name).await?;
        self.convert_document(&template)
    }

    /// Re-dump a template source in the requested output format.
    pub async fn convert(&self, path_or_url: &str) -> Result<String> {
        let template = self.open_template(path_or_url).await?;
        self.convert_document(&template)
    }

    /// Logical diff of two template locators (file, http(s) URL, or
    /// `stack://<name>`), canonicalized so encoding differences vanish.
    pub async fn diff(&self, path_or_url1: &str, path_or_url2: &str) -> Result<String> {
        let left = self.canonical_text(path_or_url1).await?;
        let right = self.canonical_text(path_or_url2).await?;
        Ok(diff::unified(
            &left,
            &right,
            path_or_url1,
            path_or_url2,
            DiffOptions {
                ignore_all_space: self.options.ignore_all_space,
                color: self.options.color,
            },
        ))
    }

    pub async fn show_events(&self, stack_name: &str) -> Result<String> {
        let stack_name = normalize_stack_name(stack_name);
        validate_stack_name(stack_name)?;
        let events = self.api.stack_events(stack_name).await?;
        Ok(serde_json::to_string_pretty(&events)?)
    }

    pub async fn show_outputs(&self, stack_name: &str) -> Result<String> {
        let stack_name = normalize_stack_name(stack_name);
        validate_stack_name(stack_name)?;
        let snapshot = self.api.describe_stack(stack_name).await?;
        Ok(serde_json::to_string_pretty(&snapshot.outputs_map())?)
    }

    pub async fn show_resources(&self, stack_name: &str) -> Result<String> {
        let stack_name = normalize_stack_name(stack_name);
        validate_stack_name(stack_name)?;
        let resources = self.api.stack_resources(stack_name).await?;
        Ok(serde_json::to_string_pretty(&resources)?)
    }

    /// Template summary for either a template source or `stack://<name>`.
    pub async fn template_summary(&self, path_or_url: &str) -> Result<String> {
        let source = if let Some(name) = path_or_url.strip_prefix("stack://") {
            validate_stack_name(name)?;
            TemplateSummarySource::StackName(name.to_string())
        } else {
            let template = self.open_template(path_or_url).await?;
            TemplateSummarySource::TemplateBody(serde_json::to_string_pretty(&template)?)
        };
        let summary = self.api.get_template_summary(source).await?;
        Ok(serde_json::to_string_pretty(&summary)?)
    }

    // ---- internals ----

    async fn open_template(&self, path_or_url: &str) -> Result<Document> {
        let format = self.registry.for_source(path_or_url)?;
        let text = template::read_source(path_or_url).await?;
        format.parse(&text)
    }

    async fn export_template(&self, stack_name: &str) -> Result<Document> {
        let body = self.api.get_template(stack_name).await?;
        serde_json::from_str(&body).map_err(|e| Error::TemplateParse(e.to_string()))
    }

    fn convert_document(&self, template: &Document) -> Result<String> {
        let ext = self.options.output_format.as_deref().unwrap_or("template");
        let format = self
            .registry
            .find_by_ext(ext)
            .ok_or_else(|| Error::UnknownFormat(ext.to_string()))?;
        format.dump(template)
    }

    async fn canonical_text(&self, path_or_url: &str) -> Result<String> {
        let template = if let Some(name) = path_or_url.strip_prefix("stack://") {
            validate_stack_name(name)?;
            self.export_template(name).await?
        } else {
            self.open_template(path_or_url).await?
        };
        let mut text = serde_json::to_string_pretty(&stringify(&template))?;
        text.push('\n');
        Ok(text)
    }

    /// Poll to terminal, flush events one last time, and classify the
    /// final status against the expected complete value.
    async fn wait_stack(
        &self,
        stack_name: &str,
        complete_status: &str,
        log: &mut EventLog,
    ) -> Result<(StackSnapshot, bool)> {
        let snapshot = {
            let mut poll = StackPoll {
                api: self.api.as_ref(),
                stack_name,
                log,
            };
            wait_until_terminal(&mut poll).await?
        };

        // Events may land between the last tick and terminal confirmation.
        let events = self.api.stack_events(stack_name).await?;
        for event in log.drain(events) {
            output::print_progress_line(&event);
        }

        let completed = snapshot.status == complete_status;
        info!("{}", if completed { "Success" } else { "Failure" });
        Ok((snapshot, completed))
    }

    /// Delete without prompting; used by the public delete path and for
    /// tearing down ephemeral auto-named stacks. A "stack does not exist"
    /// raised while re-acquiring or polling means the stack legitimately
    /// vanished and counts as completion.
    async fn delete_stack(&self, stack_name: &str) -> Result<()> {
        self.api.describe_stack(stack_name).await?;

        info!("Deleting stack: {stack_name}");
        let mut log = EventLog::new();
        log.seed(self.api.stack_events(stack_name).await?);

        self.api.delete_stack(stack_name).await?;

        if self.options.detach {
            return Ok(());
        }

        match self.wait_stack(stack_name, "DELETE_COMPLETE", &mut log).await {
            Ok((snapshot, completed)) => {
                if !completed {
                    return Err(Error::stack_operation(
                        "Delete failed",
                        stack_name,
                        snapshot.status_reason.as_deref(),
                    ));
                }
            }
            Err(err) if err.is_not_found() => {}
            Err(err) => return Err(err),
        }

        info!("Success");
        Ok(())
    }

    fn create_params(&self, stack_name: &str, template_body: String) -> StackParams {
        let o = &self.options;
        StackParams {
            stack_name: stack_name.to_string(),
            template_body,
            parameters: o.parameters.clone(),
            disable_rollback: o.disable_rollback,
            timeout_in_minutes: o.timeout_in_minutes,
            notification_arns: o.notification_arns.clone(),
            capabilities: o.capabilities.clone(),
            resource_types: o.resource_types.clone(),
            on_failure: o.on_failure.clone(),
            stack_policy_body: o.stack_policy_body.clone(),
            stack_policy_url: o.stack_policy_url.clone(),
            ..Default::default()
        }
    }

    fn update_params(&self, stack_name: &str, template_body: String) -> StackParams {
        let o = &self.options;
        StackParams {
            stack_name: stack_name.to_string(),
            template_body,
            parameters: o.parameters.clone(),
            use_previous_template: o.use_previous_template,
            notification_arns: o.notification_arns.clone(),
            capabilities: o.capabilities.clone(),
            resource_types: o.resource_types.clone(),
            stack_policy_body: o.stack_policy_body.clone(),
            stack_policy_url: o.stack_policy_url.clone(),
            stack_policy_during_update_body: o.stack_policy_during_update_body.clone(),
            stack_policy_during_update_url: o.stack_policy_during_update_url.clone(),
            ..Default::default()
        }
    }

    fn change_set_params(&self, stack_name: &str, template_body: String) -> ChangeSetParams {
        let o = &self.options;
        ChangeSetParams {
            stack_name: stack_name.to_string(),
            change_set_name: changeset::change_set_name(stack_name),
            template_body,
            parameters: o.parameters.clone(),
            use_previous_template: o.use_previous_template,
            notification_arns: o.notification_arns.clone(),
            capabilities: o.capabilities.clone(),
            resource_types: o.resource_types.clone(),
        }
    }

    fn save_result_log(
        &self,
        stack_name: &str,
        summaries: &[crate::app::api::ResourceSummary],
        outputs: &HashMap<String, String>,
    ) -> Result<()> {
        if let Some(path) = &self.options.result_log {
            output::write_result_log(path, stack_name, summaries, outputs)?;
            info!("(Save to `{}`)", path.display());
        }
        Ok(())
    }

    fn post_process(&self, path_or_url: &str, outputs: &HashMap<String, String>) -> Result<()> {
        let format = self.registry.for_source(path_or_url)?;
        format.post(outputs)
    }
}
