//! Command-line surface.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::app::error::Result;
use crate::app::options::{merge_parameters, OperationOptions};

#[derive(Debug, Parser)]
#[command(name = "kumogata", version, about = "CloudFormation stack lifecycle tool")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short = 'k', long = "access-key", global = true, value_name = "ACCESS_KEY")]
    pub access_key: Option<String>,

    #[arg(short = 's', long = "secret-key", global = true, value_name = "SECRET_KEY")]
    pub secret_key: Option<String>,

    #[arg(short = 'r', long, global = true, value_name = "REGION")]
    pub region: Option<String>,

    #[arg(long, global = true, value_name = "PROFILE")]
    pub profile: Option<String>,

    /// Output format for export/convert (a registered plugin extension).
    #[arg(long, global = true, value_name = "FORMAT")]
    pub output_format: Option<String>,

    /// Template parameters as KEY=VALUE pairs.
    #[arg(short = 'p', long, global = true, value_name = "KEY_VALUES", value_delimiter = ',')]
    pub parameters: Vec<String>,

    /// Template parameters as a JSON object; overrides same-named pairs.
    #[arg(short = 'j', long, global = true, value_name = "JSON")]
    pub json_parameters: Option<String>,

    #[arg(long, global = true)]
    pub deletion_policy_retain: bool,

    #[arg(long, global = true)]
    pub disable_rollback: bool,

    #[arg(long, global = true, value_name = "MINUTES")]
    pub timeout_in_minutes: Option<i32>,

    #[arg(long, global = true, value_name = "ARNS", value_delimiter = ',')]
    pub notification_arns: Vec<String>,

    #[arg(long, global = true, value_name = "CAPABILITIES", value_delimiter = ',')]
    pub capabilities: Vec<String>,

    #[arg(long, global = true, value_name = "RESOURCE_TYPES", value_delimiter = ',')]
    pub resource_types: Vec<String>,

    #[arg(long, global = true, value_name = "ON_FAILURE")]
    pub on_failure: Option<String>,

    #[arg(long, global = true, value_name = "BODY")]
    pub stack_policy_body: Option<String>,

    #[arg(long, global = true, value_name = "URL")]
    pub stack_policy_url: Option<String>,

    #[arg(long, global = true)]
    pub use_previous_template: bool,

    #[arg(long, global = true, value_name = "BODY")]
    pub stack_policy_during_update_body: Option<String>,

    #[arg(long, global = true, value_name = "URL")]
    pub stack_policy_during_update_url: Option<String>,

    /// Persist the create/update result to this path.
    #[arg(long, global = true, value_name = "PATH")]
    pub result_log: Option<PathBuf>,

    /// Submit the operation and return without polling.
    #[arg(long, global = true)]
    pub detach: bool,

    /// Skip the delete confirmation.
    #[arg(long, global = true)]
    pub force: bool,

    #[arg(long, global = true)]
    pub color: bool,

    /// Ignore whitespace differences in `diff`.
    #[arg(long, global = true)]
    pub ignore_all_space: bool,

    #[arg(long, global = true)]
    pub debug: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Describe a specified stack.
    Describe { stack_name: String },
    /// Create resources as specified in the template.
    Create {
        path_or_url: String,
        stack_name: Option<String>,
    },
    /// Update a stack as specified in the template.
    Update {
        path_or_url: String,
        stack_name: String,
    },
    /// Delete a specified stack.
    Delete { stack_name: String },
    /// Validate a specified template.
    Validate { path_or_url: String },
    /// List summary information for stacks.
    List { stack_name: Option<String> },
    /// Export a template from a specified stack.
    Export { stack_name: String },
    /// Convert a template format.
    Convert { path_or_url: String },
    /// Compare templates logically (file, http://..., stack://...).
    Diff {
        path_or_url1: String,
        path_or_url2: String,
    },
    /// Create a change set and show it.
    DryRun {
        path_or_url: String,
        stack_name: Option<String>,
    },
    /// Show events for a specified stack.
    ShowEvents { stack_name: String },
    /// Show outputs for a specified stack.
    ShowOutputs { stack_name: String },
    /// Show resources for a specified stack.
    ShowResources { stack_name: String },
    /// Show template information for a stack or template.
    TemplateSummary { path_or_url: String },
}

impl Cli {
    /// Flatten the parsed flags into the orchestrator's option snapshot.
    pub fn to_options(&self) -> Result<OperationOptions> {
        let parameters = merge_parameters(&self.parameters, self.json_parameters.as_deref())?;

        Ok(OperationOptions {
            region: self.region.clone(),
            profile: self.profile.clone(),
            access_key_id: self.access_key.clone(),
            secret_access_key: self.secret_key.clone(),
            parameters,
            deletion_policy_retain: self.deletion_policy_retain,
            disable_rollback: self.disable_rollback.then_some(true),
            timeout_in_minutes: self.timeout_in_minutes,
            notification_arns: self.notification_arns.clone(),
            capabilities: self.capabilities.clone(),
            resource_types: self.resource_types.clone(),
            on_failure: self.on_failure.clone(),
            stack_policy_body: self.stack_policy_body.clone(),
            stack_policy_url: self.stack_policy_url.clone(),
            use_previous_template: self.use_previous_template.then_some(true),
            stack_policy_during_update_body: self.stack_policy_during_update_body.clone(),
            stack_policy_during_update_url: self.stack_policy_during_update_url.clone(),
            output_format: self.output_format.clone(),
            result_log: self.result_log.clone(),
            detach: self.detach,
            force: self.force,
            color: self.color,
            ignore_all_space: self.ignore_all_space,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_create_with_flags() {
        let cli = Cli::parse_from([
            "kumogata",
            "create",
            "template.yaml",
            "my-stack",
            "-p",
            "Env=dev,Size=small",
            "--deletion-policy-retain",
            "--result-log",
            "out.json",
        ]);

        match &cli.command {
            Command::Create {
                path_or_url,
                stack_name,
            } => {
                assert_eq!(path_or_url, "template.yaml");
                assert_eq!(stack_name.as_deref(), Some("my-stack"));
            }
            other => panic!("unexpected command: {other:?}"),
        }

        let options = cli.to_options().unwrap();
        assert!(options.deletion_policy_retain);
        assert_eq!(options.parameters.len(), 2);
        assert_eq!(options.result_log.as_deref().unwrap().to_str(), Some("out.json"));
    }

    #[test]
    fn json_parameters_override_pairs() {
        let cli = Cli::parse_from([
            "kumogata",
            "dry-run",
            "template.json",
            "my-stack",
            "-p",
            "Env=dev",
            "-j",
            r#"{"Env": "prod"}"#,
        ]);
        let options = cli.to_options().unwrap();
        assert_eq!(
            options.parameters,
            vec![("Env".to_string(), "prod".to_string())]
        );
    }

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
