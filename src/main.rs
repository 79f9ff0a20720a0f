#![warn(clippy::all, rust_2018_idioms)]

use std::sync::Arc;

use anyhow::Result;
use aws_config::{BehaviorVersion, Region};
use aws_credential_types::Credentials;
use aws_sdk_cloudformation as cfn;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use kumogata::app::api::AwsCloudFormation;
use kumogata::app::cli::{Cli, Command};
use kumogata::app::options::OperationOptions;
use kumogata::app::prompt::StdinPrompt;
use kumogata::app::template::plugin::FormatRegistry;
use kumogata::StackManager;

fn init_logging(debug: bool) {
    let default_directive = if debug {
        "kumogata=debug,aws_config=warn,aws_smithy_runtime=warn,hyper=warn"
    } else {
        "kumogata=info,aws_config=warn,aws_smithy_runtime=warn,hyper=warn"
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn build_client(options: &OperationOptions) -> cfn::Client {
    let mut loader = aws_config::defaults(BehaviorVersion::latest());
    if let Some(region) = &options.region {
        loader = loader.region(Region::new(region.clone()));
    }
    if let Some(profile) = &options.profile {
        loader = loader.profile_name(profile);
    }
    if let (Some(key), Some(secret)) = (&options.access_key_id, &options.secret_access_key) {
        loader = loader.credentials_provider(Credentials::from_keys(key, secret, None));
    }
    let config = loader.load().await;
    cfn::Client::new(&config)
}

async fn run(cli: Cli) -> Result<()> {
    let options = cli.to_options()?;
    let client = build_client(&options).await;
    let api = Arc::new(AwsCloudFormation::new(client));
    let prompt = Box::new(StdinPrompt {
        color: options.color,
    });
    let manager = StackManager::new(api, FormatRegistry::with_builtins(), prompt, options);

    match &cli.command {
        Command::Describe { stack_name } => {
            println!("{}", manager.describe(stack_name).await?);
        }
        Command::Create {
            path_or_url,
            stack_name,
        } => {
            manager.create(path_or_url, stack_name.as_deref()).await?;
        }
        Command::Update {
            path_or_url,
            stack_name,
        } => {
            manager.update(path_or_url, stack_name).await?;
        }
        Command::Delete { stack_name } => {
            manager.delete(stack_name).await?;
        }
        Command::Validate { path_or_url } => {
            manager.validate(path_or_url).await?;
        }
        Command::List { stack_name } => {
            println!("{}", manager.list(stack_name.as_deref()).await?);
        }
        Command::Export { stack_name } => {
            println!("{}", manager.export(stack_name).await?);
        }
        Command::Convert { path_or_url } => {
            println!("{}", manager.convert(path_or_url).await?);
        }
        Command::Diff {
            path_or_url1,
            path_or_url2,
        } => {
            print!("{}", manager.diff(path_or_url1, path_or_url2).await?);
        }
        Command::DryRun {
            path_or_url,
            stack_name,
        } => {
            // No materialized changes is a routine outcome, not a failure;
            // the reason was already logged during the preview.
            if let Some(changes) = manager.dry_run(path_or_url, stack_name.as_deref()).await? {
                println!("{}", serde_json::to_string_pretty(&changes)?);
            }
        }
        Command::ShowEvents { stack_name } => {
            println!("{}", manager.show_events(stack_name).await?);
        }
        Command::ShowOutputs { stack_name } => {
            println!("{}", manager.show_outputs(stack_name).await?);
        }
        Command::ShowResources { stack_name } => {
            println!("{}", manager.show_resources(stack_name).await?);
        }
        Command::TemplateSummary { path_or_url } => {
            println!("{}", manager.template_summary(path_or_url).await?);
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.debug);

    if let Err(err) = run(cli).await {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
