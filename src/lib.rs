//! Kumogata - CloudFormation stack lifecycle tool
//!
//! Kumogata drives the lifecycle of CloudFormation stacks from the command
//! line: creating, updating, deleting and inspecting stacks described by
//! JSON or YAML templates, streaming resource events while an operation is
//! in flight, and computing change-set previews before anything is applied.
//!
//! # Architecture
//!
//! - **Orchestration** ([`app::orchestrator::StackManager`]): sequences the
//!   remote calls for each operation and classifies terminal stack states.
//! - **Remote boundary** ([`app::api::CloudApi`]): a trait over the
//!   CloudFormation API returning immutable snapshots, implemented by
//!   [`app::api::AwsCloudFormation`] and by scripted fakes in tests.
//! - **Completion polling** ([`app::poller`]): fixed-interval polling until
//!   a stack or change set reaches a terminal status.
//! - **Event streaming** ([`app::events::EventLog`]): deduplicated,
//!   time-ordered stack event printing across poll ticks.
//! - **Templates** ([`app::template`]): format plugins keyed by file
//!   extension, canonical deep-stringification for diffing, and the
//!   deletion-policy rewrite applied before submission.

#![warn(clippy::all, rust_2018_idioms)]

pub mod app;

pub use app::error::Error;
pub use app::orchestrator::StackManager;
