//! Core application modules.

pub mod api;
pub mod changeset;
pub mod cli;
pub mod diff;
pub mod error;
pub mod events;
pub mod naming;
pub mod options;
pub mod orchestrator;
pub mod output;
pub mod poller;
pub mod prompt;
pub mod template;
