//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results.
//!
//! # Architecture
//!
//! Commands are dispatched via [`CommandDispatcher`], which routes CLI
//! subcommands to their implementations and carries the settings every
//! command shares (project root, config path, engine override).

pub mod apply;
pub mod destroy;
pub mod dispatcher;
pub mod display;

pub use dispatcher::{Command, CommandContext, CommandDispatcher, CommandResult};
