//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// infrapipe - Multi-step infrastructure provisioning pipelines.
#[derive(Debug, Parser)]
#[command(name = "infrapipe")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to config file (overrides default infrapipe.yml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to project root (overrides current directory)
    #[arg(short, long, global = true)]
    pub project: Option<PathBuf>,

    /// Provisioning engine binary (overrides settings.engine)
    #[arg(long, global = true, env = "INFRAPIPE_ENGINE")]
    pub engine: Option<String>,

    /// Show verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// No output except errors
    #[arg(long, global = true, conflicts_with_all = ["verbose", "quiet"])]
    pub silent: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Apply every pipeline step in declared order
    Apply(ApplyArgs),

    /// Destroy pipeline steps (all, in reverse order, when none are named)
    Destroy(DestroyArgs),
}

/// Arguments for the `apply` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ApplyArgs {}

/// Arguments for the `destroy` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct DestroyArgs {
    /// Steps to destroy, in the order given
    #[arg(value_name = "STEP")]
    pub steps: Vec<String>,
}
