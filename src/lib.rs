//! infrapipe - Multi-step infrastructure provisioning pipelines.
//!
//! A pipeline config names an ordered list of modules ("steps") that are
//! provisioned independently by an external engine (Terraform or a
//! compatible CLI). Resources created by one step can be injected into later
//! steps as data-source lookups.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Pipeline config loading, merging, and validation
//! - [`error`] - Error types and result aliases
//! - [`inject`] - Cross-step injection resolution
//! - [`outputs`] - Resolved outputs shared between steps
//! - [`provision`] - Provisioning engine driver and state artifacts
//! - [`render`] - Generated module fragments
//! - [`runner`] - Pipeline apply/destroy orchestration
//! - [`ui`] - Terminal output
//! - [`workspace`] - Per-step workspace staging
//!
//! # Example
//!
//! ```
//! use infrapipe::inject::InjectSpec;
//! use infrapipe::render::{lookup_attribute, lookup_blocks, render_blocks};
//! use infrapipe::outputs::ResolvedOutput;
//!
//! let vpc = InjectSpec::parse("vpc", "network.aws_vpc.main").unwrap();
//! let resolved = ResolvedOutput::from_inject(&vpc, "vpc-0abc");
//!
//! assert_eq!(lookup_attribute("aws_vpc"), "id");
//! assert_eq!(
//!     render_blocks(&lookup_blocks(&[resolved])),
//!     "data \"aws_vpc\" \"vpc\" {\n  id = \"vpc-0abc\"\n}\n"
//! );
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod inject;
pub mod outputs;
pub mod provision;
pub mod render;
pub mod runner;
pub mod ui;
pub mod workspace;

pub use error::{PipelineError, Result};
