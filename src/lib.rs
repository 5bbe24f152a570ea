//! terraform-mixin - runs terraform as a step of a bundle
//!
//! Reads a step description from stdin, drives the terraform CLI in the step's
//! working directory and writes the requested outputs where the host
//! orchestrator collects them.

pub mod build;
pub mod config;
pub mod context;
pub mod error;
pub mod payload;
pub mod runner;
pub mod schema;
pub mod step;
pub mod terraform;
pub mod version;

pub use config::MixinConfig;
pub use context::ExecutionContext;
pub use error::{CommandError, MixinError};
pub use payload::read_payload;
pub use runner::{CommandRunner, Invocation, ProcessRunner, StdoutMode};
pub use step::{Action, Output, Step};
pub use terraform::{ActionKind, Mixin};
pub use version::{VersionFormat, VersionInfo};
