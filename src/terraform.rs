//! Drives the terraform CLI for a single mixin action.

mod actions;
mod args;
mod outputs;

pub use actions::ActionKind;
pub use outputs::trim_output;

use std::collections::BTreeMap;

use crate::config::{MixinConfig, TF_LOG_ENV};
use crate::context::ExecutionContext;
use crate::error::{CommandError, MixinError};
use crate::runner::CommandRunner;
use crate::step::Step;

pub struct Mixin<R> {
    config: MixinConfig,
    runner: R,
    context: ExecutionContext,
}

impl<R: CommandRunner> Mixin<R> {
    pub fn new(config: MixinConfig, runner: R, context: ExecutionContext) -> Self {
        Self {
            config,
            runner,
            context,
        }
    }

    pub fn config(&self) -> &MixinConfig {
        &self.config
    }

    pub fn context(&self) -> &ExecutionContext {
        &self.context
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Runs `terraform <args>` in the current context and returns its stdout.
    async fn terraform<I, S>(&self, args: I) -> Result<Vec<u8>, CommandError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let invocation = self.context.invocation(&self.config.terraform_path, args);
        self.runner.run(&invocation).await
    }

    /// Runs `terraform <args>` with its stdout going straight to ours, so
    /// progress stays visible even when the command fails.
    async fn terraform_streamed<I, S>(&self, args: I) -> Result<(), CommandError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let invocation = self
            .context
            .invocation(&self.config.terraform_path, args)
            .inherit_stdout();
        self.runner.run(&invocation).await?;
        Ok(())
    }

    /// Setup shared by every action: log level, working directory, then
    /// `terraform init`. Init reads both, so the order is fixed.
    pub async fn command_pre_run(&mut self, step: &Step) -> Result<(), MixinError> {
        if !step.log_level.is_empty() {
            self.context.set_env(TF_LOG_ENV, step.log_level.as_str());
        }

        let working_dir = step
            .working_dir
            .clone()
            .unwrap_or_else(|| self.config.working_dir.clone());
        let dir = self.context.change_dir(&working_dir)?.to_path_buf();
        if self.context.debug() {
            eprintln!("Terraform working directory is {}", dir.display());
        }
        tracing::debug!(dir = %dir.display(), "changed working directory");

        println!("Initializing Terraform...");
        self.init(&step.backend_config)
            .await
            .map_err(MixinError::Init)
    }

    async fn init(
        &self,
        backend_config: &BTreeMap<String, serde_json::Value>,
    ) -> Result<(), CommandError> {
        let mut init_args = vec!["init".to_string()];
        if !backend_config.is_empty() {
            init_args.extend(args::backend_config_args(backend_config));
            init_args.push("-reconfigure".to_string());
        }

        self.terraform_streamed(init_args).await?;
        tracing::info!("terraform initialized");
        Ok(())
    }
}
