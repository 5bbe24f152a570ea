use std::fmt;

use super::{Mixin, args};
use crate::error::MixinError;
use crate::runner::CommandRunner;
use crate::step::{Action, Step};

/// The bundle action being executed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionKind {
    Install,
    Upgrade,
    /// A custom action; the name doubles as the terraform subcommand when
    /// the step has no explicit arguments.
    Invoke(String),
    Uninstall,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionKind::Install => f.write_str("install"),
            ActionKind::Upgrade => f.write_str("upgrade"),
            ActionKind::Invoke(name) => f.write_str(name),
            ActionKind::Uninstall => f.write_str("uninstall"),
        }
    }
}

impl<R: CommandRunner> Mixin<R> {
    /// Parses the payload and runs the full action: pre-run, the terraform
    /// command for `kind`, then output capture.
    pub async fn execute(&mut self, kind: &ActionKind, payload: &[u8]) -> Result<(), MixinError> {
        let Action { name, step } = Action::parse(payload)?;
        if name != kind.to_string() {
            return Err(MixinError::InvalidStep(format!(
                "payload is for action '{}', but '{}' was requested",
                name, kind
            )));
        }
        tracing::info!(action = %kind, "executing action");

        if !step.description.is_empty() {
            println!("{}", step.description);
        }

        self.command_pre_run(&step).await?;

        let action_args = match kind {
            ActionKind::Install | ActionKind::Upgrade => self.change_args("apply", &step).await?,
            ActionKind::Uninstall => self.change_args("destroy", &step).await?,
            ActionKind::Invoke(action) => invoke_args(action, &step),
        };
        self.terraform_streamed(action_args).await?;

        self.handle_outputs(&step.outputs).await
    }

    /// `apply` and `destroy` share their flags; only the subcommand differs.
    async fn change_args(&self, subcommand: &str, step: &Step) -> Result<Vec<String>, MixinError> {
        let mut cmd = vec![
            subcommand.to_string(),
            "-auto-approve".to_string(),
            "-input=false".to_string(),
        ];
        cmd.extend(self.var_args(step).await?);
        cmd.extend(args::flag_args(&step.flags));
        Ok(cmd)
    }

    /// Either writes the step's vars to the var file and points terraform at
    /// it, or passes them inline when the var file is disabled.
    async fn var_args(&self, step: &Step) -> Result<Vec<String>, MixinError> {
        if step.vars.is_empty() {
            return Ok(Vec::new());
        }
        if step.disable_var_file {
            return Ok(args::var_args(&step.vars));
        }

        let path = self.context.dir().join(&self.config.var_file);
        let contents = serde_json::to_vec_pretty(&step.vars)?;
        tokio::fs::write(&path, contents)
            .await
            .map_err(|source| MixinError::VarFile {
                path: path.clone(),
                source,
            })?;
        tracing::debug!(path = %path.display(), vars = step.vars.len(), "wrote variable file");

        Ok(vec![format!("-var-file={}", self.config.var_file)])
    }
}

fn invoke_args(action: &str, step: &Step) -> Vec<String> {
    let mut cmd = if step.arguments.is_empty() {
        vec![action.to_string()]
    } else {
        step.arguments.clone()
    };
    cmd.extend(args::flag_args(&step.flags));
    cmd
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_action_kind_display() {
        assert_eq!(ActionKind::Install.to_string(), "install");
        assert_eq!(ActionKind::Upgrade.to_string(), "upgrade");
        assert_eq!(ActionKind::Uninstall.to_string(), "uninstall");
        assert_eq!(ActionKind::Invoke("plan".to_string()).to_string(), "plan");
    }

    #[test]
    fn test_invoke_args_default_to_action_name() {
        let step = Step::default();
        assert_eq!(invoke_args("plan", &step), vec!["plan"]);
    }

    #[test]
    fn test_invoke_args_use_explicit_arguments_and_flags() {
        let step = Step {
            arguments: vec!["state".to_string(), "list".to_string()],
            flags: serde_json::from_value(json!({"state": "prod.tfstate"})).unwrap(),
            ..Default::default()
        };
        assert_eq!(
            invoke_args("status", &step),
            vec!["state", "list", "-state=prod.tfstate"]
        );
    }
}
