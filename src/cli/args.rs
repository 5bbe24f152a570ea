use std::path::PathBuf;

use clap::{Parser, Subcommand};
use terraform_mixin::config::{
    DEFAULT_OUTPUTS_DIR, DEFAULT_TERRAFORM_PATH, DEFAULT_WORKING_DIR, MixinConfig,
};
use terraform_mixin::VersionFormat;

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(clap::Args, Debug)]
pub struct GlobalArgs {
    /// Print diagnostic output to stderr
    #[arg(long, global = true, env = "TERRAFORM_MIXIN_DEBUG")]
    pub debug: bool,

    /// Directory holding the terraform configuration
    #[arg(long, global = true, env = "TERRAFORM_MIXIN_WORKING_DIR", default_value = DEFAULT_WORKING_DIR)]
    pub working_dir: String,

    /// Directory the host orchestrator collects outputs from
    #[arg(long, global = true, env = "TERRAFORM_MIXIN_OUTPUTS_DIR", default_value = DEFAULT_OUTPUTS_DIR)]
    pub outputs_dir: PathBuf,

    /// terraform executable to run
    #[arg(long, global = true, env = "TERRAFORM_MIXIN_TERRAFORM_PATH", default_value = DEFAULT_TERRAFORM_PATH)]
    pub terraform_path: String,
}

impl GlobalArgs {
    pub fn to_config(&self) -> MixinConfig {
        MixinConfig {
            working_dir: self.working_dir.clone(),
            terraform_path: self.terraform_path.clone(),
            outputs_dir: self.outputs_dir.clone(),
            debug: self.debug,
            ..Default::default()
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the Dockerfile lines that install terraform
    Build,
    /// Print the JSON schema of the step payload
    Schema,
    /// Print the mixin version
    Version(VersionArgs),
    /// Apply the terraform configuration
    Install,
    /// Re-apply the terraform configuration
    Upgrade,
    /// Run a custom terraform command
    Invoke(InvokeArgs),
    /// Destroy the terraform-managed infrastructure
    Uninstall,
}

#[derive(clap::Args, Debug)]
pub struct VersionArgs {
    #[arg(long, short, value_enum, default_value_t = VersionFormat::Plaintext)]
    pub output: VersionFormat,
}

#[derive(clap::Args, Debug)]
pub struct InvokeArgs {
    /// Name of the custom action being invoked
    #[arg(long)]
    pub action: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use serial_test::serial;

    const ENV_VARS: [&str; 4] = [
        "TERRAFORM_MIXIN_DEBUG",
        "TERRAFORM_MIXIN_WORKING_DIR",
        "TERRAFORM_MIXIN_OUTPUTS_DIR",
        "TERRAFORM_MIXIN_TERRAFORM_PATH",
    ];

    /// Parses with the mixin env vars cleared, then restores them.
    fn parse_without_env(args: &[&str]) -> Cli {
        let backup: Vec<_> = ENV_VARS.iter().map(|k| (*k, std::env::var(k).ok())).collect();
        unsafe {
            for key in ENV_VARS {
                std::env::remove_var(key);
            }
        }

        let cli = Cli::parse_from(args.iter().copied());

        unsafe {
            for (key, value) in backup {
                if let Some(value) = value {
                    std::env::set_var(key, value);
                }
            }
        }
        cli
    }

    #[test]
    #[serial]
    fn test_defaults_without_flags() {
        let cli = parse_without_env(&["terraform-mixin", "install"]);
        let config = cli.global.to_config();

        assert_eq!(config, MixinConfig::default());
        assert!(matches!(cli.command, Command::Install));
    }

    #[test]
    #[serial]
    fn test_global_flags_after_subcommand() {
        let cli = parse_without_env(&[
            "terraform-mixin",
            "upgrade",
            "--debug",
            "--working-dir=infra",
            "--outputs-dir=/tmp/outputs",
            "--terraform-path=/usr/local/bin/terraform",
        ]);
        let config = cli.global.to_config();

        assert!(config.debug);
        assert_eq!(config.working_dir, "infra");
        assert_eq!(config.outputs_dir, PathBuf::from("/tmp/outputs"));
        assert_eq!(config.terraform_path, "/usr/local/bin/terraform");
        assert!(matches!(cli.command, Command::Upgrade));
    }

    #[test]
    #[serial]
    fn test_invoke_requires_action() {
        let result = Cli::try_parse_from(["terraform-mixin", "invoke"]);
        assert!(result.is_err());

        let cli = parse_without_env(&["terraform-mixin", "invoke", "--action", "plan"]);
        if let Command::Invoke(args) = cli.command {
            assert_eq!(args.action, "plan");
        } else {
            panic!("Expected Invoke command, got {:?}", cli.command);
        }
    }

    #[test]
    #[serial]
    fn test_working_dir_from_env_var_fallback() {
        let backup = std::env::var("TERRAFORM_MIXIN_WORKING_DIR").ok();

        unsafe {
            std::env::set_var("TERRAFORM_MIXIN_WORKING_DIR", "env_infra");
        }

        let cli = Cli::parse_from(["terraform-mixin", "install"]);

        unsafe {
            match backup {
                Some(dir) => std::env::set_var("TERRAFORM_MIXIN_WORKING_DIR", dir),
                None => std::env::remove_var("TERRAFORM_MIXIN_WORKING_DIR"),
            }
        }

        assert_eq!(cli.global.working_dir, "env_infra");
    }

    #[test]
    #[serial]
    fn test_cli_flag_takes_precedence_over_env() {
        let backup = std::env::var("TERRAFORM_MIXIN_OUTPUTS_DIR").ok();

        unsafe {
            std::env::set_var("TERRAFORM_MIXIN_OUTPUTS_DIR", "/env/outputs");
        }

        let cli = Cli::parse_from(["terraform-mixin", "install", "--outputs-dir=/cli/outputs"]);

        unsafe {
            match backup {
                Some(dir) => std::env::set_var("TERRAFORM_MIXIN_OUTPUTS_DIR", dir),
                None => std::env::remove_var("TERRAFORM_MIXIN_OUTPUTS_DIR"),
            }
        }

        assert_eq!(cli.global.outputs_dir, PathBuf::from("/cli/outputs"));
    }

    #[test]
    #[serial]
    fn test_version_output_format() {
        let cli = parse_without_env(&["terraform-mixin", "version", "--output", "json"]);
        if let Command::Version(args) = cli.command {
            assert_eq!(args.output, VersionFormat::Json);
        } else {
            panic!("Expected Version command, got {:?}", cli.command);
        }

        let cli = parse_without_env(&["terraform-mixin", "version"]);
        if let Command::Version(args) = cli.command {
            assert_eq!(args.output, VersionFormat::Plaintext);
        } else {
            panic!("Expected Version command, got {:?}", cli.command);
        }
    }
}
