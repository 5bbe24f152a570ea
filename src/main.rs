mod cli;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command};
use terraform_mixin::{
    ActionKind, ExecutionContext, Mixin, MixinConfig, ProcessRunner, VersionInfo, build,
    read_payload, schema,
};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let config = cli.global.to_config();

    let default_level = if config.debug { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Build => {
            let payload = read_payload(tokio::io::stdin()).await?;
            let config = build::apply_build_payload(config, &payload)?;
            print!("{}", build::dockerfile_lines(&config));
        }
        Command::Schema => println!("{}", schema::action_schema()?),
        Command::Version(args) => println!("{}", VersionInfo::new(&config).render(args.output)?),
        Command::Install => run_action(config, ActionKind::Install).await?,
        Command::Upgrade => run_action(config, ActionKind::Upgrade).await?,
        Command::Invoke(args) => run_action(config, ActionKind::Invoke(args.action)).await?,
        Command::Uninstall => run_action(config, ActionKind::Uninstall).await?,
    }

    Ok(())
}

async fn run_action(config: MixinConfig, kind: ActionKind) -> Result<()> {
    let payload = read_payload(tokio::io::stdin()).await?;
    let context = ExecutionContext::from_process(config.debug)?;

    let mut mixin = Mixin::new(config, ProcessRunner, context);
    mixin
        .execute(&kind, &payload)
        .await
        .wrap_err_with(|| format!("{} failed", kind))?;

    tracing::info!(action = %kind, "action complete");
    Ok(())
}
