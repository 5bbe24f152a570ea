use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MixinError {
    #[error("could not read the payload from STDIN: {0}")]
    Payload(#[source] std::io::Error),

    #[error("could not parse the payload: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("invalid step: {0}")]
    InvalidStep(String),

    #[error("working directory {} is not accessible: {source}", path.display())]
    WorkingDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not init terraform, {0}")]
    Init(#[source] CommandError),

    #[error(transparent)]
    Command(#[from] CommandError),

    #[error("unable to write the variable file {}: {source}", path.display())]
    VarFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unable to retrieve output '{name}': {source}")]
    RetrieveOutput {
        name: String,
        #[source]
        source: CommandError,
    },

    #[error("unable to write output '{name}': {source}")]
    WriteOutput {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure of a single external command.
///
/// The rendered command line is always part of the message so a failed
/// invocation can be diagnosed without running it again.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("couldn't run command {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("couldn't run command {command}: {reason}")]
    Failed { command: String, reason: String },
}

impl CommandError {
    pub fn command(&self) -> &str {
        match self {
            CommandError::Spawn { command, .. } | CommandError::Failed { command, .. } => command,
        }
    }
}
