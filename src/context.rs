use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::MixinError;
use crate::runner::{Invocation, StdoutMode};

/// Process state the mixin needs for every external command.
///
/// The directory and environment overrides live here instead of in the real
/// process state; every [`Invocation`] built from the context carries them to
/// the child process.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionContext {
    dir: PathBuf,
    env: BTreeMap<String, String>,
    debug: bool,
}

impl ExecutionContext {
    pub fn new(dir: impl Into<PathBuf>, debug: bool) -> Self {
        Self {
            dir: dir.into(),
            env: BTreeMap::new(),
            debug,
        }
    }

    /// Starts from the directory the process was launched in.
    pub fn from_process(debug: bool) -> Result<Self, MixinError> {
        Ok(Self::new(std::env::current_dir()?, debug))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn env(&self) -> &BTreeMap<String, String> {
        &self.env
    }

    pub fn debug(&self) -> bool {
        self.debug
    }

    pub fn set_env(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.env.insert(key.into(), value.into());
    }

    /// Moves into `path`, relative to the current directory unless absolute.
    /// The target must be an existing directory.
    pub fn change_dir(&mut self, path: impl AsRef<Path>) -> Result<&Path, MixinError> {
        let target = self.dir.join(path.as_ref());
        let metadata = std::fs::metadata(&target).map_err(|source| MixinError::WorkingDir {
            path: target.clone(),
            source,
        })?;
        if !metadata.is_dir() {
            return Err(MixinError::WorkingDir {
                path: target,
                source: std::io::Error::new(
                    std::io::ErrorKind::NotADirectory,
                    "not a directory",
                ),
            });
        }

        self.dir = target;
        Ok(&self.dir)
    }

    pub fn invocation<I, S>(&self, program: &str, args: I) -> Invocation
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Invocation {
            program: program.to_string(),
            args: args.into_iter().map(Into::into).collect(),
            dir: self.dir.clone(),
            env: self.env.clone(),
            stdout: StdoutMode::Capture,
        }
    }
}
