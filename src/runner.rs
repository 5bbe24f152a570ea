use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::process::Command;

use crate::error::CommandError;

/// How much of a failed command's stderr is kept for the error message.
const STDERR_TAIL_BYTES: usize = 4096;

/// Where a command's stdout goes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StdoutMode {
    /// Collected and returned to the caller.
    #[default]
    Capture,
    /// Passed straight through to our own stdout; nothing is returned.
    Inherit,
}

/// One external command, bound to the directory and environment it runs with.
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub dir: PathBuf,
    pub env: BTreeMap<String, String>,
    pub stdout: StdoutMode,
}

impl Invocation {
    /// The command as a user would type it, used in error messages.
    pub fn command_line(&self) -> String {
        if self.args.is_empty() {
            self.program.clone()
        } else {
            format!("{} {}", self.program, self.args.join(" "))
        }
    }

    pub fn inherit_stdout(mut self) -> Self {
        self.stdout = StdoutMode::Inherit;
        self
    }
}

/// Runs an external command and returns its captured stdout.
///
/// Implementations stream stderr straight through and report a non-zero exit
/// as [`CommandError::Failed`], with the tail of stderr in the reason.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, invocation: &Invocation) -> Result<Vec<u8>, CommandError>;
}

/// Spawns real child processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(&self, invocation: &Invocation) -> Result<Vec<u8>, CommandError> {
        let command_line = invocation.command_line();
        tracing::debug!(command = %command_line, dir = %invocation.dir.display(), "running command");

        let stdout = match invocation.stdout {
            StdoutMode::Capture => Stdio::piped(),
            StdoutMode::Inherit => Stdio::inherit(),
        };
        let mut child = Command::new(&invocation.program)
            .args(&invocation.args)
            .current_dir(&invocation.dir)
            .envs(&invocation.env)
            .stdin(Stdio::null())
            .stdout(stdout)
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| CommandError::Spawn {
                command: command_line.clone(),
                source,
            })?;

        let stderr = child.stderr.take();
        let (output, stderr_tail) = tokio::join!(
            child.wait_with_output(),
            relay_stderr(stderr, tokio::io::stderr())
        );
        let output = output.map_err(|source| CommandError::Spawn {
            command: command_line.clone(),
            source,
        })?;

        if !output.status.success() {
            let tail = String::from_utf8_lossy(&stderr_tail);
            let tail = tail.trim();
            let reason = if tail.is_empty() {
                output.status.to_string()
            } else {
                format!("{}: {}", output.status, tail)
            };
            return Err(CommandError::Failed {
                command: command_line,
                reason,
            });
        }

        Ok(output.stdout)
    }
}

/// Copies the child's stderr to `sink` as it arrives and returns the last
/// [`STDERR_TAIL_BYTES`] of it.
async fn relay_stderr<R, W>(stderr: Option<R>, mut sink: W) -> Vec<u8>
where
    R: AsyncRead + Unpin,
    W: tokio::io::AsyncWrite + Unpin,
{
    let Some(mut stderr) = stderr else {
        return Vec::new();
    };

    let mut tail = Vec::new();
    let mut buf = [0u8; 8192];
    loop {
        let n = match stderr.read(&mut buf).await {
            Ok(0) => break,
            Ok(n) => n,
            Err(err) => {
                tracing::debug!(error = %err, "stopped reading child stderr");
                break;
            }
        };
        // Our own stderr going away must not fail the command.
        let _ = sink.write_all(&buf[..n]).await;
        tail.extend_from_slice(&buf[..n]);
        if tail.len() > STDERR_TAIL_BYTES {
            tail.drain(..tail.len() - STDERR_TAIL_BYTES);
        }
    }
    let _ = sink.flush().await;
    tail
}
