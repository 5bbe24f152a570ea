use std::path::Path;

use super::Mixin;
use crate::error::{CommandError, MixinError};
use crate::runner::CommandRunner;
use crate::step::Output;

/// Strips the trailing newlines terraform appends when printing a raw output.
pub fn trim_output(mut out: Vec<u8>) -> Vec<u8> {
    while out.last() == Some(&b'\n') {
        out.pop();
    }
    out
}

impl<R: CommandRunner> Mixin<R> {
    pub(crate) async fn get_output(&self, name: &str) -> Result<Vec<u8>, CommandError> {
        let out = self.terraform(["output", "-raw", name]).await?;
        Ok(trim_output(out))
    }

    /// Captures every declared output, in order, stopping at the first
    /// failure. Outputs written before the failure stay on disk.
    pub async fn handle_outputs(&self, outputs: &[Output]) -> Result<(), MixinError> {
        for output in outputs {
            let value = self
                .get_output(&output.name)
                .await
                .map_err(|source| MixinError::RetrieveOutput {
                    name: output.name.clone(),
                    source,
                })?;

            write_output(&self.config.outputs_dir, &output.name, &value)
                .await
                .map_err(|source| MixinError::WriteOutput {
                    name: output.name.clone(),
                    source,
                })?;

            tracing::info!(output = %output.name, bytes = value.len(), "captured output");
        }
        Ok(())
    }
}

async fn write_output(dir: &Path, name: &str, value: &[u8]) -> std::io::Result<()> {
    tokio::fs::create_dir_all(dir).await?;
    tokio::fs::write(dir.join(name), value).await
}
