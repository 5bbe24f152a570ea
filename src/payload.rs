use tokio::io::{AsyncRead, AsyncReadExt, BufReader};

use crate::error::MixinError;

/// Reads the whole payload into memory. Any read failure aborts the action.
pub async fn read_payload<R>(reader: R) -> Result<Vec<u8>, MixinError>
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(reader);
    let mut data = Vec::new();
    reader
        .read_to_end(&mut data)
        .await
        .map_err(MixinError::Payload)?;

    tracing::debug!(bytes = data.len(), "read payload");
    Ok(data)
}
