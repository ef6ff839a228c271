//! Line-delimited framing: one JSON-RPC message per `\n`-terminated line.

use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::trace;

use super::TransportError;

/// Generic over reader and writer so tests can drive it with in-memory buffers.
pub struct LineTransport<R, W> {
    reader: BufReader<R>,
    writer: W,
}

impl<R, W> LineTransport<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader: BufReader::new(reader),
            writer,
        }
    }

    /// Returns `None` at end of input.
    pub async fn read_line(&mut self) -> Result<Option<String>, TransportError> {
        let mut buffer = Vec::new();
        let bytes_read = self
            .reader
            .read_until(b'\n', &mut buffer)
            .await
            .map_err(TransportError::Read)?;

        if bytes_read == 0 {
            return Ok(None);
        }

        let line = String::from_utf8_lossy(&buffer)
            .trim_end_matches(['\n', '\r'])
            .to_string();
        trace!(len = line.len(), "read line");
        Ok(Some(line))
    }

    pub async fn write_message(&mut self, message: &Value) -> Result<(), TransportError> {
        let mut line = serde_json::to_vec(message)?;
        line.push(b'\n');
        trace!(len = line.len(), "writing message");

        self.writer
            .write_all(&line)
            .await
            .map_err(TransportError::Write)?;
        self.writer.flush().await.map_err(TransportError::Write)
    }

    pub fn into_writer(self) -> W {
        self.writer
    }
}
