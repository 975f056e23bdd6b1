use std::io;

use tokio::io::{AsyncWrite, AsyncWriteExt};

use super::formatter::StampFormatter;

/// Splits a byte stream into lines and writes each completed line to `sink`
/// behind a timestamp prefix.
///
/// Bytes after the last newline of a chunk are held back as the pending
/// fragment. The pending fragment is prepended to the first line completed by
/// the next chunk only; it replaces (does not extend) the previous fragment,
/// and a fragment still pending when the stream ends is never written.
///
/// A writer is owned by exactly one drain task; `&mut self` is the only
/// synchronisation.
pub struct LineStampWriter<W> {
    sink: W,
    formatter: StampFormatter,
    pending: Vec<u8>,
}

impl<W> LineStampWriter<W>
where
    W: AsyncWrite + Unpin,
{
    pub fn new(sink: W, formatter: StampFormatter) -> Self {
        Self {
            sink,
            formatter,
            pending: Vec::new(),
        }
    }

    pub fn pending(&self) -> &[u8] {
        &self.pending
    }

    pub fn into_inner(self) -> W {
        self.sink
    }

    /// Consumes `chunk`, returning `chunk.len()` or the first sink failure.
    pub async fn write_chunk(&mut self, chunk: &[u8]) -> io::Result<usize> {
        if chunk.is_empty() {
            return Ok(0);
        }

        let Some(last_nl) = chunk.iter().rposition(|&b| b == b'\n') else {
            self.pending.clear();
            self.pending.extend_from_slice(chunk);
            return Ok(chunk.len());
        };

        let mut record = Vec::with_capacity(64 + last_nl);
        for (idx, line) in chunk[..last_nl].split(|&b| b == b'\n').enumerate() {
            record.clear();
            record.extend_from_slice(self.formatter.stamp().as_bytes());
            if idx == 0 {
                record.extend_from_slice(&self.pending);
            }
            record.extend_from_slice(line);
            record.push(b'\n');
            self.sink.write_all(&record).await?;
        }

        self.pending.clear();
        self.pending.extend_from_slice(&chunk[last_nl + 1..]);

        self.sink.flush().await?;
        Ok(chunk.len())
    }
}
