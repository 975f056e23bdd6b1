use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite};
use tokio::task::JoinHandle;

use crate::error::RunnerError;
use crate::stamp::LineStampWriter;

pub fn pump_stdout<R, W>(rd: R, wr: LineStampWriter<W>) -> JoinHandle<Result<u64, RunnerError>>
where
    R: AsyncRead + Unpin + Send + 'static,
    W: AsyncWrite + Unpin + Send + 'static,
{
    pump(rd, wr, "stdout")
}

pub fn pump_stderr<R, W>(rd: R, wr: LineStampWriter<W>) -> JoinHandle<Result<u64, RunnerError>>
where
    R: AsyncRead + Unpin + Send + 'static,
    W: AsyncWrite + Unpin + Send + 'static,
{
    pump(rd, wr, "stderr")
}

fn pump<R, W>(
    mut rd: R,
    mut wr: LineStampWriter<W>,
    label: &'static str,
) -> JoinHandle<Result<u64, RunnerError>>
where
    R: AsyncRead + Unpin + Send + 'static,
    W: AsyncWrite + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut buf = vec![0u8; 16 * 1024];
        let mut total = 0u64;

        tracing::debug!(stream = label, "drain started");
        loop {
            let n = rd.read(&mut buf).await.map_err(|e| RunnerError::StreamIo {
                stream: label,
                source: e,
            })?;
            if n == 0 {
                break;
            }

            wr.write_chunk(&buf[..n])
                .await
                .map_err(|e| RunnerError::StreamIo {
                    stream: label,
                    source: e,
                })?;
            total += n as u64;
        }

        if !wr.pending().is_empty() {
            tracing::debug!(
                stream = label,
                bytes = wr.pending().len(),
                "unterminated fragment dropped at end of stream"
            );
        }
        tracing::debug!(stream = label, bytes = total, "drain finished");

        Ok(total)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stamp::{StampFormatter, TimeFormat, WriterConfig};
    use std::time::Instant;
    use tokio::io::AsyncWriteExt;

    fn stamped<W: AsyncWrite + Unpin>(sink: W) -> LineStampWriter<W> {
        let cfg = WriterConfig::new(TimeFormat::Default, true, false, false);
        LineStampWriter::new(sink, StampFormatter::new(cfg, Instant::now()))
    }

    #[tokio::test]
    async fn drains_until_eof_and_counts_bytes() {
        let (mut child_out, rd) = tokio::io::duplex(1024);
        let (sink, mut seen) = tokio::io::duplex(4096);

        let task = pump_stdout(rd, stamped(sink));

        child_out.write_all(b"hel").await.unwrap();
        child_out.write_all(b"lo\nworld\n").await.unwrap();
        drop(child_out);

        assert_eq!(task.await.unwrap().unwrap(), 12);

        let mut out = String::new();
        seen.read_to_string(&mut out).await.unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("| hello"), "{out:?}");
        assert!(lines[1].ends_with("| world"), "{out:?}");
    }

    #[tokio::test]
    async fn trailing_fragment_is_not_written() {
        let (mut child_err, rd) = tokio::io::duplex(1024);
        let (sink, mut seen) = tokio::io::duplex(4096);

        let task = pump_stderr(rd, stamped(sink));

        child_err.write_all(b"done\nno newline").await.unwrap();
        drop(child_err);

        task.await.unwrap().unwrap();

        let mut out = String::new();
        seen.read_to_string(&mut out).await.unwrap();
        assert_eq!(out.lines().count(), 1);
        assert!(!out.contains("no newline"));
    }

    #[tokio::test]
    async fn closed_sink_fails_the_drain() {
        let (mut child_out, rd) = tokio::io::duplex(1024);
        let (sink, seen) = tokio::io::duplex(64);
        drop(seen);

        let task = pump_stdout(rd, stamped(sink));
        child_out.write_all(b"line\n").await.unwrap();
        drop(child_out);

        let err = task.await.unwrap().unwrap_err();
        assert!(matches!(err, RunnerError::StreamIo { stream: "stdout", .. }));
    }
}
