//! Output sinks for stage processes
//!
//! Forwards a spawned tool's stdout and stderr to caller-supplied
//! destinations chunk by chunk, as the bytes arrive.

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Destination for one of a stage process's output streams
pub type StageSink = Box<dyn AsyncWrite + Send + Unpin>;

/// Options for a single stage invocation
///
/// Sinks receive each chunk in the order the operating system delivers it
/// and are flushed once when the stream ends. A stream without a sink is
/// discarded.
pub struct StageOptions {
    /// Destination for the tool's stdout, or `None` to discard it
    pub stdout: Option<StageSink>,

    /// Destination for the tool's stderr, or `None` to discard it
    pub stderr: Option<StageSink>,

    /// Buffer size for forwarding chunks
    pub buffer_size: usize,
}

impl Default for StageOptions {
    fn default() -> Self {
        Self {
            stdout: None,
            stderr: None,
            buffer_size: 8 * 1024, // 8KB
        }
    }
}

/// Forward everything `reader` yields into `sink`, returning bytes moved
pub(crate) async fn forward(
    mut reader: impl AsyncRead + Unpin,
    mut sink: StageSink,
    buffer_size: usize,
) -> std::io::Result<u64> {
    let mut buffer = vec![0u8; buffer_size];
    let mut forwarded = 0u64;

    loop {
        let bytes_read = reader.read(&mut buffer).await?;
        if bytes_read == 0 {
            break;
        }

        sink.write_all(&buffer[..bytes_read]).await?;
        forwarded += bytes_read as u64;
    }

    sink.flush().await?;
    Ok(forwarded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_forward_preserves_bytes_and_order() {
        let payload: Vec<u8> = (0..10_000u32).flat_map(|i| i.to_le_bytes()).collect();
        let (tx, mut rx) = tokio::io::duplex(64);

        let producer = forward(payload.as_slice(), Box::new(tx), 7);
        let consumer = async {
            let mut received = Vec::new();
            rx.read_to_end(&mut received).await.unwrap();
            received
        };

        let (forwarded, received) = tokio::join!(producer, consumer);
        assert_eq!(forwarded.unwrap(), payload.len() as u64);
        assert_eq!(received, payload);
    }

    #[tokio::test]
    async fn test_forward_empty_stream() {
        let (tx, mut rx) = tokio::io::duplex(64);

        let producer = forward(&b""[..], Box::new(tx), 8);
        let consumer = async {
            let mut received = Vec::new();
            rx.read_to_end(&mut received).await.unwrap();
            received
        };

        let (forwarded, received) = tokio::join!(producer, consumer);
        assert_eq!(forwarded.unwrap(), 0);
        assert!(received.is_empty());
    }

    #[test]
    fn test_default_options_discard_everything() {
        let options = StageOptions::default();

        assert!(options.stdout.is_none());
        assert!(options.stderr.is_none());
        assert_eq!(options.buffer_size, 8 * 1024);
    }
}
