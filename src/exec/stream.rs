// src/exec/stream.rs

//! Line-at-a-time reader over the tool's stdout.

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};

/// Yields stdout lines exactly as written, line terminator included.
///
/// A final line without a trailing newline is yielded as-is. Bytes that are
/// not valid UTF-8 surface as an `InvalidData` error.
pub struct LineStream<R> {
    reader: BufReader<R>,
}

impl<R: AsyncRead + Unpin> LineStream<R> {
    pub fn new(inner: R) -> Self {
        Self {
            reader: BufReader::new(inner),
        }
    }

    /// Next line, or `None` at end of stream.
    pub async fn next_line(&mut self) -> std::io::Result<Option<String>> {
        let mut line = String::new();
        let n = self.reader.read_line(&mut line).await?;
        if n == 0 {
            Ok(None)
        } else {
            Ok(Some(line))
        }
    }
}
