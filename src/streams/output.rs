/*!
 * Output Endpoints
 * stdout / stderr conduits over an injected byte sink
 */

use super::types::{StreamError, StreamResult, WriteMode};
use parking_lot::Mutex;
use std::fmt;
use std::io::Write;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::trace;

/// Output endpoint
///
/// The sink lock is held for the whole of each `write`, so bytes from one
/// call never interleave with another call's and calls land in order.
#[derive(Clone)]
pub struct OutputStream {
    name: &'static str,
    mode: WriteMode,
    sink: Arc<Mutex<Box<dyn Write + Send>>>,
    bytes_written: Arc<AtomicU64>,
}

impl OutputStream {
    pub fn new(name: &'static str, mode: WriteMode, sink: Box<dyn Write + Send>) -> Self {
        Self {
            name,
            mode,
            sink: Arc::new(Mutex::new(sink)),
            bytes_written: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn stdout(mode: WriteMode) -> Self {
        Self::new("stdout", mode, Box::new(std::io::stdout()))
    }

    pub fn stderr(mode: WriteMode) -> Self {
        Self::new("stderr", mode, Box::new(std::io::stderr()))
    }

    /// Append `bytes` to the sink
    pub fn write(&self, bytes: &[u8]) -> StreamResult<usize> {
        {
            let mut sink = self.sink.lock();
            sink.write_all(bytes)
                .map_err(|e| StreamError::io(self.name, e))?;
            if self.mode == WriteMode::ImmediateFlush {
                sink.flush().map_err(|e| StreamError::io(self.name, e))?;
            }
        }

        self.bytes_written
            .fetch_add(bytes.len() as u64, Ordering::Relaxed);
        trace!(stream = self.name, len = bytes.len(), "Wrote to output stream");
        Ok(bytes.len())
    }

    #[inline]
    pub fn write_str(&self, text: &str) -> StreamResult<usize> {
        self.write(text.as_bytes())
    }

    pub fn flush(&self) -> StreamResult<()> {
        self.sink
            .lock()
            .flush()
            .map_err(|e| StreamError::io(self.name, e))
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub fn mode(&self) -> WriteMode {
        self.mode
    }

    #[inline]
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written.load(Ordering::Relaxed)
    }
}

impl fmt::Debug for OutputStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OutputStream")
            .field("name", &self.name)
            .field("mode", &self.mode)
            .field("bytes_written", &self.bytes_written())
            .finish()
    }
}
