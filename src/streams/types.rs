/*!
 * Stream Types
 * Write modes, input framing, and stream errors
 */

use crate::core::limits::DEFAULT_INPUT_CHUNK_SIZE;
use crate::events::ListenerFailure;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Stream operation result
pub type StreamResult<T> = Result<T, StreamError>;

/// Stream errors
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StreamError {
    #[error("I/O error on {stream}: {message}")]
    Io { stream: String, message: String },

    #[error("{0}")]
    ListenerFailed(ListenerFailure),
}

impl StreamError {
    pub(crate) fn io(stream: &str, err: std::io::Error) -> Self {
        StreamError::Io {
            stream: stream.to_string(),
            message: err.to_string(),
        }
    }
}

/// How an output endpoint hands bytes to its sink
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WriteMode {
    /// Leave flushing to the sink or an explicit `flush`
    Buffered,
    /// Flush after every write
    ImmediateFlush,
}

impl Default for WriteMode {
    fn default() -> Self {
        WriteMode::ImmediateFlush
    }
}

/// How an input endpoint splits incoming bytes into `data` events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputFraming {
    /// One event per line, terminator stripped
    Lines,
    /// One event per read of at most this many bytes
    Chunks(usize),
}

impl InputFraming {
    pub fn chunks() -> Self {
        InputFraming::Chunks(DEFAULT_INPUT_CHUNK_SIZE)
    }
}

impl Default for InputFraming {
    fn default() -> Self {
        InputFraming::Lines
    }
}

/// Result of one `pump` of an input endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PumpOutcome {
    /// A frame of this many raw bytes was dispatched as `data`
    Data(usize),
    /// Input is exhausted; `end` has been dispatched
    Ended,
}
