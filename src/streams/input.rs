/*!
 * Input Endpoint
 * stdin conduit dispatching `data` / `end` events
 *
 * The host drives reads with `pump`: each call takes one frame from the
 * source and dispatches it synchronously to the `data` listeners, so
 * frames reach listeners in arrival order. Bytes are decoded as lossy
 * UTF-8. With chunk framing a multi-byte character split across two
 * chunks decodes as replacement characters.
 */

use super::types::{InputFraming, PumpOutcome, StreamError, StreamResult};
use crate::core::limits::{EVENT_DATA, EVENT_END};
use crate::core::types::EventArg;
use crate::events::{EventEmitter, EventError, ListenerId};
use parking_lot::Mutex;
use std::fmt;
use std::io::BufRead;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;

/// Input endpoint
#[derive(Clone)]
pub struct InputStream {
    source: Arc<Mutex<Box<dyn BufRead + Send>>>,
    framing: InputFraming,
    events: EventEmitter,
    ended: Arc<AtomicBool>,
    frames: Arc<AtomicU64>,
}

impl InputStream {
    pub fn new(framing: InputFraming, source: Box<dyn BufRead + Send>) -> Self {
        Self {
            source: Arc::new(Mutex::new(source)),
            framing,
            events: EventEmitter::new(),
            ended: Arc::new(AtomicBool::new(false)),
            frames: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn stdin(framing: InputFraming) -> Self {
        Self::new(
            framing,
            Box::new(std::io::BufReader::new(std::io::stdin())),
        )
    }

    /// Register a listener on this endpoint (`data`, `end`)
    pub fn on<F>(&self, event: &str, callback: F) -> ListenerId
    where
        F: Fn(&[EventArg]) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.events.on(event, callback)
    }

    /// Register a `data` listener receiving each decoded frame
    pub fn on_data<F>(&self, callback: F) -> ListenerId
    where
        F: Fn(&str) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.events.on(EVENT_DATA, move |args| {
            let text = args.first().and_then(|arg| arg.as_str()).unwrap_or_default();
            callback(text)
        })
    }

    pub fn on_end<F>(&self, callback: F) -> ListenerId
    where
        F: Fn() -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.events.on(EVENT_END, move |_| callback())
    }

    pub fn off(&self, event: &str, id: ListenerId) -> bool {
        self.events.off(event, id)
    }

    /// Read one frame and dispatch it
    pub fn pump(&self) -> StreamResult<PumpOutcome> {
        if self.ended.load(Ordering::Acquire) {
            return Ok(PumpOutcome::Ended);
        }

        // Source lock is released before listeners run
        let frame = self.read_frame()?;

        match frame {
            Some(bytes) => {
                let len = bytes.len();
                let text = decode_frame(&bytes, self.framing);
                self.frames.fetch_add(1, Ordering::Relaxed);
                self.events
                    .emit(EVENT_DATA, &[EventArg::String(text)])
                    .map_err(listener_error)?;
                Ok(PumpOutcome::Data(len))
            }
            None => {
                if !self.ended.swap(true, Ordering::AcqRel) {
                    debug!(frames = self.frames(), "Input stream ended");
                    self.events.emit(EVENT_END, &[]).map_err(listener_error)?;
                }
                Ok(PumpOutcome::Ended)
            }
        }
    }

    /// Pump until end of input; returns the number of `data` frames
    pub fn pump_all(&self) -> StreamResult<u64> {
        let start = self.frames();
        while let PumpOutcome::Data(_) = self.pump()? {}
        Ok(self.frames() - start)
    }

    fn read_frame(&self) -> StreamResult<Option<Vec<u8>>> {
        let mut source = self.source.lock();

        match self.framing {
            InputFraming::Lines => {
                let mut line = Vec::new();
                let read = source
                    .read_until(b'\n', &mut line)
                    .map_err(|e| StreamError::io("stdin", e))?;
                Ok((read > 0).then_some(line))
            }
            InputFraming::Chunks(max) => {
                let available = source.fill_buf().map_err(|e| StreamError::io("stdin", e))?;
                if available.is_empty() {
                    return Ok(None);
                }
                let take = available.len().min(max.max(1));
                let chunk = available[..take].to_vec();
                source.consume(take);
                Ok(Some(chunk))
            }
        }
    }

    #[inline]
    pub fn framing(&self) -> InputFraming {
        self.framing
    }

    #[inline]
    pub fn is_ended(&self) -> bool {
        self.ended.load(Ordering::Acquire)
    }

    /// Frames dispatched so far
    #[inline]
    pub fn frames(&self) -> u64 {
        self.frames.load(Ordering::Relaxed)
    }
}

impl fmt::Debug for InputStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InputStream")
            .field("framing", &self.framing)
            .field("ended", &self.is_ended())
            .field("frames", &self.frames())
            .finish()
    }
}

fn decode_frame(bytes: &[u8], framing: InputFraming) -> String {
    let bytes = match framing {
        InputFraming::Lines => {
            let trimmed = bytes.strip_suffix(b"\n").unwrap_or(bytes);
            trimmed.strip_suffix(b"\r").unwrap_or(trimmed)
        }
        InputFraming::Chunks(_) => bytes,
    };
    String::from_utf8_lossy(bytes).into_owned()
}

fn listener_error(err: EventError) -> StreamError {
    match err {
        EventError::ListenerFailed(failure) => StreamError::ListenerFailed(failure),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_strips_line_terminators() {
        assert_eq!(decode_frame(b"hello\r\n", InputFraming::Lines), "hello");
        assert_eq!(decode_frame(b"hello\n", InputFraming::Lines), "hello");
        assert_eq!(decode_frame(b"tail", InputFraming::Lines), "tail");
        assert_eq!(decode_frame(b"raw\n", InputFraming::Chunks(8)), "raw\n");
    }

    #[test]
    fn test_decode_is_lossy() {
        assert_eq!(decode_frame(&[0x66, 0xff, 0x6f], InputFraming::Lines), "f\u{fffd}o");
    }
}
