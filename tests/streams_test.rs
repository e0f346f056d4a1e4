/*!
 * Stream Tests
 * Output ordering, write modes, and input framing
 */

use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use process_core::streams::{InputFraming, InputStream, OutputStream, PumpOutcome, WriteMode};
use std::io::{Cursor, Write};
use std::sync::Arc;

/// Byte sink shared with the test body
#[derive(Clone, Default)]
struct SharedSink {
    bytes: Arc<Mutex<Vec<u8>>>,
    flushes: Arc<Mutex<usize>>,
}

impl SharedSink {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.bytes.lock()).into_owned()
    }

    fn flushes(&self) -> usize {
        *self.flushes.lock()
    }
}

impl Write for SharedSink {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.bytes.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        *self.flushes.lock() += 1;
        Ok(())
    }
}

fn input(bytes: &[u8], framing: InputFraming) -> InputStream {
    InputStream::new(framing, Box::new(Cursor::new(bytes.to_vec())))
}

#[test]
fn test_writes_land_in_call_order() {
    let sink = SharedSink::default();
    let out = OutputStream::new("stdout", WriteMode::ImmediateFlush, Box::new(sink.clone()));

    out.write_str("Multi-part ").unwrap();
    out.write_str("stdout ").unwrap();
    out.write_str("write\n").unwrap();

    assert_eq!(sink.contents(), "Multi-part stdout write\n");
    assert_eq!(out.bytes_written(), 24);
    assert_eq!(sink.flushes(), 3);
}

#[test]
fn test_buffered_mode_flushes_on_request() {
    let sink = SharedSink::default();
    let out = OutputStream::new("stderr", WriteMode::Buffered, Box::new(sink.clone()));

    out.write(b"error simulation\n").unwrap();
    assert_eq!(sink.flushes(), 0);

    out.flush().unwrap();
    assert_eq!(sink.flushes(), 1);
    assert_eq!(sink.contents(), "error simulation\n");
}

#[test]
fn test_concurrent_writes_do_not_interleave() {
    let sink = SharedSink::default();
    let out = OutputStream::new("stdout", WriteMode::Buffered, Box::new(sink.clone()));

    let workers: Vec<_> = ["aaaa\n", "bbbb\n", "cccc\n", "dddd\n"]
        .into_iter()
        .map(|line| {
            let out = out.clone();
            std::thread::spawn(move || {
                for _ in 0..50 {
                    out.write_str(line).unwrap();
                }
            })
        })
        .collect();
    for worker in workers {
        worker.join().unwrap();
    }

    let contents = sink.contents();
    assert_eq!(contents.lines().count(), 200);
    assert!(contents
        .lines()
        .all(|line| matches!(line, "aaaa" | "bbbb" | "cccc" | "dddd")));
}

#[test]
fn test_lines_dispatched_in_order_then_single_end() {
    let stdin = input(b"first\r\nsecond\nthird", InputFraming::Lines);
    let log = Arc::new(Mutex::new(Vec::new()));
    {
        let log = log.clone();
        stdin.on_data(move |line| {
            log.lock().push(format!("data:{}", line));
            Ok(())
        });
    }
    {
        let log = log.clone();
        stdin.on_end(move || {
            log.lock().push("end".to_string());
            Ok(())
        });
    }

    assert_eq!(stdin.pump_all().unwrap(), 3);
    assert_eq!(stdin.pump().unwrap(), PumpOutcome::Ended);
    assert!(stdin.is_ended());

    assert_eq!(
        *log.lock(),
        vec![
            "data:first".to_string(),
            "data:second".to_string(),
            "data:third".to_string(),
            "end".to_string(),
        ]
    );
}

#[test]
fn test_chunk_framing_splits_input() {
    let stdin = input(b"abcdefg", InputFraming::Chunks(3));
    let chunks = Arc::new(Mutex::new(Vec::new()));
    {
        let chunks = chunks.clone();
        stdin.on_data(move |chunk| {
            chunks.lock().push(chunk.to_string());
            Ok(())
        });
    }

    assert_eq!(stdin.pump().unwrap(), PumpOutcome::Data(3));
    stdin.pump_all().unwrap();

    assert_eq!(*chunks.lock(), vec!["abc", "def", "g"]);
}

#[test]
fn test_empty_input_only_ends() {
    let stdin = input(b"", InputFraming::Lines);
    let ends = Arc::new(Mutex::new(0));
    {
        let ends = ends.clone();
        stdin.on_end(move || {
            *ends.lock() += 1;
            Ok(())
        });
    }

    assert_eq!(stdin.pump_all().unwrap(), 0);
    stdin.pump().unwrap();
    assert_eq!(*ends.lock(), 1);
}

#[test]
fn test_failing_data_listener_surfaces_error() {
    let stdin = input(b"line\n", InputFraming::Lines);
    stdin.on_data(|_| Err(anyhow::anyhow!("bad frame")));

    let err = stdin.pump().unwrap_err();
    assert!(err.to_string().contains("bad frame"));
    assert_eq!(stdin.frames(), 1);
}
