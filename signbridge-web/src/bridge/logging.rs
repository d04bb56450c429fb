//! Routes `tracing` events to the browser console
//!
//! The fmt subscriber writes each event into a fresh `ConsoleWriter`; whole
//! lines go out through `console.log` as they complete and the remainder on
//! drop. Timestamps are off since wasm32 has no system clock.

use std::io;

use tracing::Level;
use tracing_subscriber::fmt::MakeWriter;

/// Complete lines in `buf`, without their newlines; consumed bytes are removed
fn drain_lines(buf: &mut Vec<u8>) -> Vec<String> {
    let Some(last) = buf.iter().rposition(|&b| b == b'\n') else {
        return Vec::new();
    };
    let lines: Vec<String> = String::from_utf8_lossy(&buf[..last])
        .split('\n')
        .map(|l| l.trim_end_matches('\r').to_string())
        .filter(|l| !l.is_empty())
        .collect();
    buf.drain(..=last);
    lines
}

pub(crate) struct ConsoleWriter {
    buf: Vec<u8>,
}

impl ConsoleWriter {
    fn emit(line: &str) {
        web_sys::console::log_1(&line.into());
    }
}

impl io::Write for ConsoleWriter {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(data);
        for line in drain_lines(&mut self.buf) {
            Self::emit(&line);
        }
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if !self.buf.is_empty() {
            Self::emit(&String::from_utf8_lossy(&self.buf));
            self.buf.clear();
        }
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        let _ = io::Write::flush(self);
    }
}

#[derive(Clone, Copy, Default)]
pub(crate) struct ConsoleMakeWriter;

impl<'a> MakeWriter<'a> for ConsoleMakeWriter {
    type Writer = ConsoleWriter;

    fn make_writer(&'a self) -> Self::Writer {
        ConsoleWriter { buf: Vec::new() }
    }
}

/// Install the console subscriber; later calls are no-ops
pub fn init_logging() {
    let installed = tracing_subscriber::fmt()
        .with_writer(ConsoleMakeWriter)
        .with_max_level(Level::INFO)
        .with_target(false)
        .without_time()
        .try_init();
    if installed.is_err() {
        console_log!("tracing subscriber already installed");
    }
}
