//! `tracing` output for the browser console.
//!
//! A plain `fmt` subscriber (no timer, no ANSI) whose writer buffers each
//! formatted event and hands it to the console method matching its level.

use std::io;

use tracing::{Level, Metadata};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::MakeWriter;

pub const DEFAULT_FILTER: &str = "info";

/// Parses `directives`, falling back to [`DEFAULT_FILTER`] when they are
/// malformed.
pub fn env_filter(directives: &str) -> EnvFilter {
    EnvFilter::try_new(directives).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Installs the console subscriber. Returns `false` if a global subscriber
/// was already set.
pub fn init(directives: &str) -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(directives))
        .with_writer(ConsoleMakeWriter)
        .with_ansi(false)
        .without_time()
        .try_init()
        .is_ok()
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleMakeWriter;

impl<'a> MakeWriter<'a> for ConsoleMakeWriter {
    type Writer = ConsoleWriter;

    fn make_writer(&'a self) -> Self::Writer {
        ConsoleWriter::new(Level::INFO)
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        ConsoleWriter::new(*meta.level())
    }
}

/// Collects one event; emits it when dropped.
#[derive(Debug)]
pub struct ConsoleWriter {
    level: Level,
    buf: Vec<u8>,
}

impl ConsoleWriter {
    fn new(level: Level) -> Self {
        Self {
            level,
            buf: Vec::new(),
        }
    }
}

impl io::Write for ConsoleWriter {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(bytes);
        Ok(bytes.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        if self.buf.is_empty() {
            return;
        }
        let line = String::from_utf8_lossy(&self.buf);
        emit(self.level, line.trim_end());
    }
}

#[cfg(target_arch = "wasm32")]
fn emit(level: Level, line: &str) {
    use wasm_bindgen::JsValue;
    use web_sys::console;

    let line = JsValue::from_str(line);
    match level {
        Level::ERROR => console::error_1(&line),
        Level::WARN => console::warn_1(&line),
        Level::INFO => console::info_1(&line),
        _ => console::debug_1(&line),
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn emit(_level: Level, line: &str) {
    eprintln!("{line}");
}

#[cfg(test)]
mod tests {
    use super::{ConsoleMakeWriter, env_filter};
    use std::io::Write;
    use tracing::Level;
    use tracing::level_filters::LevelFilter;
    use tracing_subscriber::fmt::MakeWriter;

    #[test]
    fn filters_parse_directives() {
        assert_eq!(env_filter("warn").max_level_hint(), Some(LevelFilter::WARN));
        assert_eq!(
            env_filter("layers=debug,info").max_level_hint(),
            Some(LevelFilter::DEBUG)
        );
    }

    #[test]
    fn writer_buffers_until_dropped() {
        let mut writer = ConsoleMakeWriter.make_writer();
        assert_eq!(writer.level, Level::INFO);
        writer.write_all(b"borders ").unwrap();
        writer.write_all(b"ready\n").unwrap();
        assert_eq!(writer.buf, b"borders ready\n");
    }
}
