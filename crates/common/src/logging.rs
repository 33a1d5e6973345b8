//! Logging and tracing initialization.

use std::fs::OpenOptions;
use std::io::{self, IsTerminal, Write};
use std::sync::Mutex;

use crate::config::LoggingConfig;

/// Initialize the tracing subscriber with the given configuration.
///
/// `RUST_LOG` takes precedence over `config.level`. When `config.file` is set
/// and can be opened, logs are appended there instead of stderr.
pub fn init_logging(config: &LoggingConfig) {
    use tracing_subscriber::{fmt, EnvFilter};

    let crlf = io::stderr().is_terminal();
    let stderr = move || CrlfWriter::new(io::stderr(), crlf);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let file = config.file.as_ref().and_then(|path| {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).ok();
        }
        match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => Some(file),
            Err(e) => {
                eprintln!("Failed to open log file {}: {e}", path.display());
                None
            }
        }
    });

    match (config.json, file) {
        (true, Some(file)) => {
            let subscriber = fmt::Subscriber::builder()
                .with_env_filter(env_filter)
                .with_writer(Mutex::new(file))
                .json()
                .finish();
            tracing::subscriber::set_global_default(subscriber).ok();
        }
        (true, None) => {
            let subscriber = fmt::Subscriber::builder()
                .with_env_filter(env_filter)
                .with_writer(stderr)
                .json()
                .finish();
            tracing::subscriber::set_global_default(subscriber).ok();
        }
        (false, Some(file)) => {
            let subscriber = fmt::Subscriber::builder()
                .with_env_filter(env_filter)
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(true)
                .finish();
            tracing::subscriber::set_global_default(subscriber).ok();
        }
        (false, None) => {
            let subscriber = fmt::Subscriber::builder()
                .with_env_filter(env_filter)
                .with_writer(stderr)
                .with_target(true)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .finish();
            tracing::subscriber::set_global_default(subscriber).ok();
        }
    }
}

/// Writer that ends lines with `\r\n` when enabled.
///
/// Terminal key input puts the terminal in raw mode, where a bare `\n` no
/// longer returns the carriage.
pub struct CrlfWriter<W> {
    inner: W,
    enabled: bool,
}

impl<W: Write> CrlfWriter<W> {
    pub fn new(inner: W, enabled: bool) -> Self {
        Self { inner, enabled }
    }
}

impl<W: Write> Write for CrlfWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if !self.enabled {
            return self.inner.write(buf);
        }

        let mut start = 0;
        for (i, &byte) in buf.iter().enumerate() {
            if byte == b'\n' && (i == 0 || buf[i - 1] != b'\r') {
                self.inner.write_all(&buf[start..i])?;
                self.inner.write_all(b"\r\n")?;
                start = i + 1;
            }
        }
        self.inner.write_all(&buf[start..])?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crlf_writer_translates_bare_newlines() {
        let mut out = CrlfWriter::new(Vec::new(), true);
        out.write_all(b"one\ntwo\r\nthree\n").unwrap();
        assert_eq!(out.inner, b"one\r\ntwo\r\nthree\r\n");
    }

    #[test]
    fn test_crlf_writer_passes_through_when_disabled() {
        let mut out = CrlfWriter::new(Vec::new(), false);
        out.write_all(b"one\ntwo\n").unwrap();
        assert_eq!(out.inner, b"one\ntwo\n");
    }
}
