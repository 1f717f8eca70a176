//! Spinner shown during network waits, and the log writer that keeps
//! diagnostics from tearing through it.

use std::io::{self, Write};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// A spinner on stderr. indicatif keeps it hidden when stderr is not a terminal.
///
/// Nothing is drawn until [`start`] is called.
pub fn spinner() -> ProgressBar {
    ProgressBar::new_spinner()
}

pub fn start(spinner: &ProgressBar, message: &'static str) {
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(120));
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Stdout,
    Stderr,
}

/// Writes log records to one stream with the spinner cleared for the
/// duration of each write.
#[derive(Clone)]
pub struct LogWriter {
    spinner: ProgressBar,
    stream: Stream,
}

impl LogWriter {
    pub fn new(spinner: ProgressBar, stream: Stream) -> Self {
        Self { spinner, stream }
    }
}

impl Write for LogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let stream = self.stream;
        self.spinner.suspend(|| match stream {
            Stream::Stdout => io::stdout().write_all(buf),
            Stream::Stderr => io::stderr().write_all(buf),
        })?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.stream {
            Stream::Stdout => io::stdout().flush(),
            Stream::Stderr => io::stderr().flush(),
        }
    }
}
