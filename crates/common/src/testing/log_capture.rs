//! In-memory capture of `tracing` output
//!
//! Installs a fmt subscriber writing into a shared buffer so tests can
//! assert on what would have been logged.

use std::io;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::subscriber::DefaultGuard;
use tracing_subscriber::fmt::MakeWriter;

/// Shared buffer receiving formatted log lines.
#[derive(Clone, Default)]
pub struct LogCapture {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl LogCapture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a thread-local subscriber at `TRACE` level writing into this
    /// capture. Logging stops being captured when the guard is dropped.
    ///
    /// Works with `#[tokio::test]` (current-thread runtime) since all futures
    /// are polled on the test thread.
    pub fn install(&self) -> DefaultGuard {
        let subscriber = tracing_subscriber::fmt()
            .with_writer(self.clone())
            .with_max_level(tracing::Level::TRACE)
            .with_ansi(false)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    /// Everything captured so far.
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buffer.lock()).into_owned()
    }

    /// Captured lines containing `needle`.
    pub fn lines_containing(&self, needle: &str) -> Vec<String> {
        self.contents().lines().filter(|line| line.contains(needle)).map(str::to_string).collect()
    }

    pub fn clear(&self) {
        self.buffer.lock().clear();
    }
}

/// Writer handed out per event by [`LogCapture`].
pub struct CaptureWriter {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl io::Write for CaptureWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogCapture {
    type Writer = CaptureWriter;

    fn make_writer(&'a self) -> Self::Writer {
        CaptureWriter { buffer: Arc::clone(&self.buffer) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn captures_events_while_installed() {
        let capture = LogCapture::new();
        {
            let _guard = capture.install();
            tracing::warn!(target: "capture_test", "raising limit");
            tracing::debug!(user = "admin", "debug line");
        }
        tracing::warn!("not captured");

        let contents = capture.contents();
        assert!(contents.contains("raising limit"));
        assert!(contents.contains("admin"));
        assert!(!contents.contains("not captured"));
        assert_eq!(capture.lines_containing("WARN").len(), 1);
    }

    #[test]
    fn clear_empties_buffer() {
        let capture = LogCapture::new();
        {
            let _guard = capture.install();
            tracing::info!("something");
        }
        capture.clear();
        assert!(capture.contents().is_empty());
    }
}
