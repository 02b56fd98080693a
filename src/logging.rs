//! Line-oriented operational logging with timestamps and source locations.
//!
//! Provides the [`tlog!`] macro, producing lines of the form:
//!
//! ```text
//! 20260211T21:33:12.000 - src/pipeline.rs:42 - lead #17 stored
//! ```
//!
//! When stderr is a terminal the timestamp and source location are dimmed and
//! lead ids are coloured.  Call [`set_writer`] to send output somewhere else
//! (file, in-memory buffer in tests); doing so turns colour off.

use std::io::{self, IsTerminal, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{LazyLock, Mutex};

use chrono::Utc;

static COLOUR_ENABLED: AtomicBool = AtomicBool::new(false);

static LOG_WRITER: LazyLock<Mutex<Box<dyn Write + Send>>> =
    LazyLock::new(|| Mutex::new(Box::new(io::stderr())));

/// Initialize the logging system. Call once at startup before any logging.
pub fn init() {
    COLOUR_ENABLED.store(io::stderr().is_terminal(), Ordering::Relaxed);
}

/// Replace the log writer.  All subsequent [`tlog!`] output goes to `w`.
pub fn set_writer(w: Box<dyn Write + Send>) {
    COLOUR_ENABLED.store(false, Ordering::Relaxed);
    match LOG_WRITER.lock() {
        Ok(mut guard) => *guard = w,
        Err(poisoned) => *poisoned.into_inner() = w,
    }
}

pub fn colour_enabled() -> bool {
    COLOUR_ENABLED.load(Ordering::Relaxed)
}

const RESET: &str = "\x1b[0m";
const DIM: &str = "\x1b[2m";

const ID_COLOURS: &[&str] = &[
    "\x1b[91m", "\x1b[92m", "\x1b[93m", "\x1b[94m", "\x1b[95m", "\x1b[96m",
];

/// Format a lead id, coloured by value when writing to a terminal.
///
/// Returns e.g. `lead #17` (plain) or `\x1b[94mlead #17\x1b[0m` (colour).
pub fn lead_id(id: i64) -> String {
    if colour_enabled() {
        let colour = ID_COLOURS[id.unsigned_abs() as usize % ID_COLOURS.len()];
        format!("{colour}lead #{id}{RESET}")
    } else {
        format!("lead #{id}")
    }
}

/// Format the current UTC time as `YYYYMMDDTHH:MM:SS.mmm`.
pub fn format_timestamp() -> String {
    Utc::now().format("%Y%m%dT%H:%M:%S%.3f").to_string()
}

/// Write a single log line to the current writer.
///
/// Called by the [`tlog!`] macro; not intended for direct use.
pub fn emit(file: &str, line: u32, msg: &str) {
    let ts = format_timestamp();
    let formatted = if colour_enabled() {
        format!("{DIM}{ts}{RESET} {DIM}{file}:{line}{RESET} {msg}")
    } else {
        format!("{ts} - {file}:{line} - {msg}")
    };
    let mut writer = match LOG_WRITER.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };
    let _ = writeln!(*writer, "{formatted}");
}

/// Emit a log line with timestamp and source location.
///
/// ```ignore
/// tlog!("{} stored", logging::lead_id(id));
/// tlog!("WARNING: no delivery credential configured, email not sent");
/// ```
#[macro_export]
macro_rules! tlog {
    ($($arg:tt)*) => {{
        $crate::logging::emit(file!(), line!(), &format!($($arg)*));
    }};
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn tlog_writes_location_and_message() {
        let buf = SharedBuf::default();
        set_writer(Box::new(buf.clone()));
        crate::tlog!("{} stored", lead_id(17));

        let out = String::from_utf8(buf.0.lock().unwrap().clone()).unwrap();
        let line = out
            .lines()
            .find(|l| l.ends_with("lead #17 stored"))
            .expect("log line present");
        assert!(line.contains(" - src/logging.rs:"));
        assert_eq!(line.find(" - "), Some("YYYYMMDDTHH:MM:SS.mmm".len()));

        set_writer(Box::new(io::stderr()));
    }

    #[test]
    fn lead_id_is_plain_without_colour() {
        COLOUR_ENABLED.store(false, Ordering::Relaxed);
        assert_eq!(lead_id(3), "lead #3");
    }
}
