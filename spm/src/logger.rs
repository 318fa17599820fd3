use core::fmt::{self, Write};

use log::{Level, LevelFilter, Metadata, Record, SetLoggerError};
use spin::Mutex;

type Console = &'static mut (dyn Write + Send);

struct SimpleLogger {
    console: Mutex<Option<Console>>,
}

impl SimpleLogger {
    const fn new() -> Self {
        Self {
            console: Mutex::new(None),
        }
    }
}

fn format_record(out: &mut dyn Write, record: &Record<'_>) -> fmt::Result {
    if record.metadata().level() <= Level::Warn {
        writeln!(
            out,
            "\x1b[0;31m[{}]{} -- {}\x1b[0m",
            record.level(),
            record.target(),
            record.args()
        )
    } else {
        writeln!(
            out,
            "[{}]{} -- {}",
            record.level(),
            record.target(),
            record.args()
        )
    }
}

impl log::Log for SimpleLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= Level::Trace
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        if let Some(console) = self.console.lock().as_mut() {
            // nowhere to report a broken console
            let _ = format_record(&mut **console, record);
        }
    }

    fn flush(&self) {}
}

static LOGGER: SimpleLogger = SimpleLogger::new();

/// Installs the logger on `console`. Only the first call installs it,
/// later ones merely swap the console and the level.
pub fn register_global_logger(
    console: Console,
    maxlevel: LevelFilter,
) -> Result<(), SetLoggerError> {
    *LOGGER.console.lock() = Some(console);
    log::set_max_level(maxlevel);
    log::set_logger(&LOGGER)
}
