use std::{io, sync::Once};

use log::LevelFilter;

static LOGGER_INIT: Once = Once::new();

// Set up a logger that prints every CSV log line with level `level` and above, prefixed by its level.
pub(crate) fn setup_logger(level: LevelFilter) {
    LOGGER_INIT.call_once(|| {
        fern::Dispatch::new()
            .format(|out, message, record| {
                out.finish(format_args!("[{}] {}", record.level(), message))
            })
            .level(level)
            .chain(io::stdout())
            .apply()
            .unwrap();
    })
}
