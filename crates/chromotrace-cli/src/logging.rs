use crate::error::{CliError, Result};
use std::fs::File;
use std::path::PathBuf;
use tracing_subscriber::{filter::LevelFilter, fmt, prelude::*};

/// The log file always records at least per-frame detail, whatever the console shows.
const FILE_LEVEL_FLOOR: LevelFilter = LevelFilter::DEBUG;

fn console_level(verbosity: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::OFF;
    }
    match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

fn file_level(verbosity: u8) -> LevelFilter {
    console_level(verbosity, false).max(FILE_LEVEL_FLOOR)
}

/// Installs the global subscriber: a compact stderr layer and, when requested, a plain-text
/// log file with thread ids and targets.
pub fn setup_logging(verbosity: u8, quiet: bool, log_file: Option<PathBuf>) -> Result<()> {
    let console = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .with_filter(console_level(verbosity, quiet));

    let file = match log_file {
        Some(path) => {
            let sink = File::create(&path)?;
            Some(
                fmt::layer()
                    .with_writer(sink)
                    .with_ansi(false)
                    .with_thread_ids(true)
                    .with_filter(file_level(verbosity)),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(console)
        .with(file)
        .try_init()
        .map_err(|e| CliError::Logging(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::sync::Once;
    use tracing::{debug, error, info, trace, warn};

    static INIT: Once = Once::new();

    fn ensure_global_logger_is_set() {
        INIT.call_once(|| {
            setup_logging(3, false, None).expect("Failed to set up global logger for tests");
        });
    }

    #[test]
    fn verbosity_maps_to_console_levels() {
        assert_eq!(console_level(0, false), LevelFilter::WARN);
        assert_eq!(console_level(1, false), LevelFilter::INFO);
        assert_eq!(console_level(2, false), LevelFilter::DEBUG);
        assert_eq!(console_level(7, false), LevelFilter::TRACE);
        assert_eq!(console_level(3, true), LevelFilter::OFF);
    }

    #[test]
    fn file_level_never_drops_below_debug() {
        assert_eq!(file_level(0), LevelFilter::DEBUG);
        assert_eq!(file_level(1), LevelFilter::DEBUG);
        assert_eq!(file_level(3), LevelFilter::TRACE);
    }

    #[test]
    #[serial]
    fn initialization_and_macros_work() {
        ensure_global_logger_is_set();

        error!("This is an error");
        warn!("This is a warning");
        info!(frame = 3, "This is info");
        debug!("This is debug");
        trace!("This is trace");
    }

    #[test]
    #[serial]
    fn second_initialization_is_reported() {
        ensure_global_logger_is_set();
        assert!(matches!(
            setup_logging(0, false, None),
            Err(CliError::Logging(_))
        ));
    }

    #[test]
    #[serial]
    fn file_layer_records_debug_while_console_is_quiet() {
        let temp_dir = tempfile::tempdir().unwrap();
        let log_path = temp_dir.path().join("run.log");

        let file_layer = fmt::layer()
            .with_writer(File::create(&log_path).unwrap())
            .with_ansi(false)
            .with_thread_ids(true)
            .with_filter(file_level(0));
        let console_layer = fmt::layer()
            .with_writer(std::io::sink)
            .with_filter(console_level(0, true));
        let subscriber = tracing_subscriber::registry()
            .with(console_layer)
            .with(file_layer);

        tracing::subscriber::with_default(subscriber, || {
            debug!(frame = 12, "Frame analysis failed.");
            trace!("Dropped below the file floor.");
        });

        let content = std::fs::read_to_string(log_path).unwrap();
        assert!(content.contains("Frame analysis failed."));
        assert!(content.contains("frame=12"));
        assert!(content.contains("DEBUG"));
        assert!(content.contains("ThreadId"));
        assert!(!content.contains("Dropped below the file floor."));
    }

    #[test]
    #[serial]
    fn unwritable_log_path_is_an_io_error() {
        let invalid_path = PathBuf::from("/");

        if cfg!(unix) && invalid_path.is_dir() {
            let result = setup_logging(0, false, Some(invalid_path));
            assert!(matches!(result, Err(CliError::Io(_))));
        }
    }
}
