// ColaCup - util/logging.rs
//
// Structured logging setup for hosts that do not install their own
// subscriber.
//
// Activation:
//   - Environment variable: RUST_LOG=debug (or trace)
//   - `debug` argument (host debug switch)
//   - Config file: [logging] level = "debug"
//
// Output: stderr. Never logs full message bodies above DEBUG_MAX_LINE_PREVIEW.

use tracing_subscriber::EnvFilter;

/// Initialise the logging subsystem.
///
/// Priority: RUST_LOG env var > `debug` flag > config level > default "info".
///
/// Returns `false` when a global subscriber is already installed (the host
/// owns logging); the existing subscriber is left untouched.
pub fn init(debug: bool, config_level: Option<&str>) -> bool {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if debug {
        EnvFilter::new("debug")
    } else if let Some(level) = config_level {
        EnvFilter::new(level)
    } else {
        EnvFilter::new(super::constants::DEFAULT_LOG_LEVEL)
    };

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .compact()
        .try_init()
        .is_ok();

    if installed {
        tracing::debug!(
            lib = super::constants::APP_NAME,
            version = super::constants::APP_VERSION,
            "Logging initialised"
        );
    }
    installed
}

/// Shorten a message for inclusion in debug output.
pub fn preview(message: &str) -> &str {
    let max = super::constants::DEBUG_MAX_LINE_PREVIEW;
    if message.len() <= max {
        return message;
    }
    let mut end = max;
    while !message.is_char_boundary(end) {
        end -= 1;
    }
    &message[..end]
}
