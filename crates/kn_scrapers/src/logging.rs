use std::sync::Once;
use tracing::Level;

static INIT: Once = Once::new();

/// Installs the global fmt subscriber once. Later calls, or a subscriber set
/// elsewhere, leave the existing one in place.
pub fn init_logging(level: Level) {
    if !tracing::dispatcher::has_been_set() {
        INIT.call_once(|| {
            tracing_subscriber::fmt()
                .with_max_level(level)
                .with_target(true)
                .init();
        });
    }
}

/// Parses `error|warn|info|debug|trace`, case-insensitively.
pub fn parse_level(value: &str) -> Result<Level, String> {
    value
        .trim()
        .parse::<Level>()
        .map_err(|_| format!("Invalid log level: {}", value))
}
