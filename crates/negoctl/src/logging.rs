//! Logging for negoctl
//!
//! Human output goes to stdout; tracing output goes to stderr so `--json`
//! stays parseable.

use tracing_subscriber::EnvFilter;

const VALID_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Filter directive for the configured level.
///
/// `--verbose` wins; an unknown level falls back to `info`.
pub fn filter_directive(level: &str, verbose: bool) -> String {
    if verbose {
        return "debug".to_string();
    }
    let level = level.trim().to_ascii_lowercase();
    if VALID_LEVELS.contains(&level.as_str()) {
        level
    } else {
        "info".to_string()
    }
}

/// Install the stderr subscriber. `RUST_LOG` overrides the config level.
pub fn init(level: &str, verbose: bool) {
    let filter = if verbose {
        EnvFilter::new(filter_directive(level, verbose))
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(filter_directive(level, verbose)))
    };

    // A second init (tests) keeps the first subscriber
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_directive() {
        assert_eq!(filter_directive("warn", false), "warn");
        assert_eq!(filter_directive(" DEBUG ", false), "debug");
        assert_eq!(filter_directive("loud", false), "info");
        assert_eq!(filter_directive("error", true), "debug");
    }
}
