//! Diagnostic logging setup
//!
//! Log lines go to stderr so command output on stdout stays clean. The level
//! comes from `MODSMITH_LOG` (or `RUST_LOG`) when set, otherwise from the
//! number of `-v` flags.

use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Environment variable holding an explicit filter directive
pub const LOG_ENV: &str = "MODSMITH_LOG";

/// Level for a given `-v` count
pub fn level_for(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

fn build_filter(verbosity: u8) -> EnvFilter {
    let builder = EnvFilter::builder().with_default_directive(level_for(verbosity).into());
    match std::env::var(LOG_ENV) {
        Ok(directive) if !directive.trim().is_empty() => builder.parse_lossy(directive),
        _ => builder.from_env_lossy(),
    }
}

/// Install the global subscriber; later calls are ignored
pub fn init(verbosity: u8) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(build_filter(verbosity))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_for_verbosity() {
        assert_eq!(level_for(0), LevelFilter::WARN);
        assert_eq!(level_for(1), LevelFilter::INFO);
        assert_eq!(level_for(2), LevelFilter::DEBUG);
        assert_eq!(level_for(9), LevelFilter::TRACE);
    }

    #[test]
    fn test_init_twice_is_harmless() {
        init(0);
        init(2);
    }
}
