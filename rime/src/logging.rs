use std::io::IsTerminal;

use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Install a stderr `fmt` subscriber that also captures records emitted through `log`.
///
/// Returns `false` if a global subscriber was already installed, in which case nothing changes.
pub fn init_logging(filter: EnvFilter) -> bool {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_file(true)
        .with_level(true)
        .with_line_number(true)
        .with_env_filter(filter)
        .with_ansi(std::io::stderr().is_terminal())
        .try_init()
        .is_ok()
}

/// The filter from `RUST_LOG`, falling back to `INFO` (or `TRACE` when verbose).
pub fn default_env_filter(is_verbose: bool) -> EnvFilter {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => {
            let default_level = if is_verbose {
                LevelFilter::TRACE
            } else {
                LevelFilter::INFO
            };

            EnvFilter::builder()
                .with_default_directive(default_level.into())
                .from_env_lossy()
        }
    }
}
