//! tracing subscriber setup. Logs go to stderr so ffmpeg's own progress on
//! the terminal stays readable.

use tracing_subscriber::EnvFilter;

/// Filter directive for a `-v` count, falling back to the configured level
pub fn level_for(verbosity: u8, configured: &str) -> String {
    match verbosity {
        0 => configured.trim().to_string(),
        1 => "info".to_string(),
        _ => "debug".to_string(),
    }
}

/// Install the global subscriber. `RUST_LOG` wins over both arguments.
pub fn init(verbosity: u8, configured: &str) {
    let fallback = level_for(verbosity, configured);
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&fallback))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}
