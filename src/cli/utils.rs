//! Convenience helpers shared by the command handler.

use std::path::PathBuf;

use tracing_subscriber::EnvFilter;

/// Clap value parser that refuses empty path arguments.
pub fn parse_non_empty_path(input: &str) -> Result<PathBuf, String> {
    if input.trim().is_empty() {
        return Err("path must not be empty".to_string());
    }
    Ok(PathBuf::from(input))
}

/// Default log level for the requested verbosity.
pub fn log_level(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        return "error";
    }
    match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    }
}

/// Install the stderr subscriber. `RUST_LOG` takes precedence over the flags.
pub fn init_tracing(verbose: u8, quiet: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("proxysheet={}", log_level(verbose, quiet))));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
