//! Log filter setup for the binary.
//!
//! `RUST_LOG` wins when set. Otherwise the configured level applies to
//! everything and `-v`/`-vv` raise it for Quire's own crates.

use tracing_subscriber::EnvFilter;

/// Filter directives for a configured level and a `-v` count.
pub fn directives(level: &str, verbose: u8) -> String {
    let quire = match verbose {
        0 => level,
        1 => "debug",
        _ => "trace",
    };
    format!("{level},quire={quire}")
}

/// Build the subscriber filter.
pub fn env_filter(level: &str, verbose: u8) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directives(level, verbose)))
}

/// Install the global subscriber. Also captures `log` records.
pub fn init(level: &str, verbose: u8) {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(level, verbose))
        .with_writer(std::io::stderr)
        .init();
}
