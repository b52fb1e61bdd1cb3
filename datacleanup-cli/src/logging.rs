use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const CRATES: [&str; 3] = ["datacleanup", "datacleanup_core", "datacleanup_ingest"];

/// Level for the datacleanup crates: the configured level, raised by each `-v`.
pub fn effective_level(configured: &str, verbose: u8) -> &str {
    match verbose {
        0 => configured,
        1 => "debug",
        _ => "trace",
    }
}

fn default_directives(level: &str) -> String {
    CRATES
        .iter()
        .map(|c| format!("{c}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}

/// Initializes stderr logging. `RUST_LOG`, when set, replaces the defaults.
pub fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directives(level)))
        .unwrap_or_else(|_| EnvFilter::new(default_directives("info")));

    let console_layer = fmt::layer().with_writer(std::io::stderr).with_target(false);

    // A subscriber may already be installed when `run` is called more than once
    // in one process; the first one stays.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .try_init();
}
