// crates/rp_cli/src/logging.rs
//
// stderr-only tracing subscriber. stdout is reserved for the report.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Env var holding an `EnvFilter` directive (e.g. `rp_pipeline=debug`).
pub const LOG_ENV: &str = "RP_LOG";

/// Filter directive from flags alone.
pub fn level_for(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        return "error";
    }
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// `--quiet` wins over `RP_LOG`; otherwise `RP_LOG` wins over `-v`.
pub fn init_tracing(verbose: u8, quiet: bool) {
    let fallback = level_for(verbose, quiet);
    let env_filter = if quiet {
        EnvFilter::new(fallback)
    } else {
        std::env::var(LOG_ENV)
            .ok()
            .and_then(|v| EnvFilter::try_new(v).ok())
            .unwrap_or_else(|| EnvFilter::new(fallback))
    };

    let stderr_layer = fmt::layer().with_writer(std::io::stderr).with_target(true);

    // A second init (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::registry().with(env_filter).with(stderr_layer).try_init();
}
