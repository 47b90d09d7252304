use std::io;
use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_FILTER: &str = "info,service=info,sea_orm=warn,sqlx=warn";

fn env_filter(fallback: Option<&str>) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(fallback.unwrap_or(DEFAULT_FILTER)))
}

/// Initialize tracing subscriber with sensible defaults and stdout writer.
/// - Respects `RUST_LOG` if set
/// - Falls back to `info` with SQL driver noise reduced to `warn`
pub fn init_logging_default() {
    init_logging(false, None);
}

/// Initialize tracing subscriber with JSON structured output.
/// - Respects `RUST_LOG` if set, defaults to `info`
/// - Writes to stdout for consistent container logging behavior
pub fn init_logging_json() {
    init_logging(true, None);
}

/// Initialize tracing from configuration. `filter` is used only when
/// `RUST_LOG` is absent. Calling it twice is harmless.
pub fn init_logging(json: bool, filter: Option<&str>) {
    let builder = fmt()
        .with_env_filter(env_filter(filter))
        .with_target(false)
        .with_writer(io::stdout);
    let _ = if json {
        builder.json().try_init()
    } else {
        builder.compact().try_init()
    };
}
