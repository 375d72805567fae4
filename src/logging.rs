//! Logging setup for the host info sidecar
//!
//! Structured logging via `tracing` with:
//! - JSON and pretty format output
//! - Log level from CLI flags, falling back to `RUST_LOG`, then `info`

use tracing_subscriber::{fmt::time::ChronoLocal, EnvFilter};

use crate::error::Result;

/// Log level enum values as strings for configuration
pub mod level {
    pub const TRACE: &str = "trace";
    pub const DEBUG: &str = "debug";
    pub const INFO: &str = "info";
    pub const WARN: &str = "warn";
    pub const ERROR: &str = "error";
}

/// Log format enum values as strings for configuration
pub mod format {
    pub const JSON: &str = "json";
    pub const PRETTY: &str = "pretty";
}

/// Initialize the global tracing subscriber.
///
/// CLI overrides take precedence over the `RUST_LOG` environment variable.
pub fn init(log_level_override: Option<&str>, log_format_override: Option<&str>) -> Result<()> {
    let log_level = log_level_override.unwrap_or(level::INFO);
    let log_format = log_format_override.unwrap_or(format::PRETTY);

    let env_filter = if log_level_override.is_some() {
        EnvFilter::new(log_level)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level))
    };

    let timer = ChronoLocal::new("%Y-%m-%d %H:%M:%S%.3f".to_string());

    match log_format {
        format::JSON => {
            tracing_subscriber::fmt()
                .json()
                .with_timer(timer)
                .with_env_filter(env_filter)
                .with_target(false)
                .init();
        }
        _ => {
            tracing_subscriber::fmt()
                .with_timer(timer)
                .with_env_filter(env_filter)
                .with_target(false)
                .with_file(false)
                .with_line_number(false)
                .init();
        }
    }

    Ok(())
}
