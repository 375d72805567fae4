use clap::{Parser, ValueEnum};
use std::sync::Arc;
use tokio::signal;
use tracing::{info, instrument};

use crate::cache::SnapshotCache;
use crate::collector::SystemSource;
use crate::error::Result;

#[derive(Parser)]
#[command(name = "hostinfod")]
#[command(about = "A container host introspection sidecar")]
#[command(long_about = "
A single-binary HTTP service that reports the machine's hostname and network
interface addresses on GET /info, for diagnosing containerized hosts.
")]
#[command(version)]
pub struct Cli {
    /// Override log level
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Set log format
    #[arg(long, value_enum)]
    pub log_format: Option<LogFormat>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(ValueEnum, Clone, Debug)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

#[derive(ValueEnum, Clone, Debug)]
pub enum LogFormat {
    Json,
    Pretty,
}

impl Cli {
    /// Effective log level considering verbose/quiet flags, if any was given
    pub fn log_level_override(&self) -> Option<&'static str> {
        if self.verbose {
            return Some(crate::logging::level::DEBUG);
        }
        if self.quiet {
            return Some(crate::logging::level::ERROR);
        }
        self.log_level.as_ref().map(|level| match level {
            LogLevel::Trace => crate::logging::level::TRACE,
            LogLevel::Debug => crate::logging::level::DEBUG,
            LogLevel::Info => crate::logging::level::INFO,
            LogLevel::Warn => crate::logging::level::WARN,
            LogLevel::Error => crate::logging::level::ERROR,
        })
    }

    pub fn log_format_override(&self) -> Option<&'static str> {
        self.log_format.as_ref().map(|fmt| match fmt {
            LogFormat::Json => crate::logging::format::JSON,
            LogFormat::Pretty => crate::logging::format::PRETTY,
        })
    }
}

/// Run the info server until shutdown
#[instrument(skip_all)]
pub async fn run_server() -> Result<()> {
    // The cache is owned here and handed to the HTTP layer; population
    // happens lazily on the first /info request.
    let cache = Arc::new(SnapshotCache::new(Arc::new(SystemSource)));

    let shutdown_signal = setup_shutdown_signal();

    info!("Starting server");
    crate::http::start_server(cache, shutdown_signal).await?;
    Ok(())
}

/// Set up graceful shutdown signal handling for Linux
pub async fn setup_shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C");
        },
        _ = terminate => {
            info!("Received SIGTERM");
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbose_wins_over_explicit_level() {
        let cli = Cli::parse_from(["hostinfod", "--verbose", "--log-level", "warn"]);
        assert_eq!(cli.log_level_override(), Some("debug"));
    }

    #[test]
    fn no_flags_means_no_override() {
        let cli = Cli::parse_from(["hostinfod"]);
        assert_eq!(cli.log_level_override(), None);
        assert_eq!(cli.log_format_override(), None);
    }

    #[test]
    fn log_format_flag_maps_to_format_constant() {
        let cli = Cli::parse_from(["hostinfod", "--log-format", "json"]);
        assert_eq!(cli.log_format_override(), Some("json"));
    }
}
