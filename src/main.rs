#![allow(dead_code)]

mod cache;
mod cli;
mod collector;
mod error;
mod http;
mod info;
mod logging;

use clap::Parser;
use tracing::info;

use crate::cli::Cli;
use crate::error::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    crate::logging::init(cli.log_level_override(), cli.log_format_override())?;

    info!("Starting hostinfod");

    cli::run_server().await
}
