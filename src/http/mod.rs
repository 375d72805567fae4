//! HTTP server module for the host info sidecar
//!
//! - Axum-based server with a single `/info` route
//! - Access logging middleware applied to every route
//! - Graceful shutdown handling
//!
//! The server exposes:
//! - GET /info - host identity snapshot as JSON

pub mod handlers;
pub mod middleware;
pub mod server;

pub use server::start_server;
