use thiserror::Error;

/// Main error type for the application
#[derive(Error, Debug)]
pub enum Error {
    #[error("Host info collection error: {0}")]
    Collect(#[from] CollectError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while collecting the host identity snapshot.
///
/// Cloneable so one failed collection attempt can hand the same error to
/// every request that was waiting on it. Failures are never cached: the next
/// request after a failure starts a fresh attempt.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CollectError {
    #[error("OS hostname lookup failed: {0}")]
    HostnameUnavailable(String),

    #[error("network interface enumeration failed: {0}")]
    InterfaceEnumerationFailed(String),
}

/// Type alias for Results
pub type Result<T> = std::result::Result<T, Error>;
