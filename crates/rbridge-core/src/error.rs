//! Error types for rbridge-core

use thiserror::Error;

/// Core error type shared by the config layer and the bridge contract
#[derive(Debug, Error)]
pub enum Error {
    /// Neither an explicit config file nor a chip name was given
    #[error("no configuration source: pass --config <path> or --chip <name>")]
    MissingConfig,

    /// An explicit configuration source could not be read or parsed
    #[error("failed to load configuration from {path}: {reason}")]
    ConfigLoad { path: String, reason: String },

    /// A config path query or mutation did not resolve to any node
    #[error("config path matches no node: {0}")]
    PathNotFound(String),

    /// A config node had the wrong shape (scalar where a subtree was
    /// expected, or vice versa)
    #[error("config node {path} is not a {expected}")]
    NodeShape {
        path: String,
        expected: &'static str,
    },

    /// Cable/bridge instantiation failed
    #[error("cable error: {0}")]
    Cable(String),

    /// A bridge operation failed against the target
    #[error("target access failed: {0}")]
    Target(String),

    /// Underlying I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using the core Error type
pub type Result<T> = std::result::Result<T, Error>;
