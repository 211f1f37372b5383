//! Error types for hparams-synth
//!
//! Every failure propagates to the entry point; nothing here is retried.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// hparams-synth error types
#[derive(Error, Debug)]
pub enum Error {
    /// The selected writer dialect has no implementation on this path
    #[error("{0} hparam logging not functional yet\nSwitch the writer dialect to legacy")]
    DialectNotImplemented(String),

    /// Hyper-parameter domain is malformed
    #[error("Invalid domain: {0}")]
    InvalidDomain(String),

    /// Hyper-parameter has no domain to sample from
    #[error("Hyper-parameter '{0}' has no domain to sample from")]
    MissingDomain(String),

    /// Driver configuration rejected by validation
    #[error("Invalid driver config: {0}")]
    InvalidConfig(String),

    /// An event file line could not be decoded
    #[error("Malformed event in {}:{line}: {reason}", .path.display())]
    MalformedEvent {
        /// Event file containing the bad line
        path: PathBuf,
        /// 1-based line number
        line: usize,
        /// Decoder message
        reason: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
