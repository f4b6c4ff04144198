//! Error types for trust-list resolution and attribute extraction.

use thiserror::Error;

/// Result type for trust operations
pub type TrustResult<T> = Result<T, TrustError>;

/// Error kinds raised by the trust-list and attribute subsystems.
///
/// "Not present" outcomes (no SIA location, no SAN entry, unknown RDN type)
/// are modelled as `Ok(None)` by the callers and never appear here.
#[derive(Error, Debug, miette::Diagnostic)]
pub enum TrustError {
    #[error("Failed to fetch trust list from {uri}: {cause}")]
    FetchFailure { uri: String, cause: String },

    #[error("Trust list format error: {0}")]
    FormatError(String),

    #[error("Subject attribute parse error: {0}")]
    AttributeParseError(String),

    #[error("Malformed {extension} extension: {reason}")]
    MalformedExtension {
        extension: &'static str,
        reason: String,
    },

    #[error("Certificate error: {0}")]
    CertificateError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    IoError(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("ASN.1 encoding/decoding error: {0}")]
    Asn1Error(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

impl TrustError {
    /// Shorthand for a malformed-extension error.
    pub fn malformed(extension: &'static str, reason: impl Into<String>) -> Self {
        TrustError::MalformedExtension {
            extension,
            reason: reason.into(),
        }
    }
}

impl From<der::Error> for TrustError {
    fn from(error: der::Error) -> Self {
        TrustError::Asn1Error(error.to_string())
    }
}

impl From<reqwest::Error> for TrustError {
    fn from(error: reqwest::Error) -> Self {
        TrustError::NetworkError(error.to_string())
    }
}

impl From<std::io::Error> for TrustError {
    fn from(error: std::io::Error) -> Self {
        TrustError::IoError(error.to_string())
    }
}
