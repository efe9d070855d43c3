//! Error handling for batch domain operations.
//!
//! This module defines a comprehensive error type that covers all the different
//! ways batch generation and querying can fail, from invalid position specs to
//! network issues at the WHOIS proxy.

use std::fmt;

/// Main error type for batch domain operations.
///
/// This enum covers all possible failure modes in the generate/filter/query
/// pipeline, providing detailed context for debugging and user-friendly
/// error messages.
#[derive(Debug, Clone)]
pub enum BatchError {
    /// A generated label or the configured suffix fails DNS label grammar
    InvalidLabel { label: String, reason: String },

    /// Configuration errors (invalid position specs, bad concurrency, etc.)
    ConfigError { message: String },

    /// The candidate space would exceed the supported ceiling
    GenerationBounds { message: String },

    /// A single query against the WHOIS proxy failed
    QueryError {
        domain: String,
        message: String,
        status_code: Option<u16>,
    },

    /// Network-related errors (connection, DNS, TLS, etc.)
    NetworkError {
        message: String,
        source: Option<String>,
    },

    /// JSON parsing errors for proxy responses
    ParseError { message: String },

    /// File I/O errors when reading configuration
    FileError { path: String, message: String },

    /// Timeout errors when operations take too long
    Timeout {
        operation: String,
        duration: std::time::Duration,
    },

    /// Generic internal errors that don't fit other categories
    Internal { message: String },
}

impl BatchError {
    /// Create a new invalid label error.
    pub fn invalid_label<L: Into<String>, R: Into<String>>(label: L, reason: R) -> Self {
        Self::InvalidLabel {
            label: label.into(),
            reason: reason.into(),
        }
    }

    /// Create a new configuration error.
    pub fn config<M: Into<String>>(message: M) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Create a new generation bounds error.
    pub fn bounds<M: Into<String>>(message: M) -> Self {
        Self::GenerationBounds {
            message: message.into(),
        }
    }

    /// Create a new query error.
    pub fn query<D: Into<String>, M: Into<String>>(domain: D, message: M) -> Self {
        Self::QueryError {
            domain: domain.into(),
            message: message.into(),
            status_code: None,
        }
    }

    /// Create a new query error with HTTP status code.
    pub fn query_with_status<D: Into<String>, M: Into<String>>(
        domain: D,
        message: M,
        status_code: u16,
    ) -> Self {
        Self::QueryError {
            domain: domain.into(),
            message: message.into(),
            status_code: Some(status_code),
        }
    }

    /// Create a new network error.
    pub fn network<M: Into<String>>(message: M) -> Self {
        Self::NetworkError {
            message: message.into(),
            source: None,
        }
    }

    /// Create a new network error with source information.
    pub fn network_with_source<M: Into<String>, S: Into<String>>(message: M, source: S) -> Self {
        Self::NetworkError {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Create a new timeout error.
    pub fn timeout<O: Into<String>>(operation: O, duration: std::time::Duration) -> Self {
        Self::Timeout {
            operation: operation.into(),
            duration,
        }
    }

    /// Create a new file error.
    pub fn file_error<P: Into<String>, M: Into<String>>(path: P, message: M) -> Self {
        Self::FileError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a new internal error.
    pub fn internal<M: Into<String>>(message: M) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Check if this error is transient (a later attempt might succeed).
    ///
    /// The dispatcher itself never retries, but callers may use this to
    /// decide whether re-running a candidate is worthwhile.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::NetworkError { .. }
                | Self::Timeout { .. }
                | Self::QueryError {
                    status_code: Some(500..=599),
                    ..
                }
        )
    }
}

impl fmt::Display for BatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidLabel { label, reason } => {
                write!(f, "Invalid label '{}': {}", label, reason)
            }
            Self::ConfigError { message } => {
                write!(f, "Configuration error: {}", message)
            }
            Self::GenerationBounds { message } => {
                write!(f, "Generation bounds exceeded: {}", message)
            }
            Self::QueryError {
                domain,
                message,
                status_code,
            } => {
                if let Some(code) = status_code {
                    write!(f, "Query error for '{}' (HTTP {}): {}", domain, code, message)
                } else {
                    write!(f, "Query error for '{}': {}", domain, message)
                }
            }
            Self::NetworkError { message, source } => {
                if let Some(source) = source {
                    write!(f, "Network error: {} (source: {})", message, source)
                } else {
                    write!(f, "Network error: {}", message)
                }
            }
            Self::ParseError { message } => {
                write!(f, "Parse error: {}", message)
            }
            Self::FileError { path, message } => {
                write!(f, "File error at '{}': {}", path, message)
            }
            Self::Timeout {
                operation,
                duration,
            } => {
                write!(f, "Timeout after {:?} during: {}", duration, operation)
            }
            Self::Internal { message } => {
                write!(f, "Internal error: {}", message)
            }
        }
    }
}

impl std::error::Error for BatchError {}

// Implement From conversions for common error types
impl From<reqwest::Error> for BatchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::timeout("HTTP request", std::time::Duration::from_secs(30))
        } else if err.is_connect() {
            Self::network_with_source("Connection failed", err.to_string())
        } else {
            Self::network_with_source("HTTP request failed", err.to_string())
        }
    }
}

impl From<serde_json::Error> for BatchError {
    fn from(err: serde_json::Error) -> Self {
        Self::ParseError {
            message: format!("JSON parsing failed: {}", err),
        }
    }
}

impl From<std::io::Error> for BatchError {
    fn from(err: std::io::Error) -> Self {
        Self::Internal {
            message: format!("I/O error: {}", err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_context() {
        let err = BatchError::invalid_label("-abc", "must start with an alphanumeric character");
        assert!(err.to_string().contains("-abc"));

        let err = BatchError::query_with_status("99.com", "server error", 502);
        assert!(err.to_string().contains("502"));
        assert!(err.to_string().contains("99.com"));
    }

    #[test]
    fn test_is_transient() {
        assert!(BatchError::network("connection reset").is_transient());
        assert!(BatchError::timeout("query", std::time::Duration::from_secs(5)).is_transient());
        assert!(BatchError::query_with_status("a.com", "bad gateway", 502).is_transient());
        assert!(!BatchError::query_with_status("a.com", "not found", 404).is_transient());
        assert!(!BatchError::config("bad suffix").is_transient());
    }
}
