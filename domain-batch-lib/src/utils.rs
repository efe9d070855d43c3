//! Utility functions for label validation and domain assembly.
//!
//! This module enforces DNS label grammar (RFC 952/1123 style) on generated
//! candidates and on the configured suffix, and assembles fully qualified
//! domain names from label + suffix.

use crate::error::BatchError;

/// Maximum length of a single DNS label.
const MAX_LABEL_LEN: usize = 63;

/// Check whether a string is a valid DNS label.
///
/// Accepts strings of length 1-63 that start and end with an ASCII
/// alphanumeric character; interior characters may additionally be hyphens.
/// Single-character labels are trivially valid.
pub fn is_valid_label(label: &str) -> bool {
    let bytes = label.as_bytes();
    if bytes.is_empty() || bytes.len() > MAX_LABEL_LEN {
        return false;
    }
    if !bytes[0].is_ascii_alphanumeric() || !bytes[bytes.len() - 1].is_ascii_alphanumeric() {
        return false;
    }
    bytes
        .iter()
        .all(|&b| b.is_ascii_alphanumeric() || b == b'-')
}

/// Validate a label, returning a descriptive error on failure.
pub fn validate_label(label: &str) -> Result<(), BatchError> {
    if label.is_empty() {
        return Err(BatchError::invalid_label(label, "label cannot be empty"));
    }
    if label.len() > MAX_LABEL_LEN {
        return Err(BatchError::invalid_label(
            label,
            format!("label exceeds {} characters", MAX_LABEL_LEN),
        ));
    }
    if !is_valid_label(label) {
        return Err(BatchError::invalid_label(
            label,
            "labels must start and end with an alphanumeric character \
             and contain only alphanumerics and hyphens",
        ));
    }
    Ok(())
}

/// Validate the configured suffix before a run starts.
///
/// This is a fail-fast gate: an invalid suffix rejects the entire run with a
/// configuration error, never a per-candidate skip. Multi-part suffixes like
/// "co.uk" are validated per dot-separated part.
pub fn validate_suffix(suffix: &str) -> Result<(), BatchError> {
    if suffix.is_empty() {
        return Err(BatchError::config("suffix cannot be empty"));
    }
    for part in suffix.split('.') {
        validate_label(part)
            .map_err(|e| BatchError::config(format!("invalid suffix '{}': {}", suffix, e)))?;
    }
    Ok(())
}

/// Join a label with the configured suffix into a fully qualified domain.
pub fn full_domain(label: &str, suffix: &str) -> String {
    format!("{}.{}", label, suffix)
}
