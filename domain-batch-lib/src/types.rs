//! Core data types for batch domain generation and querying.
//!
//! This module defines all the main data structures used throughout the library,
//! including the position model, run configuration, query results, and the
//! progress/summary types the dispatcher reports.

use crate::patterns::PatternFilter;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Maximum number of position specs in one run.
///
/// Six digit positions already yields 10^6 candidates; the cap keeps the
/// combinatorial space tractable in memory. All-letter runs are bounded at
/// 26^6 in the worst case.
pub const MAX_POSITIONS: usize = 6;

/// Upper bound on concurrent workers for one run.
pub const MAX_CONCURRENCY: usize = 30;

/// One character slot of a generated label.
///
/// The generator expands each slot independently: `Digit` branches over
/// `'0'..='9'`, `Letter` over `'a'..='z'`, and `FixedText` contributes its
/// literal value without branching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum PositionSpec {
    /// Ranges over the ten digits `0`-`9`
    Digit,
    /// Ranges over the 26 lowercase letters `a`-`z`
    Letter,
    /// A fixed literal inserted verbatim (no branching)
    Fixed(String),
}

impl PositionSpec {
    /// Number of values this position contributes to the Cartesian product.
    pub fn branching_factor(&self) -> usize {
        match self {
            PositionSpec::Digit => 10,
            PositionSpec::Letter => 26,
            PositionSpec::Fixed(_) => 1,
        }
    }

    /// Whether every character this position can produce is a digit.
    ///
    /// Pattern filters only apply when this holds for all positions.
    pub fn is_all_digits(&self) -> bool {
        match self {
            PositionSpec::Digit => true,
            PositionSpec::Letter => false,
            PositionSpec::Fixed(text) => {
                !text.is_empty() && text.chars().all(|c| c.is_ascii_digit())
            }
        }
    }
}

/// Immutable configuration for one batch run.
///
/// Built interactively by the caller; the candidate list is a pure function
/// of this config and is regenerated on every edit.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Ordered position specs; order defines left-to-right concatenation
    pub positions: Vec<PositionSpec>,

    /// Suffix appended after a literal `.` to every generated label.
    /// Must itself pass label validation before a run starts.
    pub suffix: String,

    /// Number of concurrent workers, clamped to [1, 30]
    pub concurrency: usize,

    /// Structural pattern predicate applied to all-digit candidates
    pub filter: PatternFilter,

    /// Optional per-query timeout. The upstream source imposed none (a slow
    /// query may stall its chunk indefinitely); this is an opt-in guard.
    pub query_timeout: Option<Duration>,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            positions: Vec::new(),
            suffix: "com".to_string(),
            concurrency: 10,
            filter: PatternFilter::None,
            query_timeout: None,
        }
    }
}

impl BatchConfig {
    /// Create a config for the given positions and suffix with defaults elsewhere.
    pub fn new(positions: Vec<PositionSpec>, suffix: impl Into<String>) -> Self {
        Self {
            positions,
            suffix: suffix.into(),
            ..Self::default()
        }
    }

    /// Set the worker count. Automatically clamped to [1, 30].
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.clamp(1, MAX_CONCURRENCY);
        self
    }

    /// Set the pattern filter.
    pub fn with_filter(mut self, filter: PatternFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Set an optional per-query timeout.
    pub fn with_query_timeout(mut self, timeout: Duration) -> Self {
        self.query_timeout = Some(timeout);
        self
    }

    /// Whether every position resolves to digits, making pattern filters applicable.
    pub fn is_all_digits(&self) -> bool {
        !self.positions.is_empty() && self.positions.iter().all(|p| p.is_all_digits())
    }
}

/// Outcome of one query against the WHOIS proxy.
///
/// For a terminal result exactly one of `data`/`error` is populated:
/// a successful lookup carries the proxy's opaque payload, a failed one
/// carries the error message and `is_registered` is not meaningful.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResult {
    /// The fully qualified domain that was queried (e.g. "00.com")
    pub domain: String,

    /// Whether the domain is registered (only meaningful when `error` is None)
    pub is_registered: bool,

    /// Opaque payload from the WHOIS proxy; no structure is assumed here
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,

    /// Error message if the query failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl QueryResult {
    /// Build an error-tagged result for a failed query.
    pub fn from_error(domain: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            is_registered: false,
            data: None,
            error: Some(message.into()),
        }
    }

    /// Whether this result means the domain can be registered.
    pub fn is_available(&self) -> bool {
        self.error.is_none() && !self.is_registered
    }
}

/// Progress snapshot emitted after every single query completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Progress {
    /// Queries completed so far (successes and recorded failures)
    pub completed: usize,
    /// Candidate count fixed at run start
    pub total: usize,
}

impl Progress {
    /// Completion percentage in [0.0, 100.0].
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            100.0
        } else {
            self.completed as f64 / self.total as f64 * 100.0
        }
    }
}

/// Final state of one dispatcher run.
///
/// `results` may be shorter than `total` when the run was stopped early:
/// candidates that were never started simply do not appear. A fresh run is
/// required to restart; summaries are never reused.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    /// Candidate count at run start
    pub total: usize,
    /// Number of queries that ran to a terminal result
    pub completed: usize,
    /// Results in completion order (not candidate order)
    pub results: Vec<QueryResult>,
    /// Whether the run was cancelled before exhausting all candidates
    pub stopped: bool,
}

impl RunSummary {
    /// Whether every candidate was queried.
    pub fn is_complete(&self) -> bool {
        self.completed == self.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_branching_factors() {
        assert_eq!(PositionSpec::Digit.branching_factor(), 10);
        assert_eq!(PositionSpec::Letter.branching_factor(), 26);
        assert_eq!(PositionSpec::Fixed("abc".into()).branching_factor(), 1);
    }

    #[test]
    fn test_is_all_digits_per_position() {
        assert!(PositionSpec::Digit.is_all_digits());
        assert!(!PositionSpec::Letter.is_all_digits());
        assert!(PositionSpec::Fixed("123".into()).is_all_digits());
        assert!(!PositionSpec::Fixed("12a".into()).is_all_digits());
        assert!(!PositionSpec::Fixed("".into()).is_all_digits());
    }

    #[test]
    fn test_config_all_digits() {
        let config = BatchConfig::new(
            vec![PositionSpec::Digit, PositionSpec::Fixed("88".into())],
            "com",
        );
        assert!(config.is_all_digits());

        let config = BatchConfig::new(vec![PositionSpec::Digit, PositionSpec::Letter], "com");
        assert!(!config.is_all_digits());

        let empty = BatchConfig::new(vec![], "com");
        assert!(!empty.is_all_digits());
    }

    #[test]
    fn test_concurrency_clamped() {
        let config = BatchConfig::default().with_concurrency(500);
        assert_eq!(config.concurrency, MAX_CONCURRENCY);

        let config = BatchConfig::default().with_concurrency(0);
        assert_eq!(config.concurrency, 1);
    }

    #[test]
    fn test_query_result_availability() {
        let available = QueryResult {
            domain: "a1.com".into(),
            is_registered: false,
            data: Some(serde_json::json!({"status": "free"})),
            error: None,
        };
        assert!(available.is_available());

        let taken = QueryResult {
            domain: "a1.com".into(),
            is_registered: true,
            data: Some(serde_json::json!({})),
            error: None,
        };
        assert!(!taken.is_available());

        let failed = QueryResult::from_error("a1.com", "connection reset");
        assert!(!failed.is_available());
        assert!(failed.data.is_none());
    }

    #[test]
    fn test_progress_percent() {
        let p = Progress {
            completed: 25,
            total: 100,
        };
        assert!((p.percent() - 25.0).abs() < f64::EPSILON);

        let empty = Progress {
            completed: 0,
            total: 0,
        };
        assert!((empty.percent() - 100.0).abs() < f64::EPSILON);
    }
}
