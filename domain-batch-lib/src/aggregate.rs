//! Derived views over a run's result list.
//!
//! Aggregation is pure: it can be recomputed eagerly on every result append
//! without touching the underlying list. "Available" means the query
//! succeeded and the domain is unregistered; everything else — registered
//! domains and failed queries alike — lands in the unavailable bucket.

use crate::types::QueryResult;

/// Results split into availability buckets, optionally keyword-filtered.
#[derive(Debug, Clone, Default)]
pub struct ResultView<'a> {
    /// Queries that succeeded and found the domain unregistered
    pub available: Vec<&'a QueryResult>,
    /// Registered domains and failed queries
    pub unavailable: Vec<&'a QueryResult>,
}

impl<'a> ResultView<'a> {
    /// Partition results into available/unavailable buckets.
    ///
    /// When `keyword` is set, both buckets are re-filtered by
    /// case-insensitive substring match against the domain name.
    pub fn partition(results: &'a [QueryResult], keyword: Option<&str>) -> Self {
        let keyword = keyword.map(|k| k.to_lowercase());
        let mut view = Self::default();

        for result in results {
            if let Some(kw) = &keyword {
                if !result.domain.to_lowercase().contains(kw.as_str()) {
                    continue;
                }
            }
            if result.is_available() {
                view.available.push(result);
            } else {
                view.unavailable.push(result);
            }
        }

        view
    }
}
