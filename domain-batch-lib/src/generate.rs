//! Candidate label generation engine.
//!
//! This module expands a position model into the full Cartesian product of
//! concrete candidate labels. It produces bare labels only — suffixing into
//! fully qualified domains happens in the runner, and pattern filters never
//! see the suffix.
//!
//! Expansion uses an odometer-style algorithm: each position is treated as a
//! digit in a mixed-radix number and the rightmost position ticks fastest,
//! so output order is the standard lexicographic counter order. The odometer
//! is exposed as a lazy iterator, which bounds stack usage and allows early
//! termination over very large combination spaces.

use crate::error::BatchError;
use crate::patterns::PatternFilter;
use crate::types::{PositionSpec, MAX_POSITIONS};
use crate::utils::is_valid_label;

/// Expand one position spec into the values it can take.
fn slot_values(spec: &PositionSpec) -> Vec<String> {
    match spec {
        PositionSpec::Digit => ('0'..='9').map(String::from).collect(),
        PositionSpec::Letter => ('a'..='z').map(String::from).collect(),
        PositionSpec::Fixed(text) => vec![text.clone()],
    }
}

/// Raw Cartesian-product size for a position list, before any filtering.
///
/// Saturates instead of overflowing; the position cap keeps real runs far
/// below that regardless.
pub fn estimate_count(positions: &[PositionSpec]) -> usize {
    positions
        .iter()
        .fold(1usize, |acc, p| acc.saturating_mul(p.branching_factor()))
}

/// Lazy odometer over the Cartesian product of position values.
///
/// Yields each concatenated candidate label exactly once, rightmost position
/// ticking fastest.
pub struct Combinations {
    options: Vec<Vec<String>>,
    counters: Vec<usize>,
    remaining: usize,
}

impl Combinations {
    /// Create an iterator over the given position list.
    ///
    /// Positions are taken as-is: bounds checks, fixed-text validation, and
    /// pattern filtering happen in [`generate`], not here.
    pub fn new(positions: &[PositionSpec]) -> Self {
        let options: Vec<Vec<String>> = positions.iter().map(slot_values).collect();
        let remaining = options.iter().map(|o| o.len()).product();
        let counters = vec![0usize; options.len()];
        Self {
            options,
            counters,
            remaining,
        }
    }
}

impl Iterator for Combinations {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        let label: String = self
            .counters
            .iter()
            .enumerate()
            .map(|(i, &c)| self.options[i][c].as_str())
            .collect();

        // Increment odometer (rightmost first)
        for i in (0..self.counters.len()).rev() {
            self.counters[i] += 1;
            if self.counters[i] < self.options[i].len() {
                break;
            }
            self.counters[i] = 0;
        }

        Some(label)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

/// Expand a position list into all candidate labels, filtered and validated.
///
/// The pattern filter is applied at each leaf, but only when every position
/// resolves to digits — filters are digit-string predicates and only ever
/// see the raw concatenated position values, never the suffix. Leaves that
/// fail DNS label grammar are dropped.
///
/// Output is deterministic: identical input yields byte-identical output in
/// lexicographic counter order (last position fastest).
///
/// # Errors
///
/// Returns `GenerationBounds` when the position list is empty or longer than
/// [`MAX_POSITIONS`], or `ConfigError` when a fixed-text position is empty.
pub fn generate(
    positions: &[PositionSpec],
    filter: PatternFilter,
) -> Result<Vec<String>, BatchError> {
    if positions.is_empty() {
        return Err(BatchError::bounds("at least one position is required"));
    }
    if positions.len() > MAX_POSITIONS {
        return Err(BatchError::bounds(format!(
            "at most {} positions are supported, got {}",
            MAX_POSITIONS,
            positions.len()
        )));
    }
    for spec in positions {
        if let PositionSpec::Fixed(text) = spec {
            if text.is_empty() {
                return Err(BatchError::config("fixed-text positions cannot be empty"));
            }
        }
    }

    // Filters only apply over all-digit candidate spaces
    let all_digits = positions.iter().all(|p| p.is_all_digits());
    let effective_filter = if all_digits {
        filter
    } else {
        PatternFilter::None
    };

    let total = estimate_count(positions);
    tracing::debug!(
        positions = positions.len(),
        total,
        filter = %effective_filter,
        "expanding candidate space"
    );

    let mut labels = Vec::with_capacity(total.min(1_000_000));
    for label in Combinations::new(positions) {
        if effective_filter.matches(&label) && is_valid_label(&label) {
            labels.push(label);
        }
    }

    Ok(labels)
}
