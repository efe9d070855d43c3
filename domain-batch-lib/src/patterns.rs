//! Structural pattern predicates over digit strings.
//!
//! Each filter is a pure boolean function used to prune the candidate set
//! when every position of a run resolves to digits. Window-based filters
//! scan every valid start offset and match existentially (true on the first
//! matching window); `Ab`/`Abc` examine the whole string's distinct-digit
//! count instead.
//!
//! Behavior on non-digit input is unspecified — the generator never invokes
//! filters on candidates containing letters.

use std::fmt;
use std::str::FromStr;

use crate::error::BatchError;

/// A named structural predicate over an all-digit candidate label.
///
/// Names follow the conventional "letters as digit classes" notation:
/// `AABB` means two adjacent equal pairs, `ABCBA` a 5-digit palindrome, and
/// so on. `Consecutive` matches any strictly ascending 3-run mod 10, and
/// `None` disables filtering entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PatternFilter {
    /// Two adjacent equal digits anywhere
    Aa,
    /// Three consecutive equal digits anywhere
    Aaa,
    /// A 4-window of two adjacent equal pairs
    Aabb,
    /// A 6-window of three adjacent equal pairs
    Aabbcc,
    /// A 3-window whose outer digits match
    Aba,
    /// A 5-window palindrome
    Abcba,
    /// A 6-window palindrome
    Abccba,
    /// A 6-window where slots (0,4), (1,5), (2,3) match pairwise
    Abccab,
    /// A 5-window with matching outer digits and three equal inner digits
    Abbba,
    /// A 6-window of two identical consecutive 3-digit blocks
    Abcabc,
    /// A 6-window with matching outer digits and four equal middle digits
    Abbbba,
    /// A 6-window forming an ascending run of 5 consecutive values, last doubled
    Abcdee,
    /// Exactly 2 distinct digit values in the whole string
    Ab,
    /// Exactly 3 distinct digit values in the whole string
    Abc,
    /// A 3-window strictly ascending by 1, wrapping mod 10 (9,0,1 counts)
    Consecutive,
    /// No filtering — every candidate passes
    #[default]
    None,
}

impl PatternFilter {
    /// All filters in registry order, for listings and help output.
    pub fn all() -> &'static [PatternFilter] {
        &[
            PatternFilter::Aa,
            PatternFilter::Aaa,
            PatternFilter::Aabb,
            PatternFilter::Aabbcc,
            PatternFilter::Aba,
            PatternFilter::Abcba,
            PatternFilter::Abccba,
            PatternFilter::Abccab,
            PatternFilter::Abbba,
            PatternFilter::Abcabc,
            PatternFilter::Abbbba,
            PatternFilter::Abcdee,
            PatternFilter::Ab,
            PatternFilter::Abc,
            PatternFilter::Consecutive,
            PatternFilter::None,
        ]
    }

    /// Registry name of this filter.
    pub fn as_str(&self) -> &'static str {
        match self {
            PatternFilter::Aa => "AA",
            PatternFilter::Aaa => "AAA",
            PatternFilter::Aabb => "AABB",
            PatternFilter::Aabbcc => "AABBCC",
            PatternFilter::Aba => "ABA",
            PatternFilter::Abcba => "ABCBA",
            PatternFilter::Abccba => "ABCCBA",
            PatternFilter::Abccab => "ABCCAB",
            PatternFilter::Abbba => "ABBBA",
            PatternFilter::Abcabc => "ABCABC",
            PatternFilter::Abbbba => "ABBBBA",
            PatternFilter::Abcdee => "ABCDEE",
            PatternFilter::Ab => "AB",
            PatternFilter::Abc => "ABC",
            PatternFilter::Consecutive => "consecutive",
            PatternFilter::None => "none",
        }
    }

    /// Short human-readable description, used in CLI listings.
    pub fn description(&self) -> &'static str {
        match self {
            PatternFilter::Aa => "two adjacent equal digits",
            PatternFilter::Aaa => "three consecutive equal digits",
            PatternFilter::Aabb => "two adjacent equal pairs",
            PatternFilter::Aabbcc => "three adjacent equal pairs",
            PatternFilter::Aba => "3-window with matching outer digits",
            PatternFilter::Abcba => "5-digit palindrome window",
            PatternFilter::Abccba => "6-digit palindrome window",
            PatternFilter::Abccab => "ABC-CAB paired window",
            PatternFilter::Abbba => "outer pair around three equal digits",
            PatternFilter::Abcabc => "repeated 3-digit block",
            PatternFilter::Abbbba => "outer pair around four equal digits",
            PatternFilter::Abcdee => "ascending run of five, last doubled",
            PatternFilter::Ab => "exactly 2 distinct digits overall",
            PatternFilter::Abc => "exactly 3 distinct digits overall",
            PatternFilter::Consecutive => "ascending 3-run, wrapping mod 10",
            PatternFilter::None => "no filtering",
        }
    }

    /// Evaluate this filter against a digit string.
    pub fn matches(&self, s: &str) -> bool {
        let d = s.as_bytes();
        match self {
            PatternFilter::Aa => any_window(d, 2, |w| w[0] == w[1]),
            PatternFilter::Aaa => any_window(d, 3, |w| w[0] == w[1] && w[1] == w[2]),
            PatternFilter::Aabb => any_window(d, 4, |w| w[0] == w[1] && w[2] == w[3]),
            PatternFilter::Aabbcc => {
                any_window(d, 6, |w| w[0] == w[1] && w[2] == w[3] && w[4] == w[5])
            }
            PatternFilter::Aba => any_window(d, 3, |w| w[0] == w[2]),
            PatternFilter::Abcba => any_window(d, 5, |w| w[0] == w[4] && w[1] == w[3]),
            PatternFilter::Abccba => {
                any_window(d, 6, |w| w[0] == w[5] && w[1] == w[4] && w[2] == w[3])
            }
            PatternFilter::Abccab => {
                any_window(d, 6, |w| w[0] == w[4] && w[1] == w[5] && w[2] == w[3])
            }
            PatternFilter::Abbba => {
                any_window(d, 5, |w| w[0] == w[4] && w[1] == w[2] && w[2] == w[3])
            }
            PatternFilter::Abcabc => {
                any_window(d, 6, |w| w[0] == w[3] && w[1] == w[4] && w[2] == w[5])
            }
            PatternFilter::Abbbba => any_window(d, 6, |w| {
                w[0] == w[5] && w[1] == w[2] && w[2] == w[3] && w[3] == w[4]
            }),
            PatternFilter::Abcdee => any_window(d, 6, |w| {
                w[1] == w[0].wrapping_add(1)
                    && w[2] == w[1].wrapping_add(1)
                    && w[3] == w[2].wrapping_add(1)
                    && w[4] == w[3].wrapping_add(1)
                    && w[5] == w[4]
                    && w[4] <= b'9'
            }),
            PatternFilter::Ab => distinct_digits(d) == 2,
            PatternFilter::Abc => distinct_digits(d) == 3,
            PatternFilter::Consecutive => any_window(d, 3, |w| {
                next_digit(w[0]) == w[1] && next_digit(w[1]) == w[2]
            }),
            PatternFilter::None => true,
        }
    }
}

impl fmt::Display for PatternFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PatternFilter {
    type Err = BatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lookup = s.trim();
        // Accepted alias for the consecutive-run filter
        if lookup.eq_ignore_ascii_case("useConsecutive") {
            return Ok(PatternFilter::Consecutive);
        }
        PatternFilter::all()
            .iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(lookup))
            .copied()
            .ok_or_else(|| {
                BatchError::config(format!(
                    "unknown pattern filter '{}' (expected one of: {})",
                    s,
                    PatternFilter::all()
                        .iter()
                        .map(|p| p.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                ))
            })
    }
}

/// Scan every window of `len` bytes; true if any window satisfies `pred`.
fn any_window(digits: &[u8], len: usize, pred: impl Fn(&[u8]) -> bool) -> bool {
    digits.len() >= len && digits.windows(len).any(|w| pred(w))
}

/// Count distinct ASCII digit values in the string.
fn distinct_digits(digits: &[u8]) -> usize {
    let mut seen = [false; 10];
    for &b in digits {
        if b.is_ascii_digit() {
            seen[(b - b'0') as usize] = true;
        }
    }
    seen.iter().filter(|&&s| s).count()
}

/// Successor digit with wraparound: '9' -> '0'.
fn next_digit(b: u8) -> u8 {
    if b == b'9' {
        b'0'
    } else {
        b + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matches(name: &str, s: &str) -> bool {
        name.parse::<PatternFilter>().unwrap().matches(s)
    }

    #[test]
    fn test_adjacent_pairs() {
        assert!(matches("AA", "1123"));
        assert!(!matches("AA", "1234"));
        assert!(matches("AA", "00"));
        assert!(!matches("AA", "0"));
    }

    #[test]
    fn test_triples() {
        assert!(matches("AAA", "21110"));
        assert!(!matches("AAA", "1212"));
        assert!(!matches("AAA", "1100"));
    }

    #[test]
    fn test_paired_pairs() {
        assert!(matches("AABB", "1122"));
        assert!(matches("AABB", "91122"));
        // Equal pairs need not differ from each other
        assert!(matches("AABB", "1111"));
        assert!(!matches("AABB", "1212"));

        assert!(matches("AABBCC", "112233"));
        assert!(!matches("AABBCC", "112234"));
    }

    #[test]
    fn test_palindrome_windows() {
        assert!(matches("ABA", "121"));
        // No inequality required between outer and middle
        assert!(matches("ABA", "111"));
        assert!(!matches("ABA", "123"));

        assert!(matches("ABCBA", "12321"));
        assert!(!matches("ABCBA", "12345"));
        assert!(matches("ABCBA", "912321")); // interior window

        assert!(matches("ABCCBA", "123321"));
        assert!(!matches("ABCCBA", "123231"));
    }

    #[test]
    fn test_structured_six_windows() {
        assert!(matches("ABCCAB", "123312"));
        assert!(!matches("ABCCAB", "123321"));

        assert!(matches("ABCABC", "123123"));
        assert!(!matches("ABCABC", "123124"));

        assert!(matches("ABBBA", "12221"));
        assert!(!matches("ABBBA", "12321"));

        assert!(matches("ABBBBA", "122221"));
        assert!(!matches("ABBBBA", "122211"));
    }

    #[test]
    fn test_ascending_run_doubled() {
        // 1,2,3,4 ascending then 5,5
        assert!(matches("ABCDEE", "123455"));
        assert!(matches("ABCDEE", "9123455")); // interior window
        assert!(!matches("ABCDEE", "123456"));
        // No wraparound: 6789 then 0,0 is not an ascending run of values
        assert!(!matches("ABCDEE", "678900"));
        assert!(matches("ABCDEE", "567899"));
    }

    #[test]
    fn test_distinct_digit_cardinality() {
        assert!(matches("AB", "1212121"));
        // Exactly 2 distinct values: a third digit anywhere disqualifies
        assert!(!matches("AB", "1213121"));
        assert!(!matches("AB", "123"));
        assert!(!matches("AB", "1111"));

        assert!(matches("ABC", "123"));
        assert!(matches("ABC", "112233"));
        assert!(!matches("ABC", "1234"));
        assert!(!matches("ABC", "12"));
    }

    #[test]
    fn test_consecutive_wraps() {
        assert!(matches("consecutive", "0123"));
        assert!(matches("consecutive", "901"));
        assert!(matches("consecutive", "890"));
        assert!(!matches("consecutive", "1357"));
        assert!(!matches("consecutive", "21"));
    }

    #[test]
    fn test_none_always_true() {
        assert!(matches("none", "000000"));
        assert!(matches("none", ""));
    }

    #[test]
    fn test_name_round_trip() {
        for filter in PatternFilter::all() {
            let parsed: PatternFilter = filter.as_str().parse().unwrap();
            assert_eq!(parsed, *filter);
        }
        // Case-insensitive lookup
        assert_eq!("aabb".parse::<PatternFilter>().unwrap(), PatternFilter::Aabb);
        assert!("AAAA".parse::<PatternFilter>().is_err());
    }

    #[test]
    fn test_consecutive_alias() {
        assert_eq!(
            "useConsecutive".parse::<PatternFilter>().unwrap(),
            PatternFilter::Consecutive
        );
        assert_eq!(
            "useconsecutive".parse::<PatternFilter>().unwrap(),
            PatternFilter::Consecutive
        );
    }

    #[test]
    fn test_short_input_never_panics() {
        for filter in PatternFilter::all() {
            let _ = filter.matches("");
            let _ = filter.matches("5");
        }
    }
}
