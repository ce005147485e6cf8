//! Pattern matching implementation.

use std::time::Duration;

use crate::crypto::Address;

/// Number of hex digits in an address.
pub const ADDRESS_HEX_LEN: usize = 40;

/// Errors raised while validating a search pattern.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PatternError {
    #[error("{part} contains non-hex character {found:?} (expected 0-9, a-f, A-F)")]
    NonHex { part: &'static str, found: char },

    #[error("combined prefix and suffix length {0} exceeds 40 hex digits")]
    TooLong(usize),
}

/// Compares an address string against a prefix and suffix.
///
/// The prefix is tested against the hex digits after `0x`, the suffix against
/// the end of the full string. Empty parts always match. When
/// `case_sensitive` is false both sides are lowercased first.
pub fn matches(address: &str, prefix: &str, suffix: &str, case_sensitive: bool) -> bool {
    if case_sensitive {
        matches_normalized(address, prefix, suffix)
    } else {
        matches_normalized(
            &address.to_lowercase(),
            &prefix.to_lowercase(),
            &suffix.to_lowercase(),
        )
    }
}

#[inline]
fn matches_normalized(address: &str, prefix: &str, suffix: &str) -> bool {
    let digits = address.strip_prefix("0x").unwrap_or(address);
    digits.starts_with(prefix) && address.ends_with(suffix)
}

/// A validated prefix/suffix pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    /// Prefix (normalized)
    prefix: String,
    /// Suffix (normalized)
    suffix: String,
    /// Whether matching is case sensitive
    case_sensitive: bool,
}

impl Pattern {
    /// Validates and normalizes a pattern.
    ///
    /// Both parts may be empty, which matches every address.
    pub fn new(
        prefix: impl Into<String>,
        suffix: impl Into<String>,
        case_sensitive: bool,
    ) -> Result<Self, PatternError> {
        let normalize = |s: String| if case_sensitive { s } else { s.to_lowercase() };
        let prefix = normalize(prefix.into());
        let suffix = normalize(suffix.into());

        for (part, value) in [("prefix", &prefix), ("suffix", &suffix)] {
            if let Some(found) = value.chars().find(|c| !c.is_ascii_hexdigit()) {
                return Err(PatternError::NonHex { part, found });
            }
        }

        let total_len = prefix.len() + suffix.len();
        if total_len > ADDRESS_HEX_LEN {
            return Err(PatternError::TooLong(total_len));
        }

        Ok(Self {
            prefix,
            suffix,
            case_sensitive,
        })
    }

    /// Returns the prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Returns the suffix.
    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// Returns whether matching is case sensitive.
    pub fn case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    /// Returns true when the pattern matches every address.
    pub fn is_trivial(&self) -> bool {
        self.prefix.is_empty() && self.suffix.is_empty()
    }

    /// Matches an address string against this pattern.
    #[inline]
    pub fn matches_str(&self, address: &str) -> bool {
        if self.case_sensitive {
            matches_normalized(address, &self.prefix, &self.suffix)
        } else {
            matches_normalized(&address.to_lowercase(), &self.prefix, &self.suffix)
        }
    }

    /// Matches a derived address against its lowercase `0x` rendering.
    #[inline]
    pub fn matches(&self, address: &Address) -> bool {
        self.is_trivial() || self.matches_str(&address.to_hex_prefixed())
    }

    /// Returns the estimated difficulty (expected attempts to find a match).
    ///
    /// Each hex digit has 16 possible values.
    pub fn estimated_difficulty(&self) -> u64 {
        let total_len = (self.prefix.len() + self.suffix.len()) as u32;
        16u64.saturating_pow(total_len)
    }

    /// Returns a human-readable difficulty estimate.
    pub fn difficulty_description(&self) -> String {
        let diff = self.estimated_difficulty();
        match diff {
            0..=1_000 => "Very Easy (< 1 second)".into(),
            1_001..=100_000 => "Easy (seconds)".into(),
            100_001..=10_000_000 => "Medium (minutes)".into(),
            10_000_001..=1_000_000_000 => "Hard (hours)".into(),
            _ => "Very Hard (days or more)".into(),
        }
    }

    /// Expected time to a match at `keys_per_second`, if the rate is known.
    pub fn estimated_time(&self, keys_per_second: f64) -> Option<Duration> {
        if keys_per_second <= 0.0 {
            return None;
        }
        Duration::try_from_secs_f64(self.estimated_difficulty() as f64 / keys_per_second).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIXED: &str = "0xABCDEF0000000000000000000000000000001234";

    fn make_address(hex_str: &str) -> Address {
        let bytes: [u8; 20] = hex::decode(hex_str).unwrap().try_into().unwrap();
        Address::from_bytes(bytes)
    }

    #[test]
    fn test_case_insensitive_prefix() {
        assert!(matches(MIXED, "abc", "", false));
        assert!(matches(MIXED, "ABC", "", false));
    }

    #[test]
    fn test_case_sensitive_mismatch() {
        assert!(!matches(MIXED, "abc", "", true));
        assert!(matches(MIXED, "ABC", "", true));
    }

    #[test]
    fn test_vacuous_match() {
        for case_sensitive in [false, true] {
            assert!(matches(MIXED, "", "", case_sensitive));
        }
    }

    #[test]
    fn test_prefix_skips_0x() {
        assert!(!matches(MIXED, "0x", "", false));
        assert!(matches("0x0abc", "0a", "", false));
    }

    #[test]
    fn test_suffix_match() {
        assert!(matches(MIXED, "", "1234", false));
        assert!(!matches(MIXED, "abcdef", "234", true));
        assert!(matches(MIXED, "ABCDEF", "234", true));
    }

    #[test]
    fn test_pattern_matches_address() {
        let pattern = Pattern::new("DEAD", "beef", false).unwrap();
        assert_eq!(pattern.prefix(), "dead");
        assert!(pattern.matches(&make_address("deadbeef000000000000000000000000deadbeef")));
        assert!(!pattern.matches(&make_address("beefdead000000000000000000000000deadbeef")));
        assert!(pattern.matches_str("0xDEAD00000000000000000000000000000000BEEF"));
    }

    #[test]
    fn test_case_sensitive_matches_rendered_address() {
        let addr = make_address("5aaeb6053f3e94c9b9a09f33669435e7ef1beaed");
        assert!(Pattern::new("5aa", "", true).unwrap().matches(&addr));
        assert!(Pattern::new("", "beaed", true).unwrap().matches(&addr));
        assert!(Pattern::new("5AA", "", false).unwrap().matches(&addr));
        // The checksum form 0x5aAeb... is display only.
        assert!(!Pattern::new("5aA", "", true).unwrap().matches(&addr));
        assert_eq!(
            Pattern::new("5aA", "", true).unwrap().matches(&addr),
            matches(&addr.to_hex_prefixed(), "5aA", "", true)
        );
    }

    #[test]
    fn test_validation() {
        assert!(Pattern::new("", "", false).unwrap().is_trivial());
        assert_eq!(
            Pattern::new("xyz", "", false),
            Err(PatternError::NonHex {
                part: "prefix",
                found: 'x'
            })
        );
        assert_eq!(
            Pattern::new("", "Fz", true).unwrap_err().to_string(),
            "suffix contains non-hex character 'z' (expected 0-9, a-f, A-F)"
        );
        assert!(matches!(
            Pattern::new("", "0g", false),
            Err(PatternError::NonHex { part: "suffix", .. })
        ));
        assert_eq!(
            Pattern::new("a".repeat(30), "b".repeat(11), false),
            Err(PatternError::TooLong(41))
        );
    }

    #[test]
    fn test_difficulty() {
        let pattern = Pattern::new("dead", "", false).unwrap();
        assert_eq!(pattern.estimated_difficulty(), 65536); // 16^4
        let pattern = Pattern::new("de", "ad", false).unwrap();
        assert_eq!(pattern.estimated_difficulty(), 65536);
        let pattern = Pattern::new("dE", "0", true).unwrap();
        assert_eq!(pattern.estimated_difficulty(), 4096);
        assert_eq!(Pattern::new("", "", false).unwrap().estimated_difficulty(), 1);
    }

    #[test]
    fn test_estimated_time() {
        let pattern = Pattern::new("dead", "", false).unwrap();
        assert_eq!(pattern.estimated_time(65536.0), Some(Duration::from_secs(1)));
        assert_eq!(pattern.estimated_time(0.0), None);
    }
}
