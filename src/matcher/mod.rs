//! Pattern matching for Ethereum addresses.
//!
//! A pattern is a hex prefix, a hex suffix, or both. Empty parts match
//! everything, so a suffix-only search leaves the prefix empty.

mod pattern;

pub use pattern::{matches, Pattern, PatternError, ADDRESS_HEX_LEN};
