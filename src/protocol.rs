//! Request / progress / result messages exchanged with a search worker.
//!
//! Field names follow the camelCase wire shape:
//!
//! ```json
//! {"prefix":"dead","suffix":"","caseSensitive":false,"batchSize":256}
//! {"type":"progress","attempts":4096,"rate":812}
//! {"type":"found","result":{"address":"0xdead…","privateKey":"0x…","attempts":51234,"time":"3.2s"}}
//! ```

use serde::{Deserialize, Serialize};

use crate::matcher::{Pattern, PatternError};

/// Iterations per batch when a request does not specify one.
pub const DEFAULT_BATCH_SIZE: usize = 256;

fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}

/// Parameters of one search session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    /// Hex digits the address must start with (after `0x`)
    #[serde(default)]
    pub prefix: String,
    /// Hex digits the address must end with
    #[serde(default)]
    pub suffix: String,
    #[serde(default)]
    pub case_sensitive: bool,
    /// Iterations between yields
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

impl Request {
    /// Creates a request with the default batch size.
    pub fn new(prefix: impl Into<String>, suffix: impl Into<String>, case_sensitive: bool) -> Self {
        Self {
            prefix: prefix.into(),
            suffix: suffix.into(),
            case_sensitive,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    /// Validates the prefix and suffix into a [`Pattern`].
    pub fn pattern(&self) -> Result<Pattern, PatternError> {
        Pattern::new(self.prefix.as_str(), self.suffix.as_str(), self.case_sensitive)
    }
}

impl Default for Request {
    fn default() -> Self {
        Self::new("", "", false)
    }
}

/// A successful search result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VanityResult {
    /// `0x` + 40 lowercase hex digits
    pub address: String,
    /// `0x` + 64 hex digits
    pub private_key: String,
    /// Attempts made by the session, including the match
    pub attempts: u64,
    /// Elapsed time, e.g. `842ms` or `3.2s`
    pub time: String,
}

/// Messages emitted by a running search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Message {
    Progress { attempts: u64, rate: u64 },
    Found { result: VanityResult },
}

impl Message {
    /// Returns the result for `found` messages.
    pub fn as_found(&self) -> Option<&VanityResult> {
        match self {
            Message::Found { result } => Some(result),
            Message::Progress { .. } => None,
        }
    }
}
