//! Runtime configuration for the vanity address generator.

use std::time::Duration;

use clap::Parser;

use crate::protocol::{Request, DEFAULT_BATCH_SIZE};
use crate::worker::{PoolOptions, SearchError, SearchSession};

/// Ethereum Vanity Address Generator
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Hex digits the address must start with (after 0x)
    #[arg(short, long, default_value = "")]
    pub prefix: String,

    /// Hex digits the address must end with
    #[arg(short, long, default_value = "")]
    pub suffix: String,

    /// Case sensitive matching (derived addresses are lowercase hex)
    #[arg(short = 'c', long, default_value = "false")]
    pub case_sensitive: bool,

    /// Keys tried between cancellation checks
    #[arg(short = 'b', long, default_value_t = DEFAULT_BATCH_SIZE)]
    pub batch_size: usize,

    /// Full search request as JSON, e.g. '{"prefix":"dead","caseSensitive":false}'
    #[arg(long, conflicts_with_all = ["prefix", "suffix", "case_sensitive", "batch_size"])]
    pub request: Option<String>,

    /// Number of worker threads (default: number of CPU cores)
    #[arg(short = 'w', long)]
    pub workers: Option<usize>,

    /// Stop after finding N addresses (0 = run forever)
    #[arg(short = 'n', long, default_value = "1")]
    pub count: usize,

    /// Progress report interval in milliseconds
    #[arg(short = 'r', long, default_value = "1000")]
    pub report_interval_ms: u64,

    /// Print protocol messages as JSON lines instead of text
    #[arg(long, default_value = "false")]
    pub json: bool,
}

impl Config {
    /// Returns the number of workers, defaulting to CPU count
    pub fn worker_count(&self) -> usize {
        self.workers.unwrap_or_else(num_cpus::get)
    }

    /// Returns the progress report interval.
    pub fn report_interval(&self) -> Duration {
        Duration::from_millis(self.report_interval_ms)
    }

    /// Builds the search request from `--request` or the individual flags.
    pub fn search_request(&self) -> Result<Request, ConfigError> {
        match &self.request {
            Some(json) => Ok(serde_json::from_str(json)?),
            None => Ok(Request {
                prefix: self.prefix.clone(),
                suffix: self.suffix.clone(),
                case_sensitive: self.case_sensitive,
                batch_size: self.batch_size,
            }),
        }
    }

    /// Returns the pool options.
    pub fn pool_options(&self) -> PoolOptions {
        PoolOptions {
            workers: self.worker_count(),
            progress_interval: self.report_interval(),
            continuous: self.count != 1,
        }
    }

    /// Validates the configuration and returns the request to run.
    pub fn validate(&self) -> Result<Request, ConfigError> {
        let request = self.search_request()?;
        // Same checks a session performs on start.
        SearchSession::new(&request, self.report_interval())?;

        if self.worker_count() == 0 {
            return Err(ConfigError::Search(SearchError::NoWorkers));
        }
        if self.report_interval_ms == 0 {
            return Err(ConfigError::InvalidValue(
                "Report interval must be at least 1ms".into(),
            ));
        }

        Ok(request)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Malformed request JSON: {0}")]
    RequestJson(#[from] serde_json::Error),

    #[error(transparent)]
    Search(#[from] SearchError),

    #[error("{0}")]
    InvalidValue(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_test_config(prefix: &str) -> Config {
        Config {
            prefix: prefix.into(),
            suffix: String::new(),
            case_sensitive: false,
            batch_size: DEFAULT_BATCH_SIZE,
            request: None,
            workers: Some(2),
            count: 1,
            report_interval_ms: 1000,
            json: false,
        }
    }

    #[test]
    fn test_valid_pattern() {
        let config = make_test_config("dead");
        let request = config.validate().unwrap();
        assert_eq!(request.prefix, "dead");
        assert!(!config.pool_options().continuous);
    }

    #[test]
    fn test_empty_pattern_is_valid() {
        assert!(make_test_config("").validate().is_ok());
    }

    #[test]
    fn test_invalid_pattern() {
        let config = make_test_config("xyz");
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Search(SearchError::Pattern(_)))
        ));
    }

    #[test]
    fn test_request_json() {
        let config = Config {
            request: Some(r#"{"suffix":"beef","batchSize":32}"#.into()),
            ..make_test_config("")
        };
        let request = config.validate().unwrap();
        assert_eq!(request.suffix, "beef");
        assert_eq!(request.batch_size, 32);

        let config = Config {
            request: Some("{not json".into()),
            ..make_test_config("")
        };
        assert!(matches!(config.validate(), Err(ConfigError::RequestJson(_))));
    }

    #[test]
    fn test_invalid_values() {
        let config = Config {
            workers: Some(0),
            ..make_test_config("a")
        };
        assert!(config.validate().is_err());

        let config = Config {
            batch_size: 0,
            ..make_test_config("a")
        };
        assert!(config.validate().is_err());

        let config = Config {
            report_interval_ms: 0,
            ..make_test_config("a")
        };
        assert!(matches!(config.validate(), Err(ConfigError::InvalidValue(_))));
    }

    #[test]
    fn test_parse_flags() {
        let config = Config::parse_from(["vanity", "-p", "DEAD", "-s", "01", "-c", "-n", "0"]);
        assert_eq!(config.prefix, "DEAD");
        assert!(config.case_sensitive);
        assert!(config.pool_options().continuous);
        assert_eq!(config.search_request().unwrap().batch_size, DEFAULT_BATCH_SIZE);
    }
}
