use derive_setters::Setters;
use serde::{Deserialize, Serialize};

/// Backoff policy for requests to the completion backend
#[derive(Debug, Clone, Serialize, Deserialize, Setters, PartialEq)]
#[setters(into)]
#[serde(default)]
pub struct RetryConfig {
    /// Minimum delay in milliseconds between retry attempts
    pub min_delay_ms: u64,

    /// Backoff multiplication factor for each retry attempt
    pub backoff_factor: u64,

    /// Maximum number of retry attempts
    pub max_retry_attempts: usize,

    /// HTTP status codes that should trigger retries (e.g., 429, 500, 502, 503,
    /// 504)
    pub retry_status_codes: Vec<u16>,

    /// Maximum delay between retries in seconds
    pub max_delay: Option<u64>,

    /// Whether to suppress retry warnings
    pub suppress_retry_errors: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            min_delay_ms: 1000,
            backoff_factor: 2,
            max_retry_attempts: 8,
            retry_status_codes: vec![429, 500, 502, 503, 504, 408],
            max_delay: None,
            suppress_retry_errors: false,
        }
    }
}

impl RetryConfig {
    pub fn is_retryable(&self, status: u16) -> bool {
        self.retry_status_codes.contains(&status)
    }
}
