use std::fmt;

/// Plain `Copy` error type for the handful of ways this crate's own
/// higher-level config can be invalid. Discovery's façade itself stays
/// infallible (§4.10); this only guards values handed to it before a run
/// starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// `timeout_ms` was zero; a query would never time out.
    ZeroTimeout,
    /// `timeout_retries` or `poll_retries` exceeded what the retry counters
    /// (`u8`, §4.4) can represent without wrapping in practice.
    RetryCountTooLarge(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ZeroTimeout => write!(f, "timeout_ms must be non-zero"),
            ConfigError::RetryCountTooLarge(field) => write!(f, "{field} is unreasonably large"),
        }
    }
}

impl std::error::Error for ConfigError {}
