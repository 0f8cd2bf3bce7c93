//! Configuration types for Cardsmith components.

use std::time::Duration;

/// Default GraphQL endpoint, matching the local backend's dev address.
/// Always overridable via `--endpoint` or `CARDSMITH_ENDPOINT`.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:4000/graphql";

/// HTTP client configuration for publish calls.
///
/// The timeout is explicit and always set; an unbounded request would hang
/// the whole batch on one slow item.
pub struct HttpConfig {
    pub timeout: Duration,
}

impl HttpConfig {
    /// Timeout in whole seconds, for timeout error reporting.
    pub fn timeout_secs(&self) -> u64 {
        self.timeout.as_secs()
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_config_defaults() {
        let config = HttpConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.timeout_secs(), 30);
    }
}
