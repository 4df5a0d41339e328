//! Gateway configuration
//!
//! Defines all configurable parameters for the poller including the
//! queue endpoint, polling interval, and the external send command.

use std::time::Duration;

/// Gateway configuration
///
/// All intervals are configurable to allow tuning for different
/// deployment scenarios (dev vs prod, fast vs slow networks).
#[derive(Debug, Clone)]
pub struct Config {
    /// Unique identifier for this gateway instance, used in logs
    pub gateway_id: String,

    /// Queue endpoint URL (e.g., "http://localhost:8080/api/sms/sync")
    pub queue_url: String,

    /// How often to poll the queue for a pending job
    pub poll_interval: Duration,

    /// Per-request timeout for queue calls
    pub http_timeout: Duration,

    /// External program invoked as `<program> <phone> <message>`
    pub sms_command: String,
}

impl Config {
    /// Creates a new configuration with defaults
    pub fn new(gateway_id: String, queue_url: String) -> Self {
        Self {
            gateway_id,
            queue_url,
            poll_interval: Duration::from_millis(5000),
            http_timeout: Duration::from_millis(15_000),
            sms_command: "sms-send".to_string(),
        }
    }

    /// Creates configuration from environment variables
    ///
    /// Expected environment variables:
    /// - QUEUE_URL (required)
    /// - GATEWAY_ID (optional, default: random UUID)
    /// - POLL_INTERVAL_MS (optional, default: 5000)
    /// - HTTP_TIMEOUT_MS (optional, default: 15000)
    /// - SMS_COMMAND (optional, default: "sms-send")
    pub fn from_env() -> anyhow::Result<Self> {
        let queue_url = std::env::var("QUEUE_URL")
            .map_err(|_| anyhow::anyhow!("QUEUE_URL environment variable not set"))?;

        let gateway_id = std::env::var("GATEWAY_ID")
            .unwrap_or_else(|_| uuid::Uuid::new_v4().to_string());

        let poll_interval = std::env::var("POLL_INTERVAL_MS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_millis)
            .unwrap_or(Duration::from_millis(5000));

        let http_timeout = std::env::var("HTTP_TIMEOUT_MS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_millis)
            .unwrap_or(Duration::from_millis(15_000));

        let sms_command =
            std::env::var("SMS_COMMAND").unwrap_or_else(|_| "sms-send".to_string());

        Ok(Self {
            gateway_id,
            queue_url,
            poll_interval,
            http_timeout,
            sms_command,
        })
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.gateway_id.is_empty() {
            anyhow::bail!("gateway_id cannot be empty");
        }

        if self.queue_url.is_empty() {
            anyhow::bail!("queue_url cannot be empty");
        }

        if !self.queue_url.starts_with("http://") && !self.queue_url.starts_with("https://") {
            anyhow::bail!("queue_url must start with http:// or https://");
        }

        if self.poll_interval.is_zero() {
            anyhow::bail!("poll_interval must be greater than 0");
        }

        if self.http_timeout.is_zero() {
            anyhow::bail!("http_timeout must be greater than 0");
        }

        if self.sms_command.is_empty() {
            anyhow::bail!("sms_command cannot be empty");
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(
            uuid::Uuid::new_v4().to_string(),
            "http://localhost:8080/api/sms/sync".to_string(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.poll_interval, Duration::from_millis(5000));
        assert_eq!(config.http_timeout, Duration::from_millis(15_000));
        assert_eq!(config.sms_command, "sms-send");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();

        // Valid config should pass
        assert!(config.validate().is_ok());

        // Empty gateway_id should fail
        config.gateway_id = String::new();
        assert!(config.validate().is_err());

        config.gateway_id = "test".to_string();

        // Invalid URL should fail
        config.queue_url = "not-a-url".to_string();
        assert!(config.validate().is_err());

        config.queue_url = "http://localhost:8080/api/sms/sync".to_string();
        assert!(config.validate().is_ok());

        // Zero interval should fail
        config.poll_interval = Duration::ZERO;
        assert!(config.validate().is_err());

        config.poll_interval = Duration::from_millis(5000);

        // Empty send command should fail
        config.sms_command = String::new();
        assert!(config.validate().is_err());
    }
}
