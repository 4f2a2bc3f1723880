//! boxscout.toml configuration parser.
//!
//! Every field is optional in the file; the daemon overlays CLI flags on
//! top and fills the remaining gaps from the `DEFAULT_*` constants here.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Periodic refresh interval when neither the file nor the CLI sets one.
pub const DEFAULT_INTERVAL_SECS: u64 = 1800;
/// Lower bound of the adaptive inter-cycle delay.
pub const DEFAULT_BACKOFF_MIN_SECS: u64 = 10;
/// Upper bound of the adaptive inter-cycle delay.
pub const DEFAULT_BACKOFF_MAX_SECS: u64 = 320;
/// Webhook bind address.
pub const DEFAULT_LISTEN: &str = "0.0.0.0:9099";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub netbox: Option<NetBoxSection>,
    pub output: Option<OutputSection>,
    pub schedule: Option<ScheduleSection>,
    pub webhook: Option<WebhookSection>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NetBoxSection {
    pub url: Option<String>,
    pub token: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputSection {
    pub directory: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScheduleSection {
    pub interval_secs: Option<u64>,
    pub backoff_min_secs: Option<u64>,
    pub backoff_max_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WebhookSection {
    pub listen: Option<String>,
}

impl Config {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full_config() {
        let toml_str = r#"
[netbox]
url = "https://netbox.example.com"
token = "0123456789abcdef"

[output]
directory = "/var/lib/prometheus/file_sd"

[schedule]
interval_secs = 600
backoff_min_secs = 5
backoff_max_secs = 160

[webhook]
listen = "127.0.0.1:9099"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(
            config.netbox.as_ref().unwrap().url.as_deref(),
            Some("https://netbox.example.com")
        );
        assert_eq!(config.schedule.as_ref().unwrap().interval_secs, Some(600));
        assert_eq!(
            config.webhook.as_ref().unwrap().listen.as_deref(),
            Some("127.0.0.1:9099")
        );
    }

    #[test]
    fn parse_empty_config() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.netbox.is_none());
        assert!(config.schedule.is_none());
    }

    #[test]
    fn parse_partial_section() {
        let config: Config = toml::from_str("[schedule]\ninterval_secs = 60\n").unwrap();
        let schedule = config.schedule.unwrap();
        assert_eq!(schedule.interval_secs, Some(60));
        assert_eq!(schedule.backoff_min_secs, None);
    }
}
