//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Payment-link configuration.
    pub payment: PaymentConfig,
    /// Payout configuration.
    pub payout: PayoutConfig,
}

/// Payment-link configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentConfig {
    /// Minutes a checkout payment link stays valid.
    #[serde(default = "default_link_expiry_minutes")]
    pub link_expiry_minutes: i64,
}

fn default_link_expiry_minutes() -> i64 {
    30
}

/// Payout configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct PayoutConfig {
    /// Default staff percentage applied when a business has not
    /// configured its own split.
    #[serde(default = "default_staff_percentage")]
    pub default_staff_percentage: u32,
}

fn default_staff_percentage() -> u32 {
    70
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            payment: PaymentConfig {
                link_expiry_minutes: default_link_expiry_minutes(),
            },
            payout: PayoutConfig {
                default_staff_percentage: default_staff_percentage(),
            },
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("FIXORA").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.payment.link_expiry_minutes, 30);
        assert_eq!(config.payout.default_staff_percentage, 70);
    }
}
