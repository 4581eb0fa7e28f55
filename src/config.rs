use alloy::primitives::Address;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub vault: VaultConfig,
    pub bridge: BridgeConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VaultConfig {
    /// Share of realized profit routed to the donation buffer, in basis points
    pub donation_bps: u16,
    /// Sanity ceiling for `set_donation_bps`
    #[serde(default = "default_max_donation_bps")]
    pub max_donation_bps: u16,
    /// Vault owner, the only caller allowed to change policy
    pub owner: Address,
    /// Donation buffer / governance address receiving the donated slice
    pub governance: Address,
}

fn default_max_donation_bps() -> u16 {
    5_000
}

#[derive(Debug, Clone, Deserialize)]
pub struct BridgeConfig {
    /// Bridge owner, the only caller allowed to manage strategy authorization
    pub owner: Address,
    /// Vault address embedded in every emitted relay instruction
    pub vault_tag: Address,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Enable JSON formatted logs
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl AppConfig {
    /// Load configuration from files and environment
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();

        let builder = Config::builder()
            // Start with default values
            .set_default("logging.level", "info")?
            .set_default("logging.json", false)?
            .set_default("vault.max_donation_bps", 5_000)?
            // Load default config file
            .add_source(File::from(config_dir.join("default.toml")).required(false))
            // Load environment-specific config (e.g., config/production.toml)
            .add_source(
                File::from(config_dir.join(
                    std::env::var("GIVEPOOL_ENV").unwrap_or_else(|_| "development".to_string()),
                ))
                .required(false),
            )
            // Override with environment variables (GIVEPOOL_VAULT__DONATION_BPS, etc.)
            .add_source(
                Environment::with_prefix("GIVEPOOL")
                    .separator("__")
                    .try_parsing(true),
            );

        builder.build()?.try_deserialize()
    }

    /// Create a demo configuration for CLI usage
    pub fn default_config() -> Self {
        Self {
            vault: VaultConfig {
                donation_bps: 1_000,
                max_donation_bps: 5_000,
                owner: Address::with_last_byte(0x01),
                governance: Address::with_last_byte(0x02),
            },
            bridge: BridgeConfig {
                owner: Address::with_last_byte(0x01),
                vault_tag: Address::with_last_byte(0x03),
            },
            logging: LoggingConfig::default(),
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.vault.max_donation_bps > 10_000 {
            errors.push("vault.max_donation_bps must not exceed 10000".to_string());
        }

        if self.vault.donation_bps > self.vault.max_donation_bps {
            errors.push(format!(
                "vault.donation_bps {} exceeds max_donation_bps {}",
                self.vault.donation_bps, self.vault.max_donation_bps
            ));
        }

        if self.vault.owner == Address::ZERO {
            errors.push("vault.owner must not be the zero address".to_string());
        }

        if self.vault.governance == Address::ZERO {
            errors.push("vault.governance must not be the zero address".to_string());
        }

        if self.bridge.owner == Address::ZERO {
            errors.push("bridge.owner must not be the zero address".to_string());
        }

        if self.bridge.vault_tag == Address::ZERO {
            errors.push("bridge.vault_tag must not be the zero address".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
