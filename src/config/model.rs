//! Configuration data model.
//!
//! All structs derive `Serialize`/`Deserialize` for TOML persistence.
//! Every field has a sensible default so the application works out of the
//! box against a local development node.

use serde::{Deserialize, Serialize};

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub chain: ChainConfig,
    #[serde(default)]
    pub pinning: PinningConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainConfig {
    /// JSON-RPC endpoint of the node holding the wallet accounts.
    #[serde(default = "default_rpc_url")]
    pub rpc_url: String,
    /// Deployed voting contract.
    #[serde(default = "default_contract_address")]
    pub contract_address: String,
    /// Log poll cadence for the event subscription.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Event signatures whose topic hashes trigger a candidate refresh.
    /// Only the hash is used; payloads are never decoded.
    #[serde(default = "default_created_event")]
    pub created_event: String,
    #[serde(default = "default_voted_event")]
    pub voted_event: String,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            rpc_url: default_rpc_url(),
            contract_address: default_contract_address(),
            poll_interval_ms: default_poll_interval_ms(),
            created_event: default_created_event(),
            voted_event: default_voted_event(),
        }
    }
}

fn default_rpc_url() -> String {
    "http://127.0.0.1:8545".into()
}

fn default_contract_address() -> String {
    // First contract deployed on a stock hardhat node.
    "0x5FbDB2315678afecb367f032d93F642f64180aa3".into()
}

fn default_poll_interval_ms() -> u64 {
    2000
}

fn default_created_event() -> String {
    "candidateCreated(uint256,string,uint256,string,address)".into()
}

fn default_voted_event() -> String {
    "Voted(address,address)".into()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PinningConfig {
    #[serde(default = "default_pin_api_url")]
    pub api_url: String,
    #[serde(default = "default_pin_gateway_url")]
    pub gateway_url: String,
    /// Pinata JWT; the `PINATA_JWT` environment variable overrides this.
    #[serde(default)]
    pub jwt: Option<String>,
    /// Legacy key/secret pair, used only when no JWT is set.
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub api_secret: Option<String>,
}

impl Default for PinningConfig {
    fn default() -> Self {
        Self {
            api_url: default_pin_api_url(),
            gateway_url: default_pin_gateway_url(),
            jwt: None,
            api_key: None,
            api_secret: None,
        }
    }
}

fn default_pin_api_url() -> String {
    "https://api.pinata.cloud".into()
}

fn default_pin_gateway_url() -> String {
    "https://gateway.pinata.cloud".into()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_timestamp_format")]
    pub timestamp_format: String,
    /// Maximum lines retained in the activity panel.
    #[serde(default = "default_max_scrollback")]
    pub max_scrollback: usize,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            timestamp_format: default_timestamp_format(),
            max_scrollback: default_max_scrollback(),
        }
    }
}

fn default_timestamp_format() -> String {
    "%H:%M:%S".into()
}

fn default_max_scrollback() -> usize {
    500
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_log_dir")]
    pub log_dir: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            log_dir: default_log_dir(),
        }
    }
}

fn default_log_dir() -> String {
    "~/.local/share/ballotbox/logs".into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_yields_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.chain.rpc_url, "http://127.0.0.1:8545");
        assert_eq!(
            config.chain.contract_address,
            "0x5FbDB2315678afecb367f032d93F642f64180aa3"
        );
        assert_eq!(config.chain.poll_interval_ms, 2000);
        assert_eq!(config.ui.max_scrollback, 500);
        assert!(!config.logging.enabled);
        assert!(config.pinning.jwt.is_none());
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [chain]
            rpc_url = "http://10.0.0.5:8545"

            [pinning]
            jwt = "abc"
            "#,
        )
        .unwrap();
        assert_eq!(config.chain.rpc_url, "http://10.0.0.5:8545");
        assert_eq!(config.chain.poll_interval_ms, 2000);
        assert_eq!(config.pinning.jwt.as_deref(), Some("abc"));
        assert_eq!(config.pinning.api_url, "https://api.pinata.cloud");
    }

    #[test]
    fn round_trips_through_toml() {
        let config = AppConfig::default();
        let text = toml::to_string_pretty(&config).unwrap();
        let back: AppConfig = toml::from_str(&text).unwrap();
        assert_eq!(back.chain.contract_address, config.chain.contract_address);
        assert_eq!(back.ui.timestamp_format, config.ui.timestamp_format);
    }
}
