//! Configuration - credentials and endpoint settings
//!
//! The client itself only needs [`Credentials`](crate::gateway_api::Credentials);
//! this module loads them (plus IPN settings) from a TOML file or the
//! environment.

use serde::Deserialize;
use std::path::Path;

use crate::core::{Error, Result};

/// Default gateway endpoint.
pub const DEFAULT_API_URL: &str = "https://www.coinpayments.net/api.php";

/// Default `ipn_mode` expected in notifications.
pub const DEFAULT_IPN_MODE: &str = "hmac";

const ENV_PUBLIC_KEY: &str = "COINPAYMENTS_PUBLIC_KEY";
const ENV_PRIVATE_KEY: &str = "COINPAYMENTS_PRIVATE_KEY";
const ENV_IPN_URL: &str = "COINPAYMENTS_IPN_URL";
const ENV_API_URL: &str = "COINPAYMENTS_API_URL";
const ENV_TIMEOUT_SECS: &str = "COINPAYMENTS_TIMEOUT_SECS";

/// Top-level config file structure.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub gateway: GatewayConfig,

    /// IPN verification settings (only needed by webhook handlers)
    #[serde(default)]
    pub ipn: Option<IpnConfig>,
}

#[derive(Clone, Deserialize)]
pub struct GatewayConfig {
    /// Public API key, sent as `key`
    pub public_key: String,

    /// Private API key, used only as the HMAC secret
    pub private_key: String,

    /// Callback URL injected into create_transaction / get_callback_address
    #[serde(default)]
    pub ipn_url: Option<String>,

    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Request timeout; none by default
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

#[derive(Clone, Deserialize)]
pub struct IpnConfig {
    pub merchant_id: String,

    /// IPN secret set in the merchant account settings
    pub secret: String,

    #[serde(default = "default_ipn_mode")]
    pub ipn_mode: String,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_ipn_mode() -> String {
    DEFAULT_IPN_MODE.to_string()
}

impl std::fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("public_key", &self.public_key)
            .field("private_key", &"<redacted>")
            .field("ipn_url", &self.ipn_url)
            .field("api_url", &self.api_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl std::fmt::Debug for IpnConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IpnConfig")
            .field("merchant_id", &self.merchant_id)
            .field("secret", &"<redacted>")
            .field("ipn_mode", &self.ipn_mode)
            .finish()
    }
}

impl Config {
    /// Load from TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read config {}: {}", path.display(), e)))?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))?;
        config.gateway.validate()?;
        Ok(config)
    }
}

impl GatewayConfig {
    pub fn new(public_key: impl Into<String>, private_key: impl Into<String>) -> Self {
        Self {
            public_key: public_key.into(),
            private_key: private_key.into(),
            ipn_url: None,
            api_url: default_api_url(),
            timeout_secs: None,
        }
    }

    /// Load from `COINPAYMENTS_*` environment variables (after reading `.env`).
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let required = |name: &str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| Error::Config(format!("{} is not set", name)))
        };

        let timeout_secs = match lookup(ENV_TIMEOUT_SECS) {
            Some(raw) => Some(raw.trim().parse::<u64>().map_err(|e| {
                Error::Config(format!("{} must be a whole number of seconds: {}", ENV_TIMEOUT_SECS, e))
            })?),
            None => None,
        };

        let config = Self {
            public_key: required(ENV_PUBLIC_KEY)?,
            private_key: required(ENV_PRIVATE_KEY)?,
            ipn_url: lookup(ENV_IPN_URL),
            api_url: lookup(ENV_API_URL).unwrap_or_else(default_api_url),
            timeout_secs,
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.public_key.is_empty() || self.private_key.is_empty() {
            return Err(Error::Config("public_key and private_key must not be empty".to_string()));
        }
        if self.api_url.is_empty() {
            return Err(Error::Config("api_url must not be empty".to_string()));
        }
        Ok(())
    }

    /// Configured callback URL, treating an empty string as unset.
    pub fn ipn_url(&self) -> Option<&str> {
        self.ipn_url.as_deref().filter(|url| !url.is_empty())
    }
}
