//! Construction-time configuration shared by `RestAdapter` and `DiscuitClient`.

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

pub const DEFAULT_HOSTNAME: &str = "discuit.net/api";

/// Static settings fixed at construction.
///
/// `api_key` is kept but not sent with requests yet.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub hostname: String,
    pub api_key: SecretString,
    pub ssl_verify: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            hostname: DEFAULT_HOSTNAME.to_string(),
            api_key: SecretString::from(String::new()),
            ssl_verify: true,
        }
    }
}

impl ClientConfig {
    /// Defaults overridden by `DISCUIT_HOSTNAME`, `DISCUIT_API_KEY` and
    /// `DISCUIT_SSL_VERIFY` when set.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(hostname) = std::env::var("DISCUIT_HOSTNAME") {
            config.hostname = hostname;
        }
        if let Ok(key) = std::env::var("DISCUIT_API_KEY") {
            config.api_key = SecretString::from(key);
        }
        if let Ok(flag) = std::env::var("DISCUIT_SSL_VERIFY") {
            config.ssl_verify = parse_flag(&flag).unwrap_or(true);
        }
        config
    }

    pub fn hostname(mut self, hostname: impl Into<String>) -> Self {
        self.hostname = hostname.into();
        self
    }

    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = SecretString::from(key.into());
        self
    }

    pub fn ssl_verify(mut self, verify: bool) -> Self {
        self.ssl_verify = verify;
        self
    }

    pub fn has_api_key(&self) -> bool {
        !self.api_key.expose_secret().is_empty()
    }

    /// Base URL every endpoint is appended to, always ending in `/`.
    ///
    /// A hostname with an explicit `http://` or `https://` scheme keeps it;
    /// anything else is served over https.
    pub fn base_url(&self) -> String {
        let host = self.hostname.trim_end_matches('/');
        if host.starts_with("http://") || host.starts_with("https://") {
            format!("{host}/")
        } else {
            format!("https://{host}/")
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
