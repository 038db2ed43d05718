use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the marketplace module (`modules.marketplace`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MarketplaceConfig {
    /// Prefix of every persisted key (`<prefix>:user`, `<prefix>:jobs`, ...).
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
    #[serde(default)]
    pub latency: LatencyConfig,
    #[serde(default)]
    pub auth: AuthPolicy,
    /// Base URL logged by the mock backend; nothing is ever sent there.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// Text generation is disabled (falls back) without a key.
    #[serde(default)]
    pub text_api_key: Option<String>,
    /// Initial theme.
    #[serde(default)]
    pub prefer_dark: bool,
}

/// Artificial delays of the mocked network calls, in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LatencyConfig {
    #[serde(default = "default_login_ms")]
    pub login_ms: u64,
    #[serde(default = "default_call_ms")]
    pub profile_ms: u64,
    #[serde(default = "default_call_ms")]
    pub post_job_ms: u64,
    #[serde(default = "default_generation_ms")]
    pub generation_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuthPolicy {
    #[serde(default = "default_min_password_len")]
    pub min_password_len: usize,
    /// Let any well-formed email log in without a backend.
    #[serde(default)]
    pub accept_any_login: bool,
}

impl Default for MarketplaceConfig {
    fn default() -> Self {
        Self {
            key_prefix: default_key_prefix(),
            latency: LatencyConfig::default(),
            auth: AuthPolicy::default(),
            api_base_url: default_api_base_url(),
            text_api_key: None,
            prefer_dark: false,
        }
    }
}

impl Default for LatencyConfig {
    fn default() -> Self {
        Self {
            login_ms: default_login_ms(),
            profile_ms: default_call_ms(),
            post_job_ms: default_call_ms(),
            generation_ms: default_generation_ms(),
        }
    }
}

impl LatencyConfig {
    /// All delays zero; used by tests and the `--mock` host mode.
    pub fn instant() -> Self {
        Self {
            login_ms: 0,
            profile_ms: 0,
            post_job_ms: 0,
            generation_ms: 0,
        }
    }

    pub fn login(&self) -> Duration {
        Duration::from_millis(self.login_ms)
    }

    pub fn profile(&self) -> Duration {
        Duration::from_millis(self.profile_ms)
    }

    pub fn post_job(&self) -> Duration {
        Duration::from_millis(self.post_job_ms)
    }

    pub fn generation(&self) -> Duration {
        Duration::from_millis(self.generation_ms)
    }
}

impl Default for AuthPolicy {
    fn default() -> Self {
        Self {
            min_password_len: default_min_password_len(),
            accept_any_login: false,
        }
    }
}

fn default_key_prefix() -> String {
    "ptj".to_string()
}

fn default_api_base_url() -> String {
    "http://localhost:3001".to_string()
}

fn default_login_ms() -> u64 {
    1200
}

fn default_call_ms() -> u64 {
    800
}

fn default_generation_ms() -> u64 {
    1000
}

fn default_min_password_len() -> usize {
    6
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_prototype_timings() {
        let config = MarketplaceConfig::default();
        assert_eq!(config.key_prefix, "ptj");
        assert_eq!(config.latency.login(), Duration::from_millis(1200));
        assert_eq!(config.latency.post_job(), Duration::from_millis(800));
        assert_eq!(config.auth.min_password_len, 6);
        assert!(!config.auth.accept_any_login);
        assert!(config.text_api_key.is_none());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: MarketplaceConfig = serde_json::from_str(
            r#"{"key_prefix": "demo", "latency": {"login_ms": 5}, "auth": {"accept_any_login": true}}"#,
        )
        .unwrap();

        assert_eq!(config.key_prefix, "demo");
        assert_eq!(config.latency.login_ms, 5);
        assert_eq!(config.latency.profile_ms, 800);
        assert!(config.auth.accept_any_login);
        assert_eq!(config.auth.min_password_len, 6);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let result: Result<MarketplaceConfig, _> = serde_json::from_str(r#"{"port": 1}"#);
        assert!(result.is_err());
    }
}
