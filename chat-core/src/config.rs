use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

/// Default bound for every outbound provider call.
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;

/// Client address that skips live geolocation during local development.
pub const DEFAULT_BYPASS_ADDRESS: &str = "127.0.0.1";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderId {
    OpenWeather,
    OpenAi,
}

impl ProviderId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::OpenWeather => "openweather",
            ProviderId::OpenAi => "openai",
        }
    }

    pub const fn all() -> &'static [ProviderId] {
        &[ProviderId::OpenWeather, ProviderId::OpenAi]
    }

    /// Environment variable that overrides this provider's API key.
    pub fn env_var(&self) -> &'static str {
        match self {
            ProviderId::OpenWeather => "OPENWEATHER_API_KEY",
            ProviderId::OpenAi => "OPENAI_API_KEY",
        }
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ProviderId {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        match lower.as_str() {
            "openweather" => Ok(ProviderId::OpenWeather),
            "openai" => Ok(ProviderId::OpenAi),
            _ => Err(anyhow!(
                "Unknown provider '{value}'. Supported providers: openweather, openai."
            )),
        }
    }
}

/// Configuration for a single provider (e.g., API key).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub api_key: String,
}

/// Whether completions come from the live provider or a fixed placeholder.
///
/// Mock mode is a deployment/testing stance: it answers with a canned reply and
/// logs the prompt, so the rest of the pipeline can be exercised without
/// completion credentials.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompletionMode {
    #[default]
    Live,
    Mock,
}

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Live vs. mock completion provider.
    #[serde(default)]
    pub completion_mode: CompletionMode,

    /// Per-call timeout for outbound requests, in seconds. Defaults to 5.
    pub timeout_secs: Option<u64>,

    /// Client address that resolves to the fixed development location without
    /// a geolocation call. Defaults to 127.0.0.1.
    pub bypass_address: Option<String>,

    /// Example TOML:
    /// [providers.openweather]
    /// api_key = "..."
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
}

impl Config {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }

    pub fn bypass_address(&self) -> &str {
        self.bypass_address.as_deref().unwrap_or(DEFAULT_BYPASS_ADDRESS)
    }

    /// Load config from the platform config dir, or return an empty default
    /// if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    /// Load config from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to the platform config dir.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    /// Save config to an explicit path, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-chat", "chat-server")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Convenience helper: set/replace a provider API key.
    pub fn upsert_provider_api_key(&mut self, provider_id: ProviderId, api_key: String) {
        self.providers.insert(provider_id.as_str().to_string(), ProviderConfig { api_key });
    }

    /// Returns API key for a provider, if present.
    pub fn provider_api_key(&self, provider_id: ProviderId) -> Option<&str> {
        self.providers.get(provider_id.as_str()).map(|cfg| cfg.api_key.as_str())
    }

    pub fn is_provider_configured(&self, provider_id: ProviderId) -> bool {
        self.provider_api_key(provider_id).is_some()
    }

    /// Let environment variables win over file-stored keys.
    ///
    /// `OPENWEATHER_API_KEY` and `OPENAI_API_KEY` replace whatever the config
    /// file holds for the matching provider.
    pub fn apply_env_overrides(&mut self) {
        for id in ProviderId::all() {
            if let Ok(key) = std::env::var(id.env_var()) {
                if !key.is_empty() {
                    self.upsert_provider_api_key(*id, key);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_defaults_to_five_seconds() {
        let cfg = Config::default();
        assert_eq!(cfg.timeout(), Duration::from_secs(5));

        let cfg = Config { timeout_secs: Some(2), ..Config::default() };
        assert_eq!(cfg.timeout(), Duration::from_secs(2));
    }

    #[test]
    fn bypass_address_defaults_to_loopback() {
        let cfg = Config::default();
        assert_eq!(cfg.bypass_address(), "127.0.0.1");

        let cfg = Config { bypass_address: Some("10.0.0.7".into()), ..Config::default() };
        assert_eq!(cfg.bypass_address(), "10.0.0.7");
    }

    #[test]
    fn completion_mode_defaults_to_live() {
        let cfg = Config::default();
        assert_eq!(cfg.completion_mode, CompletionMode::Live);
    }

    #[test]
    fn completion_mode_parses_from_toml() {
        let cfg: Config = toml::from_str("completion_mode = \"mock\"").expect("valid toml");
        assert_eq!(cfg.completion_mode, CompletionMode::Mock);
    }

    #[test]
    fn provider_id_as_str_roundtrip() {
        for id in ProviderId::all() {
            let s = id.as_str();
            let parsed = ProviderId::try_from(s).expect("roundtrip should succeed");
            assert_eq!(*id, parsed);
        }
    }

    #[test]
    fn unknown_provider_error() {
        let err = ProviderId::try_from("doesnotexist").unwrap_err();
        assert!(err.to_string().contains("Unknown provider"));
    }

    #[test]
    fn save_and_load_round_trip() {
        let path = std::env::temp_dir()
            .join(format!("weather-chat-config-test-{}", std::process::id()))
            .join("config.toml");

        let mut cfg = Config::default();
        cfg.upsert_provider_api_key(ProviderId::OpenWeather, "OPEN_KEY".into());
        cfg.completion_mode = CompletionMode::Mock;
        cfg.timeout_secs = Some(2);

        cfg.save_to(&path).expect("save should succeed");
        let loaded = Config::load_from(&path).expect("load should succeed");

        assert_eq!(loaded.provider_api_key(ProviderId::OpenWeather), Some("OPEN_KEY"));
        assert_eq!(loaded.completion_mode, CompletionMode::Mock);
        assert_eq!(loaded.timeout(), Duration::from_secs(2));

        fs::remove_file(&path).ok();
    }

    #[test]
    fn load_from_missing_file_returns_default() {
        let path = std::env::temp_dir().join("weather-chat-config-does-not-exist.toml");
        let cfg = Config::load_from(&path).expect("missing file is not an error");
        assert!(cfg.providers.is_empty());
        assert_eq!(cfg.completion_mode, CompletionMode::Live);
    }

    #[test]
    fn set_api_key_for_provider() {
        let mut cfg = Config::default();

        cfg.upsert_provider_api_key(ProviderId::OpenWeather, "OPEN_KEY".into());

        let key = cfg.provider_api_key(ProviderId::OpenWeather);
        assert_eq!(key, Some("OPEN_KEY"));
        assert!(cfg.is_provider_configured(ProviderId::OpenWeather));
        assert!(!cfg.is_provider_configured(ProviderId::OpenAi));
    }
}
