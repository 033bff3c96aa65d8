//! On-disk configuration for the assistant

use anyhow::{Context, Result};
use assistant_services::WeatherSettings;
use command_dispatch::{DispatcherConfig, FeatureFlags, SessionConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Environment variable that overrides `weather.api_key`
pub const WEATHER_KEY_ENV: &str = "OPENWEATHERMAP_API_KEY";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemSettings {
    pub safety_timeout_secs: u64,
    pub shutdown_delay_secs: u64,
    pub max_timer_duration_secs: u64,
    pub default_url: String,
}

impl Default for SystemSettings {
    fn default() -> Self {
        Self {
            safety_timeout_secs: 30,
            shutdown_delay_secs: 5,
            max_timer_duration_secs: 3600,
            default_url: "https://www.google.com".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechSettings {
    /// Words per minute
    pub tts_rate: u32,
    /// 0.0 to 1.0
    pub tts_volume: f32,
}

impl Default for SpeechSettings {
    fn default() -> Self {
        Self {
            tts_rate: 150,
            tts_volume: 0.9,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantConfig {
    pub wake_word: String,
    pub require_wake_word: bool,
    pub weather: WeatherSettings,
    pub system: SystemSettings,
    pub speech: SpeechSettings,
    pub features: FeatureFlags,
    pub log_level: String,
    pub cancel_confirms: bool,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            wake_word: "jarvis".to_string(),
            require_wake_word: false,
            weather: WeatherSettings::default(),
            system: SystemSettings::default(),
            speech: SpeechSettings::default(),
            features: FeatureFlags::default(),
            log_level: "info".to_string(),
            cancel_confirms: true,
        }
    }
}

impl AssistantConfig {
    /// Read the config at `path`, writing the defaults there first if the
    /// file does not exist yet.
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("parsing config {}", path.display()))
        } else {
            let config = Self::default();
            config.save(path)?;
            Ok(config)
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).with_context(|| format!("writing config {}", path.display()))?;
        Ok(())
    }

    pub fn apply_env(&mut self) {
        self.apply_env_with(|name| std::env::var(name).ok());
    }

    /// Apply overrides from `lookup`. Blank values are ignored.
    pub fn apply_env_with(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(key) = lookup(WEATHER_KEY_ENV).filter(|k| !k.trim().is_empty()) {
            self.weather.api_key = Some(key);
        }
    }

    pub fn dispatcher_config(&self) -> DispatcherConfig {
        DispatcherConfig {
            default_url: self.system.default_url.clone(),
            shutdown_delay_secs: self.system.shutdown_delay_secs,
            cancel_confirms: self.cancel_confirms,
            features: self.features.clone(),
        }
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            wake_word: self.wake_word.clone(),
            require_wake_word: self.require_wake_word,
            safety_timeout: Duration::from_secs(self.system.safety_timeout_secs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_created_with_defaults() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("jarvis.json");

        let config = AssistantConfig::load(&path)?;
        assert!(path.exists());
        assert_eq!(config.wake_word, "jarvis");
        assert_eq!(config.system.safety_timeout_secs, 30);
        assert_eq!(config.system.max_timer_duration_secs, 3600);
        assert_eq!(config.speech.tts_rate, 150);
        assert!(config.cancel_confirms);
        assert!(config.features.timer);
        Ok(())
    }

    #[test]
    fn saved_config_loads_back() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("jarvis.json");

        let mut config = AssistantConfig::default();
        config.wake_word = "friday".into();
        config.system.shutdown_delay_secs = 10;
        config.features.weather = false;
        config.save(&path)?;

        let loaded = AssistantConfig::load(&path)?;
        assert_eq!(loaded.wake_word, "friday");
        assert_eq!(loaded.system.shutdown_delay_secs, 10);
        assert!(!loaded.features.weather);
        Ok(())
    }

    #[test]
    fn partial_file_keeps_defaults() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("jarvis.json");
        fs::write(&path, r#"{"require_wake_word": true, "system": {"shutdown_delay_secs": 2}}"#)?;

        let config = AssistantConfig::load(&path)?;
        assert!(config.require_wake_word);
        assert_eq!(config.system.shutdown_delay_secs, 2);
        assert_eq!(config.system.safety_timeout_secs, 30);
        assert_eq!(config.weather.units, "metric");
        assert_eq!(config.log_level, "info");
        Ok(())
    }

    #[test]
    fn malformed_file_is_an_error() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("jarvis.json");
        fs::write(&path, "{ not json")?;
        assert!(AssistantConfig::load(&path).is_err());
        Ok(())
    }

    #[test]
    fn env_overrides_weather_key() {
        let mut config = AssistantConfig::default();
        config.apply_env_with(|name| (name == WEATHER_KEY_ENV).then(|| "from-env".to_string()));
        assert_eq!(config.weather.api_key.as_deref(), Some("from-env"));

        config.apply_env_with(|_| Some("   ".to_string()));
        assert_eq!(config.weather.api_key.as_deref(), Some("from-env"));
    }

    #[test]
    fn derived_configs() {
        let mut config = AssistantConfig::default();
        config.system.safety_timeout_secs = 45;
        config.cancel_confirms = false;

        let session = config.session_config();
        assert_eq!(session.safety_timeout, Duration::from_secs(45));
        assert_eq!(session.wake_word, "jarvis");

        let dispatch = config.dispatcher_config();
        assert!(!dispatch.cancel_confirms);
        assert_eq!(dispatch.shutdown_delay_secs, 5);
    }
}
