use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Main configuration structure for Mood Music
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct MoodMusicConfig {
    /// Backend endpoints
    pub api: ApiConfig,
    /// Toast display settings
    pub notifications: NotificationConfig,
    /// Logging settings
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ApiConfig {
    /// Base URL of the mood-music backend
    pub base_url: String,
    /// Path of the image analysis endpoint
    pub analyze_path: String,
    /// Path of the recommendation endpoint
    pub recommend_path: String,
    /// Request timeout; unset means the transport default
    pub request_timeout_seconds: Option<u64>,
    /// User agent sent with every request
    pub user_agent: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct NotificationConfig {
    /// How long a toast stays visible
    pub display_seconds: u64,
    /// Maximum number of toasts visible at once
    pub limit: usize,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ObservabilityConfig {
    /// Log level (overridden by RUST_LOG)
    pub log_level: String,
    /// Emit JSON log lines instead of human-readable ones
    pub json_logs: bool,
}

impl ApiConfig {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_seconds.map(Duration::from_secs)
    }
}

impl Default for MoodMusicConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig {
                base_url: "http://127.0.0.1:8000".to_string(),
                analyze_path: "/analyze".to_string(),
                recommend_path: "/ai-recommend".to_string(),
                request_timeout_seconds: None,
                user_agent: concat!("mood-music/", env!("CARGO_PKG_VERSION")).to_string(),
            },
            notifications: NotificationConfig {
                display_seconds: 5,
                limit: 1,
            },
            observability: ObservabilityConfig {
                log_level: "info".to_string(),
                json_logs: false,
            },
        }
    }
}

impl MoodMusicConfig {
    /// Load configuration from multiple sources with precedence:
    /// 1. Default values
    /// 2. Configuration file (mood-music.toml, or `path` when given)
    /// 3. Environment variables (prefixed with MOOD_MUSIC__)
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder().add_source(
            Config::try_from(&MoodMusicConfig::default())
                .context("Failed to serialize default configuration")?,
        );

        match path {
            Some(path) => {
                builder = builder.add_source(File::from(path).required(true));
            }
            None => {
                if Path::new("mood-music.toml").exists() {
                    builder = builder.add_source(File::with_name("mood-music"));
                }
            }
        }

        builder = builder.add_source(
            Environment::with_prefix("MOOD_MUSIC")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().context("Failed to load configuration")?;
        let mood_music_config: MoodMusicConfig = config
            .try_deserialize()
            .context("Invalid configuration")?;

        Ok(mood_music_config)
    }

    /// Render configuration as TOML
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Load .env file if it exists
    pub fn load_env_file() -> Result<()> {
        if Path::new(".env").exists() {
            dotenvy::dotenv()?;
            tracing::info!("Loaded environment variables from .env file");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_point_at_backend_routes() {
        let config = MoodMusicConfig::default();
        assert_eq!(config.api.analyze_path, "/analyze");
        assert_eq!(config.api.recommend_path, "/ai-recommend");
        assert_eq!(config.api.request_timeout(), None);
        assert_eq!(config.notifications.limit, 1);
    }

    #[test]
    fn test_file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[api]\nbase_url = \"http://backend.test:9000\"\nrequest_timeout_seconds = 30\n\n[notifications]\nlimit = 3"
        )
        .unwrap();

        let config = MoodMusicConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.api.base_url, "http://backend.test:9000");
        assert_eq!(config.api.request_timeout(), Some(Duration::from_secs(30)));
        assert_eq!(config.notifications.limit, 3);
        // Untouched keys keep their defaults
        assert_eq!(config.api.analyze_path, "/analyze");
        assert_eq!(config.notifications.display_seconds, 5);
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let result = MoodMusicConfig::load(Some(Path::new("/nonexistent/mood-music.toml")));
        assert!(result.is_err());
    }

    #[test]
    fn test_toml_round_trip_preserves_values() {
        let config = MoodMusicConfig::default();
        let rendered = config.to_toml().unwrap();
        assert!(rendered.contains("base_url"));

        let parsed: MoodMusicConfig = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed, config);
    }
}
