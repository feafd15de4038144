use crate::defaults;
use crate::error::{Result, ScribeError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub stream: StreamConfig,
}

/// Transcription server connection settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    pub url: String,
    pub connect_timeout_secs: u64,
}

/// Framing, pacing and result-wait settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StreamConfig {
    pub frame_samples: usize,
    pub frame_delay_ms: u64,
    pub result_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            url: defaults::SERVER_URL.to_string(),
            connect_timeout_secs: defaults::CONNECT_TIMEOUT_SECS,
        }
    }
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            frame_samples: defaults::FRAME_SAMPLES,
            frame_delay_ms: defaults::FRAME_DELAY_MS,
            result_timeout_secs: defaults::RESULT_TIMEOUT_SECS,
        }
    }
}

impl ServerConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

impl StreamConfig {
    pub fn frame_delay(&self) -> Duration {
        Duration::from_millis(self.frame_delay_ms)
    }

    pub fn result_timeout(&self) -> Duration {
        Duration::from_secs(self.result_timeout_secs)
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Missing fields use default values.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from a file, or return defaults if the file doesn't exist
    ///
    /// Invalid TOML is still an error.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        match Self::load(path) {
            Ok(config) => Ok(config),
            Err(ScribeError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                Ok(Self::default())
            }
            Err(e) => Err(ScribeError::ConfigParse {
                message: format!("{}: {}", path.display(), e),
            }),
        }
    }

    /// Apply environment variable overrides
    ///
    /// Supported environment variables:
    /// - STREAMSCRIBE_URL → server.url
    /// - STREAMSCRIBE_FRAME_DELAY_MS → stream.frame_delay_ms
    /// - STREAMSCRIBE_RESULT_TIMEOUT_SECS → stream.result_timeout_secs
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var("STREAMSCRIBE_URL")
            && !url.is_empty()
        {
            self.server.url = url;
        }

        if let Ok(delay) = std::env::var("STREAMSCRIBE_FRAME_DELAY_MS")
            && let Ok(delay) = delay.trim().parse()
        {
            self.stream.frame_delay_ms = delay;
        }

        if let Ok(timeout) = std::env::var("STREAMSCRIBE_RESULT_TIMEOUT_SECS")
            && let Ok(timeout) = timeout.trim().parse()
        {
            self.stream.result_timeout_secs = timeout;
        }

        self
    }

    /// Reject values the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.stream.frame_samples == 0 {
            return Err(ScribeError::InvalidConfig {
                key: "stream.frame_samples".to_string(),
                message: "must be positive".to_string(),
            });
        }

        if !(self.server.url.starts_with("ws://") || self.server.url.starts_with("wss://")) {
            return Err(ScribeError::InvalidConfig {
                key: "server.url".to_string(),
                message: format!("expected a ws:// or wss:// URL, got '{}'", self.server.url),
            });
        }

        Ok(())
    }

    /// Get the default configuration file path
    ///
    /// Returns ~/.config/streamscribe/config.toml on Linux
    pub fn default_path() -> Result<PathBuf> {
        let dir = dirs::config_dir().ok_or_else(|| {
            ScribeError::Other("Could not determine config directory".to_string())
        })?;
        Ok(dir.join("streamscribe").join("config.toml"))
    }

    /// Render the configuration as TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| ScribeError::ConfigParse {
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Mutex;
    use tempfile::NamedTempFile;

    // Mutex to serialize tests that modify environment variables
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    // SAFETY: These helpers are only used in tests with ENV_LOCK held,
    // ensuring no concurrent access to environment variables.
    fn set_env(key: &str, value: &str) {
        unsafe { std::env::set_var(key, value) }
    }

    fn remove_env(key: &str) {
        unsafe { std::env::remove_var(key) }
    }

    fn clear_streamscribe_env() {
        remove_env("STREAMSCRIBE_URL");
        remove_env("STREAMSCRIBE_FRAME_DELAY_MS");
        remove_env("STREAMSCRIBE_RESULT_TIMEOUT_SECS");
    }

    #[test]
    fn test_default_config_has_correct_values() {
        let config = Config::default();

        assert_eq!(config.server.url, "ws://127.0.0.1:9000");
        assert_eq!(config.server.connect_timeout_secs, 10);

        assert_eq!(config.stream.frame_samples, 16000);
        assert_eq!(config.stream.frame_delay_ms, 100);
        assert_eq!(config.stream.result_timeout_secs, 30);
        assert_eq!(config.stream.result_timeout(), Duration::from_secs(30));
        assert_eq!(config.stream.frame_delay(), Duration::from_millis(100));
    }

    #[test]
    fn test_load_from_toml_file() {
        let toml_content = r#"
            [server]
            url = "ws://10.0.0.5:9100"
            connect_timeout_secs = 3

            [stream]
            frame_samples = 8000
            frame_delay_ms = 0
            result_timeout_secs = 5
        "#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = Config::load(temp_file.path()).unwrap();

        assert_eq!(config.server.url, "ws://10.0.0.5:9100");
        assert_eq!(config.server.connect_timeout(), Duration::from_secs(3));
        assert_eq!(config.stream.frame_samples, 8000);
        assert_eq!(config.stream.frame_delay_ms, 0);
        assert_eq!(config.stream.result_timeout_secs, 5);
    }

    #[test]
    fn test_load_partial_config_uses_defaults() {
        let toml_content = r#"
            [stream]
            frame_delay_ms = 250
        "#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = Config::load(temp_file.path()).unwrap();

        assert_eq!(config.stream.frame_delay_ms, 250);
        assert_eq!(config.stream.frame_samples, 16000);
        assert_eq!(config.server, ServerConfig::default());
    }

    #[test]
    fn test_invalid_toml_returns_error() {
        let invalid_toml = r#"
            [server
            url = "broken
        "#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(invalid_toml.as_bytes()).unwrap();

        assert!(Config::load(temp_file.path()).is_err());
        assert!(matches!(
            Config::load_or_default(temp_file.path()),
            Err(ScribeError::ConfigParse { .. })
        ));
    }

    #[test]
    fn test_load_or_default_returns_default_for_missing_file() {
        let missing_path = Path::new("/tmp/nonexistent_streamscribe_config_12345.toml");
        let config = Config::load_or_default(missing_path).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_env_override_url() {
        let _lock = ENV_LOCK.lock().unwrap();
        clear_streamscribe_env();

        set_env("STREAMSCRIBE_URL", "ws://example.org:9000");
        let config = Config::default().with_env_overrides();

        assert_eq!(config.server.url, "ws://example.org:9000");
        assert_eq!(config.stream, StreamConfig::default());

        clear_streamscribe_env();
    }

    #[test]
    fn test_env_override_numeric_values() {
        let _lock = ENV_LOCK.lock().unwrap();
        clear_streamscribe_env();

        set_env("STREAMSCRIBE_FRAME_DELAY_MS", "0");
        set_env("STREAMSCRIBE_RESULT_TIMEOUT_SECS", " 5 ");
        let config = Config::default().with_env_overrides();

        assert_eq!(config.stream.frame_delay_ms, 0);
        assert_eq!(config.stream.result_timeout_secs, 5);

        clear_streamscribe_env();
    }

    #[test]
    fn test_env_override_empty_or_garbage_ignored() {
        let _lock = ENV_LOCK.lock().unwrap();
        clear_streamscribe_env();

        set_env("STREAMSCRIBE_URL", "");
        set_env("STREAMSCRIBE_FRAME_DELAY_MS", "fast");
        let config = Config::default().with_env_overrides();

        assert_eq!(config, Config::default());

        clear_streamscribe_env();
    }

    #[test]
    fn test_validate_rejects_zero_frame_samples() {
        let mut config = Config::default();
        config.stream.frame_samples = 0;

        match config.validate() {
            Err(ScribeError::InvalidConfig { key, .. }) => {
                assert_eq!(key, "stream.frame_samples");
            }
            other => panic!("Expected InvalidConfig, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_rejects_http_url() {
        let mut config = Config::default();
        config.server.url = "http://127.0.0.1:9000".to_string();
        assert!(config.validate().is_err());

        config.server.url = "wss://speech.example.org".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_path_ends_with_config_toml() {
        if let Ok(path) = Config::default_path() {
            let path_str = path.to_string_lossy();
            assert!(path_str.contains("streamscribe"));
            assert!(path_str.ends_with("config.toml"));
        }
    }

    #[test]
    fn test_to_toml_reloads_identically() {
        let mut config = Config::default();
        config.stream.frame_delay_ms = 0;

        let rendered = config.to_toml().unwrap();
        let parsed: Config = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed, config);
    }
}
