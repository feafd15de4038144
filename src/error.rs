//! Error types for streamscribe.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScribeError {
    // Configuration errors
    #[error("Failed to parse configuration: {message}")]
    ConfigParse { message: String },

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidConfig { key: String, message: String },

    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    // Audio source errors
    #[error("Failed to read audio: {message}")]
    AudioRead { message: String },

    #[error(
        "Unsupported audio format: {bits_per_sample}-bit {encoding} (expected 16- or 32-bit integer PCM)"
    )]
    UnsupportedFormat {
        bits_per_sample: u16,
        encoding: String,
    },

    // Connection errors
    #[error("Failed to connect to {url}: {message}")]
    Connection { url: String, message: String },

    #[error("Transport error: {message}")]
    Transport { message: String },

    // General I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl ScribeError {
    /// True for failures of the audio source itself (unreadable, truncated or
    /// unsupported), as opposed to connection or transport failures.
    pub fn is_source_error(&self) -> bool {
        matches!(
            self,
            ScribeError::Io(_)
                | ScribeError::AudioRead { .. }
                | ScribeError::UnsupportedFormat { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, ScribeError>;
