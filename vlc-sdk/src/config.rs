//! Configuration for media players
//!
//! Controls the option list handed to the native engine context and how a
//! player behaves on teardown.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SdkError};

/// Environment variable holding whitespace-separated engine options
pub const OPTIONS_ENV: &str = "VLC_SDK_OPTIONS";

/// Configuration for a [`MediaPlayer`](crate::MediaPlayer)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Options forwarded verbatim, in order, to the engine context initializer
    /// Default: `["--extraintf=logger", "--verbose=2"]` in debug builds,
    /// `["--quiet"]` in release builds
    pub options: Vec<String>,

    /// Stop playback during dispose if the player is still playing
    /// Default: true
    pub stop_on_dispose: bool,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        if cfg!(debug_assertions) {
            Self::verbose()
        } else {
            Self::quiet()
        }
    }
}

impl PlayerConfig {
    /// Create a new PlayerConfig with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Suppress engine output
    pub fn quiet() -> Self {
        Self {
            options: vec!["--quiet".to_string()],
            stop_on_dispose: true,
        }
    }

    /// Route engine messages through its logger interface at verbosity 2
    pub fn verbose() -> Self {
        Self {
            options: vec!["--extraintf=logger".to_string(), "--verbose=2".to_string()],
            stop_on_dispose: true,
        }
    }

    /// No options at all
    pub fn bare() -> Self {
        Self {
            options: Vec::new(),
            stop_on_dispose: true,
        }
    }

    /// Append one option
    pub fn with_option(mut self, option: impl Into<String>) -> Self {
        self.options.push(option.into());
        self
    }

    /// Append several options, keeping their order
    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options.extend(options.into_iter().map(Into::into));
        self
    }

    /// Set whether dispose stops a playing player
    pub fn with_stop_on_dispose(mut self, stop: bool) -> Self {
        self.stop_on_dispose = stop;
        self
    }

    /// Parse a JSON configuration; missing fields take their defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| SdkError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read options from `VLC_SDK_OPTIONS`, falling back to the defaults
    pub fn from_env() -> Self {
        match std::env::var(OPTIONS_ENV) {
            Ok(value) => Self::from_options_str(&value),
            Err(_) => Self::default(),
        }
    }

    /// Build a config from a whitespace-separated option string
    pub fn from_options_str(value: &str) -> Self {
        Self::bare().with_options(value.split_whitespace())
    }

    /// Check the configuration before it reaches the native layer
    pub fn validate(&self) -> Result<()> {
        if let Some(index) = self.options.iter().position(|o| o.trim().is_empty()) {
            return Err(SdkError::Config(format!("option {} is empty", index)));
        }
        Ok(())
    }
}
