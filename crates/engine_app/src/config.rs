//! World configuration.

use serde::{Deserialize, Serialize};

/// Environment variable that overrides [`WorldConfig::auto_register`].
pub const AUTO_REGISTER_ENV: &str = "ENGINE_AUTO_REGISTER";

/// Errors produced while reading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value '{value}' for {var}: expected true/false, 1/0, yes/no or on/off")]
    InvalidBool { var: &'static str, value: String },
}

/// Configuration for a [`World`](crate::World).
///
/// Missing fields take their default when deserialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Register component types the first time a builder uses them.
    pub auto_register: bool,
    /// Substrings an artifact name may not contain. The defaults are the
    /// scope separators used for path lookup.
    pub reserved_separators: Vec<String>,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            auto_register: true,
            reserved_separators: vec!["::".to_string(), ".".to_string(), "/".to_string()],
        }
    }
}

impl WorldConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set [`auto_register`](Self::auto_register).
    #[must_use]
    pub fn with_auto_register(mut self, enabled: bool) -> Self {
        self.auto_register = enabled;
        self
    }

    /// Replace the reserved separators.
    #[must_use]
    pub fn with_reserved_separators<I, S>(mut self, separators: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.reserved_separators = separators.into_iter().map(Into::into).collect();
        self
    }

    /// Defaults, overridden by `ENGINE_AUTO_REGISTER` when it is set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBool`] if the variable holds something
    /// other than a boolean.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Ok(value) = std::env::var(AUTO_REGISTER_ENV) {
            config.auto_register = parse_bool(AUTO_REGISTER_ENV, &value)?;
        }
        Ok(config)
    }
}

fn parse_bool(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidBool {
            var,
            value: value.to_string(),
        }),
    }
}
