//! Engine configuration.
//!
//! # Responsibility
//! - Hold the few rendering/parsing knobs the outline document needs.
//! - Load configuration from JSON and reject out-of-range values.
//!
//! # Invariants
//! - A config returned by `from_json_str` has passed `validate()`.

use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

const DEFAULT_CHECKED_MARKER: char = 'X';
const DEFAULT_BULLET: &str = "-";
const DEFAULT_TAB_WIDTH: usize = 8;
const MAX_TAB_WIDTH: usize = 16;
const SUPPORTED_BULLETS: &[&str] = &["-", "+", "*"];

/// Configuration errors.
#[derive(Debug)]
pub enum ConfigError {
    /// Checked marker must be `X` or `x`.
    InvalidCheckedMarker(char),
    /// Bullet is not one of `-`, `+`, `*`.
    InvalidBullet(String),
    /// Tab width outside `1..=16`.
    InvalidTabWidth(usize),
    /// JSON source could not be decoded.
    Parse(serde_json::Error),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidCheckedMarker(value) => {
                write!(f, "checked_marker must be `X` or `x`, got `{value}`")
            }
            Self::InvalidBullet(value) => {
                write!(f, "bullet must be one of `-`, `+`, `*`, got `{value}`")
            }
            Self::InvalidTabWidth(value) => {
                write!(f, "tab_width must be within 1..={MAX_TAB_WIDTH}, got {value}")
            }
            Self::Parse(err) => write!(f, "invalid config json: {err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

/// Knobs shared by the outline document and the engine.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Character written between brackets for checked boxes.
    pub checked_marker: char,
    /// Bullet used when inserting a new checkbox line.
    pub bullet: String,
    /// Column width of a tab when measuring indentation.
    pub tab_width: usize,
    /// Rewrite `[p%]` cookies along with `[m/n]` cookies.
    pub update_percent_cookies: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            checked_marker: DEFAULT_CHECKED_MARKER,
            bullet: DEFAULT_BULLET.to_string(),
            tab_width: DEFAULT_TAB_WIDTH,
            update_percent_cookies: true,
        }
    }
}

impl EngineConfig {
    /// Parses a JSON object; missing fields fall back to defaults.
    pub fn from_json_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !matches!(self.checked_marker, 'X' | 'x') {
            return Err(ConfigError::InvalidCheckedMarker(self.checked_marker));
        }
        if !SUPPORTED_BULLETS.contains(&self.bullet.as_str()) {
            return Err(ConfigError::InvalidBullet(self.bullet.clone()));
        }
        if self.tab_width == 0 || self.tab_width > MAX_TAB_WIDTH {
            return Err(ConfigError::InvalidTabWidth(self.tab_width));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, EngineConfig};

    #[test]
    fn defaults_are_valid() {
        let config = EngineConfig::default();
        config.validate().expect("defaults should validate");
        assert_eq!(config.checked_marker, 'X');
        assert_eq!(config.bullet, "-");
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config =
            EngineConfig::from_json_str(r#"{"bullet": "+"}"#).expect("partial config parses");
        assert_eq!(config.bullet, "+");
        assert_eq!(config.tab_width, 8);
        assert!(config.update_percent_cookies);
    }

    #[test]
    fn rejects_out_of_range_values() {
        let err = EngineConfig::from_json_str(r#"{"tab_width": 0}"#)
            .expect_err("zero tab width must fail");
        assert!(matches!(err, ConfigError::InvalidTabWidth(0)));

        let err = EngineConfig::from_json_str(r#"{"checked_marker": "v"}"#)
            .expect_err("unknown marker must fail");
        assert!(matches!(err, ConfigError::InvalidCheckedMarker('v')));

        let err = EngineConfig::from_json_str(r#"{"bullet": "1."}"#)
            .expect_err("ordered bullet must fail");
        assert!(matches!(err, ConfigError::InvalidBullet(_)));
    }

    #[test]
    fn rejects_unknown_fields_and_bad_json() {
        let err = EngineConfig::from_json_str(r#"{"colour": "red"}"#)
            .expect_err("unknown field must fail");
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().contains("invalid config json"));
    }
}
