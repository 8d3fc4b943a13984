// src/config.rs

//! Display configuration.
//!
//! The surface is sized once, at construction, from this configuration;
//! there is no resize path. The struct deserializes from JSON so hosts
//! can carry it in a config file, with sensible terminal-ish defaults for
//! anything missing.

use serde::{Deserialize, Serialize};

/// Dimensions of the pixel surface, in logical pixels.
///
/// Remember each pixel occupies two terminal character columns: a
/// standard 80x24 terminal fits a 40x24 surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub width: u16,
    pub height: u16,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig {
            width: 40,
            height: 24,
        }
    }
}

impl DisplayConfig {
    pub fn new(width: u16, height: u16) -> Self {
        DisplayConfig { width, height }
    }

    /// Parses a configuration from a JSON document.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn json_round_trip() {
        let config = DisplayConfig::new(32, 16);
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(DisplayConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let config = DisplayConfig::from_json("{\"width\": 10}").unwrap();
        assert_eq!(config.width, 10);
        assert_eq!(config.height, DisplayConfig::default().height);
        assert_eq!(DisplayConfig::from_json("{}").unwrap(), DisplayConfig::default());
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(DisplayConfig::from_json("{width: 10}").is_err());
    }
}
