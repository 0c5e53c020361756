//! Compressor configuration.

use crate::area::Area;
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Patterns shorter than this never become rules.
pub const MIN_PATTERN_LENGTH: usize = 2;

/// Settings of an [`AreaComp`](crate::AreaComp) run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AreaCompConfig {
    /// Scoring strategy for candidate patterns.
    pub area: Area,
    /// Smallest l-value of an LCP-interval that is considered at all.
    pub min_l_value: usize,
}

impl Default for AreaCompConfig {
    fn default() -> Self {
        Self {
            area: Area::default(),
            min_l_value: MIN_PATTERN_LENGTH,
        }
    }
}

impl AreaCompConfig {
    pub fn new(area: Area) -> Self {
        Self {
            area,
            ..Self::default()
        }
    }

    /// Parses a configuration such as `{"area": "width-first"}`.
    /// Missing fields take their default value.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// The configured minimum l-value, never below [`MIN_PATTERN_LENGTH`].
    pub fn effective_min_l_value(&self) -> usize {
        self.min_l_value.max(MIN_PATTERN_LENGTH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AreaCompConfig::default();
        assert_eq!(config.area, Area::LengthFirst);
        assert_eq!(config.min_l_value, 2);
    }

    #[test]
    fn test_from_json_partial() {
        let config = AreaCompConfig::from_json(r#"{"area": "potential-compression"}"#).unwrap();
        assert_eq!(config.area, Area::PotentialCompression);
        assert_eq!(config.min_l_value, 2);

        let config = AreaCompConfig::from_json("{}").unwrap();
        assert_eq!(config, AreaCompConfig::default());
    }

    #[test]
    fn test_from_json_rejects_unknown() {
        assert!(AreaCompConfig::from_json(r#"{"area": "fastest"}"#).is_err());
        let err = AreaCompConfig::from_json(r#"{"depth": 3}"#).unwrap_err();
        assert!(err.to_string().starts_with("invalid configuration"));
    }

    #[test]
    fn test_min_l_value_clamped() {
        let config = AreaCompConfig {
            area: Area::Naive,
            min_l_value: 0,
        };
        assert_eq!(config.effective_min_l_value(), 2);

        let config = AreaCompConfig {
            min_l_value: 5,
            ..AreaCompConfig::new(Area::Naive)
        };
        assert_eq!(config.effective_min_l_value(), 5);
    }
}
