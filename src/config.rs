use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::ops::DefuzzificationMethod;

/// Sample points per defuzzification scan when nothing else is configured.
pub const DEFAULT_RESOLUTION: usize = 1000;

/// Engine settings, fixed at construction and adjustable during setup.
///
/// Higher resolution improves every defuzzification method at a cost of
/// `O(resolution * aggregated sets)` per output variable and call.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    pub resolution: usize,
    pub defuzzification: DefuzzificationMethod,
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.resolution == 0 {
            return Err(ConfigError::InvalidResolution(self.resolution));
        }

        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            resolution: DEFAULT_RESOLUTION,
            defuzzification: DefuzzificationMethod::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();

        assert_eq!(config.resolution, 1000);
        assert_eq!(config.defuzzification, DefuzzificationMethod::Mom);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_zero_resolution_is_invalid() {
        let config = EngineConfig {
            resolution: 0,
            ..Default::default()
        };

        assert_eq!(config.validate(), Err(ConfigError::InvalidResolution(0)));
        assert_eq!(config.validate().unwrap_err().to_string(), "resolution must be > 0, got 0");
    }

    #[test]
    fn test_deserialize() {
        let config: EngineConfig = serde_json::from_str(r#"{"defuzzification": "centroid"}"#).unwrap();

        assert_eq!(config.resolution, DEFAULT_RESOLUTION);
        assert_eq!(config.defuzzification, DefuzzificationMethod::Centroid);

        let config: EngineConfig = serde_json::from_str(r#"{"resolution": 250, "defuzzification": "lom"}"#).unwrap();

        assert_eq!(
            config,
            EngineConfig {
                resolution: 250,
                defuzzification: DefuzzificationMethod::Lom,
            }
        );
        assert!(serde_json::from_str::<EngineConfig>(r#"{"defuzzification": "bisector"}"#).is_err());
        assert!(serde_json::from_str::<EngineConfig>(r#"{"resolutoin": 10}"#).is_err());
    }
}
