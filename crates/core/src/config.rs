//! Simulator tunables
//!
//! The timing knobs are the only rules a caller may change. They come from
//! defaults, a JSON document, or `TETRIS_SIM_*` environment variables.

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::types::{DEFAULT_ARE_FRAMES, DEFAULT_ARR_FRAMES, DEFAULT_DAS_FRAMES};

pub const ENV_DAS: &str = "TETRIS_SIM_DAS";
pub const ENV_ARR: &str = "TETRIS_SIM_ARR";
pub const ENV_ARE: &str = "TETRIS_SIM_ARE";

/// Frame timings for auto-shift and entry delay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Delayed auto shift: frames a direction is held before repeating.
    pub das: u32,
    /// Auto repeat rate: frames between repeated moves.
    pub arr: u32,
    /// Entry delay: frames after a spawn before gravity and drops apply.
    pub are: u32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            das: DEFAULT_DAS_FRAMES,
            arr: DEFAULT_ARR_FRAMES,
            are: DEFAULT_ARE_FRAMES,
        }
    }
}

impl SimConfig {
    /// Defaults overridden by `TETRIS_SIM_DAS`, `TETRIS_SIM_ARR` and `TETRIS_SIM_ARE`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`SimConfig::from_env`], reading variables through `lookup`.
    ///
    /// Unset or blank variables keep their default; anything that is not a
    /// non-negative integer is an error.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();
        let read = |key: &str, default: u32| -> Result<u32> {
            match lookup(key).map(|s| s.trim().to_string()) {
                None => Ok(default),
                Some(s) if s.is_empty() => Ok(default),
                Some(s) => s.parse().map_err(|_| ConfigError::InvalidValue {
                    key: key.to_string(),
                    value: s,
                }),
            }
        };

        Ok(Self {
            das: read(ENV_DAS, defaults.das)?,
            arr: read(ENV_ARR, defaults.arr)?,
            are: read(ENV_ARE, defaults.are)?,
        })
    }

    /// Parse a JSON object; missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = SimConfig::default();
        assert_eq!((config.das, config.arr, config.are), (5, 8, 30));
        assert_eq!(SimConfig::from_lookup(lookup(&[])).unwrap(), config);
    }

    #[test]
    fn test_lookup_overrides() {
        let config =
            SimConfig::from_lookup(lookup(&[(ENV_DAS, "7"), (ENV_ARE, " 0 "), (ENV_ARR, "")])).unwrap();
        assert_eq!(config, SimConfig { das: 7, arr: 8, are: 0 });
    }

    #[test]
    fn test_lookup_rejects_garbage() {
        let err = SimConfig::from_lookup(lookup(&[(ENV_ARR, "fast")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == ENV_ARR));
        assert!(SimConfig::from_lookup(lookup(&[(ENV_DAS, "-1")])).is_err());
    }

    #[test]
    fn test_json_partial_and_malformed() {
        let config = SimConfig::from_json_str(r#"{"are": 12}"#).unwrap();
        assert_eq!(config, SimConfig { das: 5, arr: 8, are: 12 });
        assert!(matches!(
            SimConfig::from_json_str("{\"das\": \"x\"}"),
            Err(ConfigError::Json(_))
        ));
    }
}
