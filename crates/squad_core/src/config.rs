//! # Match Configuration
//!
//! All tuning constants of the match simulation in one place.
//!
//! ```rust
//! use squad_core::config::MatchConfig;
//!
//! let config = MatchConfig::default();
//! let arcade = MatchConfig::arcade();
//! assert!(arcade.avg_total_goals > config.avg_total_goals);
//! ```

use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};
use std::{env, fs};

pub const MATCH_CONFIG_PATH_ENV: &str = "SQUAD_MATCH_CONFIG_PATH";

/// Match simulation parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    // === Scoring ===
    /// Expected goals of both sides together (default: 2.6)
    pub avg_total_goals: f64,
    /// Sharpness of the strength curve; higher means fewer upsets (default: 4.0)
    pub strength_exponent: f64,
    /// Floor on either side's expected goals (default: 0.05)
    pub min_expected_goals: f64,
    /// Cap on goals per side (default: 12)
    pub max_goals: u8,

    // === Injuries ===
    /// Per starter, per match (default: 0.01)
    pub injury_chance: f64,
    /// Applied to exhausted starters (default: 3.0)
    pub exhausted_injury_multiplier: f64,
    /// Injury length in matches, drawn uniformly (default: 1..=4)
    pub injury_matches_min: u8,
    pub injury_matches_max: u8,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            avg_total_goals: 2.6,
            strength_exponent: 4.0,
            min_expected_goals: 0.05,
            max_goals: 12,

            injury_chance: 0.01,
            exhausted_injury_multiplier: 3.0,
            injury_matches_min: 1,
            injury_matches_max: 4,
        }
    }
}

impl MatchConfig {
    pub fn realistic() -> Self {
        Self::default()
    }

    /// More goals, flatter strength curve.
    pub fn arcade() -> Self {
        Self { avg_total_goals: 4.0, strength_exponent: 2.5, ..Self::default() }
    }

    /// Same scoring model without any injury draws.
    pub fn no_injuries() -> Self {
        Self { injury_chance: 0.0, ..Self::default() }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| CoreError::InvalidConfig(format!("parse error: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from the file named by `SQUAD_MATCH_CONFIG_PATH`; defaults when unset.
    pub fn from_env() -> Result<Self> {
        let Ok(path) = env::var(MATCH_CONFIG_PATH_ENV) else {
            return Ok(Self::default());
        };

        let path = path.trim();
        if path.is_empty() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| {
            CoreError::InvalidConfig(format!(
                "failed to read {MATCH_CONFIG_PATH_ENV}='{path}': {e}"
            ))
        })?;

        log::info!("Loaded match config from {}", path);
        Self::from_json(&content)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.avg_total_goals.is_finite() && self.avg_total_goals > 0.0) {
            return Err(CoreError::InvalidConfig(format!(
                "avg_total_goals must be positive, got {}",
                self.avg_total_goals
            )));
        }
        if !(self.strength_exponent.is_finite() && self.strength_exponent >= 0.0) {
            return Err(CoreError::InvalidConfig(format!(
                "strength_exponent must be non-negative, got {}",
                self.strength_exponent
            )));
        }
        if !(self.min_expected_goals.is_finite() && self.min_expected_goals > 0.0) {
            return Err(CoreError::InvalidConfig(format!(
                "min_expected_goals must be positive, got {}",
                self.min_expected_goals
            )));
        }
        if !(0.0..=1.0).contains(&self.injury_chance) {
            return Err(CoreError::InvalidConfig(format!(
                "injury_chance must be within 0..=1, got {}",
                self.injury_chance
            )));
        }
        if !(self.exhausted_injury_multiplier.is_finite() && self.exhausted_injury_multiplier >= 0.0)
        {
            return Err(CoreError::InvalidConfig(format!(
                "exhausted_injury_multiplier must be non-negative, got {}",
                self.exhausted_injury_multiplier
            )));
        }
        if self.injury_matches_min == 0 || self.injury_matches_min > self.injury_matches_max {
            return Err(CoreError::InvalidConfig(format!(
                "injury matches range {}..={} is empty or starts at zero",
                self.injury_matches_min, self.injury_matches_max
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_validate() {
        assert!(MatchConfig::realistic().validate().is_ok());
        assert!(MatchConfig::arcade().validate().is_ok());
        assert!(MatchConfig::no_injuries().validate().is_ok());
        assert_eq!(MatchConfig::no_injuries().injury_chance, 0.0);
    }

    #[test]
    fn test_from_json_fills_defaults() {
        let config = MatchConfig::from_json(r#"{"avg_total_goals": 3.1}"#).unwrap();
        assert_eq!(config.avg_total_goals, 3.1);
        assert_eq!(config.max_goals, 12);
    }

    #[test]
    fn test_from_json_rejects_bad_values() {
        let err = MatchConfig::from_json(r#"{"injury_chance": 1.5}"#).unwrap_err();
        assert!(matches!(err, CoreError::InvalidConfig(_)));

        let err = MatchConfig::from_json(r#"{"injury_matches_min": 5, "injury_matches_max": 2}"#)
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidConfig(_)));

        assert!(MatchConfig::from_json("not json").is_err());
    }
}
