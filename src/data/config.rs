use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::error::DataError;
use super::parser::deserialize_lenient_f64;
use super::record::Hormone;
use super::units::HormoneUnits;

/// Biological sex, selecting the natural hormone baselines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BiologicalSex {
    #[default]
    Male,
    Female,
    Other,
}

/// Therapy direction, selecting which known substances are offered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    #[serde(alias = "mtf")]
    Feminizing,
    #[serde(alias = "ftm")]
    Masculinizing,
}

/// Target hormone levels, in standard units
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Targets {
    #[serde(default, deserialize_with = "deserialize_lenient_f64")]
    pub estrogen_level: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_lenient_f64")]
    pub testosterone_level: Option<f64>,
}

impl Targets {
    pub fn get(&self, hormone: Hormone) -> Option<f64> {
        match hormone {
            Hormone::Estrogen => self.estrogen_level,
            Hormone::Testosterone => self.testosterone_level,
        }
        .filter(|v| v.is_finite())
    }
}

/// Everything about the person that the engine needs besides the records
///
/// Passed explicitly into every computation; nothing is held between calls.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default)]
    pub biological_sex: BiologicalSex,
    #[serde(default)]
    pub mode: Mode,
    #[serde(default)]
    pub targets: Targets,
    /// Units of the levels in incoming records
    #[serde(default)]
    pub units: HormoneUnits,
    /// Free-text alias → substance name it should be counted as
    #[serde(default)]
    pub substance_aliases: BTreeMap<String, String>,
}

impl Config {
    pub fn new(biological_sex: BiologicalSex, mode: Mode) -> Self {
        Self {
            biological_sex,
            mode,
            ..Default::default()
        }
    }

    /// Parse a configuration from its JSON form
    pub fn from_json(json: &str) -> Result<Self, DataError> {
        serde_json::from_str(json).map_err(|e| DataError::JsonError(e.to_string()))
    }

    /// Set the target level of a hormone (standard units)
    pub fn with_target(mut self, hormone: Hormone, level: f64) -> Self {
        match hormone {
            Hormone::Estrogen => self.targets.estrogen_level = Some(level),
            Hormone::Testosterone => self.targets.testosterone_level = Some(level),
        }
        self
    }

    /// Set the units incoming record levels are expressed in
    pub fn with_units(mut self, units: HormoneUnits) -> Self {
        self.units = units;
        self
    }

    /// Count free-text substance `alias` as `name`
    pub fn with_substance_alias(mut self, alias: impl Into<String>, name: impl Into<String>) -> Self {
        self.substance_aliases.insert(alias.into(), name.into());
        self
    }
}
