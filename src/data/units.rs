//! Hormone concentration units
//!
//! All computations run in standard units: estrogen in pg/mL and testosterone in ng/dL.
//! The physiological baselines in [`crate::analytics::recovery`] are expressed in these.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::error::DataError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EstrogenUnit {
    #[default]
    #[serde(rename = "pg/mL", alias = "pg/ml")]
    PgPerMl,
    #[serde(rename = "pmol/L", alias = "pmol/l")]
    PmolPerL,
}

impl EstrogenUnit {
    /// Multiplier from this unit to pg/mL
    pub fn factor(&self) -> f64 {
        match self {
            EstrogenUnit::PgPerMl => 1.0,
            EstrogenUnit::PmolPerL => 0.2724,
        }
    }

    pub fn to_standard(&self, value: f64) -> f64 {
        value * self.factor()
    }

    pub fn from_standard(&self, value: f64) -> f64 {
        value / self.factor()
    }
}

impl FromStr for EstrogenUnit {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pg/ml" => Ok(EstrogenUnit::PgPerMl),
            "pmol/l" => Ok(EstrogenUnit::PmolPerL),
            _ => Err(DataError::UnknownUnit {
                hormone: "estrogen".to_string(),
                unit: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TestosteroneUnit {
    #[default]
    #[serde(rename = "ng/dL", alias = "ng/dl")]
    NgPerDl,
    #[serde(rename = "nmol/L", alias = "nmol/l")]
    NmolPerL,
    #[serde(rename = "ng/mL", alias = "ng/ml")]
    NgPerMl,
}

impl TestosteroneUnit {
    /// Multiplier from this unit to ng/dL
    pub fn factor(&self) -> f64 {
        match self {
            TestosteroneUnit::NgPerDl => 1.0,
            TestosteroneUnit::NmolPerL => 28.85,
            TestosteroneUnit::NgPerMl => 100.0,
        }
    }

    pub fn to_standard(&self, value: f64) -> f64 {
        value * self.factor()
    }

    pub fn from_standard(&self, value: f64) -> f64 {
        value / self.factor()
    }
}

impl FromStr for TestosteroneUnit {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ng/dl" => Ok(TestosteroneUnit::NgPerDl),
            "nmol/l" => Ok(TestosteroneUnit::NmolPerL),
            "ng/ml" => Ok(TestosteroneUnit::NgPerMl),
            _ => Err(DataError::UnknownUnit {
                hormone: "testosterone".to_string(),
                unit: s.to_string(),
            }),
        }
    }
}

/// Units in which incoming record levels are expressed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HormoneUnits {
    #[serde(default)]
    pub estrogen: EstrogenUnit,
    #[serde(default)]
    pub testosterone: TestosteroneUnit,
}

impl HormoneUnits {
    pub fn is_standard(&self) -> bool {
        *self == HormoneUnits::default()
    }
}
