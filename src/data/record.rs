use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::DataError;
use super::parser::{deserialize_lenient_f64, deserialize_lenient_name, deserialize_timestamp};
use super::substance::KnownSubstance;
use super::units::HormoneUnits;

/// Milliseconds in one day
pub const MS_PER_DAY: f64 = 86_400_000.0;

/// The two tracked hormones
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Hormone {
    Estrogen,
    Testosterone,
}

impl Hormone {
    pub const ALL: [Hormone; 2] = [Hormone::Estrogen, Hormone::Testosterone];

    /// Record field name of the hormone level
    pub fn key(&self) -> &'static str {
        match self {
            Hormone::Estrogen => "estrogenLevel",
            Hormone::Testosterone => "testosteroneLevel",
        }
    }
}

impl fmt::Display for Hormone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// One logged check-in: hormone levels and the daily doses in effect
///
/// Levels are concentrations (estrogen in pg/mL, testosterone in ng/dL once converted to
/// standard units), doses are daily amounts in mg. Every numeric field is optional; values
/// that are not finite or are negative are treated as missing by the accessors.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasurementRecord {
    /// Milliseconds since the epoch
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub timestamp: i64,
    #[serde(default, deserialize_with = "deserialize_lenient_f64")]
    pub estrogen_level: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_lenient_f64")]
    pub testosterone_level: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_lenient_f64")]
    pub estradiol: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_lenient_f64")]
    pub progesterone: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_lenient_f64")]
    pub anti_androgen: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_lenient_f64")]
    pub testosterone: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_lenient_f64")]
    pub anti_estrogen: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_lenient_name")]
    pub other_substance_name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_f64")]
    pub other_substance_dose: Option<f64>,
}

/// Days from `earlier` to `later` (ms timestamps), fractional; never overflows
pub fn days_between(earlier: i64, later: i64) -> f64 {
    (i128::from(later) - i128::from(earlier)) as f64 / MS_PER_DAY
}

fn usable(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v >= 0.0)
}

impl MeasurementRecord {
    /// Start building a record at the given timestamp (ms since epoch)
    pub fn builder(timestamp: i64) -> RecordBuilder {
        RecordBuilder {
            record: MeasurementRecord {
                timestamp,
                ..Default::default()
            },
        }
    }

    /// Start building a record `day` whole days after the epoch
    pub fn at_day(day: i64) -> RecordBuilder {
        Self::builder(day.saturating_mul(MS_PER_DAY as i64))
    }

    /// Level of a hormone, if present and usable
    pub fn level(&self, hormone: Hormone) -> Option<f64> {
        usable(self.raw_level(hormone))
    }

    fn raw_level(&self, hormone: Hormone) -> Option<f64> {
        match hormone {
            Hormone::Estrogen => self.estrogen_level,
            Hormone::Testosterone => self.testosterone_level,
        }
    }

    fn raw_dose(&self, substance: KnownSubstance) -> Option<f64> {
        match substance {
            KnownSubstance::Estradiol => self.estradiol,
            KnownSubstance::Progesterone => self.progesterone,
            KnownSubstance::AntiAndrogen => self.anti_androgen,
            KnownSubstance::Testosterone => self.testosterone,
            KnownSubstance::AntiEstrogen => self.anti_estrogen,
        }
    }

    fn raw_dose_mut(&mut self, substance: KnownSubstance) -> &mut Option<f64> {
        match substance {
            KnownSubstance::Estradiol => &mut self.estradiol,
            KnownSubstance::Progesterone => &mut self.progesterone,
            KnownSubstance::AntiAndrogen => &mut self.anti_androgen,
            KnownSubstance::Testosterone => &mut self.testosterone,
            KnownSubstance::AntiEstrogen => &mut self.anti_estrogen,
        }
    }

    /// Daily dose of a known substance, if present and usable
    pub fn daily_dose(&self, substance: KnownSubstance) -> Option<f64> {
        usable(self.raw_dose(substance))
    }

    /// Raw name and usable daily dose of the free-text substance slot
    pub fn other_substance(&self) -> Option<(&str, f64)> {
        let name = self.other_substance_name.as_deref()?.trim();
        if name.is_empty() {
            return None;
        }
        usable(self.other_substance_dose).map(|dose| (name, dose))
    }

    /// Days elapsed since `earlier`, fractional
    pub fn days_since(&self, earlier: &MeasurementRecord) -> f64 {
        days_between(earlier.timestamp, self.timestamp)
    }

    /// A copy with hormone levels converted from `units` to standard units
    pub fn to_standard_units(&self, units: &HormoneUnits) -> MeasurementRecord {
        MeasurementRecord {
            estrogen_level: self.estrogen_level.map(|v| units.estrogen.to_standard(v)),
            testosterone_level: self
                .testosterone_level
                .map(|v| units.testosterone.to_standard(v)),
            ..self.clone()
        }
    }

    /// Check that every present level and dose is finite and non-negative
    pub fn validate(&self) -> Result<(), DataError> {
        let levels = Hormone::ALL
            .into_iter()
            .map(|h| (h.key(), self.raw_level(h)));
        let doses = KnownSubstance::ALL
            .into_iter()
            .map(|s| (s.key(), self.raw_dose(s)));
        let other = std::iter::once(("otherSubstanceDose", self.other_substance_dose));

        for (field, value) in levels.chain(doses).chain(other) {
            if let Some(v) = value {
                if !v.is_finite() || v < 0.0 {
                    return Err(DataError::InvalidValue {
                        field: field.to_string(),
                        timestamp: self.timestamp,
                        value: v,
                    });
                }
            }
        }
        Ok(())
    }
}

/// Fluent builder for [`MeasurementRecord`]
#[derive(Debug, Clone)]
pub struct RecordBuilder {
    record: MeasurementRecord,
}

impl RecordBuilder {
    pub fn estrogen(mut self, level: f64) -> Self {
        self.record.estrogen_level = Some(level);
        self
    }

    pub fn testosterone(mut self, level: f64) -> Self {
        self.record.testosterone_level = Some(level);
        self
    }

    pub fn level(self, hormone: Hormone, level: f64) -> Self {
        match hormone {
            Hormone::Estrogen => self.estrogen(level),
            Hormone::Testosterone => self.testosterone(level),
        }
    }

    /// Set the daily dose (mg) of a known substance
    pub fn dose(mut self, substance: KnownSubstance, daily_mg: f64) -> Self {
        *self.record.raw_dose_mut(substance) = Some(daily_mg);
        self
    }

    /// Set the free-text substance slot
    pub fn other(mut self, name: impl Into<String>, daily_mg: f64) -> Self {
        self.record.other_substance_name = Some(name.into());
        self.record.other_substance_dose = Some(daily_mg);
        self
    }

    pub fn build(self) -> MeasurementRecord {
        self.record
    }
}
