//! Substances, their declared roles, and the per-history substance registry
//!
//! Every substance the engine reasons about is identified by a [`SubstanceId`]: one of the
//! five [`KnownSubstance`]s with a dedicated dose field, or a free-text "other" substance
//! registered under a normalized name. The [`SubstanceRegistry`] is built once per
//! computation and fixes the enumeration order used by the attribution solver and by the
//! output influence map.

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use super::config::{Config, Mode};
use super::record::MeasurementRecord;

/// Prefix used in the string form of free-text substance ids
const OTHER_PREFIX: &str = "other:";

/// Substances with a dedicated daily dose field on every record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum KnownSubstance {
    Estradiol,
    Progesterone,
    AntiAndrogen,
    Testosterone,
    AntiEstrogen,
}

impl KnownSubstance {
    /// All known substances in record field order
    pub const ALL: [KnownSubstance; 5] = [
        KnownSubstance::Estradiol,
        KnownSubstance::Progesterone,
        KnownSubstance::AntiAndrogen,
        KnownSubstance::Testosterone,
        KnownSubstance::AntiEstrogen,
    ];

    /// Key used for this substance in records and in the output map
    pub fn key(&self) -> &'static str {
        match self {
            KnownSubstance::Estradiol => "estradiol",
            KnownSubstance::Progesterone => "progesterone",
            KnownSubstance::AntiAndrogen => "antiAndrogen",
            KnownSubstance::Testosterone => "testosterone",
            KnownSubstance::AntiEstrogen => "antiEstrogen",
        }
    }

    /// Human readable name
    pub fn display_name(&self) -> &'static str {
        match self {
            KnownSubstance::Estradiol => "Estradiol",
            KnownSubstance::Progesterone => "Progesterone",
            KnownSubstance::AntiAndrogen => "Anti-androgen",
            KnownSubstance::Testosterone => "Testosterone",
            KnownSubstance::AntiEstrogen => "Anti-estrogen",
        }
    }

    /// Whether the substance is offered in the given therapy mode
    pub fn visible_in(&self, mode: Mode) -> bool {
        match mode {
            Mode::Feminizing => matches!(
                self,
                KnownSubstance::Estradiol
                    | KnownSubstance::Progesterone
                    | KnownSubstance::AntiAndrogen
            ),
            Mode::Masculinizing => matches!(
                self,
                KnownSubstance::Testosterone | KnownSubstance::AntiEstrogen
            ),
        }
    }

    /// Declared sign constraints on the learned influence
    ///
    /// Progesterone carries no declared role.
    pub fn role(&self) -> DrugRole {
        match self {
            KnownSubstance::Estradiol => DrugRole::new(Role::Increase, Role::Unconstrained),
            KnownSubstance::AntiAndrogen => DrugRole::new(Role::Unconstrained, Role::Decrease),
            KnownSubstance::Testosterone => DrugRole::new(Role::Unconstrained, Role::Increase),
            KnownSubstance::AntiEstrogen => DrugRole::new(Role::Decrease, Role::Unconstrained),
            KnownSubstance::Progesterone => DrugRole::unconstrained(),
        }
    }
}

impl FromStr for KnownSubstance {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        KnownSubstance::ALL
            .into_iter()
            .find(|k| k.key() == s)
            .ok_or(())
    }
}

/// Declared direction of a substance's effect on one hormone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Role {
    /// +1: the influence may never be negative
    Increase,
    /// 0: no constraint, the estimate is kept as computed
    Unconstrained,
    /// -1: the influence may never be positive
    Decrease,
}

impl Role {
    pub fn sign(&self) -> i8 {
        match self {
            Role::Increase => 1,
            Role::Unconstrained => 0,
            Role::Decrease => -1,
        }
    }

    /// Zero a value whose sign contradicts the role
    ///
    /// An [`Role::Unconstrained`] dimension is returned untouched, it is *not* forced to zero.
    pub fn clamp(&self, value: f64) -> f64 {
        match self {
            Role::Increase if value < 0.0 => 0.0,
            Role::Decrease if value > 0.0 => 0.0,
            _ => value,
        }
    }
}

/// Sign constraints of a substance on estrogen and testosterone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrugRole {
    pub estrogen: Role,
    pub testosterone: Role,
}

impl DrugRole {
    pub fn new(estrogen: Role, testosterone: Role) -> Self {
        Self {
            estrogen,
            testosterone,
        }
    }

    pub fn unconstrained() -> Self {
        Self::new(Role::Unconstrained, Role::Unconstrained)
    }
}

/// Stable identifier of a substance
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SubstanceId {
    Known(KnownSubstance),
    /// Free-text substance, keyed by its normalized name
    Other(String),
}

impl SubstanceId {
    /// Id of a free-text substance, normalizing the name
    pub fn other(name: &str) -> Self {
        SubstanceId::Other(normalize_name(name))
    }

    pub fn is_known(&self) -> bool {
        matches!(self, SubstanceId::Known(_))
    }
}

impl From<KnownSubstance> for SubstanceId {
    fn from(known: KnownSubstance) -> Self {
        SubstanceId::Known(known)
    }
}

impl fmt::Display for SubstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubstanceId::Known(k) => write!(f, "{}", k.key()),
            SubstanceId::Other(name) => write!(f, "{}{}", OTHER_PREFIX, name),
        }
    }
}

impl FromStr for SubstanceId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(name) = s.strip_prefix(OTHER_PREFIX) {
            if name.trim().is_empty() {
                return Err(format!("empty substance name in '{}'", s));
            }
            return Ok(SubstanceId::other(name));
        }
        KnownSubstance::from_str(s)
            .map(SubstanceId::Known)
            .map_err(|_| format!("unknown substance id '{}'", s))
    }
}

impl Serialize for SubstanceId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SubstanceId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        SubstanceId::from_str(&s).map_err(de::Error::custom)
    }
}

/// Normalize a free-text substance name: trimmed, lowercase, single spaces
pub fn normalize_name(name: &str) -> String {
    name.split_whitespace()
        .map(|part| part.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Registry entry: identity, display metadata and declared role of one substance
#[derive(Debug, Clone, PartialEq)]
pub struct DrugProfile {
    pub id: SubstanceId,
    pub display_name: String,
    /// Raw spellings that resolved to this substance, in first-seen order
    pub aliases: Vec<String>,
    pub role: DrugRole,
}

impl DrugProfile {
    fn known(substance: KnownSubstance) -> Self {
        Self {
            id: SubstanceId::Known(substance),
            display_name: substance.display_name().to_string(),
            aliases: Vec::new(),
            role: substance.role(),
        }
    }

    fn other(name: String, raw: &str) -> Self {
        Self {
            id: SubstanceId::Other(name),
            display_name: raw.trim().to_string(),
            aliases: vec![raw.trim().to_string()],
            role: DrugRole::unconstrained(),
        }
    }
}

/// Ordered set of substances seen in one record history
///
/// Order is first appearance with a positive dose, record by record; within a record the
/// known dose fields come first in [`KnownSubstance::ALL`] order, then the free-text slot.
/// Known substances visible in the configured mode but never dosed are appended last.
#[derive(Debug, Clone, Default)]
pub struct SubstanceRegistry {
    profiles: Vec<DrugProfile>,
    aliases: BTreeMap<String, String>,
}

impl SubstanceRegistry {
    /// Build the registry for a record history
    pub fn from_records(records: &[MeasurementRecord], config: &Config) -> Self {
        let aliases = config
            .substance_aliases
            .iter()
            .map(|(alias, target)| (normalize_name(alias), normalize_name(target)))
            .filter(|(alias, target)| !alias.is_empty() && !target.is_empty())
            .collect();

        let mut registry = SubstanceRegistry {
            profiles: Vec::new(),
            aliases,
        };

        for record in records {
            for known in KnownSubstance::ALL {
                if record.daily_dose(known).is_some_and(|dose| dose > 0.0) {
                    registry.register_known(known);
                }
            }
            if let Some((raw, dose)) = record.other_substance() {
                if dose > 0.0 {
                    registry.register_other(raw);
                }
            }
        }

        for known in KnownSubstance::ALL {
            if known.visible_in(config.mode) {
                registry.register_known(known);
            }
        }

        registry
    }

    fn register_known(&mut self, substance: KnownSubstance) {
        let id = SubstanceId::Known(substance);
        if self.position(&id).is_none() {
            self.profiles.push(DrugProfile::known(substance));
        }
    }

    fn register_other(&mut self, raw: &str) {
        let Some(name) = self.resolve(raw) else {
            return;
        };
        let id = SubstanceId::Other(name.clone());
        match self.position(&id) {
            Some(idx) => {
                let spelling = raw.trim().to_string();
                let profile = &mut self.profiles[idx];
                if !profile.aliases.contains(&spelling) {
                    profile.aliases.push(spelling);
                }
            }
            None => self.profiles.push(DrugProfile::other(name, raw)),
        }
    }

    /// Resolve a free-text name to the normalized name it is registered under
    pub fn resolve(&self, raw: &str) -> Option<String> {
        let name = normalize_name(raw);
        if name.is_empty() {
            return None;
        }
        Some(self.aliases.get(&name).cloned().unwrap_or(name))
    }

    /// Index of a substance in enumeration order
    pub fn position(&self, id: &SubstanceId) -> Option<usize> {
        self.profiles.iter().position(|p| &p.id == id)
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    pub fn profiles(&self) -> &[DrugProfile] {
        &self.profiles
    }

    pub fn ids(&self) -> impl Iterator<Item = &SubstanceId> {
        self.profiles.iter().map(|p| &p.id)
    }

    /// Daily dose of the substance at `idx` recorded on `record`, 0 when absent
    pub fn daily_dose(&self, record: &MeasurementRecord, idx: usize) -> f64 {
        match &self.profiles[idx].id {
            SubstanceId::Known(known) => record.daily_dose(*known).unwrap_or(0.0),
            SubstanceId::Other(name) => record
                .other_substance()
                .filter(|(raw, _)| self.resolve(raw).as_deref() == Some(name.as_str()))
                .map(|(_, dose)| dose)
                .unwrap_or(0.0),
        }
    }
}
