use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

pub const DEFAULT_CALLER_NAME: &str = "Lewis";
pub const DEFAULT_OTHER_PERSON: &str = "the responsible party";
pub const DEFAULT_AMOUNT: &str = "$XX.00/40%";

/// Short token used inside `[KEY]` placeholders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PlaceholderKey {
    /// Contact name.
    N,
    /// Caller name. Survives a session reset.
    YN,
    /// Company name.
    CN,
    /// Company industry.
    CI,
    SB,
    PP,
    CT,
    /// Mirrors [`PlaceholderKey::CI`].
    TIA,
    TE,
    DT,
    EAC,
    TF,
    OP,
    XX,
}

impl PlaceholderKey {
    pub const ALL: &'static [PlaceholderKey] = &[
        Self::N,
        Self::YN,
        Self::CN,
        Self::CI,
        Self::SB,
        Self::PP,
        Self::CT,
        Self::TIA,
        Self::TE,
        Self::DT,
        Self::EAC,
        Self::TF,
        Self::OP,
        Self::XX,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::N => "N",
            Self::YN => "YN",
            Self::CN => "CN",
            Self::CI => "CI",
            Self::SB => "SB",
            Self::PP => "PP",
            Self::CT => "CT",
            Self::TIA => "TIA",
            Self::TE => "TE",
            Self::DT => "DT",
            Self::EAC => "EAC",
            Self::TF => "TF",
            Self::OP => "OP",
            Self::XX => "XX",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|key| key.as_str() == raw)
    }

    /// Key this one is computed from, if it is an alias.
    pub fn alias_of(self) -> Option<PlaceholderKey> {
        match self {
            Self::TIA => Some(Self::CI),
            _ => None,
        }
    }

    pub fn is_derived(self) -> bool {
        self.alias_of().is_some()
    }

    pub fn preserved_on_reset(self) -> bool {
        matches!(self, Self::YN)
    }

    pub fn default_value(self) -> &'static str {
        match self {
            Self::YN => DEFAULT_CALLER_NAME,
            Self::OP => DEFAULT_OTHER_PERSON,
            Self::XX => DEFAULT_AMOUNT,
            _ => "",
        }
    }
}

impl fmt::Display for PlaceholderKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlaceholderKey {
    type Err = EngineError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Self::parse(raw).ok_or_else(|| EngineError::UnknownKey {
            key: raw.to_string(),
        })
    }
}

/// Prospect-info inputs the UI exposes, each feeding one placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProspectField {
    Name,
    Title,
    Company,
    Industry,
    Benefit,
    Pain,
}

impl ProspectField {
    pub const ALL: &'static [ProspectField] = &[
        Self::Name,
        Self::Title,
        Self::Company,
        Self::Industry,
        Self::Benefit,
        Self::Pain,
    ];

    pub fn key(self) -> PlaceholderKey {
        match self {
            Self::Name => PlaceholderKey::N,
            Self::Title => PlaceholderKey::CT,
            Self::Company => PlaceholderKey::CN,
            Self::Industry => PlaceholderKey::CI,
            Self::Benefit => PlaceholderKey::SB,
            Self::Pain => PlaceholderKey::PP,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Title => "title",
            Self::Company => "company",
            Self::Industry => "industry",
            Self::Benefit => "benefit",
            Self::Pain => "pain",
        }
    }
}

/// Live values for every placeholder key.
///
/// Every key of [`PlaceholderKey::ALL`] always has an entry, and derived keys
/// are recomputed after each write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<PlaceholderKey, String>")]
#[serde(into = "BTreeMap<PlaceholderKey, String>")]
pub struct SubstitutionTable {
    values: BTreeMap<PlaceholderKey, String>,
}

impl Default for SubstitutionTable {
    fn default() -> Self {
        Self::with_caller_name(DEFAULT_CALLER_NAME)
    }
}

impl SubstitutionTable {
    pub fn with_caller_name(caller_name: impl Into<String>) -> Self {
        let mut values = PlaceholderKey::ALL
            .iter()
            .map(|key| (*key, key.default_value().to_string()))
            .collect::<BTreeMap<_, _>>();
        values.insert(PlaceholderKey::YN, caller_name.into());
        let mut table = Self { values };
        table.recompute_derived();
        table
    }

    pub fn get(&self, key: PlaceholderKey) -> &str {
        self.values.get(&key).map(String::as_str).unwrap_or("")
    }

    pub fn lookup(&self, raw_key: &str) -> Option<&str> {
        PlaceholderKey::parse(raw_key).map(|key| self.get(key))
    }

    pub fn set(&mut self, key: PlaceholderKey, value: impl Into<String>) -> Result<(), EngineError> {
        if key.is_derived() {
            return Err(EngineError::DerivedKey {
                key: key.as_str().to_string(),
            });
        }
        self.values.insert(key, value.into());
        self.recompute_derived();
        Ok(())
    }

    /// Restores every default except keys that survive a reset.
    pub fn reset(&mut self) {
        for key in PlaceholderKey::ALL {
            if key.preserved_on_reset() {
                continue;
            }
            self.values.insert(*key, key.default_value().to_string());
        }
        self.recompute_derived();
    }

    pub fn iter(&self) -> impl Iterator<Item = (PlaceholderKey, &str)> {
        self.values.iter().map(|(key, value)| (*key, value.as_str()))
    }

    fn recompute_derived(&mut self) {
        for key in PlaceholderKey::ALL {
            if let Some(source) = key.alias_of() {
                let value = self.get(source).to_string();
                self.values.insert(*key, value);
            }
        }
    }
}

impl From<BTreeMap<PlaceholderKey, String>> for SubstitutionTable {
    fn from(raw: BTreeMap<PlaceholderKey, String>) -> Self {
        let mut table = Self::default();
        for (key, value) in raw {
            if key.is_derived() {
                continue;
            }
            table.values.insert(key, value);
        }
        table.recompute_derived();
        table
    }
}

impl From<SubstitutionTable> for BTreeMap<PlaceholderKey, String> {
    fn from(table: SubstitutionTable) -> Self {
        table.values
    }
}
