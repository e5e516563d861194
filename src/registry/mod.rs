//! Static taxonomy of known cryptographic constructions.
//!
//! Entries are loaded once and never mutated during a scan, so a `Registry`
//! can be shared across workers behind a plain `Arc`.

mod loader;
mod schema;

pub use loader::load_rules_dir;
pub use schema::{
    ArgumentSlot, BaselineRule, Derivation, SlotSource, ValueKind, CIPHER_KEY_LENGTH_ROLE,
    CIPHER_ROLE, MODE_ROLE,
};

use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use tracing::trace;

use crate::callsite::Confidence;
use crate::error::RegistryError;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConstructionId(String);

impl ConstructionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Id used for call sites the registry has no entry for.
    pub fn unrecognized(name: &str) -> Self {
        Self(format!("unrecognized:{name}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConstructionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Family {
    BlockCipher,
    Mode,
    Aead,
    Kdf,
    KeyExchange,
    Signature,
    Transport,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryEntry {
    pub id: ConstructionId,
    /// Construction name as it appears in normalized call sites
    pub name: String,
    pub family: Family,
    /// Package or library the construction is imported from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub library: Option<String>,
    /// How reliably the name identifies this construction
    #[serde(default)]
    pub confidence: Confidence,
    #[serde(default)]
    pub schema: Vec<ArgumentSlot>,
    #[serde(default)]
    pub baseline: Vec<BaselineRule>,
}

impl RegistryEntry {
    pub fn max_arity(&self) -> usize {
        self.schema
            .iter()
            .map(|slot| slot.position + 1)
            .max()
            .unwrap_or(0)
    }

    /// Smallest argument count that leaves no slot without a value or default.
    pub fn min_arity(&self) -> usize {
        self.schema
            .iter()
            .filter(|slot| slot.default.is_none())
            .map(|slot| slot.position + 1)
            .max()
            .unwrap_or(0)
    }

    pub fn accepts_arity(&self, argument_count: usize) -> bool {
        (self.min_arity()..=self.max_arity()).contains(&argument_count)
    }

    /// Number of slots that fall back to their default for `argument_count`
    /// arguments.
    pub fn defaulted_slots(&self, argument_count: usize) -> usize {
        self.schema
            .iter()
            .filter(|slot| slot.default.is_some() && slot.position >= argument_count)
            .count()
    }

    fn is_exact_arity(&self, argument_count: usize) -> bool {
        self.min_arity() == argument_count && self.max_arity() == argument_count
    }

    pub fn slot(&self, role: &str) -> Option<&ArgumentSlot> {
        self.schema.iter().find(|slot| slot.role == role)
    }

    pub fn provided_roles(&self) -> BTreeSet<&str> {
        self.schema
            .iter()
            .flat_map(|slot| slot.provided_roles())
            .collect()
    }

    /// A role is required when some baseline rule reads it.
    pub fn required_roles(&self) -> BTreeSet<&str> {
        self.baseline
            .iter()
            .flat_map(|rule| rule.referenced_roles())
            .collect()
    }

    /// Rules in evaluation order: family-level first, then per-parameter rules
    /// by descending severity. Equal severities keep declaration order.
    pub fn ordered_rules(&self) -> impl Iterator<Item = &BaselineRule> {
        let (mut family, mut parameter): (Vec<&BaselineRule>, Vec<&BaselineRule>) =
            self.baseline.iter().partition(|rule| rule.is_family_level());
        family.sort_by_key(|rule| Reverse(rule.severity()));
        parameter.sort_by_key(|rule| Reverse(rule.severity()));
        family.into_iter().chain(parameter)
    }

    pub fn validate(&self) -> Result<(), RegistryError> {
        let id = self.id.as_str();
        if self.name.trim().is_empty() {
            return Err(RegistryError::invalid_schema(id, "construction name is empty"));
        }

        let mut seen = BTreeSet::new();
        let mut derivations = 0;
        for slot in &self.schema {
            if !seen.insert(slot.role.as_str()) {
                return Err(RegistryError::invalid_schema(
                    id,
                    format!("role '{}' is declared twice", slot.role),
                ));
            }
            if slot.derive.is_some() {
                derivations += 1;
                if slot.kind != ValueKind::Identifier {
                    return Err(RegistryError::invalid_schema(
                        id,
                        format!("role '{}' derives from a non-identifier value", slot.role),
                    ));
                }
            }
        }
        if derivations > 1 {
            return Err(RegistryError::invalid_schema(
                id,
                "at most one slot may carry a derivation",
            ));
        }

        let provided = self.provided_roles();
        for role in self.required_roles() {
            if !provided.contains(role) {
                return Err(RegistryError::invalid_schema(
                    id,
                    format!("rule references unknown role '{role}'"),
                ));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct Registry {
    entries: Vec<RegistryEntry>,
    by_name: HashMap<String, Vec<usize>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: Vec<RegistryEntry>) -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        for entry in entries {
            registry.insert(entry)?;
        }
        Ok(registry)
    }

    /// Adds an entry, replacing any existing entry with the same id in place.
    pub fn insert(&mut self, entry: RegistryEntry) -> Result<(), RegistryError> {
        entry.validate()?;
        match self.entries.iter().position(|e| e.id == entry.id) {
            Some(index) => {
                trace!(id = %entry.id, "replacing registry entry");
                self.entries[index] = entry;
            }
            None => self.entries.push(entry),
        }
        self.reindex();
        Ok(())
    }

    fn reindex(&mut self) {
        self.by_name.clear();
        for (index, entry) in self.entries.iter().enumerate() {
            self.by_name
                .entry(entry.name.clone())
                .or_default()
                .push(index);
        }
    }

    /// Finds the entry for a construction name and argument count.
    ///
    /// Among arity-compatible entries with the same name, one whose schema
    /// takes exactly `argument_count` arguments with no optional slot wins,
    /// then the one filling the fewest slots from defaults, then the one with
    /// fewer optional slots overall, then declaration order.
    pub fn lookup(&self, name: &str, argument_count: usize) -> Option<&RegistryEntry> {
        let candidates = self.by_name.get(name)?;
        let chosen = candidates
            .iter()
            .map(|&index| &self.entries[index])
            .filter(|entry| entry.accepts_arity(argument_count))
            .min_by_key(|entry| {
                (
                    !entry.is_exact_arity(argument_count),
                    entry.defaulted_slots(argument_count),
                    entry.schema.iter().filter(|slot| slot.default.is_some()).count(),
                )
            });

        trace!(
            name,
            argument_count,
            candidates = candidates.len(),
            matched = chosen.map(|e| e.id.as_str()),
            "registry lookup"
        );
        chosen
    }

    pub fn get(&self, id: &ConstructionId) -> Option<&RegistryEntry> {
        self.entries.iter().find(|entry| &entry.id == id)
    }

    pub fn entries(&self) -> &[RegistryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
