/// Argument values as handed over by the call-site normalizer.
///
/// The normalizer resolves what it can statically. Anything it could not pin
/// down arrives as `Unknown` and must stay that way through extraction.
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Literal {
    Int(i64),
    Str(String),
    Bytes(Vec<u8>),
}

/// How sure a producer is about what it reports: the normalizer about an
/// inferred length, a registry entry about the construction it names.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    #[default]
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArgumentValue {
    Literal(Literal),

    /// Length of a buffer whose contents are not known, e.g. `make([]byte, 32)`.
    SymbolicLength { length: u64, confidence: Confidence },

    /// Structured configuration value: struct literal, options object or
    /// keyword arguments.
    Bundle(BTreeMap<String, ArgumentValue>),

    Unknown,
}

impl ArgumentValue {
    pub fn int(value: i64) -> Self {
        Self::Literal(Literal::Int(value))
    }

    pub fn bytes(value: impl Into<Vec<u8>>) -> Self {
        Self::Literal(Literal::Bytes(value.into()))
    }

    pub fn string(value: impl Into<String>) -> Self {
        Self::Literal(Literal::Str(value.into()))
    }

    /// Symbolic length the normalizer is certain about
    pub fn length(length: u64) -> Self {
        Self::SymbolicLength {
            length,
            confidence: Confidence::High,
        }
    }

    pub fn length_with(length: u64, confidence: Confidence) -> Self {
        Self::SymbolicLength { length, confidence }
    }

    pub fn bundle<K, I>(fields: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, ArgumentValue)>,
    {
        Self::Bundle(fields.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn empty_bundle() -> Self {
        Self::Bundle(BTreeMap::new())
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }

    pub fn as_bundle(&self) -> Option<&BTreeMap<String, ArgumentValue>> {
        match self {
            Self::Bundle(fields) => Some(fields),
            _ => None,
        }
    }
}
