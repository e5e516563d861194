//! Resolves argument roles of a call site using the matched entry's schema.
//!
//! There is a single extraction strategy driven by [`ArgumentSlot`]s: a slot
//! either names a position or a field inside the structured configuration
//! value at a position. Values that do not fit the slot's kind become
//! `Unknown` with a note, never an error.

mod cipher_spec;

pub use cipher_spec::{parse_cipher_spec, CipherSpec};

use serde::Serialize;
use std::collections::BTreeMap;
use tracing::trace;

use crate::callsite::{ArgumentValue, CallSite, Confidence, Literal};
use crate::registry::{
    ArgumentSlot, Derivation, RegistryEntry, SlotSource, ValueKind, CIPHER_KEY_LENGTH_ROLE,
    CIPHER_ROLE, MODE_ROLE,
};
use crate::utils::unquote_string;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum ParamValue {
    Int(i64),
    Text(String),
    Unknown,
}

impl ParamValue {
    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            _ => None,
        }
    }

    /// Type-tagged text form, so `Int(5)`, `Text("5")` and `Unknown` never
    /// collide.
    pub fn canonical(&self) -> String {
        match self {
            Self::Int(value) => format!("i:{value}"),
            Self::Text(value) => format!("s:{value}"),
            Self::Unknown => "?".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtractedParameters {
    pub values: BTreeMap<String, ParamValue>,
    /// Reason codes recorded while extracting, in slot order
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
}

impl ExtractedParameters {
    pub fn get(&self, role: &str) -> &ParamValue {
        self.values.get(role).unwrap_or(&ParamValue::Unknown)
    }

    pub fn is_unknown(&self, role: &str) -> bool {
        self.get(role).is_unknown()
    }

    /// Stable text form used as part of the deduplication key.
    pub fn canonical(&self) -> String {
        self.values
            .iter()
            .map(|(role, value)| format!("{role}={}", value.canonical()))
            .collect::<Vec<_>>()
            .join(";")
    }
}

pub struct Extractor;

impl Default for Extractor {
    fn default() -> Self {
        Self::new()
    }
}

impl Extractor {
    pub fn new() -> Self {
        Self
    }

    pub fn extract(&self, call: &CallSite, entry: &RegistryEntry) -> ExtractedParameters {
        let mut params = ExtractedParameters::default();

        for slot in &entry.schema {
            let value = self.extract_slot(call, slot, &mut params.notes);
            if slot.derive == Some(Derivation::CipherSpec) {
                self.derive_cipher_spec(&value, &mut params.values);
            }
            params.values.insert(slot.role.clone(), value);
        }

        trace!(
            id = %entry.id,
            roles = params.values.len(),
            notes = params.notes.len(),
            "extracted parameters"
        );
        params
    }

    fn extract_slot(
        &self,
        call: &CallSite,
        slot: &ArgumentSlot,
        notes: &mut Vec<String>,
    ) -> ParamValue {
        match slot.source() {
            SlotSource::Position(position) => match call.argument(position) {
                Some(argument) => self.coerce(argument, slot, notes),
                None => self.default_value(slot, notes),
            },
            SlotSource::Bundle { position, fields } => match call.argument(position) {
                None => self.default_value(slot, notes),
                Some(ArgumentValue::Unknown) => ParamValue::Unknown,
                Some(ArgumentValue::Bundle(bundle)) => {
                    match fields.iter().find_map(|field| bundle.get(field)) {
                        Some(argument) => self.coerce(argument, slot, notes),
                        None => self.default_value(slot, notes),
                    }
                }
                Some(_) => {
                    notes.push(format!("bundle shape mismatch: {}", slot.role));
                    ParamValue::Unknown
                }
            },
        }
    }

    fn default_value(&self, slot: &ArgumentSlot, notes: &mut Vec<String>) -> ParamValue {
        match (&slot.default, slot.kind) {
            // A defaulted length is written as its byte count
            (Some(Literal::Int(length)), ValueKind::Length) => ParamValue::Int(*length),
            (Some(literal), _) => {
                self.coerce(&ArgumentValue::Literal(literal.clone()), slot, notes)
            }
            (None, _) => ParamValue::Unknown,
        }
    }

    fn coerce(
        &self,
        argument: &ArgumentValue,
        slot: &ArgumentSlot,
        notes: &mut Vec<String>,
    ) -> ParamValue {
        match (slot.kind, argument) {
            (_, ArgumentValue::Unknown) => ParamValue::Unknown,
            (ValueKind::Opaque, argument) => describe_opaque(argument),
            (ValueKind::Length, ArgumentValue::Literal(Literal::Bytes(bytes))) => {
                length_value(bytes.len() as u64)
            }
            (ValueKind::Length, ArgumentValue::SymbolicLength { length, confidence }) => {
                if *confidence >= Confidence::Medium {
                    length_value(*length)
                } else {
                    notes.push(format!("low-confidence length: {}", slot.role));
                    ParamValue::Unknown
                }
            }
            (ValueKind::Integer, ArgumentValue::Literal(Literal::Int(value))) => {
                ParamValue::Int(*value)
            }
            (ValueKind::Identifier, ArgumentValue::Literal(Literal::Str(value))) => {
                ParamValue::Text(unquote_string(value))
            }
            _ => {
                notes.push(format!("argument type mismatch: {}", slot.role));
                ParamValue::Unknown
            }
        }
    }

    fn derive_cipher_spec(&self, source: &ParamValue, values: &mut BTreeMap<String, ParamValue>) {
        let spec = source.as_text().map(parse_cipher_spec).unwrap_or_default();

        let text = |part: Option<String>| part.map(ParamValue::Text).unwrap_or(ParamValue::Unknown);
        values.insert(CIPHER_ROLE.to_string(), text(spec.cipher));
        values.insert(MODE_ROLE.to_string(), text(spec.mode));
        values.insert(
            CIPHER_KEY_LENGTH_ROLE.to_string(),
            spec.key_length.map(length_value).unwrap_or(ParamValue::Unknown),
        );
    }
}

/// Convenience wrapper around [`Extractor::extract`].
pub fn extract(call: &CallSite, entry: &RegistryEntry) -> ExtractedParameters {
    Extractor::new().extract(call, entry)
}

fn length_value(length: u64) -> ParamValue {
    i64::try_from(length)
        .map(ParamValue::Int)
        .unwrap_or(ParamValue::Unknown)
}

fn describe_opaque(argument: &ArgumentValue) -> ParamValue {
    match argument {
        ArgumentValue::Literal(Literal::Int(value)) => ParamValue::Int(*value),
        ArgumentValue::Literal(Literal::Str(value)) => ParamValue::Text(unquote_string(value)),
        ArgumentValue::Literal(Literal::Bytes(bytes)) => {
            ParamValue::Text(format!("<{} bytes>", bytes.len()))
        }
        ArgumentValue::SymbolicLength { length, .. } => {
            ParamValue::Text(format!("<{length} bytes>"))
        }
        ArgumentValue::Bundle(fields) => {
            let keys: Vec<&str> = fields.keys().map(String::as_str).collect();
            ParamValue::Text(format!("{{{}}}", keys.join(", ")))
        }
        ArgumentValue::Unknown => ParamValue::Unknown,
    }
}
