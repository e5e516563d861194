use serde::{Deserialize, Serialize};

use crate::callsite::Literal;
use crate::classifier::Severity;

/// Roles produced by a [`Derivation::CipherSpec`] slot.
pub const CIPHER_ROLE: &str = "cipher";
pub const MODE_ROLE: &str = "mode";
pub const CIPHER_KEY_LENGTH_ROLE: &str = "cipher_key_length";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    /// Byte length of a buffer (key, IV, nonce, salt)
    Length,
    /// Plain integer parameter (iterations, modulus bits, cost factors)
    Integer,
    /// Named identifier (curve, algorithm string, protocol version)
    Identifier,
    /// Recorded for information only, never checked
    Opaque,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Derivation {
    CipherSpec,
}

/// Where a role's value comes from in the argument list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotSource<'a> {
    Position(usize),
    /// A field of the structured configuration value at `position`. `fields`
    /// lists the accepted spellings of the field.
    Bundle { position: usize, fields: &'a [String] },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArgumentSlot {
    pub role: String,
    pub kind: ValueKind,
    pub position: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bundle_fields: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Literal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub derive: Option<Derivation>,
}

impl ArgumentSlot {
    pub fn positional(role: impl Into<String>, kind: ValueKind, position: usize) -> Self {
        Self {
            role: role.into(),
            kind,
            position,
            bundle_fields: Vec::new(),
            default: None,
            derive: None,
        }
    }

    pub fn bundled<I, S>(role: impl Into<String>, kind: ValueKind, position: usize, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            bundle_fields: fields.into_iter().map(Into::into).collect(),
            ..Self::positional(role, kind, position)
        }
    }

    pub fn with_default(mut self, default: Literal) -> Self {
        self.default = Some(default);
        self
    }

    pub fn with_derivation(mut self, derivation: Derivation) -> Self {
        self.derive = Some(derivation);
        self
    }

    pub fn source(&self) -> SlotSource<'_> {
        if self.bundle_fields.is_empty() {
            SlotSource::Position(self.position)
        } else {
            SlotSource::Bundle {
                position: self.position,
                fields: &self.bundle_fields,
            }
        }
    }

    /// Roles this slot contributes to the extracted parameters.
    pub fn provided_roles(&self) -> Vec<&str> {
        let mut roles = vec![self.role.as_str()];
        if self.derive == Some(Derivation::CipherSpec) {
            roles.extend([CIPHER_ROLE, MODE_ROLE, CIPHER_KEY_LENGTH_ROLE]);
        }
        roles
    }
}

/// One entry of a construction's security baseline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum BaselineRule {
    /// Family-level rule, violated by construction identity alone.
    Flag { severity: Severity, reason: String },

    AtLeast {
        role: String,
        min: i64,
        severity: Severity,
        reason: String,
    },

    OneOf {
        role: String,
        values: Vec<i64>,
        severity: Severity,
        reason: String,
    },

    Denied {
        role: String,
        values: Vec<String>,
        severity: Severity,
        reason: String,
    },

    Allowed {
        role: String,
        values: Vec<String>,
        severity: Severity,
        reason: String,
    },

    MatchesRole {
        role: String,
        other: String,
        severity: Severity,
        reason: String,
    },

    /// `AtLeast` that only applies while `when_role` holds one of `when_values`.
    AtLeastWhen {
        role: String,
        min: i64,
        when_role: String,
        when_values: Vec<String>,
        severity: Severity,
        reason: String,
    },
}

impl BaselineRule {
    pub fn severity(&self) -> Severity {
        match self {
            Self::Flag { severity, .. }
            | Self::AtLeast { severity, .. }
            | Self::OneOf { severity, .. }
            | Self::Denied { severity, .. }
            | Self::Allowed { severity, .. }
            | Self::MatchesRole { severity, .. }
            | Self::AtLeastWhen { severity, .. } => *severity,
        }
    }

    pub fn reason_template(&self) -> &str {
        match self {
            Self::Flag { reason, .. }
            | Self::AtLeast { reason, .. }
            | Self::OneOf { reason, .. }
            | Self::Denied { reason, .. }
            | Self::Allowed { reason, .. }
            | Self::MatchesRole { reason, .. }
            | Self::AtLeastWhen { reason, .. } => reason,
        }
    }

    pub fn is_family_level(&self) -> bool {
        matches!(self, Self::Flag { .. })
    }

    /// Roles whose values this rule reads.
    pub fn referenced_roles(&self) -> Vec<&str> {
        match self {
            Self::Flag { .. } => vec![],
            Self::AtLeast { role, .. }
            | Self::OneOf { role, .. }
            | Self::Denied { role, .. }
            | Self::Allowed { role, .. } => vec![role.as_str()],
            Self::MatchesRole { role, other, .. } => vec![role.as_str(), other.as_str()],
            Self::AtLeastWhen {
                role, when_role, ..
            } => vec![when_role.as_str(), role.as_str()],
        }
    }
}
