use serde::{Deserialize, Serialize};
use std::fmt;

use crate::callsite::{Confidence, Location};
use crate::registry::{ConstructionId, Family};

/// Security verdict levels, declared from least to most severe so the derived
/// ordering matches report priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Safe,
    Indeterminate,
    Weak,
    Deprecated,
    Misuse,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Safe => "safe",
            Severity::Indeterminate => "indeterminate",
            Severity::Weak => "weak",
            Severity::Deprecated => "deprecated",
            Severity::Misuse => "misuse",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Verdict {
    pub construction_id: ConstructionId,
    /// `None` only for constructions the registry does not know
    #[serde(skip_serializing_if = "Option::is_none")]
    pub family: Option<Family>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub library: Option<String>,
    /// Registry confidence in the construction match
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<Confidence>,
    pub severity: Severity,
    pub reasons: Vec<String>,
    pub location: Location,
}

impl Verdict {
    pub fn is_safe(&self) -> bool {
        self.severity == Severity::Safe
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_priority() {
        assert!(Severity::Misuse > Severity::Deprecated);
        assert!(Severity::Deprecated > Severity::Weak);
        assert!(Severity::Weak > Severity::Indeterminate);
        assert!(Severity::Indeterminate > Severity::Safe);
    }

    #[test]
    fn test_severity_serde_names() {
        let json = serde_json::to_string(&Severity::Indeterminate).unwrap();
        assert_eq!(json, "\"indeterminate\"");
        let parsed: Severity = serde_json::from_str("\"misuse\"").unwrap();
        assert_eq!(parsed, Severity::Misuse);
        assert_eq!(Severity::Weak.to_string(), "weak");
    }
}
