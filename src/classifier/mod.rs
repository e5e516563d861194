mod rules;
mod verdict;

pub use verdict::{Severity, Verdict};

use tracing::{debug, trace};

use crate::callsite::Location;
use crate::extractor::ExtractedParameters;
use crate::registry::{ConstructionId, RegistryEntry};
use rules::RuleOutcome;

pub const UNRECOGNIZED_REASON: &str = "unrecognized construction";

pub trait Classifier: Send + Sync {
    fn classify(
        &self,
        id: &ConstructionId,
        params: &ExtractedParameters,
        entry: &RegistryEntry,
        location: &Location,
    ) -> Verdict;

    /// Verdict for a call site the registry has no entry for.
    fn unrecognized(&self, name: &str, location: &Location) -> Verdict {
        debug!(name, %location, "unrecognized construction");
        Verdict {
            construction_id: ConstructionId::unrecognized(name),
            family: None,
            library: None,
            confidence: None,
            severity: Severity::Indeterminate,
            reasons: vec![UNRECOGNIZED_REASON.to_string()],
            location: location.clone(),
        }
    }
}

/// Evaluates a registry entry's baseline rules against extracted parameters.
///
/// Reasons are, in order: extraction notes, one entry per required role that
/// is unknown, then the reason of the first violated rule. Evaluation stops at
/// that first violation.
pub struct RulesClassifier;

impl Default for RulesClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl RulesClassifier {
    pub fn new() -> Self {
        Self
    }
}

impl Classifier for RulesClassifier {
    fn classify(
        &self,
        id: &ConstructionId,
        params: &ExtractedParameters,
        entry: &RegistryEntry,
        location: &Location,
    ) -> Verdict {
        let mut reasons = params.notes.clone();

        let mut unresolved = false;
        for rule in entry.ordered_rules() {
            for role in rules::unresolved_roles(rule, params) {
                let reason = format!("required parameter unresolved: {role}");
                if !reasons.contains(&reason) {
                    reasons.push(reason);
                }
                unresolved = true;
            }
        }

        let mut violation = None;
        for rule in entry.ordered_rules() {
            match rules::evaluate(rule, params) {
                RuleOutcome::Pass | RuleOutcome::Unresolved => {}
                RuleOutcome::Violated(reason) => {
                    reasons.push(reason);
                    violation = Some(rule.severity());
                    break;
                }
            }
        }

        let floor = if unresolved {
            Severity::Indeterminate
        } else {
            Severity::Safe
        };
        let severity = violation.map_or(floor, |severity| severity.max(floor));

        trace!(%id, %severity, reasons = reasons.len(), "classified");
        Verdict {
            construction_id: id.clone(),
            family: Some(entry.family),
            library: entry.library.clone(),
            confidence: Some(entry.confidence),
            severity,
            reasons,
            location: location.clone(),
        }
    }
}

/// Convenience wrapper around [`RulesClassifier`].
pub fn classify(
    id: &ConstructionId,
    params: &ExtractedParameters,
    entry: &RegistryEntry,
    location: &Location,
) -> Verdict {
    RulesClassifier::new().classify(id, params, entry, location)
}
