//! Scan driver surface: registry lookup, extraction, classification and
//! aggregation wired together.
//!
//! Everything here is pure computation over normalized call sites. The only
//! error surfaced to callers is a malformed call site; every valid call site
//! ends up as exactly one verdict.

use rayon::prelude::*;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::callsite::CallSite;
use crate::classifier::{Classifier, RulesClassifier, Verdict};
use crate::error::{CallSiteError, Result};
use crate::extractor::{ExtractedParameters, Extractor};
use crate::findings::{Aggregator, Finding};
use crate::registry::Registry;

/// Result of evaluating a single call site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    pub verdict: Verdict,
    pub parameters: ExtractedParameters,
}

pub struct Engine {
    registry: Arc<Registry>,
    extractor: Extractor,
    classifier: Box<dyn Classifier>,
}

impl Engine {
    pub fn new(registry: Arc<Registry>) -> Self {
        Self {
            registry,
            extractor: Extractor::new(),
            classifier: Box::new(RulesClassifier::new()),
        }
    }

    /// Engine over the registry compiled into the crate.
    pub fn bundled() -> Result<Self> {
        Ok(Self::new(Arc::new(Registry::bundled()?)))
    }

    pub fn with_classifier<C: Classifier + 'static>(mut self, classifier: C) -> Self {
        self.classifier = Box::new(classifier);
        self
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn evaluate(&self, call: &CallSite) -> std::result::Result<Evaluation, CallSiteError> {
        if let Err(e) = call.validate() {
            warn!(construction = %call.construction, error = %e, "rejecting call site");
            return Err(e);
        }

        let evaluation = match self
            .registry
            .lookup(&call.construction, call.argument_count())
        {
            Some(entry) => {
                let parameters = self.extractor.extract(call, entry);
                let verdict =
                    self.classifier
                        .classify(&entry.id, &parameters, entry, &call.location);
                Evaluation {
                    verdict,
                    parameters,
                }
            }
            None => Evaluation {
                verdict: self
                    .classifier
                    .unrecognized(&call.construction, &call.location),
                parameters: ExtractedParameters::default(),
            },
        };
        Ok(evaluation)
    }

    /// Evaluates `call` and folds the verdict into `aggregator`.
    pub fn add_to(
        &self,
        call: &CallSite,
        aggregator: &mut Aggregator,
    ) -> std::result::Result<(), CallSiteError> {
        let Evaluation {
            verdict,
            parameters,
        } = self.evaluate(call)?;
        aggregator.add(verdict, call, &parameters);
        Ok(())
    }

    /// Scans one unit of call sites into an ordered report.
    pub fn scan<I>(&self, calls: I) -> Result<Vec<Finding>>
    where
        I: IntoIterator<Item = CallSite>,
    {
        let mut aggregator = Aggregator::new();
        for call in calls {
            self.add_to(&call, &mut aggregator)?;
        }
        debug!(
            calls = aggregator.call_count(),
            findings = aggregator.len(),
            "scan complete"
        );
        Ok(aggregator.into_report())
    }

    /// Scans independent units in parallel, one aggregator per unit, merged
    /// afterwards. A malformed call site fails the scan; when several units
    /// contain one, the error from the earliest unit is returned.
    pub fn scan_units(&self, units: &[Vec<CallSite>]) -> Result<Vec<Finding>> {
        let partials: Vec<std::result::Result<Aggregator, CallSiteError>> = units
            .par_iter()
            .map(|unit| {
                let mut aggregator = Aggregator::new();
                for call in unit {
                    self.add_to(call, &mut aggregator)?;
                }
                Ok(aggregator)
            })
            .collect();

        let mut merged = Aggregator::new();
        for partial in partials {
            merged.merge(partial?);
        }
        debug!(
            units = units.len(),
            calls = merged.call_count(),
            findings = merged.len(),
            "parallel scan complete"
        );
        Ok(merged.into_report())
    }
}
