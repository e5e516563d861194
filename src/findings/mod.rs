//! Run-local aggregation of verdicts into deduplicated findings.

use serde::Serialize;
use sha2::{Digest, Sha256};
use std::cmp::Reverse;
use std::collections::BTreeMap;
use tracing::trace;

use crate::callsite::{CallSite, Location};
use crate::classifier::{Severity, Verdict};
use crate::extractor::{ExtractedParameters, ParamValue};
use crate::registry::ConstructionId;

/// Deduplication key: construction plus its canonical parameter set.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FindingKey {
    pub construction_id: ConstructionId,
    pub parameters: String,
}

impl FindingKey {
    pub fn new(construction_id: ConstructionId, params: &ExtractedParameters) -> Self {
        Self {
            construction_id,
            parameters: params.canonical(),
        }
    }

    /// Hex SHA-256 of the key, stable across runs and machines.
    pub fn stable_id(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.construction_id.as_str().as_bytes());
        hasher.update(b"|");
        hasher.update(self.parameters.as_bytes());
        hex::encode(hasher.finalize())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Finding {
    /// Derived from the deduplication key, independent of location
    pub id: String,
    pub count: usize,
    /// Representative location, the first occurrence seen
    pub location: Location,
    pub verdict: Verdict,
    pub parameters: BTreeMap<String, ParamValue>,
}

impl Finding {
    pub fn severity(&self) -> Severity {
        self.verdict.severity
    }

    pub fn construction_id(&self) -> &ConstructionId {
        &self.verdict.construction_id
    }
}

/// Collects verdicts for one scan run. Not shared between runs; parallel
/// workers each own one and [`Aggregator::merge`] them at the end.
#[derive(Debug, Default)]
pub struct Aggregator {
    findings: BTreeMap<FindingKey, Finding>,
    calls: usize,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, verdict: Verdict, call: &CallSite, params: &ExtractedParameters) {
        self.calls += 1;
        let key = FindingKey::new(verdict.construction_id.clone(), params);

        match self.findings.get_mut(&key) {
            Some(finding) => {
                finding.count += 1;
                trace!(id = %key.construction_id, count = finding.count, "duplicate finding");
            }
            None => {
                let id = key.stable_id();
                self.findings.insert(
                    key,
                    Finding {
                        id,
                        count: 1,
                        location: call.location.clone(),
                        verdict,
                        parameters: params.values.clone(),
                    },
                );
            }
        }
    }

    /// Folds another run-local aggregator into this one. On key collision the
    /// counts add up and the smaller location stays representative, so the
    /// result does not depend on merge order.
    pub fn merge(&mut self, other: Aggregator) {
        self.calls += other.calls;
        for (key, incoming) in other.findings {
            match self.findings.get_mut(&key) {
                Some(existing) => {
                    existing.count += incoming.count;
                    if incoming.location < existing.location {
                        existing.location = incoming.location;
                        existing.verdict = incoming.verdict;
                    }
                }
                None => {
                    self.findings.insert(key, incoming);
                }
            }
        }
    }

    /// Findings by descending severity, then ascending location.
    pub fn report(&self) -> Vec<Finding> {
        let mut findings: Vec<Finding> = self.findings.values().cloned().collect();
        findings.sort_by(|a, b| {
            (Reverse(a.severity()), &a.location, a.construction_id()).cmp(&(
                Reverse(b.severity()),
                &b.location,
                b.construction_id(),
            ))
        });
        findings
    }

    pub fn into_report(self) -> Vec<Finding> {
        self.report()
    }

    /// Number of distinct findings.
    pub fn len(&self) -> usize {
        self.findings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.findings.is_empty()
    }

    /// Number of call sites added, duplicates included.
    pub fn call_count(&self) -> usize {
        self.calls
    }
}
