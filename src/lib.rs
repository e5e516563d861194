/// Crypto Verdict
///
/// Classifies normalized cryptographic call sites against a security
/// taxonomy: a static registry of constructions, a schema-driven parameter
/// extractor, a rule-based classifier and a run-local findings aggregator.
pub mod callsite;
pub mod classifier;
pub mod engine;
pub mod error;
pub mod extractor;
pub mod findings;
pub mod logging;
pub mod registry;
mod utils;

pub use callsite::{ArgumentValue, CallSite, Confidence, Literal, Location};
pub use classifier::{Classifier, RulesClassifier, Severity, Verdict};
pub use engine::{Engine, Evaluation};
pub use error::{Error, Result};
pub use extractor::{ExtractedParameters, ParamValue};
pub use findings::{Aggregator, Finding};
pub use registry::{ConstructionId, Family, Registry, RegistryEntry};
