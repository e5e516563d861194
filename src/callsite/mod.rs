mod value;

pub use value::{ArgumentValue, Confidence, Literal};

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CallSiteError;

/// Source position of a call site. Never interpreted beyond ordering.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Location {
    pub file: String,
    pub line: usize,
    pub column: usize,
}

impl Location {
    pub fn new(file: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            file: file.into(),
            line,
            column,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

/// One invocation of a cryptographic API, as produced by the normalizer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallSite {
    /// Qualified construction name candidate, e.g. `pbkdf2.Key`
    pub construction: String,
    #[serde(default)]
    pub arguments: Vec<ArgumentValue>,
    pub location: Location,
}

impl CallSite {
    pub fn new(
        construction: impl Into<String>,
        arguments: Vec<ArgumentValue>,
        location: Location,
    ) -> Self {
        Self {
            construction: construction.into(),
            arguments,
            location,
        }
    }

    pub fn argument_count(&self) -> usize {
        self.arguments.len()
    }

    pub fn argument(&self, position: usize) -> Option<&ArgumentValue> {
        self.arguments.get(position)
    }

    /// Rejects records missing the structural fields the engine relies on.
    pub fn validate(&self) -> Result<(), CallSiteError> {
        if self.construction.trim().is_empty() {
            return Err(CallSiteError::malformed("construction", "must not be empty"));
        }
        if self.location.file.trim().is_empty() {
            return Err(CallSiteError::malformed("location.file", "must not be empty"));
        }
        if self.location.line == 0 {
            return Err(CallSiteError::malformed("location.line", "must be 1-based"));
        }
        Ok(())
    }
}
