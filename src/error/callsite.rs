use thiserror::Error;

/// Raised when the normalizer hands over a record that breaks its contract.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CallSiteError {
    #[error("malformed call site: {field} {message}")]
    MalformedCallSite { field: String, message: String },
}

impl CallSiteError {
    pub fn malformed(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedCallSite {
            field: field.into(),
            message: message.into(),
        }
    }
}
