//! Provisioning errors.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProvisionError {
    /// Could not reach the backend at all.
    #[error("provisioning backend unavailable: {0}")]
    Unavailable(String),

    /// A backend call was refused or failed.
    #[error("{operation} '{resource}' failed: {detail}")]
    Operation {
        operation: &'static str,
        resource: String,
        detail: String,
    },

    /// The referenced network or node does not exist.
    #[error("{kind} '{name}' not found")]
    NotFound { kind: &'static str, name: String },
}

impl ProvisionError {
    pub(crate) fn operation(
        operation: &'static str,
        resource: impl Into<String>,
        detail: impl ToString,
    ) -> Self {
        Self::Operation {
            operation,
            resource: resource.into(),
            detail: detail.to_string(),
        }
    }
}
