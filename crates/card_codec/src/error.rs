use thiserror::Error;

/// A token could not be turned back into a document.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("malformed token: {reason}")]
    Malformed { reason: String },
}

impl DecodeError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::Malformed {
            reason: reason.into(),
        }
    }
}

/// A document cannot be represented as a token.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SerializeError {
    #[error("document cannot be encoded: {reason}")]
    Unrepresentable { reason: String },
}

impl SerializeError {
    pub(crate) fn unrepresentable(reason: impl Into<String>) -> Self {
        Self::Unrepresentable {
            reason: reason.into(),
        }
    }
}
