use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClaimTreeError {
    #[error("Found invalid address: {0}")]
    InvalidAccount(String),

    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    #[error("Invalid amount for {key}: {reason}")]
    InvalidAmount { key: String, reason: String },

    #[error("Duplicate entry: {0}")]
    DuplicateEntry(String),

    #[error("Leaf index {index} out of range for tree of {len} leaves")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Invalid proof format: {0}")]
    InvalidProofFormat(String),

    #[error("Expected non-zero number of entries")]
    EmptyInputSet,

    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error("JSON error: {0}")]
    Json(String),
}

impl From<serde_json::Error> for ClaimTreeError {
    fn from(err: serde_json::Error) -> Self {
        ClaimTreeError::Json(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ClaimTreeError>;

#[inline]
pub(crate) fn invalid_amount<K: Into<String>, R: Into<String>>(key: K, reason: R) -> ClaimTreeError {
    ClaimTreeError::InvalidAmount {
        key: key.into(),
        reason: reason.into(),
    }
}
