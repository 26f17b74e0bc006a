use std::fmt::{Display, Formatter};

/// Errors surfaced by the amendment pipelines.
///
/// All of these are fail-fast: nothing is retried and no fallback document
/// is produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AmendError {
    /// A security scheme was registered under a name already present in the
    /// document's scheme map. Names compare case-insensitively.
    DuplicateSchemeName(String),
    /// A cancellation signal was observed mid-transformation. Mutation up to
    /// the cancellation point is left in place.
    Cancelled(String),
    /// The host did not supply a document for the requested document name.
    MissingDocument(String),
}

impl AmendError {
    pub fn duplicate_scheme_name(name: impl Into<String>) -> Self {
        Self::DuplicateSchemeName(name.into())
    }

    pub fn cancelled(msg: impl Into<String>) -> Self {
        Self::Cancelled(msg.into())
    }

    pub fn missing_document(document_name: impl Into<String>) -> Self {
        Self::MissingDocument(document_name.into())
    }
}

impl Display for AmendError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            AmendError::DuplicateSchemeName(name) => {
                write!(f, "Duplicate security scheme name: {}", name)
            }
            AmendError::Cancelled(msg) => {
                write!(f, "Cancelled: {}", msg)
            }
            AmendError::MissingDocument(document_name) => {
                write!(f, "No document supplied for document name: {}", document_name)
            }
        }
    }
}

impl std::error::Error for AmendError {}
