use std::collections::HashSet;
use std::fmt;

use crate::constants::{ALLOWED_CONTENT_TYPE_SET, MAX_UPLOAD_BYTES};
use crate::entities::upload::CandidateFile;
use crate::presenters::format_bytes;

/// Why a selected file cannot be uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    UnsupportedType(String),
    Empty,
    TooLarge { max_bytes: u64 },
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::UnsupportedType(content_type) if content_type.is_empty() => {
                write!(f, "Unsupported format: unknown")
            }
            Rejection::UnsupportedType(content_type) => {
                write!(f, "Unsupported format: {}", content_type)
            }
            Rejection::Empty => write!(f, "File is empty"),
            Rejection::TooLarge { max_bytes } => {
                write!(f, "File is too large. Max: {}", format_bytes(*max_bytes))
            }
        }
    }
}

/// Outcome of evaluating the current selection.
///
/// `NoFile` is kept apart from `Rejected` so the UI can tell "nothing chosen"
/// from "chosen but unusable".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Acceptance {
    NoFile,
    Accepted,
    Rejected(Rejection),
}

impl Acceptance {
    pub fn is_acceptable(&self) -> bool {
        matches!(self, Acceptance::Accepted)
    }

    /// User-facing reason, only present for an actual rejection.
    pub fn reason(&self) -> Option<String> {
        match self {
            Acceptance::Rejected(rejection) => Some(rejection.to_string()),
            _ => None,
        }
    }

    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            Acceptance::Rejected(rejection) => Some(rejection),
            _ => None,
        }
    }
}

/// Type and size rules for candidate uploads.
#[derive(Debug, Clone)]
pub struct FileAcceptancePolicy {
    allowed_types: HashSet<String>,
    max_bytes: u64,
}

impl Default for FileAcceptancePolicy {
    fn default() -> Self {
        FileAcceptancePolicy {
            allowed_types: ALLOWED_CONTENT_TYPE_SET
                .iter()
                .map(|t| t.to_string())
                .collect(),
            max_bytes: MAX_UPLOAD_BYTES,
        }
    }
}

impl FileAcceptancePolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rules run in order: content type, then empty, then size limit.
    /// The first failing rule wins.
    pub fn evaluate(&self, file: Option<&CandidateFile>) -> Acceptance {
        let Some(file) = file else {
            return Acceptance::NoFile;
        };

        if !self.allowed_types.contains(file.content_type()) {
            return Acceptance::Rejected(Rejection::UnsupportedType(
                file.content_type().to_string(),
            ));
        }

        if file.size() == 0 {
            return Acceptance::Rejected(Rejection::Empty);
        }

        if file.size() > self.max_bytes {
            return Acceptance::Rejected(Rejection::TooLarge {
                max_bytes: self.max_bytes,
            });
        }

        Acceptance::Accepted
    }
}
