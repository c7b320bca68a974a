use bytes::Bytes;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A file the user picked but has not uploaded yet.
///
/// The content is a shared handle; cloning a `CandidateFile` never copies the bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateFile {
    name: String,
    size: u64,
    content_type: String,
    content: Bytes,
}

impl CandidateFile {
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, content: impl Into<Bytes>) -> Self {
        let content = content.into();
        CandidateFile {
            name: name.into(),
            size: content.len() as u64,
            content_type: content_type.into(),
            content,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    /// Declared MIME type, empty when the picker could not tell.
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn content(&self) -> Bytes {
        self.content.clone()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadSessionState {
    NoFile,
    FileSelected(CandidateFile),
    Uploading(CandidateFile),
}

impl UploadSessionState {
    pub fn file(&self) -> Option<&CandidateFile> {
        match self {
            UploadSessionState::NoFile => None,
            UploadSessionState::FileSelected(file) | UploadSessionState::Uploading(file) => Some(file),
        }
    }
}

/// Where a submission currently is in the two-step upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UploadPhase {
    #[default]
    Idle,
    Validating,
    RequestingLocation,
    Transferring,
    Settled,
}

impl UploadPhase {
    pub fn is_busy(&self) -> bool {
        matches!(self, UploadPhase::RequestingLocation | UploadPhase::Transferring)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UploadUrlRequest {
    #[validate(length(min = 1, max = 255, message = "File name must be 1-255 characters"))]
    pub file_name: String,

    #[validate(length(min = 1, message = "Content type is required"))]
    pub content_type: String,
}

impl From<&CandidateFile> for UploadUrlRequest {
    fn from(file: &CandidateFile) -> Self {
        UploadUrlRequest {
            file_name: file.name().to_string(),
            content_type: file.content_type().to_string(),
        }
    }
}

/// One-time write location handed out by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UploadLocation {
    #[serde(rename = "uploadUrl")]
    pub write_location: String,

    #[serde(rename = "key")]
    pub storage_key: String,

    #[serde(rename = "imageId", default, skip_serializing_if = "Option::is_none")]
    pub image_id: Option<String>,
}

/// Broadcast after a file has been fully transferred.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedEvent {
    pub file_name: String,
    pub storage_key: String,
    pub image_id: Option<String>,
}
