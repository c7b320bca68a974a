use derive_more::Display;
use reqwest::StatusCode;
use validator::ValidationErrors;

use crate::domain::acceptance::Rejection;

/// Failures reported by an [`ApiGateway`](crate::gateway::ApiGateway) call.
#[derive(Debug, Clone, Display, PartialEq, Eq)]
pub enum GatewayError {
    #[display("Network error: {_0}")]
    Network(String),

    #[display("Server rejected request ({status}): {message}")]
    Server { status: u16, message: String },

    #[display("Malformed response: {_0}")]
    Decode(String),

    #[display("Invalid request: {_0}")]
    InvalidRequest(String),

    #[display("Gateway configuration error: {_0}")]
    Config(String),
}

impl GatewayError {
    pub fn server(status: StatusCode, message: impl Into<String>) -> Self {
        GatewayError::Server {
            status: status.as_u16(),
            message: message.into(),
        }
    }

    /// Connection and timeout failures, as opposed to the backend answering with an error.
    pub fn is_transient(&self) -> bool {
        matches!(self, GatewayError::Network(_))
    }
}

impl std::error::Error for GatewayError {}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return GatewayError::Decode(err.to_string());
        }

        match err.status() {
            Some(status) => GatewayError::server(status, err.to_string()),
            None => GatewayError::Network(err.to_string()),
        }
    }
}

impl From<ValidationErrors> for GatewayError {
    fn from(errors: ValidationErrors) -> Self {
        let messages = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |e| {
                    let message = e
                        .message
                        .as_ref()
                        .map(|s| s.to_string())
                        .unwrap_or_else(|| "Invalid value".to_string());
                    format!("{}:{}", field, message)
                })
            })
            .collect::<Vec<_>>()
            .join(", ");

        GatewayError::InvalidRequest(messages)
    }
}

#[derive(Debug, Clone, Display, PartialEq, Eq)]
pub enum UploadError {
    #[display("No file selected")]
    NoFile,

    #[display("Upload already in progress")]
    Busy,

    #[display("File rejected: {_0}")]
    Rejected(Rejection),

    #[display("Upload location request failed: {_0}")]
    LocationRequest(GatewayError),

    #[display("Byte transfer failed: {_0}")]
    Transfer(GatewayError),
}

impl UploadError {
    /// True when the attempt never reached the network.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            UploadError::NoFile | UploadError::Busy | UploadError::Rejected(_)
        )
    }

    pub fn gateway_error(&self) -> Option<&GatewayError> {
        match self {
            UploadError::LocationRequest(e) | UploadError::Transfer(e) => Some(e),
            _ => None,
        }
    }
}

impl std::error::Error for UploadError {}
