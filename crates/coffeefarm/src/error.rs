use std::path::PathBuf;
use thiserror::Error;

use crate::models::FaceAngle;
use crate::screens::FormErrors;

#[derive(Error, Debug)]
pub enum CoffeeFarmError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Api(#[from] ApiError),

    #[error("Image error: {0}")]
    Image(#[from] ImageError),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("Secret error: {0}")]
    Secret(#[from] crate::secrets::SecretError),

    #[error("{0}")]
    Flow(#[from] FlowError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config YAML: {0}")]
    ParseYaml(#[from] serde_yaml::Error),

    #[error("Config validation failed: {message}")]
    Validation { message: String },
}

/// How a failed request is surfaced to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The server answered with an error status.
    ServerRejected,
    /// The request never produced a usable response.
    Transport,
}

#[derive(Error, Debug)]
pub enum ApiError {
    /// `detail` is the reason the server sent in its JSON error body, if
    /// any. Raw bodies never land here.
    #[error("Server rejected request ({status}){}", detail_suffix(.detail))]
    Rejected {
        status: u16,
        detail: Option<String>,
    },

    #[error("Network request failed: {0}")]
    Transport(String),

    #[error("Failed to decode response from {endpoint}: {message}")]
    Decode { endpoint: String, message: String },

    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ApiError {
    pub fn kind(&self) -> FailureKind {
        match self {
            ApiError::Rejected { .. } => FailureKind::ServerRejected,
            _ => FailureKind::Transport,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Message shown to the user: the server's detail when it sent one,
    /// the transport message otherwise, `fallback` when neither says anything.
    pub fn user_message(&self, fallback: &str) -> String {
        let message = match self {
            ApiError::Rejected { detail, .. } => {
                detail.as_deref().unwrap_or_default().trim().to_string()
            }
            ApiError::Transport(message) => message.trim().to_string(),
            _ => String::new(),
        };
        if message.is_empty() {
            fallback.to_string()
        } else {
            message
        }
    }
}

fn detail_suffix(detail: &Option<String>) -> String {
    detail
        .as_deref()
        .map(|d| format!(": {}", d))
        .unwrap_or_default()
}

#[derive(Error, Debug)]
pub enum ImageError {
    #[error("Failed to read image '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Image is empty")]
    Empty,

    #[error("Unsupported image format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid data URI: {0}")]
    InvalidDataUri(String),
}

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Not logged in")]
    NotAuthenticated,

    #[error("Failed to read session file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write session file '{path}': {source}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Corrupt session file: {0}")]
    Corrupt(String),

    #[error("Session token could not be encrypted: {0}")]
    Encrypt(String),

    #[error("Session token could not be decrypted: {0}")]
    Decrypt(String),
}

/// Errors that end a screen's action handler.
#[derive(Error, Debug)]
pub enum FlowError {
    /// A backend call failed; `message` is what the user sees.
    #[error("{message}")]
    Api {
        message: String,
        #[source]
        source: ApiError,
    },

    #[error("{0}")]
    Validation(#[from] FormErrors),

    #[error("{0}")]
    NotVerified(String),

    /// The server answered but declined the action.
    #[error("{0}")]
    Declined(String),

    #[error("Verification did not identify a farmer")]
    MissingFarmerId,

    #[error("No active check-in found for this farmer")]
    NoActiveCheckIn { farmer_id: String },

    #[error("Please capture all three angles (missing: {})", format_angles(.missing))]
    IncompleteEnrollment { missing: Vec<FaceAngle> },

    #[error("{0}")]
    InvalidState(String),
}

impl FlowError {
    /// Wraps a failed backend call, preferring the server's reason over
    /// `fallback`.
    pub fn api(source: ApiError, fallback: &str) -> Self {
        FlowError::Api {
            message: source.user_message(fallback),
            source,
        }
    }

    /// The underlying API error, if this failure came from the backend.
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            FlowError::Api { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ApiError> for FlowError {
    fn from(source: ApiError) -> Self {
        FlowError::api(source, "An error occurred")
    }
}

fn format_angles(angles: &[FaceAngle]) -> String {
    angles
        .iter()
        .map(|a| a.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

pub type Result<T> = std::result::Result<T, CoffeeFarmError>;
