//! Application error taxonomy.
//!
//! Four classes of failure, mirroring how they are surfaced:
//! - validation errors: caught before any network call, field-level
//! - API errors: transport, server-reported, unauthorized
//! - upload errors: pre-flight rejections plus wrapped API failures
//! - workflow errors: stage-machine misuse (wrong stage, double submit)
//!
//! Nothing here is fatal to the process; every failure is scoped to the
//! action that triggered it.

use thiserror::Error;

/// Top-level application error.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("upload error: {0}")]
    Upload(#[from] UploadError),

    #[error("workflow error: {0}")]
    Workflow(#[from] WorkflowError),

    #[error("file error: {0}")]
    File(#[from] FileError),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

/// Client-side validation failure, surfaced inline before any request.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field} must not be empty")]
    EmptyField { field: &'static str },

    #[error("option {index} must not be empty")]
    EmptyOption { index: usize },

    #[error("correct option index {index} is out of range (have {option_count} options)")]
    CorrectOptionOutOfRange { index: usize, option_count: usize },

    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        min: i64,
        max: i64,
        value: i64,
    },

    #[error("{field}: {message}")]
    Invalid { field: &'static str, message: String },
}

/// Failure talking to the backend API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network/transport failure. Always retryable.
    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// Non-2xx response carrying (when present) the server's own message.
    #[error("{endpoint} returned {status}: {message:?}")]
    Server {
        endpoint: String,
        status: u16,
        message: Option<String>,
    },

    /// 401 from any endpoint. The session has already been expired by the
    /// time this surfaces.
    #[error("session expired or missing (401 from {endpoint})")]
    Unauthorized { endpoint: String },

    /// 2xx body that does not match the expected shape.
    #[error("unexpected response from {endpoint}: {source}")]
    UnexpectedResponse {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ApiError {
    /// User-facing message, per the surfacing policy: server-reported
    /// business errors verbatim when available, generic transient text
    /// otherwise.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Transport { .. } => {
                "Network error. Please check your connection and try again.".to_string()
            }
            ApiError::Server {
                message: Some(msg), ..
            } => msg.clone(),
            ApiError::Server { .. } | ApiError::UnexpectedResponse { .. } => {
                "Something went wrong. Please try again.".to_string()
            }
            ApiError::Unauthorized { .. } => {
                "Your session has expired. Please log in again.".to_string()
            }
        }
    }

    /// True for errors where retrying the same call can succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ApiError::Transport { .. } | ApiError::Server { .. })
    }
}

/// Upload adapter failure.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("refusing to upload an empty file")]
    EmptyFile,

    #[error("no test id: the draft must be created before uploading")]
    MissingTestId,

    #[error(transparent)]
    Api(#[from] ApiError),
}

impl UploadError {
    pub fn user_message(&self) -> String {
        match self {
            UploadError::EmptyFile => "The selected file is empty.".to_string(),
            UploadError::MissingTestId => "Create the test before uploading files.".to_string(),
            UploadError::Api(e) => e.user_message(),
        }
    }
}

/// Stage-machine misuse or precondition failure.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WorkflowError {
    #[error("operation not valid at stage {actual}, expected stage {expected}")]
    WrongStage { expected: u8, actual: u8 },

    /// A call for this flow is already in flight. The triggering control
    /// should have been disabled; refusing keeps the no-double-submit
    /// invariant even if it was not.
    #[error("another operation is already in flight")]
    Busy,

    #[error("no created test id")]
    MissingTestId,

    #[error("at least one question is required before this step")]
    NoQuestions,

    #[error("no pending payment order")]
    NoPendingOrder,

    #[error("resend is still on cooldown")]
    CooldownActive,

    #[error("already at the first stage")]
    AtFirstStage,
}

/// Filesystem failure on the CLI side (draft folder scanning, log file).
#[derive(Debug, Error)]
pub enum FileError {
    #[error("folder not found: {path}")]
    FolderNotFound { path: String },

    #[error("failed to read {path}: {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} is required but not set")]
    MissingVar { var: &'static str },

    #[error("{var}={value} cannot be parsed as {expected}")]
    BadVar {
        var: &'static str,
        value: String,
        expected: &'static str,
    },
}

impl AppError {
    /// User-facing message for any error class, per the surfacing policy.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Validation(e) => e.to_string(),
            AppError::Api(e) => e.user_message(),
            AppError::Upload(e) => e.user_message(),
            AppError::Workflow(e) => e.to_string(),
            AppError::File(e) => e.to_string(),
            AppError::Config(e) => e.to_string(),
        }
    }
}

// Convenience constructors for the common cases.

impl ApiError {
    pub fn transport(endpoint: impl Into<String>, source: reqwest::Error) -> Self {
        ApiError::Transport {
            endpoint: endpoint.into(),
            source,
        }
    }

    pub fn server(endpoint: impl Into<String>, status: u16, message: Option<String>) -> Self {
        ApiError::Server {
            endpoint: endpoint.into(),
            status,
            message,
        }
    }
}

impl FileError {
    pub fn read_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        FileError::ReadFailed {
            path: path.into(),
            source,
        }
    }
}

/// Application result type.
pub type AppResult<T> = std::result::Result<T, AppError>;
