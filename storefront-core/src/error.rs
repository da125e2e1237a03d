use thiserror::Error;

/// Client-side rejection of a draft before anything is sent.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("{field} is required")]
    Required { field: String },
    #[error("{field} must be a non-negative number, got '{input}'")]
    InvalidNumber { field: String, input: String },
    #[error("unknown field: {0}")]
    UnknownField(String),
    #[error("unknown payment provider: {0}")]
    UnknownProvider(String),
    #[error("at least one color is required")]
    MissingColors,
    #[error("value does not fit field {field}")]
    TypeMismatch { field: String },
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("{collection}/{id} not found")]
    NotFound { collection: &'static str, id: String },
    #[error("Server error: {status} {message}")]
    ServerError { status: u16, message: String },
    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),
    #[error("Malformed response: {0}")]
    Decode(String),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(err.to_string())
    }
}

/// Misuse of the edit session, e.g. committing while nothing is being edited.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SessionError {
    #[error("cannot {event} while {state}")]
    InvalidTransition {
        state: &'static str,
        event: &'static str,
    },
    #[error("a confirmation is already pending")]
    GateOpen,
    #[error("no resource with id '{0}' in this list")]
    UnknownTarget(String),
    #[error("confirmation ticket does not belong to the pending action")]
    StaleTicket,
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GateError {
    #[error("confirmation gate is already open: {0}")]
    AlreadyOpen(String),
    #[error("confirmation ticket was not issued by the open gate")]
    StaleTicket,
}

impl From<GateError> for SessionError {
    fn from(err: GateError) -> Self {
        match err {
            GateError::AlreadyOpen(_) => SessionError::GateOpen,
            GateError::StaleTicket => SessionError::StaleTicket,
        }
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
