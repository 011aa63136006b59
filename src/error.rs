use serde::Deserialize;

/// Error body shape the backend uses for rejected requests (`{"message": ...}`).
#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    pub message: Option<String>,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("unauthorized")] Unauthorized,
    #[error("bad request")] BadRequest { message: Option<String> },
    #[error("not found")] NotFound,
    #[error("unexpected status {status}")] Status { status: u16, message: Option<String> },
    #[error("transport: {0}")] Transport(String),
    #[error("decode: {0}")] Decode(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// Classify a non-success status. `body` is the raw response text, if any.
    pub fn from_status(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<ApiErrorBody>(body)
            .ok()
            .and_then(|b| b.message)
            .filter(|m| !m.trim().is_empty());
        match status {
            401 => ApiError::Unauthorized,
            400 => ApiError::BadRequest { message },
            404 => ApiError::NotFound,
            _ => ApiError::Status { status, message },
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized)
    }

    /// Server supplied message, when the error body carried one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::BadRequest { message } | ApiError::Status { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ApiError::Decode(e.to_string())
        } else {
            ApiError::Transport(e.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::Decode(e.to_string())
    }
}
