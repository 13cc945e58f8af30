use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("{message}")]
    Status { status: u16, message: String },
    #[error("unexpected response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Text shown to the user. Server-provided messages win over the fallback.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ApiError::Status { message, .. } if !message.is_empty() => message.clone(),
            _ => fallback.to_string(),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Transport(err.to_string())
        }
    }
}
