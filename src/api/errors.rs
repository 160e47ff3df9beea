use thiserror::Error;

/// Failures reported by the remote CRM API.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ApiError {
    #[error("Transport error: {0}")]
    Transport(String),

    /// 4xx response carrying a server message.
    #[error("Validation error ({status}): {message}")]
    Validation { status: u16, message: String },

    /// 401 on a request other than the login attempt.
    #[error("Authentication required")]
    Unauthorized,

    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("Unexpected response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Transport and server failures are worth retrying as-is; validation
    /// and authorization failures need the user to act first.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ApiError::Transport(_) | ApiError::Server { .. } | ApiError::Decode(_)
        )
    }

    /// Message suitable for a toast shown to the user.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Transport(_) => "No se pudo conectar con el servidor".to_string(),
            ApiError::Validation { message, .. } => message.clone(),
            ApiError::Unauthorized => "La sesión expiró, ingresá nuevamente".to_string(),
            ApiError::Server { .. } | ApiError::Decode(_) => {
                "Error inesperado del servidor".to_string()
            }
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(feature = "client")]
impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(err.to_string())
    }
}
