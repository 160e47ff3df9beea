use thiserror::Error;

/// Failures of the durable preference storage. Callers of
/// [`super::PreferencePersistence`] never see these; they are logged and
/// swallowed.
#[derive(Debug, Error)]
pub enum PreferenceError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Connection error: {0}")]
    Connection(String),
}

pub type PreferenceResult<T> = Result<T, PreferenceError>;

impl From<serde_json::Error> for PreferenceError {
    fn from(err: serde_json::Error) -> Self {
        PreferenceError::Serialization(err.to_string())
    }
}

#[cfg(feature = "client")]
impl From<diesel::result::Error> for PreferenceError {
    fn from(err: diesel::result::Error) -> Self {
        PreferenceError::Storage(err.to_string())
    }
}

#[cfg(feature = "client")]
impl From<diesel::r2d2::PoolError> for PreferenceError {
    fn from(err: diesel::r2d2::PoolError) -> Self {
        PreferenceError::Connection(format!("Connection error: {err}"))
    }
}
