use thiserror::Error;

use crate::api::errors::ApiError;
use crate::domain::stage::PipelineStage;
use crate::domain::types::EventId;

#[derive(Debug, Error, PartialEq)]
pub enum ServiceError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Event {0} is not on the board")]
    EventNotFound(EventId),

    #[error("Event {event_id} is not in stage {stage}")]
    StageMismatch {
        event_id: EventId,
        stage: PipelineStage,
    },

    /// The optimistic move was rejected; the board has been reloaded.
    #[error("Moving event {event_id} failed: {source}")]
    MoveFailed {
        event_id: EventId,
        source: ApiError,
    },

    #[error("Type constraint violation: {0}")]
    TypeConstraint(String),

    #[error("Export failed: {0}")]
    Export(String),
}

impl ServiceError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            ServiceError::Api(ApiError::Unauthorized)
                | ServiceError::MoveFailed {
                    source: ApiError::Unauthorized,
                    ..
                }
        )
    }

    pub fn is_retryable(&self) -> bool {
        match self {
            ServiceError::Api(err) | ServiceError::MoveFailed { source: err, .. } => {
                err.is_retryable()
            }
            _ => false,
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
