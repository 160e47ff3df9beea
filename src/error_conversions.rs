//! Error conversion glue between the domain, API and service layers.
//!
//! The domain layer must not depend on service error types, so the
//! conversions live here.

use crate::domain::types::TypeConstraintError;
use crate::services::errors::ServiceError;

impl From<TypeConstraintError> for ServiceError {
    fn from(val: TypeConstraintError) -> Self {
        ServiceError::TypeConstraint(val.to_string())
    }
}

impl From<csv::Error> for ServiceError {
    fn from(val: csv::Error) -> Self {
        ServiceError::Export(val.to_string())
    }
}

impl From<std::io::Error> for ServiceError {
    fn from(val: std::io::Error) -> Self {
        ServiceError::Export(val.to_string())
    }
}
