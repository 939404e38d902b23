use thiserror::Error;

use crate::repository::errors::RepositoryError;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors returned by service functions and matched on in route handlers.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("insufficient permissions")]
    Unauthorized,
    #[error("record not found")]
    NotFound,
    #[error("record already exists")]
    Conflict,
    #[error("{0}")]
    Form(String),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("repository error: {0}")]
    Repository(RepositoryError),
}

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => ServiceError::NotFound,
            RepositoryError::Conflict => ServiceError::Conflict,
            other => ServiceError::Repository(other),
        }
    }
}
