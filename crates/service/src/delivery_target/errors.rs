use thiserror::Error;

use crate::errors::StoreError;

/// Business errors for delivery target workflows
#[derive(Debug, Error)]
pub enum TargetError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("delivery target {0} does not exist")]
    NotFound(String),
    #[error("delivery target {0} already exists")]
    AlreadyExists(String),
    #[error("project {0} does not exist")]
    ProjectNotFound(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl TargetError {
    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u32 {
        match self {
            TargetError::Validation(_) => 14000,
            TargetError::AlreadyExists(_) => 14001,
            TargetError::NotFound(_) => 14002,
            TargetError::ProjectNotFound(_) => 11002,
            TargetError::Store(_) => 14500,
        }
    }

    /// HTTP status a handler layer should answer with.
    pub fn http_status(&self) -> u16 {
        match self {
            TargetError::Validation(_) | TargetError::AlreadyExists(_) => 400,
            TargetError::NotFound(_) | TargetError::ProjectNotFound(_) => 404,
            TargetError::Store(_) => 500,
        }
    }
}

impl From<models::errors::ModelError> for TargetError {
    fn from(e: models::errors::ModelError) -> Self {
        match e {
            models::errors::ModelError::Validation(msg) => TargetError::Validation(msg),
        }
    }
}
