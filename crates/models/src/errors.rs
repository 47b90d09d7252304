use thiserror::Error;

/// Record-level errors raised before anything reaches a store.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("validation error: {0}")]
    Validation(String),
}
