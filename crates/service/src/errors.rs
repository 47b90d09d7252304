use thiserror::Error;

/// Failures reported by a document store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record not exist")]
    RecordNotExist,
    #[error("record already exist")]
    RecordExist,
    #[error("cannot decode {kind}/{key}: {reason}")]
    Decode { kind: String, key: String, reason: String },
    #[error("cannot encode record: {0}")]
    Encode(String),
    #[error("store backend error: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn backend(e: impl std::fmt::Display) -> Self { Self::Backend(e.to_string()) }

    pub fn is_not_exist(&self) -> bool { matches!(self, Self::RecordNotExist) }
}
