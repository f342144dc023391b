#![forbid(unsafe_code)]

use crate::ids::RecordId;
use thiserror::Error;

/// Failure raised by a [`SynchronizeCallback`](super::SynchronizeCallback).
pub type CallbackError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("metadata needs to be attached to a task: {fields}")]
    MissingTask { fields: String },
}

#[derive(Debug, Error)]
pub enum ServiceError<E>
where
    E: std::error::Error + 'static,
{
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("store: {0}")]
    Store(#[source] E),
    #[error("store returned a metadata record without an id")]
    MissingId,
    #[error("before-delete callback failed for record {id}: {source}")]
    Callback {
        id: RecordId,
        #[source]
        source: CallbackError,
    },
}

impl<E> ServiceError<E>
where
    E: std::error::Error + 'static,
{
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    pub fn store_error(&self) -> Option<&E> {
        match self {
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}
