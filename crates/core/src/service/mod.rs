#![forbid(unsafe_code)]

mod cleanup;
mod error;
mod gateway;
mod synchronize;


pub use error::{CallbackError, ServiceError, ValidationError};
pub use synchronize::SynchronizeCallback;

use crate::store::RecordStore;

/// Metadata operations over an explicitly supplied [`RecordStore`].
#[derive(Debug)]
pub struct MetadataService<S> {
    store: S,
}

impl<S: RecordStore> MetadataService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }
}
