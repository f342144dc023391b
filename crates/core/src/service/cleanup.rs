#![forbid(unsafe_code)]

use super::{MetadataService, ServiceError};
use crate::store::RecordStore;
use std::ops::ControlFlow;
use tracing::info;

impl<S: RecordStore> MetadataService<S> {
    /// Deletes metadata whose task no longer exists. Typically run on startup.
    ///
    /// Each delete stands alone: a failure leaves the remaining orphans for
    /// the next sweep. Returns the number of records removed.
    pub fn cleanup(&mut self) -> Result<usize, ServiceError<S::Error>> {
        let mut dangling = Vec::new();
        self.store
            .scan_dangling(&mut |id| {
                dangling.push(id);
                ControlFlow::Continue(())
            })
            .map_err(ServiceError::Store)?;

        if dangling.is_empty() {
            return Ok(0);
        }

        let mut removed = 0usize;
        for id in dangling {
            if self.store.delete(id).map_err(ServiceError::Store)? {
                removed += 1;
            }
        }

        info!(removed, "removed dangling metadata");
        Ok(removed)
    }
}
