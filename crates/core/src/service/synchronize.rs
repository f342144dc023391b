#![forbid(unsafe_code)]

use super::{CallbackError, MetadataService, ServiceError};
use crate::criteria::Criterion;
use crate::ids::TaskId;
use crate::model::Metadata;
use crate::store::RecordStore;
use crate::time::now_ms;
use std::collections::BTreeSet;
use std::ops::ControlFlow;
use tracing::{debug, info, warn};

/// Hook run right before a stale record is deleted during [`MetadataService::synchronize`].
pub trait SynchronizeCallback {
    fn before_delete(&mut self, record: &Metadata) -> Result<(), CallbackError>;
}

impl<F> SynchronizeCallback for F
where
    F: FnMut(&Metadata) -> Result<(), CallbackError>,
{
    fn before_delete(&mut self, record: &Metadata) -> Result<(), CallbackError> {
        self(record)
    }
}

impl<S: RecordStore> MetadataService<S> {
    /// Makes the metadata of `task` matching `scope` equal to `desired`.
    ///
    /// Stored records whose normalized fields appear in `desired` are left
    /// untouched (same id, same creation time); every other scoped record is
    /// deleted and every unmatched desired record is inserted with a fresh
    /// creation time. Desired records with identical normalized fields
    /// collapse into one.
    ///
    /// Returns `true` if anything was deleted or inserted. A failing write or
    /// callback stops the pass; writes already made stay committed.
    pub fn synchronize<I>(
        &mut self,
        task: TaskId,
        desired: I,
        scope: &Criterion,
        mut callback: Option<&mut dyn SynchronizeCallback>,
    ) -> Result<bool, ServiceError<S::Error>>
    where
        I: IntoIterator<Item = Metadata>,
    {
        let mut wanted = BTreeSet::new();
        let mut insert_order = Vec::new();
        for mut record in desired {
            record.set_task(task);
            record.clear_identity();
            let values = record.normalized_fields();
            if wanted.insert(values.clone()) {
                insert_order.push(values);
            }
        }

        let scope = Criterion::by_task(task).and(scope.clone());
        let mut stale = Vec::new();
        let mut kept = 0usize;
        self.store
            .scan(&scope, &mut |existing| {
                // Each match consumes its desired entry, so store-side duplicates go stale.
                if wanted.remove(&existing.normalized_fields()) {
                    kept += 1;
                } else {
                    stale.push(existing);
                }
                ControlFlow::Continue(())
            })
            .map_err(ServiceError::Store)?;

        let mut deleted = 0usize;
        for record in stale {
            let Some(id) = record.id() else {
                warn!(%task, "scanned metadata record has no id");
                return Err(ServiceError::MissingId);
            };
            if let Some(callback) = callback.as_deref_mut() {
                if let Err(source) = callback.before_delete(&record) {
                    warn!(%task, record = %id, "before-delete callback aborted metadata synchronization");
                    return Err(ServiceError::Callback { id, source });
                }
            }
            self.store.delete(id).map_err(ServiceError::Store)?;
            debug!(%task, record = %id, "deleted stale metadata");
            deleted += 1;
        }

        let created_at_ms = now_ms();
        let mut inserted = 0usize;
        for values in insert_order {
            if !wanted.remove(&values) {
                continue;
            }
            let record = Metadata::new(task)
                .with_created_at_ms(created_at_ms)
                .with_fields(values);
            let stored = self.store.persist(&record).map_err(ServiceError::Store)?;
            debug!(%task, record = ?stored.id(), "inserted metadata");
            inserted += 1;
        }

        let changed = deleted > 0 || inserted > 0;
        if changed {
            info!(%task, kept, deleted, inserted, "synchronized task metadata");
        }
        Ok(changed)
    }
}
