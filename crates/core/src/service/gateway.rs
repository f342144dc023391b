#![forbid(unsafe_code)]

use super::{MetadataService, ServiceError, ValidationError};
use crate::criteria::Criterion;
use crate::model::{Fields, Metadata};
use crate::store::RecordStore;

impl<S: RecordStore> MetadataService<S> {
    pub fn query(&self, criterion: &Criterion) -> Result<Vec<Metadata>, ServiceError<S::Error>> {
        self.store.query(criterion).map_err(ServiceError::Store)
    }

    pub fn delete_where(&mut self, criterion: &Criterion) -> Result<usize, ServiceError<S::Error>> {
        self.store
            .delete_where(criterion)
            .map_err(ServiceError::Store)
    }

    pub fn update(
        &mut self,
        criterion: &Criterion,
        values: &Fields,
    ) -> Result<usize, ServiceError<S::Error>> {
        self.store
            .update_where(criterion, values)
            .map_err(ServiceError::Store)
    }

    /// Persists a single record. The record must already be attached to a task.
    pub fn save(&mut self, record: &Metadata) -> Result<Metadata, ServiceError<S::Error>> {
        if record.task().is_none() {
            return Err(ValidationError::MissingTask {
                fields: record.fields().to_json(),
            }
            .into());
        }

        self.store.persist(record).map_err(ServiceError::Store)
    }
}
