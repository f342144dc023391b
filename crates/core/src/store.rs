#![forbid(unsafe_code)]

use crate::criteria::Criterion;
use crate::ids::RecordId;
use crate::model::{Fields, Metadata};
use std::ops::ControlFlow;

/// Persistent storage for metadata records.
///
/// Reads stream through a visitor: the store opens its cursor, feeds records
/// to `visit` in a single forward pass and releases the cursor before
/// returning, whether the pass ran to the end, the visitor broke out, or a
/// row failed to decode. Writes take `&mut self`, so no write can be issued
/// while a scan is open.
pub trait RecordStore {
    type Error: std::error::Error + Send + Sync + 'static;

    fn scan(
        &self,
        criterion: &Criterion,
        visit: &mut dyn FnMut(Metadata) -> ControlFlow<()>,
    ) -> Result<(), Self::Error>;

    /// Inserts when `record` has no id, otherwise replaces the stored record
    /// with that id. Returns the record as stored.
    fn persist(&mut self, record: &Metadata) -> Result<Metadata, Self::Error>;

    /// Returns whether a record was removed.
    fn delete(&mut self, id: RecordId) -> Result<bool, Self::Error>;

    fn delete_where(&mut self, criterion: &Criterion) -> Result<usize, Self::Error>;

    /// Overwrites `values` on every matching record, leaving other fields as they are.
    fn update_where(&mut self, criterion: &Criterion, values: &Fields)
    -> Result<usize, Self::Error>;

    /// Streams ids of records whose task no longer exists.
    fn scan_dangling(
        &self,
        visit: &mut dyn FnMut(RecordId) -> ControlFlow<()>,
    ) -> Result<(), Self::Error>;

    fn query(&self, criterion: &Criterion) -> Result<Vec<Metadata>, Self::Error> {
        let mut out = Vec::new();
        self.scan(criterion, &mut |record| {
            out.push(record);
            ControlFlow::Continue(())
        })?;
        Ok(out)
    }
}
