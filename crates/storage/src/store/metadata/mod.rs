#![forbid(unsafe_code)]

mod read;
mod write;

use super::{SqliteStore, StoreError};
use std::ops::ControlFlow;
use tm_core::ids::RecordId;
use tm_core::model::{Fields, Metadata};
use tm_core::{Criterion, RecordStore};

impl RecordStore for SqliteStore {
    type Error = StoreError;

    fn scan(
        &self,
        criterion: &Criterion,
        visit: &mut dyn FnMut(Metadata) -> ControlFlow<()>,
    ) -> Result<(), StoreError> {
        read::scan_metadata(&self.conn, criterion, visit)
    }

    fn persist(&mut self, record: &Metadata) -> Result<Metadata, StoreError> {
        let tx = self.conn.transaction()?;
        let stored = write::persist_tx(&tx, record)?;
        tx.commit()?;
        Ok(stored)
    }

    fn delete(&mut self, id: RecordId) -> Result<bool, StoreError> {
        write::delete_by_id(&self.conn, id)
    }

    fn delete_where(&mut self, criterion: &Criterion) -> Result<usize, StoreError> {
        write::delete_where(&self.conn, criterion)
    }

    fn update_where(&mut self, criterion: &Criterion, values: &Fields) -> Result<usize, StoreError> {
        let tx = self.conn.transaction()?;
        let updated = write::update_where_tx(&tx, criterion, values)?;
        tx.commit()?;
        Ok(updated)
    }

    fn scan_dangling(
        &self,
        visit: &mut dyn FnMut(RecordId) -> ControlFlow<()>,
    ) -> Result<(), StoreError> {
        read::scan_dangling(&self.conn, visit)
    }
}
