#![forbid(unsafe_code)]

use super::super::StoreError;
use tm_core::ids::{RecordId, TaskId};

pub(in crate::store) fn task_id(value: i64) -> Result<TaskId, StoreError> {
    TaskId::try_new(value).map_err(|_| StoreError::InvalidInput("invalid task id row"))
}

pub(in crate::store) fn record_id(value: i64) -> Result<RecordId, StoreError> {
    RecordId::try_new(value).map_err(|_| StoreError::InvalidInput("invalid metadata id row"))
}
