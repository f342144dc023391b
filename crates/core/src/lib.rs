#![forbid(unsafe_code)]

pub mod criteria;
pub mod model;
pub mod service;
pub mod store;

pub use criteria::Criterion;
pub use model::{FieldValue, Fields, Metadata};
pub use service::{
    CallbackError, MetadataService, ServiceError, SynchronizeCallback, ValidationError,
};
pub use store::RecordStore;

pub mod ids {
    use std::fmt;

    /// Identity of a parent task. Always strictly positive.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct TaskId(i64);

    impl TaskId {
        pub fn get(self) -> i64 {
            self.0
        }

        pub fn try_new(value: i64) -> Result<Self, IdError> {
            validate_row_id(value)?;
            Ok(Self(value))
        }
    }

    impl fmt::Display for TaskId {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{}", self.0)
        }
    }

    /// Store-assigned identity of a metadata record.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct RecordId(i64);

    impl RecordId {
        pub fn get(self) -> i64 {
            self.0
        }

        pub fn try_new(value: i64) -> Result<Self, IdError> {
            validate_row_id(value)?;
            Ok(Self(value))
        }
    }

    impl fmt::Display for RecordId {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{}", self.0)
        }
    }

    #[derive(Clone, Debug, PartialEq, Eq)]
    pub enum IdError {
        NotPositive,
    }

    impl IdError {
        pub fn message(&self) -> &'static str {
            match self {
                Self::NotPositive => "id must be a positive integer",
            }
        }
    }

    fn validate_row_id(value: i64) -> Result<(), IdError> {
        if value <= 0 {
            return Err(IdError::NotPositive);
        }
        Ok(())
    }
}

pub mod time {
    /// Wall-clock milliseconds since the unix epoch; `0` if the clock is before it.
    pub fn now_ms() -> i64 {
        use std::time::{SystemTime, UNIX_EPOCH};

        let now = match SystemTime::now().duration_since(UNIX_EPOCH) {
            Ok(duration) => duration,
            Err(_) => return 0,
        };

        i64::try_from(now.as_millis()).unwrap_or(i64::MAX)
    }
}
