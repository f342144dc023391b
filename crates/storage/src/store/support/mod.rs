#![forbid(unsafe_code)]

mod criteria_sql;
mod fields;
mod ids;
mod schema;

pub(super) use criteria_sql::*;
pub(super) use fields::*;
pub(super) use ids::*;
pub(super) use schema::install_schema;
