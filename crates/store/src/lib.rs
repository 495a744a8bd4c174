//! Embedded single-file segment store: table schema, structured filter
//! expressions, bulk load, and query execution.

pub mod filter;
pub mod loader;
pub mod schema;
pub mod store;

pub use filter::{Clause, CmpOp, FilterExpression};
pub use schema::Column;
pub use store::SegmentStore;
