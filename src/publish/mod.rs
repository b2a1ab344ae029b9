//! Publishing records into a warehouse table
//!
//! A [`TablePublisher`] ensures the destination table according to a
//! [`WritePolicy`] and bulk-inserts rows that implement [`TableRow`].

mod policy;
mod publisher;
mod table;

pub use policy::WritePolicy;
pub use publisher::{DEFAULT_BATCH_SIZE, Destination, TablePublisher};
pub use table::{Column, ColumnType, TableRow, TableSchema, quote_identifier};
