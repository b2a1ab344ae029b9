//! Roster Publisher
//!
//! Cleans an employee roster spreadsheet and publishes it to a Snowflake table.

pub mod cli;
pub mod client;
pub mod error;
pub mod etl;
pub mod publish;
pub mod roster;
pub mod sheet;
pub mod transform;

// Re-exports for convenience
pub use client::{Connector, SnowflakeConnector, Warehouse, WarehouseConfig};
pub use error::{ErrorKind, RunError};
pub use etl::{Extractor, Loader, Pipeline, RunReport, RunState, Transformer};
pub use publish::{Destination, TablePublisher, WritePolicy};
pub use roster::{EmployeeRecord, load_employee_records, normalize_name};
