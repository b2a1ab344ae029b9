//! Snowflake client and connection settings.
//!
//! This module provides the [`SnowflakeConnector`] and [`SnowflakeSession`]
//! for talking to a Snowflake account, the [`WarehouseConfig`] they are
//! built from, and the [`Warehouse`]/[`Connector`] traits the publisher
//! depends on.

mod config;
mod snowflake;
mod statement;
mod warehouse;

pub use config::{DEFAULT_TIMEOUT, WarehouseConfig};
pub use snowflake::{SnowflakeConnector, SnowflakeSession};
pub use statement::{BindType, BindValue, Binding, QueryError, QueryOutcome, Statement};
pub use warehouse::{Connector, Warehouse};
