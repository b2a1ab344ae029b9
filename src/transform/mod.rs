//! Transform implementations for roster rows
//!
//! The roster chain is [`NameNormalizer`] → [`ColumnDropper`] →
//! [`RecordProjector`], built by [`roster_transformer`].

mod column_dropper;
mod name_normalizer;
mod record_projector;

pub use column_dropper::ColumnDropper;
pub use name_normalizer::NameNormalizer;
pub use record_projector::RecordProjector;

use crate::etl::Transformer;
use crate::roster::EmployeeRecord;
use crate::sheet::Row;

/// The full row-to-record cleaning chain for the employee roster
pub fn roster_transformer() -> impl Transformer<Input = Row, Output = EmployeeRecord> {
    NameNormalizer::employee_name()
        .then(ColumnDropper::roster_derived_columns())
        .then(RecordProjector::new())
}
