//! Core ETL (Extract, Transform, Load) abstractions
//!
//! The roster job is a single linear pipeline: a spreadsheet extractor,
//! a chain of row transformers, and a warehouse loader. These traits are
//! the seams between those stages.

mod extract;
mod load;
mod pipeline;
mod transform;

pub use extract::Extractor;
pub use load::Loader;
pub use pipeline::{Pipeline, RunReport, RunState};
pub use transform::{Chain, Transformer};
