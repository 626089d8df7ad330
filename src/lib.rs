pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod report;
pub mod types;

pub use config::{ColumnMap, Config};
pub use error::{Result, RosterError};
pub use pipeline::{Pipeline, PipelineResult};
pub use types::{OutputRow, Person, RawRecord, TripRoster};
