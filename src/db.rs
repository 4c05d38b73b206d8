pub mod batch;
pub mod error;
pub mod executor;
pub mod models;

pub use batch::{Batch, SqlParam, Statement};
pub use error::BatchError;
pub use executor::{execute_batch, BatchExecutor, BatchReport, BatchState, StatementReport};
pub use models::{Room, SensorTable, DEFAULT_ROOMS};
