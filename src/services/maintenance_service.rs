use sqlx::sqlite::SqliteConnectOptions;
use tracing::{info, instrument};

use crate::config::Config;
use crate::db::{Batch, BatchError, BatchExecutor, BatchReport, SensorTable};

#[derive(Clone)]
pub struct MaintenanceService {
    options: SqliteConnectOptions,
}

impl MaintenanceService {
    pub fn new(options: SqliteConnectOptions) -> Self {
        Self { options }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.connect_options())
    }

    /// Delete every sensor reading from the four sensor tables.
    #[instrument(skip(self))]
    pub async fn clear_sensor_data(&self) -> Result<BatchReport, BatchError> {
        let batch = Batch::clear_sensor_tables(&SensorTable::ALL);
        let report = BatchExecutor::new(self.options.clone()).run(&batch).await?;
        info!("Cleared {} sensor rows", report.rows_affected());
        Ok(report)
    }

    /// Append the given room names to `comodos`, in order.
    #[instrument(skip(self, rooms))]
    pub async fn insert_rooms<I, S>(&self, rooms: I) -> Result<BatchReport, BatchError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let batch = Batch::insert_rooms(rooms);
        let report = BatchExecutor::new(self.options.clone()).run(&batch).await?;
        info!("Inserted {} rooms", report.rows_affected());
        Ok(report)
    }

    pub fn clear_message(result: &Result<BatchReport, BatchError>) -> String {
        let tables = SensorTable::ALL
            .iter()
            .map(|t| format!("'{t}'"))
            .collect::<Vec<_>>();
        match result {
            Ok(report) => format!(
                "Data from tables {} and {} deleted successfully ({} rows removed).",
                tables[..tables.len() - 1].join(", "),
                tables[tables.len() - 1],
                report.rows_affected()
            ),
            Err(e) => format!("Error while deleting data from the database: {e}"),
        }
    }

    pub fn insert_message(result: &Result<BatchReport, BatchError>) -> String {
        match result {
            Ok(report) => format!("Rooms inserted successfully ({} rows).", report.rows_affected()),
            Err(e) => format!("Error while inserting data into the database: {e}"),
        }
    }
}
