/// Failures raised while running a statement batch.
///
/// Every variant is a storage operation failure; the split only tells the
/// logs at which stage the batch was abandoned.
#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error("Batch contains no statements")]
    EmptyBatch,
    #[error("Failed to open database: {0}")]
    Connect(#[source] sqlx::Error),
    #[error("Failed to begin transaction: {0}")]
    Begin(#[source] sqlx::Error),
    #[error("Statement {index}{} failed ({sql}): {source}", row_suffix(.row))]
    Statement {
        index: usize,
        /// Parameter row that failed, for repeated statements
        row: Option<usize>,
        sql: String,
        #[source]
        source: sqlx::Error,
    },
    #[error("Failed to commit transaction: {0}")]
    Commit(#[source] sqlx::Error),
}

impl BatchError {
    /// Underlying driver error, if the failure came from the store.
    pub fn storage_error(&self) -> Option<&sqlx::Error> {
        match self {
            BatchError::EmptyBatch => None,
            BatchError::Connect(e) | BatchError::Begin(e) | BatchError::Commit(e) => Some(e),
            BatchError::Statement { source, .. } => Some(source),
        }
    }
}

fn row_suffix(row: &Option<usize>) -> String {
    row.map(|r| format!(" row {r}")).unwrap_or_default()
}
