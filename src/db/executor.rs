use std::fmt;

use chrono::{DateTime, Utc};
use sqlx::query::Query;
use sqlx::sqlite::{SqliteArguments, SqliteConnectOptions, SqliteConnection};
use sqlx::{Connection, Sqlite, Transaction};
use tracing::{debug, error, info, instrument, warn};

use crate::db::batch::{Batch, SqlParam, Statement};
use crate::db::BatchError;

/// Lifecycle of one executor run.
///
/// `Idle -> Open -> Executing -> {Committed | Failed} -> Closed`. A run that
/// cannot open the store goes straight from `Idle` to `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchState {
    Idle,
    Open,
    Executing,
    Committed,
    Failed,
    Closed,
}

impl fmt::Display for BatchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BatchState::Idle => "idle",
            BatchState::Open => "open",
            BatchState::Executing => "executing",
            BatchState::Committed => "committed",
            BatchState::Failed => "failed",
            BatchState::Closed => "closed",
        };
        f.write_str(name)
    }
}

/// What a single statement did inside a committed batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatementReport {
    pub sql: String,
    pub executions: usize,
    pub rows_affected: u64,
}

/// Summary of a committed batch
#[derive(Debug, Clone)]
pub struct BatchReport {
    pub batch: String,
    pub statements: Vec<StatementReport>,
    pub committed_at: DateTime<Utc>,
}

impl BatchReport {
    pub fn rows_affected(&self) -> u64 {
        self.statements.iter().map(|s| s.rows_affected).sum()
    }

    pub fn executions(&self) -> usize {
        self.statements.iter().map(|s| s.executions).sum()
    }
}

/// Execute every statement of `batch` on `conn` inside one transaction.
///
/// Either the whole batch commits or the transaction is rolled back and the
/// first failure is returned. The connection itself is left open; closing it
/// is the caller's job.
#[instrument(skip(conn, batch), fields(batch = batch.name(), statements = batch.len()))]
pub async fn execute_batch(
    conn: &mut SqliteConnection,
    batch: &Batch,
) -> Result<BatchReport, BatchError> {
    if batch.is_empty() {
        return Err(BatchError::EmptyBatch);
    }

    debug!("Beginning transaction for batch '{}'", batch.name());
    let mut tx = conn.begin().await.map_err(BatchError::Begin)?;
    let mut statements = Vec::with_capacity(batch.len());

    for (index, statement) in batch.statements().iter().enumerate() {
        debug!(
            "Executing statement {} ({} executions): {}",
            index,
            statement.executions(),
            statement.sql()
        );

        match run_statement(&mut tx, statement).await {
            Ok(rows_affected) => statements.push(StatementReport {
                sql: statement.sql().to_string(),
                executions: statement.executions(),
                rows_affected,
            }),
            Err((row, source)) => {
                error!(
                    "Statement {} (row {:?}) failed, rolling back: {}",
                    index, row, source
                );
                if let Err(rollback_err) = tx.rollback().await {
                    warn!("Rollback failed: {}", rollback_err);
                }
                return Err(BatchError::Statement {
                    index,
                    row,
                    sql: statement.sql().to_string(),
                    source,
                });
            }
        }
    }

    tx.commit().await.map_err(BatchError::Commit)?;

    let report = BatchReport {
        batch: batch.name().to_string(),
        statements,
        committed_at: Utc::now(),
    };
    info!(
        "Committed batch '{}' at {}: {} executions, {} rows affected",
        report.batch,
        report.committed_at.to_rfc3339(),
        report.executions(),
        report.rows_affected()
    );
    Ok(report)
}

/// Failing parameter row (if any) travels with the driver error.
async fn run_statement(
    tx: &mut Transaction<'_, Sqlite>,
    statement: &Statement,
) -> Result<u64, (Option<usize>, sqlx::Error)> {
    match statement {
        Statement::Execute { sql } => {
            let result = sqlx::query(sql)
                .execute(&mut **tx)
                .await
                .map_err(|e| (None, e))?;
            Ok(result.rows_affected())
        }
        Statement::Repeat { sql, rows } => {
            let mut rows_affected = 0;
            for (row_index, row) in rows.iter().enumerate() {
                let query = row
                    .iter()
                    .fold(sqlx::query(sql), |query, param| bind_param(query, param));
                let result = query
                    .execute(&mut **tx)
                    .await
                    .map_err(|e| (Some(row_index), e))?;
                rows_affected += result.rows_affected();
            }
            Ok(rows_affected)
        }
    }
}

fn bind_param<'q>(
    query: Query<'q, Sqlite, SqliteArguments<'q>>,
    param: &SqlParam,
) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    match param {
        SqlParam::Text(value) => query.bind(value.clone()),
        SqlParam::Integer(value) => query.bind(*value),
        SqlParam::Real(value) => query.bind(*value),
        SqlParam::Null => query.bind(None::<String>),
    }
}

/// Runs batches against the store, one exclusively-owned connection per run.
pub struct BatchExecutor {
    options: SqliteConnectOptions,
    state: BatchState,
    last_outcome: Option<BatchState>,
}

impl BatchExecutor {
    pub fn new(options: SqliteConnectOptions) -> Self {
        Self {
            options,
            state: BatchState::Idle,
            last_outcome: None,
        }
    }

    pub fn state(&self) -> BatchState {
        self.state
    }

    /// `Committed` or `Failed` for the most recent run, `None` before any run.
    pub fn last_outcome(&self) -> Option<BatchState> {
        self.last_outcome
    }

    /// Open the store, execute `batch` atomically and close the connection.
    ///
    /// The connection is closed on every path, so `state()` is `Closed`
    /// whenever this returns.
    #[instrument(skip(self, batch), fields(batch = batch.name()))]
    pub async fn run(&mut self, batch: &Batch) -> Result<BatchReport, BatchError> {
        self.state = BatchState::Idle;

        if batch.is_empty() {
            self.finish(BatchState::Failed);
            return Err(BatchError::EmptyBatch);
        }

        let mut conn = match SqliteConnection::connect_with(&self.options).await {
            Ok(conn) => conn,
            Err(e) => {
                error!("Failed to open database: {}", e);
                self.finish(BatchState::Failed);
                return Err(BatchError::Connect(e));
            }
        };
        self.transition(BatchState::Open);

        self.transition(BatchState::Executing);
        let outcome = execute_batch(&mut conn, batch).await;

        let terminal = if outcome.is_ok() {
            BatchState::Committed
        } else {
            BatchState::Failed
        };
        self.transition(terminal);

        if let Err(e) = conn.close().await {
            warn!("Failed to close database connection cleanly: {}", e);
        }
        self.finish(terminal);

        outcome
    }

    fn transition(&mut self, next: BatchState) {
        debug!("Batch state {} -> {}", self.state, next);
        self.state = next;
    }

    fn finish(&mut self, outcome: BatchState) {
        if self.state != outcome {
            self.transition(outcome);
        }
        self.last_outcome = Some(outcome);
        self.transition(BatchState::Closed);
    }
}
