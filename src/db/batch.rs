use crate::db::models::{Room, SensorTable};

/// Positional parameter bound to a `?` placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    Text(String),
    Integer(i64),
    Real(f64),
    Null,
}

impl From<&str> for SqlParam {
    fn from(value: &str) -> Self {
        SqlParam::Text(value.to_string())
    }
}

impl From<String> for SqlParam {
    fn from(value: String) -> Self {
        SqlParam::Text(value)
    }
}

impl From<i64> for SqlParam {
    fn from(value: i64) -> Self {
        SqlParam::Integer(value)
    }
}

impl From<f64> for SqlParam {
    fn from(value: f64) -> Self {
        SqlParam::Real(value)
    }
}

impl<T: Into<SqlParam>> From<Option<T>> for SqlParam {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(SqlParam::Null)
    }
}

/// One entry of a batch
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// Run once without parameters
    Execute { sql: String },
    /// Run once per parameter row, in row order
    Repeat {
        sql: String,
        rows: Vec<Vec<SqlParam>>,
    },
}

impl Statement {
    pub fn execute(sql: impl Into<String>) -> Self {
        Statement::Execute { sql: sql.into() }
    }

    pub fn repeat(sql: impl Into<String>, rows: Vec<Vec<SqlParam>>) -> Self {
        Statement::Repeat {
            sql: sql.into(),
            rows,
        }
    }

    pub fn sql(&self) -> &str {
        match self {
            Statement::Execute { sql } | Statement::Repeat { sql, .. } => sql,
        }
    }

    /// Number of times the statement runs when the batch executes.
    pub fn executions(&self) -> usize {
        match self {
            Statement::Execute { .. } => 1,
            Statement::Repeat { rows, .. } => rows.len(),
        }
    }
}

/// Ordered group of statements sharing one commit/rollback outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    name: String,
    statements: Vec<Statement>,
}

impl Batch {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            statements: Vec::new(),
        }
    }

    pub fn with_statement(mut self, statement: Statement) -> Self {
        self.statements.push(statement);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    /// Delete every row of the given tables, in slice order.
    pub fn clear_sensor_tables(tables: &[SensorTable]) -> Self {
        tables.iter().fold(Batch::new("clear-sensor-data"), |batch, table| {
            batch.with_statement(Statement::execute(table.delete_all_sql()))
        })
    }

    /// Insert one `comodos` row per room name, preserving order.
    pub fn insert_rooms<I, S>(rooms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let rows = rooms
            .into_iter()
            .map(|room| vec![SqlParam::Text(room.into())])
            .collect();
        Batch::new("insert-rooms").with_statement(Statement::repeat(Room::insert_sql(), rows))
    }
}
