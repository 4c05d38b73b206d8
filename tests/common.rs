#![allow(dead_code)]

use std::path::PathBuf;

use sensor_db_tools::config::Config;
use sensor_db_tools::db::Room;
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection};
use sqlx::{Connection, Row};
use tempfile::TempDir;

/// Tables as the home automation server creates them.
pub const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS comodos (comodos TEXT)",
    "CREATE TABLE IF NOT EXISTS iluminacao (id INTEGER PRIMARY KEY AUTOINCREMENT, dados REAL, data TEXT)",
    "CREATE TABLE IF NOT EXISTS temperatura (id INTEGER PRIMARY KEY AUTOINCREMENT, dados REAL, data TEXT)",
    "CREATE TABLE IF NOT EXISTS consumo (id INTEGER PRIMARY KEY AUTOINCREMENT, dados REAL, data TEXT)",
    "CREATE TABLE IF NOT EXISTS custo (id INTEGER PRIMARY KEY AUTOINCREMENT, dados REAL, data TEXT)",
];

/// Throwaway SQLite file that lives as long as the fixture.
pub struct TestStore {
    _dir: TempDir,
    pub path: PathBuf,
}

impl TestStore {
    /// Store with no tables at all
    pub async fn empty() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("localDatabase.db");
        let store = Self { _dir: dir, path };
        // Touch the file so later connections find it
        store.connect().await.close().await.expect("Failed to close");
        store
    }

    /// Store with the full sensor schema
    pub async fn with_schema() -> Self {
        let store = Self::empty().await;
        for ddl in SCHEMA {
            store.execute(ddl).await;
        }
        store
    }

    pub fn config(&self) -> Config {
        Config::default().with_database_path(self.path.clone())
    }

    pub fn options(&self) -> SqliteConnectOptions {
        self.config().connect_options()
    }

    pub async fn connect(&self) -> SqliteConnection {
        SqliteConnection::connect_with(&self.options())
            .await
            .expect("Failed to connect to test database")
    }

    pub async fn execute(&self, sql: &str) {
        let mut conn = self.connect().await;
        sqlx::query(sql)
            .execute(&mut conn)
            .await
            .expect("Failed to execute fixture statement");
        conn.close().await.expect("Failed to close");
    }

    pub async fn seed_readings(&self, table: &str, count: usize) {
        let mut conn = self.connect().await;
        for i in 0..count {
            sqlx::query(&format!("INSERT INTO {table} (dados, data) VALUES (?, ?)"))
                .bind(20.0 + i as f64)
                .bind(format!("2024-11-0{}T10:00:00Z", i + 1))
                .execute(&mut conn)
                .await
                .expect("Failed to seed readings");
        }
        conn.close().await.expect("Failed to close");
    }

    pub async fn count(&self, table: &str) -> i64 {
        let mut conn = self.connect().await;
        let row = sqlx::query(&format!("SELECT COUNT(*) AS n FROM {table}"))
            .fetch_one(&mut conn)
            .await
            .expect("Failed to count rows");
        conn.close().await.expect("Failed to close");
        row.get("n")
    }

    pub async fn room_names(&self) -> Vec<String> {
        let mut conn = self.connect().await;
        let rooms = sqlx::query_as::<_, Room>("SELECT comodos FROM comodos ORDER BY rowid")
            .fetch_all(&mut conn)
            .await
            .expect("Failed to list rooms");
        conn.close().await.expect("Failed to close");
        rooms.into_iter().map(|room| room.name).collect()
    }

    /// Takes an exclusive lock and releases it again.
    ///
    /// Fails if any other connection still holds a lock or an open
    /// write transaction on the file.
    pub async fn assert_unlocked(&self) {
        let options = self
            .options()
            .busy_timeout(std::time::Duration::from_millis(100));
        let mut conn = SqliteConnection::connect_with(&options)
            .await
            .expect("Failed to reopen database");
        sqlx::query("BEGIN EXCLUSIVE")
            .execute(&mut conn)
            .await
            .expect("Database is still locked by another connection");
        sqlx::query("ROLLBACK")
            .execute(&mut conn)
            .await
            .expect("Failed to release exclusive lock");
        conn.close().await.expect("Failed to close");
    }
}
