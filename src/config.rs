use std::env;
use std::path::PathBuf;
use std::time::Duration;

use sqlx::sqlite::SqliteConnectOptions;

pub const DEFAULT_DATABASE_PATH: &str = "localDatabase.db";
pub const DEFAULT_BUSY_TIMEOUT_SECS: u64 = 5;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_path: PathBuf,
    pub busy_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from(DEFAULT_DATABASE_PATH),
            busy_timeout_secs: DEFAULT_BUSY_TIMEOUT_SECS,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Config {
            database_path: env::var("DATABASE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATABASE_PATH)),
            busy_timeout_secs: env::var("DATABASE_BUSY_TIMEOUT_SECS")
                .unwrap_or_else(|_| DEFAULT_BUSY_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(DEFAULT_BUSY_TIMEOUT_SECS),
        }
    }

    pub fn with_database_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.database_path = path.into();
        self
    }

    /// Connection options for the store.
    ///
    /// A missing file is created empty, so a wrong path surfaces as a
    /// "no such table" failure from the batch rather than an open error.
    pub fn connect_options(&self) -> SqliteConnectOptions {
        SqliteConnectOptions::new()
            .filename(&self.database_path)
            .create_if_missing(true)
            .busy_timeout(Duration::from_secs(self.busy_timeout_secs))
    }
}
