pub mod config;
pub mod migrations;
pub mod store;

pub use config::Config;
pub use store::{CategoryTable, ContextTable, SqliteStore, TaskTable};

use std::path::PathBuf;

use crate::category::{Category, CategoryPatch, NewCategory};
use crate::context::{ContextEntry, NewContextEntry};
use crate::error::DatabaseError;
use crate::task::{NewTask, Task, TaskPatch};

/// Returns the data directory, creating it if needed.
///
/// `TASKWISE_HOME` wins when set. Otherwise `~/.config/taskwise`, or
/// `~/.config/taskwise-dev` when `TASKWISE_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> std::io::Result<PathBuf> {
    let dir = match std::env::var_os("TASKWISE_HOME") {
        Some(home) if !home.is_empty() => PathBuf::from(home),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("TASKWISE_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("taskwise-dev")
            } else {
                base_dir.join("taskwise")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Persistence contract for one record kind.
///
/// Implementations assign ids and timestamps on insert and define the
/// order `list` returns rows in.
pub trait Repository {
    type Row;
    type Insert;
    type Update;

    fn list(&self) -> Result<Vec<Self::Row>, DatabaseError>;

    fn get(&self, id: &str) -> Result<Option<Self::Row>, DatabaseError>;

    fn insert(&self, new: &Self::Insert) -> Result<Self::Row, DatabaseError>;

    /// Fails with [`DatabaseError::NotFound`] when `id` does not exist.
    fn update(&self, id: &str, patch: &Self::Update) -> Result<Self::Row, DatabaseError>;

    /// Fails with [`DatabaseError::NotFound`] when `id` does not exist.
    fn delete(&self, id: &str) -> Result<(), DatabaseError>;
}

/// A backing store exposing one repository per record kind.
pub trait Store {
    /// Tasks, newest first.
    fn tasks(&self) -> impl Repository<Row = Task, Insert = NewTask, Update = TaskPatch> + '_;

    /// Context entries, newest first. Updates are rejected.
    fn context_entries(
        &self,
    ) -> impl Repository<Row = ContextEntry, Insert = NewContextEntry, Update = ()> + '_;

    /// Categories, most used first.
    fn categories(
        &self,
    ) -> impl Repository<Row = Category, Insert = NewCategory, Update = CategoryPatch> + '_;
}
