//! SQLite-based storage for tasks, context entries and categories.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use tracing::{info, warn};
use uuid::Uuid;

use super::{data_dir, migrations, Repository, Store};
use crate::category::{Category, CategoryPatch, NewCategory};
use crate::context::{ContextEntry, NewContextEntry, Sentiment, SourceType};
use crate::error::DatabaseError;
use crate::task::{NewTask, PriorityScore, Task, TaskPatch, TaskStatus};

const DATE_FORMAT: &str = "%Y-%m-%d";

const TASK_COLUMNS: &str = "id, title, description, category, priority_score, deadline, status,
     created_at, updated_at, ai_enhanced, context_based";
const CONTEXT_COLUMNS: &str =
    "id, content, source_type, created_at, processed_insights, keywords, sentiment";
const CATEGORY_COLUMNS: &str = "id, name, color, usage_count, created_at";

// === Helper Functions ===

/// Fixed-width RFC3339 so that text order matches time order
fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

/// Parse datetime from RFC3339 string with fallback to current time
fn parse_datetime_fallback(dt_str: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(dt_str)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|e| {
            warn!(value = dt_str, error = %e, "unparseable timestamp, using now");
            Utc::now()
        })
}

fn conversion_error(
    column: usize,
    err: impl std::error::Error + Send + Sync + 'static,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(column, Type::Text, Box::new(err))
}

/// Parse task status from database string
fn parse_task_status(status_str: &str) -> TaskStatus {
    status_str.parse().unwrap_or_else(|_| {
        warn!(value = status_str, "unknown task status, reading as pending");
        TaskStatus::Pending
    })
}

/// Parse source type from database string
fn parse_source_type(source_str: &str) -> SourceType {
    source_str.parse().unwrap_or_else(|_| {
        warn!(value = source_str, "unknown source type, reading as notes");
        SourceType::Notes
    })
}

/// Parse sentiment from database string
fn parse_sentiment(sentiment_str: &str) -> Sentiment {
    sentiment_str.parse().unwrap_or_default()
}

/// Build a Task from a row selected with [`TASK_COLUMNS`]
fn row_to_task(row: &rusqlite::Row) -> Result<Task, rusqlite::Error> {
    let priority: u8 = row.get(4)?;
    let priority_score = PriorityScore::new(priority).map_err(|e| conversion_error(4, e))?;

    let deadline_str: String = row.get(5)?;
    let deadline =
        NaiveDate::parse_from_str(&deadline_str, DATE_FORMAT).map_err(|e| conversion_error(5, e))?;

    let status_str: String = row.get(6)?;
    let created_at_str: String = row.get(7)?;
    let updated_at_str: String = row.get(8)?;

    Ok(Task {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        category: row.get(3)?,
        priority_score,
        deadline,
        status: parse_task_status(&status_str),
        created_at: parse_datetime_fallback(&created_at_str),
        updated_at: parse_datetime_fallback(&updated_at_str),
        ai_enhanced: row.get(9)?,
        context_based: row.get(10)?,
    })
}

/// Build a ContextEntry from a row selected with [`CONTEXT_COLUMNS`]
fn row_to_context_entry(row: &rusqlite::Row) -> Result<ContextEntry, rusqlite::Error> {
    let source_str: String = row.get(2)?;
    let created_at_str: String = row.get(3)?;
    let keywords_json: String = row.get(5)?;
    let keywords: Vec<String> = serde_json::from_str(&keywords_json).unwrap_or_else(|e| {
        warn!(error = %e, "malformed keywords column, reading as empty");
        Vec::new()
    });
    let sentiment_str: String = row.get(6)?;

    Ok(ContextEntry {
        id: row.get(0)?,
        content: row.get(1)?,
        source_type: parse_source_type(&source_str),
        created_at: parse_datetime_fallback(&created_at_str),
        processed_insights: row.get(4)?,
        keywords,
        sentiment: parse_sentiment(&sentiment_str),
    })
}

/// Build a Category from a row selected with [`CATEGORY_COLUMNS`]
fn row_to_category(row: &rusqlite::Row) -> Result<Category, rusqlite::Error> {
    let created_at_str: String = row.get(4)?;
    Ok(Category {
        id: row.get(0)?,
        name: row.get(1)?,
        color: row.get(2)?,
        usage_count: row.get(3)?,
        created_at: parse_datetime_fallback(&created_at_str),
    })
}

/// SQLite database holding every record kind.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open the database at `<data_dir>/taskwise.db`.
    ///
    /// Creates tables if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, DatabaseError> {
        let dir = data_dir().map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;
        Self::open_at(&dir.join("taskwise.db"))
    }

    /// Open the database at an explicit path.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open_at(path: &Path) -> Result<Self, DatabaseError> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let store = Self { conn };
        store.migrate()?;
        info!(path = %path.display(), "opened store");
        Ok(store)
    }

    /// Open an in-memory database.
    ///
    /// # Errors
    /// Returns an error if the schema cannot be created.
    pub fn open_in_memory() -> Result<Self, DatabaseError> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.migrate()?;
        Ok(store)
    }

    fn migrate(&self) -> Result<(), DatabaseError> {
        migrations::migrate(&self.conn).map_err(|e| DatabaseError::MigrationFailed(e.to_string()))
    }

    pub fn tasks(&self) -> TaskTable<'_> {
        TaskTable { conn: &self.conn }
    }

    pub fn context_entries(&self) -> ContextTable<'_> {
        ContextTable { conn: &self.conn }
    }

    pub fn categories(&self) -> CategoryTable<'_> {
        CategoryTable { conn: &self.conn }
    }
}

impl Store for SqliteStore {
    fn tasks(&self) -> impl Repository<Row = Task, Insert = NewTask, Update = TaskPatch> + '_ {
        SqliteStore::tasks(self)
    }

    fn context_entries(
        &self,
    ) -> impl Repository<Row = ContextEntry, Insert = NewContextEntry, Update = ()> + '_ {
        SqliteStore::context_entries(self)
    }

    fn categories(
        &self,
    ) -> impl Repository<Row = Category, Insert = NewCategory, Update = CategoryPatch> + '_ {
        SqliteStore::categories(self)
    }
}

/// The `tasks` table, newest first.
#[derive(Clone, Copy)]
pub struct TaskTable<'a> {
    conn: &'a Connection,
}

impl Repository for TaskTable<'_> {
    type Row = Task;
    type Insert = NewTask;
    type Update = TaskPatch;

    fn list(&self) -> Result<Vec<Task>, DatabaseError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks ORDER BY created_at DESC, rowid DESC"
        ))?;
        let rows = stmt.query_map([], row_to_task)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    fn get(&self, id: &str) -> Result<Option<Task>, DatabaseError> {
        Ok(self
            .conn
            .query_row(
                &format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1"),
                params![id],
                row_to_task,
            )
            .optional()?)
    }

    fn insert(&self, new: &NewTask) -> Result<Task, DatabaseError> {
        let now = Utc::now();
        let task = Task {
            id: Uuid::new_v4().to_string(),
            title: new.title.clone(),
            description: new.description.clone(),
            category: new.category.clone(),
            priority_score: new.priority_score,
            deadline: new.deadline,
            status: new.status,
            created_at: now,
            updated_at: now,
            ai_enhanced: new.ai_enhanced,
            context_based: new.context_based,
        };
        self.conn.execute(
            &format!(
                "INSERT INTO tasks ({TASK_COLUMNS})
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)"
            ),
            params![
                task.id,
                task.title,
                task.description,
                task.category,
                task.priority_score.value(),
                task.deadline.format(DATE_FORMAT).to_string(),
                task.status.as_str(),
                format_datetime(&task.created_at),
                format_datetime(&task.updated_at),
                task.ai_enhanced,
                task.context_based,
            ],
        )?;
        info!(id = %task.id, "inserted task");
        Ok(task)
    }

    fn update(&self, id: &str, patch: &TaskPatch) -> Result<Task, DatabaseError> {
        let mut task = self.get(id)?.ok_or_else(|| DatabaseError::NotFound {
            table: "tasks",
            id: id.to_string(),
        })?;
        patch.apply_to(&mut task);
        task.updated_at = Utc::now();
        self.conn.execute(
            "UPDATE tasks
             SET title = ?2, description = ?3, category = ?4, priority_score = ?5,
                 deadline = ?6, status = ?7, updated_at = ?8
             WHERE id = ?1",
            params![
                task.id,
                task.title,
                task.description,
                task.category,
                task.priority_score.value(),
                task.deadline.format(DATE_FORMAT).to_string(),
                task.status.as_str(),
                format_datetime(&task.updated_at),
            ],
        )?;
        info!(id, status = %task.status, "updated task");
        Ok(task)
    }

    fn delete(&self, id: &str) -> Result<(), DatabaseError> {
        let deleted = self
            .conn
            .execute("DELETE FROM tasks WHERE id = ?1", params![id])?;
        if deleted == 0 {
            return Err(DatabaseError::NotFound {
                table: "tasks",
                id: id.to_string(),
            });
        }
        info!(id, "deleted task");
        Ok(())
    }
}

/// The `context_entries` table, newest first. Rows cannot be updated.
#[derive(Clone, Copy)]
pub struct ContextTable<'a> {
    conn: &'a Connection,
}

impl Repository for ContextTable<'_> {
    type Row = ContextEntry;
    type Insert = NewContextEntry;
    type Update = ();

    fn list(&self) -> Result<Vec<ContextEntry>, DatabaseError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {CONTEXT_COLUMNS} FROM context_entries ORDER BY created_at DESC, rowid DESC"
        ))?;
        let rows = stmt.query_map([], row_to_context_entry)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    fn get(&self, id: &str) -> Result<Option<ContextEntry>, DatabaseError> {
        Ok(self
            .conn
            .query_row(
                &format!("SELECT {CONTEXT_COLUMNS} FROM context_entries WHERE id = ?1"),
                params![id],
                row_to_context_entry,
            )
            .optional()?)
    }

    fn insert(&self, new: &NewContextEntry) -> Result<ContextEntry, DatabaseError> {
        let entry = ContextEntry {
            id: Uuid::new_v4().to_string(),
            content: new.content.clone(),
            source_type: new.source_type,
            created_at: Utc::now(),
            processed_insights: new.processed_insights.clone(),
            keywords: new.keywords.clone(),
            sentiment: new.sentiment,
        };
        let keywords_json = serde_json::to_string(&entry.keywords)
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;
        self.conn.execute(
            &format!("INSERT INTO context_entries ({CONTEXT_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)"),
            params![
                entry.id,
                entry.content,
                entry.source_type.as_str(),
                format_datetime(&entry.created_at),
                entry.processed_insights,
                keywords_json,
                entry.sentiment.as_str(),
            ],
        )?;
        info!(id = %entry.id, source = %entry.source_type, "inserted context entry");
        Ok(entry)
    }

    fn update(&self, _id: &str, _patch: &()) -> Result<ContextEntry, DatabaseError> {
        Err(DatabaseError::Immutable {
            table: "context_entries",
        })
    }

    fn delete(&self, id: &str) -> Result<(), DatabaseError> {
        let deleted = self
            .conn
            .execute("DELETE FROM context_entries WHERE id = ?1", params![id])?;
        if deleted == 0 {
            return Err(DatabaseError::NotFound {
                table: "context_entries",
                id: id.to_string(),
            });
        }
        info!(id, "deleted context entry");
        Ok(())
    }
}

/// The `categories` table, most used first.
#[derive(Clone, Copy)]
pub struct CategoryTable<'a> {
    conn: &'a Connection,
}

impl Repository for CategoryTable<'_> {
    type Row = Category;
    type Insert = NewCategory;
    type Update = CategoryPatch;

    fn list(&self) -> Result<Vec<Category>, DatabaseError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories ORDER BY usage_count DESC, rowid ASC"
        ))?;
        let rows = stmt.query_map([], row_to_category)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    fn get(&self, id: &str) -> Result<Option<Category>, DatabaseError> {
        Ok(self
            .conn
            .query_row(
                &format!("SELECT {CATEGORY_COLUMNS} FROM categories WHERE id = ?1"),
                params![id],
                row_to_category,
            )
            .optional()?)
    }

    fn insert(&self, new: &NewCategory) -> Result<Category, DatabaseError> {
        let category = Category {
            id: Uuid::new_v4().to_string(),
            name: new.name.clone(),
            color: new.color.clone(),
            usage_count: 0,
            created_at: Utc::now(),
        };
        self.conn.execute(
            &format!("INSERT INTO categories ({CATEGORY_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5)"),
            params![
                category.id,
                category.name,
                category.color,
                category.usage_count,
                format_datetime(&category.created_at),
            ],
        )?;
        info!(id = %category.id, name = %category.name, "inserted category");
        Ok(category)
    }

    fn update(&self, id: &str, patch: &CategoryPatch) -> Result<Category, DatabaseError> {
        let mut category = self.get(id)?.ok_or_else(|| DatabaseError::NotFound {
            table: "categories",
            id: id.to_string(),
        })?;
        patch.apply_to(&mut category);
        self.conn.execute(
            "UPDATE categories SET name = ?2, color = ?3, usage_count = ?4 WHERE id = ?1",
            params![
                category.id,
                category.name,
                category.color,
                category.usage_count
            ],
        )?;
        Ok(category)
    }

    fn delete(&self, id: &str) -> Result<(), DatabaseError> {
        let deleted = self
            .conn
            .execute("DELETE FROM categories WHERE id = ?1", params![id])?;
        if deleted == 0 {
            return Err(DatabaseError::NotFound {
                table: "categories",
                id: id.to_string(),
            });
        }
        Ok(())
    }
}
