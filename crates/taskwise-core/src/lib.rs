//! # Taskwise Core Library
//!
//! This library provides the core logic for taskwise, a personal task
//! manager that scores tasks from their wording and from recently captured
//! context notes. All operations are available via the standalone `taskwise`
//! CLI binary, which is a thin layer over this crate.
//!
//! ## Architecture
//!
//! - **Heuristics**: Rule-based task scoring, note analysis and
//!   recommendations behind pluggable traits, bundled in an [`Advisor`]
//! - **Query**: Pure filtering and stable sorting of the task list
//! - **Storage**: SQLite-backed repositories and TOML-based configuration
//! - **Workflow**: The user-facing flows tying storage and heuristics together
//!
//! ## Key Components
//!
//! - [`Workspace`]: Entry point for every user-facing operation
//! - [`SqliteStore`]: Task, context and category persistence
//! - [`Config`]: Application configuration management
//! - [`Lexicon`]: The built-in word lists

pub mod category;
pub mod clock;
pub mod context;
pub mod error;
pub mod heuristics;
pub mod storage;
pub mod task;
pub mod workflow;

pub use category::{Category, CategoryPatch, NewCategory};
pub use clock::{Clock, FixedClock, SystemClock};
pub use context::{ContextEntry, ContextStats, NewContextEntry, Sentiment, SourceType};
pub use error::{ConfigError, CoreError, DatabaseError, ValidationError};
pub use heuristics::{
    Advisor, AdvisorBuilder, CannedRecommender, ContextAnalysis, ContextAnalysisRequest,
    ContextAnalyzer, Lexicon, Recommender, RuleBasedContextAnalyzer, RuleBasedTaskAnalyzer,
    TaskAnalysisRequest, TaskAnalyzer, TaskSuggestion,
};
pub use storage::{Config, Repository, SqliteStore, Store};
pub use task::query::{CategoryFilter, SortField, SortOrder, StatusFilter, TaskFilter, TaskSort};
pub use task::stats::TaskStats;
pub use task::{NewTask, PriorityScore, Task, TaskPatch, TaskStatus};
pub use workflow::{ContextOutcome, Dashboard, Workspace};
