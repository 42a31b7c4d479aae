//! User-facing flows over a [`Store`].
//!
//! [`Workspace`] is what a UI layer talks to. It reads records from the
//! store, hands immutable snapshots to the [`Advisor`], and writes the
//! results back. Repository errors propagate unchanged and nothing is
//! retried.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::info;

use crate::category::{Category, NewCategory};
use crate::clock::{Clock, SystemClock};
use crate::context::{ContextEntry, ContextStats, NewContextEntry, SourceType};
use crate::error::{DatabaseError, Result, ValidationError};
use crate::heuristics::{
    Advisor, ContextAnalysis, ContextAnalysisRequest, TaskAnalysisRequest, TaskSuggestion,
};
use crate::heuristics::task_analyzer::RECENT_CONTEXT_WINDOW;
use crate::storage::{Repository, Store};
use crate::task::query::{self, TaskFilter, TaskSort};
use crate::task::stats::{distinct_categories, TaskStats, RECENT_LIMIT};
use crate::task::{NewTask, Task, TaskPatch};

/// Result of recording a context note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextOutcome {
    pub entry: ContextEntry,
    pub analysis: ContextAnalysis,
    /// Recomputed over every stored entry after the insert
    pub recommendations: Vec<String>,
}

/// Dashboard summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dashboard {
    pub stats: TaskStats,
    /// Newest tasks first
    pub recent: Vec<Task>,
}

pub struct Workspace<S: Store> {
    store: S,
    advisor: Advisor,
    clock: Box<dyn Clock>,
    latency: Duration,
}

impl<S: Store> Workspace<S> {
    /// Rule-based advisor, system clock, no simulated latency.
    pub fn new(store: S) -> Self {
        Self {
            store,
            advisor: Advisor::rule_based(),
            clock: Box::new(SystemClock),
            latency: Duration::ZERO,
        }
    }

    pub fn with_advisor(mut self, advisor: Advisor) -> Self {
        self.advisor = advisor;
        self
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Delay applied before each heuristic result is returned.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn today(&self) -> chrono::NaiveDate {
        self.clock.today()
    }

    // === Tasks ===

    /// Scores a draft against the most recent context entries.
    ///
    /// # Errors
    /// Fails on a blank title or when the context cannot be read.
    pub async fn analyze_draft(&self, title: &str, description: &str) -> Result<TaskSuggestion> {
        let context = self.store.context_entries().list()?;
        let recent = &context[..context.len().min(RECENT_CONTEXT_WINDOW)];
        let request = TaskAnalysisRequest::new(title, description, recent, self.clock.today())?;
        Ok(self
            .advisor
            .analyze_task_delayed(&request, self.latency)
            .await)
    }

    /// Saves a task, optionally overwriting the draft with a suggestion.
    ///
    /// `context_based` is set when any context entry exists at save time.
    ///
    /// # Errors
    /// Fails on a blank title or a repository error.
    pub fn create_task(&self, draft: NewTask, suggestion: Option<&TaskSuggestion>) -> Result<Task> {
        let mut draft = match suggestion {
            Some(suggestion) => draft.apply_suggestion(suggestion),
            None => draft,
        };
        draft.validate()?;
        draft.context_based = !self.store.context_entries().list()?.is_empty();

        let task = self.store.tasks().insert(&draft)?;
        info!(
            id = %task.id,
            ai_enhanced = task.ai_enhanced,
            context_based = task.context_based,
            "created task"
        );
        Ok(task)
    }

    /// Flips pending/in-progress to completed and completed back to pending.
    ///
    /// # Errors
    /// Fails with [`DatabaseError::NotFound`] for an unknown id.
    pub fn toggle_task(&self, id: &str) -> Result<Task> {
        let tasks = self.store.tasks();
        let task = tasks.get(id)?.ok_or_else(|| DatabaseError::NotFound {
            table: "tasks",
            id: id.to_string(),
        })?;
        let updated = tasks.update(id, &TaskPatch::status(task.status.toggled()))?;
        info!(id, status = %updated.status, "toggled task");
        Ok(updated)
    }

    /// # Errors
    /// Fails when the patch blanks the title or the id is unknown.
    pub fn edit_task(&self, id: &str, patch: &TaskPatch) -> Result<Task> {
        if patch.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
            return Err(ValidationError::EmptyField("title").into());
        }
        Ok(self.store.tasks().update(id, patch)?)
    }

    /// # Errors
    /// Fails with [`DatabaseError::NotFound`] for an unknown id.
    pub fn delete_task(&self, id: &str) -> Result<()> {
        Ok(self.store.tasks().delete(id)?)
    }

    /// Filtered and ordered view of the stored tasks.
    ///
    /// # Errors
    /// Fails when the tasks cannot be read.
    pub fn list_tasks(&self, filter: &TaskFilter, sort: TaskSort) -> Result<Vec<Task>> {
        let tasks = self.store.tasks().list()?;
        Ok(query::query(&tasks, filter, sort))
    }

    /// Category filter options.
    ///
    /// # Errors
    /// Fails when the tasks cannot be read.
    pub fn task_categories(&self) -> Result<Vec<String>> {
        Ok(distinct_categories(&self.store.tasks().list()?))
    }

    /// # Errors
    /// Fails when the tasks cannot be read.
    pub fn dashboard(&self) -> Result<Dashboard> {
        let tasks = self.store.tasks().list()?;
        let stats = TaskStats::collect(&tasks, self.clock.today());
        let recent = tasks.into_iter().take(RECENT_LIMIT).collect();
        Ok(Dashboard { stats, recent })
    }

    // === Context ===

    /// Analyzes a note, stores it with its annotations, then recomputes
    /// recommendations over the refreshed list.
    ///
    /// A failure after the insert is returned as is; the entry stays stored.
    ///
    /// # Errors
    /// Fails on blank content or a repository error.
    pub async fn add_context(&self, content: &str, source: SourceType) -> Result<ContextOutcome> {
        NewContextEntry::new(content, source).validate()?;

        let analysis = self
            .advisor
            .analyze_context_delayed(&ContextAnalysisRequest::new(content), self.latency)
            .await;
        let draft = NewContextEntry::new(content, source).with_analysis(&analysis);
        draft.validate()?;

        let entries = self.store.context_entries();
        let entry = entries.insert(&draft)?;
        info!(id = %entry.id, sentiment = %entry.sentiment, "recorded context");

        let refreshed = entries.list()?;
        let recommendations = self
            .advisor
            .recommend_delayed(&refreshed, self.latency)
            .await;

        Ok(ContextOutcome {
            entry,
            analysis,
            recommendations,
        })
    }

    /// Analysis of a note without storing it.
    pub async fn preview_context(&self, content: &str) -> ContextAnalysis {
        self.advisor
            .analyze_context_delayed(&ContextAnalysisRequest::new(content), self.latency)
            .await
    }

    /// # Errors
    /// Fails when the entries cannot be read.
    pub fn list_context(&self) -> Result<Vec<ContextEntry>> {
        Ok(self.store.context_entries().list()?)
    }

    /// Suggested task titles. Empty when no context is stored.
    ///
    /// # Errors
    /// Fails when the entries cannot be read.
    pub async fn recommendations(&self) -> Result<Vec<String>> {
        let entries = self.store.context_entries().list()?;
        if entries.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self.advisor.recommend_delayed(&entries, self.latency).await)
    }

    /// # Errors
    /// Fails when the entries cannot be read.
    pub fn context_stats(&self) -> Result<ContextStats> {
        Ok(ContextStats::collect(&self.store.context_entries().list()?))
    }

    // === Categories ===

    /// # Errors
    /// Fails when the categories cannot be read.
    pub fn list_categories(&self) -> Result<Vec<Category>> {
        Ok(self.store.categories().list()?)
    }

    /// # Errors
    /// Fails on a blank name or a repository error.
    pub fn add_category(&self, draft: &NewCategory) -> Result<Category> {
        draft.validate()?;
        Ok(self.store.categories().insert(draft)?)
    }
}
