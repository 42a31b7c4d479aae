//! Task model.
//!
//! A task is owned by the repository; the core only ever holds transient
//! copies. Status transitions are unconstrained, and the only transition the
//! core drives itself is the pending ⇄ completed toggle.

pub mod query;
pub mod stats;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;
use crate::heuristics::TaskSuggestion;

/// Lowest allowed priority score.
pub const MIN_PRIORITY: u8 = 1;
/// Highest allowed priority score.
pub const MAX_PRIORITY: u8 = 5;

/// Task urgency on a 1 (low) to 5 (high) scale.
///
/// The bounds are enforced at construction, so every value in circulation
/// is within `[1, 5]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct PriorityScore(u8);

impl PriorityScore {
    /// Starting score for every heuristic analysis.
    pub const MEDIUM: PriorityScore = PriorityScore(3);

    pub fn new(value: u8) -> Result<Self, ValidationError> {
        if (MIN_PRIORITY..=MAX_PRIORITY).contains(&value) {
            Ok(Self(value))
        } else {
            Err(ValidationError::OutOfRange {
                field: "priority_score",
                min: MIN_PRIORITY as i64,
                max: MAX_PRIORITY as i64,
                value: value as i64,
            })
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// Adds `amount`, capping at the maximum.
    pub fn saturating_bump(self, amount: u8) -> Self {
        Self(self.0.saturating_add(amount).min(MAX_PRIORITY))
    }

    /// Badge label shown next to a task.
    pub fn label(self) -> &'static str {
        match self.0 {
            4..=5 => "High",
            3 => "Medium",
            _ => "Low",
        }
    }
}

impl Default for PriorityScore {
    fn default() -> Self {
        Self::MEDIUM
    }
}

impl TryFrom<u8> for PriorityScore {
    type Error = ValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PriorityScore> for u8 {
    fn from(score: PriorityScore) -> Self {
        score.0
    }
}

impl fmt::Display for PriorityScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Task lifecycle state.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

impl TaskStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Completed => "completed",
        }
    }

    /// Completion toggle: completed goes back to pending, anything else
    /// becomes completed.
    pub fn toggled(self) -> Self {
        match self {
            TaskStatus::Completed => TaskStatus::Pending,
            _ => TaskStatus::Completed,
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(TaskStatus::Pending),
            "in_progress" => Ok(TaskStatus::InProgress),
            "completed" => Ok(TaskStatus::Completed),
            other => Err(ValidationError::InvalidValue {
                field: "status".to_string(),
                message: format!("unknown status '{other}'"),
            }),
        }
    }
}

/// A stored task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Store-assigned identifier
    pub id: String,
    pub title: String,
    pub description: String,
    /// Free-form label, e.g. "Work"
    pub category: String,
    pub priority_score: PriorityScore,
    /// Calendar date; time of day is irrelevant
    pub deadline: NaiveDate,
    pub status: TaskStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// True iff heuristic suggestions were applied before saving
    pub ai_enhanced: bool,
    /// True iff at least one context entry existed at creation time
    pub context_based: bool,
}

impl Task {
    /// Past its deadline and not yet completed.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.deadline < today && self.status != TaskStatus::Completed
    }
}

/// Insert shape for a task; the store assigns id and timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub category: String,
    #[serde(default)]
    pub priority_score: PriorityScore,
    pub deadline: NaiveDate,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub ai_enhanced: bool,
    #[serde(default)]
    pub context_based: bool,
}

impl NewTask {
    pub fn new(title: impl Into<String>, deadline: NaiveDate) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            category: String::new(),
            priority_score: PriorityScore::default(),
            deadline,
            status: TaskStatus::Pending,
            ai_enhanced: false,
            context_based: false,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn priority(mut self, priority: PriorityScore) -> Self {
        self.priority_score = priority;
        self
    }

    /// Replaces the heuristic-owned fields with a suggestion and marks the
    /// draft as enhanced.
    pub fn apply_suggestion(mut self, suggestion: &TaskSuggestion) -> Self {
        self.description = suggestion.enhanced_description.clone();
        self.category = suggestion.suggested_category.clone();
        self.deadline = suggestion.suggested_deadline;
        self.priority_score = suggestion.priority_score;
        self.ai_enhanced = true;
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::EmptyField("title"));
        }
        Ok(())
    }
}

/// Partial update for a task. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub priority_score: Option<PriorityScore>,
    pub deadline: Option<NaiveDate>,
    pub status: Option<TaskStatus>,
}

impl TaskPatch {
    pub fn status(status: TaskStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Applies the set fields onto `task`. Timestamps are left to the store.
    pub fn apply_to(&self, task: &mut Task) {
        if let Some(title) = &self.title {
            task.title = title.clone();
        }
        if let Some(description) = &self.description {
            task.description = description.clone();
        }
        if let Some(category) = &self.category {
            task.category = category.clone();
        }
        if let Some(priority) = self.priority_score {
            task.priority_score = priority;
        }
        if let Some(deadline) = self.deadline {
            task.deadline = deadline;
        }
        if let Some(status) = self.status {
            task.status = status;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample_task() -> Task {
        let now = Utc::now();
        Task {
            id: "t-1".to_string(),
            title: "Write report".to_string(),
            description: String::new(),
            category: "Work".to_string(),
            priority_score: PriorityScore::MEDIUM,
            deadline: date(2024, 1, 10),
            status: TaskStatus::Pending,
            created_at: now,
            updated_at: now,
            ai_enhanced: false,
            context_based: false,
        }
    }

    #[test]
    fn priority_rejects_out_of_range() {
        assert!(PriorityScore::new(0).is_err());
        assert!(PriorityScore::new(6).is_err());
        assert_eq!(PriorityScore::new(5).unwrap().value(), 5);
    }

    #[test]
    fn priority_bump_caps_at_five() {
        let p = PriorityScore::new(4).unwrap();
        assert_eq!(p.saturating_bump(2).value(), 5);
        assert_eq!(PriorityScore::MEDIUM.saturating_bump(1).value(), 4);
        assert_eq!(p.saturating_bump(u8::MAX).value(), 5);
    }

    #[test]
    fn priority_labels() {
        assert_eq!(PriorityScore::new(5).unwrap().label(), "High");
        assert_eq!(PriorityScore::new(4).unwrap().label(), "High");
        assert_eq!(PriorityScore::new(3).unwrap().label(), "Medium");
        assert_eq!(PriorityScore::new(1).unwrap().label(), "Low");
    }

    #[test]
    fn priority_deserialization_enforces_bounds() {
        assert!(serde_json::from_str::<PriorityScore>("9").is_err());
        let p: PriorityScore = serde_json::from_str("2").unwrap();
        assert_eq!(p.value(), 2);
    }

    #[test]
    fn toggle_round_trips_pending_and_completed() {
        assert_eq!(TaskStatus::Pending.toggled(), TaskStatus::Completed);
        assert_eq!(TaskStatus::Completed.toggled(), TaskStatus::Pending);
        assert_eq!(TaskStatus::InProgress.toggled(), TaskStatus::Completed);
    }

    #[test]
    fn status_parses_wire_names() {
        assert_eq!("in_progress".parse::<TaskStatus>().unwrap(), TaskStatus::InProgress);
        assert!("done".parse::<TaskStatus>().is_err());
        assert_eq!(
            serde_json::to_string(&TaskStatus::InProgress).unwrap(),
            "\"in_progress\""
        );
    }

    #[test]
    fn overdue_ignores_completed_tasks() {
        let mut task = sample_task();
        assert!(task.is_overdue(date(2024, 1, 11)));
        assert!(!task.is_overdue(date(2024, 1, 10)));
        task.status = TaskStatus::Completed;
        assert!(!task.is_overdue(date(2024, 1, 11)));
    }

    #[test]
    fn blank_title_fails_validation() {
        let draft = NewTask::new("   ", date(2024, 1, 1));
        assert_eq!(draft.validate(), Err(ValidationError::EmptyField("title")));
    }

    #[test]
    fn patch_applies_only_set_fields() {
        let mut task = sample_task();
        let patch = TaskPatch {
            title: Some("Ship report".to_string()),
            ..TaskPatch::default()
        };
        patch.apply_to(&mut task);
        assert_eq!(task.title, "Ship report");
        assert_eq!(task.category, "Work");
        assert!(TaskPatch::default().is_empty());
        assert!(!TaskPatch::status(TaskStatus::Completed).is_empty());
    }
}
