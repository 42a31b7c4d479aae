//! Filtering and ordering of the task collection for display.
//!
//! [`query`] is pure: it borrows the input, never mutates it, and keeps no
//! cache between calls. Sorting is stable, and a descending order reverses
//! the comparator rather than the sorted sequence, so tasks that compare
//! equal keep their relative input order in both directions.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use super::{Task, TaskStatus};
use crate::error::ValidationError;

/// Keyword accepted by the status and category filters to mean "no filter".
pub const ALL: &str = "all";

/// Status filter: everything, or one status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusFilter {
    #[default]
    All,
    Only(TaskStatus),
}

impl StatusFilter {
    fn matches(self, status: TaskStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => wanted == status,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == ALL {
            Ok(StatusFilter::All)
        } else {
            s.parse().map(StatusFilter::Only)
        }
    }
}

/// Category filter: everything, or an exact label.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryFilter {
    #[default]
    All,
    Only(String),
}

impl CategoryFilter {
    fn matches(&self, category: &str) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(wanted) => wanted == category,
        }
    }
}

impl From<&str> for CategoryFilter {
    fn from(s: &str) -> Self {
        if s == ALL {
            CategoryFilter::All
        } else {
            CategoryFilter::Only(s.to_string())
        }
    }
}

/// Which tasks to keep.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TaskFilter {
    /// Case-insensitive substring of title or description; empty keeps all
    pub search_term: String,
    pub status: StatusFilter,
    pub category: CategoryFilter,
}

impl TaskFilter {
    pub fn matches(&self, task: &Task) -> bool {
        self.matches_search(task)
            && self.status.matches(task.status)
            && self.category.matches(&task.category)
    }

    fn matches_search(&self, task: &Task) -> bool {
        if self.search_term.is_empty() {
            return true;
        }
        let needle = self.search_term.to_lowercase();
        task.title.to_lowercase().contains(&needle)
            || task.description.to_lowercase().contains(&needle)
    }

    /// True when any of the three filters narrows the result.
    pub fn is_active(&self) -> bool {
        !self.search_term.is_empty()
            || self.status != StatusFilter::All
            || self.category != CategoryFilter::All
    }
}

/// Sort key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    #[default]
    Priority,
    Deadline,
    Created,
}

impl SortField {
    fn compare(self, a: &Task, b: &Task) -> Ordering {
        match self {
            SortField::Priority => a.priority_score.cmp(&b.priority_score),
            SortField::Deadline => a.deadline.cmp(&b.deadline),
            SortField::Created => a.created_at.cmp(&b.created_at),
        }
    }
}

impl FromStr for SortField {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "priority" => Ok(SortField::Priority),
            "deadline" => Ok(SortField::Deadline),
            "created" => Ok(SortField::Created),
            other => Err(ValidationError::InvalidValue {
                field: "sort".to_string(),
                message: format!("unknown sort field '{other}'"),
            }),
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SortField::Priority => "priority",
            SortField::Deadline => "deadline",
            SortField::Created => "created",
        })
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl FromStr for SortOrder {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(ValidationError::InvalidValue {
                field: "order".to_string(),
                message: format!("unknown sort order '{other}'"),
            }),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        })
    }
}

/// Sort key and direction. Defaults to highest priority first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TaskSort {
    pub field: SortField,
    pub order: SortOrder,
}

impl TaskSort {
    pub fn new(field: SortField, order: SortOrder) -> Self {
        Self { field, order }
    }

    fn compare(self, a: &Task, b: &Task) -> Ordering {
        let ordering = self.field.compare(a, b);
        match self.order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    }
}

/// Filters `tasks` and returns the survivors in sorted order.
pub fn query<'a, I>(tasks: I, filter: &TaskFilter, sort: TaskSort) -> Vec<Task>
where
    I: IntoIterator<Item = &'a Task>,
{
    let mut kept: Vec<Task> = tasks
        .into_iter()
        .filter(|task| filter.matches(task))
        .cloned()
        .collect();
    // `sort_by` is stable.
    kept.sort_by(|a, b| sort.compare(a, b));
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::PriorityScore;
    use chrono::{Duration, NaiveDate, TimeZone, Utc};

    fn task(id: &str, priority: u8, deadline: &str, created_offset_min: i64) -> Task {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
        let created = base + Duration::minutes(created_offset_min);
        Task {
            id: id.to_string(),
            title: format!("Task {id}"),
            description: String::new(),
            category: "General".to_string(),
            priority_score: PriorityScore::new(priority).unwrap(),
            deadline: NaiveDate::parse_from_str(deadline, "%Y-%m-%d").unwrap(),
            status: TaskStatus::Pending,
            created_at: created,
            updated_at: created,
            ai_enhanced: false,
            context_based: false,
        }
    }

    fn ids(tasks: &[Task]) -> Vec<&str> {
        tasks.iter().map(|t| t.id.as_str()).collect()
    }

    #[test]
    fn priority_desc_and_deadline_asc() {
        let tasks = vec![task("1", 2, "2024-01-10", 0), task("2", 5, "2024-01-05", 1)];
        let filter = TaskFilter::default();

        let by_priority = query(&tasks, &filter, TaskSort::new(SortField::Priority, SortOrder::Desc));
        assert_eq!(ids(&by_priority), vec!["2", "1"]);

        let by_deadline = query(&tasks, &filter, TaskSort::new(SortField::Deadline, SortOrder::Asc));
        assert_eq!(ids(&by_deadline), vec!["2", "1"]);
    }

    #[test]
    fn ties_keep_input_order_in_both_directions() {
        let tasks = vec![task("a", 3, "2024-01-10", 0), task("b", 3, "2024-01-10", 5)];
        let filter = TaskFilter::default();
        for order in [SortOrder::Asc, SortOrder::Desc] {
            let sorted = query(&tasks, &filter, TaskSort::new(SortField::Priority, order));
            assert_eq!(ids(&sorted), vec!["a", "b"]);
        }
    }

    #[test]
    fn created_sort_uses_timestamps() {
        let tasks = vec![task("late", 1, "2024-01-10", 30), task("early", 1, "2024-01-10", 0)];
        let sorted = query(
            &tasks,
            &TaskFilter::default(),
            TaskSort::new(SortField::Created, SortOrder::Asc),
        );
        assert_eq!(ids(&sorted), vec!["early", "late"]);
    }

    #[test]
    fn search_is_case_insensitive_over_title_and_description() {
        let mut with_desc = task("d", 3, "2024-01-10", 0);
        with_desc.description = "Call the CLIENT back".to_string();
        let tasks = vec![task("1", 3, "2024-01-10", 0), with_desc];

        let filter = TaskFilter {
            search_term: "client".to_string(),
            ..TaskFilter::default()
        };
        assert_eq!(ids(&query(&tasks, &filter, TaskSort::default())), vec!["d"]);

        let filter = TaskFilter {
            search_term: "TASK 1".to_string(),
            ..TaskFilter::default()
        };
        assert_eq!(ids(&query(&tasks, &filter, TaskSort::default())), vec!["1"]);
    }

    #[test]
    fn status_and_category_filters_combine() {
        let mut done_work = task("dw", 3, "2024-01-10", 0);
        done_work.status = TaskStatus::Completed;
        done_work.category = "Work".to_string();
        let mut pending_work = task("pw", 3, "2024-01-10", 1);
        pending_work.category = "Work".to_string();
        let tasks = vec![done_work, pending_work, task("pg", 3, "2024-01-10", 2)];

        let filter = TaskFilter {
            search_term: String::new(),
            status: "pending".parse().unwrap(),
            category: CategoryFilter::from("Work"),
        };
        assert_eq!(ids(&query(&tasks, &filter, TaskSort::default())), vec!["pw"]);
        assert!(filter.is_active());
        assert!(!TaskFilter::default().is_active());
    }

    #[test]
    fn all_keyword_disables_filters() {
        assert_eq!("all".parse::<StatusFilter>().unwrap(), StatusFilter::All);
        assert_eq!(CategoryFilter::from("all"), CategoryFilter::All);
        assert!("finished".parse::<StatusFilter>().is_err());
    }

    #[test]
    fn empty_input_yields_empty_output() {
        let tasks: Vec<Task> = Vec::new();
        assert!(query(&tasks, &TaskFilter::default(), TaskSort::default()).is_empty());
    }

    #[test]
    fn input_is_left_untouched() {
        let tasks = vec![task("1", 1, "2024-01-10", 0), task("2", 5, "2024-01-05", 1)];
        let before = tasks.clone();
        let _ = query(&tasks, &TaskFilter::default(), TaskSort::default());
        assert_eq!(tasks, before);
    }
}
