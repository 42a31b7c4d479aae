//! Dashboard counters over the task collection.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Task, TaskStatus};

/// Number of tasks shown in the "recent" panel.
pub const RECENT_LIMIT: usize = 5;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskStats {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    pub in_progress: usize,
    pub overdue: usize,
    pub ai_enhanced: usize,
    /// Completed share of all tasks as a whole percent, 0 when there are none.
    pub completion_rate: u8,
}

impl TaskStats {
    pub fn collect(tasks: &[Task], today: NaiveDate) -> Self {
        let mut stats = TaskStats {
            total: tasks.len(),
            ..TaskStats::default()
        };
        for task in tasks {
            match task.status {
                TaskStatus::Completed => stats.completed += 1,
                TaskStatus::Pending => stats.pending += 1,
                TaskStatus::InProgress => stats.in_progress += 1,
            }
            if task.is_overdue(today) {
                stats.overdue += 1;
            }
            if task.ai_enhanced {
                stats.ai_enhanced += 1;
            }
        }
        if stats.total > 0 {
            let rate = stats.completed as f64 / stats.total as f64 * 100.0;
            stats.completion_rate = rate.round() as u8;
        }
        stats
    }
}

/// Distinct task categories in first-seen order.
pub fn distinct_categories(tasks: &[Task]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for task in tasks {
        if !seen.iter().any(|c| c == &task.category) {
            seen.push(task.category.clone());
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::PriorityScore;
    use chrono::Utc;

    fn task(category: &str, status: TaskStatus, deadline: NaiveDate, ai: bool) -> Task {
        let now = Utc::now();
        Task {
            id: uuid::Uuid::new_v4().to_string(),
            title: "t".to_string(),
            description: String::new(),
            category: category.to_string(),
            priority_score: PriorityScore::MEDIUM,
            deadline,
            status,
            created_at: now,
            updated_at: now,
            ai_enhanced: ai,
            context_based: false,
        }
    }

    #[test]
    fn counts_each_status_and_overdue() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        let past = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let tasks = vec![
            task("Work", TaskStatus::Pending, past, true),
            task("Work", TaskStatus::Completed, past, false),
            task("Home", TaskStatus::InProgress, today, true),
        ];
        let stats = TaskStats::collect(&tasks, today);
        assert_eq!(
            stats,
            TaskStats {
                total: 3,
                completed: 1,
                pending: 1,
                in_progress: 1,
                overdue: 1,
                ai_enhanced: 2,
                completion_rate: 33,
            }
        );
    }

    #[test]
    fn completion_rate_rounds_to_whole_percent() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        assert_eq!(TaskStats::collect(&[], today).completion_rate, 0);

        let tasks = vec![
            task("Work", TaskStatus::Completed, today, false),
            task("Work", TaskStatus::Completed, today, false),
            task("Work", TaskStatus::Pending, today, false),
        ];
        assert_eq!(TaskStats::collect(&tasks, today).completion_rate, 67);

        let done = vec![task("Work", TaskStatus::Completed, today, false)];
        assert_eq!(TaskStats::collect(&done, today).completion_rate, 100);
    }

    #[test]
    fn categories_are_deduplicated_in_order() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        let tasks = vec![
            task("Work", TaskStatus::Pending, today, false),
            task("Personal", TaskStatus::Pending, today, false),
            task("Work", TaskStatus::Pending, today, false),
        ];
        assert_eq!(distinct_categories(&tasks), vec!["Work", "Personal"]);
    }
}
