//! Task management commands for CLI.

use chrono::NaiveDate;
use clap::Subcommand;
use serde::Serialize;
use taskwise_core::{
    CategoryFilter, Config, NewTask, PriorityScore, SortField, SortOrder, StatusFilter, Task,
    TaskFilter, TaskPatch, TaskSort, TaskStatus,
};

use super::{block_on, open_workspace, print_json, CmdResult};

#[derive(Subcommand)]
pub enum TaskAction {
    /// Create a new task
    Add {
        /// Task title
        title: String,
        /// Task description
        #[arg(long, default_value = "")]
        description: String,
        /// Free-form category label
        #[arg(long, default_value = "")]
        category: String,
        /// Deadline as YYYY-MM-DD (default: today)
        #[arg(long)]
        deadline: Option<NaiveDate>,
        /// Priority from 1 (low) to 5 (high)
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=5))]
        priority: Option<u8>,
        /// Apply the heuristic suggestion before saving
        #[arg(long)]
        analyze: bool,
    },
    /// Print the heuristic suggestion for a draft without saving it
    Analyze {
        /// Task title
        title: String,
        /// Task description
        #[arg(long, default_value = "")]
        description: String,
    },
    /// List tasks
    List {
        /// Case-insensitive text in title or description
        #[arg(long, default_value = "")]
        search: String,
        /// all, pending, in_progress or completed
        #[arg(long, default_value = "all")]
        status: StatusFilter,
        /// all or an exact category label
        #[arg(long, default_value = "all")]
        category: String,
        /// priority, deadline or created (default: from config)
        #[arg(long)]
        sort: Option<SortField>,
        /// asc or desc (default: from config)
        #[arg(long)]
        order: Option<SortOrder>,
    },
    /// Toggle a task between pending and completed
    Toggle {
        /// Task ID
        id: String,
    },
    /// Update a task
    Edit {
        /// Task ID
        id: String,
        /// New title
        #[arg(long)]
        title: Option<String>,
        /// New description
        #[arg(long)]
        description: Option<String>,
        /// New category
        #[arg(long)]
        category: Option<String>,
        /// New priority (1-5)
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=5))]
        priority: Option<u8>,
        /// New deadline as YYYY-MM-DD
        #[arg(long)]
        deadline: Option<NaiveDate>,
        /// New status: pending, in_progress or completed
        #[arg(long)]
        status: Option<TaskStatus>,
    },
    /// Delete a task
    Delete {
        /// Task ID
        id: String,
    },
}

/// A listed task with its priority badge.
#[derive(Serialize)]
struct TaskRow<'a> {
    #[serde(flatten)]
    task: &'a Task,
    priority_label: &'static str,
}

impl<'a> From<&'a Task> for TaskRow<'a> {
    fn from(task: &'a Task) -> Self {
        Self {
            task,
            priority_label: task.priority_score.label(),
        }
    }
}

pub fn run(action: TaskAction, config: &Config) -> CmdResult {
    let ws = open_workspace(config)?;

    match action {
        TaskAction::Add {
            title,
            description,
            category,
            deadline,
            priority,
            analyze,
        } => {
            let mut draft = NewTask::new(title, deadline.unwrap_or_else(|| ws.today()))
                .description(description)
                .category(category);
            if let Some(p) = priority {
                draft = draft.priority(PriorityScore::new(p)?);
            }

            let suggestion = if analyze {
                Some(block_on(ws.analyze_draft(&draft.title, &draft.description))??)
            } else {
                None
            };
            let task = ws.create_task(draft, suggestion.as_ref())?;
            print_json(&task)?;
        }
        TaskAction::Analyze { title, description } => {
            let suggestion = block_on(ws.analyze_draft(&title, &description))??;
            print_json(&suggestion)?;
        }
        TaskAction::List {
            search,
            status,
            category,
            sort,
            order,
        } => {
            let filter = TaskFilter {
                search_term: search,
                status,
                category: CategoryFilter::from(category.as_str()),
            };
            let default_sort = config.default_sort();
            let sort = TaskSort::new(
                sort.unwrap_or(default_sort.field),
                order.unwrap_or(default_sort.order),
            );
            let tasks = ws.list_tasks(&filter, sort)?;
            if tasks.is_empty() && filter.is_active() {
                eprintln!("No tasks match your filters. Try adjusting your search or filters.");
            }
            let rows: Vec<TaskRow<'_>> = tasks.iter().map(TaskRow::from).collect();
            print_json(&rows)?;
        }
        TaskAction::Toggle { id } => {
            print_json(&ws.toggle_task(&id)?)?;
        }
        TaskAction::Edit {
            id,
            title,
            description,
            category,
            priority,
            deadline,
            status,
        } => {
            let patch = TaskPatch {
                title,
                description,
                category,
                priority_score: priority.map(PriorityScore::new).transpose()?,
                deadline,
                status,
            };
            print_json(&ws.edit_task(&id, &patch)?)?;
        }
        TaskAction::Delete { id } => {
            ws.delete_task(&id)?;
            println!("Task deleted: {id}");
        }
    }
    Ok(())
}
