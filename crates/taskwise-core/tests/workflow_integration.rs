//! Integration tests for the user-facing workflows.
//!
//! Runs the full capture-context, analyze-draft, save-task cycle against
//! in-memory and on-disk SQLite stores.

use chrono::NaiveDate;
use std::time::Duration;
use taskwise_core::{
    CategoryFilter, FixedClock, NewCategory, NewTask, Repository, Sentiment, SortField, SortOrder,
    SourceType, SqliteStore, StatusFilter, TaskFilter, TaskSort, TaskStatus, Workspace,
};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 4).unwrap()
}

fn workspace() -> Workspace<SqliteStore> {
    Workspace::new(SqliteStore::open_in_memory().unwrap()).with_clock(FixedClock(today()))
}

#[tokio::test]
async fn test_context_then_enhanced_task() {
    let ws = workspace();

    let outcome = ws
        .add_context(
            "Quarterly budget review went great, roadmap looks solid",
            SourceType::Email,
        )
        .await
        .unwrap();
    assert_eq!(outcome.entry.sentiment, Sentiment::Positive);
    assert_eq!(
        outcome.entry.keywords,
        vec!["Quarterly", "budget", "review", "went", "great,"]
    );
    assert_eq!(outcome.recommendations.len(), 3);

    let suggestion = ws
        .analyze_draft("Prepare budget slides", "for the team")
        .await
        .unwrap();
    assert_eq!(suggestion.matched_keywords, vec!["budget"]);
    assert_eq!(suggestion.priority_score.value(), 4);

    let task = ws
        .create_task(NewTask::new("Prepare budget slides", today()), Some(&suggestion))
        .unwrap();
    assert!(task.ai_enhanced);
    assert!(task.context_based);
    assert_eq!(task.priority_score.value(), 4);
    assert_eq!(task.deadline, NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
    assert!(task
        .description
        .starts_with("for the team\n\nContext insights:"));
}

#[test]
fn test_plain_task_without_context() {
    let ws = workspace();
    let task = ws
        .create_task(
            NewTask::new("Call plumber", today()).category("Home"),
            None,
        )
        .unwrap();
    assert!(!task.ai_enhanced);
    assert!(!task.context_based);
    assert_eq!(task.category, "Home");
    assert_eq!(task.status, TaskStatus::Pending);
}

#[tokio::test]
async fn test_recommendations_follow_context() {
    let ws = workspace();
    assert!(ws.recommendations().await.unwrap().is_empty());

    ws.add_context("Lunch with the team", SourceType::Whatsapp)
        .await
        .unwrap();
    assert_eq!(
        ws.recommendations().await.unwrap(),
        vec![
            "Schedule weekly team meeting",
            "Prepare quarterly report",
            "Follow up on client feedback",
        ]
    );
}

#[tokio::test]
async fn test_only_five_newest_entries_feed_analysis() {
    let ws = workspace();
    ws.add_context("Garden tomatoes ripening", SourceType::Notes)
        .await
        .unwrap();
    for i in 0..5 {
        ws.add_context(&format!("Status filler{i} entry"), SourceType::Notes)
            .await
            .unwrap();
    }

    let suggestion = ws.analyze_draft("Water garden", "").await.unwrap();
    assert!(suggestion.matched_keywords.is_empty());
}

#[test]
fn test_list_tasks_with_filters_and_categories() {
    let ws = workspace();
    let high = NewTask::new("Ship release", today())
        .category("Work")
        .priority(taskwise_core::PriorityScore::new(5).unwrap());
    let low = NewTask::new("Read novel", today())
        .category("Personal")
        .priority(taskwise_core::PriorityScore::new(1).unwrap());
    ws.create_task(low, None).unwrap();
    let shipped = ws.create_task(high, None).unwrap();
    ws.toggle_task(&shipped.id).unwrap();

    let all = ws
        .list_tasks(&TaskFilter::default(), TaskSort::new(SortField::Priority, SortOrder::Asc))
        .unwrap();
    assert_eq!(all[0].title, "Read novel");

    let done = ws
        .list_tasks(
            &TaskFilter {
                status: StatusFilter::Only(TaskStatus::Completed),
                ..TaskFilter::default()
            },
            TaskSort::default(),
        )
        .unwrap();
    assert_eq!(done.len(), 1);
    assert_eq!(done[0].title, "Ship release");

    let personal = ws
        .list_tasks(
            &TaskFilter {
                category: CategoryFilter::from("Personal"),
                ..TaskFilter::default()
            },
            TaskSort::default(),
        )
        .unwrap();
    assert_eq!(personal.len(), 1);

    assert_eq!(ws.task_categories().unwrap(), vec!["Work", "Personal"]);
}

#[tokio::test]
async fn test_context_stats_and_dashboard() {
    let ws = workspace();
    ws.add_context("great success today", SourceType::Whatsapp)
        .await
        .unwrap();
    ws.add_context("meeting notes", SourceType::Email)
        .await
        .unwrap();

    let stats = ws.context_stats().unwrap();
    assert_eq!(stats.total, 2);
    assert_eq!(stats.whatsapp, 1);
    assert_eq!(stats.email, 1);
    assert_eq!(stats.positive, 1);

    let task = ws.create_task(NewTask::new("Follow up", today()), None).unwrap();
    let dashboard = ws.dashboard().unwrap();
    assert_eq!(dashboard.stats.total, 1);
    assert_eq!(dashboard.stats.pending, 1);
    assert_eq!(dashboard.recent[0].id, task.id);
}

#[test]
fn test_categories_workflow() {
    let ws = workspace();
    let created = ws
        .add_category(&NewCategory::new("Errands").color("#22c55e"))
        .unwrap();
    assert_eq!(created.usage_count, 0);
    assert!(ws.add_category(&NewCategory::new(" ")).is_err());

    let listed = ws.list_categories().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].color, "#22c55e");
}

#[test]
fn test_delete_task_then_missing() {
    let ws = workspace();
    let task = ws.create_task(NewTask::new("Temp", today()), None).unwrap();
    ws.delete_task(&task.id).unwrap();
    assert!(ws.delete_task(&task.id).is_err());
    assert!(ws.store().tasks().list().unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_latency_is_applied() {
    let ws = workspace().with_latency(Duration::from_millis(1500));
    let started = tokio::time::Instant::now();
    ws.analyze_draft("Anything", "").await.unwrap();
    assert!(started.elapsed() >= Duration::from_millis(1500));
}

#[test]
fn test_on_disk_store_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("taskwise.db");

    {
        let ws = Workspace::new(SqliteStore::open_at(&path).unwrap());
        ws.create_task(NewTask::new("Persisted", today()), None)
            .unwrap();
    }

    let ws = Workspace::new(SqliteStore::open_at(&path).unwrap());
    let tasks = ws
        .list_tasks(&TaskFilter::default(), TaskSort::default())
        .unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].title, "Persisted");
}
