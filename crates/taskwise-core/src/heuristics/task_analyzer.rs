//! Rule-based scoring of a candidate task.
//!
//! Starting from priority 3 and category "General":
//!
//! | Rule                              | Effect                               |
//! |-----------------------------------|--------------------------------------|
//! | urgency word in title/description | priority +2                          |
//! | work word                         | category "Work", priority +1         |
//! | else personal word                | category "Personal"                  |
//! | recent context keyword in text    | priority +1, description annotated   |
//!
//! Every bump caps at 5. The suggested deadline is 1, 3 or 7 days out for
//! priority ≥4, ==3 and ≤2 respectively.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::lexicon::{contains_any, Lexicon};
use crate::context::ContextEntry;
use crate::error::ValidationError;
use crate::task::PriorityScore;

/// Context entries consulted, counted from the front of the caller's list.
pub const RECENT_CONTEXT_WINDOW: usize = 5;

const DEFAULT_CATEGORY: &str = "General";
const WORK_CATEGORY: &str = "Work";
const PERSONAL_CATEGORY: &str = "Personal";

/// Input to a task analysis.
///
/// `recent_context` must already be ordered newest first.
#[derive(Debug, Clone, Copy)]
pub struct TaskAnalysisRequest<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub recent_context: &'a [ContextEntry],
    pub today: NaiveDate,
}

impl<'a> TaskAnalysisRequest<'a> {
    /// Rejects a blank title; nothing else is validated.
    pub fn new(
        title: &'a str,
        description: &'a str,
        recent_context: &'a [ContextEntry],
        today: NaiveDate,
    ) -> Result<Self, ValidationError> {
        if title.trim().is_empty() {
            return Err(ValidationError::EmptyField("title"));
        }
        Ok(Self {
            title,
            description,
            recent_context,
            today,
        })
    }
}

/// Suggested values for a task draft, plus a human-readable explanation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSuggestion {
    pub priority_score: PriorityScore,
    pub suggested_deadline: NaiveDate,
    pub enhanced_description: String,
    pub suggested_category: String,
    pub reasoning: String,
    /// Recent context keywords found in the task text
    pub matched_keywords: Vec<String>,
}

impl TaskSuggestion {
    pub fn context_enhanced(&self) -> bool {
        !self.matched_keywords.is_empty()
    }
}

/// Scores a task draft. Implementations must be total and deterministic
/// for a fixed request.
pub trait TaskAnalyzer: Send + Sync {
    fn analyze(&self, request: &TaskAnalysisRequest<'_>) -> TaskSuggestion;
}

/// Lexicon-driven default.
#[derive(Debug, Clone, Copy)]
pub struct RuleBasedTaskAnalyzer {
    lexicon: &'static Lexicon,
}

impl RuleBasedTaskAnalyzer {
    pub fn new(lexicon: &'static Lexicon) -> Self {
        Self { lexicon }
    }
}

impl Default for RuleBasedTaskAnalyzer {
    fn default() -> Self {
        Self::new(Lexicon::builtin())
    }
}

impl TaskAnalyzer for RuleBasedTaskAnalyzer {
    fn analyze(&self, request: &TaskAnalysisRequest<'_>) -> TaskSuggestion {
        let text = format!("{} {}", request.title, request.description).to_lowercase();

        let mut priority = PriorityScore::MEDIUM;
        let mut category = DEFAULT_CATEGORY;

        if contains_any(&text, self.lexicon.urgency) {
            priority = priority.saturating_bump(2);
        }

        if contains_any(&text, self.lexicon.work) {
            category = WORK_CATEGORY;
            priority = priority.saturating_bump(1);
        } else if contains_any(&text, self.lexicon.personal) {
            category = PERSONAL_CATEGORY;
        }

        let matched = matching_context_keywords(&text, request.recent_context);
        if !matched.is_empty() {
            priority = priority.saturating_bump(1);
        }

        let enhanced_description = if matched.is_empty() {
            request.description.to_string()
        } else {
            format!(
                "{}\n\nContext insights: Related to recent discussions about {}",
                request.description,
                matched.join(", ")
            )
        };

        let reasoning = format!(
            "Priority based on content analysis ({priority}/5). {}",
            if matched.is_empty() {
                "No recent context available."
            } else {
                "Enhanced with context from recent entries."
            }
        );

        let suggested_deadline = request
            .today
            .checked_add_days(Days::new(deadline_offset_days(priority)))
            .unwrap_or(request.today);

        debug!(
            priority = priority.value(),
            category,
            matched = matched.len(),
            "analyzed task draft"
        );

        TaskSuggestion {
            priority_score: priority,
            suggested_deadline,
            enhanced_description,
            suggested_category: category.to_string(),
            reasoning,
            matched_keywords: matched,
        }
    }
}

/// Days until the suggested deadline for a final priority.
pub fn deadline_offset_days(priority: PriorityScore) -> u64 {
    match priority.value() {
        4..=5 => 1,
        3 => 3,
        _ => 7,
    }
}

/// Union of the keywords of the first [`RECENT_CONTEXT_WINDOW`] entries,
/// in first-seen order, keeping those whose lower-cased form occurs in `text`.
fn matching_context_keywords(text: &str, recent: &[ContextEntry]) -> Vec<String> {
    let mut matched: Vec<String> = Vec::new();
    let keywords = recent
        .iter()
        .take(RECENT_CONTEXT_WINDOW)
        .flat_map(|entry| entry.keywords.iter());
    for keyword in keywords {
        if matched.contains(keyword) {
            continue;
        }
        if text.contains(&keyword.to_lowercase()) {
            matched.push(keyword.clone());
        }
    }
    matched
}
