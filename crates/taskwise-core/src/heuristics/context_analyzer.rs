//! Rule-based analysis of a single context note.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::lexicon::{count_matches, Lexicon};
use crate::context::{Sentiment, MAX_KEYWORDS};

/// Tokens must be longer than this many characters to become keywords.
const MIN_KEYWORD_CHARS: usize = 3;
/// Keywords named in the insight sentence.
const INSIGHT_KEYWORDS: usize = 3;
/// Task suggestions returned per note.
const SUGGESTION_COUNT: usize = 2;

/// Canned follow-up suggestions. The rule-based analyzer does not consult
/// the note when picking them.
pub const SUGGESTION_POOL: [&str; 4] = [
    "Follow up on mentioned topics",
    "Schedule related meetings",
    "Prepare necessary documents",
    "Review and respond to requests",
];

/// Input to a context analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextAnalysisRequest<'a> {
    pub content: &'a str,
}

impl<'a> ContextAnalysisRequest<'a> {
    pub fn new(content: &'a str) -> Self {
        Self { content }
    }
}

/// Derived annotations for one note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextAnalysis {
    pub keywords: Vec<String>,
    pub sentiment: Sentiment,
    pub insights: String,
    pub task_suggestions: Vec<String>,
}

/// Derives sentiment, keywords, an insight line and task suggestions from
/// a note. Implementations must be total.
pub trait ContextAnalyzer: Send + Sync {
    fn analyze(&self, request: &ContextAnalysisRequest<'_>) -> ContextAnalysis;
}

/// Lexicon-driven default.
#[derive(Debug, Clone, Copy)]
pub struct RuleBasedContextAnalyzer {
    lexicon: &'static Lexicon,
}

impl RuleBasedContextAnalyzer {
    pub fn new(lexicon: &'static Lexicon) -> Self {
        Self { lexicon }
    }

    pub fn sentiment(&self, content: &str) -> Sentiment {
        let lowered = content.to_lowercase();
        let positive = count_matches(&lowered, self.lexicon.positive);
        let negative = count_matches(&lowered, self.lexicon.negative);
        if positive > negative {
            Sentiment::Positive
        } else if negative > positive {
            Sentiment::Negative
        } else {
            Sentiment::Neutral
        }
    }

    /// First five whitespace tokens longer than three characters that are
    /// not stopwords, in original order and casing. No deduplication.
    pub fn keywords(&self, content: &str) -> Vec<String> {
        content
            .split_whitespace()
            .filter(|token| token.chars().count() > MIN_KEYWORD_CHARS)
            .filter(|token| !self.lexicon.is_stopword(token))
            .take(MAX_KEYWORDS)
            .map(str::to_string)
            .collect()
    }
}

impl Default for RuleBasedContextAnalyzer {
    fn default() -> Self {
        Self::new(Lexicon::builtin())
    }
}

impl ContextAnalyzer for RuleBasedContextAnalyzer {
    fn analyze(&self, request: &ContextAnalysisRequest<'_>) -> ContextAnalysis {
        let sentiment = self.sentiment(request.content);
        let keywords = self.keywords(request.content);
        let themes = keywords
            .iter()
            .take(INSIGHT_KEYWORDS)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        let insights = format!(
            "Content analysis suggests {sentiment} sentiment. Key themes identified around {themes}."
        );
        let task_suggestions = SUGGESTION_POOL
            .iter()
            .take(SUGGESTION_COUNT)
            .map(|s| s.to_string())
            .collect();

        debug!(
            %sentiment,
            keywords = keywords.len(),
            "analyzed context note"
        );

        ContextAnalysis {
            keywords,
            sentiment,
            insights,
            task_suggestions,
        }
    }
}
