//! Context entries: free-text notes from a source channel, annotated once
//! with sentiment, keywords and an insight line at creation time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;
use crate::heuristics::ContextAnalysis;

/// Upper bound on stored keywords per entry.
pub const MAX_KEYWORDS: usize = 5;

/// Channel a note came from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum SourceType {
    Whatsapp,
    Email,
    #[default]
    Notes,
}

impl SourceType {
    pub fn as_str(self) -> &'static str {
        match self {
            SourceType::Whatsapp => "whatsapp",
            SourceType::Email => "email",
            SourceType::Notes => "notes",
        }
    }
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "whatsapp" => Ok(SourceType::Whatsapp),
            "email" => Ok(SourceType::Email),
            "notes" => Ok(SourceType::Notes),
            other => Err(ValidationError::InvalidValue {
                field: "source_type".to_string(),
                message: format!("unknown source '{other}'"),
            }),
        }
    }
}

/// Three-valued sentiment of a note.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum Sentiment {
    Positive,
    Negative,
    #[default]
    Neutral,
}

impl Sentiment {
    pub fn as_str(self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Negative => "negative",
            Sentiment::Neutral => "neutral",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sentiment {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "positive" => Ok(Sentiment::Positive),
            "negative" => Ok(Sentiment::Negative),
            "neutral" => Ok(Sentiment::Neutral),
            other => Err(ValidationError::InvalidValue {
                field: "sentiment".to_string(),
                message: format!("unknown sentiment '{other}'"),
            }),
        }
    }
}

/// A stored context entry. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextEntry {
    pub id: String,
    pub content: String,
    pub source_type: SourceType,
    pub created_at: DateTime<Utc>,
    /// Empty until analyzed
    #[serde(default)]
    pub processed_insights: String,
    /// At most [`MAX_KEYWORDS`], in extraction order
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub sentiment: Sentiment,
}

/// Insert shape for a context entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewContextEntry {
    pub content: String,
    pub source_type: SourceType,
    #[serde(default)]
    pub processed_insights: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub sentiment: Sentiment,
}

impl NewContextEntry {
    /// Unanalyzed draft.
    pub fn new(content: impl Into<String>, source_type: SourceType) -> Self {
        Self {
            content: content.into(),
            source_type,
            processed_insights: String::new(),
            keywords: Vec::new(),
            sentiment: Sentiment::Neutral,
        }
    }

    /// Copies the analysis results onto the draft, capping keywords.
    pub fn with_analysis(mut self, analysis: &ContextAnalysis) -> Self {
        self.processed_insights = analysis.insights.clone();
        self.keywords = analysis
            .keywords
            .iter()
            .take(MAX_KEYWORDS)
            .cloned()
            .collect();
        self.sentiment = analysis.sentiment;
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.content.trim().is_empty() {
            return Err(ValidationError::EmptyField("content"));
        }
        if self.keywords.len() > MAX_KEYWORDS {
            return Err(ValidationError::OutOfRange {
                field: "keywords",
                min: 0,
                max: MAX_KEYWORDS as i64,
                value: self.keywords.len() as i64,
            });
        }
        Ok(())
    }
}

/// Counters shown above the context feed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextStats {
    pub total: usize,
    pub whatsapp: usize,
    pub email: usize,
    pub notes: usize,
    pub positive: usize,
}

impl ContextStats {
    pub fn collect(entries: &[ContextEntry]) -> Self {
        let mut stats = ContextStats {
            total: entries.len(),
            ..ContextStats::default()
        };
        for entry in entries {
            match entry.source_type {
                SourceType::Whatsapp => stats.whatsapp += 1,
                SourceType::Email => stats.email += 1,
                SourceType::Notes => stats.notes += 1,
            }
            if entry.sentiment == Sentiment::Positive {
                stats.positive += 1;
            }
        }
        stats
    }
}
