//! Fixed word lists and the matching primitives shared by the analyzers.
//!
//! Matching is substring containment on lower-cased text, not word
//! equality: "reporting" hits "report" and "homework" hits "home".

use serde::Serialize;

/// Read-only word lists used by the rule-based analyzers.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Lexicon {
    pub urgency: &'static [&'static str],
    pub work: &'static [&'static str],
    pub personal: &'static [&'static str],
    pub positive: &'static [&'static str],
    pub negative: &'static [&'static str],
    pub stopwords: &'static [&'static str],
}

static BUILTIN: Lexicon = Lexicon {
    urgency: &["urgent", "asap", "immediately", "critical", "emergency"],
    work: &["meeting", "presentation", "report", "project", "client"],
    personal: &["personal", "family", "health", "home", "shopping"],
    positive: &["good", "great", "excellent", "happy", "success", "complete"],
    negative: &["problem", "issue", "urgent", "failure", "delay", "cancel"],
    stopwords: &[
        "the", "and", "for", "are", "but", "not", "you", "all", "can", "had", "her", "was",
        "one", "our", "out", "day", "get", "has", "him", "his", "how", "its", "may", "new",
        "now", "old", "see", "two", "way", "who", "boy", "did", "she", "use", "air", "end",
        "why",
    ],
};

impl Lexicon {
    /// The built-in word lists.
    pub fn builtin() -> &'static Lexicon {
        &BUILTIN
    }

    /// `word` compared case-insensitively against the stopword list.
    pub fn is_stopword(&self, word: &str) -> bool {
        let lower = word.to_lowercase();
        self.stopwords.iter().any(|s| *s == lower)
    }
}

/// True if any entry of `words` occurs inside `lowered`.
///
/// `lowered` must already be lower-cased.
pub fn contains_any(lowered: &str, words: &[&str]) -> bool {
    words.iter().any(|w| lowered.contains(w))
}

/// Number of distinct entries of `words` occurring inside `lowered`.
pub fn count_matches(lowered: &str, words: &[&str]) -> usize {
    words.iter().filter(|w| lowered.contains(*w)).count()
}
