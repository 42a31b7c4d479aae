//! Task recommendations from accumulated context.

use crate::context::ContextEntry;

/// Recommendations returned by [`CannedRecommender`].
const RECOMMENDATION_COUNT: usize = 3;

pub const RECOMMENDATION_POOL: [&str; 5] = [
    "Schedule weekly team meeting",
    "Prepare quarterly report",
    "Follow up on client feedback",
    "Update project documentation",
    "Review and approve budget proposals",
];

/// Produces suggested task titles from the stored context entries.
pub trait Recommender: Send + Sync {
    fn recommend(&self, entries: &[ContextEntry]) -> Vec<String>;
}

/// Returns the first three entries of a fixed pool and never looks at the
/// context itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct CannedRecommender;

impl Recommender for CannedRecommender {
    fn recommend(&self, _entries: &[ContextEntry]) -> Vec<String> {
        RECOMMENDATION_POOL
            .iter()
            .take(RECOMMENDATION_COUNT)
            .map(|s| s.to_string())
            .collect()
    }
}
