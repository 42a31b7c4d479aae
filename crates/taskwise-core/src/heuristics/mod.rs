//! Heuristic engine.
//!
//! Three pluggable strategies sit behind [`Advisor`]: a [`TaskAnalyzer`]
//! scoring task drafts, a [`ContextAnalyzer`] annotating notes, and a
//! [`Recommender`] proposing task titles. The rule-based defaults are pure
//! and synchronous; the `*_delayed` methods add an artificial latency for
//! callers that want to present the analysis as a background step.

pub mod context_analyzer;
pub mod lexicon;
pub mod recommend;
pub mod task_analyzer;

pub use context_analyzer::{
    ContextAnalysis, ContextAnalysisRequest, ContextAnalyzer, RuleBasedContextAnalyzer,
};
pub use lexicon::Lexicon;
pub use recommend::{CannedRecommender, Recommender};
pub use task_analyzer::{RuleBasedTaskAnalyzer, TaskAnalysisRequest, TaskAnalyzer, TaskSuggestion};

use std::time::Duration;

use crate::context::ContextEntry;

/// One implementation of each heuristic strategy.
pub struct Advisor {
    task_analyzer: Box<dyn TaskAnalyzer + Send + Sync>,
    context_analyzer: Box<dyn ContextAnalyzer + Send + Sync>,
    recommender: Box<dyn Recommender + Send + Sync>,
}

impl Advisor {
    /// The lexicon-driven defaults.
    pub fn rule_based() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> AdvisorBuilder {
        AdvisorBuilder::default()
    }

    pub fn analyze_task(&self, request: &TaskAnalysisRequest<'_>) -> TaskSuggestion {
        self.task_analyzer.analyze(request)
    }

    pub fn analyze_context(&self, request: &ContextAnalysisRequest<'_>) -> ContextAnalysis {
        self.context_analyzer.analyze(request)
    }

    pub fn recommend(&self, entries: &[ContextEntry]) -> Vec<String> {
        self.recommender.recommend(entries)
    }

    /// [`Advisor::analyze_task`] after `latency`.
    pub async fn analyze_task_delayed(
        &self,
        request: &TaskAnalysisRequest<'_>,
        latency: Duration,
    ) -> TaskSuggestion {
        pause(latency).await;
        self.analyze_task(request)
    }

    /// [`Advisor::analyze_context`] after `latency`.
    pub async fn analyze_context_delayed(
        &self,
        request: &ContextAnalysisRequest<'_>,
        latency: Duration,
    ) -> ContextAnalysis {
        pause(latency).await;
        self.analyze_context(request)
    }

    /// [`Advisor::recommend`] after `latency`.
    pub async fn recommend_delayed(
        &self,
        entries: &[ContextEntry],
        latency: Duration,
    ) -> Vec<String> {
        pause(latency).await;
        self.recommend(entries)
    }
}

impl Default for Advisor {
    fn default() -> Self {
        Self::rule_based()
    }
}

impl std::fmt::Debug for Advisor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Advisor").finish_non_exhaustive()
    }
}

async fn pause(latency: Duration) {
    if !latency.is_zero() {
        tokio::time::sleep(latency).await;
    }
}

/// Builds an [`Advisor`], falling back to the rule-based default for any
/// strategy left unset.
#[derive(Default)]
pub struct AdvisorBuilder {
    task_analyzer: Option<Box<dyn TaskAnalyzer + Send + Sync>>,
    context_analyzer: Option<Box<dyn ContextAnalyzer + Send + Sync>>,
    recommender: Option<Box<dyn Recommender + Send + Sync>>,
}

impl AdvisorBuilder {
    pub fn task_analyzer(mut self, analyzer: impl TaskAnalyzer + 'static) -> Self {
        self.task_analyzer = Some(Box::new(analyzer));
        self
    }

    pub fn context_analyzer(mut self, analyzer: impl ContextAnalyzer + 'static) -> Self {
        self.context_analyzer = Some(Box::new(analyzer));
        self
    }

    pub fn recommender(mut self, recommender: impl Recommender + 'static) -> Self {
        self.recommender = Some(Box::new(recommender));
        self
    }

    pub fn build(self) -> Advisor {
        Advisor {
            task_analyzer: self
                .task_analyzer
                .unwrap_or_else(|| Box::new(RuleBasedTaskAnalyzer::default())),
            context_analyzer: self
                .context_analyzer
                .unwrap_or_else(|| Box::new(RuleBasedContextAnalyzer::default())),
            recommender: self
                .recommender
                .unwrap_or_else(|| Box::new(CannedRecommender)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Sentiment;
    use chrono::NaiveDate;

    struct AlwaysPositive;

    impl ContextAnalyzer for AlwaysPositive {
        fn analyze(&self, _request: &ContextAnalysisRequest<'_>) -> ContextAnalysis {
            ContextAnalysis {
                keywords: vec!["fixed".to_string()],
                sentiment: Sentiment::Positive,
                insights: String::new(),
                task_suggestions: Vec::new(),
            }
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    #[test]
    fn builder_substitutes_one_strategy() {
        let advisor = Advisor::builder().context_analyzer(AlwaysPositive).build();
        let analysis = advisor.analyze_context(&ContextAnalysisRequest::new("total failure"));
        assert_eq!(analysis.sentiment, Sentiment::Positive);
        assert_eq!(advisor.recommend(&[]).len(), 3);
    }

    #[tokio::test]
    async fn delayed_task_analysis_matches_sync() {
        let advisor = Advisor::rule_based();
        let request = TaskAnalysisRequest::new("Client report", "", &[], today()).unwrap();
        let delayed = advisor
            .analyze_task_delayed(&request, Duration::from_millis(5))
            .await;
        assert_eq!(delayed, advisor.analyze_task(&request));
    }

    #[tokio::test(start_paused = true)]
    async fn delayed_context_waits_for_latency() {
        let advisor = Advisor::rule_based();
        let started = tokio::time::Instant::now();
        let request = ContextAnalysisRequest::new("great meeting notes");
        advisor
            .analyze_context_delayed(&request, Duration::from_millis(1500))
            .await;
        assert!(started.elapsed() >= Duration::from_millis(1500));
    }

    #[tokio::test]
    async fn zero_latency_recommendations() {
        let advisor = Advisor::rule_based();
        let recs = advisor.recommend_delayed(&[], Duration::ZERO).await;
        assert_eq!(recs[0], "Schedule weekly team meeting");
    }
}
