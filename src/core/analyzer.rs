use thiserror::Error;
use crate::core::{
    aggregator::{aggregate, AnalysisResult, MatchDetail},
    classifier::classify,
    predicate::{build_predicate, SelectionPredicate, DEFAULT_TOLERANCE},
    variant::AnalysisVariant,
};
use crate::models::{HistoricalMatch, OddsQuery, Selection};
use crate::services::store::{MatchRepository, StoreError};

/// Errors that end an analysis request
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Record store unavailable: {0}")]
    StoreUnavailable(#[from] StoreError),
}

/// Terminal outcome of an analysis that did not fail
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisOutcome<T> {
    Found(T),
    /// No historical match satisfied the predicate
    NotFound,
}

impl<T> AnalysisOutcome<T> {
    pub fn found(self) -> Option<T> {
        match self {
            AnalysisOutcome::Found(value) => Some(value),
            AnalysisOutcome::NotFound => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, AnalysisOutcome::NotFound)
    }
}

/// Odds-similarity analysis pipeline
///
/// # Pipeline Stages
/// 1. Build the selection predicate for the variant's columns
/// 2. Fetch matching records, newest first, up to the variant's limit
/// 3. Classify every record against each active selection
/// 4. Aggregate into success rates, histogram and mode
#[derive(Debug, Clone, Copy)]
pub struct Analyzer {
    tolerance: f64,
}

impl Analyzer {
    pub fn new(tolerance: f64) -> Self {
        Self { tolerance }
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Predicate for a query under a variant
    pub fn select(
        &self,
        variant: &AnalysisVariant,
        query: &OddsQuery,
    ) -> Result<SelectionPredicate, AnalysisError> {
        build_predicate(query, &variant.columns, self.tolerance)
    }

    /// Classify and aggregate an already fetched match set
    pub fn analyze(
        &self,
        variant: &AnalysisVariant,
        query: &OddsQuery,
        matches: &[HistoricalMatch],
    ) -> AnalysisOutcome<AnalysisResult> {
        let selections: Vec<Selection> = query.selections();

        let details = matches
            .iter()
            .map(|record| {
                let (total, home, away) = record.goals(variant.period);
                MatchDetail {
                    match_label: record.match_label.clone(),
                    date: record.date_label(),
                    total_goals: total,
                    home_goals: home,
                    away_goals: away,
                    outcomes: classify(record, &selections, variant.period),
                }
            })
            .collect();

        aggregate(details, &selections, variant.period, variant.bucketing)
    }

    /// Run the full pipeline against a record store
    pub async fn run<R>(
        &self,
        store: &R,
        variant: &AnalysisVariant,
        query: &OddsQuery,
    ) -> Result<AnalysisOutcome<AnalysisResult>, AnalysisError>
    where
        R: MatchRepository + ?Sized,
    {
        let predicate = self.select(variant, query)?;

        tracing::debug!(
            variant = variant.name,
            league = %predicate.league,
            conditions = predicate.conditions.len(),
            "Built selection predicate"
        );

        let matches = store.find(&predicate, variant.limit).await?;

        tracing::debug!(
            variant = variant.name,
            matched = matches.len(),
            limit = variant.limit,
            "Fetched similar matches"
        );

        Ok(self.analyze(variant, query, &matches))
    }
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new(DEFAULT_TOLERANCE)
    }
}
