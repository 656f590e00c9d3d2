use crate::core::predicate::MarketColumns;
use crate::models::Period;

/// How realized goal counts are keyed in the histogram
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucketing {
    /// One key per exact goal count
    Exact,
    /// Keys 0, 1, 2 and a single key 3 standing for "3+"
    CappedAtThree,
}

impl Bucketing {
    pub const CAP: u32 = 3;

    #[inline]
    pub fn key(&self, goals: u32) -> u32 {
        match self {
            Bucketing::Exact => goals,
            Bucketing::CappedAtThree => goals.min(Self::CAP),
        }
    }

    /// Display label for a histogram key
    pub fn label(&self, key: u32) -> String {
        match self {
            Bucketing::CappedAtThree if key >= Self::CAP => format!("{}+", Self::CAP),
            _ => key.to_string(),
        }
    }
}

/// Market configuration of one analysis variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisVariant {
    pub name: &'static str,
    /// Goals are read from this period
    pub period: Period,
    /// Predicate columns
    pub columns: MarketColumns,
    /// Maximum number of matches fetched from the store
    pub limit: usize,
    pub bucketing: Bucketing,
    /// Result cache key prefix
    pub cache_prefix: &'static str,
}

impl AnalysisVariant {
    /// Success rates of binary selections over halftime goals
    pub const HALFTIME_SUCCESS_RATE: AnalysisVariant = AnalysisVariant {
        name: "halftime_success_rate",
        period: Period::Halftime,
        columns: MarketColumns::HALFTIME,
        limit: 100,
        bucketing: Bucketing::Exact,
        cache_prefix: "bet-analysis",
    };

    /// Halftime goal distribution
    pub const HALFTIME_GOALS: AnalysisVariant = AnalysisVariant {
        name: "halftime_goals",
        period: Period::Halftime,
        columns: MarketColumns::HALFTIME,
        limit: 1000,
        bucketing: Bucketing::CappedAtThree,
        cache_prefix: "goal-prediction",
    };

    /// Fulltime goal distribution
    pub const FULLTIME_GOALS: AnalysisVariant = AnalysisVariant {
        name: "fulltime_goals",
        period: Period::Fulltime,
        columns: MarketColumns::FULLTIME,
        limit: 1000,
        bucketing: Bucketing::CappedAtThree,
        cache_prefix: "fulltime-goal-prediction",
    };

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Cache key for a league and canonical odds payload
    pub fn cache_key(&self, league: &str, bet_odds_json: &str) -> String {
        format!("{}:{}:{}", self.cache_prefix, league, bet_odds_json)
    }
}
