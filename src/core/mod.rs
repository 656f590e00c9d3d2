// Core engine exports
pub mod aggregator;
pub mod analyzer;
pub mod classifier;
pub mod predicate;
pub mod variant;

pub use aggregator::{aggregate, percentage, AnalysisResult, GoalHistogram, MatchDetail, ModalGoals, SelectionRate};
pub use analyzer::{AnalysisError, AnalysisOutcome, Analyzer};
pub use classifier::{classify, selection_won};
pub use predicate::{build_predicate, Condition, MarketColumns, OddsColumn, SelectionPredicate, BAND_EPSILON, DEFAULT_TOLERANCE};
pub use variant::{AnalysisVariant, Bucketing};
