// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{HistoricalMatch, Market, MarketOdds, OddsQuery, Period, PeriodOdds, Selection};
pub use requests::{AnalysisRequest, BetOdds, LineOdd, Odd};
pub use responses::{
    BetHistoryEntry, ErrorResponse, GoalHistoryEntry, GoalProbabilities, GoalProbabilityResponse,
    HealthResponse, MostProbableGoals, NotFoundResponse, SuccessRateResponse,
};
