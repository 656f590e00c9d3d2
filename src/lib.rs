//! Oddsmatch - odds-similarity outcome statistics for football betting markets
//!
//! This library locates historical matches whose quoted odds resemble a requested
//! set of odds and aggregates their realized outcomes into success rates, goal
//! distributions and most probable goal counts.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{AnalysisError, AnalysisOutcome, AnalysisResult, AnalysisVariant, Analyzer};
pub use models::{AnalysisRequest, BetOdds, HistoricalMatch, OddsQuery, Period, PeriodOdds};
pub use services::{InMemoryMatchStore, MatchRepository};
