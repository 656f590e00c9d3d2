use async_trait::async_trait;
use thiserror::Error;
use crate::core::predicate::SelectionPredicate;
use crate::models::HistoricalMatch;

/// Errors that can occur when reading historical matches
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Invalid record {id}: {reason}")]
    InvalidRecord { id: i64, reason: String },

    #[error("Fixture I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Fixture parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Read access to the historical record store
#[async_trait]
pub trait MatchRepository: Send + Sync {
    /// Records satisfying `predicate`, newest first, at most `limit`.
    /// An empty result is not an error.
    async fn find(
        &self,
        predicate: &SelectionPredicate,
        limit: usize,
    ) -> Result<Vec<HistoricalMatch>, StoreError>;

    /// Whether the store is reachable
    async fn health_check(&self) -> Result<bool, StoreError>;
}
