use async_trait::async_trait;
use sqlx::postgres::{PgPoolOptions, PgRow, Postgres};
use sqlx::{PgPool, QueryBuilder, Row};
use std::time::Duration;
use crate::core::predicate::{Condition, SelectionPredicate};
use crate::models::{HistoricalMatch, PeriodOdds};
use crate::services::store::{MatchRepository, StoreError};

const SELECT_COLUMNS: &str = r#"
    SELECT
        id, league, match, date, home_team, away_team,
        halftime_goals, home_half_goals, away_half_goals,
        fulltime_goals, home_full_goals, away_full_goals,
        htou_hcap, htou01, htou02, htoe01, htoe02, htbg01, htbg02,
        ou_hcap, ou01, ou02, oe01, oe02, bg01, bg02
    FROM match_history
"#;

/// PostgreSQL-backed historical record store
///
/// Read-only: the `match_history` table is populated by the ingestion
/// pipeline, this client only selects from it.
pub struct PostgresMatchStore {
    pool: PgPool,
}

impl PostgresMatchStore {
    /// Create a new store from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout_secs: u64,
        idle_timeout_secs: u64,
    ) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(acquire_timeout_secs))
            .idle_timeout(Duration::from_secs(idle_timeout_secs))
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    /// Create a new store from settings
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
        acquire_timeout_secs: Option<u64>,
        idle_timeout_secs: Option<u64>,
    ) -> Result<Self, StoreError> {
        tracing::info!("Connecting to PostgreSQL record store");

        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
            acquire_timeout_secs.unwrap_or(5),
            idle_timeout_secs.unwrap_or(600),
        )
        .await
    }
}

/// Escape LIKE metacharacters so the league is matched literally
pub fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len() + 2);
    for c in value.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Render a predicate as a bound-parameter query
pub fn build_find_query(predicate: &SelectionPredicate, limit: usize) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::<Postgres>::new(SELECT_COLUMNS);

    qb.push(" WHERE league ILIKE ")
        .push_bind(format!("%{}%", escape_like(&predicate.league)));

    for condition in &predicate.conditions {
        match *condition {
            Condition::Equals { column, value } => {
                qb.push(" AND ").push(column.name()).push(" = ").push_bind(value);
            }
            Condition::Between { column, min, max } => {
                qb.push(" AND ")
                    .push(column.name())
                    .push(" BETWEEN ")
                    .push_bind(min)
                    .push(" AND ")
                    .push_bind(max);
            }
        }
    }

    qb.push(" ORDER BY date DESC, id DESC LIMIT ").push_bind(limit as i64);
    qb
}

fn goal_count(row: &PgRow, id: i64, column: &str) -> Result<u32, StoreError> {
    let value: i32 = row.try_get(column)?;
    u32::try_from(value).map_err(|_| StoreError::InvalidRecord {
        id,
        reason: format!("negative {}: {}", column, value),
    })
}

fn period_odds(row: &PgRow, columns: [&str; 7]) -> Result<PeriodOdds, StoreError> {
    Ok(PeriodOdds {
        ou_line: row.try_get(columns[0])?,
        over: row.try_get(columns[1])?,
        under: row.try_get(columns[2])?,
        odd: row.try_get(columns[3])?,
        even: row.try_get(columns[4])?,
        btts_yes: row.try_get(columns[5])?,
        btts_no: row.try_get(columns[6])?,
    })
}

fn map_row(row: &PgRow) -> Result<HistoricalMatch, StoreError> {
    let id: i64 = row.try_get("id")?;

    Ok(HistoricalMatch {
        id,
        league: row.try_get("league")?,
        match_label: row.try_get("match")?,
        date: row.try_get("date")?,
        home_team: row.try_get::<Option<String>, _>("home_team")?.unwrap_or_default(),
        away_team: row.try_get::<Option<String>, _>("away_team")?.unwrap_or_default(),
        halftime_goals: goal_count(row, id, "halftime_goals")?,
        home_half_goals: goal_count(row, id, "home_half_goals")?,
        away_half_goals: goal_count(row, id, "away_half_goals")?,
        fulltime_goals: goal_count(row, id, "fulltime_goals")?,
        home_full_goals: goal_count(row, id, "home_full_goals")?,
        away_full_goals: goal_count(row, id, "away_full_goals")?,
        halftime_odds: period_odds(
            row,
            ["htou_hcap", "htou01", "htou02", "htoe01", "htoe02", "htbg01", "htbg02"],
        )?,
        fulltime_odds: period_odds(row, ["ou_hcap", "ou01", "ou02", "oe01", "oe02", "bg01", "bg02"])?,
    })
}

#[async_trait]
impl MatchRepository for PostgresMatchStore {
    async fn find(
        &self,
        predicate: &SelectionPredicate,
        limit: usize,
    ) -> Result<Vec<HistoricalMatch>, StoreError> {
        let mut qb = build_find_query(predicate, limit);
        let rows = qb.build().fetch_all(&self.pool).await?;

        let matches = rows.iter().map(map_row).collect::<Result<Vec<_>, _>>()?;

        tracing::debug!("Selected {} historical matches (limit {})", matches.len(), limit);

        Ok(matches)
    }

    async fn health_check(&self) -> Result<bool, StoreError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}
