use async_trait::async_trait;
use std::path::Path;
use crate::core::predicate::SelectionPredicate;
use crate::models::HistoricalMatch;
use crate::services::store::{MatchRepository, StoreError};

/// Record store held in process memory
///
/// Evaluates the selection predicate in Rust with the same semantics as the
/// PostgreSQL adapter. Used for tests, benches and running against a JSON
/// fixture without a database.
#[derive(Debug, Clone, Default)]
pub struct InMemoryMatchStore {
    matches: Vec<HistoricalMatch>,
}

impl InMemoryMatchStore {
    pub fn new(matches: Vec<HistoricalMatch>) -> Self {
        Self { matches }
    }

    /// Load a JSON array of matches
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let matches: Vec<HistoricalMatch> = serde_json::from_str(&raw)?;

        tracing::info!(
            "Loaded {} historical matches from {}",
            matches.len(),
            path.as_ref().display()
        );

        Ok(Self::new(matches))
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// Synchronous form of `find`
    pub fn select(&self, predicate: &SelectionPredicate, limit: usize) -> Vec<HistoricalMatch> {
        let mut selected: Vec<HistoricalMatch> = self
            .matches
            .iter()
            .filter(|m| predicate.matches(m))
            .cloned()
            .collect();

        selected.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
        selected.truncate(limit);
        selected
    }
}

#[async_trait]
impl MatchRepository for InMemoryMatchStore {
    async fn find(
        &self,
        predicate: &SelectionPredicate,
        limit: usize,
    ) -> Result<Vec<HistoricalMatch>, StoreError> {
        Ok(self.select(predicate, limit))
    }

    async fn health_check(&self) -> Result<bool, StoreError> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PeriodOdds;
    use chrono::{Duration, TimeZone, Utc};

    fn create_match(id: i64, league: &str, over: f64) -> HistoricalMatch {
        let odds = PeriodOdds {
            ou_line: 0.5,
            over,
            under: 2.0,
            odd: 1.9,
            even: 1.9,
            btts_yes: 3.5,
            btts_no: 1.2,
        };
        HistoricalMatch {
            id,
            league: league.to_string(),
            match_label: format!("Match {}", id),
            date: Utc.with_ymd_and_hms(2023, 8, 1, 18, 30, 0).unwrap() + Duration::days(id),
            home_team: String::new(),
            away_team: String::new(),
            halftime_goals: 1,
            home_half_goals: 1,
            away_half_goals: 0,
            fulltime_goals: 1,
            home_full_goals: 1,
            away_full_goals: 0,
            halftime_odds: odds,
            fulltime_odds: odds,
        }
    }

    fn league_predicate(league: &str) -> SelectionPredicate {
        SelectionPredicate {
            league: league.to_string(),
            conditions: vec![],
        }
    }

    #[test]
    fn test_select_newest_first_and_truncated() {
        let store = InMemoryMatchStore::new(vec![
            create_match(1, "Dutch Eredivisie", 1.9),
            create_match(3, "Dutch Eredivisie", 1.9),
            create_match(2, "Dutch Eredivisie", 1.9),
        ]);

        let selected = store.select(&league_predicate("eredivisie"), 2);
        let ids: Vec<i64> = selected.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![3, 2]);
    }

    #[test]
    fn test_select_same_date_breaks_ties_by_id() {
        let mut matches: Vec<HistoricalMatch> = [4, 9, 6]
            .into_iter()
            .map(|id| create_match(id, "Belgian Pro League", 1.9))
            .collect();
        let kickoff = matches[0].date;
        for m in &mut matches {
            m.date = kickoff;
        }
        let store = InMemoryMatchStore::new(matches);

        let ids: Vec<i64> = store
            .select(&league_predicate("belgian"), 2)
            .iter()
            .map(|m| m.id)
            .collect();
        assert_eq!(ids, vec![9, 6]);
    }

    #[test]
    fn test_select_league_is_case_insensitive_substring() {
        let store = InMemoryMatchStore::new(vec![
            create_match(1, "Japanese J1 League", 1.9),
            create_match(2, "Swedish Allsvenskan", 1.9),
        ]);

        assert_eq!(store.select(&league_predicate("j1"), 10).len(), 1);
        assert_eq!(store.select(&league_predicate("LEAGUE"), 10).len(), 1);
        assert!(store.select(&league_predicate("Ligue 1"), 10).is_empty());
    }

    #[tokio::test]
    async fn test_find_empty_is_ok() {
        let store = InMemoryMatchStore::default();
        let found = store.find(&league_predicate("any"), 100).await.unwrap();
        assert!(found.is_empty());
        assert!(store.health_check().await.unwrap());
    }

    #[test]
    fn test_from_json_file() {
        let path = std::env::temp_dir().join(format!("oddsmatch-fixture-{}.json", std::process::id()));
        let matches = vec![create_match(7, "French Ligue 1", 1.7)];
        std::fs::write(&path, serde_json::to_string(&matches).unwrap()).unwrap();

        let store = InMemoryMatchStore::from_json_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(store.len(), 1);
        assert_eq!(store.select(&league_predicate("ligue"), 10)[0].id, 7);
    }
}
