use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use crate::core::aggregator::{AnalysisResult, MatchDetail};
use crate::models::domain::Period;

/// Per-match entry of the success-rate analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BetHistoryEntry {
    #[serde(rename = "match")]
    pub match_label: String,
    pub date: String,
    pub halftime_goals: u32,
    pub bet_success: BTreeMap<String, bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MostProbableGoals {
    pub count: u32,
    pub percentage: String,
}

/// Response for the halftime success-rate analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuccessRateResponse {
    pub historical_results: Vec<BetHistoryEntry>,
    pub success_rates: BTreeMap<String, String>,
    pub total_matches_analyzed: usize,
    pub goal_distribution: BTreeMap<u32, usize>,
    pub most_probable_goals: MostProbableGoals,
}

impl From<&AnalysisResult> for SuccessRateResponse {
    fn from(result: &AnalysisResult) -> Self {
        Self {
            historical_results: result
                .details
                .iter()
                .map(|d| BetHistoryEntry {
                    match_label: d.match_label.clone(),
                    date: d.date.clone(),
                    halftime_goals: d.total_goals,
                    bet_success: d.outcomes.clone(),
                })
                .collect(),
            success_rates: result
                .success_rates
                .iter()
                .map(|r| (r.label.clone(), format!("{}%", r.percentage)))
                .collect(),
            total_matches_analyzed: result.total_matches,
            goal_distribution: result.histogram.counts().clone(),
            most_probable_goals: MostProbableGoals {
                count: result.most_probable.key,
                percentage: format!("{}%", result.most_probable.percentage),
            },
        }
    }
}

/// Percentages of the four goal buckets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalProbabilities {
    #[serde(rename = "0")]
    pub zero: u32,
    #[serde(rename = "1")]
    pub one: u32,
    #[serde(rename = "2")]
    pub two: u32,
    #[serde(rename = "3+")]
    pub three_plus: u32,
}

/// Per-match entry of the goal-probability analyses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GoalHistoryEntry {
    Halftime {
        #[serde(rename = "match")]
        match_label: String,
        date: String,
        halftime_goals: u32,
        home_half_goals: u32,
        away_half_goals: u32,
    },
    Fulltime {
        #[serde(rename = "match")]
        match_label: String,
        date: String,
        fulltime_goals: u32,
        home_full_goals: u32,
        away_full_goals: u32,
    },
}

impl GoalHistoryEntry {
    fn from_detail(detail: &MatchDetail, period: Period) -> Self {
        match period {
            Period::Halftime => GoalHistoryEntry::Halftime {
                match_label: detail.match_label.clone(),
                date: detail.date.clone(),
                halftime_goals: detail.total_goals,
                home_half_goals: detail.home_goals,
                away_half_goals: detail.away_goals,
            },
            Period::Fulltime => GoalHistoryEntry::Fulltime {
                match_label: detail.match_label.clone(),
                date: detail.date.clone(),
                fulltime_goals: detail.total_goals,
                home_full_goals: detail.home_goals,
                away_full_goals: detail.away_goals,
            },
        }
    }
}

/// Response for the halftime and fulltime goal-probability analyses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalProbabilityResponse {
    pub goal_probabilities: GoalProbabilities,
    pub total_matches_analyzed: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub most_likely_outcome: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub historical_results: Option<Vec<GoalHistoryEntry>>,
}

/// `"1 Goal (NN% probability)"`, `"<k> Goals (NN% probability)"` otherwise
pub fn most_likely_outcome(label: &str, percentage: u32) -> String {
    let noun = if label == "1" { "Goal" } else { "Goals" };
    format!("{} {} ({}% probability)", label, noun, percentage)
}

impl From<&AnalysisResult> for GoalProbabilityResponse {
    fn from(result: &AnalysisResult) -> Self {
        let pct = result.histogram.percentages(result.total_matches);
        let at = |key: u32| pct.get(&key).copied().unwrap_or(0);

        Self {
            goal_probabilities: GoalProbabilities {
                zero: at(0),
                one: at(1),
                two: at(2),
                three_plus: at(3),
            },
            total_matches_analyzed: result.total_matches,
            most_likely_outcome: Some(most_likely_outcome(
                &result.most_probable.label,
                result.most_probable.percentage,
            )),
            historical_results: Some(
                result
                    .details
                    .iter()
                    .map(|d| GoalHistoryEntry::from_detail(d, result.period))
                    .collect(),
            ),
        }
    }
}

/// Body returned when no similar match exists
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotFoundResponse {
    pub message: String,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::aggregator::aggregate;
    use crate::core::variant::Bucketing;
    use crate::models::domain::Selection;

    fn detail(total: u32, home: u32, away: u32) -> MatchDetail {
        MatchDetail {
            match_label: "Ajax vs PSV".to_string(),
            date: "2024-02-11".to_string(),
            total_goals: total,
            home_goals: home,
            away_goals: away,
            outcomes: [("btts_yes".to_string(), home > 0 && away > 0)].into_iter().collect(),
        }
    }

    #[test]
    fn test_most_likely_outcome_text() {
        assert_eq!(most_likely_outcome("1", 40), "1 Goal (40% probability)");
        assert_eq!(most_likely_outcome("0", 55), "0 Goals (55% probability)");
        assert_eq!(most_likely_outcome("3+", 12), "3+ Goals (12% probability)");
    }

    #[test]
    fn test_success_rate_response_json() {
        let result = aggregate(
            vec![detail(2, 1, 1), detail(1, 1, 0)],
            &[Selection::BttsYes],
            Period::Halftime,
            Bucketing::Exact,
        )
        .found()
        .unwrap();

        let json = serde_json::to_value(SuccessRateResponse::from(&result)).unwrap();

        assert_eq!(json["success_rates"]["btts_yes"], "50%");
        assert_eq!(json["goal_distribution"]["1"], 1);
        assert_eq!(json["goal_distribution"]["2"], 1);
        assert_eq!(json["most_probable_goals"]["count"], 1);
        assert_eq!(json["most_probable_goals"]["percentage"], "50%");
        assert_eq!(json["historical_results"][0]["match"], "Ajax vs PSV");
        assert_eq!(json["historical_results"][0]["bet_success"]["btts_yes"], true);
    }

    #[test]
    fn test_goal_probability_response_json() {
        let result = aggregate(
            vec![detail(0, 0, 0), detail(4, 2, 2), detail(3, 2, 1), detail(1, 1, 0)],
            &[],
            Period::Fulltime,
            Bucketing::CappedAtThree,
        )
        .found()
        .unwrap();

        let response = GoalProbabilityResponse::from(&result);
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["goal_probabilities"]["0"], 25);
        assert_eq!(json["goal_probabilities"]["2"], 0);
        assert_eq!(json["goal_probabilities"]["3+"], 50);
        assert_eq!(json["most_likely_outcome"], "3+ Goals (50% probability)");
        assert_eq!(json["historical_results"][1]["fulltime_goals"], 4);
        assert!(json["historical_results"][1].get("halftime_goals").is_none());

        let cached: GoalProbabilityResponse = serde_json::from_value(json).unwrap();
        assert_eq!(cached, response);
    }
}
