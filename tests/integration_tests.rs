// Integration tests for Oddsmatch

use chrono::{Duration, TimeZone, Utc};
use oddsmatch::core::{AnalysisVariant, Analyzer, DEFAULT_TOLERANCE};
use oddsmatch::models::{AnalysisRequest, GoalProbabilityResponse, SuccessRateResponse};
use oddsmatch::{AnalysisOutcome, HistoricalMatch, InMemoryMatchStore, OddsQuery, PeriodOdds};

fn create_odds(ou_line: f64, over: f64, under: f64) -> PeriodOdds {
    PeriodOdds {
        ou_line,
        over,
        under,
        odd: 1.95,
        even: 1.85,
        btts_yes: 2.10,
        btts_no: 1.70,
    }
}

fn create_match(id: i64, league: &str, ht: (u32, u32), ft: (u32, u32)) -> HistoricalMatch {
    HistoricalMatch {
        id,
        league: league.to_string(),
        match_label: format!("Home {} vs Away {}", id, id),
        date: Utc.with_ymd_and_hms(2024, 1, 1, 15, 0, 0).unwrap() + Duration::days(id),
        home_team: format!("Home {}", id),
        away_team: format!("Away {}", id),
        halftime_goals: ht.0 + ht.1,
        home_half_goals: ht.0,
        away_half_goals: ht.1,
        fulltime_goals: ft.0 + ft.1,
        home_full_goals: ft.0,
        away_full_goals: ft.1,
        halftime_odds: create_odds(1.5, 2.00, 1.80),
        fulltime_odds: create_odds(2.5, 1.90, 1.90),
    }
}

fn request(json: serde_json::Value) -> OddsQuery {
    let req: AnalysisRequest = serde_json::from_value(json).unwrap();
    req.bet_odds.unwrap().to_query(&req.league)
}

#[tokio::test]
async fn test_integration_end_to_end_success_rates() {
    let store = InMemoryMatchStore::new(vec![
        create_match(1, "English Premier League", (1, 0), (2, 1)),
        create_match(2, "English Premier League", (1, 1), (1, 1)),
        create_match(3, "English Premier League", (2, 1), (3, 1)),
        create_match(4, "English Premier League", (0, 1), (0, 2)),
        create_match(5, "Italian Serie A", (3, 3), (4, 4)),
    ]);

    let query = request(serde_json::json!({
        "league": "premier",
        "bet_odds": {
            "over": { "goal_line": 1.5, "odd": 2.0 },
            "under": { "odd": 1.8 },
            "btts_yes": { "odd": 2.1 },
            "btts_no": { "odd": 1.7 }
        }
    }));

    let result = Analyzer::default()
        .run(&store, &AnalysisVariant::HALFTIME_SUCCESS_RATE, &query)
        .await
        .unwrap()
        .found()
        .expect("similar matches exist");

    // Serie A excluded by the league filter; goals are 1, 2, 3, 1
    assert_eq!(result.total_matches, 4);
    assert_eq!(result.success_rate("over_1.5").unwrap().percentage, 50);
    assert_eq!(result.success_rate("under_1.5").unwrap().percentage, 50);
    assert_eq!(result.success_rate("btts_yes").unwrap().percentage, 50);
    assert_eq!(result.success_rate("btts_no").unwrap().percentage, 50);
    assert_eq!(result.most_probable.key, 1);
    assert_eq!(result.most_probable.percentage, 50);

    let response = SuccessRateResponse::from(&result);
    assert_eq!(response.success_rates["over_1.5"], "50%");
    assert_eq!(response.goal_distribution.values().sum::<usize>(), 4);
    // Newest first
    assert_eq!(response.historical_results[0].match_label, "Home 4 vs Away 4");
}

#[tokio::test]
async fn test_integration_tolerance_edges() {
    let over = 2.0;
    let low_edge = over * (1.0 - DEFAULT_TOLERANCE);
    let high_edge = over * (1.0 + DEFAULT_TOLERANCE);

    let mut matches = Vec::new();
    for (id, stored) in [(1, low_edge), (2, high_edge), (3, over * 0.799), (4, over * 1.201)] {
        let mut m = create_match(id, "Bundesliga", (1, 1), (2, 1));
        m.halftime_odds.over = stored;
        matches.push(m);
    }
    let store = InMemoryMatchStore::new(matches);

    let query = OddsQuery::new("Bundesliga").with_over_under(1.5, over, 1.8);
    let result = Analyzer::default()
        .run(&store, &AnalysisVariant::HALFTIME_SUCCESS_RATE, &query)
        .await
        .unwrap()
        .found()
        .unwrap();

    let mut ids: Vec<&str> = result.details.iter().map(|d| d.match_label.as_str()).collect();
    ids.sort();
    assert_eq!(ids, vec!["Home 1 vs Away 1", "Home 2 vs Away 2"]);
}

#[tokio::test]
async fn test_integration_decimal_tolerance_edges() {
    let mut matches = Vec::new();
    for (id, stored) in [(1, 1.20), (2, 1.80), (3, 1.1985), (4, 1.8015)] {
        let mut m = create_match(id, "Bundesliga", (1, 1), (2, 1));
        m.halftime_odds.over = stored;
        m.halftime_odds.under = 2.0;
        matches.push(m);
    }
    let store = InMemoryMatchStore::new(matches);

    let query = OddsQuery::new("Bundesliga").with_over_under(1.5, 1.5, 2.0);
    let result = Analyzer::default()
        .run(&store, &AnalysisVariant::HALFTIME_SUCCESS_RATE, &query)
        .await
        .unwrap()
        .found()
        .expect("edge odds are within the band");

    let mut ids: Vec<&str> = result.details.iter().map(|d| d.match_label.as_str()).collect();
    ids.sort();
    assert_eq!(ids, vec!["Home 1 vs Away 1", "Home 2 vs Away 2"]);
}

#[tokio::test]
async fn test_integration_goal_line_must_match_exactly() {
    let mut other_line = create_match(2, "Eredivisie", (2, 0), (2, 0));
    other_line.halftime_odds.ou_line = 2.5;
    let store = InMemoryMatchStore::new(vec![create_match(1, "Eredivisie", (0, 0), (1, 0)), other_line]);

    let query = OddsQuery::new("eredivisie").with_over_under(1.5, 2.0, 1.8);
    let result = Analyzer::default()
        .run(&store, &AnalysisVariant::HALFTIME_SUCCESS_RATE, &query)
        .await
        .unwrap()
        .found()
        .unwrap();

    assert_eq!(result.total_matches, 1);
    assert_eq!(result.details[0].total_goals, 0);
}

#[tokio::test]
async fn test_integration_push_counts_for_neither_side() {
    let mut matches: Vec<HistoricalMatch> = (1..=4)
        .map(|id| create_match(id, "Ligue 1", (1, 1), (1, 1)))
        .collect();
    for m in &mut matches {
        m.halftime_odds.ou_line = 2.0;
    }
    let store = InMemoryMatchStore::new(matches);

    let query = OddsQuery::new("Ligue 1").with_over_under(2.0, 2.0, 1.8);
    let result = Analyzer::default()
        .run(&store, &AnalysisVariant::HALFTIME_SUCCESS_RATE, &query)
        .await
        .unwrap()
        .found()
        .unwrap();

    assert_eq!(result.success_rate("over_2").unwrap().percentage, 0);
    assert_eq!(result.success_rate("under_2").unwrap().percentage, 0);
}

#[tokio::test]
async fn test_integration_no_similar_matches() {
    let store = InMemoryMatchStore::new(vec![create_match(1, "La Liga", (1, 0), (1, 0))]);

    let query = OddsQuery::new("La Liga").with_btts(5.0, 9.0);
    let outcome = Analyzer::default()
        .run(&store, &AnalysisVariant::HALFTIME_GOALS, &query)
        .await
        .unwrap();

    assert!(outcome.is_not_found());
}

#[tokio::test]
async fn test_integration_limits_per_variant() {
    let matches: Vec<HistoricalMatch> = (1..=150)
        .map(|id| create_match(id, "Primeira Liga", ((id % 3) as u32, 0), (1, 1)))
        .collect();
    let store = InMemoryMatchStore::new(matches);
    let query = OddsQuery::new("Primeira");
    let analyzer = Analyzer::default();

    let rates = analyzer
        .run(&store, &AnalysisVariant::HALFTIME_SUCCESS_RATE, &query)
        .await
        .unwrap()
        .found()
        .unwrap();
    assert_eq!(rates.total_matches, 100);
    // The 100 newest are ids 150..=51
    assert_eq!(rates.details[0].match_label, "Home 150 vs Away 150");
    assert_eq!(rates.details[99].match_label, "Home 51 vs Away 51");

    let goals = analyzer
        .run(&store, &AnalysisVariant::HALFTIME_GOALS, &query)
        .await
        .unwrap()
        .found()
        .unwrap();
    assert_eq!(goals.total_matches, 150);
    assert_eq!(goals.histogram.total(), 150);
}

#[tokio::test]
async fn test_integration_fulltime_prediction() {
    let store = InMemoryMatchStore::new(vec![
        create_match(1, "Serie A", (0, 0), (2, 2)),
        create_match(2, "Serie A", (0, 0), (0, 0)),
        create_match(3, "Serie A", (1, 0), (3, 0)),
        create_match(4, "Serie A", (0, 1), (1, 0)),
    ]);

    // Fulltime columns carry line 2.5 and 1.90/1.90
    let query = OddsQuery::new("serie a").with_over_under(2.5, 1.9, 1.9);

    let halftime = Analyzer::default()
        .run(&store, &AnalysisVariant::HALFTIME_GOALS, &query)
        .await
        .unwrap();
    assert_eq!(halftime, AnalysisOutcome::NotFound);

    let result = Analyzer::default()
        .run(&store, &AnalysisVariant::FULLTIME_GOALS, &query)
        .await
        .unwrap()
        .found()
        .unwrap();

    let response = GoalProbabilityResponse::from(&result);
    assert_eq!(response.total_matches_analyzed, 4);
    assert_eq!(response.goal_probabilities.zero, 25);
    assert_eq!(response.goal_probabilities.one, 25);
    assert_eq!(response.goal_probabilities.two, 0);
    assert_eq!(response.goal_probabilities.three_plus, 50);
    assert_eq!(
        response.most_likely_outcome.as_deref(),
        Some("3+ Goals (50% probability)")
    );
}

#[tokio::test]
async fn test_integration_json_fixture_store() {
    let path = std::env::temp_dir().join(format!("oddsmatch-it-{}.json", std::process::id()));
    let matches = vec![
        create_match(1, "Scottish Premiership", (1, 0), (1, 0)),
        create_match(2, "Scottish Premiership", (0, 0), (0, 0)),
    ];
    std::fs::write(&path, serde_json::to_string(&matches).unwrap()).unwrap();

    let store = InMemoryMatchStore::from_json_file(&path).unwrap();
    std::fs::remove_file(&path).ok();
    assert_eq!(store.len(), 2);

    let result = Analyzer::default()
        .run(&store, &AnalysisVariant::HALFTIME_GOALS, &OddsQuery::new("scottish"))
        .await
        .unwrap()
        .found()
        .unwrap();

    assert_eq!(result.histogram.count(0), 1);
    assert_eq!(result.histogram.count(1), 1);
    // Tie between 0 and 1 goals goes to the lower count
    assert_eq!(result.most_probable.key, 0);
}
