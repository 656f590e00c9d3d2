use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};
use crate::models::domain::OddsQuery;

/// Body of every analysis endpoint
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AnalysisRequest {
    #[serde(default)]
    #[validate(custom(function = "validate_league"))]
    pub league: String,
    #[validate(required, nested)]
    pub bet_odds: Option<BetOdds>,
}

/// Over selection carries the goal line, every other selection only the odd
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineOdd {
    pub goal_line: Option<f64>,
    pub odd: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Odd {
    pub odd: f64,
}

/// Market odds as submitted. Fields of a market must be supplied together.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_pairs"))]
pub struct BetOdds {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub over: Option<LineOdd>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub under: Option<Odd>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub odd_goals: Option<Odd>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub even_goals: Option<Odd>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub btts_yes: Option<Odd>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub btts_no: Option<Odd>,
}

fn validate_league(league: &str) -> Result<(), ValidationError> {
    if league.trim().is_empty() {
        return Err(ValidationError::new("league_required")
            .with_message("League and bet odds are required".into()));
    }
    Ok(())
}

fn unpaired(present: &str, missing: &str) -> ValidationError {
    ValidationError::new("unpaired_market")
        .with_message(format!("'{}' requires '{}'", present, missing).into())
}

fn validate_pairs(odds: &BetOdds) -> Result<(), ValidationError> {
    match (odds.over, odds.under) {
        (Some(_), None) => return Err(unpaired("over", "under")),
        (None, Some(_)) => return Err(unpaired("under", "over")),
        (Some(over), Some(_)) if over.goal_line.is_none() => {
            return Err(ValidationError::new("goal_line_required")
                .with_message("'over' requires a goal_line".into()));
        }
        _ => {}
    }
    match (odds.odd_goals, odds.even_goals) {
        (Some(_), None) => return Err(unpaired("odd_goals", "even_goals")),
        (None, Some(_)) => return Err(unpaired("even_goals", "odd_goals")),
        _ => {}
    }
    match (odds.btts_yes, odds.btts_no) {
        (Some(_), None) => return Err(unpaired("btts_yes", "btts_no")),
        (None, Some(_)) => return Err(unpaired("btts_no", "btts_yes")),
        _ => {}
    }
    Ok(())
}

impl BetOdds {
    /// Active markets as an `OddsQuery`. Half-supplied markets are skipped,
    /// callers reject them through `validate` first.
    pub fn to_query(&self, league: &str) -> OddsQuery {
        let mut query = OddsQuery::new(league.trim());

        if let (Some(over), Some(under)) = (self.over, self.under) {
            if let Some(line) = over.goal_line {
                query = query.with_over_under(line, over.odd, under.odd);
            }
        }
        if let (Some(odd), Some(even)) = (self.odd_goals, self.even_goals) {
            query = query.with_odd_even(odd.odd, even.odd);
        }
        if let (Some(yes), Some(no)) = (self.btts_yes, self.btts_no) {
            query = query.with_btts(yes.odd, no.odd);
        }

        query
    }
}
