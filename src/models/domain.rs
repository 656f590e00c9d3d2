use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Odds quoted for one period (halftime or fulltime) of a historical match
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PeriodOdds {
    /// Over/under goal line
    pub ou_line: f64,
    pub over: f64,
    pub under: f64,
    pub odd: f64,
    pub even: f64,
    pub btts_yes: f64,
    pub btts_no: f64,
}

/// Historical match record, as held by the record store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalMatch {
    pub id: i64,
    pub league: String,
    #[serde(rename = "match")]
    pub match_label: String,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub home_team: String,
    #[serde(default)]
    pub away_team: String,
    pub halftime_goals: u32,
    pub home_half_goals: u32,
    pub away_half_goals: u32,
    pub fulltime_goals: u32,
    pub home_full_goals: u32,
    pub away_full_goals: u32,
    pub halftime_odds: PeriodOdds,
    pub fulltime_odds: PeriodOdds,
}

impl HistoricalMatch {
    /// Realized (total, home, away) goals for a period
    pub fn goals(&self, period: Period) -> (u32, u32, u32) {
        match period {
            Period::Halftime => (self.halftime_goals, self.home_half_goals, self.away_half_goals),
            Period::Fulltime => (self.fulltime_goals, self.home_full_goals, self.away_full_goals),
        }
    }

    /// Match date as `YYYY-MM-DD`
    pub fn date_label(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }
}

/// Which part of the match an analysis reads goals and odds from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Halftime,
    Fulltime,
}

/// A betting market. Each market has exactly two selections.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Market {
    OverUnder { line: f64 },
    OddEven,
    Btts,
}

impl Market {
    pub fn selections(&self) -> [Selection; 2] {
        match *self {
            Market::OverUnder { line } => [Selection::Over(line), Selection::Under(line)],
            Market::OddEven => [Selection::OddGoals, Selection::EvenGoals],
            Market::Btts => [Selection::BttsYes, Selection::BttsNo],
        }
    }
}

/// One side of a market
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Selection {
    Over(f64),
    Under(f64),
    OddGoals,
    EvenGoals,
    BttsYes,
    BttsNo,
}

impl Selection {
    /// Label used as the key in outcome maps and success rates
    pub fn label(&self) -> String {
        match self {
            Selection::Over(line) => format!("over_{}", line),
            Selection::Under(line) => format!("under_{}", line),
            Selection::OddGoals => "odd_goals".to_string(),
            Selection::EvenGoals => "even_goals".to_string(),
            Selection::BttsYes => "btts_yes".to_string(),
            Selection::BttsNo => "btts_no".to_string(),
        }
    }
}

/// Quoted odds for one active market
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarketOdds {
    pub market: Market,
    /// Odds for the first and second selection, in `Market::selections` order
    pub odds: [f64; 2],
}

/// A validated odds query: league plus the active markets
#[derive(Debug, Clone, PartialEq)]
pub struct OddsQuery {
    pub league: String,
    pub markets: Vec<MarketOdds>,
}

impl OddsQuery {
    pub fn new(league: impl Into<String>) -> Self {
        Self {
            league: league.into(),
            markets: Vec::new(),
        }
    }

    pub fn with_over_under(mut self, line: f64, over: f64, under: f64) -> Self {
        self.markets.push(MarketOdds {
            market: Market::OverUnder { line },
            odds: [over, under],
        });
        self
    }

    pub fn with_odd_even(mut self, odd: f64, even: f64) -> Self {
        self.markets.push(MarketOdds {
            market: Market::OddEven,
            odds: [odd, even],
        });
        self
    }

    pub fn with_btts(mut self, yes: f64, no: f64) -> Self {
        self.markets.push(MarketOdds {
            market: Market::Btts,
            odds: [yes, no],
        });
        self
    }

    /// Active markets, in query order
    pub fn active_markets(&self) -> impl Iterator<Item = Market> + '_ {
        self.markets.iter().map(|m| m.market)
    }

    /// Every selection of every active market, in query order
    pub fn selections(&self) -> Vec<Selection> {
        self.active_markets().flat_map(|m| m.selections()).collect()
    }
}
