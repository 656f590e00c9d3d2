use crate::core::analyzer::AnalysisError;
use crate::models::{HistoricalMatch, Market, OddsQuery, Period};

/// Relative half-width of the similarity band around a quoted odd
pub const DEFAULT_TOLERANCE: f64 = 0.20;

/// Relative slack added to band edges so quotes at exactly the edge survive f64 rounding
pub const BAND_EPSILON: f64 = 1e-9;

/// Stored odds columns of a historical match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OddsColumn {
    HtouHcap,
    Htou01,
    Htou02,
    Htoe01,
    Htoe02,
    Htbg01,
    Htbg02,
    OuHcap,
    Ou01,
    Ou02,
    Oe01,
    Oe02,
    Bg01,
    Bg02,
}

impl OddsColumn {
    /// Column name in the record store
    pub fn name(&self) -> &'static str {
        match self {
            OddsColumn::HtouHcap => "htou_hcap",
            OddsColumn::Htou01 => "htou01",
            OddsColumn::Htou02 => "htou02",
            OddsColumn::Htoe01 => "htoe01",
            OddsColumn::Htoe02 => "htoe02",
            OddsColumn::Htbg01 => "htbg01",
            OddsColumn::Htbg02 => "htbg02",
            OddsColumn::OuHcap => "ou_hcap",
            OddsColumn::Ou01 => "ou01",
            OddsColumn::Ou02 => "ou02",
            OddsColumn::Oe01 => "oe01",
            OddsColumn::Oe02 => "oe02",
            OddsColumn::Bg01 => "bg01",
            OddsColumn::Bg02 => "bg02",
        }
    }

    /// Value of this column on a match
    pub fn value(&self, record: &HistoricalMatch) -> f64 {
        let ht = &record.halftime_odds;
        let ft = &record.fulltime_odds;
        match self {
            OddsColumn::HtouHcap => ht.ou_line,
            OddsColumn::Htou01 => ht.over,
            OddsColumn::Htou02 => ht.under,
            OddsColumn::Htoe01 => ht.odd,
            OddsColumn::Htoe02 => ht.even,
            OddsColumn::Htbg01 => ht.btts_yes,
            OddsColumn::Htbg02 => ht.btts_no,
            OddsColumn::OuHcap => ft.ou_line,
            OddsColumn::Ou01 => ft.over,
            OddsColumn::Ou02 => ft.under,
            OddsColumn::Oe01 => ft.odd,
            OddsColumn::Oe02 => ft.even,
            OddsColumn::Bg01 => ft.btts_yes,
            OddsColumn::Bg02 => ft.btts_no,
        }
    }
}

/// Which odds columns a period's markets filter on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarketColumns {
    pub line: OddsColumn,
    pub over: OddsColumn,
    pub under: OddsColumn,
    pub odd: OddsColumn,
    pub even: OddsColumn,
    pub btts_yes: OddsColumn,
    pub btts_no: OddsColumn,
}

impl MarketColumns {
    pub const HALFTIME: MarketColumns = MarketColumns {
        line: OddsColumn::HtouHcap,
        over: OddsColumn::Htou01,
        under: OddsColumn::Htou02,
        odd: OddsColumn::Htoe01,
        even: OddsColumn::Htoe02,
        btts_yes: OddsColumn::Htbg01,
        btts_no: OddsColumn::Htbg02,
    };

    pub const FULLTIME: MarketColumns = MarketColumns {
        line: OddsColumn::OuHcap,
        over: OddsColumn::Ou01,
        under: OddsColumn::Ou02,
        odd: OddsColumn::Oe01,
        even: OddsColumn::Oe02,
        btts_yes: OddsColumn::Bg01,
        btts_no: OddsColumn::Bg02,
    };

    pub fn for_period(period: Period) -> Self {
        match period {
            Period::Halftime => Self::HALFTIME,
            Period::Fulltime => Self::FULLTIME,
        }
    }

    /// Columns holding the two selection odds of a market
    fn odds_columns(&self, market: &Market) -> [OddsColumn; 2] {
        match market {
            Market::OverUnder { .. } => [self.over, self.under],
            Market::OddEven => [self.odd, self.even],
            Market::Btts => [self.btts_yes, self.btts_no],
        }
    }
}

/// A single typed condition on a stored odds column
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Condition {
    /// Stored value equals `value` exactly
    Equals { column: OddsColumn, value: f64 },
    /// `min <= stored <= max`
    Between { column: OddsColumn, min: f64, max: f64 },
}

impl Condition {
    pub fn column(&self) -> OddsColumn {
        match self {
            Condition::Equals { column, .. } | Condition::Between { column, .. } => *column,
        }
    }

    #[inline]
    pub fn matches(&self, record: &HistoricalMatch) -> bool {
        let stored = self.column().value(record);
        match *self {
            Condition::Equals { value, .. } => stored == value,
            Condition::Between { min, max, .. } => stored >= min && stored <= max,
        }
    }
}

/// Conjunction of a league containment condition and per-market conditions
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionPredicate {
    /// Matched case-insensitively as a substring of the stored league
    pub league: String,
    pub conditions: Vec<Condition>,
}

impl SelectionPredicate {
    pub fn matches(&self, record: &HistoricalMatch) -> bool {
        record
            .league
            .to_lowercase()
            .contains(&self.league.to_lowercase())
            && self.conditions.iter().all(|c| c.matches(record))
    }
}

/// Band condition for a quoted odd, inclusive at both edges
#[inline]
pub fn odds_band(column: OddsColumn, quoted: f64, tolerance: f64) -> Condition {
    let slack = quoted.abs() * BAND_EPSILON;
    Condition::Between {
        column,
        min: quoted * (1.0 - tolerance) - slack,
        max: quoted * (1.0 + tolerance) + slack,
    }
}

/// Conditions contributed by one active market
pub fn market_conditions(
    market: &Market,
    odds: [f64; 2],
    columns: &MarketColumns,
    tolerance: f64,
) -> Vec<Condition> {
    let mut conditions = Vec::with_capacity(3);

    if let Market::OverUnder { line } = market {
        conditions.push(Condition::Equals {
            column: columns.line,
            value: *line,
        });
    }

    let [first, second] = columns.odds_columns(market);
    conditions.push(odds_band(first, odds[0], tolerance));
    conditions.push(odds_band(second, odds[1], tolerance));

    conditions
}

/// Build the selection predicate for a query against one period's columns
pub fn build_predicate(
    query: &OddsQuery,
    columns: &MarketColumns,
    tolerance: f64,
) -> Result<SelectionPredicate, AnalysisError> {
    let league = query.league.trim();
    if league.is_empty() {
        return Err(AnalysisError::InvalidQuery("league is required".to_string()));
    }

    let conditions = query
        .markets
        .iter()
        .flat_map(|m| market_conditions(&m.market, m.odds, columns, tolerance))
        .collect();

    Ok(SelectionPredicate {
        league: league.to_string(),
        conditions,
    })
}
