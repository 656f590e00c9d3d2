use std::collections::BTreeMap;
use crate::models::{HistoricalMatch, Period, Selection};

/// Whether a selection would have won given the realized goals
///
/// A total equal to an over/under line wins neither side.
#[inline]
pub fn selection_won(selection: &Selection, total: u32, home: u32, away: u32) -> bool {
    let total_f = total as f64;
    match *selection {
        Selection::Over(line) => total_f > line,
        Selection::Under(line) => total_f < line,
        Selection::OddGoals => total % 2 == 1,
        Selection::EvenGoals => total % 2 == 0,
        Selection::BttsYes => home >= 1 && away >= 1,
        Selection::BttsNo => home == 0 || away == 0,
    }
}

/// Per-selection outcome labels for one match
pub fn classify(
    record: &HistoricalMatch,
    selections: &[Selection],
    period: Period,
) -> BTreeMap<String, bool> {
    let (total, home, away) = record.goals(period);

    selections
        .iter()
        .map(|s| (s.label(), selection_won(s, total, home, away)))
        .collect()
}
