use std::collections::BTreeMap;
use crate::core::analyzer::AnalysisOutcome;
use crate::core::variant::Bucketing;
use crate::models::{Period, Selection};

/// One classified match, kept for caller display
#[derive(Debug, Clone, PartialEq)]
pub struct MatchDetail {
    pub match_label: String,
    pub date: String,
    pub total_goals: u32,
    pub home_goals: u32,
    pub away_goals: u32,
    pub outcomes: BTreeMap<String, bool>,
}

/// Success count and rate of one selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionRate {
    pub label: String,
    pub successes: usize,
    pub percentage: u32,
}

/// Modal histogram key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalGoals {
    pub key: u32,
    pub label: String,
    pub count: usize,
    pub percentage: u32,
}

/// Goal-count histogram, ordered by ascending key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoalHistogram {
    bucketing: Bucketing,
    counts: BTreeMap<u32, usize>,
}

impl GoalHistogram {
    pub fn new(bucketing: Bucketing) -> Self {
        let mut counts = BTreeMap::new();
        if bucketing == Bucketing::CappedAtThree {
            for key in 0..=Bucketing::CAP {
                counts.insert(key, 0);
            }
        }
        Self { bucketing, counts }
    }

    pub fn from_totals(bucketing: Bucketing, totals: impl IntoIterator<Item = u32>) -> Self {
        let mut histogram = Self::new(bucketing);
        for goals in totals {
            histogram.record(goals);
        }
        histogram
    }

    pub fn record(&mut self, goals: u32) {
        *self.counts.entry(self.bucketing.key(goals)).or_insert(0) += 1;
    }

    pub fn counts(&self) -> &BTreeMap<u32, usize> {
        &self.counts
    }

    pub fn count(&self, key: u32) -> usize {
        self.counts.get(&key).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// Key with the highest count. Ties go to the lowest key.
    pub fn mode(&self) -> Option<(u32, usize)> {
        let mut best: Option<(u32, usize)> = None;
        for (&key, &count) in &self.counts {
            match best {
                Some((_, top)) if count <= top => {}
                _ if count == 0 => {}
                _ => best = Some((key, count)),
            }
        }
        best
    }

    /// Rounded share of `total` per key
    pub fn percentages(&self, total: usize) -> BTreeMap<u32, u32> {
        self.counts
            .iter()
            .map(|(&key, &count)| (key, percentage(count, total).unwrap_or(0)))
            .collect()
    }
}

/// `round(count / total * 100)` with halves rounded up; `None` when `total` is zero
#[inline]
pub fn percentage(count: usize, total: usize) -> Option<u32> {
    if total == 0 {
        return None;
    }
    let scaled = (count as u128 * 200 + total as u128) / (total as u128 * 2);
    Some(scaled as u32)
}

/// Aggregated statistics over a non-empty matched set
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisResult {
    pub period: Period,
    pub details: Vec<MatchDetail>,
    /// In selection order
    pub success_rates: Vec<SelectionRate>,
    pub histogram: GoalHistogram,
    pub most_probable: ModalGoals,
    pub total_matches: usize,
}

impl AnalysisResult {
    pub fn success_rate(&self, label: &str) -> Option<&SelectionRate> {
        self.success_rates.iter().find(|r| r.label == label)
    }
}

/// Reduce classified matches into rates, histogram and mode
pub fn aggregate(
    details: Vec<MatchDetail>,
    selections: &[Selection],
    period: Period,
    bucketing: Bucketing,
) -> AnalysisOutcome<AnalysisResult> {
    let total_matches = details.len();
    if total_matches == 0 {
        return AnalysisOutcome::NotFound;
    }

    let success_rates = selections
        .iter()
        .map(|selection| {
            let label = selection.label();
            let successes = details
                .iter()
                .filter(|d| d.outcomes.get(&label).copied().unwrap_or(false))
                .count();
            SelectionRate {
                percentage: percentage(successes, total_matches).unwrap_or(0),
                label,
                successes,
            }
        })
        .collect();

    let histogram = GoalHistogram::from_totals(bucketing, details.iter().map(|d| d.total_goals));

    // Non-empty input always records at least one key.
    let (key, count) = histogram.mode().unwrap_or((0, 0));
    let most_probable = ModalGoals {
        key,
        label: bucketing.label(key),
        count,
        percentage: percentage(count, total_matches).unwrap_or(0),
    };

    AnalysisOutcome::Found(AnalysisResult {
        period,
        details,
        success_rates,
        histogram,
        most_probable,
        total_matches,
    })
}
