//! Analytics service: summary statistics over a session's history.
//!
//! Feeds the history view: category counts for the bar chart and
//! five-number summaries of age and weight for the box-plot table.

use serde::Serialize;

use crate::domain::{Feature, ObesityCategory, Session};

/// Five-number summary with linearly interpolated quartiles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoxSummary {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

impl BoxSummary {
    /// Summarize `values`. Returns `None` when there is nothing to summarize.
    #[must_use]
    pub fn from_values(values: &[f64]) -> Option<Self> {
        let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        if sorted.is_empty() {
            return None;
        }
        sorted.sort_by(f64::total_cmp);

        Some(Self {
            min: sorted[0],
            q1: quantile(&sorted, 0.25),
            median: quantile(&sorted, 0.5),
            q3: quantile(&sorted, 0.75),
            max: sorted[sorted.len() - 1],
        })
    }
}

fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

/// Aggregate view of one session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryStatistics {
    pub total: usize,
    /// Every category, lightest to heaviest, with its count.
    pub counts: Vec<(ObesityCategory, usize)>,
    /// Ties go to the lighter category.
    pub most_frequent: Option<ObesityCategory>,
    pub age: Option<BoxSummary>,
    pub weight: Option<BoxSummary>,
}

impl HistoryStatistics {
    #[must_use]
    pub fn count(&self, category: ObesityCategory) -> usize {
        self.counts
            .iter()
            .find(|(c, _)| *c == category)
            .map_or(0, |(_, n)| *n)
    }
}

/// Service computing history statistics.
#[derive(Debug, Default, Clone, Copy)]
pub struct AnalyticsService;

impl AnalyticsService {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    #[must_use]
    pub fn summarize(&self, session: &Session) -> HistoryStatistics {
        let counts: Vec<(ObesityCategory, usize)> = ObesityCategory::ALL
            .into_iter()
            .map(|c| (c, session.count(c)))
            .collect();

        let mut most_frequent = None;
        let mut best = 0;
        for &(category, n) in &counts {
            if n > best {
                best = n;
                most_frequent = Some(category);
            }
        }

        let column = |feature: Feature| -> Vec<f64> {
            session
                .history()
                .iter()
                .filter_map(|p| p.features.get(feature))
                .collect()
        };

        let stats = HistoryStatistics {
            total: session.len(),
            counts,
            most_frequent,
            age: BoxSummary::from_values(&column(Feature::Age)),
            weight: BoxSummary::from_values(&column(Feature::Weight)),
        };

        tracing::debug!(
            "Summarized {} predictions (most frequent: {:?})",
            stats.total,
            stats.most_frequent
        );

        stats
    }
}
