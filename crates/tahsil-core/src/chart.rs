//! Read-only chart view over per-subject averages.

use serde::{Deserialize, Serialize};

use crate::aggregate::Evaluation;
use crate::model::MAX_MARK;

/// One bar of the per-subject chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub label: String,
    /// Rounded to two decimals for display.
    pub value: f64,
    pub scale_max: f64,
}

/// Bars for every subject with an average. Pending subjects are left out
/// entirely rather than drawn at zero.
pub fn chart_points(evaluation: &Evaluation) -> Vec<ChartPoint> {
    evaluation
        .subjects
        .iter()
        .filter(|s| !s.pending)
        .filter_map(|s| {
            s.average.map(|avg| ChartPoint {
                label: s.name.clone(),
                value: (avg * 100.0).round() / 100.0,
                scale_max: MAX_MARK,
            })
        })
        .collect()
}
