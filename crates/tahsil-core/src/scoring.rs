//! Per-subject score blending.
//!
//! A subject average mixes the mean of its timed assessments with the
//! activity mark: 75/25 in the official scheme, or a caller-chosen split in
//! the custom modes.

use serde::{Deserialize, Serialize};

use crate::model::{ActivitiesWeight, ScoringMode, SubjectData};

/// How a subject's activity mark is weighed against its assessments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "weight", rename_all = "snake_case")]
pub enum Weighting {
    /// Fixed 0.75 / 0.25 split.
    #[default]
    Standard,
    /// Custom modes: the activity takes `weight`, assessments the rest.
    Custom(ActivitiesWeight),
}

impl Weighting {
    /// Pick the weighting a mode uses. Non-custom modes ignore `custom`.
    pub fn for_mode(mode: ScoringMode, custom: ActivitiesWeight) -> Self {
        if mode.is_custom() {
            Weighting::Custom(custom)
        } else {
            Weighting::Standard
        }
    }

    /// Fraction of the subject average taken by the activity mark.
    pub fn activities_share(self) -> f64 {
        match self {
            Weighting::Standard => ActivitiesWeight::STANDARD.value(),
            Weighting::Custom(w) => w.value(),
        }
    }
}

/// Mean of the usable assessment marks, `None` when there are none.
///
/// Blank and non-finite values are skipped; order does not matter.
pub fn tests_average(data: &SubjectData) -> Option<f64> {
    let (sum, count) = data
        .assessments
        .iter()
        .filter_map(|a| a.value)
        .filter(|v| v.is_finite())
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

/// The activity mark, when the subject has activities and the mark is usable.
pub fn activity_value(data: &SubjectData, has_activities: bool) -> Option<f64> {
    if !has_activities {
        return None;
    }
    data.activities_mark.filter(|v| v.is_finite())
}

/// Blend one subject's marks into a single average in `[0, 20]`.
///
/// Falls back to 0 when neither assessments nor an activity mark are usable;
/// completeness validation is expected to stop that case upstream.
pub fn subject_average(data: &SubjectData, has_activities: bool, weighting: Weighting) -> f64 {
    let tests = tests_average(data);
    let activity = activity_value(data, has_activities);

    match (tests, activity) {
        (Some(t), Some(a)) => {
            let w = weighting.activities_share();
            t * (1.0 - w) + a * w
        }
        (Some(t), None) => t,
        (None, Some(a)) => a,
        (None, None) => 0.0,
    }
}
