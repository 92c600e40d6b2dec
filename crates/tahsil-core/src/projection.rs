//! Goal projection: the score an unknown contribution still needs.
//!
//! All three solvers isolate one unknown in
//! `known_weighted_sum + unknown × unknown_weight = target × total_weight`.
//! A needed value above 20 is reported as unreachable, never clamped.

use serde::{Deserialize, Serialize};

use crate::aggregate::{CompletionSummary, Pillar};
use crate::error::GradeError;
use crate::model::{ActivitiesWeight, Mark, MAX_MARK};

/// Outcome of a projection query.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Projection {
    /// The target is met whatever the unknown turns out to be.
    AlreadySecured { needed: f64 },
    /// The unknown must reach `needed` (in `(0, 20]`).
    Needed { needed: f64 },
    /// The target would require more than 20.
    Unreachable { needed: f64 },
    /// Nothing to solve for; `average` is the plain computed figure.
    Current { average: f64 },
}

impl Projection {
    fn classify(needed: f64) -> Self {
        if needed <= 0.0 {
            Projection::AlreadySecured { needed }
        } else if needed > MAX_MARK {
            Projection::Unreachable { needed }
        } else {
            Projection::Needed { needed }
        }
    }

    /// The raw required value, when there was something to solve.
    pub fn needed(&self) -> Option<f64> {
        match *self {
            Projection::AlreadySecured { needed }
            | Projection::Needed { needed }
            | Projection::Unreachable { needed } => Some(needed),
            Projection::Current { .. } => None,
        }
    }

    pub fn is_unreachable(&self) -> bool {
        matches!(self, Projection::Unreachable { .. })
    }
}

/// Blended average every pending subject needs for the aggregate to reach
/// `target`.
///
/// One figure is assumed across all pending subjects. With no pending
/// coefficient there is nothing to solve and the current average is returned.
pub fn project_pending(target: f64, summary: &CompletionSummary) -> Projection {
    let pending_coefficients = summary.pending_coefficients();
    let shortfall = target * summary.total_coefficients - summary.completed_score;

    if pending_coefficients <= 0.0 {
        let average = if summary.total_coefficients > 0.0 {
            summary.completed_score / summary.total_coefficients
        } else {
            0.0
        };
        return Projection::Current { average };
    }
    if shortfall <= 0.0 {
        return Projection::AlreadySecured {
            needed: shortfall / pending_coefficients,
        };
    }
    Projection::classify(shortfall / pending_coefficients)
}

/// A slot in a projection: a fixed mark or the value being solved for.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "slot", content = "mark", rename_all = "snake_case")]
pub enum Slot {
    Known(Mark),
    Unknown,
}

impl Slot {
    pub fn known(&self) -> Option<f64> {
        match *self {
            Slot::Known(mark) => Some(mark),
            Slot::Unknown => None,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Slot::Unknown)
    }
}

/// Which single slot of a subject is being solved for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownSlot {
    Assessment(usize),
    Activity,
}

/// One subject laid out slot by slot for the single-subject solver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectSimulation {
    pub assessments: Vec<Slot>,
    /// `None` when the subject has no activities.
    pub activity: Option<Slot>,
    pub activities_weight: ActivitiesWeight,
}

impl SubjectSimulation {
    /// Weight of each assessment slot: `(1 - w) / n`, or `1 / n` without activities.
    pub fn assessment_weight(&self) -> f64 {
        let n = self.assessments.len();
        if n == 0 {
            return 0.0;
        }
        let tests_share = match self.activity {
            Some(_) => 1.0 - self.activities_weight.value(),
            None => 1.0,
        };
        tests_share / n as f64
    }

    pub fn activity_weight(&self) -> f64 {
        match self.activity {
            Some(_) => self.activities_weight.value(),
            None => 0.0,
        }
    }

    /// Every unknown slot, in assessment order then activity.
    pub fn unknown_slots(&self) -> Vec<UnknownSlot> {
        let mut slots: Vec<UnknownSlot> = self
            .assessments
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_unknown())
            .map(|(i, _)| UnknownSlot::Assessment(i))
            .collect();
        if matches!(self.activity, Some(Slot::Unknown)) {
            slots.push(UnknownSlot::Activity);
        }
        slots
    }

    /// Σ(mark × slot weight) over known slots; unknown slots count as zero.
    pub fn known_weighted_sum(&self) -> f64 {
        let per_test = self.assessment_weight();
        let tests: f64 = self
            .assessments
            .iter()
            .filter_map(Slot::known)
            .map(|m| m * per_test)
            .sum();
        let activity = self
            .activity
            .and_then(|s| s.known())
            .map(|m| m * self.activity_weight())
            .unwrap_or(0.0);
        tests + activity
    }

    fn slot_weight(&self, slot: UnknownSlot) -> f64 {
        match slot {
            UnknownSlot::Assessment(_) => self.assessment_weight(),
            UnknownSlot::Activity => self.activity_weight(),
        }
    }

    /// Solve for the single unknown slot.
    ///
    /// With zero or several unknown slots there is no single value to solve
    /// for, and the current average (unknowns counted as zero) is returned.
    pub fn project(&self, target: f64) -> Projection {
        let known = self.known_weighted_sum();
        let slot = match self.unknown_slots().as_slice() {
            [slot] => *slot,
            _ => return Projection::Current { average: known },
        };
        let weight = self.slot_weight(slot);
        if weight <= 0.0 {
            return Projection::Current { average: known };
        }
        Projection::classify((target - known) / weight)
    }
}

/// The three general-bac pillars, each known or unknown.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PillarSimulation {
    pub national: Slot,
    pub regional: Slot,
    pub continuous: Slot,
}

impl PillarSimulation {
    pub fn slot(&self, pillar: Pillar) -> Slot {
        match pillar {
            Pillar::National => self.national,
            Pillar::Regional => self.regional,
            Pillar::Continuous => self.continuous,
        }
    }

    /// Σ(known mark × pillar weight).
    pub fn current_score(&self) -> f64 {
        Pillar::ALL
            .iter()
            .filter_map(|p| self.slot(*p).known().map(|m| m * p.weight()))
            .sum()
    }

    /// Σ weight over unknown pillars.
    pub fn missing_weight(&self) -> f64 {
        Pillar::ALL
            .iter()
            .filter(|p| self.slot(**p).is_unknown())
            .map(|p| p.weight())
            .sum()
    }

    /// Blended figure the unknown pillars need to reach `target`.
    ///
    /// At most two pillars may be unknown. With none unknown the plain
    /// computed average is returned.
    pub fn project(&self, target: f64) -> Result<Projection, GradeError> {
        let unknown = Pillar::ALL
            .iter()
            .filter(|p| self.slot(**p).is_unknown())
            .count();
        if unknown == Pillar::ALL.len() {
            return Err(GradeError::InvalidQuery(
                "at least one pillar mark must be known".into(),
            ));
        }

        let current = self.current_score();
        let missing = self.missing_weight();
        if missing <= 0.0 {
            return Ok(Projection::Current { average: current });
        }
        Ok(Projection::classify((target - current) / missing))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn summary(score: f64, completed: f64, total: f64) -> CompletionSummary {
        CompletionSummary {
            completed_score: score,
            completed_coefficients: completed,
            total_coefficients: total,
        }
    }

    #[test]
    fn pending_projection_scenario() {
        let p = project_pending(10.0, &summary(64.0, 4.0, 10.0));
        assert!(matches!(p, Projection::Needed { needed } if close(needed, 6.0)));
    }

    #[test]
    fn pending_projection_already_secured() {
        for pending in [1.0, 3.0, 10.0] {
            let p = project_pending(10.0, &summary(200.0, 10.0, 10.0 + pending));
            assert!(matches!(p, Projection::AlreadySecured { .. }), "{p:?}");
        }
        // exactly on target
        let p = project_pending(10.0, &summary(100.0, 6.0, 10.0));
        assert!(matches!(p, Projection::AlreadySecured { .. }));
    }

    #[test]
    fn pending_projection_unreachable_is_not_clamped() {
        let p = project_pending(16.0, &summary(20.0, 8.0, 10.0));
        assert!(p.is_unreachable());
        assert!(close(p.needed().unwrap(), 70.0));
    }

    #[test]
    fn pending_projection_without_pending_is_current() {
        let p = project_pending(10.0, &summary(120.0, 10.0, 10.0));
        assert_eq!(p, Projection::Current { average: 12.0 });
        assert_eq!(project_pending(10.0, &summary(0.0, 0.0, 0.0)), Projection::Current { average: 0.0 });
    }

    #[test]
    fn single_subject_scenario() {
        let sim = SubjectSimulation {
            assessments: vec![Slot::Known(12.0), Slot::Unknown],
            activity: Some(Slot::Known(14.0)),
            activities_weight: ActivitiesWeight::STANDARD,
        };
        assert!(close(sim.assessment_weight(), 0.375));
        assert!(close(sim.known_weighted_sum(), 8.0));
        let p = sim.project(14.0);
        assert!(matches!(p, Projection::Needed { needed } if close(needed, 16.0)));
    }

    #[test]
    fn single_subject_solution_satisfies_equation() {
        let sims = [
            SubjectSimulation {
                assessments: vec![Slot::Known(9.5), Slot::Known(11.0), Slot::Unknown],
                activity: Some(Slot::Known(16.0)),
                activities_weight: ActivitiesWeight::new(0.3).unwrap(),
            },
            SubjectSimulation {
                assessments: vec![Slot::Known(7.0), Slot::Known(13.0)],
                activity: Some(Slot::Unknown),
                activities_weight: ActivitiesWeight::new(0.4).unwrap(),
            },
            SubjectSimulation {
                assessments: vec![Slot::Unknown, Slot::Known(10.0)],
                activity: None,
                activities_weight: ActivitiesWeight::STANDARD,
            },
        ];
        for sim in &sims {
            let target = 12.0;
            let needed = sim.project(target).needed().unwrap();
            let slot = sim.unknown_slots()[0];
            let lhs = needed * sim.slot_weight(slot) + sim.known_weighted_sum();
            assert!(close(lhs, target), "{sim:?}");
        }
    }

    #[test]
    fn activity_slot_unknown() {
        let sim = SubjectSimulation {
            assessments: vec![Slot::Known(10.0), Slot::Known(10.0)],
            activity: Some(Slot::Unknown),
            activities_weight: ActivitiesWeight::STANDARD,
        };
        assert_eq!(sim.unknown_slots(), vec![UnknownSlot::Activity]);
        let p = sim.project(12.0);
        assert!(matches!(p, Projection::Needed { needed } if close(needed, 18.0)));
        assert!(sim.project(19.0).is_unreachable());
        assert!(matches!(sim.project(7.0), Projection::AlreadySecured { .. }));
    }

    #[test]
    fn several_unknowns_report_current_average() {
        let sim = SubjectSimulation {
            assessments: vec![Slot::Unknown, Slot::Known(12.0)],
            activity: Some(Slot::Unknown),
            activities_weight: ActivitiesWeight::STANDARD,
        };
        assert_eq!(sim.project(10.0), Projection::Current { average: 4.5 });
    }

    #[test]
    fn no_unknown_reports_current_average() {
        let sim = SubjectSimulation {
            assessments: vec![Slot::Known(12.0), Slot::Known(16.0)],
            activity: Some(Slot::Known(8.0)),
            activities_weight: ActivitiesWeight::STANDARD,
        };
        assert_eq!(sim.project(10.0), Projection::Current { average: 12.5 });
    }

    #[test]
    fn pillar_projection_single_unknown() {
        let sim = PillarSimulation {
            national: Slot::Unknown,
            regional: Slot::Known(14.0),
            continuous: Slot::Known(16.0),
        };
        let p = sim.project(12.0).unwrap();
        assert!(matches!(p, Projection::Needed { needed } if close(needed, 9.0)));
    }

    #[test]
    fn pillar_projection_two_unknown_blended() {
        let sim = PillarSimulation {
            national: Slot::Unknown,
            regional: Slot::Unknown,
            continuous: Slot::Known(16.0),
        };
        assert!(close(sim.missing_weight(), 0.75));
        let p = sim.project(10.0).unwrap();
        assert!(matches!(p, Projection::Needed { needed } if close(needed, 8.0)));
        assert!(sim.project(20.0).unwrap().is_unreachable());
    }

    #[test]
    fn pillar_projection_all_known_is_current() {
        let sim = PillarSimulation {
            national: Slot::Known(12.0),
            regional: Slot::Known(14.0),
            continuous: Slot::Known(16.0),
        };
        assert_eq!(sim.project(15.0).unwrap(), Projection::Current { average: 13.5 });
    }

    #[test]
    fn pillar_projection_all_unknown_is_rejected() {
        let sim = PillarSimulation {
            national: Slot::Unknown,
            regional: Slot::Unknown,
            continuous: Slot::Unknown,
        };
        assert!(matches!(sim.project(10.0), Err(GradeError::InvalidQuery(_))));
    }
}
