//! Aggregate averages, one formula per scoring mode.
//!
//! Continuous and custom modes take a coefficient-weighted mean of subject
//! averages. A pending subject adds nothing to the numerator but its full
//! coefficient to the denominator, so the displayed figure is a worst case.
//! The general baccalaureate blends three pillars, and the exam-only modes
//! take a weighted mean over their own subject table.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::distinction::Distinction;
use crate::error::GradeError;
use crate::model::{ActivitiesWeight, ExamMarks, GradeMap, Mark, ScoringMode, Subject};
use crate::scoring::{subject_average, Weighting};
use crate::validation::{check_exam_marks, check_grade_map};

/// One of the three general-baccalaureate components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pillar {
    National,
    Regional,
    Continuous,
}

impl Pillar {
    pub const ALL: [Pillar; 3] = [Pillar::National, Pillar::Regional, Pillar::Continuous];

    /// Share of the final average.
    pub fn weight(self) -> f64 {
        match self {
            Pillar::National => 0.5,
            Pillar::Regional => 0.25,
            Pillar::Continuous => 0.25,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Pillar::National => "national",
            Pillar::Regional => "regional",
            Pillar::Continuous => "continuous",
        }
    }
}

/// The continuous-assessment pillar, entered directly or per semester.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "input", rename_all = "snake_case")]
pub enum ContinuousPillar {
    Annual { mark: Option<Mark> },
    Semesters { s1: Option<Mark>, s2: Option<Mark> },
}

impl ContinuousPillar {
    /// The pillar figure, `(s1 + s2) / 2` in semester form.
    pub fn value(&self) -> Option<f64> {
        match *self {
            ContinuousPillar::Annual { mark } => mark,
            ContinuousPillar::Semesters { s1, s2 } => Some((s1? + s2?) / 2.0),
        }
    }
}

/// Marks for the three pillars of the general baccalaureate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PillarMarks {
    pub national: Option<Mark>,
    pub regional: Option<Mark>,
    pub continuous: ContinuousPillar,
}

impl PillarMarks {
    pub fn new(national: Mark, regional: Mark, continuous: Mark) -> Self {
        Self {
            national: Some(national),
            regional: Some(regional),
            continuous: ContinuousPillar::Annual {
                mark: Some(continuous),
            },
        }
    }

    pub fn get(&self, pillar: Pillar) -> Option<f64> {
        match pillar {
            Pillar::National => self.national,
            Pillar::Regional => self.regional,
            Pillar::Continuous => self.continuous.value(),
        }
        .filter(|v| v.is_finite())
    }
}

/// Resolved pillar figures used for a general-bac average.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PillarBreakdown {
    pub national: f64,
    pub regional: f64,
    pub continuous: f64,
}

/// Everything one evaluation pass needs.
#[derive(Debug, Clone)]
pub struct AggregateInput<'a> {
    pub mode: ScoringMode,
    /// Active subjects, or the mode's own table for exam-only modes.
    pub subjects: &'a [Subject],
    pub grades: &'a GradeMap,
    /// Used only by the custom modes.
    pub activities_weight: ActivitiesWeight,
    pub pillars: Option<&'a PillarMarks>,
    pub exam_marks: Option<&'a ExamMarks>,
}

impl<'a> AggregateInput<'a> {
    pub fn new(mode: ScoringMode, subjects: &'a [Subject], grades: &'a GradeMap) -> Self {
        Self {
            mode,
            subjects,
            grades,
            activities_weight: ActivitiesWeight::STANDARD,
            pillars: None,
            exam_marks: None,
        }
    }

    pub fn with_activities_weight(mut self, weight: ActivitiesWeight) -> Self {
        self.activities_weight = weight;
        self
    }

    pub fn with_pillars(mut self, pillars: &'a PillarMarks) -> Self {
        self.pillars = Some(pillars);
        self
    }

    pub fn with_exam_marks(mut self, marks: &'a ExamMarks) -> Self {
        self.exam_marks = Some(marks);
        self
    }
}

/// One subject's contribution to an aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectResult {
    pub subject_id: String,
    pub name: String,
    pub coefficient: f64,
    /// `None` for pending subjects.
    pub average: Option<f64>,
    pub pending: bool,
}

/// Figures the projection solvers work from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CompletionSummary {
    /// Σ(average × coefficient) over completed subjects.
    pub completed_score: f64,
    /// Σ coefficient over completed subjects.
    pub completed_coefficients: f64,
    /// Σ coefficient over every subject, pending included.
    pub total_coefficients: f64,
}

impl CompletionSummary {
    pub fn pending_coefficients(&self) -> f64 {
        self.total_coefficients - self.completed_coefficients
    }
}

/// Result of one evaluation pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub mode: ScoringMode,
    pub final_average: f64,
    pub summary: CompletionSummary,
    pub subjects: Vec<SubjectResult>,
    pub pending: Vec<Subject>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pillars: Option<PillarBreakdown>,
}

impl Evaluation {
    pub fn distinction(&self) -> Distinction {
        Distinction::from_average(self.final_average)
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }
}

/// Validate the snapshot for its mode, then aggregate it.
pub fn evaluate(input: &AggregateInput<'_>) -> Result<Evaluation, GradeError> {
    let evaluation = match input.mode {
        ScoringMode::Continuous | ScoringMode::CustomContinuous | ScoringMode::CustomExam => {
            check_grade_map(input.mode, input.subjects, input.grades)?;
            let weighting = Weighting::for_mode(input.mode, input.activities_weight);
            weighted_subjects(input.mode, input.subjects, input.grades, weighting)
        }
        ScoringMode::GeneralBac => {
            let pillars = input.pillars.ok_or_else(|| GradeError::IncompleteInput {
                mode: input.mode,
                missing: Pillar::ALL.iter().map(|p| p.as_str().to_string()).collect(),
            })?;
            general_bac(pillars)?
        }
        ScoringMode::NationalExamOnly | ScoringMode::RegionalExamOnly => {
            let empty = ExamMarks::new();
            let marks = input.exam_marks.unwrap_or(&empty);
            check_exam_marks(input.mode, input.subjects, marks)?;
            exam_only(input.mode, input.subjects, marks)
        }
    };

    debug!(
        mode = %evaluation.mode,
        average = evaluation.final_average,
        pending = evaluation.pending.len(),
        "evaluated snapshot"
    );
    Ok(evaluation)
}

/// Coefficient-weighted mean of subject averages, without validation.
///
/// A subject that is pending, or has no grade-map entry, contributes zero to
/// the numerator and its full coefficient to the denominator.
pub fn weighted_subjects(
    mode: ScoringMode,
    subjects: &[Subject],
    grades: &GradeMap,
    weighting: Weighting,
) -> Evaluation {
    let mut summary = CompletionSummary::default();
    let mut results = Vec::with_capacity(subjects.len());
    let mut pending = Vec::new();

    for subject in subjects {
        summary.total_coefficients += subject.coefficient;

        let average = match grades.get(&subject.id) {
            Some(data) if !data.is_pending => {
                Some(subject_average(data, subject.has_activities, weighting))
            }
            _ => None,
        };

        match average {
            Some(avg) => {
                summary.completed_score += avg * subject.coefficient;
                summary.completed_coefficients += subject.coefficient;
            }
            None => pending.push(subject.clone()),
        }

        results.push(SubjectResult {
            subject_id: subject.id.clone(),
            name: subject.name.clone(),
            coefficient: subject.coefficient,
            average,
            pending: average.is_none(),
        });
    }

    Evaluation {
        mode,
        final_average: ratio(summary.completed_score, summary.total_coefficients),
        summary,
        subjects: results,
        pending,
        pillars: None,
    }
}

/// `national × 0.5 + regional × 0.25 + continuous × 0.25`.
pub fn general_bac(pillars: &PillarMarks) -> Result<Evaluation, GradeError> {
    let missing: Vec<String> = Pillar::ALL
        .iter()
        .filter(|p| pillars.get(**p).is_none())
        .map(|p| p.as_str().to_string())
        .collect();
    if !missing.is_empty() {
        return Err(GradeError::IncompleteInput {
            mode: ScoringMode::GeneralBac,
            missing,
        });
    }

    let value = |p: Pillar| pillars.get(p).unwrap_or_default();
    let breakdown = PillarBreakdown {
        national: value(Pillar::National),
        regional: value(Pillar::Regional),
        continuous: value(Pillar::Continuous),
    };
    let final_average: f64 = Pillar::ALL.iter().map(|p| value(*p) * p.weight()).sum();

    Ok(Evaluation {
        mode: ScoringMode::GeneralBac,
        final_average,
        summary: CompletionSummary {
            completed_score: final_average,
            completed_coefficients: 1.0,
            total_coefficients: 1.0,
        },
        subjects: Vec::new(),
        pending: Vec::new(),
        pillars: Some(breakdown),
    })
}

/// Σ(mark × coefficient) / Σ coefficient over an exam table, without validation.
///
/// Subjects with no mark are left out of both sums.
pub fn exam_only(mode: ScoringMode, subjects: &[Subject], marks: &ExamMarks) -> Evaluation {
    let mut summary = CompletionSummary::default();
    let mut results = Vec::with_capacity(subjects.len());

    for subject in subjects {
        let mark = marks
            .get(&subject.id)
            .copied()
            .flatten()
            .filter(|v| v.is_finite());
        if let Some(m) = mark {
            summary.completed_score += m * subject.coefficient;
            summary.completed_coefficients += subject.coefficient;
            summary.total_coefficients += subject.coefficient;
        }
        results.push(SubjectResult {
            subject_id: subject.id.clone(),
            name: subject.name.clone(),
            coefficient: subject.coefficient,
            average: mark,
            pending: false,
        });
    }

    Evaluation {
        mode,
        final_average: ratio(summary.completed_score, summary.total_coefficients),
        summary,
        subjects: results,
        pending: Vec::new(),
        pillars: None,
    }
}

fn ratio(score: f64, coefficients: f64) -> f64 {
    if coefficients > 0.0 {
        score / coefficients
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SubjectData;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn two_subjects() -> Vec<Subject> {
        vec![
            Subject::new("a", "A", 4.0).without_activities(),
            Subject::new("b", "B", 6.0).without_activities(),
        ]
    }

    #[test]
    fn pending_subject_counts_in_denominator() {
        let subjects = two_subjects();
        let grades = GradeMap::new()
            .with("a", SubjectData::from_marks(&[Some(16.0)], None))
            .with("b", SubjectData::from_marks(&[], None).pending());
        let eval = evaluate(&AggregateInput::new(ScoringMode::Continuous, &subjects, &grades))
            .unwrap();
        assert!(close(eval.final_average, 6.4));
        assert!(close(eval.summary.completed_score, 64.0));
        assert!(close(eval.summary.completed_coefficients, 4.0));
        assert!(close(eval.summary.total_coefficients, 10.0));
        assert!(close(eval.summary.pending_coefficients(), 6.0));
        assert_eq!(eval.pending.len(), 1);
        assert_eq!(eval.pending[0].id, "b");
        assert!(eval.subjects[1].pending);
    }

    #[test]
    fn flipping_to_pending_never_raises_average() {
        let subjects = two_subjects();
        let a = SubjectData::from_marks(&[Some(12.0)], None);
        let b = SubjectData::from_marks(&[Some(9.0)], None);
        let base = GradeMap::new().with("a", a.clone()).with("b", b.clone());
        let flipped = GradeMap::new().with("a", a).with("b", b.pending());

        let before = evaluate(&AggregateInput::new(ScoringMode::Continuous, &subjects, &base))
            .unwrap()
            .final_average;
        let after = evaluate(&AggregateInput::new(ScoringMode::Continuous, &subjects, &flipped))
            .unwrap()
            .final_average;
        assert!(after < before);

        let zero = GradeMap::new()
            .with("a", SubjectData::from_marks(&[Some(12.0)], None))
            .with("b", SubjectData::from_marks(&[Some(0.0)], None));
        let zero_flipped = GradeMap::new()
            .with("a", SubjectData::from_marks(&[Some(12.0)], None))
            .with("b", SubjectData::from_marks(&[Some(0.0)], None).pending());
        let z1 = evaluate(&AggregateInput::new(ScoringMode::Continuous, &subjects, &zero))
            .unwrap()
            .final_average;
        let z2 = evaluate(&AggregateInput::new(ScoringMode::Continuous, &subjects, &zero_flipped))
            .unwrap()
            .final_average;
        assert!(close(z1, z2));
    }

    #[test]
    fn evaluation_is_idempotent() {
        let subjects = vec![Subject::new("math", "Maths", 7.0)];
        let grades =
            GradeMap::new().with("math", SubjectData::from_marks(&[Some(14.0), Some(16.0)], Some(12.0)));
        let input = AggregateInput::new(ScoringMode::Continuous, &subjects, &grades);
        let first = evaluate(&input).unwrap();
        let second = evaluate(&input).unwrap();
        assert_eq!(first, second);
        assert!(close(first.final_average, 14.25));
    }

    #[test]
    fn custom_mode_uses_custom_weight() {
        let subjects = vec![Subject::new("s", "S", 2.0)];
        let grades = GradeMap::new().with("s", SubjectData::from_marks(&[Some(10.0)], Some(20.0)));
        let weight = ActivitiesWeight::new(0.5).unwrap();

        let custom = evaluate(
            &AggregateInput::new(ScoringMode::CustomContinuous, &subjects, &grades)
                .with_activities_weight(weight),
        )
        .unwrap();
        assert!(close(custom.final_average, 15.0));

        let standard = evaluate(
            &AggregateInput::new(ScoringMode::Continuous, &subjects, &grades)
                .with_activities_weight(weight),
        )
        .unwrap();
        assert!(close(standard.final_average, 12.5));
    }

    #[test]
    fn incomplete_subject_refuses_computation() {
        let subjects = two_subjects();
        let grades = GradeMap::new().with("a", SubjectData::from_marks(&[Some(16.0)], None));
        let err = evaluate(&AggregateInput::new(ScoringMode::Continuous, &subjects, &grades))
            .unwrap_err();
        assert_eq!(err.missing_subjects(), ["b".to_string()]);
    }

    #[test]
    fn empty_subject_list_is_zero() {
        let grades = GradeMap::new();
        let eval = evaluate(&AggregateInput::new(ScoringMode::CustomExam, &[], &grades)).unwrap();
        assert_eq!(eval.final_average, 0.0);
    }

    #[test]
    fn general_bac_blend() {
        let pillars = PillarMarks::new(12.0, 14.0, 16.0);
        let grades = GradeMap::new();
        let eval = evaluate(
            &AggregateInput::new(ScoringMode::GeneralBac, &[], &grades).with_pillars(&pillars),
        )
        .unwrap();
        assert!(close(eval.final_average, 13.5));
        assert_eq!(eval.pillars.unwrap().continuous, 16.0);
    }

    #[test]
    fn general_bac_semesters_feed_continuous_pillar() {
        let pillars = PillarMarks {
            national: Some(10.0),
            regional: Some(10.0),
            continuous: ContinuousPillar::Semesters {
                s1: Some(13.0),
                s2: Some(15.0),
            },
        };
        let eval = general_bac(&pillars).unwrap();
        assert!(close(eval.final_average, 5.0 + 2.5 + 3.5));
    }

    #[test]
    fn general_bac_missing_pillar_is_incomplete() {
        let pillars = PillarMarks {
            national: Some(10.0),
            regional: None,
            continuous: ContinuousPillar::Semesters {
                s1: Some(13.0),
                s2: None,
            },
        };
        let err = general_bac(&pillars).unwrap_err();
        assert_eq!(
            err.missing_subjects(),
            ["regional".to_string(), "continuous".to_string()]
        );

        let grades = GradeMap::new();
        assert!(evaluate(&AggregateInput::new(ScoringMode::GeneralBac, &[], &grades)).is_err());
    }

    #[test]
    fn exam_only_weighted_mean() {
        let subjects = vec![Subject::new("math", "Maths", 7.0), Subject::new("eng", "Anglais", 2.0)];
        let mut marks = ExamMarks::new();
        marks.insert("math".into(), Some(12.0));
        marks.insert("eng".into(), Some(18.0));
        let grades = GradeMap::new();
        let eval = evaluate(
            &AggregateInput::new(ScoringMode::NationalExamOnly, &subjects, &grades)
                .with_exam_marks(&marks),
        )
        .unwrap();
        assert!(close(eval.final_average, (84.0 + 36.0) / 9.0));
        assert!(eval.pending.is_empty());
    }

    #[test]
    fn exam_only_missing_mark_is_not_zero_filled() {
        let subjects = vec![Subject::new("math", "Maths", 7.0), Subject::new("eng", "Anglais", 2.0)];
        let mut marks = ExamMarks::new();
        marks.insert("math".into(), Some(12.0));
        let grades = GradeMap::new();
        let err = evaluate(
            &AggregateInput::new(ScoringMode::RegionalExamOnly, &subjects, &grades)
                .with_exam_marks(&marks),
        )
        .unwrap_err();
        assert!(matches!(err, GradeError::IncompleteInput { .. }));
    }
}
