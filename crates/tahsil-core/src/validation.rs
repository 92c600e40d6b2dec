//! Completeness checks run before any aggregation.

use crate::error::GradeError;
use crate::model::{ExamMarks, GradeMap, ScoringMode, Subject, SubjectData};

/// Whether a non-pending subject has every field it needs filled.
fn is_filled(subject: &Subject, data: &SubjectData) -> bool {
    let assessments_filled = data.assessments.iter().all(|a| a.value.is_some());
    let activities_filled = !subject.has_activities || data.activities_mark.is_some();
    assessments_filled && activities_filled
}

/// Ids of subjects that block a continuous or custom computation.
///
/// Pending subjects are never reported. A subject without a grade-map entry
/// always is.
pub fn incomplete_subjects(subjects: &[Subject], grades: &GradeMap) -> Vec<String> {
    subjects
        .iter()
        .filter(|subject| match grades.get(&subject.id) {
            None => true,
            Some(data) if data.is_pending => false,
            Some(data) => !is_filled(subject, data),
        })
        .map(|subject| subject.id.clone())
        .collect()
}

/// Refuse a continuous-family computation with missing marks.
pub fn check_grade_map(
    mode: ScoringMode,
    subjects: &[Subject],
    grades: &GradeMap,
) -> Result<(), GradeError> {
    let missing = incomplete_subjects(subjects, grades);
    if missing.is_empty() {
        Ok(())
    } else {
        Err(GradeError::IncompleteInput { mode, missing })
    }
}

/// Refuse an exam-only computation unless every subject of the table has a mark.
pub fn check_exam_marks(
    mode: ScoringMode,
    subjects: &[Subject],
    marks: &ExamMarks,
) -> Result<(), GradeError> {
    let missing: Vec<String> = subjects
        .iter()
        .filter(|s| !matches!(marks.get(&s.id), Some(Some(v)) if v.is_finite()))
        .map(|s| s.id.clone())
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(GradeError::IncompleteInput { mode, missing })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subjects() -> Vec<Subject> {
        vec![
            Subject::new("math", "Maths", 7.0),
            Subject::new("philo", "Philosophie", 2.0).without_activities(),
        ]
    }

    #[test]
    fn complete_map_passes() {
        let grades = GradeMap::new()
            .with("math", SubjectData::from_marks(&[Some(12.0)], Some(15.0)))
            .with("philo", SubjectData::from_marks(&[Some(9.0)], None));
        assert!(check_grade_map(ScoringMode::Continuous, &subjects(), &grades).is_ok());
    }

    #[test]
    fn blank_assessment_or_activity_is_reported() {
        let grades = GradeMap::new()
            .with("math", SubjectData::from_marks(&[Some(12.0)], None))
            .with("philo", SubjectData::from_marks(&[None], None));
        assert_eq!(
            incomplete_subjects(&subjects(), &grades),
            vec!["math".to_string(), "philo".to_string()]
        );
    }

    #[test]
    fn pending_subject_is_exempt() {
        let grades = GradeMap::new()
            .with("math", SubjectData::from_marks(&[None], None).pending())
            .with("philo", SubjectData::from_marks(&[Some(9.0)], None));
        assert!(incomplete_subjects(&subjects(), &grades).is_empty());
    }

    #[test]
    fn missing_entry_is_reported() {
        let grades = GradeMap::new().with("philo", SubjectData::from_marks(&[Some(9.0)], None));
        let err = check_grade_map(ScoringMode::Continuous, &subjects(), &grades).unwrap_err();
        assert_eq!(err.missing_subjects(), ["math".to_string()]);
    }

    #[test]
    fn exam_marks_need_every_subject() {
        let mut marks = ExamMarks::new();
        marks.insert("math".into(), Some(12.0));
        marks.insert("philo".into(), None);
        let err =
            check_exam_marks(ScoringMode::NationalExamOnly, &subjects(), &marks).unwrap_err();
        assert_eq!(err.missing_subjects(), ["philo".to_string()]);

        marks.insert("philo".into(), Some(8.0));
        assert!(check_exam_marks(ScoringMode::NationalExamOnly, &subjects(), &marks).is_ok());
    }
}
