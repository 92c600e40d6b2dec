//! Core data model types for tahsil.
//!
//! Every type here is an immutable snapshot handed to the engine for one
//! evaluation pass. The engine never stores or mutates them.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GradeError;

/// Highest mark on the Moroccan scale.
pub const MAX_MARK: f64 = 20.0;

/// A mark in `[0, 20]`. Range checks belong to the input layer.
pub type Mark = f64;

/// One timed assessment (devoir) of a subject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub id: String,
    pub label: String,
    /// `None` when the field is blank or could not be parsed.
    #[serde(default)]
    pub value: Option<Mark>,
}

impl Assessment {
    pub fn new(id: impl Into<String>, label: impl Into<String>, value: Option<Mark>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            value,
        }
    }
}

/// Everything entered for one subject.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubjectData {
    #[serde(default)]
    pub assessments: Vec<Assessment>,
    #[serde(default)]
    pub activities_mark: Option<Mark>,
    /// Subject not gradable yet; see [`crate::aggregate`] for how it counts.
    #[serde(default)]
    pub is_pending: bool,
}

impl SubjectData {
    /// Build subject data from plain marks, labelling assessments "Devoir n".
    pub fn from_marks(marks: &[Option<Mark>], activities_mark: Option<Mark>) -> Self {
        let assessments = marks
            .iter()
            .enumerate()
            .map(|(i, value)| Assessment::new((i + 1).to_string(), format!("Devoir {}", i + 1), *value))
            .collect();
        Self {
            assessments,
            activities_mark,
            is_pending: false,
        }
    }

    pub fn pending(mut self) -> Self {
        self.is_pending = true;
        self
    }
}

/// A subject of a curriculum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subject {
    pub id: String,
    pub name: String,
    pub coefficient: f64,
    #[serde(default = "default_true")]
    pub has_activities: bool,
}

impl Subject {
    pub fn new(id: impl Into<String>, name: impl Into<String>, coefficient: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            coefficient,
            has_activities: true,
        }
    }

    pub fn without_activities(mut self) -> Self {
        self.has_activities = false;
        self
    }
}

fn default_true() -> bool {
    true
}

/// Per-subject data keyed by subject id.
///
/// Recreated by the caller whenever the active subject list changes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GradeMap(BTreeMap<String, SubjectData>);

impl GradeMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, subject_id: &str) -> Option<&SubjectData> {
        self.0.get(subject_id)
    }

    pub fn insert(&mut self, subject_id: impl Into<String>, data: SubjectData) {
        self.0.insert(subject_id.into(), data);
    }

    /// Builder-style insert, handy for snapshots assembled in one expression.
    pub fn with(mut self, subject_id: impl Into<String>, data: SubjectData) -> Self {
        self.insert(subject_id, data);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &SubjectData)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Marks entered per subject in exam-only modes, keyed by subject id.
pub type ExamMarks = BTreeMap<String, Option<Mark>>;

/// Curriculum level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    FirstBac,
    SecondBac,
    Custom,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::FirstBac => write!(f, "1ere_bac"),
            Level::SecondBac => write!(f, "2eme_bac"),
            Level::Custom => write!(f, "custom"),
        }
    }
}

impl FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "1ere_bac" | "first_bac" | "1bac" => Ok(Level::FirstBac),
            "2eme_bac" | "second_bac" | "2bac" => Ok(Level::SecondBac),
            "custom" => Ok(Level::Custom),
            other => Err(format!("unknown level: {other}")),
        }
    }
}

/// A curriculum with its continuous-mode subject list and the separate
/// coefficient tables used by the exam-only modes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stream {
    pub id: String,
    pub name: String,
    pub level: Level,
    pub subjects: Vec<Subject>,
    #[serde(default)]
    pub national_exam_subjects: Vec<Subject>,
    #[serde(default)]
    pub regional_exam_subjects: Vec<Subject>,
}

impl Stream {
    /// The subject table an exam-only mode aggregates over.
    pub fn exam_subjects(&self, mode: ScoringMode) -> Result<&[Subject], GradeError> {
        let table = match mode {
            ScoringMode::NationalExamOnly => &self.national_exam_subjects,
            ScoringMode::RegionalExamOnly => &self.regional_exam_subjects,
            _ => return Ok(&self.subjects),
        };
        if table.is_empty() {
            return Err(GradeError::MissingExamTable {
                stream: self.id.clone(),
                mode,
            });
        }
        Ok(table)
    }
}

/// Scoring scheme selected for one evaluation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringMode {
    Continuous,
    GeneralBac,
    NationalExamOnly,
    RegionalExamOnly,
    CustomContinuous,
    CustomExam,
}

impl ScoringMode {
    /// Custom modes use the caller's activities weight instead of the fixed split.
    pub fn is_custom(self) -> bool {
        matches!(self, ScoringMode::CustomContinuous | ScoringMode::CustomExam)
    }

    /// Exam-only modes aggregate one mark per subject with no pending rule.
    pub fn is_exam_only(self) -> bool {
        matches!(
            self,
            ScoringMode::NationalExamOnly | ScoringMode::RegionalExamOnly
        )
    }
}

impl fmt::Display for ScoringMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ScoringMode::Continuous => "continuous",
            ScoringMode::GeneralBac => "general_bac",
            ScoringMode::NationalExamOnly => "national_exam",
            ScoringMode::RegionalExamOnly => "regional_exam",
            ScoringMode::CustomContinuous => "custom_continuous",
            ScoringMode::CustomExam => "custom_exam",
        };
        f.write_str(s)
    }
}

impl FromStr for ScoringMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "continuous" => Ok(ScoringMode::Continuous),
            "general_bac" | "general" => Ok(ScoringMode::GeneralBac),
            "national_exam" | "national_exam_only" | "national" => {
                Ok(ScoringMode::NationalExamOnly)
            }
            "regional_exam" | "regional_exam_only" | "regional" => {
                Ok(ScoringMode::RegionalExamOnly)
            }
            "custom_continuous" | "custom" => Ok(ScoringMode::CustomContinuous),
            "custom_exam" => Ok(ScoringMode::CustomExam),
            other => Err(format!("unknown scoring mode: {other}")),
        }
    }
}

/// Share of a subject average taken by the activity mark, strictly inside `(0, 1)`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct ActivitiesWeight(f64);

impl ActivitiesWeight {
    /// The official 75/25 split.
    pub const STANDARD: ActivitiesWeight = ActivitiesWeight(0.25);

    pub fn new(weight: f64) -> Result<Self, GradeError> {
        if weight > 0.0 && weight < 1.0 {
            Ok(Self(weight))
        } else {
            Err(GradeError::InvalidActivitiesWeight(weight))
        }
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl Default for ActivitiesWeight {
    fn default() -> Self {
        Self::STANDARD
    }
}

impl TryFrom<f64> for ActivitiesWeight {
    type Error = GradeError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ActivitiesWeight> for f64 {
    fn from(value: ActivitiesWeight) -> Self {
        value.0
    }
}

/// Entry language for the remote collaborators.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    #[default]
    Ar,
    Fr,
}

impl fmt::Display for Lang {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lang::Ar => write!(f, "ar"),
            Lang::Fr => write!(f, "fr"),
        }
    }
}

impl FromStr for Lang {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ar" | "arabic" => Ok(Lang::Ar),
            "fr" | "french" => Ok(Lang::Fr),
            other => Err(format!("unknown language: {other}")),
        }
    }
}
