//! TOML grade sheet parser.
//!
//! A sheet describes one evaluation pass: the mode, the curriculum, and the
//! marks entered so far. Blank or unparsable marks become absent values so
//! completeness validation can report them.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::aggregate::{evaluate, AggregateInput, ContinuousPillar, Evaluation, PillarMarks};
use crate::catalog::{extra_subject, find_stream};
use crate::error::GradeError;
use crate::model::{
    ActivitiesWeight, ExamMarks, GradeMap, Lang, Level, Mark, ScoringMode, Stream, Subject,
    SubjectData, MAX_MARK,
};

/// Intermediate TOML structure for a sheet file.
#[derive(Debug, Deserialize)]
struct TomlSheetFile {
    sheet: TomlSheetHeader,
    #[serde(default)]
    subjects: Vec<TomlSubject>,
    #[serde(default)]
    extras: Vec<TomlExtra>,
    #[serde(default)]
    grades: BTreeMap<String, TomlGrades>,
    #[serde(default)]
    exam: BTreeMap<String, MarkInput>,
    #[serde(default)]
    pillars: Option<TomlPillars>,
}

#[derive(Debug, Deserialize)]
struct TomlSheetHeader {
    mode: String,
    #[serde(default)]
    level: Option<String>,
    #[serde(default)]
    stream: Option<String>,
    #[serde(default)]
    activities_weight: Option<f64>,
    #[serde(default)]
    target: Option<f64>,
    #[serde(default)]
    lang: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TomlSubject {
    id: String,
    name: String,
    coefficient: f64,
    #[serde(default = "default_true")]
    has_activities: bool,
}

#[derive(Debug, Deserialize)]
struct TomlExtra {
    id: String,
    #[serde(default)]
    coefficient: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct TomlGrades {
    #[serde(default)]
    tests: Vec<MarkInput>,
    #[serde(default)]
    activity: Option<MarkInput>,
    #[serde(default)]
    pending: bool,
}

#[derive(Debug, Deserialize)]
struct TomlPillars {
    #[serde(default)]
    national: Option<MarkInput>,
    #[serde(default)]
    regional: Option<MarkInput>,
    #[serde(default)]
    continuous: Option<MarkInput>,
    #[serde(default)]
    s1: Option<MarkInput>,
    #[serde(default)]
    s2: Option<MarkInput>,
}

/// A mark as typed in a sheet: a number, or free text that may be blank.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum MarkInput {
    Number(f64),
    Text(String),
}

impl MarkInput {
    fn resolve(&self) -> Option<Mark> {
        match self {
            MarkInput::Number(v) => Some(*v).filter(|v| v.is_finite()),
            MarkInput::Text(s) => parse_mark(s),
        }
    }
}

fn default_true() -> bool {
    true
}

/// Parse a typed mark. Blank or unparsable text is absent.
///
/// A decimal comma is accepted (`12,5`).
pub fn parse_mark(text: &str) -> Option<Mark> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

fn resolve_in_range(input: Option<&MarkInput>, field: &str) -> Result<Option<Mark>> {
    let mark = input.and_then(MarkInput::resolve);
    if let Some(m) = mark {
        if !(0.0..=MAX_MARK).contains(&m) {
            anyhow::bail!("mark {m} for {field} is outside 0..=20");
        }
    }
    Ok(mark)
}

/// An immutable snapshot of one sheet, ready for the engine.
#[derive(Debug, Clone)]
pub struct GradeSheet {
    pub mode: ScoringMode,
    pub level: Level,
    /// `None` for custom curricula.
    pub stream: Option<Stream>,
    /// Active subjects: stream list plus extras, or the custom list.
    pub subjects: Vec<Subject>,
    pub activities_weight: ActivitiesWeight,
    pub grades: GradeMap,
    pub exam_marks: ExamMarks,
    pub pillars: Option<PillarMarks>,
    pub target: Option<f64>,
    pub lang: Option<Lang>,
}

impl GradeSheet {
    /// The subject list the sheet's mode aggregates over.
    pub fn scored_subjects(&self) -> Result<&[Subject], GradeError> {
        match (&self.stream, self.mode.is_exam_only()) {
            (Some(stream), true) => stream.exam_subjects(self.mode),
            (None, true) => Err(GradeError::MissingExamTable {
                stream: "custom".into(),
                mode: self.mode,
            }),
            _ => Ok(&self.subjects),
        }
    }

    /// Run the engine over this sheet.
    pub fn evaluate(&self) -> Result<Evaluation, GradeError> {
        let subjects = self.scored_subjects()?;
        let mut input = AggregateInput::new(self.mode, subjects, &self.grades)
            .with_activities_weight(self.activities_weight)
            .with_exam_marks(&self.exam_marks);
        if let Some(pillars) = &self.pillars {
            input = input.with_pillars(pillars);
        }
        evaluate(&input)
    }
}

/// Parse a sheet file.
pub fn parse_sheet(path: &Path) -> Result<GradeSheet> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read grade sheet: {}", path.display()))?;

    parse_sheet_str(&content, path)
}

/// Parse a sheet from a TOML string (useful for testing).
pub fn parse_sheet_str(content: &str, source_path: &Path) -> Result<GradeSheet> {
    let parsed: TomlSheetFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let mode: ScoringMode = parsed
        .sheet
        .mode
        .parse()
        .map_err(|e: String| anyhow::anyhow!("{}", e))?;

    let activities_weight = match parsed.sheet.activities_weight {
        Some(w) => ActivitiesWeight::new(w)?,
        None => ActivitiesWeight::STANDARD,
    };

    let lang = parsed
        .sheet
        .lang
        .map(|l| l.parse::<Lang>().map_err(|e| anyhow::anyhow!("{}", e)))
        .transpose()?;

    let (level, stream, mut subjects) = if mode.is_custom() {
        if parsed.subjects.is_empty() {
            anyhow::bail!("{mode} sheets need a [[subjects]] list");
        }
        let custom = parsed
            .subjects
            .into_iter()
            .map(|s| {
                if !(s.coefficient.is_finite() && s.coefficient > 0.0) {
                    anyhow::bail!(
                        "subject '{}' needs a positive coefficient, got {}",
                        s.id,
                        s.coefficient
                    );
                }
                Ok(Subject {
                    id: s.id,
                    name: s.name,
                    coefficient: s.coefficient,
                    has_activities: s.has_activities,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        (Level::Custom, None, custom)
    } else if mode == ScoringMode::GeneralBac {
        let level = match parsed.sheet.level {
            Some(l) => l.parse().map_err(|e: String| anyhow::anyhow!("{}", e))?,
            None => Level::SecondBac,
        };
        let stream = parsed.sheet.stream.as_deref().map(find_stream).transpose()?;
        (level, stream, Vec::new())
    } else {
        let id = parsed
            .sheet
            .stream
            .context("sheet.stream is required for non-custom modes")?;
        let stream = find_stream(&id)?;
        if let Some(level) = parsed.sheet.level {
            let declared: Level = level.parse().map_err(|e: String| anyhow::anyhow!("{}", e))?;
            if declared != stream.level {
                anyhow::bail!("stream '{}' belongs to {}, not {declared}", stream.id, stream.level);
            }
        }
        let list = stream.subjects.clone();
        (stream.level, Some(stream), list)
    };

    if !mode.is_custom() {
        for extra in parsed.extras {
            subjects.push(extra_subject(&extra.id, extra.coefficient)?);
        }
    } else if !parsed.extras.is_empty() {
        tracing::warn!("extras are ignored in {mode} sheets; list them under [[subjects]]");
    }

    let mut grades = GradeMap::new();
    for (id, g) in &parsed.grades {
        if !subjects.iter().any(|s| &s.id == id) {
            tracing::warn!("ignoring grades for unknown subject '{id}'");
            continue;
        }
        let tests = g
            .tests
            .iter()
            .enumerate()
            .map(|(i, m)| resolve_in_range(Some(m), &format!("{id} devoir {}", i + 1)))
            .collect::<Result<Vec<_>>>()?;
        let activity = resolve_in_range(g.activity.as_ref(), &format!("{id} activity"))?;
        let mut data = SubjectData::from_marks(&tests, activity);
        data.is_pending = g.pending;
        grades.insert(id.clone(), data);
    }

    let exam_table: &[Subject] = match (&stream, mode.is_exam_only()) {
        (Some(stream), true) => stream.exam_subjects(mode).unwrap_or(&[]),
        _ => &[],
    };
    let mut exam_marks = ExamMarks::new();
    for (id, m) in &parsed.exam {
        if !exam_table.iter().any(|s| &s.id == id) {
            tracing::warn!("ignoring exam mark for '{id}', not in the {mode} subject table");
            continue;
        }
        exam_marks.insert(id.clone(), resolve_in_range(Some(m), id)?);
    }

    let pillars = parsed
        .pillars
        .map(|p| -> Result<PillarMarks> {
            let continuous = match (&p.s1, &p.s2) {
                (None, None) => ContinuousPillar::Annual {
                    mark: resolve_in_range(p.continuous.as_ref(), "continuous")?,
                },
                _ => ContinuousPillar::Semesters {
                    s1: resolve_in_range(p.s1.as_ref(), "s1")?,
                    s2: resolve_in_range(p.s2.as_ref(), "s2")?,
                },
            };
            Ok(PillarMarks {
                national: resolve_in_range(p.national.as_ref(), "national")?,
                regional: resolve_in_range(p.regional.as_ref(), "regional")?,
                continuous,
            })
        })
        .transpose()?;

    Ok(GradeSheet {
        mode,
        level,
        stream,
        subjects,
        activities_weight,
        grades,
        exam_marks,
        pillars,
        target: parsed.sheet.target,
        lang,
    })
}
