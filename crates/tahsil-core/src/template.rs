//! Saved custom-mode curricula.
//!
//! A template keeps the subject list and activities weight of a custom
//! session, optionally with the marks entered so far. One template is kept
//! per kind.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{ActivitiesWeight, Assessment, GradeMap, ScoringMode, Subject, SubjectData};

/// Which custom mode a template belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateKind {
    Continuous,
    Exam,
}

impl TemplateKind {
    pub fn for_mode(mode: ScoringMode) -> Option<Self> {
        match mode {
            ScoringMode::CustomContinuous => Some(TemplateKind::Continuous),
            ScoringMode::CustomExam => Some(TemplateKind::Exam),
            _ => None,
        }
    }

    pub fn mode(self) -> ScoringMode {
        match self {
            TemplateKind::Continuous => ScoringMode::CustomContinuous,
            TemplateKind::Exam => ScoringMode::CustomExam,
        }
    }

    fn file_name(self) -> &'static str {
        match self {
            TemplateKind::Continuous => "custom_template.json",
            TemplateKind::Exam => "custom_exam_template.json",
        }
    }

    /// The single blank assessment a fresh subject starts with.
    fn blank_assessment(self) -> Assessment {
        match self {
            TemplateKind::Continuous => Assessment::new("1", "Devoir 1", None),
            TemplateKind::Exam => Assessment::new("exam", "Note Examen", None),
        }
    }
}

impl fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateKind::Continuous => write!(f, "continuous"),
            TemplateKind::Exam => write!(f, "exam"),
        }
    }
}

impl FromStr for TemplateKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "continuous" | "custom_continuous" => Ok(TemplateKind::Continuous),
            "exam" | "custom_exam" => Ok(TemplateKind::Exam),
            other => Err(format!("unknown template kind: {other}")),
        }
    }
}

/// A saved custom curriculum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub id: Uuid,
    pub kind: TemplateKind,
    pub saved_at: DateTime<Utc>,
    pub subjects: Vec<Subject>,
    #[serde(default)]
    pub activities_weight: ActivitiesWeight,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grades: Option<GradeMap>,
}

impl Template {
    /// Build a template. An empty subject list is refused.
    pub fn new(
        kind: TemplateKind,
        subjects: Vec<Subject>,
        activities_weight: ActivitiesWeight,
        grades: Option<GradeMap>,
    ) -> Result<Self> {
        if subjects.is_empty() {
            anyhow::bail!("a template needs at least one subject");
        }
        Ok(Self {
            id: Uuid::new_v4(),
            kind,
            saved_at: Utc::now(),
            subjects,
            activities_weight,
            grades,
        })
    }

    /// The saved marks, or a blank grade map for the template's subjects.
    pub fn grade_map(&self) -> GradeMap {
        match &self.grades {
            Some(grades) => grades.clone(),
            None => blank_grades(self.kind, &self.subjects),
        }
    }
}

/// One blank assessment, a blank activity mark and no pending flag per subject.
pub fn blank_grades(kind: TemplateKind, subjects: &[Subject]) -> GradeMap {
    subjects.iter().fold(GradeMap::new(), |map, subject| {
        map.with(
            subject.id.clone(),
            SubjectData {
                assessments: vec![kind.blank_assessment()],
                activities_mark: None,
                is_pending: false,
            },
        )
    })
}

/// Persistence for templates, one slot per kind.
pub trait TemplateStore {
    fn save(&self, template: &Template) -> Result<()>;

    /// `Ok(None)` when nothing was saved for `kind`.
    fn load(&self, kind: TemplateKind) -> Result<Option<Template>>;

    fn remove(&self, kind: TemplateKind) -> Result<()>;
}

/// Templates stored as pretty JSON files in one directory.
#[derive(Debug, Clone)]
pub struct FileTemplateStore {
    dir: PathBuf,
}

impl FileTemplateStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, kind: TemplateKind) -> PathBuf {
        self.dir.join(kind.file_name())
    }
}

impl TemplateStore for FileTemplateStore {
    fn save(&self, template: &Template) -> Result<()> {
        let path = self.path_for(template.kind);
        let json = serde_json::to_string_pretty(template).context("failed to serialize template")?;
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("failed to create {}", self.dir.display()))?;
        std::fs::write(&path, json)
            .with_context(|| format!("failed to write template to {}", path.display()))?;
        tracing::debug!(kind = %template.kind, path = %path.display(), "saved template");
        Ok(())
    }

    fn load(&self, kind: TemplateKind) -> Result<Option<Template>> {
        let path = self.path_for(kind);
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read template from {}", path.display()))?;
        let template: Template = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse template {}", path.display()))?;
        if template.kind != kind {
            anyhow::bail!(
                "{} holds a {} template, expected {kind}",
                path.display(),
                template.kind
            );
        }
        Ok(Some(template))
    }

    fn remove(&self, kind: TemplateKind) -> Result<()> {
        let path = self.path_for(kind);
        if path.exists() {
            std::fs::remove_file(&path)
                .with_context(|| format!("failed to remove {}", path.display()))?;
        }
        Ok(())
    }
}
