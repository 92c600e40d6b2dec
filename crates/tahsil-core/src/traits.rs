//! Remote advisor trait and its request/response types.
//!
//! Implemented by the `tahsil-advisor` crate. The engine never interprets
//! the answers; they are shown to the student as-is.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::aggregate::Evaluation;
use crate::model::{GradeMap, Lang, Level};

/// Trait for services that comment on a student's results.
#[async_trait]
pub trait Advisor: Send + Sync {
    /// Human-readable backend name.
    fn name(&self) -> &str;

    /// Schools worth applying to for a final average.
    async fn suggest_schools(
        &self,
        request: &SuggestionRequest,
    ) -> anyhow::Result<SchoolSuggestions>;

    /// Strengths, weaknesses and a study plan for a grade map.
    async fn analyze_grades(&self, request: &AnalysisRequest) -> anyhow::Result<GradeAnalysis>;
}

/// Body of a school-suggestion request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionRequest {
    /// Final average, rounded to two decimals.
    pub avg: f64,
    /// Stream name as shown to the student.
    pub stream: String,
    pub exam_year: String,
    pub lang: Lang,
}

/// How likely an admission is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Chance {
    High,
    Medium,
    Low,
}

impl fmt::Display for Chance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Chance::High => write!(f, "High"),
            Chance::Medium => write!(f, "Medium"),
            Chance::Low => write!(f, "Low"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct School {
    pub name: String,
    pub description: String,
    pub chance: Chance,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchoolSuggestions {
    pub summary: String,
    #[serde(default)]
    pub suggested_schools: Vec<School>,
}

/// Body of a grade-analysis request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub grades: GradeMap,
    pub stream: String,
    pub level: Level,
    pub lang: Lang,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeAnalysis {
    pub summary: String,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub weaknesses: Vec<String>,
    #[serde(default)]
    pub plan: Vec<String>,
    #[serde(default)]
    pub prediction: String,
}

impl SuggestionRequest {
    pub fn from_evaluation(
        evaluation: &Evaluation,
        stream: impl Into<String>,
        exam_year: impl Into<String>,
        lang: Lang,
    ) -> Self {
        Self {
            avg: (evaluation.final_average * 100.0).round() / 100.0,
            stream: stream.into(),
            exam_year: exam_year.into(),
            lang,
        }
    }
}
