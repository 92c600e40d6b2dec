//! Mock advisor for testing.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use tahsil_core::model::Lang;
use tahsil_core::traits::{
    Advisor, AnalysisRequest, Chance, GradeAnalysis, School, SchoolSuggestions, SuggestionRequest,
};

use crate::error::AdvisorError;

/// An advisor that answers from canned data without any network call.
pub struct MockAdvisor {
    suggestions: SchoolSuggestions,
    analysis: GradeAnalysis,
    /// When set, every call fails with an API error carrying this status.
    fail_status: Option<u16>,
    call_count: AtomicU32,
    last_suggestion: Mutex<Option<SuggestionRequest>>,
}

impl MockAdvisor {
    pub fn new(suggestions: SchoolSuggestions, analysis: GradeAnalysis) -> Self {
        Self {
            suggestions,
            analysis,
            fail_status: None,
            call_count: AtomicU32::new(0),
            last_suggestion: Mutex::new(None),
        }
    }

    /// A mock with generic answers in the given language.
    pub fn canned(lang: Lang) -> Self {
        let (summary, plan) = match lang {
            Lang::Fr => (
                "Analyse préliminaire : ciblez les matières à hauts coefficients.",
                vec!["Identifier priorités", "Planning quotidien", "Pratique examens", "Bilan hebdo"],
            ),
            Lang::Ar => (
                "تحليل مبدئي: ركز على المواد ذات المعاملات المرتفعة.",
                vec!["تحديد المواد ذات الأولوية", "وضع جدول زمني يومي", "التدرب على الامتحانات", "تقييم التقدم الأسبوعي"],
            ),
        };
        Self::new(
            SchoolSuggestions {
                summary: summary.to_string(),
                suggested_schools: vec![School {
                    name: "ENSA".into(),
                    description: "École nationale des sciences appliquées".into(),
                    chance: Chance::Medium,
                }],
            },
            GradeAnalysis {
                summary: summary.to_string(),
                strengths: Vec::new(),
                weaknesses: Vec::new(),
                plan: plan.into_iter().map(String::from).collect(),
                prediction: String::new(),
            },
        )
    }

    /// A mock whose every call fails with HTTP `status`.
    pub fn failing(status: u16) -> Self {
        let mut mock = Self::canned(Lang::Fr);
        mock.fail_status = Some(status);
        mock
    }

    /// Get the number of calls made to this advisor.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    /// Get the last suggestion request received.
    pub fn last_suggestion(&self) -> Option<SuggestionRequest> {
        self.last_suggestion
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn record(&self) -> Result<(), AdvisorError> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        match self.fail_status {
            Some(status) => Err(AdvisorError::Api {
                status,
                message: "mock failure".into(),
            }),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl Advisor for MockAdvisor {
    fn name(&self) -> &str {
        "mock"
    }

    async fn suggest_schools(
        &self,
        request: &SuggestionRequest,
    ) -> anyhow::Result<SchoolSuggestions> {
        *self.last_suggestion.lock().unwrap_or_else(|e| e.into_inner()) = Some(request.clone());
        self.record()?;
        Ok(self.suggestions.clone())
    }

    async fn analyze_grades(&self, _request: &AnalysisRequest) -> anyhow::Result<GradeAnalysis> {
        self.record()?;
        Ok(self.analysis.clone())
    }
}
