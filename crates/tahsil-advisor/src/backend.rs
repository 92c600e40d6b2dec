//! HTTP advisor backed by the tahsil web service.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{instrument, warn};

use tahsil_core::traits::{
    Advisor, AnalysisRequest, GradeAnalysis, SchoolSuggestions, SuggestionRequest,
};

use crate::config::BackendConfig;
use crate::error::AdvisorError;

const MAX_BACKOFF: Duration = Duration::from_secs(30);

/// Advisor calling `POST {base}/school-suggestions` and
/// `POST {analysis}/api/analyze-grades`.
pub struct BackendAdvisor {
    base_url: String,
    analysis_url: String,
    auth_key: Option<String>,
    timeout_secs: u64,
    max_retries: u32,
    retry_delay: Duration,
    client: reqwest::Client,
}

#[derive(Deserialize)]
struct BackendError {
    #[serde(alias = "error")]
    message: String,
}

impl BackendAdvisor {
    pub fn new(base_url: &str, auth_key: Option<String>, timeout_secs: u64) -> Result<Self, AdvisorError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| AdvisorError::Network(format!("failed to build HTTP client: {e}")))?;

        let base_url = base_url.trim_end_matches('/').to_string();
        Ok(Self {
            analysis_url: base_url.clone(),
            base_url,
            auth_key,
            timeout_secs,
            max_retries: 0,
            retry_delay: Duration::from_millis(500),
            client,
        })
    }

    pub fn from_config(config: &BackendConfig) -> Result<Self, AdvisorError> {
        let base_url = config
            .base_url
            .as_deref()
            .ok_or_else(|| AdvisorError::NotConfigured("backend.base_url is not set".into()))?;
        let mut advisor = Self::new(base_url, config.auth_key.clone(), config.timeout_secs)?
            .with_retries(config.max_retries, Duration::from_millis(config.retry_delay_ms));
        if let Some(url) = &config.analysis_url {
            advisor.analysis_url = url.trim_end_matches('/').to_string();
        }
        Ok(advisor)
    }

    /// Retry transient failures up to `max_retries` times, doubling `delay`.
    pub fn with_retries(mut self, max_retries: u32, delay: Duration) -> Self {
        self.max_retries = max_retries;
        self.retry_delay = delay;
        self
    }

    pub fn with_analysis_url(mut self, url: &str) -> Self {
        self.analysis_url = url.trim_end_matches('/').to_string();
        self
    }

    async fn post_once<B, R>(&self, url: &str, body: &B, bearer: bool) -> Result<R, AdvisorError>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let mut request = self.client.post(url).json(body);
        if bearer {
            let key = self
                .auth_key
                .as_deref()
                .ok_or_else(|| AdvisorError::NotConfigured("backend.auth_key is not set".into()))?;
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                AdvisorError::Timeout(self.timeout_secs)
            } else {
                AdvisorError::Network(e.to_string())
            }
        })?;

        let status = response.status().as_u16();
        if status == 429 {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(5)
                * 1000;
            return Err(AdvisorError::RateLimited {
                retry_after_ms: retry_after,
            });
        }
        if status == 401 {
            let body = response.text().await.unwrap_or_default();
            return Err(AdvisorError::Unauthorized(body));
        }
        if status >= 400 {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<BackendError>(&body)
                .map(|e| e.message)
                .unwrap_or(body);
            return Err(AdvisorError::Api { status, message });
        }

        response
            .json::<R>()
            .await
            .map_err(|e| AdvisorError::InvalidResponse(e.to_string()))
    }

    async fn post<B, R>(&self, url: &str, body: &B, bearer: bool) -> Result<R, AdvisorError>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let mut delay = self.retry_delay;
        let mut attempt = 0;
        loop {
            match self.post_once(url, body, bearer).await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_permanent() || attempt >= self.max_retries => return Err(e),
                Err(e) => {
                    let wait = match &e {
                        AdvisorError::RateLimited { retry_after_ms } => {
                            Duration::from_millis(*retry_after_ms).min(MAX_BACKOFF)
                        }
                        _ => delay,
                    };
                    attempt += 1;
                    warn!(attempt, error = %e, "advisor request failed, retrying in {wait:?}");
                    tokio::time::sleep(wait).await;
                    delay = (delay * 2).min(MAX_BACKOFF);
                }
            }
        }
    }
}

#[async_trait]
impl Advisor for BackendAdvisor {
    fn name(&self) -> &str {
        "backend"
    }

    #[instrument(skip(self, request), fields(stream = %request.stream))]
    async fn suggest_schools(
        &self,
        request: &SuggestionRequest,
    ) -> anyhow::Result<SchoolSuggestions> {
        let url = format!("{}/school-suggestions", self.base_url);
        Ok(self.post(&url, request, true).await?)
    }

    #[instrument(skip(self, request), fields(stream = %request.stream))]
    async fn analyze_grades(&self, request: &AnalysisRequest) -> anyhow::Result<GradeAnalysis> {
        let url = format!("{}/api/analyze-grades", self.analysis_url);
        Ok(self.post(&url, request, false).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tahsil_core::model::{GradeMap, Lang, Level, SubjectData};
    use tahsil_core::traits::Chance;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn suggestion_request() -> SuggestionRequest {
        SuggestionRequest {
            avg: 15.25,
            stream: "Sciences physiques (PC)".into(),
            exam_year: "2025".into(),
            lang: Lang::Fr,
        }
    }

    fn advisor(server: &MockServer) -> BackendAdvisor {
        BackendAdvisor::new(&server.uri(), Some("test-key".into()), 5)
            .unwrap()
            .with_retries(2, Duration::from_millis(1))
    }

    #[tokio::test]
    async fn successful_suggestions() {
        let server = MockServer::start().await;

        let response_body = serde_json::json!({
            "summary": "Bon profil scientifique",
            "suggestedSchools": [
                {"name": "ENSA", "description": "Ingénierie", "chance": "High"},
                {"name": "ENCG", "description": "Commerce", "chance": "Medium"}
            ]
        });

        Mock::given(method("POST"))
            .and(path("/school-suggestions"))
            .and(header("authorization", "Bearer test-key"))
            .and(body_partial_json(serde_json::json!({"avg": 15.25, "examYear": "2025", "lang": "fr"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(&response_body))
            .expect(1)
            .mount(&server)
            .await;

        let suggestions = advisor(&server)
            .suggest_schools(&suggestion_request())
            .await
            .unwrap();
        assert_eq!(suggestions.suggested_schools.len(), 2);
        assert_eq!(suggestions.suggested_schools[0].chance, Chance::High);
    }

    #[tokio::test]
    async fn unauthorized_is_not_retried() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/school-suggestions"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid token"))
            .expect(1)
            .mount(&server)
            .await;

        let err = advisor(&server)
            .suggest_schools(&suggestion_request())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("unauthorized"));
        assert!(matches!(
            err.downcast_ref::<AdvisorError>(),
            Some(AdvisorError::Unauthorized(_))
        ));
    }

    #[tokio::test]
    async fn transient_failure_is_retried() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/school-suggestions"))
            .respond_with(ResponseTemplate::new(503).set_body_string("busy"))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/school-suggestions"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"summary": "ok", "suggestedSchools": []})),
            )
            .mount(&server)
            .await;

        let suggestions = advisor(&server)
            .suggest_schools(&suggestion_request())
            .await
            .unwrap();
        assert_eq!(suggestions.summary, "ok");
    }

    #[tokio::test]
    async fn retries_are_bounded() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/school-suggestions"))
            .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({"message": "boom"})))
            .expect(3)
            .mount(&server)
            .await;

        let err = advisor(&server)
            .suggest_schools(&suggestion_request())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("HTTP 500"));
        assert!(err.to_string().contains("boom"));
    }

    #[tokio::test]
    async fn rate_limiting() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/school-suggestions"))
            .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "5"))
            .mount(&server)
            .await;

        let advisor = BackendAdvisor::new(&server.uri(), Some("test-key".into()), 5).unwrap();
        let err = advisor.suggest_schools(&suggestion_request()).await.unwrap_err();
        assert!(err.to_string().contains("rate limited"));
    }

    #[tokio::test]
    async fn missing_token_is_reported() {
        let server = MockServer::start().await;
        let advisor = BackendAdvisor::new(&server.uri(), None, 5).unwrap();
        let err = advisor.suggest_schools(&suggestion_request()).await.unwrap_err();
        assert!(err.to_string().contains("auth_key"));
    }

    #[tokio::test]
    async fn analysis_posts_grades_without_token() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/analyze-grades"))
            .and(body_partial_json(serde_json::json!({"stream": "pc", "lang": "ar"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "summary": "Résultats solides",
                "strengths": ["Maths"],
                "weaknesses": ["Philosophie"],
                "plan": ["Semaine 1: bases"],
                "prediction": "Mention Bien"
            })))
            .mount(&server)
            .await;

        let advisor = BackendAdvisor::new("http://unused.invalid", None, 5)
            .unwrap()
            .with_analysis_url(&server.uri());
        let request = AnalysisRequest {
            grades: GradeMap::new().with("math", SubjectData::from_marks(&[Some(16.0)], Some(18.0))),
            stream: "pc".into(),
            level: Level::SecondBac,
            lang: Lang::Ar,
        };
        let analysis = advisor.analyze_grades(&request).await.unwrap();
        assert_eq!(analysis.prediction, "Mention Bien");
        assert_eq!(analysis.strengths, vec!["Maths".to_string()]);
    }

    #[tokio::test]
    async fn malformed_body_is_invalid_response() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/analyze-grades"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .expect(1)
            .mount(&server)
            .await;

        let advisor = advisor(&server);
        let request = AnalysisRequest {
            grades: GradeMap::new(),
            stream: "svt".into(),
            level: Level::FirstBac,
            lang: Lang::Fr,
        };
        let err = advisor.analyze_grades(&request).await.unwrap_err();
        assert!(err.to_string().contains("invalid response"));
    }

    #[test]
    fn from_config_requires_base_url() {
        let err = BackendAdvisor::from_config(&BackendConfig::default()).err().unwrap();
        assert!(matches!(err, AdvisorError::NotConfigured(_)));
    }
}
