//! Practice backend API source.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::instrument;

use bandcheck_core::error::SourceError;
use bandcheck_core::model::{TestDefinition, TestSummary};
use bandcheck_core::traits::DefinitionSource;

use crate::config::ApiConfig;

/// Fetches test definitions over HTTP.
pub struct ApiSource {
    base_url: String,
    token: Option<String>,
    timeout_secs: u64,
    client: reqwest::Client,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    #[serde(alias = "error")]
    message: String,
}

impl ApiSource {
    pub fn new(config: &ApiConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| anyhow::anyhow!("failed to build HTTP client: {e}"))?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
            timeout_secs: config.timeout_secs,
            client,
        })
    }

    async fn get(&self, path: &str, missing: impl FnOnce() -> SourceError) -> anyhow::Result<reqwest::Response> {
        let mut request = self.client.get(format!("{}{}", self.base_url, path));
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                SourceError::Timeout(self.timeout_secs)
            } else {
                SourceError::NetworkError(e.to_string())
            }
        })?;

        let status = response.status().as_u16();
        if status == 401 || status == 403 {
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::AuthenticationFailed(body).into());
        }
        if status == 404 {
            return Err(missing().into());
        }
        if status >= 400 {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .map(|e| e.message)
                .unwrap_or(body);
            return Err(SourceError::ApiError { status, message }.into());
        }

        Ok(response)
    }
}

#[async_trait]
impl DefinitionSource for ApiSource {
    fn name(&self) -> &str {
        "api"
    }

    #[instrument(skip(self), fields(base_url = %self.base_url))]
    async fn fetch(&self, test_id: &str) -> anyhow::Result<TestDefinition> {
        let response = self
            .get(&format!("/tests/{test_id}"), || {
                SourceError::TestNotFound(test_id.to_string())
            })
            .await?;

        let mut definition: TestDefinition =
            response
                .json()
                .await
                .map_err(|e| SourceError::InvalidDefinition {
                    source_name: format!("{}/tests/{test_id}", self.base_url),
                    message: e.to_string(),
                })?;

        if definition.id.is_empty() {
            definition.id = test_id.to_string();
        }
        tracing::debug!(questions = definition.question_count(), "fetched test");
        Ok(definition)
    }

    #[instrument(skip(self), fields(base_url = %self.base_url))]
    async fn list(&self) -> anyhow::Result<Vec<TestSummary>> {
        let response = self
            .get("/tests", || SourceError::ApiError {
                status: 404,
                message: "test listing not available".into(),
            })
            .await?;

        let tests = response
            .json::<Vec<TestSummary>>()
            .await
            .map_err(|e| SourceError::ApiError {
                status: 0,
                message: format!("failed to parse response: {e}"),
            })?;
        Ok(tests)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn source(server: &MockServer, token: Option<&str>) -> ApiSource {
        ApiSource::new(&ApiConfig {
            base_url: format!("{}/", server.uri()),
            token: token.map(str::to_string),
            timeout_secs: 5,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn successful_fetch() {
        let server = MockServer::start().await;

        let body = serde_json::json!({
            "title": "Cambridge 18 Listening 2",
            "testType": "listening",
            "sections": [
                {"sectionId": "part-1", "questions": [{"id": 1, "questionNumber": 1, "answers": ["train"]}]}
            ]
        });

        Mock::given(method("GET"))
            .and(path("/tests/c18-l2"))
            .and(header("authorization", "Bearer test-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&body))
            .mount(&server)
            .await;

        let def = source(&server, Some("test-token"))
            .fetch("c18-l2")
            .await
            .unwrap();
        assert_eq!(def.id, "c18-l2");
        assert_eq!(def.test_type, bandcheck_core::model::TestType::Listening);
        assert_eq!(def.question_count(), 1);
    }

    #[tokio::test]
    async fn not_found() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/tests/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = source(&server, None).fetch("missing").await.unwrap_err();
        assert!(err.to_string().contains("test not found: missing"));
        assert!(err.downcast_ref::<SourceError>().unwrap().is_permanent());
    }

    #[tokio::test]
    async fn authentication_failure() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/tests/c18-r1"))
            .respond_with(ResponseTemplate::new(401).set_body_string("unauthorized"))
            .mount(&server)
            .await;

        let err = source(&server, Some("bad")).fetch("c18-r1").await.unwrap_err();
        assert!(err.to_string().contains("authentication"));
    }

    #[tokio::test]
    async fn server_error_message_is_extracted() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/tests/c18-r1"))
            .respond_with(
                ResponseTemplate::new(503)
                    .set_body_json(serde_json::json!({"error": "maintenance"})),
            )
            .mount(&server)
            .await;

        let err = source(&server, None).fetch("c18-r1").await.unwrap_err();
        assert_eq!(err.to_string(), "API error (HTTP 503): maintenance");
    }

    #[tokio::test]
    async fn malformed_definition() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/tests/c18-r1"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = source(&server, None).fetch("c18-r1").await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SourceError>(),
            Some(SourceError::InvalidDefinition { .. })
        ));
    }

    #[tokio::test]
    async fn list_tests() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/tests"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"id": "c18-r1", "title": "Reading 1", "testType": "reading", "questionCount": 40},
                {"id": "c18-l1", "title": "Listening 1", "testType": "listening", "questionCount": 40}
            ])))
            .mount(&server)
            .await;

        let tests = source(&server, None).list().await.unwrap();
        assert_eq!(tests.len(), 2);
        assert_eq!(tests[1].id, "c18-l1");
    }
}
