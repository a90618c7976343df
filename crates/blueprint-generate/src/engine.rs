use blueprint_core::{ArtifactBundle, ArtifactGenerator, GenerateError, Settings, UserInput};

use crate::{parse, prompt};

/// Client for the Gemini `generateContent` endpoint.
///
/// The credential is handed in through `Settings`; nothing is read from the
/// environment here.
#[derive(Debug, Clone)]
pub struct GeminiGenerator {
    http: reqwest::Client,
    api_key: String,
    model: String,
    endpoint: String,
}

impl GeminiGenerator {
    pub fn new(settings: &Settings) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: settings.api_key.trim().to_string(),
            model: settings.model.clone(),
            endpoint: settings.endpoint.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, self.model)
    }

    /// Issue exactly one request. No retries and no local timeout.
    pub async fn generate_bundle(&self, input: &UserInput) -> Result<ArtifactBundle, GenerateError> {
        if self.api_key.is_empty() {
            return Err(GenerateError::Configuration(
                "set GEMINI_API_KEY or run `blueprint settings set --api-key`".to_string(),
            ));
        }

        let body = prompt::request_body(input)?;
        tracing::debug!(model = %self.model, mode = ?input.mode(), "sending generation request");

        let response = self
            .http
            .post(self.url())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| GenerateError::Transport(format!("generation request failed: {e}")))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| GenerateError::Transport(format!("reading generation response: {e}")))?;

        if !status.is_success() {
            let detail = parse::error_message(&text).unwrap_or_else(|| text.trim().to_string());
            return Err(GenerateError::Transport(format!(
                "generation service returned {status}: {detail}"
            )));
        }

        parse::parse_response(&text).inspect_err(|e| {
            if let GenerateError::InvalidResponse { reason } = e {
                tracing::warn!(%reason, raw = %text, "rejected generation response");
            }
        })
    }
}

#[async_trait::async_trait]
impl ArtifactGenerator for GeminiGenerator {
    async fn generate(&self, input: &UserInput) -> Result<ArtifactBundle, GenerateError> {
        self.generate_bundle(input).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blueprint_core::FileInput;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const MODEL_PATH: &str = "/models/gemini-2.5-flash:generateContent";

    fn settings(key: &str) -> Settings {
        Settings {
            api_key: key.to_string(),
            // Unroutable, so a test that got past validation would fail loudly.
            endpoint: "http://127.0.0.1:9/v1beta/".to_string(),
            ..Settings::default()
        }
    }

    #[test]
    fn builds_model_url() {
        let generator = GeminiGenerator::new(&settings("k"));
        assert_eq!(
            generator.url(),
            "http://127.0.0.1:9/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[tokio::test]
    async fn missing_key_fails_before_sending() {
        let generator = GeminiGenerator::new(&settings("   "));
        let input = UserInput::text("a shop with orders").unwrap();
        assert!(matches!(
            generator.generate(&input).await,
            Err(GenerateError::Configuration(_))
        ));
    }

    #[tokio::test]
    async fn unsupported_attachment_fails_before_sending() {
        let generator = GeminiGenerator::new(&settings("k"));
        let input = UserInput::File(FileInput::new("x.bin", "application/octet-stream", vec![]));
        assert!(matches!(
            generator.generate(&input).await,
            Err(GenerateError::UnsupportedInput(_))
        ));
    }

    fn served_by(server: &MockServer) -> GeminiGenerator {
        GeminiGenerator::new(&Settings {
            api_key: "test-key".to_string(),
            endpoint: server.uri(),
            ..Settings::default()
        })
    }

    fn answer_envelope() -> serde_json::Value {
        let answer = json!({
            "databaseSchema": "CREATE TABLE posts (id INT);",
            "restApi": "openapi: 3.0.3\\npaths: {}",
            "schemaReasoning": "One table for posts.",
            "erdDiagram": "erDiagram\\n  POSTS { int id }",
            "apiEndpoints": [
                { "path": "/posts", "method": "GET", "summary": "list posts" }
            ]
        });
        json!({
            "candidates": [{
                "content": { "parts": [{ "text": answer.to_string() }], "role": "model" },
                "finishReason": "STOP"
            }]
        })
    }

    #[tokio::test]
    async fn successful_response_yields_bundle() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(MODEL_PATH))
            .and(header("x-goog-api-key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(answer_envelope()))
            .expect(1)
            .mount(&server)
            .await;

        let input = UserInput::text("a blog with posts").unwrap();
        let bundle = served_by(&server).generate(&input).await.unwrap();
        assert_eq!(bundle.database_schema, "CREATE TABLE posts (id INT);");
        assert_eq!(bundle.rest_api, "openapi: 3.0.3\npaths: {}");
        assert_eq!(bundle.api_endpoints.len(), 1);
        assert_eq!(bundle.api_endpoints[0].path, "/posts");
    }

    #[tokio::test]
    async fn key_travels_in_header_not_query() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(MODEL_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(answer_envelope()))
            .mount(&server)
            .await;

        let input = UserInput::text("a blog with posts").unwrap();
        served_by(&server).generate(&input).await.unwrap();

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        let request = &requests[0];
        assert_eq!(
            request.headers.get("x-goog-api-key").map(|v| v.as_bytes()),
            Some("test-key".as_bytes())
        );
        assert_eq!(request.url.query(), None);

        let body: serde_json::Value = serde_json::from_slice(&request.body).unwrap();
        assert_eq!(
            body["generationConfig"]["responseMimeType"],
            "application/json"
        );
    }

    #[tokio::test]
    async fn service_error_message_becomes_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(MODEL_PATH))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": {
                    "code": 400,
                    "message": "API key not valid. Please pass a valid API key.",
                    "status": "INVALID_ARGUMENT"
                }
            })))
            .mount(&server)
            .await;

        let input = UserInput::url("https://example.com/orders.csv").unwrap();
        match served_by(&server).generate(&input).await {
            Err(GenerateError::Transport(message)) => {
                assert!(message.contains("400"), "{message}");
                assert!(
                    message.contains("API key not valid. Please pass a valid API key."),
                    "{message}"
                );
            }
            other => panic!("expected Transport, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn unparsable_answer_is_invalid_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(MODEL_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{ "content": { "parts": [{ "text": "Sure, here it is!" }] } }]
            })))
            .mount(&server)
            .await;

        let input = UserInput::text("a blog with posts").unwrap();
        assert!(matches!(
            served_by(&server).generate(&input).await,
            Err(GenerateError::InvalidResponse { .. })
        ));
    }
}
