use std::time::Duration;

use async_trait::async_trait;
use base64::{Engine, engine::general_purpose::STANDARD};
use reqwest::Client as HttpClient;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::debug;

use crate::config::ServiceConfig;
use crate::service::{CompletionError, CompletionRequest, CompletionService};

/// Client for the Gemini `generateContent` endpoint.
pub struct GeminiClient {
    api_key: String,
    http_client: HttpClient,
    config: ServiceConfig,
}

impl GeminiClient {
    pub fn new(
        config: ServiceConfig,
        api_key: impl Into<String>,
    ) -> Result<Self, CompletionError> {
        let http_client = HttpClient::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                CompletionError::Communication(format!("HTTP client setup failed: {e}"))
            })?;

        Ok(Self {
            api_key: api_key.into(),
            http_client,
            config,
        })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    fn build_body(&self, request: &CompletionRequest) -> Value {
        let mut parts = Vec::new();

        if let Some(image) = &request.image {
            parts.push(json!({
                "inlineData": {
                    "mimeType": image.mime_type,
                    "data": STANDARD.encode(&image.data),
                }
            }));
        }
        parts.push(json!({ "text": request.message }));

        let mut body = json!({
            "contents": [{ "role": "user", "parts": parts }],
            "generationConfig": { "temperature": self.config.temperature },
        });

        if !self.config.system_instruction.is_empty() {
            body["systemInstruction"] = json!({
                "parts": [{ "text": self.config.system_instruction }]
            });
        }

        body
    }
}

#[async_trait]
impl CompletionService for GeminiClient {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
        debug!(
            model = %self.config.model,
            with_image = request.image.is_some(),
            "sending generateContent request"
        );

        let response = self
            .http_client
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .json(&self.build_body(request))
            .send()
            .await
            .map_err(|e| CompletionError::classify(format!("Network error: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(CompletionError::classify(format!("HTTP {status}: {error_text}")));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| {
                CompletionError::Communication(format!("Failed to parse response: {e}"))
            })?;

        Ok(parsed.text())
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GenerateContentResponse {
    candidates: Vec<Candidate>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Part {
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Text parts of the first candidate, concatenated.
    fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::InlineImage;
    use mockito::Matcher;
    use pretty_assertions::assert_eq;

    const PATH: &str = "/models/gemini-3-pro-preview:generateContent";

    fn client(base_url: String) -> GeminiClient {
        let config = ServiceConfig {
            base_url,
            system_instruction: "be terse".to_string(),
            ..ServiceConfig::default()
        };
        GeminiClient::new(config, "test-key").unwrap()
    }

    #[test]
    fn body_puts_image_before_text() {
        let client = client("http://localhost".to_string());
        let request = CompletionRequest::text("what is this?")
            .with_image(InlineImage::new("image/png", b"abc".to_vec()));

        let body = client.build_body(&request);
        assert_eq!(
            body,
            json!({
                "contents": [{
                    "role": "user",
                    "parts": [
                        { "inlineData": { "mimeType": "image/png", "data": "YWJj" } },
                        { "text": "what is this?" },
                    ]
                }],
                "generationConfig": { "temperature": 0.1 },
                "systemInstruction": { "parts": [{ "text": "be terse" }] },
            })
        );
    }

    #[test]
    fn body_without_image_or_instruction() {
        let config = ServiceConfig {
            system_instruction: String::new(),
            ..ServiceConfig::default()
        };
        let client = GeminiClient::new(config, "k").unwrap();
        let body = client.build_body(&CompletionRequest::text("hi"));

        assert_eq!(body["contents"][0]["parts"], json!([{ "text": "hi" }]));
        assert!(body.get("systemInstruction").is_none());
    }

    #[test]
    fn response_text_joins_first_candidate_parts() {
        let parsed: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [
                { "content": { "parts": [{ "text": "| A |" }, { "text": "\n| 1 |" }] } },
                { "content": { "parts": [{ "text": "ignored" }] } }
            ]
        }))
        .unwrap();
        assert_eq!(parsed.text(), "| A |\n| 1 |");

        let empty: GenerateContentResponse = serde_json::from_value(json!({})).unwrap();
        assert_eq!(empty.text(), "");
    }

    #[tokio::test]
    async fn returns_model_text() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", Matcher::Regex(format!("^{PATH}")))
            .match_query(Matcher::UrlEncoded("key".into(), "test-key".into()))
            .match_body(Matcher::PartialJson(json!({
                "contents": [{ "parts": [{ "text": "hello" }] }]
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"candidates":[{"content":{"parts":[{"text":"**Hi**"}]}}]}"#)
            .create_async()
            .await;

        let text = client(server.url())
            .complete(&CompletionRequest::text("hello"))
            .await
            .unwrap();

        assert_eq!(text, "**Hi**");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn not_found_maps_to_resource_unavailable() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", Matcher::Regex(format!("^{PATH}")))
            .with_status(404)
            .with_body(r#"{"error":{"code":404,"message":"Requested entity was not found.","status":"NOT_FOUND"}}"#)
            .create_async()
            .await;

        let err = client(server.url())
            .complete(&CompletionRequest::text("hello"))
            .await
            .unwrap_err();

        assert!(matches!(err, CompletionError::ResourceUnavailable(_)));
    }

    #[tokio::test]
    async fn server_error_maps_to_communication() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", Matcher::Regex(format!("^{PATH}")))
            .with_status(500)
            .with_body("internal")
            .create_async()
            .await;

        let err = client(server.url())
            .complete(&CompletionRequest::text("hello"))
            .await
            .unwrap_err();

        assert!(matches!(err, CompletionError::Communication(msg) if msg.contains("500")));
    }

    #[tokio::test]
    async fn malformed_body_is_communication_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", Matcher::Regex(format!("^{PATH}")))
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let err = client(server.url())
            .complete(&CompletionRequest::text("hello"))
            .await
            .unwrap_err();

        assert!(matches!(err, CompletionError::Communication(_)));
    }

    #[tokio::test]
    async fn unreachable_server_is_communication_error() {
        let err = client("http://127.0.0.1:9".to_string())
            .complete(&CompletionRequest::text("hello"))
            .await
            .unwrap_err();

        assert!(matches!(err, CompletionError::Communication(_)));
    }
}
