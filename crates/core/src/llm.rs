//! Text-generation client: the `LlmClient` trait and the Gemini implementation.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Environment variable holding the Gemini API key.
pub const API_KEY_ENV: &str = "GEMINI_API";

/// Default Gemini model.
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Default Generative Language API base URL.
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";

/// Default whole-request timeout for the HTTP agent.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Error type for text-generation calls.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LlmError {
    /// No API key was configured, so no request was made.
    #[error("GEMINI_API environment variable is not set")]
    MissingCredential,
    /// Connection, TLS, or timeout failure.
    #[error("network error: {0}")]
    Network(String),
    /// The API answered with a non-success status.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },
    /// The response body was not the expected JSON shape.
    #[error("malformed response: {0}")]
    Parse(String),
    /// The response parsed but carried no text.
    #[error("response contained no text ({0})")]
    EmptyResponse(String),
}

/// Trait for sending one prompt to a model and getting its text back.
///
/// Implementations own their credentials and model selection; callers only
/// supply the prompt.
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError>;
}

// ── Gemini wire types ────────────────────────────────────────────────────────

#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<ResponseContent>,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
    status: Option<String>,
}

// ── GeminiClient ─────────────────────────────────────────────────────────────

/// Client for the Gemini `generateContent` endpoint.
///
/// Uses `ureq` for HTTP. The agent and credential are set once at
/// construction and reused for every call.
pub struct GeminiClient {
    api_key: Option<String>,
    model: String,
    base_url: String,
    agent: ureq::Agent,
}

impl GeminiClient {
    /// Create a client with an explicit (possibly absent) API key.
    ///
    /// A missing key is not an error here; it surfaces as
    /// [`LlmError::MissingCredential`] on the first call.
    pub fn new(api_key: Option<String>, model: impl Into<String>) -> Self {
        Self::with_timeout(api_key, model, DEFAULT_TIMEOUT)
    }

    /// Create a client with a custom whole-request timeout.
    pub fn with_timeout(
        api_key: Option<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(timeout))
            .build()
            .into();
        Self {
            api_key: api_key.filter(|k| !k.is_empty()),
            model: model.into(),
            base_url: DEFAULT_API_BASE.to_string(),
            agent,
        }
    }

    /// Point the client at a different API host (proxies, tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }
}

#[async_trait]
impl LlmClient for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        let api_key = self.api_key.clone().ok_or(LlmError::MissingCredential)?;
        let agent = self.agent.clone();
        let url = self.endpoint();
        let body = serde_json::to_value(GenerateContentRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
        })
        .map_err(|e| LlmError::Parse(e.to_string()))?;

        tracing::debug!(model = %self.model, prompt_len = prompt.len(), "calling Gemini");

        // ureq is synchronous, so run it off the async workers
        tokio::task::spawn_blocking(move || {
            let mut response = agent
                .post(&url)
                .header("x-goog-api-key", &api_key)
                .send_json(body)
                .map_err(|e| LlmError::Network(e.to_string()))?;

            let status = response.status().as_u16();
            let raw = response
                .body_mut()
                .read_to_string()
                .map_err(|e| LlmError::Network(e.to_string()))?;

            if !(200..300).contains(&status) {
                return Err(api_error(status, &raw));
            }
            parse_generate_response(&raw)
        })
        .await
        .map_err(|e| LlmError::Network(format!("task join error: {}", e)))?
    }
}

/// Build an `Api` error from a non-2xx body, preferring the provider's message.
fn api_error(status: u16, raw: &str) -> LlmError {
    let message = match serde_json::from_str::<ErrorEnvelope>(raw) {
        Ok(env) => match env.error.status {
            Some(s) => format!("{} {}", s, env.error.message),
            None => env.error.message,
        },
        Err(_) if raw.trim().is_empty() => "no response body".to_string(),
        Err(_) => raw.trim().to_string(),
    };
    LlmError::Api { status, message }
}

/// Extract the text of the first candidate, joining all of its parts.
fn parse_generate_response(raw: &str) -> Result<String, LlmError> {
    let resp: GenerateContentResponse =
        serde_json::from_str(raw).map_err(|e| LlmError::Parse(e.to_string()))?;

    let Some(candidate) = resp.candidates.into_iter().next() else {
        let reason = match resp.prompt_feedback.and_then(|f| f.block_reason) {
            Some(r) => format!("blocked: {}", r),
            None => "no candidates".to_string(),
        };
        return Err(LlmError::EmptyResponse(reason));
    };

    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.is_empty() {
        let reason = candidate
            .finish_reason
            .map(|r| format!("finish reason: {}", r))
            .unwrap_or_else(|| "no text parts".to_string());
        return Err(LlmError::EmptyResponse(reason));
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    const ENDPOINT: &str = "/v1beta/models/gemini-2.0-flash:generateContent";

    fn client_for(server: &MockServer, key: Option<&str>) -> GeminiClient {
        GeminiClient::new(key.map(str::to_string), DEFAULT_MODEL).with_base_url(server.base_url())
    }

    #[test]
    fn parses_single_part() {
        let raw = r#"{"candidates":[{"content":{"parts":[{"text":"hello"}],"role":"model"},"finishReason":"STOP"}]}"#;
        assert_eq!(parse_generate_response(raw).unwrap(), "hello");
    }

    #[test]
    fn joins_multiple_parts() {
        let raw = r#"{"candidates":[{"content":{"parts":[{"text":"📝 PROMPT:\n"},{"text":"be humble"}]}}]}"#;
        assert_eq!(parse_generate_response(raw).unwrap(), "📝 PROMPT:\nbe humble");
    }

    #[test]
    fn blocked_prompt_is_empty_response_with_reason() {
        let raw = r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#;
        assert_eq!(
            parse_generate_response(raw),
            Err(LlmError::EmptyResponse("blocked: SAFETY".to_string()))
        );
    }

    #[test]
    fn candidate_without_text_reports_finish_reason() {
        let raw = r#"{"candidates":[{"finishReason":"MAX_TOKENS"}]}"#;
        let err = parse_generate_response(raw).unwrap_err();
        assert_eq!(
            err.to_string(),
            "response contained no text (finish reason: MAX_TOKENS)"
        );
    }

    #[test]
    fn garbage_is_parse_error() {
        assert!(matches!(
            parse_generate_response("<html>bad gateway</html>"),
            Err(LlmError::Parse(_))
        ));
    }

    #[test]
    fn api_error_prefers_provider_message() {
        let raw = r#"{"error":{"code":400,"message":"API key not valid. Please pass a valid API key.","status":"INVALID_ARGUMENT"}}"#;
        assert_eq!(
            api_error(400, raw),
            LlmError::Api {
                status: 400,
                message: "INVALID_ARGUMENT API key not valid. Please pass a valid API key."
                    .to_string()
            }
        );
        assert_eq!(
            api_error(502, ""),
            LlmError::Api {
                status: 502,
                message: "no response body".to_string()
            }
        );
    }

    #[test]
    fn empty_key_counts_as_missing() {
        assert!(!GeminiClient::new(Some(String::new()), DEFAULT_MODEL).has_credential());
        assert!(GeminiClient::new(Some("k".to_string()), DEFAULT_MODEL).has_credential());
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = GeminiClient::new(None, "gemini-x").with_base_url("http://localhost:9/");
        assert_eq!(
            client.endpoint(),
            "http://localhost:9/v1beta/models/gemini-x:generateContent"
        );
    }

    #[tokio::test]
    async fn sends_key_header_and_prompt() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path(ENDPOINT)
                    .header("x-goog-api-key", "test-key")
                    .json_body(serde_json::json!({
                        "contents": [{"parts": [{"text": "decode this"}]}]
                    }));
                then.status(200).json_body(serde_json::json!({
                    "candidates": [{"content": {"parts": [{"text": "💡 UNHINGED SCORE: 9"}]}}]
                }));
            })
            .await;

        let client = client_for(&server, Some("test-key"));
        let text = client.generate("decode this").await.unwrap();

        mock.assert_async().await;
        assert_eq!(text, "💡 UNHINGED SCORE: 9");
    }

    #[tokio::test]
    async fn quota_error_surfaces_status_and_message() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path(ENDPOINT);
                then.status(429).json_body(serde_json::json!({
                    "error": {"code": 429, "message": "Quota exceeded", "status": "RESOURCE_EXHAUSTED"}
                }));
            })
            .await;

        let err = client_for(&server, Some("k"))
            .generate("x")
            .await
            .unwrap_err();
        assert_eq!(
            err,
            LlmError::Api {
                status: 429,
                message: "RESOURCE_EXHAUSTED Quota exceeded".to_string()
            }
        );
    }

    #[tokio::test]
    async fn missing_key_makes_no_request() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.any_request();
                then.status(200);
            })
            .await;

        let err = client_for(&server, None).generate("x").await.unwrap_err();

        assert_eq!(err, LlmError::MissingCredential);
        assert_eq!(err.to_string(), "GEMINI_API environment variable is not set");
        mock.assert_hits_async(0).await;
    }

    #[tokio::test]
    async fn slow_server_hits_timeout_once() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path(ENDPOINT);
                then.status(200)
                    .delay(Duration::from_secs(3))
                    .json_body(serde_json::json!({
                        "candidates": [{"content": {"parts": [{"text": "too late"}]}}]
                    }));
            })
            .await;

        let client = GeminiClient::with_timeout(
            Some("k".to_string()),
            DEFAULT_MODEL,
            Duration::from_millis(200),
        )
        .with_base_url(server.base_url());
        let err = client.generate("x").await.unwrap_err();

        assert!(matches!(err, LlmError::Network(_)), "got {:?}", err);
        mock.assert_hits_async(1).await;
    }

    #[tokio::test]
    async fn unreachable_host_is_network_error() {
        // Port 9 (discard) is not listening on loopback
        let client = GeminiClient::new(Some("k".to_string()), DEFAULT_MODEL)
            .with_base_url("http://127.0.0.1:9");
        assert!(matches!(
            client.generate("x").await,
            Err(LlmError::Network(_))
        ));
    }
}
