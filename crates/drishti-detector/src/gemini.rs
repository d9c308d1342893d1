//! Gemini-backed implementation of the detection and narrative capabilities.

use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use drishti_models::IncidentSummary;

use crate::capability::{AnomalyDetector, NarrativeGenerator};
use crate::error::{DetectorError, DetectorResult};
use crate::types::DetectorResponse;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Per-frame analysis prompt. The schema here is what
/// [`DetectorResponse::parse`] expects back.
const FRAME_PROMPT: &str = r#"Analyze this image for any signs of distress, crowd crush, emergency situations, or safety concerns in a crowded public place.

Look for:
1. People in distress or calling for help
2. Overcrowding or dangerous crowd density
3. People falling or being pushed
4. Panic or chaotic behavior
5. Emergency situations (fire, medical emergency, etc.)
6. Suspicious or dangerous activities
7. Blocked emergency exits
8. Any other safety concerns

Respond in JSON format with:
{
    "anomaly_detected": true/false,
    "severity": "low/medium/high/critical",
    "description": "detailed description of what you see",
    "safety_concerns": ["list of specific concerns"],
    "recommended_actions": ["list of recommended immediate actions"],
    "coordinates": {"x": approximate_x, "y": approximate_y}
}

If no safety concerns are found, set anomaly_detected to false and provide a brief description of the normal scene."#;

/// Configuration for the Gemini client.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// API key for the Generative Language API
    pub api_key: String,
    /// Base URL (overridable for tests)
    pub base_url: String,
    /// Models to try, in order
    pub models: Vec<String>,
    /// Request timeout
    pub timeout: Duration,
    /// Max retries per model for transient failures
    pub max_retries: u32,
}

impl GeminiConfig {
    /// Create config from environment variables.
    pub fn from_env() -> DetectorResult<Self> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .map_err(|_| DetectorError::ApiKeyMissing("GEMINI_API_KEY not set".to_string()))?;

        Ok(Self {
            api_key,
            base_url: std::env::var("GEMINI_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            models: vec![
                "gemini-2.0-flash".to_string(),
                "gemini-2.5-flash".to_string(),
                "gemini-2.5-flash-lite".to_string(),
            ],
            timeout: Duration::from_secs(
                std::env::var("GEMINI_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(60),
            ),
            max_retries: std::env::var("GEMINI_MAX_RETRIES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(2),
        })
    }
}

/// Gemini API request.
#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
}

#[derive(Debug, Serialize)]
struct InlineData {
    #[serde(rename = "mimeType")]
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    #[serde(rename = "responseMimeType")]
    response_mime_type: String,
}

/// Gemini API response.
#[derive(Debug, Deserialize)]
struct GeminiResponse {
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: ResponseContent,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: String,
}

/// Client for the Gemini generateContent API.
pub struct GeminiClient {
    http: Client,
    config: GeminiConfig,
}

impl GeminiClient {
    /// Create a new Gemini client.
    pub fn new(config: GeminiConfig) -> DetectorResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(DetectorError::Network)?;
        Ok(Self { http, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> DetectorResult<Self> {
        Self::new(GeminiConfig::from_env()?)
    }

    /// Call generateContent on each configured model until one succeeds.
    async fn generate(&self, parts: Vec<Part>, json_response: bool) -> DetectorResult<String> {
        let request = GeminiRequest {
            contents: vec![Content { parts }],
            generation_config: json_response.then(|| GenerationConfig {
                response_mime_type: "application/json".to_string(),
            }),
        };

        let mut last_error = None;

        for model in &self.config.models {
            debug!(model, "Calling Gemini generateContent");
            match self.call_model_with_retry(model, &request).await {
                Ok(text) => {
                    info!(model, "Gemini call succeeded");
                    return Ok(text);
                }
                Err(e) => {
                    warn!(model, error = %e, "Gemini model failed, trying next");
                    last_error = Some(e);
                }
            }
        }

        Err(last_error
            .unwrap_or_else(|| DetectorError::RequestFailed("no models configured".to_string())))
    }

    /// Call one model, retrying transient failures with exponential backoff.
    async fn call_model_with_retry(
        &self,
        model: &str,
        request: &GeminiRequest,
    ) -> DetectorResult<String> {
        let mut last_error = None;

        for attempt in 0..=self.config.max_retries {
            match self.call_model(model, request).await {
                Ok(text) => return Ok(text),
                Err(e) if e.is_retryable() && attempt < self.config.max_retries => {
                    let delay = Duration::from_millis(500 * 2u64.pow(attempt));
                    warn!(
                        model,
                        attempt = attempt + 1,
                        ?delay,
                        error = %e,
                        "Gemini request failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error
            .unwrap_or_else(|| DetectorError::RequestFailed("retries exhausted".to_string())))
    }

    async fn call_model(&self, model: &str, request: &GeminiRequest) -> DetectorResult<String> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.config.base_url, model, self.config.api_key
        );

        let response = self.http.post(&url).json(request).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(DetectorError::HttpStatus {
                status,
                message: body,
            });
        }

        let gemini_response: GeminiResponse = response.json().await?;

        gemini_response
            .candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .map(|p| p.text.clone())
            .ok_or_else(|| DetectorError::InvalidResponse("no content in response".to_string()))
    }
}

#[async_trait]
impl AnomalyDetector for GeminiClient {
    async fn detect(&self, image: &[u8], mime_type: &str) -> DetectorResult<DetectorResponse> {
        let parts = vec![
            Part::Text {
                text: FRAME_PROMPT.to_string(),
            },
            Part::InlineData {
                inline_data: InlineData {
                    mime_type: mime_type.to_string(),
                    data: base64::engine::general_purpose::STANDARD.encode(image),
                },
            },
        ];

        let text = self.generate(parts, true).await?;
        Ok(DetectorResponse::parse(&text))
    }
}

#[async_trait]
impl NarrativeGenerator for GeminiClient {
    async fn summarize(&self, summary: &IncidentSummary) -> DetectorResult<String> {
        let breakdown: Vec<String> = summary
            .severity_breakdown
            .iter()
            .map(|(severity, count)| format!("{}: {}", severity, count))
            .collect();

        let prompt = format!(
            "Based on the analysis of {total} video frames from a crowded public place surveillance system:\n\n\
             - Total frames analyzed: {total}\n\
             - Anomalies detected: {anomalies}\n\
             - Severity breakdown: {{{breakdown}}}\n\
             - Safety concerns identified: {concerns:?}\n\
             - Recommended actions: {actions:?}\n\n\
             Generate a comprehensive summary report including:\n\
             1. Overall safety assessment\n\
             2. Key findings and concerns\n\
             3. Risk level evaluation\n\
             4. Immediate action recommendations\n\
             5. Preventive measures for future\n\n\
             Format as a professional incident report.",
            total = summary.total_frames,
            anomalies = summary.anomalies_detected,
            breakdown = breakdown.join(", "),
            concerns = summary.unique_concerns,
            actions = summary.recommended_actions,
        );

        self.generate(vec![Part::Text { text: prompt }], false).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path_regex};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(base_url: String) -> GeminiConfig {
        GeminiConfig {
            api_key: "test-key".to_string(),
            base_url,
            models: vec!["model-a".to_string(), "model-b".to_string()],
            timeout: Duration::from_secs(5),
            max_retries: 0,
        }
    }

    fn candidate_body(text: &str) -> serde_json::Value {
        serde_json::json!({
            "candidates": [{"content": {"parts": [{"text": text}]}}]
        })
    }

    #[tokio::test]
    async fn test_detect_parses_structured_response() {
        let server = MockServer::start().await;
        let analysis = r#"{"anomaly_detected": true, "severity": "critical", "description": "fire"}"#;
        Mock::given(method("POST"))
            .and(path_regex(r"^/models/model-a:generateContent$"))
            .respond_with(ResponseTemplate::new(200).set_body_json(candidate_body(analysis)))
            .mount(&server)
            .await;

        let client = GeminiClient::new(test_config(server.uri())).unwrap();
        let response = client.detect(b"fakejpeg", "image/jpeg").await.unwrap();
        let DetectorResponse::Structured(parsed) = response else {
            panic!("expected structured response");
        };
        assert!(parsed.anomaly_detected);
        assert_eq!(parsed.severity.as_deref(), Some("critical"));
    }

    #[tokio::test]
    async fn test_detect_falls_back_to_next_model() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path_regex(r"^/models/model-a:generateContent$"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path_regex(r"^/models/model-b:generateContent$"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(candidate_body("just some prose")),
            )
            .mount(&server)
            .await;

        let client = GeminiClient::new(test_config(server.uri())).unwrap();
        let response = client.detect(b"fakejpeg", "image/jpeg").await.unwrap();
        assert!(matches!(response, DetectorResponse::RawText(_)));
    }

    #[tokio::test]
    async fn test_all_models_failing_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = GeminiClient::new(test_config(server.uri())).unwrap();
        let err = client.detect(b"fakejpeg", "image/jpeg").await.unwrap_err();
        assert!(matches!(err, DetectorError::HttpStatus { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_client_errors_are_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path_regex(r"^/models/model-a:generateContent$"))
            .respond_with(ResponseTemplate::new(403))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path_regex(r"^/models/model-b:generateContent$"))
            .respond_with(ResponseTemplate::new(403))
            .expect(1)
            .mount(&server)
            .await;

        // Retry budget available, but a 4xx must not consume it
        let mut config = test_config(server.uri());
        config.max_retries = 2;
        let client = GeminiClient::new(config).unwrap();
        let err = client.detect(b"fakejpeg", "image/jpeg").await.unwrap_err();
        assert!(matches!(err, DetectorError::HttpStatus { status: 403, .. }));
    }
}
