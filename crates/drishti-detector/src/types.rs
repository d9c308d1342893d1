//! Detector response schema and tagged parsing.
//!
//! Generative detectors are only loosely bound to their output contract, so
//! the response is modeled as a tagged variant: either the structured JSON
//! schema we asked for, or whatever free text actually came back. Structure
//! is never guessed from a response that failed to parse.

use serde::{Deserialize, Serialize};

use drishti_models::Severity;

/// Approximate pixel location of a finding, as reported by the detector.
///
/// Floats tolerated: models occasionally return fractional coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub x: f64,
    pub y: f64,
}

/// Structured per-frame analysis matching the prompt's JSON schema.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FrameAnalysis {
    #[serde(default)]
    pub anomaly_detected: bool,
    /// Severity label as emitted by the model; parsed leniently
    #[serde(default)]
    pub severity: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub safety_concerns: Vec<String>,
    #[serde(default)]
    pub recommended_actions: Vec<String>,
    #[serde(default)]
    pub coordinates: Option<Coordinates>,
}

impl FrameAnalysis {
    /// The severity of this finding, defaulting unknown labels to Low.
    pub fn severity(&self) -> Severity {
        self.severity
            .as_deref()
            .map(Severity::parse_lenient)
            .unwrap_or_default()
    }
}

/// What the detection capability actually returned for one frame.
#[derive(Debug, Clone)]
pub enum DetectorResponse {
    /// Response parsed into the expected schema
    Structured(FrameAnalysis),
    /// Response that violated the schema; raw text preserved
    RawText(String),
}

impl DetectorResponse {
    /// Parse raw model output into a tagged response.
    ///
    /// Strips markdown code fences first, then attempts the structured
    /// schema. Anything that does not parse is preserved as raw text.
    pub fn parse(text: &str) -> Self {
        let stripped = strip_code_fences(text);
        match serde_json::from_str::<FrameAnalysis>(stripped) {
            Ok(analysis) => Self::Structured(analysis),
            Err(_) => Self::RawText(text.to_string()),
        }
    }
}

/// Strip a surrounding markdown code fence, if present.
fn strip_code_fences(text: &str) -> &str {
    let text = text.trim();
    let text = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"))
        .unwrap_or(text);
    let text = text.strip_suffix("```").unwrap_or(text);
    text.trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_structured() {
        let text = r#"{
            "anomaly_detected": true,
            "severity": "high",
            "description": "crowd surge near the barrier",
            "safety_concerns": ["crowd crush"],
            "recommended_actions": ["open side gates"],
            "coordinates": {"x": 412.0, "y": 218.5}
        }"#;
        let response = DetectorResponse::parse(text);
        let DetectorResponse::Structured(analysis) = response else {
            panic!("expected structured response");
        };
        assert!(analysis.anomaly_detected);
        assert_eq!(analysis.severity(), Severity::High);
        assert_eq!(analysis.safety_concerns, vec!["crowd crush"]);
        assert_eq!(analysis.coordinates.unwrap().x, 412.0);
    }

    #[test]
    fn test_parse_fenced_json() {
        let text = "```json\n{\"anomaly_detected\": false, \"description\": \"calm\"}\n```";
        assert!(matches!(
            DetectorResponse::parse(text),
            DetectorResponse::Structured(_)
        ));
    }

    #[test]
    fn test_parse_free_text_preserved() {
        let text = "The scene shows people in distress near the exit.";
        let DetectorResponse::RawText(raw) = DetectorResponse::parse(text) else {
            panic!("expected raw text");
        };
        assert_eq!(raw, text);
    }

    #[test]
    fn test_unknown_severity_defaults_low() {
        let analysis = FrameAnalysis {
            severity: Some("catastrophic".to_string()),
            ..Default::default()
        };
        assert_eq!(analysis.severity(), Severity::Low);
        assert_eq!(FrameAnalysis::default().severity(), Severity::Low);
    }
}
