//! Gemini fallback classifier — cloud tier for phrasings the pattern
//! table can't match.
//!
//! Calls the Generative Language HTTP API and parses the answer
//! defensively: the model is an untrusted input source, so every failure
//! rung (unconfigured, unreachable, non-200, garbage JSON, intent outside
//! the closed set) degrades to `Unknown` with confidence 0 instead of
//! surfacing an error.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use rasoi_protocol::{Entities, Intent};

use crate::classify::{Classification, ClassifyContext, FallbackClassifier};

/// Shown to the user when no API key is configured.
const DISABLED_MESSAGE: &str = "AI features require a Gemini API key.";

/// Configuration for the Gemini endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct GeminiConfig {
    /// API key; `None` disables the tier (degraded answers only).
    #[serde(default)]
    pub api_key: Option<String>,
    /// Model to use for classification.
    #[serde(default = "default_model")]
    pub model: String,
    /// API base URL (overridable for tests).
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_model() -> String {
    "gemini-1.5-flash".into()
}
fn default_endpoint() -> String {
    "https://generativelanguage.googleapis.com/v1beta".into()
}
fn default_timeout_secs() -> u64 {
    5
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl GeminiConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let timeout_secs = std::env::var("GEMINI_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(default_timeout_secs);
        Self {
            api_key: std::env::var("GEMINI_API_KEY").ok().filter(|k| !k.is_empty()),
            model: std::env::var("GEMINI_MODEL").unwrap_or_else(|_| default_model()),
            endpoint: std::env::var("GEMINI_ENDPOINT").unwrap_or_else(|_| default_endpoint()),
            timeout_secs,
        }
    }
}

/// generateContent request body (only the fields we send).
#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig<'a>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct GenerationConfig<'a> {
    #[serde(rename = "responseMimeType")]
    response_mime_type: &'a str,
}

/// generateContent response (only the fields we read).
#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

/// Raw model output before validation.
#[derive(Deserialize)]
struct RawClassification {
    intent: Option<String>,
    #[serde(default)]
    entities: serde_json::Value,
    #[serde(default)]
    confidence: f64,
    #[serde(default)]
    needs_clarification: bool,
    #[serde(default)]
    clarification_question: Option<String>,
}

/// Client for the Gemini classification endpoint.
pub struct GeminiClient {
    client: reqwest::Client,
    config: GeminiConfig,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .expect("failed to build reqwest client");
        Self { client, config }
    }

    fn build_prompt(&self, message: &str, ctx: &ClassifyContext) -> String {
        let intents = Intent::ALL
            .iter()
            .map(|i| i.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            r#"You are a restaurant POS assistant. Parse the user message and extract intent and entities.

Restaurant: {restaurant}
Categories: {categories}

User message: "{message}"

Respond with ONLY a JSON object (no markdown, no explanation):
{{"intent": "<one of: {intents}>", "entities": {{<extracted data>}}, "confidence": <0.0-1.0>}}

Entity shapes per intent:
- MENU_PRICE_UPDATE: {{"target": "<item or category phrase>", "modifier": "INCREMENT"|"DECREMENT", "value": <number>, "is_percentage": <bool>}}
- MENU_AVAILABILITY_TOGGLE: {{"items": ["<name fragment>", ...], "available": <bool>}}
- SALES_QUERY_TODAY, TOP_SELLERS, GREETING, HELP: {{}}

If the message doesn't fit any intent, respond with:
{{"intent": "UNKNOWN", "entities": {{}}, "confidence": 0.0, "needs_clarification": true, "clarification_question": "<what to ask>"}}"#,
            restaurant = ctx.restaurant_name,
            categories = ctx.categories.join(", "),
            message = message,
            intents = intents,
        )
    }

    /// Call generateContent and validate the answer into a `Classification`.
    async fn call_generate(&self, text: &str, ctx: &ClassifyContext) -> Option<Classification> {
        let key = self.config.api_key.as_deref()?;
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.config.endpoint, self.config.model, key
        );

        let prompt = self.build_prompt(text, ctx);
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: &prompt }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
            },
        };

        let response = match self.client.post(&url).json(&body).send().await {
            Ok(resp) => resp,
            Err(e) => {
                tracing::warn!(error = %e, "gemini request failed");
                return None;
            }
        };

        if !response.status().is_success() {
            tracing::warn!(status = %response.status(), "gemini returned non-200");
            return None;
        }

        let generate: GenerateResponse = match response.json().await {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(error = %e, "failed to parse gemini response body");
                return None;
            }
        };

        let content = generate
            .candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .next()?
            .text;

        let json_str = extract_json(&content);
        let raw: RawClassification = match serde_json::from_str(json_str) {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(error = %e, content = %content, "gemini returned invalid JSON");
                return None;
            }
        };

        // Validate the intent is in the closed set.
        let intent_name = raw.intent?;
        let Some(intent) = Intent::from_wire(&intent_name) else {
            tracing::warn!(intent = %intent_name, "gemini returned unknown intent");
            return None;
        };

        let entities = Entities::from_value(intent, &raw.entities);
        Some(Classification {
            intent,
            entities,
            confidence: raw.confidence.clamp(0.0, 1.0),
            needs_clarification: raw.needs_clarification,
            clarification_question: raw.clarification_question,
        })
    }
}

#[async_trait]
impl FallbackClassifier for GeminiClient {
    async fn classify(&self, text: &str, ctx: &ClassifyContext) -> Classification {
        if self.config.api_key.is_none() {
            return Classification::degraded(Some(DISABLED_MESSAGE.into()));
        }

        match self.call_generate(text, ctx).await {
            Some(classification) => classification,
            None => Classification::degraded(None),
        }
    }

    fn tier_name(&self) -> &str {
        "gemini"
    }
}

/// Extract JSON from model output that may be wrapped in markdown fences.
fn extract_json(text: &str) -> &str {
    let trimmed = text.trim();

    if let Some(start) = trimmed.find("```json") {
        let after_fence = &trimmed[start + 7..];
        if let Some(end) = after_fence.find("```") {
            return after_fence[..end].trim();
        }
    }

    if let Some(start) = trimmed.find("```") {
        let after_fence = &trimmed[start + 3..];
        if let Some(end) = after_fence.find("```") {
            return after_fence[..end].trim();
        }
    }

    trimmed
}
