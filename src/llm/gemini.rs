use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};
use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_MODEL;
use crate::error::{Error, Result};
use crate::llm::provider::{LLMProvider, ResponseMode};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

// Technical news about exploits, weapons in games or model jailbreaks trips
// the default filters, so every category is set to the least strict level.
const SAFETY_CATEGORIES: [&str; 4] = [
    "HARM_CATEGORY_HARASSMENT",
    "HARM_CATEGORY_HATE_SPEECH",
    "HARM_CATEGORY_SEXUALLY_EXPLICIT",
    "HARM_CATEGORY_DANGEROUS_CONTENT",
];

pub struct GeminiProvider {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<GeminiContent>,
    safety_settings: Vec<SafetySetting>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Serialize)]
struct SafetySetting {
    category: &'static str,
    threshold: &'static str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
    #[serde(default)]
    error: Option<GeminiError>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<GeminiContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Deserialize)]
struct GeminiError {
    message: String,
}

impl GeminiProvider {
    pub fn new(api_key: String, model: Option<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()?;

        Ok(Self {
            client,
            api_key,
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Points the provider at another endpoint, e.g. a local proxy.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }
}

fn build_request(prompt: &str, mode: ResponseMode) -> GenerateRequest {
    GenerateRequest {
        contents: vec![GeminiContent {
            role: Some("user".to_string()),
            parts: vec![Part {
                text: Some(prompt.to_string()),
            }],
        }],
        safety_settings: SAFETY_CATEGORIES
            .iter()
            .map(|category| SafetySetting {
                category: *category,
                threshold: "BLOCK_NONE",
            })
            .collect(),
        generation_config: match mode {
            ResponseMode::Json => Some(GenerationConfig {
                response_mime_type: "application/json".to_string(),
            }),
            ResponseMode::Text => None,
        },
    }
}

fn response_text(result: GenerateResponse) -> Result<String> {
    if let Some(error) = result.error {
        return Err(Error::LLMApi(error.message));
    }

    if let Some(reason) = result.prompt_feedback.and_then(|f| f.block_reason) {
        return Err(Error::LLMApi(format!("Prompt blocked by Gemini: {}", reason)));
    }

    let candidate = result
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| Error::LLMApi("Gemini returned no candidates".to_string()))?;

    let text = candidate
        .content
        .map(|c| c.parts)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|p| p.text)
        .collect::<Vec<_>>()
        .join("");

    if text.trim().is_empty() {
        return Err(Error::LLMApi(format!(
            "Empty response from Gemini (finish reason: {})",
            candidate.finish_reason.as_deref().unwrap_or("unknown")
        )));
    }

    Ok(text)
}

#[async_trait]
impl LLMProvider for GeminiProvider {
    async fn generate(&self, prompt: &str, mode: ResponseMode) -> Result<String> {
        tracing::debug!("Sending {} chars to {} ({:?})", prompt.len(), self.model, mode);

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .header(header::CONTENT_TYPE, "application/json")
            .json(&build_request(prompt, mode))
            .send()
            .await
            .map_err(|e| Error::LLMApi(format!("Failed to send request: {}", e)))?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get(header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok())
                .unwrap_or(0);
            return Err(Error::RateLimited(retry_after));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::LLMApi(format!(
                "Gemini API error ({}): {}",
                status, body
            )));
        }

        let result: GenerateResponse = response
            .json()
            .await
            .map_err(|e| Error::LLMApi(format!("Failed to parse Gemini response: {}", e)))?;

        response_text(result)
    }

    fn name(&self) -> &str {
        "Gemini"
    }
}
