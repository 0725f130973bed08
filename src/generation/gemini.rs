//! Google Gemini `generateContent` client

use async_trait::async_trait;
use reqwest_middleware::ClientWithMiddleware;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

use super::{GenerationClient, GenerationError, http_client};
use crate::config::GeminiConfig;

pub struct GeminiClient {
    http: ClientWithMiddleware,
    api_key: Option<String>,
    base_url: String,
    model: String,
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: [RequestContent<'a>; 1],
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: [RequestPart<'a>; 1],
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl<'a> GenerateContentRequest<'a> {
    fn new(prompt: &'a str) -> Self {
        Self {
            contents: [RequestContent {
                parts: [RequestPart { text: prompt }],
            }],
        }
    }
}

impl GenerateContentResponse {
    /// Text of the first candidate, parts joined in order
    pub(crate) fn into_text(self) -> Result<String, GenerationError> {
        let parts = self
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| content.parts)
            .ok_or_else(|| GenerationError::invalid_response("no candidates in response"))?;

        Ok(parts.into_iter().filter_map(|part| part.text).collect())
    }
}

impl GeminiClient {
    pub fn new(config: &GeminiConfig) -> Result<Self, GenerationError> {
        Ok(Self {
            http: http_client(config.timeout_seconds, config.max_retries)?,
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
        })
    }

    fn url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url,
            urlencoding::encode(&self.model)
        )
    }
}

#[async_trait]
impl GenerationClient for GeminiClient {
    #[instrument(name = "gemini_generate", skip(self, prompt), fields(model = %self.model, prompt_len = prompt.len()))]
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(GenerationError::MissingCredential)?;

        debug!("Prompt: {}", prompt);
        let start_time = Instant::now();

        let response = self
            .http
            .post(self.url())
            .header("x-goog-api-key", api_key)
            .json(&GenerateContentRequest::new(prompt))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(%status, "Gemini API returned an error: {}", body);
            return Err(GenerationError::failed(format!("Gemini API returned {status}")));
        }

        let text = response
            .json::<GenerateContentResponse>()
            .await
            .map_err(|e| GenerationError::invalid_response(e.to_string()))?
            .into_text()?;

        info!(
            "Generated {} characters in {:.3}s",
            text.len(),
            start_time.elapsed().as_secs_f64()
        );
        debug!("Generated text: {}", text);
        Ok(text)
    }
}
