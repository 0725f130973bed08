//! Client for a running Wanderlust server's `/api/generate`
//!
//! Returns the `output` field of the reply, the raw generated text before
//! any cleanup.

use async_trait::async_trait;
use reqwest_middleware::ClientWithMiddleware;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, instrument};

use super::{GenerationClient, GenerationError, http_client};

/// The part of the server reply this client needs; `html` is ignored
#[derive(Debug, Deserialize)]
struct EndpointReply {
    output: String,
}

pub struct EndpointClient {
    http: ClientWithMiddleware,
    url: String,
}

impl EndpointClient {
    /// `base_url` is the server root, e.g. `http://localhost:3003`
    pub fn new(base_url: &str, timeout_seconds: u32) -> Result<Self, GenerationError> {
        Ok(Self {
            http: http_client(timeout_seconds, 0)?,
            url: format!("{}/api/generate", base_url.trim_end_matches('/')),
        })
    }
}

#[async_trait]
impl GenerationClient for EndpointClient {
    #[instrument(name = "endpoint_generate", skip(self, prompt), fields(url = %self.url))]
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let response = self
            .http
            .post(&self.url)
            .json(&json!({ "prompt": prompt }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GenerationError::failed("Failed to generate content"));
        }

        let body = response.text().await?;
        debug!("Endpoint replied with {} bytes", body.len());
        let reply: EndpointReply = serde_json::from_str(&body)
            .map_err(|e| GenerationError::invalid_response(e.to_string()))?;
        Ok(reply.output)
    }
}
