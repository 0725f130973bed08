//! Text generation clients
//!
//! A [`GenerationClient`] sends one prompt and returns the reply text.
//! Failures are deliberately coarse: rate limiting, bad credentials and
//! outages all surface as [`GenerationError::Failed`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use thiserror::Error;

pub mod endpoint;
pub mod gemini;

pub use endpoint::EndpointClient;
pub use gemini::GeminiClient;

/// Errors from a generation call
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("no API key configured, set GEMINI_API_KEY")]
    MissingCredential,

    #[error("generation request failed: {message}")]
    Failed { message: String },

    #[error("unexpected generation response: {message}")]
    InvalidResponse { message: String },
}

impl GenerationError {
    pub fn failed<S: Into<String>>(message: S) -> Self {
        Self::Failed {
            message: message.into(),
        }
    }

    pub fn invalid_response<S: Into<String>>(message: S) -> Self {
        Self::InvalidResponse {
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for GenerationError {
    fn from(err: reqwest::Error) -> Self {
        GenerationError::failed(err.to_string())
    }
}

impl From<reqwest_middleware::Error> for GenerationError {
    fn from(err: reqwest_middleware::Error) -> Self {
        GenerationError::failed(err.to_string())
    }
}

/// Something that turns a prompt into generated text
#[async_trait]
pub trait GenerationClient: Send + Sync {
    /// Send a single prompt and return the full reply text
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;
}

/// HTTP client shared by the generation clients.
///
/// `timeout_seconds == 0` keeps the transport default and `max_retries == 0`
/// means exactly one attempt.
pub(crate) fn http_client(
    timeout_seconds: u32,
    max_retries: u32,
) -> Result<ClientWithMiddleware, GenerationError> {
    let mut builder = reqwest::Client::builder()
        .user_agent(concat!("Wanderlust/", env!("CARGO_PKG_VERSION")));
    if timeout_seconds > 0 {
        builder = builder.timeout(Duration::from_secs(timeout_seconds.into()));
    }
    let client = builder
        .build()
        .map_err(|e| GenerationError::failed(format!("Failed to create HTTP client: {e}")))?;

    let mut builder = ClientBuilder::new(client);
    if max_retries > 0 {
        let policy = ExponentialBackoff::builder().build_with_max_retries(max_retries);
        builder = builder.with(RetryTransientMiddleware::new_with_policy(policy));
    }
    Ok(builder.build())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert!(GenerationError::MissingCredential.to_string().contains("GEMINI_API_KEY"));
        assert!(GenerationError::failed("503").to_string().contains("503"));
        assert!(
            GenerationError::invalid_response("no candidates")
                .to_string()
                .contains("no candidates")
        );
    }

    #[test]
    fn test_http_client_builds() {
        assert!(http_client(0, 0).is_ok());
        assert!(http_client(30, 3).is_ok());
    }
}
