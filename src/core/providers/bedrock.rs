//! Amazon Bedrock runtime provider
//!
//! Calls the Converse API over HTTPS with bearer-token authentication.

use crate::core::constants::service;
use crate::core::provider::{Provider, ProviderError};
use crate::models::bedrock::{ConverseRequest, ConverseResponse};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;
use tracing::{debug, error};

/// Bedrock runtime provider bound to one region
pub struct BedrockProvider {
    client: Client,
    region: String,
    base_url: String,
    bearer_token: SecretString,
}

impl BedrockProvider {
    /// Create a new Bedrock provider
    ///
    /// # Arguments
    ///
    /// * `bearer_token` - Bedrock API key
    /// * `region` - AWS region (e.g., "us-east-1")
    /// * `endpoint_url` - Optional endpoint override; defaults to the public regional endpoint
    /// * `timeout` - Request timeout in seconds
    pub fn new(
        bearer_token: SecretString,
        region: String,
        endpoint_url: Option<String>,
        timeout: u64,
    ) -> Result<Self, ProviderError> {
        if bearer_token.expose_secret().trim().is_empty() {
            return Err(ProviderError::Configuration(
                "Bedrock bearer token is empty".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout))
            .build()
            .map_err(|e| ProviderError::Configuration(format!("Failed to create HTTP client: {e}")))?;

        let base_url = endpoint_url
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| Self::regional_endpoint(&region));

        Ok(Self {
            client,
            region,
            base_url,
            bearer_token,
        })
    }

    /// Create a provider whose bearer token is read from `token_env_var`
    ///
    /// The variable is read once, here; changing it afterwards has no
    /// effect on this client.
    pub fn from_env(
        token_env_var: &str,
        region: String,
        endpoint_url: Option<String>,
        timeout: u64,
    ) -> Result<Self, ProviderError> {
        let token = std::env::var(token_env_var).map_err(|_| {
            ProviderError::Configuration(format!("{token_env_var} is not set"))
        })?;
        Self::new(SecretString::from(token), region, endpoint_url, timeout)
    }

    /// Public endpoint for the runtime service in `region`
    pub fn regional_endpoint(region: &str) -> String {
        format!("https://{}.{}.amazonaws.com", service::NAME, region)
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    /// Get the Converse URL for the model
    fn converse_url(&self, model_id: &str) -> String {
        format!(
            "{}/model/{}/{}",
            self.base_url,
            urlencoding::encode(model_id),
            service::CONVERSE
        )
    }

    /// Pull the human-readable message out of a Bedrock error body
    ///
    /// Bodies usually look like `{"message": "...", "__type": "..."}`; the
    /// raw text is returned when no message can be found, and the status's
    /// reason phrase when the body is blank.
    fn error_message(status: u16, body: &str) -> String {
        if body.trim().is_empty() {
            return StatusCode::from_u16(status)
                .ok()
                .and_then(|s| s.canonical_reason())
                .unwrap_or("Unknown error")
                .to_string();
        }

        serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|json| {
                json.get("message")
                    .or_else(|| json.get("Message"))
                    .and_then(|v| v.as_str())
                    .map(|s| s.trim().to_string())
            })
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| body.to_string())
    }

    fn error_type(body: &str) -> String {
        serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|json| json.get("__type").and_then(|v| v.as_str()).map(str::to_lowercase))
            .unwrap_or_default()
    }

    /// Classify a non-success response into a provider error
    fn classify_error(status: u16, body: &str) -> ProviderError {
        let message = Self::error_message(status, body);
        let throttled =
            Self::error_type(body).contains("throttl") || message.to_lowercase().contains("throttl");

        match status {
            429 => ProviderError::RateLimit(message),
            _ if throttled => ProviderError::RateLimit(message),
            401 | 403 => ProviderError::Authentication(message),
            404 => ProviderError::NotFound(message),
            400 | 413 | 415 => ProviderError::BadRequest(message),
            _ => ProviderError::ApiError { status, message },
        }
    }
}

#[async_trait]
impl Provider for BedrockProvider {
    async fn converse(&self, request: &ConverseRequest) -> Result<ConverseResponse, ProviderError> {
        let url = self.converse_url(&request.model_id);
        debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
            .bearer_auth(self.bearer_token.expose_secret())
            .json(request)
            .send()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            error!("Bedrock returned status {}", status.as_u16());
            return Err(Self::classify_error(status.as_u16(), &error_text));
        }

        response
            .json::<ConverseResponse>()
            .await
            .map_err(|e| ProviderError::InvalidResponse(format!("Failed to parse response: {e}")))
    }

    fn provider_name(&self) -> &str {
        "Amazon Bedrock"
    }
}
