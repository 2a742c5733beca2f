//! Provider abstraction layer for the managed inference endpoint
//!
//! The invoker talks to the remote model service only through the
//! `Provider` trait, so the HTTP client can be pointed at a stand-in.

use crate::models::bedrock::{ConverseRequest, ConverseResponse};
use async_trait::async_trait;
use thiserror::Error;

/// Error types for provider operations
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Rate limit exceeded: {0}")]
    RateLimit(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("API error (status {status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Trait for managed inference providers
#[async_trait]
pub trait Provider: Send + Sync {
    /// Send one non-streaming Converse request
    async fn converse(&self, request: &ConverseRequest) -> Result<ConverseResponse, ProviderError>;

    /// Get the provider name
    fn provider_name(&self) -> &str;
}
