//! Bedrock Converse API data models
//!
//! Request and response structures for `POST /model/{modelId}/converse`.
//! Only the fields this program sends or reads are modelled; unknown fields
//! in responses are ignored.

use crate::core::constants::{request, role};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single content block. Text is the only kind this program produces,
/// but the model may answer with other block kinds, so `text` is optional
/// on the way in.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContentBlock {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl ContentBlock {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
        }
    }
}

/// Message with role and content blocks
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub content: Vec<ContentBlock>,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: role::USER.to_string(),
            content: vec![ContentBlock::text(text)],
        }
    }
}

/// Converse API request
///
/// `model_id` travels in the URL path, not the JSON body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ConverseRequest {
    #[serde(skip_serializing)]
    pub model_id: String,
    pub messages: Vec<Message>,
}

impl ConverseRequest {
    /// The fixed request: one user greeting to the fixed model.
    pub fn greeting() -> Self {
        Self {
            model_id: request::MODEL_ID.to_string(),
            messages: vec![Message::user(request::GREETING)],
        }
    }
}

/// Output wrapper; `message` is absent when the model produced none
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ConverseOutput {
    #[serde(default)]
    pub message: Option<Message>,
}

/// Token accounting reported by the service
#[derive(Debug, Clone, Copy, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct TokenUsage {
    #[serde(default)]
    pub input_tokens: u32,
    #[serde(default)]
    pub output_tokens: u32,
    #[serde(default)]
    pub total_tokens: u32,
}

#[derive(Debug, Clone, Copy, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ConverseMetrics {
    #[serde(default)]
    pub latency_ms: u64,
}

/// Converse API response body
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ConverseResponse {
    #[serde(default)]
    pub output: Option<ConverseOutput>,
    #[serde(default)]
    pub stop_reason: Option<String>,
    #[serde(default)]
    pub usage: Option<TokenUsage>,
    #[serde(default)]
    pub metrics: Option<ConverseMetrics>,
}

/// Raised when the response lacks part of `output.message.content[0].text`
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResponseShapeError {
    #[error("response has no `output` field")]
    MissingOutput,

    #[error("response has no `output.message` field")]
    MissingMessage,

    #[error("response message has no content blocks")]
    EmptyContent,

    #[error("first content block has no `text` field")]
    MissingText,
}

impl ConverseResponse {
    /// Text of the first content block of the output message
    pub fn first_text(&self) -> Result<&str, ResponseShapeError> {
        let output = self
            .output
            .as_ref()
            .ok_or(ResponseShapeError::MissingOutput)?;
        let message = output
            .message
            .as_ref()
            .ok_or(ResponseShapeError::MissingMessage)?;
        let block = message
            .content
            .first()
            .ok_or(ResponseShapeError::EmptyContent)?;
        block.text.as_deref().ok_or(ResponseShapeError::MissingText)
    }
}
