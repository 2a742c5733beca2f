//! Constants for the Bedrock runtime call
//!
//! This module defines the fixed request values, service naming, and the
//! environment variable names read or written by the application.

/// Message role constants
pub mod role {
    /// User role identifier
    pub const USER: &str = "user";
}

/// Service endpoint constants
pub mod service {
    /// Bedrock runtime service name, used as the endpoint host prefix
    pub const NAME: &str = "bedrock-runtime";

    /// Region used when none is configured
    pub const DEFAULT_REGION: &str = "us-east-1";

    /// Converse operation path suffix
    pub const CONVERSE: &str = "converse";
}

/// The one request this program sends
pub mod request {
    /// Foundation model invoked on every run
    pub const MODEL_ID: &str = "us.anthropic.claude-3-5-haiku-20241022-v1:0";

    /// Text of the single user message
    pub const GREETING: &str = "Hello! Can you tell me about Amazon Bedrock?";
}

/// Environment variable names
pub mod env {
    /// Bearer token consumed by the Bedrock client
    pub const BEARER_TOKEN: &str = "AWS_BEARER_TOKEN_BEDROCK";

    /// Path to the TOML configuration file
    pub const CONFIG_PATH: &str = "BEDROCK_CONFIG_PATH";

    /// Endpoint override
    pub const ENDPOINT_URL: &str = "BEDROCK_ENDPOINT_URL";

    /// Request timeout override, in seconds
    pub const REQUEST_TIMEOUT: &str = "BEDROCK_REQUEST_TIMEOUT";

    /// Region, checked before `DEFAULT_REGION`
    pub const REGION: &str = "AWS_REGION";

    /// Fallback region variable
    pub const DEFAULT_REGION: &str = "AWS_DEFAULT_REGION";

    /// Log level override
    pub const LOG_LEVEL: &str = "LOG_LEVEL";
}
