//! Provider implementations

pub mod bedrock;

pub use bedrock::BedrockProvider;
