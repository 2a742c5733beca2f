//! Inference invoker
//!
//! Exports the credential, builds the Bedrock client, sends the greeting,
//! and writes the first text block of the reply as one line.

use crate::core::config::Config;
use crate::core::provider::Provider;
use crate::core::providers::BedrockProvider;
use crate::models::bedrock::ConverseRequest;
use anyhow::{Context, Result, bail};
use secrecy::{ExposeSecret, SecretString};
use std::io::Write;
use tracing::info;

/// Place the bearer token into the process environment
///
/// Must run before `BedrockProvider::from_env`, which reads the variable
/// at construction time.
pub fn export_credential(var: &str, credential: &SecretString) -> Result<()> {
    if credential.expose_secret().trim().is_empty() {
        bail!("Refusing to export an empty credential to {var}");
    }
    // SAFETY: the binary calls this once, on its only thread, before the
    // HTTP client exists. Tests that reach it hold `tests::ENV_LOCK`.
    unsafe {
        std::env::set_var(var, credential.expose_secret());
    }
    Ok(())
}

/// Send the greeting through `provider` and write the reply text to `out`
///
/// Nothing is written unless the reply contains
/// `output.message.content[0].text`.
pub async fn invoke<W: Write>(provider: &dyn Provider, out: &mut W) -> Result<()> {
    let request = ConverseRequest::greeting();
    info!(
        "Sending greeting to {} via {}",
        request.model_id,
        provider.provider_name()
    );

    let response = provider
        .converse(&request)
        .await
        .context("Converse request failed")?;

    if let Some(usage) = response.usage {
        info!(
            stop_reason = response.stop_reason.as_deref().unwrap_or("unknown"),
            input_tokens = usage.input_tokens,
            output_tokens = usage.output_tokens,
            total_tokens = usage.total_tokens,
            latency_ms = ?response.metrics.map(|m| m.latency_ms),
            "Converse completed"
        );
    }

    let text = response
        .first_text()
        .context("Unexpected Converse response shape")?;
    writeln!(out, "{text}")?;
    out.flush()?;
    Ok(())
}

/// Full run: export, construct, invoke
pub async fn run<W: Write>(config: &Config, out: &mut W) -> Result<()> {
    export_credential(&config.token_env_var, &config.credential)?;

    let provider = BedrockProvider::from_env(
        &config.token_env_var,
        config.region.clone(),
        config.endpoint_url.clone(),
        config.request_timeout,
    )
    .context("Failed to create Bedrock client")?;
    info!("Using region {}", provider.region());

    invoke(&provider, out).await
}
