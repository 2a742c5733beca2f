//! Application configuration management
//!
//! Configuration is layered: an optional TOML file, then environment
//! variables (including those loaded from `.env`). Everything is validated
//! once at startup so a misconfigured run fails before any network call.

use crate::core::constants::{env, service};
use crate::core::logging::DEFAULT_LOG_LEVEL;
use anyhow::{Context, Result, bail};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Default request timeout in seconds
const DEFAULT_REQUEST_TIMEOUT: u64 = 90;

/// Config file looked up in the working directory when no path is given
const DEFAULT_CONFIG_FILE: &str = "bedrock.toml";

#[derive(Debug, Clone, Deserialize)]
pub struct BedrockSection {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_region")]
    pub region: String,
    #[serde(default)]
    pub endpoint_url: Option<String>,
    #[serde(default = "default_token_env_var")]
    pub token_env_var: String,
}

impl Default for BedrockSection {
    fn default() -> Self {
        Self {
            api_key: None,
            region: default_region(),
            endpoint_url: None,
            token_env_var: default_token_env_var(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RequestSection {
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,
}

impl Default for RequestSection {
    fn default() -> Self {
        Self {
            request_timeout: default_request_timeout(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSection {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_region() -> String {
    service::DEFAULT_REGION.to_string()
}

fn default_token_env_var() -> String {
    env::BEARER_TOKEN.to_string()
}

fn default_request_timeout() -> u64 {
    DEFAULT_REQUEST_TIMEOUT
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct TomlConfig {
    #[serde(default)]
    pub bedrock: BedrockSection,
    #[serde(default)]
    pub request: RequestSection,
    #[serde(default)]
    pub logging: LoggingSection,
}

/// Resolved application configuration
#[derive(Debug)]
pub struct Config {
    /// Bearer token for the Bedrock runtime
    pub credential: SecretString,

    /// Environment variable the credential is exported to
    pub token_env_var: String,

    /// AWS region of the runtime endpoint
    pub region: String,

    /// Endpoint override; `None` means the public regional endpoint
    pub endpoint_url: Option<String>,

    /// Request timeout in seconds
    pub request_timeout: u64,

    /// Logging level
    pub log_level: String,
}

impl Config {
    /// Load configuration from `.env`, the config file, and the environment
    ///
    /// The file is `$BEDROCK_CONFIG_PATH` if set, otherwise `bedrock.toml`
    /// in the working directory when it exists.
    pub fn load() -> Result<Self> {
        dotenv::dotenv().ok();

        Self::load_from(
            std::env::var(env::CONFIG_PATH).ok(),
            Path::new(DEFAULT_CONFIG_FILE),
            |name| std::env::var(name).ok(),
        )
    }

    /// Pick the config file and resolve it against `lookup`
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - `config_path` is given and cannot be read or parsed
    /// - `default_file` exists and cannot be parsed
    /// - No credential is available
    /// - Configuration values are invalid
    pub fn load_from<F>(config_path: Option<String>, default_file: &Path, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let file = match config_path {
            Some(path) => Self::read_file(path)?,
            None if default_file.exists() => Self::read_file(default_file)?,
            None => TomlConfig::default(),
        };
        Self::resolve(file, lookup)
    }

    fn read_file<P: AsRef<Path>>(path: P) -> Result<TomlConfig> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file {}", path.display()))?;
        toml::from_str(&content).context("Failed to parse TOML configuration")
    }

    /// Merge file values with variables from `lookup` and validate
    pub fn resolve<F>(file: TomlConfig, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let token_env_var = file.bedrock.token_env_var;
        let credential = non_empty(token_env_var.as_str())
            .or(file.bedrock.api_key.filter(|v| !v.trim().is_empty()))
            .with_context(|| {
                format!("No Bedrock credential: set {token_env_var} or [bedrock].api_key")
            })?;

        let region = non_empty(env::REGION)
            .or_else(|| non_empty(env::DEFAULT_REGION))
            .unwrap_or(file.bedrock.region);

        let endpoint_url = non_empty(env::ENDPOINT_URL).or(file.bedrock.endpoint_url);

        let request_timeout = match non_empty(env::REQUEST_TIMEOUT) {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .with_context(|| format!("{} must be a whole number of seconds", env::REQUEST_TIMEOUT))?,
            None => file.request.request_timeout,
        };

        let log_level = non_empty(env::LOG_LEVEL).unwrap_or(file.logging.log_level);

        let config = Config {
            credential: SecretString::from(credential),
            token_env_var,
            region,
            endpoint_url,
            request_timeout,
            log_level,
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.token_env_var.trim().is_empty() {
            bail!("token_env_var must not be empty");
        }
        if self.region.trim().is_empty() {
            bail!("region must not be empty");
        }
        if self.request_timeout == 0 {
            bail!("request_timeout must be greater than zero");
        }
        if self.credential.expose_secret().trim().is_empty() {
            bail!("Bedrock credential must not be empty");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::{NamedTempFile, tempdir};

    fn create_test_config() -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
            [bedrock]
            api_key = "file-token"
            region = "eu-central-1"
            endpoint_url = "http://localhost:4566"
            token_env_var = "BEDROCK_CONVERSE_TEST_FILE_TOKEN"

            [request]
            request_timeout = 30

            [logging]
            log_level = "debug"
        "#
        )
        .unwrap();
        file.flush().unwrap();
        file
    }

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    #[test]
    fn test_load_config() {
        let file = create_test_config();
        let config = Config::resolve(Config::read_file(file.path()).unwrap(), lookup(&[])).unwrap();
        assert_eq!(config.credential.expose_secret(), "file-token");
        assert_eq!(config.token_env_var, "BEDROCK_CONVERSE_TEST_FILE_TOKEN");
        assert_eq!(config.region, "eu-central-1");
        assert_eq!(config.endpoint_url.as_deref(), Some("http://localhost:4566"));
        assert_eq!(config.request_timeout, 30);
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_defaults_with_env_credential() {
        let config =
            Config::resolve(TomlConfig::default(), lookup(&[(env::BEARER_TOKEN, "env-token")]))
                .unwrap();
        assert_eq!(config.credential.expose_secret(), "env-token");
        assert_eq!(config.token_env_var, env::BEARER_TOKEN);
        assert_eq!(config.region, "us-east-1");
        assert_eq!(config.endpoint_url, None);
        assert_eq!(config.request_timeout, DEFAULT_REQUEST_TIMEOUT);
        assert_eq!(config.log_level, DEFAULT_LOG_LEVEL);
    }

    #[test]
    fn test_env_credential_wins_over_file() {
        let mut file = TomlConfig::default();
        file.bedrock.api_key = Some("file-token".to_string());
        let config =
            Config::resolve(file, lookup(&[(env::BEARER_TOKEN, "env-token")])).unwrap();
        assert_eq!(config.credential.expose_secret(), "env-token");
    }

    #[test]
    fn test_missing_credential_names_variable() {
        let err = Config::resolve(TomlConfig::default(), lookup(&[(env::BEARER_TOKEN, "  ")]))
            .unwrap_err();
        assert!(err.to_string().contains(env::BEARER_TOKEN));
    }

    #[test]
    fn test_env_overrides() {
        let config = Config::resolve(
            TomlConfig::default(),
            lookup(&[
                (env::BEARER_TOKEN, "t"),
                (env::DEFAULT_REGION, "ap-south-1"),
                (env::ENDPOINT_URL, "http://127.0.0.1:9000"),
                (env::REQUEST_TIMEOUT, "15"),
                (env::LOG_LEVEL, "info"),
            ]),
        )
        .unwrap();
        assert_eq!(config.region, "ap-south-1");
        assert_eq!(config.endpoint_url.as_deref(), Some("http://127.0.0.1:9000"));
        assert_eq!(config.request_timeout, 15);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_region_precedence() {
        let config = Config::resolve(
            TomlConfig::default(),
            lookup(&[
                (env::BEARER_TOKEN, "t"),
                (env::REGION, "us-west-2"),
                (env::DEFAULT_REGION, "ap-south-1"),
            ]),
        )
        .unwrap();
        assert_eq!(config.region, "us-west-2");
    }

    #[test]
    fn test_invalid_timeout_rejected() {
        let bad = Config::resolve(
            TomlConfig::default(),
            lookup(&[(env::BEARER_TOKEN, "t"), (env::REQUEST_TIMEOUT, "soon")]),
        );
        assert!(bad.is_err());

        let mut file = TomlConfig::default();
        file.request.request_timeout = 0;
        assert!(Config::resolve(file, lookup(&[(env::BEARER_TOKEN, "t")])).is_err());
    }

    #[test]
    fn test_explicit_path_missing_is_error() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("absent.toml");
        let result = Config::load_from(
            Some(missing.display().to_string()),
            &dir.path().join(DEFAULT_CONFIG_FILE),
            lookup(&[(env::BEARER_TOKEN, "t")]),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_absent_default_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load_from(
            None,
            &dir.path().join(DEFAULT_CONFIG_FILE),
            lookup(&[(env::BEARER_TOKEN, "env-token")]),
        )
        .unwrap();
        assert_eq!(config.credential.expose_secret(), "env-token");
        assert_eq!(config.region, "us-east-1");
        assert_eq!(config.request_timeout, DEFAULT_REQUEST_TIMEOUT);
    }

    #[test]
    fn test_present_default_file_is_read() {
        let dir = tempdir().unwrap();
        let default_file = dir.path().join(DEFAULT_CONFIG_FILE);
        fs::write(
            &default_file,
            "[bedrock]\napi_key = \"file-token\"\nregion = \"eu-west-1\"\n",
        )
        .unwrap();

        let config = Config::load_from(None, &default_file, lookup(&[])).unwrap();
        assert_eq!(config.credential.expose_secret(), "file-token");
        assert_eq!(config.region, "eu-west-1");
    }

    #[test]
    fn test_explicit_path_wins_over_default_file() {
        let dir = tempdir().unwrap();
        let default_file = dir.path().join(DEFAULT_CONFIG_FILE);
        fs::write(&default_file, "[bedrock]\napi_key = \"default-token\"\n").unwrap();
        let file = create_test_config();

        let config = Config::load_from(
            Some(file.path().display().to_string()),
            &default_file,
            lookup(&[]),
        )
        .unwrap();
        assert_eq!(config.credential.expose_secret(), "file-token");
    }
}
