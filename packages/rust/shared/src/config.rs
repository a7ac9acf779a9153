//! Application configuration for vetdischarge.
//!
//! User config lives at `~/.vetdischarge/vetdischarge.toml` and is optional.
//! CLI flags override config file values, which override defaults.
//! The API key itself is never stored in config; only the name of the
//! environment variable that holds it.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{DischargeError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "vetdischarge.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".vetdischarge";

// ---------------------------------------------------------------------------
// Config structs (matching vetdischarge.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Global defaults.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Completion service settings.
    #[serde(default)]
    pub openai: OpenAiConfig,
}

/// `[defaults]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Directory discharge notes are written to. Must already exist.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
        }
    }
}

fn default_output_dir() -> String {
    "solution".into()
}

/// `[openai]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiConfig {
    /// Name of the env var holding the API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Chat model identifier.
    #[serde(default = "default_model")]
    pub model: String,

    /// Base URL of the OpenAI-compatible API, without the `/chat/completions` suffix.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout. Unset means the request may block indefinitely.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key_env: default_api_key_env(),
            model: default_model(),
            base_url: default_base_url(),
            timeout_secs: None,
        }
    }
}

impl OpenAiConfig {
    /// Parse and validate the configured base URL.
    pub fn parsed_base_url(&self) -> Result<Url> {
        let url = Url::parse(&self.base_url).map_err(|e| {
            DischargeError::config(format!("invalid base_url '{}': {e}", self.base_url))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(DischargeError::config(format!(
                "base_url must be http or https, got '{}'",
                url.scheme()
            )));
        }
        Ok(url)
    }
}

fn default_api_key_env() -> String {
    "OPENAI".into()
}
fn default_model() -> String {
    "gpt-4o".into()
}
fn default_base_url() -> String {
    "https://api.openai.com/v1".into()
}

// ---------------------------------------------------------------------------
// Credential
// ---------------------------------------------------------------------------

/// An API key resolved once at startup.
#[derive(Clone)]
pub struct Credential(String);

impl Credential {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// The raw key, for the `Authorization` header only.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

/// Read the API key from the configured env var. Empty counts as unset.
pub fn resolve_credential(config: &AppConfig) -> Result<Credential> {
    let var_name = &config.openai.api_key_env;
    credential_from(var_name, std::env::var(var_name).ok())
}

fn credential_from(var_name: &str, value: Option<String>) -> Result<Credential> {
    match value {
        Some(val) if !val.is_empty() => {
            tracing::debug!(var = %var_name, "API key resolved");
            Ok(Credential::new(val))
        }
        _ => Err(DischargeError::MissingCredential {
            var: var_name.to_string(),
        }),
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.vetdischarge/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| DischargeError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.vetdischarge/vetdischarge.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = match config_file_path() {
        Ok(path) => path,
        Err(e) => {
            tracing::debug!(error = %e, "no home directory, using default config");
            return Ok(AppConfig::default());
        }
    };

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content =
        std::fs::read_to_string(path).map_err(|e| DischargeError::file_access(path, e))?;

    let config: AppConfig = toml::from_str(&content).map_err(|e| {
        DischargeError::config(format!("failed to parse {}: {e}", path.display()))
    })?;
    config.openai.parsed_base_url()?;

    tracing::debug!(?path, model = %config.openai.model, "config loaded");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let config = AppConfig::default();
        assert_eq!(config.defaults.output_dir, "solution");
        assert_eq!(config.openai.api_key_env, "OPENAI");
        assert_eq!(config.openai.model, "gpt-4o");
        assert!(config.openai.timeout_secs.is_none());
    }

    #[test]
    fn config_roundtrip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        assert!(toml_str.contains("api_key_env"));
        let parsed: AppConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.openai.base_url, "https://api.openai.com/v1");
    }

    #[test]
    fn partial_config_fills_defaults() {
        let toml_str = r#"
[openai]
model = "gpt-4o-mini"
timeout_secs = 30
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.openai.model, "gpt-4o-mini");
        assert_eq!(config.openai.timeout_secs, Some(30));
        assert_eq!(config.openai.api_key_env, "OPENAI");
        assert_eq!(config.defaults.output_dir, "solution");
    }

    #[test]
    fn load_config_from_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("vetdischarge.toml");
        std::fs::write(&path, "[defaults]\noutput_dir = \"notes\"\n").expect("write");

        let config = load_config_from(&path).expect("load");
        assert_eq!(config.defaults.output_dir, "notes");
    }

    #[test]
    fn load_config_rejects_bad_base_url() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("vetdischarge.toml");
        std::fs::write(&path, "[openai]\nbase_url = \"ftp://example.com\"\n").expect("write");

        let err = load_config_from(&path).unwrap_err();
        assert!(err.to_string().contains("http or https"));
    }

    #[test]
    fn load_config_missing_file_is_file_access() {
        let err = load_config_from(Path::new("/nonexistent/vetdischarge.toml")).unwrap_err();
        assert!(matches!(err, DischargeError::FileAccess { .. }));
    }

    #[test]
    fn missing_credential() {
        let mut config = AppConfig::default();
        // Use a unique env var name to avoid interfering with other tests
        config.openai.api_key_env = "VD_TEST_NONEXISTENT_KEY_12345".into();
        let err = resolve_credential(&config).unwrap_err();
        assert!(err.is_missing_credential());
        assert!(err.to_string().contains("VD_TEST_NONEXISTENT_KEY_12345"));
    }

    #[test]
    fn only_empty_key_counts_as_missing() {
        let err = credential_from("OPENAI", Some(String::new())).unwrap_err();
        assert!(err.is_missing_credential());
        assert!(credential_from("OPENAI", None).unwrap_err().is_missing_credential());

        let cred = credential_from("OPENAI", Some(" ".into())).expect("non-empty key");
        assert_eq!(cred.expose(), " ");
    }

    #[test]
    fn credential_debug_is_redacted() {
        let cred = Credential::new("sk-secret");
        assert_eq!(format!("{cred:?}"), "Credential(<redacted>)");
        assert_eq!(cred.expose(), "sk-secret");
    }
}
