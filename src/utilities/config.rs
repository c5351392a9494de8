//! Runtime configuration.
//!
//! Resolution order, later wins: built-in defaults, optional YAML file,
//! `REDDIT_PERSONA_*` environment variables, command-line flags (applied by
//! the binary). API keys are never part of this struct; they come from
//! flags or the providers' own environment variables.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::utilities::errors::ConfigError;

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (compatible; RedditUserPersonaBot/0.1)";
pub const DEFAULT_REDDIT_BASE_URL: &str = "https://www.reddit.com";
pub const DEFAULT_FETCH_LIMIT: u32 = 100;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_NARRATIVE_TIMEOUT_SECS: u64 = 120;

pub const ENV_USER_AGENT: &str = "REDDIT_PERSONA_USER_AGENT";
pub const ENV_LIMIT: &str = "REDDIT_PERSONA_LIMIT";
pub const ENV_OUTPUT_DIR: &str = "REDDIT_PERSONA_OUTPUT_DIR";

/// Settings for the OpenAI narrative backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenAiSettings {
    pub model: String,
    pub base_url: String,
    pub max_tokens: u32,
    /// Per-request timeout for completion calls.
    pub timeout_secs: u64,
}

impl Default for OpenAiSettings {
    fn default() -> Self {
        Self {
            model: "gpt-3.5-turbo".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            max_tokens: 800,
            timeout_secs: DEFAULT_NARRATIVE_TIMEOUT_SECS,
        }
    }
}

/// Settings for the Hugging Face Inference API backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HuggingFaceSettings {
    pub model: String,
    pub base_url: String,
    pub max_new_tokens: u32,
    pub timeout_secs: u64,
}

impl Default for HuggingFaceSettings {
    fn default() -> Self {
        Self {
            model: "mistralai/Mixtral-8x7B-Instruct-v0.1".to_string(),
            base_url: "https://api-inference.huggingface.co".to_string(),
            max_new_tokens: 800,
            timeout_secs: DEFAULT_NARRATIVE_TIMEOUT_SECS,
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonaConfig {
    /// User-Agent sent to Reddit.
    pub user_agent: String,
    /// Items requested per listing.
    pub limit: u32,
    pub reddit_base_url: String,
    /// Directory the report file is written to.
    pub output_dir: PathBuf,
    pub request_timeout_secs: u64,
    pub openai: OpenAiSettings,
    pub huggingface: HuggingFaceSettings,
}

impl Default for PersonaConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            limit: DEFAULT_FETCH_LIMIT,
            reddit_base_url: DEFAULT_REDDIT_BASE_URL.to_string(),
            output_dir: PathBuf::from("."),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            openai: OpenAiSettings::default(),
            huggingface: HuggingFaceSettings::default(),
        }
    }
}

impl PersonaConfig {
    /// Parse a YAML document. Missing keys keep their defaults.
    pub fn from_yaml(yaml: &str, origin: &Path) -> Result<Self, ConfigError> {
        serde_yaml::from_str(yaml).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })
    }

    /// Load a YAML config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&content, path)
    }

    /// Defaults, then `path` if given, then the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Apply `REDDIT_PERSONA_*` overrides from `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(agent) = lookup(ENV_USER_AGENT).filter(|v| !v.trim().is_empty()) {
            self.user_agent = agent;
        }
        if let Some(raw) = lookup(ENV_LIMIT) {
            self.limit = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: ENV_LIMIT.to_string(),
                value: raw.clone(),
            })?;
        }
        if let Some(dir) = lookup(ENV_OUTPUT_DIR).filter(|v| !v.trim().is_empty()) {
            self.output_dir = PathBuf::from(dir);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_match_reddit_conventions() {
        let config = PersonaConfig::default();
        assert_eq!(config.limit, 100);
        assert_eq!(config.user_agent, DEFAULT_USER_AGENT);
        assert_eq!(config.openai.model, "gpt-3.5-turbo");
        assert_eq!(config.huggingface.max_new_tokens, 800);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = r#"
limit: 25
huggingface:
  model: "tiiuae/falcon-7b-instruct"
"#;
        let config = PersonaConfig::from_yaml(yaml, Path::new("inline")).unwrap();
        assert_eq!(config.limit, 25);
        assert_eq!(config.huggingface.model, "tiiuae/falcon-7b-instruct");
        assert_eq!(config.huggingface.max_new_tokens, 800);
        assert_eq!(config.reddit_base_url, DEFAULT_REDDIT_BASE_URL);
        assert_eq!(config.openai.timeout_secs, DEFAULT_NARRATIVE_TIMEOUT_SECS);
    }

    #[test]
    fn test_narrative_timeouts_are_configurable() {
        let yaml = "openai:\n  timeout_secs: 15\nhuggingface:\n  timeout_secs: 45\n";
        let config = PersonaConfig::from_yaml(yaml, Path::new("inline")).unwrap();
        assert_eq!(config.openai.timeout_secs, 15);
        assert_eq!(config.huggingface.timeout_secs, 45);
        assert_eq!(config.request_timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn test_invalid_yaml_is_parse_error() {
        let err = PersonaConfig::from_yaml("limit: [oops", Path::new("bad.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("bad.yaml"));
    }

    #[test]
    fn test_from_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("persona.yaml");
        std::fs::write(&path, "output_dir: reports\nrequest_timeout_secs: 5\n").unwrap();

        let config = PersonaConfig::from_file(&path).unwrap();
        assert_eq!(config.output_dir, PathBuf::from("reports"));
        assert_eq!(config.request_timeout_secs, 5);
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let err = PersonaConfig::from_file(Path::new("/nonexistent/persona.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            (ENV_USER_AGENT, "test-agent/1.0"),
            (ENV_LIMIT, " 10 "),
            (ENV_OUTPUT_DIR, "/tmp/personas"),
        ]
        .into_iter()
        .collect();

        let mut config = PersonaConfig::default();
        config
            .apply_overrides(|k| env.get(k).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.user_agent, "test-agent/1.0");
        assert_eq!(config.limit, 10);
        assert_eq!(config.output_dir, PathBuf::from("/tmp/personas"));
    }

    #[test]
    fn test_bad_limit_override_is_rejected() {
        let mut config = PersonaConfig::default();
        let err = config
            .apply_overrides(|k| (k == ENV_LIMIT).then(|| "many".to_string()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }
}
