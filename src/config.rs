use crate::error::{CopyError, Result};
use crate::prompt::DEFAULT_MAX_FIELD_CHARS;
use std::env;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_GEMINI_TEXT_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_GEMINI_IMAGE_MODEL: &str = "gemini-2.0-flash-preview-image-generation";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_BEDROCK_TEXT_MODEL: &str = "amazon.titan-text-express-v1";
pub const DEFAULT_BEDROCK_IMAGE_MODEL: &str = "amazon.titan-image-generator-v1";
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_CALL_TIMEOUT_SECS: u64 = 60;

fn env_lookup(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

/// Which generation service backs the orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Provider {
    #[default]
    Gemini,
    Bedrock,
}

impl FromStr for Provider {
    type Err = CopyError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gemini" | "google" => Ok(Provider::Gemini),
            "bedrock" | "aws" => Ok(Provider::Bedrock),
            other => Err(CopyError::ConfigError(format!("Unknown provider: {}", other))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct BedrockConfig {
    pub region: Option<String>,
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
    pub text_model_id: String,
    pub image_model_id: String,
    pub temperature: f32,
    pub max_tokens: i32,
}

impl Default for BedrockConfig {
    fn default() -> Self {
        BedrockConfig {
            region: None,
            access_key: None,
            secret_key: None,
            text_model_id: DEFAULT_BEDROCK_TEXT_MODEL.to_string(),
            image_model_id: DEFAULT_BEDROCK_IMAGE_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: 512,
        }
    }
}

impl BedrockConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        Self::from_lookup(env_lookup)
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        BedrockConfig {
            region: lookup("AWS_REGION").or_else(|| lookup("AWS_DEFAULT_REGION")),
            access_key: lookup("AWS_ACCESS_KEY_ID"),
            secret_key: lookup("AWS_SECRET_ACCESS_KEY"),
            text_model_id: lookup("BEDROCK_TEXT_MODEL").unwrap_or(defaults.text_model_id),
            image_model_id: lookup("BEDROCK_IMAGE_MODEL").unwrap_or(defaults.image_model_id),
            temperature: lookup("BEDROCK_TEMPERATURE")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.temperature),
            max_tokens: lookup("BEDROCK_MAX_TOKENS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_tokens),
        }
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn with_credentials(
        mut self,
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Self {
        self.access_key = Some(access_key.into());
        self.secret_key = Some(secret_key.into());
        self
    }

    pub fn with_models(
        mut self,
        text_model_id: impl Into<String>,
        image_model_id: impl Into<String>,
    ) -> Self {
        self.text_model_id = text_model_id.into();
        self.image_model_id = image_model_id.into();
        self
    }
}

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub text_model: String,
    pub image_model: String,
    pub temperature: f32,
    pub base_url: String,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        GeminiConfig {
            api_key: None,
            text_model: DEFAULT_GEMINI_TEXT_MODEL.to_string(),
            image_model: DEFAULT_GEMINI_IMAGE_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
        }
    }
}

impl GeminiConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        Self::from_lookup(env_lookup)
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        GeminiConfig {
            api_key: lookup("GOOGLE_API_KEY").or_else(|| lookup("GEMINI_API_KEY")),
            text_model: lookup("GEMINI_TEXT_MODEL").unwrap_or(defaults.text_model),
            image_model: lookup("GEMINI_IMAGE_MODEL").unwrap_or(defaults.image_model),
            temperature: lookup("GEMINI_TEMPERATURE")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.temperature),
            base_url: lookup("GEMINI_BASE_URL").unwrap_or(defaults.base_url),
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_models(mut self, text_model: impl Into<String>, image_model: impl Into<String>) -> Self {
        self.text_model = text_model.into();
        self.image_model = image_model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

/// How the image slots of one request are dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageDispatch {
    #[default]
    Sequential,
    Concurrent,
}

impl FromStr for ImageDispatch {
    type Err = CopyError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sequential" => Ok(ImageDispatch::Sequential),
            "concurrent" | "parallel" => Ok(ImageDispatch::Concurrent),
            other => Err(CopyError::ConfigError(format!(
                "Unknown image dispatch mode: {}",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Upper bound on a single backend call; a slot that runs over becomes a timeout failure.
    pub call_timeout: Duration,
    pub image_dispatch: ImageDispatch,
    pub max_field_chars: usize,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        OrchestratorConfig {
            call_timeout: Duration::from_secs(DEFAULT_CALL_TIMEOUT_SECS),
            image_dispatch: ImageDispatch::Sequential,
            max_field_chars: DEFAULT_MAX_FIELD_CHARS,
        }
    }
}

impl OrchestratorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Result<Self> {
        Self::from_lookup(env_lookup)
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();
        if let Some(secs) = lookup("COPYSMITH_CALL_TIMEOUT_SECS") {
            let secs: u64 = secs.parse().map_err(|_| {
                CopyError::ConfigError(format!("Invalid COPYSMITH_CALL_TIMEOUT_SECS: {}", secs))
            })?;
            config.call_timeout = Duration::from_secs(secs);
        }
        if let Some(mode) = lookup("COPYSMITH_IMAGE_DISPATCH") {
            config.image_dispatch = mode.parse()?;
        }
        if let Some(chars) = lookup("COPYSMITH_MAX_FIELD_CHARS") {
            config.max_field_chars = chars.parse().map_err(|_| {
                CopyError::ConfigError(format!("Invalid COPYSMITH_MAX_FIELD_CHARS: {}", chars))
            })?;
        }
        Ok(config)
    }

    pub fn with_call_timeout(mut self, call_timeout: Duration) -> Self {
        self.call_timeout = call_timeout;
        self
    }

    pub fn with_image_dispatch(mut self, image_dispatch: ImageDispatch) -> Self {
        self.image_dispatch = image_dispatch;
        self
    }

    pub fn with_max_field_chars(mut self, max_field_chars: usize) -> Self {
        self.max_field_chars = max_field_chars;
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub provider: Provider,
    pub bedrock: BedrockConfig,
    pub gemini: GeminiConfig,
    pub orchestrator: OrchestratorConfig,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Result<Self> {
        Self::from_lookup(env_lookup)
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let provider = match lookup("COPYSMITH_PROVIDER") {
            Some(name) => name.parse()?,
            None => Provider::default(),
        };

        Ok(Config {
            provider,
            bedrock: BedrockConfig::from_lookup(&lookup),
            gemini: GeminiConfig::from_lookup(&lookup),
            orchestrator: OrchestratorConfig::from_lookup(&lookup)?,
        })
    }

    pub fn with_provider(mut self, provider: Provider) -> Self {
        self.provider = provider;
        self
    }

    pub fn with_bedrock(mut self, config: BedrockConfig) -> Self {
        self.bedrock = config;
        self.provider = Provider::Bedrock;
        self
    }

    pub fn with_gemini(mut self, config: GeminiConfig) -> Self {
        self.gemini = config;
        self.provider = Provider::Gemini;
        self
    }

    pub fn with_orchestrator(mut self, config: OrchestratorConfig) -> Self {
        self.orchestrator = config;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_env() {
        let config = Config::from_lookup(vars(&[])).unwrap();
        assert_eq!(config.provider, Provider::Gemini);
        assert_eq!(config.gemini.text_model, DEFAULT_GEMINI_TEXT_MODEL);
        assert_eq!(config.gemini.api_key, None);
        assert_eq!(config.bedrock.image_model_id, DEFAULT_BEDROCK_IMAGE_MODEL);
        assert_eq!(config.orchestrator.image_dispatch, ImageDispatch::Sequential);
        assert_eq!(config.orchestrator.call_timeout, Duration::from_secs(60));
    }

    #[test]
    fn test_reads_overrides() {
        let config = Config::from_lookup(vars(&[
            ("COPYSMITH_PROVIDER", "bedrock"),
            ("COPYSMITH_IMAGE_DISPATCH", "concurrent"),
            ("COPYSMITH_CALL_TIMEOUT_SECS", "15"),
            ("AWS_DEFAULT_REGION", "eu-west-1"),
            ("GOOGLE_API_KEY", "key-123"),
        ]))
        .unwrap();

        assert_eq!(config.provider, Provider::Bedrock);
        assert_eq!(config.orchestrator.image_dispatch, ImageDispatch::Concurrent);
        assert_eq!(config.orchestrator.call_timeout, Duration::from_secs(15));
        assert_eq!(config.bedrock.region.as_deref(), Some("eu-west-1"));
        assert_eq!(config.gemini.api_key.as_deref(), Some("key-123"));
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(Config::from_lookup(vars(&[("COPYSMITH_PROVIDER", "openai")])).is_err());
        assert!(Config::from_lookup(vars(&[("COPYSMITH_CALL_TIMEOUT_SECS", "soon")])).is_err());
    }

    #[test]
    fn test_builders() {
        let config = Config::new()
            .with_bedrock(BedrockConfig::new().with_region("us-west-2"))
            .with_orchestrator(OrchestratorConfig::new().with_image_dispatch(ImageDispatch::Concurrent));
        assert_eq!(config.provider, Provider::Bedrock);
        assert_eq!(config.bedrock.region.as_deref(), Some("us-west-2"));
        assert_eq!(config.orchestrator.image_dispatch, ImageDispatch::Concurrent);
    }
}
