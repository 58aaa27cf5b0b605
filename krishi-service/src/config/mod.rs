use secrecy::{ExposeSecret, Secret};
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;

/// Every OpenAI secret key starts with this.
const KEY_PREFIX: &str = "sk-";

/// Value shipped in sample `.env` files; treated the same as no key at all.
const PLACEHOLDER_KEY_PREFIX: &str = "sk-YOUR";

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_MAX_TOKENS: u32 = 500;
const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Default multipart body limit (10 MiB).
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct KrishiConfig {
    pub common: core_config::Config,
    pub openai: OpenAiConfig,
    pub uploads: UploadConfig,
    pub otlp_endpoint: Option<String>,
}

#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: Option<Secret<String>>,
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

#[derive(Debug, Clone)]
pub struct UploadConfig {
    pub max_upload_bytes: usize,
}

impl KrishiConfig {
    pub fn load() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;

        Ok(KrishiConfig {
            common: common_config,
            openai: OpenAiConfig {
                api_key: env::var("OPENAI_API_KEY").ok().map(Secret::new),
                base_url: get_env("OPENAI_BASE_URL", DEFAULT_BASE_URL),
                model: get_env("OPENAI_MODEL", DEFAULT_MODEL),
                max_tokens: parse_env("OPENAI_MAX_TOKENS", DEFAULT_MAX_TOKENS)?,
                temperature: parse_env("OPENAI_TEMPERATURE", DEFAULT_TEMPERATURE)?,
            },
            uploads: UploadConfig {
                max_upload_bytes: parse_env("KRISHI_MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
            },
            otlp_endpoint: env::var("OTLP_ENDPOINT").ok().filter(|v| !v.is_empty()),
        })
    }
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl OpenAiConfig {
    /// The credential, or `None` when it is missing, not an `sk-` key, or
    /// still the placeholder. `None` puts the service in fallback-only mode.
    pub fn credential(&self) -> Option<&Secret<String>> {
        self.api_key.as_ref().filter(|key| {
            let key = key.expose_secret().trim();
            key.starts_with(KEY_PREFIX) && !key.starts_with(PLACEHOLDER_KEY_PREFIX)
        })
    }
}

fn get_env(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_env<T>(key: &str, default: T) -> Result<T, AppError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw.trim().parse().map_err(|e| {
            AppError::ConfigError(anyhow::anyhow!("{} has an invalid value '{}': {}", key, raw, e))
        }),
        Err(_) => Ok(default),
    }
}
