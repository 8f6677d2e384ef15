use std::{env, net::SocketAddr, time::Duration};

use axum::http::HeaderValue;
use positivity_llm::{
    chat_completion::{DEFAULT_BASE_URL, DEFAULT_MODEL},
    ChatCompletionSettings,
};

use crate::error::ConfigError;
use crate::tone::request_validator::ContextPolicy;

const DEFAULT_CORS_ORIGINS: &str = "http://localhost:3000,http://frontend:3000";

/// Process-wide settings, read once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: String,
    pub bind_address: SocketAddr,
    pub llm: ChatCompletionSettings,
    pub llm_timeout: Duration,
    pub request_timeout: Duration,
    pub cors_origins: Vec<HeaderValue>,
    pub context_policy: ContextPolicy,
    pub tone_analysis: bool,
    pub debug_endpoints: bool,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let api_key = read("NGC_API_KEY").ok_or(ConfigError::Missing("NGC_API_KEY"))?;

        let mut llm = ChatCompletionSettings::new(api_key)
            .with_base_url(read("NGC_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()))
            .with_model(read("NGC_MODEL_ID").unwrap_or_else(|| DEFAULT_MODEL.to_string()));
        if let Some(org_id) = read("NGC_ORG_ID") {
            llm = llm.with_org_id(org_id);
        }

        let environment = read("APP_ENVIRONMENT").unwrap_or_else(|| "dev".to_string());

        let host = read("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = read("PORT").unwrap_or_else(|| "8000".to_string());
        let bind_address = format!("{}:{}", host, port)
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::Invalid {
                key: "HOST/PORT",
                message: e.to_string(),
            })?;

        let cors_origins = read("CORS_ORIGINS")
            .unwrap_or_else(|| DEFAULT_CORS_ORIGINS.to_string())
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(|origin| {
                HeaderValue::from_str(origin).map_err(|_| ConfigError::Invalid {
                    key: "CORS_ORIGINS",
                    message: format!("'{}' is not a valid origin", origin),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let context_policy = match read("CONTEXT_POLICY").as_deref() {
            None | Some("defaulting") => ContextPolicy::Defaulting,
            Some("strict") => ContextPolicy::Strict,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    key: "CONTEXT_POLICY",
                    message: format!("expected 'defaulting' or 'strict', got '{}'", other),
                })
            }
        };

        let is_dev = environment == "dev";

        Ok(Self {
            llm,
            bind_address,
            llm_timeout: parse_seconds("LLM_TIMEOUT_SECS", read("LLM_TIMEOUT_SECS"), 30)?,
            request_timeout: parse_seconds("REQUEST_TIMEOUT_SECS", read("REQUEST_TIMEOUT_SECS"), 60)?,
            cors_origins,
            context_policy,
            tone_analysis: parse_flag("ENABLE_TONE_ANALYSIS", read("ENABLE_TONE_ANALYSIS"), false)?,
            debug_endpoints: parse_flag(
                "ENABLE_DEBUG_ENDPOINTS",
                read("ENABLE_DEBUG_ENDPOINTS"),
                is_dev,
            )?,
            environment,
        })
    }

    pub fn is_dev(&self) -> bool {
        self.environment == "dev"
    }
}

fn parse_seconds(
    key: &'static str,
    value: Option<String>,
    default: u64,
) -> Result<Duration, ConfigError> {
    let Some(value) = value else {
        return Ok(Duration::from_secs(default));
    };
    match value.parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(ConfigError::Invalid {
            key,
            message: format!("expected a positive number of seconds, got '{}'", value),
        }),
    }
}

fn parse_flag(key: &'static str, value: Option<String>, default: bool) -> Result<bool, ConfigError> {
    let Some(value) = value else {
        return Ok(default);
    };
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            key,
            message: format!("expected a boolean, got '{}'", value),
        }),
    }
}
