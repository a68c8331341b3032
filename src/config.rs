//! Configuration management for Janus
//!
//! Configuration is loaded from environment variables. The loaded value is
//! injected into components explicitly; core logic never reads the
//! environment itself.

use anyhow::{Context, Result};
use std::env;

use crate::translate::TranslationDefaults;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,

    /// Upstream responses endpoint URL
    pub upstream_url: String,
    /// Upstream API key
    pub upstream_api_key: String,
    /// Upstream request timeout in seconds
    pub upstream_timeout_secs: u64,

    /// Model used when a request does not name one
    pub default_model: Option<String>,
    /// Reasoning effort applied when a request does not carry one
    pub default_reasoning_effort: Option<String>,

    /// Bearer token clients must present; unset disables authentication
    pub auth_token: Option<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            host: env::var("JANUS_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("JANUS_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("Invalid JANUS_PORT")?,

            upstream_url: env::var("UPSTREAM_API_URL")
                .context("UPSTREAM_API_URL must be set")?,
            upstream_api_key: env::var("UPSTREAM_API_KEY")
                .context("UPSTREAM_API_KEY must be set")?,
            upstream_timeout_secs: env::var("UPSTREAM_TIMEOUT_SECS")
                .unwrap_or_else(|_| "60".to_string())
                .parse()
                .context("Invalid UPSTREAM_TIMEOUT_SECS")?,

            default_model: env::var("DEFAULT_MODEL").ok(),
            default_reasoning_effort: env::var("DEFAULT_REASONING_EFFORT").ok(),

            auth_token: env::var("JANUS_AUTH_TOKEN").ok(),
        })
    }

    /// Fallbacks handed to the request translator
    pub fn translation_defaults(&self) -> TranslationDefaults {
        TranslationDefaults {
            model: self.default_model.clone(),
            reasoning_effort: self.default_reasoning_effort.clone(),
        }
    }
}
