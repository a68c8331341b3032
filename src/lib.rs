//! Janus - protocol translation proxy
//!
//! This library provides the core functionality for the Janus proxy
//! server: bidirectional translation between a message-oriented chat
//! protocol (structured content blocks, tool-use semantics, SSE
//! streaming) and a flat input-item protocol spoken by the upstream
//! service.

pub mod config;
pub mod error;
pub mod messages;
pub mod middleware;
pub mod responses;
pub mod routes;
pub mod translate;
pub mod upstream;

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;

pub use crate::config::Config;
pub use crate::upstream::{HttpResponsesBackend, ResponsesBackend};

/// Application state shared across all request handlers
pub struct AppState {
    pub config: Config,
    pub http_client: reqwest::Client,
    pub start_time: Instant,
    /// Backend for executing the single upstream call of each exchange
    pub backend: Arc<dyn ResponsesBackend>,
}

impl AppState {
    /// Create a new application state
    pub fn new(config: Config) -> Result<Self> {
        // HTTP client with connection pooling; the timeout bounds the one
        // outbound call an exchange makes.
        let http_client = reqwest::Client::builder()
            .pool_max_idle_per_host(100)
            .timeout(Duration::from_secs(config.upstream_timeout_secs))
            .build()?;

        let backend: Arc<dyn ResponsesBackend> =
            Arc::new(HttpResponsesBackend::new(http_client.clone(), &config));

        Ok(Self {
            config,
            http_client,
            start_time: Instant::now(),
            backend,
        })
    }
}
