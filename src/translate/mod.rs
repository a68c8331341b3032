//! Translation between the messages protocol and the upstream responses
//! protocol
//!
//! The request direction ([`translate_request`]) is strict: a request that
//! cannot be expressed upstream fails as a whole, before any outbound call
//! is made. The response direction ([`translate_response`]) is best-effort
//! and never fails - by the time it runs the upstream call has already
//! succeeded, and an error here would strand the client with no legible
//! response.

pub mod request;
pub mod response;

use thiserror::Error;

/// Errors that can occur while translating an inbound request
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TranslationError {
    /// The request carried no messages at all
    #[error("request must contain at least one message")]
    EmptyMessages,

    /// A content block carried an unrecognized or missing discriminator
    #[error("unsupported content block: {0}")]
    UnsupportedContentBlock(String),

    /// A tool_use block was missing its id or name
    #[error("tool_use block requires both id and name")]
    MalformedToolUse,

    /// A tool_result block was missing its tool_use_id
    #[error("tool_result block requires tool_use_id")]
    MalformedToolResult,

    /// Neither the request nor the configuration named a model
    #[error("no model specified and no default model configured")]
    NoModelSpecified,
}

pub use request::{translate_request, TranslationDefaults};
pub use response::translate_response;
