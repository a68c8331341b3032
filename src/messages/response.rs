//! Response types for the messages protocol

use serde::{Deserialize, Serialize};

use super::types::{ContentBlock, Role};

/// Token usage statistics
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Usage {
    /// Tokens consumed by the prompt
    pub input_tokens: u64,
    /// Tokens produced by the completion
    pub output_tokens: u64,
}

/// Messages API response (non-streaming)
///
/// `content` is never empty: when the upstream produced nothing, a single
/// empty text block stands in. `stop_sequence` is always serialized, as
/// clients expect an explicit null.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MessagesResponse {
    /// Response identifier
    pub id: String,
    /// Object type (always "message")
    #[serde(rename = "type")]
    pub kind: String,
    /// Role (always "assistant")
    pub role: Role,
    /// Model that produced the response
    pub model: String,
    /// Ordered content blocks
    pub content: Vec<ContentBlock>,
    /// Terminal classification of why generation ended
    pub stop_reason: Option<String>,
    /// Stop sequence that ended generation (never set by this proxy)
    pub stop_sequence: Option<String>,
    /// Token usage
    pub usage: Usage,
}

impl MessagesResponse {
    /// Object type tag carried by every response
    pub const KIND: &'static str = "message";
}
