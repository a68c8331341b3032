//! Wire types for the upstream responses protocol
//!
//! The upstream service speaks a flat input-item contract: conversation
//! history is a single ordered list of message, function-call, and
//! function-call-output items, and results arrive as one non-incremental
//! JSON body. Field names here must match the upstream wire format exactly.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::messages::types::Role;

/// Text entry inside a message input item
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputContent {
    /// Text authored by the caller side (user or system)
    InputText {
        /// The text content
        text: String,
    },
    /// Text previously produced by the model
    OutputText {
        /// The text content
        text: String,
    },
}

/// A single item in the flat input list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputItem {
    /// A conversational message with text content
    Message {
        /// Author role
        role: Role,
        /// Ordered text entries
        content: Vec<InputContent>,
    },
    /// A previously issued tool invocation
    FunctionCall {
        /// Correlation id
        call_id: String,
        /// Function name
        name: String,
        /// JSON-encoded arguments
        arguments: String,
    },
    /// The caller-supplied result of a tool invocation
    FunctionCallOutput {
        /// Correlation id of the call this answers
        call_id: String,
        /// Result payload
        output: String,
    },
}

/// Function tool definition in the upstream format
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FunctionTool {
    /// Tool kind (always "function")
    #[serde(rename = "type")]
    pub kind: String,
    /// Function name
    pub name: String,
    /// Human-readable description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// JSON Schema for the function parameters
    pub parameters: Value,
}

impl FunctionTool {
    /// Tool kind tag used by the upstream protocol
    pub const KIND: &'static str = "function";
}

/// Tool selection constraint in the upstream format
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ToolChoice {
    /// A mode keyword: "auto", "none", or "required"
    Mode(String),
    /// Force a specific function
    Function {
        /// Choice kind (always "function")
        #[serde(rename = "type")]
        kind: String,
        /// Function name
        name: String,
    },
}

/// Reasoning settings forwarded upstream
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Reasoning {
    /// Requested reasoning depth
    pub effort: String,
}

/// Request body for the upstream responses endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResponsesRequest {
    /// Model identifier
    pub model: String,
    /// Flat ordered input-item list
    pub input: Vec<InputItem>,
    /// Sampling temperature
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    /// Nucleus sampling parameter
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    /// Stop sequences
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop: Option<Vec<String>>,
    /// Maximum tokens to generate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u64>,
    /// Function tool definitions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<FunctionTool>>,
    /// Tool selection constraint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_choice: Option<ToolChoice>,
    /// Reasoning settings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<Reasoning>,
    /// Opaque caller metadata
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

// ============================================================================
// Result Types
// ============================================================================

/// A tool call inside a message's tool-calls content entry
///
/// Every field is optional: results are reconstructed best-effort and a
/// missing id or name is resolved downstream, never a parse failure.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ToolCallEntry {
    /// Call identifier
    #[serde(default)]
    pub id: Option<String>,
    /// Function name
    #[serde(default)]
    pub name: Option<String>,
    /// JSON-encoded arguments
    #[serde(default)]
    pub arguments: Option<String>,
}

/// Content entry inside an output message item
///
/// Text payloads are kept as raw JSON because some upstreams emit
/// non-string values; the translator coerces them. Unrecognized entry
/// kinds collapse to `Unknown` and are skipped.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutputContent {
    /// Generated text
    OutputText {
        /// Raw text payload
        #[serde(default)]
        text: Value,
    },
    /// Summarized text (treated the same as generated text)
    SummaryText {
        /// Raw text payload
        #[serde(default)]
        text: Value,
    },
    /// Embedded tool calls
    ToolCalls {
        /// The calls in this entry
        #[serde(default)]
        tool_calls: Vec<ToolCallEntry>,
    },
    /// Any entry kind this proxy does not understand
    #[serde(other)]
    Unknown,
}

/// An item in the upstream result's output list
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutputItem {
    /// A generated message
    Message {
        /// Author role
        #[serde(default)]
        role: Option<String>,
        /// Ordered content entries
        #[serde(default)]
        content: Vec<OutputContent>,
        /// Stop reason reported on this item
        #[serde(default)]
        stop_reason: Option<String>,
    },
    /// A standalone tool invocation
    FunctionCall {
        /// Correlation id
        #[serde(default)]
        call_id: Option<String>,
        /// Item id
        #[serde(default)]
        id: Option<String>,
        /// Function name
        #[serde(default)]
        name: Option<String>,
        /// JSON-encoded arguments
        #[serde(default)]
        arguments: Option<String>,
    },
    /// Any item kind this proxy does not understand
    #[serde(other)]
    Unknown,
}

/// Usage counters reported by the upstream service
///
/// Accepts both the native spelling and the legacy
/// prompt/completion spelling.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct ResponsesUsage {
    /// Tokens consumed by the prompt
    #[serde(default)]
    pub input_tokens: Option<u64>,
    /// Tokens produced by the completion
    #[serde(default)]
    pub output_tokens: Option<u64>,
    /// Legacy spelling of input tokens
    #[serde(default)]
    pub prompt_tokens: Option<u64>,
    /// Legacy spelling of output tokens
    #[serde(default)]
    pub completion_tokens: Option<u64>,
}

/// Completed result from the upstream responses endpoint
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct ResponsesResult {
    /// Result identifier
    #[serde(default)]
    pub id: Option<String>,
    /// Model that produced the result
    #[serde(default)]
    pub model: Option<String>,
    /// Ordered output items
    #[serde(default)]
    pub output: Vec<OutputItem>,
    /// Flat text fallback some upstreams populate
    #[serde(default)]
    pub output_text: Option<Value>,
    /// Usage counters
    #[serde(default)]
    pub usage: Option<ResponsesUsage>,
}
