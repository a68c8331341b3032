//! Core types for the messages protocol
//!
//! Defines roles, typed content blocks, and the content normalizer that
//! canonicalizes heterogeneous client content (plain strings, arrays of
//! typed blocks) into a uniform ordered sequence of `ContentBlock` values.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::translate::TranslationError;

/// Role of a message participant
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System message providing instructions or context
    System,
    /// User message from the human
    User,
    /// Assistant message from the AI
    Assistant,
}

/// A typed unit of message content
///
/// Content blocks are an explicit tagged union so every consumption site
/// matches exhaustively; an unrecognized block kind is rejected during
/// normalization rather than silently falling through.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    /// Text content
    Text {
        /// The text content
        text: String,
    },
    /// A model-issued request to invoke a named tool
    ToolUse {
        /// Unique identifier correlating the eventual result
        id: String,
        /// Tool name
        name: String,
        /// Structured tool arguments
        #[serde(default)]
        input: Value,
    },
    /// A caller-supplied result for a previously issued tool use
    ToolResult {
        /// Identifier of the tool use this result answers
        tool_use_id: String,
        /// Result payload - a string or an array of text blocks
        #[serde(default, skip_serializing_if = "Option::is_none")]
        content: Option<Value>,
        /// Plain-text fallback payload
        #[serde(default, skip_serializing_if = "Option::is_none")]
        text: Option<String>,
        /// Whether the tool invocation failed
        #[serde(default, skip_serializing_if = "Option::is_none")]
        is_error: Option<bool>,
        /// Caller-reported status
        #[serde(default, skip_serializing_if = "Option::is_none")]
        status: Option<String>,
    },
}

/// A chat message with role and content
///
/// Content is kept as raw JSON until it passes through
/// [`normalize_content`]: clients send either a plain string or a
/// heterogeneous array, and the normalizer owns the error taxonomy for
/// malformed blocks.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    /// The role of the message author
    pub role: Role,
    /// Raw content as received from the client
    #[serde(default)]
    pub content: Value,
}

/// Coerce an arbitrary JSON value to text
///
/// Strings pass through, null becomes the empty string, other scalars are
/// stringified, arrays are flattened recursively and concatenated, and
/// objects are JSON-serialized as a last resort.
pub fn coerce_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        Value::Bool(flag) => flag.to_string(),
        Value::Number(number) => number.to_string(),
        Value::Array(items) => items.iter().map(coerce_text).collect(),
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}

/// Canonicalize raw message content into an ordered sequence of blocks
///
/// A non-array value is coerced to text and becomes a single `Text` block
/// (so empty string content yields one empty text block). Array elements
/// must be strings or objects carrying a recognized `type` discriminator.
///
/// # Errors
///
/// Returns `UnsupportedContentBlock` for unrecognized or untyped elements,
/// `MalformedToolUse` when a tool_use block is missing `id` or `name`, and
/// `MalformedToolResult` when a tool_result block is missing `tool_use_id`.
pub fn normalize_content(content: &Value) -> Result<Vec<ContentBlock>, TranslationError> {
    let items = match content {
        Value::Array(items) => items,
        other => {
            return Ok(vec![ContentBlock::Text {
                text: coerce_text(other),
            }]);
        }
    };

    let mut blocks = Vec::with_capacity(items.len());
    for item in items {
        match item {
            Value::String(text) => blocks.push(ContentBlock::Text { text: text.clone() }),
            Value::Object(object) => blocks.push(normalize_block(object)?),
            other => {
                return Err(TranslationError::UnsupportedContentBlock(format!(
                    "expected string or object, got {}",
                    json_kind(other)
                )));
            }
        }
    }
    Ok(blocks)
}

/// Normalize a single object element into a typed block
fn normalize_block(object: &serde_json::Map<String, Value>) -> Result<ContentBlock, TranslationError> {
    let kind = object
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| TranslationError::UnsupportedContentBlock("missing type".to_string()))?;

    match kind {
        "text" => Ok(ContentBlock::Text {
            text: coerce_text(object.get("text").unwrap_or(&Value::Null)),
        }),
        "tool_use" => {
            let id = object
                .get("id")
                .and_then(Value::as_str)
                .ok_or(TranslationError::MalformedToolUse)?;
            let name = object
                .get("name")
                .and_then(Value::as_str)
                .ok_or(TranslationError::MalformedToolUse)?;
            Ok(ContentBlock::ToolUse {
                id: id.to_string(),
                name: name.to_string(),
                input: object.get("input").cloned().unwrap_or(Value::Null),
            })
        }
        "tool_result" => {
            let tool_use_id = object
                .get("tool_use_id")
                .and_then(Value::as_str)
                .ok_or(TranslationError::MalformedToolResult)?;
            Ok(ContentBlock::ToolResult {
                tool_use_id: tool_use_id.to_string(),
                content: object.get("content").filter(|v| !v.is_null()).cloned(),
                text: object
                    .get("text")
                    .and_then(Value::as_str)
                    .map(str::to_string),
                is_error: object.get("is_error").and_then(Value::as_bool),
                status: object
                    .get("status")
                    .and_then(Value::as_str)
                    .map(str::to_string),
            })
        }
        other => Err(TranslationError::UnsupportedContentBlock(other.to_string())),
    }
}

/// Human-readable name of a JSON value's kind, for error messages
fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
