//! Inbound request translation
//!
//! Maps a messages-protocol request onto the upstream responses protocol:
//! the system prompt becomes a leading system message item, each message's
//! content blocks are flattened into the input-item list in order, runs of
//! consecutive text blocks merge into a single item, and tool traffic
//! becomes function-call / function-call-output items.

use serde_json::Value;

use crate::messages::request::{MessagesRequest, ToolDefinition};
use crate::messages::types::{coerce_text, normalize_content, ContentBlock, Role};
use crate::responses::{
    FunctionTool, InputContent, InputItem, Reasoning, ResponsesRequest, ToolChoice,
};

use super::TranslationError;

/// Fallbacks injected from configuration
#[derive(Debug, Clone, Default)]
pub struct TranslationDefaults {
    /// Model used when the request does not name one
    pub model: Option<String>,
    /// Reasoning effort applied when the request does not carry one
    pub reasoning_effort: Option<String>,
}

/// Translate a messages-protocol request into an upstream request
///
/// # Errors
///
/// Fails as a whole - no partial output - on an empty message list, a
/// malformed or unsupported content block, or when neither the request nor
/// the defaults name a model.
pub fn translate_request(
    request: &MessagesRequest,
    defaults: &TranslationDefaults,
) -> Result<ResponsesRequest, TranslationError> {
    if request.messages.is_empty() {
        return Err(TranslationError::EmptyMessages);
    }

    let mut input = Vec::new();

    if let Some(system) = &request.system {
        input.push(InputItem::Message {
            role: Role::System,
            content: vec![InputContent::InputText {
                text: coerce_text(system),
            }],
        });
    }

    for message in &request.messages {
        let blocks = normalize_content(&message.content)?;
        flatten_message(&mut input, message.role, &blocks);
    }

    let model = resolve_model(request, defaults)?;
    let reasoning = resolve_reasoning(request, defaults);

    Ok(ResponsesRequest {
        model,
        input,
        temperature: request.temperature,
        top_p: request.top_p,
        stop: request
            .stop_sequences
            .clone()
            .filter(|sequences| !sequences.is_empty()),
        max_output_tokens: request.max_tokens,
        tools: map_tools(request.tools.as_deref()),
        tool_choice: request.tool_choice.as_ref().and_then(map_tool_choice),
        reasoning,
        metadata: request.metadata.clone(),
    })
}

/// Flatten one message's blocks into the input-item list
///
/// An explicit fold over a single text accumulator: consecutive text
/// blocks concatenate, and the pending run is flushed as one message item
/// whenever a non-text block appears or the message ends.
fn flatten_message(input: &mut Vec<InputItem>, role: Role, blocks: &[ContentBlock]) {
    let mut pending = String::new();

    for block in blocks {
        match block {
            ContentBlock::Text { text } => pending.push_str(text),
            ContentBlock::ToolUse {
                id,
                name,
                input: arguments,
            } => {
                flush_text(input, role, &mut pending);
                input.push(InputItem::FunctionCall {
                    call_id: id.clone(),
                    name: name.clone(),
                    arguments: encode_arguments(arguments),
                });
            }
            ContentBlock::ToolResult {
                tool_use_id,
                content,
                text,
                is_error,
                status,
            } => {
                flush_text(input, role, &mut pending);
                input.push(InputItem::FunctionCallOutput {
                    call_id: tool_use_id.clone(),
                    output: tool_result_output(
                        tool_use_id,
                        content.as_ref(),
                        text.as_deref(),
                        *is_error,
                        status.as_deref(),
                    ),
                });
            }
        }
    }

    flush_text(input, role, &mut pending);
}

/// Flush the pending text run as a single message item; empty runs are a
/// no-op
fn flush_text(input: &mut Vec<InputItem>, role: Role, pending: &mut String) {
    if pending.is_empty() {
        return;
    }
    let text = std::mem::take(pending);
    let entry = if role == Role::Assistant {
        InputContent::OutputText { text }
    } else {
        InputContent::InputText { text }
    };
    input.push(InputItem::Message {
        role,
        content: vec![entry],
    });
}

/// JSON-encode tool-use arguments, defaulting to an empty object
fn encode_arguments(input: &Value) -> String {
    if input.is_null() {
        return "{}".to_string();
    }
    serde_json::to_string(input).unwrap_or_else(|_| "{}".to_string())
}

/// Compute the output string for a tool result
///
/// String content passes through verbatim; array content concatenates the
/// `text` of its entries; otherwise a plain `text` field is used; as a last
/// resort the result's fields are JSON-encoded into one object.
fn tool_result_output(
    tool_use_id: &str,
    content: Option<&Value>,
    text: Option<&str>,
    is_error: Option<bool>,
    status: Option<&str>,
) -> String {
    match content {
        Some(Value::String(output)) => output.clone(),
        Some(Value::Array(entries)) => entries
            .iter()
            .filter_map(|entry| entry.get("text").and_then(Value::as_str))
            .collect(),
        other => {
            if let Some(text) = text {
                return text.to_string();
            }
            let mut payload = serde_json::Map::new();
            payload.insert("tool_use_id".to_string(), Value::String(tool_use_id.to_string()));
            if let Some(content) = other {
                payload.insert("content".to_string(), (*content).clone());
            }
            if let Some(is_error) = is_error {
                payload.insert("is_error".to_string(), Value::Bool(is_error));
            }
            if let Some(status) = status {
                payload.insert("status".to_string(), Value::String(status.to_string()));
            }
            serde_json::to_string(&Value::Object(payload)).unwrap_or_default()
        }
    }
}

/// Resolve the effective model: the request's, trimmed, else the default
fn resolve_model(
    request: &MessagesRequest,
    defaults: &TranslationDefaults,
) -> Result<String, TranslationError> {
    request
        .model
        .as_deref()
        .map(str::trim)
        .filter(|model| !model.is_empty())
        .or_else(|| {
            defaults
                .model
                .as_deref()
                .map(str::trim)
                .filter(|model| !model.is_empty())
        })
        .map(str::to_string)
        .ok_or(TranslationError::NoModelSpecified)
}

/// Resolve reasoning effort: the request's, else the default, else none
fn resolve_reasoning(
    request: &MessagesRequest,
    defaults: &TranslationDefaults,
) -> Option<Reasoning> {
    request
        .reasoning
        .as_ref()
        .and_then(|reasoning| reasoning.effort.clone())
        .filter(|effort| !effort.is_empty())
        .or_else(|| {
            defaults
                .reasoning_effort
                .clone()
                .filter(|effort| !effort.is_empty())
        })
        .map(|effort| Reasoning { effort })
}

/// Map tool definitions into the upstream function-tool format
///
/// An empty or absent tool list is omitted entirely; an empty input schema
/// becomes the minimal object schema the upstream accepts.
fn map_tools(tools: Option<&[ToolDefinition]>) -> Option<Vec<FunctionTool>> {
    let tools = tools?;
    if tools.is_empty() {
        return None;
    }
    Some(
        tools
            .iter()
            .map(|tool| FunctionTool {
                kind: FunctionTool::KIND.to_string(),
                name: tool.name.clone(),
                description: tool.description.clone(),
                parameters: match &tool.input_schema {
                    Value::Object(schema) if !schema.is_empty() => tool.input_schema.clone(),
                    _ => serde_json::json!({"type": "object", "properties": {}}),
                },
            })
            .collect(),
    )
}

/// Map a tool-choice value into the upstream format; unmappable values are
/// omitted
fn map_tool_choice(choice: &Value) -> Option<ToolChoice> {
    match choice {
        Value::String(mode) => match mode.as_str() {
            "auto" => Some(ToolChoice::Mode("auto".to_string())),
            "none" => Some(ToolChoice::Mode("none".to_string())),
            "any" => Some(ToolChoice::Mode("required".to_string())),
            _ => None,
        },
        Value::Object(object) => {
            if object.get("type").and_then(Value::as_str) != Some("tool") {
                return None;
            }
            object
                .get("name")
                .and_then(Value::as_str)
                .map(|name| ToolChoice::Function {
                    kind: FunctionTool::KIND.to_string(),
                    name: name.to_string(),
                })
        }
        _ => None,
    }
}
