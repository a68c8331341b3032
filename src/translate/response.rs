//! Upstream result translation
//!
//! Rebuilds a messages-protocol response from a completed upstream result.
//! This direction is best-effort and never fails: unknown items are
//! skipped, unparseable tool arguments degrade to an empty object, and an
//! empty result degrades to a single empty text block.

use std::collections::HashSet;

use serde_json::Value;

use crate::messages::response::{MessagesResponse, Usage};
use crate::messages::types::{coerce_text, ContentBlock, Role};
use crate::responses::{OutputContent, OutputItem, ResponsesResult, ToolCallEntry};

/// Response id used when the upstream result carries none
const FALLBACK_RESPONSE_ID: &str = "msg_unknown";

/// Stop reason for a turn that ended with pending tool invocations
const STOP_TOOL_USE: &str = "tool_use";

/// Stop reason for a naturally completed turn
const STOP_END_TURN: &str = "end_turn";

/// Translate a completed upstream result into a messages-protocol response
///
/// Walks the output items in order. Tool calls may appear both inside a
/// message's tool-calls entry and as standalone function-call items; a
/// seen-set keyed on the resolved call id de-duplicates them. The first
/// explicit stop reason wins; otherwise the presence of any tool-use block
/// decides between `tool_use` and `end_turn`.
pub fn translate_response(result: &ResponsesResult, requested_model: &str) -> MessagesResponse {
    let mut content: Vec<ContentBlock> = Vec::new();
    let mut seen_calls: HashSet<String> = HashSet::new();
    let mut explicit_stop: Option<String> = None;

    for item in &result.output {
        match item {
            OutputItem::Message {
                content: entries,
                stop_reason,
                ..
            } => {
                if explicit_stop.is_none() {
                    explicit_stop = stop_reason.clone();
                }
                for entry in entries {
                    match entry {
                        OutputContent::OutputText { text }
                        | OutputContent::SummaryText { text } => {
                            content.push(ContentBlock::Text {
                                text: coerce_text(text),
                            });
                        }
                        OutputContent::ToolCalls { tool_calls } => {
                            for call in tool_calls {
                                push_tool_call(&mut content, &mut seen_calls, call, true);
                            }
                        }
                        OutputContent::Unknown => {}
                    }
                }
            }
            OutputItem::FunctionCall {
                call_id,
                id,
                name,
                arguments,
            } => {
                let call = ToolCallEntry {
                    id: call_id.clone().or_else(|| id.clone()),
                    name: name.clone(),
                    arguments: arguments.clone(),
                };
                push_tool_call(&mut content, &mut seen_calls, &call, false);
            }
            OutputItem::Unknown => {}
        }
    }

    let has_tool_use = !seen_calls.is_empty();

    if content.is_empty() {
        content.push(ContentBlock::Text {
            text: result
                .output_text
                .as_ref()
                .map(coerce_text)
                .unwrap_or_default(),
        });
    }

    let stop_reason = explicit_stop.unwrap_or_else(|| {
        if has_tool_use {
            STOP_TOOL_USE.to_string()
        } else {
            STOP_END_TURN.to_string()
        }
    });

    let usage = result
        .usage
        .as_ref()
        .map(|usage| Usage {
            input_tokens: usage.input_tokens.or(usage.prompt_tokens).unwrap_or(0),
            output_tokens: usage
                .output_tokens
                .or(usage.completion_tokens)
                .unwrap_or(0),
        })
        .unwrap_or_default();

    MessagesResponse {
        id: non_empty(result.id.as_deref()).unwrap_or(FALLBACK_RESPONSE_ID).to_string(),
        kind: MessagesResponse::KIND.to_string(),
        role: Role::Assistant,
        model: non_empty(result.model.as_deref())
            .unwrap_or(requested_model)
            .to_string(),
        content,
        stop_reason: Some(stop_reason),
        stop_sequence: None,
        usage,
    }
}

/// Append a tool-use block unless its resolved id was already produced
///
/// `always_record` distinguishes calls embedded in a message (always
/// recorded and emitted) from standalone items (skipped when the same id
/// already appeared).
fn push_tool_call(
    content: &mut Vec<ContentBlock>,
    seen_calls: &mut HashSet<String>,
    call: &ToolCallEntry,
    always_record: bool,
) {
    let id = resolve_call_id(call, content.len());
    if !always_record && seen_calls.contains(&id) {
        return;
    }
    seen_calls.insert(id.clone());
    content.push(ContentBlock::ToolUse {
        id,
        name: call.name.clone().unwrap_or_default(),
        input: parse_arguments(call.arguments.as_deref()),
    });
}

/// Resolve a call's id: its own id, else its name, else a synthesized
/// placeholder keyed on how many blocks were already produced
fn resolve_call_id(call: &ToolCallEntry, produced: usize) -> String {
    non_empty(call.id.as_deref())
        .or_else(|| non_empty(call.name.as_deref()))
        .map(str::to_string)
        .unwrap_or_else(|| format!("tool_{produced}"))
}

/// Parse a JSON-encoded argument string, degrading to an empty object
fn parse_arguments(arguments: Option<&str>) -> Value {
    arguments
        .and_then(|raw| serde_json::from_str(raw).ok())
        .unwrap_or_else(|| Value::Object(serde_json::Map::new()))
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|text| !text.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn parse_result(value: serde_json::Value) -> ResponsesResult {
        serde_json::from_value(value).unwrap()
    }

    // =========================================================================
    // Content Reconstruction Tests
    // =========================================================================

    #[test]
    fn test_text_message_yields_end_turn() {
        let result = parse_result(json!({
            "output": [{
                "type": "message",
                "role": "assistant",
                "content": [{"type": "output_text", "text": "Hi"}],
            }],
        }));
        let response = translate_response(&result, "m-1");
        assert_eq!(
            response.content,
            vec![ContentBlock::Text {
                text: "Hi".to_string()
            }]
        );
        assert_eq!(response.stop_reason.as_deref(), Some("end_turn"));
    }

    #[test]
    fn test_summary_text_treated_as_text() {
        let result = parse_result(json!({
            "output": [{
                "type": "message",
                "content": [{"type": "summary_text", "text": "Summary"}],
            }],
        }));
        let response = translate_response(&result, "m-1");
        assert_eq!(
            response.content,
            vec![ContentBlock::Text {
                text: "Summary".to_string()
            }]
        );
    }

    #[test]
    fn test_non_string_text_coerced() {
        let result = parse_result(json!({
            "output": [{
                "type": "message",
                "content": [{"type": "output_text", "text": 42}],
            }],
        }));
        let response = translate_response(&result, "m-1");
        assert_eq!(
            response.content,
            vec![ContentBlock::Text {
                text: "42".to_string()
            }]
        );
    }

    #[test]
    fn test_function_call_item_yields_tool_use() {
        let result = parse_result(json!({
            "output": [{
                "type": "function_call",
                "call_id": "t1",
                "name": "lookup",
                "arguments": "{\"q\":\"x\"}",
            }],
        }));
        let response = translate_response(&result, "m-1");
        assert_eq!(
            response.content,
            vec![ContentBlock::ToolUse {
                id: "t1".to_string(),
                name: "lookup".to_string(),
                input: json!({"q": "x"}),
            }]
        );
        assert_eq!(response.stop_reason.as_deref(), Some("tool_use"));
    }

    #[test]
    fn test_malformed_arguments_degrade_to_empty_object() {
        let result = parse_result(json!({
            "output": [{
                "type": "function_call",
                "call_id": "t1",
                "name": "lookup",
                "arguments": "{not json",
            }],
        }));
        let response = translate_response(&result, "m-1");
        match &response.content[0] {
            ContentBlock::ToolUse { input, .. } => assert_eq!(input, &json!({})),
            other => panic!("expected tool_use, got {:?}", other),
        }
    }

    #[test]
    fn test_tool_calls_entry_expands_per_call() {
        let result = parse_result(json!({
            "output": [{
                "type": "message",
                "content": [{
                    "type": "tool_calls",
                    "tool_calls": [
                        {"id": "t1", "name": "first", "arguments": "{}"},
                        {"id": "t2", "name": "second", "arguments": "{}"},
                    ],
                }],
            }],
        }));
        let response = translate_response(&result, "m-1");
        assert_eq!(response.content.len(), 2);
        assert_eq!(response.stop_reason.as_deref(), Some("tool_use"));
    }

    // =========================================================================
    // De-duplication and Id Synthesis Tests
    // =========================================================================

    #[test]
    fn test_duplicate_call_across_message_and_item_deduplicated() {
        let result = parse_result(json!({
            "output": [
                {
                    "type": "message",
                    "content": [{
                        "type": "tool_calls",
                        "tool_calls": [{"id": "t1", "name": "lookup", "arguments": "{}"}],
                    }],
                },
                {"type": "function_call", "call_id": "t1", "name": "lookup", "arguments": "{}"},
            ],
        }));
        let response = translate_response(&result, "m-1");
        assert_eq!(response.content.len(), 1);
    }

    #[test]
    fn test_call_id_falls_back_to_name() {
        let result = parse_result(json!({
            "output": [{"type": "function_call", "name": "lookup", "arguments": "{}"}],
        }));
        let response = translate_response(&result, "m-1");
        match &response.content[0] {
            ContentBlock::ToolUse { id, .. } => assert_eq!(id, "lookup"),
            other => panic!("expected tool_use, got {:?}", other),
        }
    }

    #[test]
    fn test_anonymous_call_gets_synthesized_id() {
        let result = parse_result(json!({
            "output": [
                {
                    "type": "message",
                    "content": [{"type": "output_text", "text": "thinking"}],
                },
                {"type": "function_call", "arguments": "{}"},
            ],
        }));
        let response = translate_response(&result, "m-1");
        // One text block already produced, so the placeholder counts from 1.
        match &response.content[1] {
            ContentBlock::ToolUse { id, .. } => assert_eq!(id, "tool_1"),
            other => panic!("expected tool_use, got {:?}", other),
        }
    }

    #[test]
    fn test_item_id_used_when_call_id_absent() {
        let result = parse_result(json!({
            "output": [{"type": "function_call", "id": "item_9", "name": "lookup", "arguments": "{}"}],
        }));
        let response = translate_response(&result, "m-1");
        match &response.content[0] {
            ContentBlock::ToolUse { id, .. } => assert_eq!(id, "item_9"),
            other => panic!("expected tool_use, got {:?}", other),
        }
    }

    // =========================================================================
    // Stop Reason Tests
    // =========================================================================

    #[test]
    fn test_explicit_stop_reason_wins() {
        let result = parse_result(json!({
            "output": [
                {
                    "type": "message",
                    "stop_reason": "max_tokens",
                    "content": [{"type": "output_text", "text": "trunc"}],
                },
                {"type": "function_call", "call_id": "t1", "name": "lookup", "arguments": "{}"},
            ],
        }));
        let response = translate_response(&result, "m-1");
        assert_eq!(response.stop_reason.as_deref(), Some("max_tokens"));
    }

    #[test]
    fn test_first_explicit_stop_reason_wins() {
        let result = parse_result(json!({
            "output": [
                {"type": "message", "stop_reason": "first", "content": []},
                {"type": "message", "stop_reason": "second", "content": []},
            ],
        }));
        let response = translate_response(&result, "m-1");
        assert_eq!(response.stop_reason.as_deref(), Some("first"));
    }

    // =========================================================================
    // Fallback and Usage Tests
    // =========================================================================

    #[test]
    fn test_empty_output_falls_back_to_output_text() {
        let result = parse_result(json!({"output": [], "output_text": "flat text"}));
        let response = translate_response(&result, "m-1");
        assert_eq!(
            response.content,
            vec![ContentBlock::Text {
                text: "flat text".to_string()
            }]
        );
    }

    #[test]
    fn test_empty_output_without_output_text_yields_empty_text_block() {
        let result = parse_result(json!({}));
        let response = translate_response(&result, "m-1");
        assert_eq!(
            response.content,
            vec![ContentBlock::Text {
                text: String::new()
            }]
        );
        assert_eq!(response.stop_reason.as_deref(), Some("end_turn"));
    }

    #[test]
    fn test_unknown_items_skipped() {
        let result = parse_result(json!({
            "output": [
                {"type": "reasoning", "summary": []},
                {
                    "type": "message",
                    "content": [{"type": "output_text", "text": "Hi"}],
                },
            ],
        }));
        let response = translate_response(&result, "m-1");
        assert_eq!(response.content.len(), 1);
    }

    #[test]
    fn test_usage_native_spelling() {
        let result = parse_result(json!({
            "usage": {"input_tokens": 9, "output_tokens": 3},
        }));
        let response = translate_response(&result, "m-1");
        assert_eq!(response.usage.input_tokens, 9);
        assert_eq!(response.usage.output_tokens, 3);
    }

    #[test]
    fn test_usage_legacy_spelling() {
        let result = parse_result(json!({
            "usage": {"prompt_tokens": 7, "completion_tokens": 2},
        }));
        let response = translate_response(&result, "m-1");
        assert_eq!(response.usage.input_tokens, 7);
        assert_eq!(response.usage.output_tokens, 2);
    }

    #[test]
    fn test_missing_usage_defaults_to_zero() {
        let result = parse_result(json!({}));
        let response = translate_response(&result, "m-1");
        assert_eq!(response.usage, Usage::default());
    }

    #[test]
    fn test_id_and_model_fallbacks() {
        let result = parse_result(json!({}));
        let response = translate_response(&result, "requested-model");
        assert_eq!(response.id, "msg_unknown");
        assert_eq!(response.model, "requested-model");
    }

    #[test]
    fn test_upstream_id_and_model_preserved() {
        let result = parse_result(json!({"id": "resp_7", "model": "served-model"}));
        let response = translate_response(&result, "requested-model");
        assert_eq!(response.id, "resp_7");
        assert_eq!(response.model, "served-model");
    }
}
