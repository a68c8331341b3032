//! Stream event reconstruction for the messages protocol
//!
//! The upstream result is always fully materialized before any output is
//! produced, so streaming responses are reconstructed rather than relayed:
//! a completed [`MessagesResponse`] is re-expressed as the canonical
//! ordered event sequence the protocol's streaming contract requires.
//! This is a batch-to-stream adapter - a pure function from a value to a
//! finite sequence of frames, not incremental computation.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::response::{MessagesResponse, Usage};
use super::types::ContentBlock;

/// Server-sent events, in the order the protocol requires
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamEvent {
    /// Stream opened; carries the message envelope with empty content
    MessageStart {
        /// Envelope with empty content and null stop fields
        message: MessagesResponse,
    },
    /// A content block begins at the given index
    ContentBlockStart {
        /// Block index
        index: usize,
        /// The block being opened
        content_block: ContentBlock,
    },
    /// Payload for the block at the given index, as a single delta
    ContentBlockDelta {
        /// Block index
        index: usize,
        /// Delta content
        delta: BlockDelta,
    },
    /// The block at the given index is complete
    ContentBlockStop {
        /// Block index
        index: usize,
    },
    /// Final stop reason and usage
    MessageDelta {
        /// Stop reason and stop sequence
        delta: MessageDelta,
        /// Final usage counters
        usage: Usage,
    },
    /// Stream complete
    MessageStop,
}

/// Delta content within a `content_block_delta` event
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BlockDelta {
    /// Text payload
    TextDelta {
        /// Full block text, emitted as one delta
        text: String,
    },
    /// Tool input payload
    InputJsonDelta {
        /// Full JSON-encoded tool input, emitted as one delta
        partial_json: String,
    },
}

/// Delta in a `message_delta` event
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MessageDelta {
    /// Terminal stop reason
    pub stop_reason: Option<String>,
    /// Stop sequence (never set by this proxy)
    pub stop_sequence: Option<String>,
}

impl StreamEvent {
    /// Event name for the SSE `event:` line
    pub fn name(&self) -> &'static str {
        match self {
            StreamEvent::MessageStart { .. } => "message_start",
            StreamEvent::ContentBlockStart { .. } => "content_block_start",
            StreamEvent::ContentBlockDelta { .. } => "content_block_delta",
            StreamEvent::ContentBlockStop { .. } => "content_block_stop",
            StreamEvent::MessageDelta { .. } => "message_delta",
            StreamEvent::MessageStop => "message_stop",
        }
    }
}

/// Reconstruct the full ordered event sequence for a completed response
///
/// Emits exactly one `message_start`, then per content block a
/// `content_block_start`/`content_block_stop` pair with at most one
/// `content_block_delta` in between (text blocks with empty text get no
/// delta), then `message_delta` and `message_stop`.
pub fn reconstruct_events(response: &MessagesResponse) -> Vec<StreamEvent> {
    let mut events = Vec::with_capacity(response.content.len() * 3 + 3);

    // Envelope mirrors the response but starts with nothing produced.
    events.push(StreamEvent::MessageStart {
        message: MessagesResponse {
            id: response.id.clone(),
            kind: response.kind.clone(),
            role: response.role,
            model: response.model.clone(),
            content: Vec::new(),
            stop_reason: None,
            stop_sequence: None,
            usage: Usage {
                input_tokens: response.usage.input_tokens,
                output_tokens: 0,
            },
        },
    });

    for (index, block) in response.content.iter().enumerate() {
        events.push(StreamEvent::ContentBlockStart {
            index,
            content_block: block.clone(),
        });
        if let Some(delta) = block_delta(block) {
            events.push(StreamEvent::ContentBlockDelta { index, delta });
        }
        events.push(StreamEvent::ContentBlockStop { index });
    }

    events.push(StreamEvent::MessageDelta {
        delta: MessageDelta {
            stop_reason: response.stop_reason.clone(),
            stop_sequence: response.stop_sequence.clone(),
        },
        usage: response.usage.clone(),
    });
    events.push(StreamEvent::MessageStop);

    events
}

/// The single delta carried by a block, if it carries one
fn block_delta(block: &ContentBlock) -> Option<BlockDelta> {
    match block {
        ContentBlock::Text { text } if text.is_empty() => None,
        ContentBlock::Text { text } => Some(BlockDelta::TextDelta { text: text.clone() }),
        ContentBlock::ToolUse { input, .. } => Some(BlockDelta::InputJsonDelta {
            partial_json: encode_tool_input(input),
        }),
        // Tool results never appear in responses; nothing to stream.
        ContentBlock::ToolResult { .. } => None,
    }
}

/// JSON-encode a tool input, treating an absent input as an empty object
fn encode_tool_input(input: &Value) -> String {
    if input.is_null() {
        return "{}".to_string();
    }
    serde_json::to_string(input).unwrap_or_else(|_| "{}".to_string())
}

/// Format a stream event as an SSE frame
///
/// Frames comprise an event-name line and a JSON data line, terminated by
/// a blank line: `event: {name}\ndata: {json}\n\n`.
pub fn format_sse_event(event: &StreamEvent) -> Bytes {
    let json = serde_json::to_string(event).expect("stream events always serialize");
    Bytes::from(format!("event: {}\ndata: {}\n\n", event.name(), json))
}
