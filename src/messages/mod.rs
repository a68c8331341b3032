//! Client-facing messages protocol
//!
//! Types and helpers for the message/content-block oriented chat contract:
//! request and response shapes, content normalization, and streaming event
//! reconstruction.

pub mod request;
pub mod response;
pub mod streaming;
pub mod types;

pub use request::MessagesRequest;
pub use response::{MessagesResponse, Usage};
pub use types::{ContentBlock, Message, Role};
