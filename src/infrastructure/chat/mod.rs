//! Chat infrastructure - the conversation orchestrator

pub mod service;

pub use service::{ChatReply, ChatReplyKind, ChatService};
