//! Agent domain - the contract between the chat orchestrator and the
//! external model endpoint.
//!
//! The client is stateless: every call carries the full conversation. Two
//! tools are advertised on every call; the model either requests one of them
//! or answers in plain text.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::domain::DomainError;

/// Tool the model calls to record a new expense
pub const TOOL_CREATE_EXPENSE: &str = "create_expense";

/// Tool the model calls to query expenses over a date range
pub const TOOL_QUERY_EXPENSES: &str = "query_expenses";

/// Why the model ended its turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The model requested a tool call
    ToolUse,
    /// The model produced a final text answer
    EndTurn,
    /// Anything else (max_tokens, stop_sequence, ...)
    Other,
}

impl StopReason {
    pub fn from_wire(reason: &str) -> Self {
        match reason {
            "tool_use" => Self::ToolUse,
            "end_turn" => Self::EndTurn,
            _ => Self::Other,
        }
    }
}

/// A prior conversation turn, as supplied by the caller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new("user", content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new("assistant", content)
    }
}

/// Category id/name pair embedded into the system prompt
#[derive(Debug, Clone)]
pub struct CategoryInfo {
    pub id: Uuid,
    pub name: String,
}

/// A tool call requested by the model
#[derive(Debug, Clone)]
pub struct ToolInvocation {
    /// Provider-assigned invocation id, echoed back with the tool result
    pub id: String,
    pub name: String,
    /// Raw tool arguments; the orchestrator validates them
    pub input: Value,
}

/// Normalized result of one model turn
#[derive(Debug, Clone)]
pub struct AgentReply {
    pub stop_reason: StopReason,
    pub tool: Option<ToolInvocation>,
    /// Text blocks concatenated with a newline separator, in order
    pub text: Option<String>,
}

impl AgentReply {
    /// Whether this turn requests a tool call
    pub fn wants_tool(&self) -> bool {
        self.stop_reason == StopReason::ToolUse && self.tool.is_some()
    }
}

/// Stateless adapter over the external chat-completion endpoint
#[async_trait]
pub trait AgentClient: Send + Sync {
    /// Send the conversation plus a new user message
    async fn converse(
        &self,
        message: &str,
        history: &[ChatMessage],
        categories: &[CategoryInfo],
    ) -> Result<AgentReply, DomainError>;

    /// Send the result of an executed tool call back for a natural-language
    /// rendering. `history` must already include the triggering user message.
    async fn continue_with_tool_result(
        &self,
        history: &[ChatMessage],
        invocation: &ToolInvocation,
        tool_result: Value,
        categories: &[CategoryInfo],
    ) -> Result<AgentReply, DomainError>;
}
