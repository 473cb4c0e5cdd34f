//! Agent infrastructure - HTTP plumbing and the Claude client

pub mod claude;
pub mod http_client;

pub use claude::ClaudeAgentClient;
pub use http_client::{HttpClient, HttpClientTrait};
