//! Claude agent client - the tool-calling adapter over the Anthropic
//! messages endpoint

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{json, Value};
use tracing::debug;

use super::http_client::HttpClientTrait;
use crate::config::AgentConfig;
use crate::domain::agent::{
    AgentClient, AgentReply, CategoryInfo, ChatMessage, StopReason, ToolInvocation,
    TOOL_CREATE_EXPENSE, TOOL_QUERY_EXPENSES,
};
use crate::domain::DomainError;

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Agent client backed by the Anthropic messages API
#[derive(Debug)]
pub struct ClaudeAgentClient<C: HttpClientTrait> {
    client: C,
    api_key: String,
    model: String,
    max_tokens: u32,
    base_url: String,
}

impl<C: HttpClientTrait> ClaudeAgentClient<C> {
    pub fn new(client: C, api_key: impl Into<String>, config: &AgentConfig) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    fn messages_url(&self) -> String {
        format!("{}/v1/messages", self.base_url)
    }

    fn headers(&self) -> Vec<(&str, &str)> {
        vec![
            ("x-api-key", self.api_key.as_str()),
            ("anthropic-version", ANTHROPIC_VERSION),
            ("Content-Type", "application/json"),
        ]
    }

    /// The system prompt is rebuilt per call so it always carries today's
    /// date and the caller's current category list.
    fn build_system_prompt(&self, categories: &[CategoryInfo]) -> String {
        let today = Utc::now().format("%Y-%m-%d").to_string();
        let category_list = categories
            .iter()
            .map(|c| format!("- {}: {}", c.id, c.name))
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            "You are an expense assistant. You have two capabilities:\n\
             1. Record expenses: the user tells you what they spent and you record it with the create_expense tool.\n\
             2. Query expenses: the user asks what they spent and you look it up with the query_expenses tool.\n\
             \n\
             Today's date: {today}\n\
             \n\
             Available categories:\n\
             {category_list}\n\
             \n\
             Rules:\n\
             - If the user doesn't give a date, use today's date ({today})\n\
             - If you can't find an exact category match, ask, suggesting the closest ones from the list\n\
             - If the amount is missing, ask\n\
             - Reply in the same language the user writes in\n\
             - Keep confirmations short and friendly\n\
             - Use the create_expense tool to record expenses; never answer with plain text when you have all the information\n\
             - The description field should be short and descriptive (e.g. \"Gas\", \"Lunch\", \"Netflix\")\n\
             - For expense questions, use query_expenses. When the data comes back, give a clear, friendly summary.\n\
             - For \"this week\" use Monday through Sunday of the current week\n\
             - For \"this month\" use the first and last day of the current month"
        )
    }

    fn build_tools() -> Value {
        json!([
            {
                "name": TOOL_CREATE_EXPENSE,
                "description": "Creates a new expense record for the user",
                "input_schema": {
                    "type": "object",
                    "properties": {
                        "amount": {
                            "type": "number",
                            "description": "The expense amount (positive number)"
                        },
                        "description": {
                            "type": "string",
                            "description": "Short description of the expense"
                        },
                        "date": {
                            "type": "string",
                            "description": "Date in YYYY-MM-DD format"
                        },
                        "categoryId": {
                            "type": "string",
                            "description": "UUID of the category from the available list"
                        },
                        "notes": {
                            "type": "string",
                            "description": "Optional additional notes"
                        }
                    },
                    "required": ["amount", "description", "date", "categoryId"]
                }
            },
            {
                "name": TOOL_QUERY_EXPENSES,
                "description": "Queries the user's expenses for a date range, optionally filtered by category. Returns totals and breakdown by category.",
                "input_schema": {
                    "type": "object",
                    "properties": {
                        "dateFrom": {
                            "type": "string",
                            "description": "Start date in YYYY-MM-DD format"
                        },
                        "dateTo": {
                            "type": "string",
                            "description": "End date in YYYY-MM-DD format"
                        },
                        "categoryId": {
                            "type": "string",
                            "description": "Optional: UUID of category to filter by"
                        }
                    },
                    "required": ["dateFrom", "dateTo"]
                }
            }
        ])
    }

    async fn call(
        &self,
        messages: Vec<Value>,
        categories: &[CategoryInfo],
    ) -> Result<AgentReply, DomainError> {
        let body = json!({
            "model": self.model,
            "max_tokens": self.max_tokens,
            "system": self.build_system_prompt(categories),
            "tools": Self::build_tools(),
            "messages": messages,
        });

        debug!(model = %self.model, "Calling model endpoint");

        let response = self
            .client
            .post_json(&self.messages_url(), self.headers(), &body)
            .await?;

        parse_reply(&response)
    }
}

#[async_trait]
impl<C: HttpClientTrait> AgentClient for ClaudeAgentClient<C> {
    async fn converse(
        &self,
        message: &str,
        history: &[ChatMessage],
        categories: &[CategoryInfo],
    ) -> Result<AgentReply, DomainError> {
        let mut messages = render_history(history);
        messages.push(json!({"role": "user", "content": message}));

        self.call(messages, categories).await
    }

    async fn continue_with_tool_result(
        &self,
        history: &[ChatMessage],
        invocation: &ToolInvocation,
        tool_result: Value,
        categories: &[CategoryInfo],
    ) -> Result<AgentReply, DomainError> {
        let mut messages = render_history(history);

        // Assistant turn replaying the tool call, then the result as a
        // user turn - the shape the messages API expects.
        messages.push(json!({
            "role": "assistant",
            "content": [{
                "type": "tool_use",
                "id": invocation.id,
                "name": invocation.name,
                "input": invocation.input,
            }]
        }));

        messages.push(json!({
            "role": "user",
            "content": [{
                "type": "tool_result",
                "tool_use_id": invocation.id,
                "content": tool_result.to_string(),
            }]
        }));

        self.call(messages, categories).await
    }
}

fn render_history(history: &[ChatMessage]) -> Vec<Value> {
    history
        .iter()
        .map(|m| json!({"role": m.role, "content": m.content}))
        .collect()
}

/// Normalize one response. A response may carry a tool_use block and/or
/// several text blocks; text blocks join with a newline, in order.
fn parse_reply(response: &Value) -> Result<AgentReply, DomainError> {
    let stop_reason = response
        .get("stop_reason")
        .and_then(Value::as_str)
        .unwrap_or("end_turn");

    let mut tool = None;
    let mut text: Option<String> = None;

    if let Some(blocks) = response.get("content").and_then(Value::as_array) {
        for block in blocks {
            match block.get("type").and_then(Value::as_str) {
                Some("tool_use") => {
                    let id = block
                        .get("id")
                        .and_then(Value::as_str)
                        .ok_or_else(|| {
                            DomainError::provider("anthropic", "tool_use block missing id")
                        })?
                        .to_string();
                    let name = block
                        .get("name")
                        .and_then(Value::as_str)
                        .ok_or_else(|| {
                            DomainError::provider("anthropic", "tool_use block missing name")
                        })?
                        .to_string();
                    let input = block.get("input").cloned().unwrap_or(Value::Null);

                    tool = Some(ToolInvocation { id, name, input });
                }
                Some("text") => {
                    if let Some(t) = block.get("text").and_then(Value::as_str) {
                        if !t.trim().is_empty() {
                            text = Some(match text {
                                None => t.to_string(),
                                Some(existing) => format!("{existing}\n{t}"),
                            });
                        }
                    }
                }
                _ => {}
            }
        }
    }

    Ok(AgentReply {
        stop_reason: StopReason::from_wire(stop_reason),
        tool,
        text,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::agent::http_client::mock::MockHttpClient;
    use uuid::Uuid;

    const TEST_URL: &str = "https://api.anthropic.com/v1/messages";

    fn client_with(mock: MockHttpClient) -> ClaudeAgentClient<MockHttpClient> {
        ClaudeAgentClient::new(mock, "test-api-key", &AgentConfig::default())
    }

    fn categories() -> Vec<CategoryInfo> {
        vec![CategoryInfo {
            id: Uuid::new_v4(),
            name: "Food & Dining".to_string(),
        }]
    }

    #[tokio::test]
    async fn test_converse_plain_text() {
        let mock = MockHttpClient::new().with_response(
            TEST_URL,
            json!({
                "id": "msg_1",
                "stop_reason": "end_turn",
                "content": [{"type": "text", "text": "How much did you spend?"}]
            }),
        );

        let client = client_with(mock);
        let reply = client.converse("hi", &[], &categories()).await.unwrap();

        assert_eq!(reply.stop_reason, StopReason::EndTurn);
        assert!(reply.tool.is_none());
        assert_eq!(reply.text.as_deref(), Some("How much did you spend?"));
    }

    #[tokio::test]
    async fn test_converse_tool_use() {
        let mock = MockHttpClient::new().with_response(
            TEST_URL,
            json!({
                "id": "msg_1",
                "stop_reason": "tool_use",
                "content": [
                    {"type": "text", "text": "Recording that now."},
                    {
                        "type": "tool_use",
                        "id": "toolu_1",
                        "name": "create_expense",
                        "input": {"amount": 12.5, "description": "Lunch"}
                    }
                ]
            }),
        );

        let client = client_with(mock);
        let reply = client
            .converse("I spent 12.50 on lunch", &[], &categories())
            .await
            .unwrap();

        assert!(reply.wants_tool());
        let tool = reply.tool.unwrap();
        assert_eq!(tool.name, "create_expense");
        assert_eq!(tool.id, "toolu_1");
        assert_eq!(tool.input["amount"], json!(12.5));
        assert_eq!(reply.text.as_deref(), Some("Recording that now."));
    }

    #[tokio::test]
    async fn test_multiple_text_blocks_concatenate() {
        let mock = MockHttpClient::new().with_response(
            TEST_URL,
            json!({
                "stop_reason": "end_turn",
                "content": [
                    {"type": "text", "text": "First."},
                    {"type": "text", "text": "   "},
                    {"type": "text", "text": "Second."}
                ]
            }),
        );

        let client = client_with(mock);
        let reply = client.converse("hi", &[], &categories()).await.unwrap();

        assert_eq!(reply.text.as_deref(), Some("First.\nSecond."));
    }

    #[tokio::test]
    async fn test_request_carries_system_and_tools() {
        let mock = MockHttpClient::new().with_response(
            TEST_URL,
            json!({"stop_reason": "end_turn", "content": []}),
        );

        let cats = categories();
        let category_id = cats[0].id;

        let client = client_with(mock);
        let history = vec![ChatMessage::user("earlier"), ChatMessage::assistant("ok")];
        client.converse("hello", &history, &cats).await.unwrap();

        let requests = client.client.requests();
        assert_eq!(requests.len(), 1);

        let body = &requests[0];
        assert_eq!(body["model"], json!("claude-haiku-4-5-20251001"));
        assert_eq!(body["max_tokens"], json!(1024));

        let system = body["system"].as_str().unwrap();
        assert!(system.contains("Food & Dining"));
        assert!(system.contains(&category_id.to_string()));

        let tools = body["tools"].as_array().unwrap();
        assert_eq!(tools.len(), 2);
        assert_eq!(tools[0]["name"], json!("create_expense"));
        assert_eq!(tools[1]["name"], json!("query_expenses"));

        let messages = body["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[2]["content"], json!("hello"));
    }

    #[tokio::test]
    async fn test_continue_with_tool_result_message_shape() {
        let mock = MockHttpClient::new().with_response(
            TEST_URL,
            json!({
                "stop_reason": "end_turn",
                "content": [{"type": "text", "text": "Done!"}]
            }),
        );

        let client = client_with(mock);
        let invocation = ToolInvocation {
            id: "toolu_9".to_string(),
            name: "create_expense".to_string(),
            input: json!({"amount": 10}),
        };

        let history = vec![ChatMessage::user("add 10 for gas")];
        let reply = client
            .continue_with_tool_result(
                &history,
                &invocation,
                json!({"success": true}),
                &categories(),
            )
            .await
            .unwrap();

        assert_eq!(reply.text.as_deref(), Some("Done!"));

        let body = &client.client.requests()[0];
        let messages = body["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 3);

        let assistant_turn = &messages[1];
        assert_eq!(assistant_turn["role"], json!("assistant"));
        assert_eq!(assistant_turn["content"][0]["type"], json!("tool_use"));
        assert_eq!(assistant_turn["content"][0]["id"], json!("toolu_9"));

        let result_turn = &messages[2];
        assert_eq!(result_turn["role"], json!("user"));
        assert_eq!(result_turn["content"][0]["type"], json!("tool_result"));
        assert_eq!(result_turn["content"][0]["tool_use_id"], json!("toolu_9"));
    }

    #[tokio::test]
    async fn test_endpoint_failure_propagates() {
        let mock = MockHttpClient::new().with_error(TEST_URL, "HTTP 500: overloaded");

        let client = client_with(mock);
        let result = client.converse("hi", &[], &categories()).await;

        assert!(matches!(result, Err(DomainError::Provider { .. })));
    }
}
