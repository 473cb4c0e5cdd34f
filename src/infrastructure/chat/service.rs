//! Chat orchestrator - drives one turn of the AI expense assistant.
//!
//! A turn runs: usage check -> model call -> (optional) tool execution ->
//! (optional) second model call for the user-facing phrasing. The two model
//! calls are strictly sequential; the second depends on the first's tool
//! output and on the executed domain effect.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::agent::{
    AgentClient, CategoryInfo, ChatMessage, ToolInvocation, TOOL_CREATE_EXPENSE,
    TOOL_QUERY_EXPENSES,
};
use crate::domain::category::CategoryRepository;
use crate::domain::expense::{Expense, ExpenseRepository};
use crate::domain::DomainError;
use crate::infrastructure::expense::repository::summarize_records;
use crate::infrastructure::usage::UsageService;

const LIMIT_MESSAGE: &str = "You've reached your daily AI message limit. Try again tomorrow!";
const FALLBACK_MESSAGE: &str = "Sorry, I couldn't understand that.";
const CATEGORY_UNKNOWN_MESSAGE: &str = "I couldn't determine the category. Could you try again?";
const CATEGORY_NOT_FOUND_MESSAGE: &str = "The category wasn't found. Could you try again?";
const INVALID_EXPENSE_MESSAGE: &str =
    "I couldn't understand the expense details. Could you try again?";

/// How many recent items the query tool reports back to the model
const RECENT_ITEMS_LIMIT: usize = 10;

/// Kind of chat reply, as exposed on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatReplyKind {
    Message,
    ExpenseCreated,
}

impl ChatReplyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Message => "message",
            Self::ExpenseCreated => "expense_created",
        }
    }
}

/// Outcome of one chat turn
#[derive(Debug, Clone)]
pub struct ChatReply {
    pub kind: ChatReplyKind,
    pub message: String,
    pub expense_id: Option<Uuid>,
}

impl ChatReply {
    fn message(text: impl Into<String>) -> Self {
        Self {
            kind: ChatReplyKind::Message,
            message: text.into(),
            expense_id: None,
        }
    }

    fn expense_created(text: impl Into<String>, expense_id: Uuid) -> Self {
        Self {
            kind: ChatReplyKind::ExpenseCreated,
            message: text.into(),
            expense_id: Some(expense_id),
        }
    }
}

#[derive(Debug, Deserialize)]
struct CreateExpenseArgs {
    amount: Decimal,
    description: String,
    date: String,
    #[serde(rename = "categoryId")]
    category_id: String,
    notes: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct QueryExpensesArgs {
    #[serde(rename = "dateFrom")]
    date_from: Option<String>,
    #[serde(rename = "dateTo")]
    date_to: Option<String>,
    #[serde(rename = "categoryId")]
    category_id: Option<String>,
}

/// The conversation state machine between the user, the model, and the
/// expense store.
pub struct ChatService {
    agent: Arc<dyn AgentClient>,
    categories: Arc<dyn CategoryRepository>,
    expenses: Arc<dyn ExpenseRepository>,
    usage: Arc<UsageService>,
}

impl ChatService {
    pub fn new(
        agent: Arc<dyn AgentClient>,
        categories: Arc<dyn CategoryRepository>,
        expenses: Arc<dyn ExpenseRepository>,
        usage: Arc<UsageService>,
    ) -> Self {
        Self {
            agent,
            categories,
            expenses,
            usage,
        }
    }

    /// Run one chat turn for the user
    pub async fn handle(
        &self,
        user_id: Uuid,
        message: &str,
        history: Vec<ChatMessage>,
    ) -> Result<ChatReply, DomainError> {
        let today = Utc::now().date_naive();

        // The limit check precedes any model call; refusing here costs nothing
        if self.usage.is_over_limit(user_id, today).await? {
            return Ok(ChatReply::message(LIMIT_MESSAGE));
        }

        let categories = self.visible_categories(user_id).await?;

        let reply = self.agent.converse(message, &history, &categories).await?;

        // The call counts whether or not the model asked for a tool
        self.usage.record_message(user_id, today).await?;

        if reply.wants_tool() {
            let invocation = reply.tool.expect("wants_tool guarantees a tool");
            let tool_name = invocation.name.clone();

            let mut full_history = history;
            full_history.push(ChatMessage::user(message));

            match tool_name.as_str() {
                TOOL_CREATE_EXPENSE => {
                    return self
                        .handle_create_expense(user_id, invocation, &full_history, &categories)
                        .await;
                }
                TOOL_QUERY_EXPENSES => {
                    return self
                        .handle_query_expenses(user_id, invocation, &full_history, &categories)
                        .await;
                }
                other => {
                    warn!(tool = %other, "Model requested an unknown tool");
                }
            }
        }

        // Text turn: question or clarification from the model
        Ok(ChatReply::message(
            reply.text.unwrap_or_else(|| FALLBACK_MESSAGE.to_string()),
        ))
    }

    async fn handle_create_expense(
        &self,
        user_id: Uuid,
        invocation: ToolInvocation,
        full_history: &[ChatMessage],
        categories: &[CategoryInfo],
    ) -> Result<ChatReply, DomainError> {
        // Malformed tool arguments are conversation problems, not HTTP
        // failures - answer with a clarification instead of escalating.
        let args: CreateExpenseArgs = match serde_json::from_value(invocation.input.clone()) {
            Ok(args) => args,
            Err(_) => return Ok(ChatReply::message(INVALID_EXPENSE_MESSAGE)),
        };

        let date = parse_date(&args.date).unwrap_or_else(Utc::now);

        let category_id = match Uuid::parse_str(&args.category_id) {
            Ok(id) => id,
            Err(_) => return Ok(ChatReply::message(CATEGORY_UNKNOWN_MESSAGE)),
        };

        if !self.categories.visible_exists(category_id, user_id).await? {
            return Ok(ChatReply::message(CATEGORY_NOT_FOUND_MESSAGE));
        }

        let expense = match Expense::new(
            args.amount,
            args.description.as_str(),
            date,
            user_id,
            category_id,
            args.notes.clone(),
        ) {
            Ok(expense) => expense,
            Err(_) => return Ok(ChatReply::message(INVALID_EXPENSE_MESSAGE)),
        };

        let expense = self.expenses.create(expense).await?;

        info!(
            expense_id = %expense.id(),
            user_id = %user_id,
            amount = %args.amount,
            "AI created expense"
        );

        let tool_result = json!({
            "success": true,
            "expenseId": expense.id().to_string(),
            "amount": args.amount,
            "description": args.description,
            "date": date.format("%Y-%m-%d").to_string(),
        });

        // The expense is committed; a failed confirmation must not undo it.
        // Degrade to the templated text and keep the turn successful.
        let confirmation = match self
            .agent
            .continue_with_tool_result(full_history, &invocation, tool_result, categories)
            .await
        {
            Ok(reply) => reply.text,
            Err(e) => {
                warn!(error = %e, "Confirmation call failed after expense was created");
                None
            }
        };

        let message = confirmation
            .unwrap_or_else(|| format!("Done! Added ${} for {}.", args.amount, args.description));

        Ok(ChatReply::expense_created(message, expense.id()))
    }

    async fn handle_query_expenses(
        &self,
        user_id: Uuid,
        invocation: ToolInvocation,
        full_history: &[ChatMessage],
        categories: &[CategoryInfo],
    ) -> Result<ChatReply, DomainError> {
        let args: QueryExpensesArgs =
            serde_json::from_value(invocation.input.clone()).unwrap_or_default();

        let now = Utc::now();
        let date_from = args
            .date_from
            .as_deref()
            .and_then(parse_date)
            .unwrap_or_else(|| now - chrono::Duration::days(7));
        let date_to = args.date_to.as_deref().and_then(parse_date).unwrap_or(now);

        // An unparseable category filter is ignored rather than refused
        let category_id = args
            .category_id
            .as_deref()
            .and_then(|s| Uuid::parse_str(s).ok());

        let records = self
            .expenses
            .query_range(user_id, date_from, date_to, category_id)
            .await?;

        let summary = summarize_records(&records);

        info!(
            user_id = %user_id,
            count = summary.total_count,
            total = %summary.total_amount,
            "AI queried expenses"
        );

        let by_category: Vec<Value> = summary
            .by_category
            .iter()
            .map(|c| {
                json!({
                    "category": c.category_name,
                    "amount": c.amount,
                    "count": c.count,
                })
            })
            .collect();

        let recent_items: Vec<Value> = records
            .iter()
            .take(RECENT_ITEMS_LIMIT)
            .map(|r| {
                json!({
                    "description": r.expense.description(),
                    "amount": r.expense.amount(),
                    "date": r.expense.date().format("%Y-%m-%d").to_string(),
                    "category": r.category_name,
                })
            })
            .collect();

        let tool_result = json!({
            "totalAmount": summary.total_amount,
            "expenseCount": summary.total_count,
            "dateFrom": date_from.format("%Y-%m-%d").to_string(),
            "dateTo": date_to.format("%Y-%m-%d").to_string(),
            "byCategory": by_category,
            "recentItems": recent_items,
        });

        let summary_text = match self
            .agent
            .continue_with_tool_result(full_history, &invocation, tool_result, categories)
            .await
        {
            Ok(reply) => reply.text,
            Err(e) => {
                warn!(error = %e, "Summary call failed after query");
                None
            }
        };

        let message = summary_text.unwrap_or_else(|| {
            format!(
                "You spent ${} between {} and {}.",
                summary.total_amount,
                date_from.format("%b %d"),
                date_to.format("%b %d"),
            )
        });

        Ok(ChatReply::message(message))
    }

    async fn visible_categories(&self, user_id: Uuid) -> Result<Vec<CategoryInfo>, DomainError> {
        Ok(self
            .categories
            .list_visible(user_id)
            .await?
            .into_iter()
            .map(|c| CategoryInfo {
                id: c.id(),
                name: c.name().to_string(),
            })
            .collect())
    }
}

/// Best-effort date parsing: RFC 3339, then bare datetime, then bare date
/// at UTC midnight.
fn parse_date(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
        return Some(Utc.from_utc_datetime(&dt));
    }

    if let Ok(date) = s.parse::<NaiveDate>() {
        return Some(Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0)?));
    }

    None
}
