//! Expense Tracker API
//!
//! Personal finance tracking with:
//! - JWT-authenticated users, expenses, categories, and budgets
//! - An AI expense assistant driving a two-tool agent loop
//! - PostgreSQL or in-memory storage backends

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use rand::Rng;
use tracing::info;

use api::state::AppState;
use domain::budget::BudgetRepository;
use domain::category::CategoryRepository;
use domain::expense::ExpenseRepository;
use domain::usage::UsageLogRepository;
use domain::user::UserRepository;
use infrastructure::agent::{ClaudeAgentClient, HttpClient};
use infrastructure::auth::{JwtConfig, JwtGenerator, JwtService};
use infrastructure::budget::{BudgetService, InMemoryBudgetRepository, PostgresBudgetRepository};
use infrastructure::category::{
    CategoryService, InMemoryCategoryRepository, PostgresCategoryRepository,
};
use infrastructure::chat::ChatService;
use infrastructure::expense::{
    ExpenseService, InMemoryExpenseRepository, PostgresExpenseRepository,
};
use infrastructure::usage::{
    InMemoryUsageLogRepository, PostgresUsageLogRepository, UsageService,
};
use infrastructure::user::{Argon2Hasher, InMemoryUserRepository, PostgresUserRepository, UserService};

/// Create the application state with all services initialized
pub async fn create_app_state(config: &AppConfig) -> anyhow::Result<AppState> {
    let use_postgres = config.storage.backend.eq_ignore_ascii_case("postgres");

    info!("Storage backend: {}", config.storage.backend);

    let (users, categories, expenses, budgets, usage_logs): (
        Arc<dyn UserRepository>,
        Arc<dyn CategoryRepository>,
        Arc<dyn ExpenseRepository>,
        Arc<dyn BudgetRepository>,
        Arc<dyn UsageLogRepository>,
    ) = if use_postgres {
        let database_url = std::env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;

        info!("Connecting to PostgreSQL...");
        let pool = infrastructure::storage::connect(&database_url).await?;
        infrastructure::storage::PostgresMigrator::new(pool.clone())
            .run()
            .await?;
        info!("PostgreSQL connection established");

        (
            Arc::new(PostgresUserRepository::new(pool.clone())),
            Arc::new(PostgresCategoryRepository::new(pool.clone())),
            Arc::new(PostgresExpenseRepository::new(pool.clone())),
            Arc::new(PostgresBudgetRepository::new(pool.clone())),
            Arc::new(PostgresUsageLogRepository::new(pool)),
        )
    } else {
        info!("Using in-memory storage");
        let categories = Arc::new(InMemoryCategoryRepository::new());

        (
            Arc::new(InMemoryUserRepository::new()),
            categories.clone(),
            Arc::new(InMemoryExpenseRepository::new(categories)),
            Arc::new(InMemoryBudgetRepository::new()),
            Arc::new(InMemoryUsageLogRepository::new()),
        )
    };

    // Services
    let user_service = Arc::new(UserService::new(users, Arc::new(Argon2Hasher::new())));

    let category_service = Arc::new(CategoryService::new(categories.clone()));
    category_service.seed_defaults().await?;

    let expense_service = Arc::new(ExpenseService::new(expenses.clone(), categories.clone()));
    let budget_service = Arc::new(BudgetService::new(budgets));

    let usage_service = Arc::new(UsageService::new(
        usage_logs,
        config.agent.daily_message_limit,
    ));

    let api_key = std::env::var("ANTHROPIC_API_KEY").unwrap_or_else(|_| {
        tracing::warn!("ANTHROPIC_API_KEY not set; AI assistant calls will fail");
        "sk-placeholder".to_string()
    });
    let agent = Arc::new(ClaudeAgentClient::new(
        HttpClient::new(),
        api_key,
        &config.agent,
    ));

    let chat_service = Arc::new(ChatService::new(
        agent,
        categories,
        expenses,
        usage_service,
    ));

    let jwt_service: Arc<dyn JwtGenerator> = Arc::new(JwtService::new(JwtConfig::new(
        resolve_jwt_secret(config),
        config.auth.jwt_expiration_hours,
    )));

    Ok(AppState::new(
        user_service,
        category_service,
        expense_service,
        budget_service,
        chat_service,
        jwt_service,
    ))
}

fn resolve_jwt_secret(config: &AppConfig) -> String {
    config
        .auth
        .jwt_secret
        .clone()
        .or_else(|| std::env::var("JWT_SECRET").ok())
        .unwrap_or_else(|| {
            tracing::warn!(
                "No JWT_SECRET configured. Generating random secret. \
                Sessions will NOT persist across restarts."
            );
            generate_random_secret()
        })
}

fn generate_random_secret() -> String {
    use rand::distributions::Alphanumeric;

    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(64)
        .map(char::from)
        .collect()
}
