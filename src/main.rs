//! Meal Planner
//!
//! An MCP server for recipes, weekly meal plans and shopping lists.

use rmcp::ServiceExt;
use tokio::io::{stdin, stdout};
use tracing::info;
use tracing_subscriber::EnvFilter;

use mealplan::build_info;
use mealplan::config::{self, Config};
use mealplan::db::{self, Database};
use mealplan::mcp::MealPlanService;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Log to stderr so stdout stays reserved for MCP
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(config::log_filter()))
        .with_writer(std::io::stderr)
        .init();

    let config = Config::load();

    build_info::print_startup_banner();
    eprintln!("Starting MCP server on stdio...");
    eprintln!("Database path: {}", config.database_path.display());

    let database = if config.is_in_memory() {
        Database::open_in_memory()?
    } else {
        if let Some(parent) = config.database_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Database::new(&config.database_path, config.pool_size)?
    };

    database.with_conn(|conn| {
        db::migrations::run_migrations(conn)?;
        let version = db::migrations::get_schema_version(conn)?;
        info!("Database schema version: {}", version);
        Ok(())
    })?;

    let service = MealPlanService::new(config.database_path.clone(), database);

    let transport = (stdin(), stdout());
    let server = service.serve(transport).await?;
    server.waiting().await?;

    Ok(())
}
