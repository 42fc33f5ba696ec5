//! Runtime configuration
//!
//! Read once from the environment at startup.

use std::env;
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;

use tracing::{info, warn};

/// Path value that selects a private in-memory database
pub const IN_MEMORY_PATH: &str = ":memory:";

/// Smallest serving count a client may request
pub const MIN_SERVINGS: i64 = 1;
/// Largest serving count a client may request
pub const MAX_SERVINGS: i64 = 100;
/// Longest plan a client may create
pub const MAX_PLAN_WEEKS: i64 = 52;
/// Largest quantity accepted on a recipe line or as an owned amount
pub const MAX_QUANTITY: i64 = 1_000_000_000;
/// Largest nutrient value per 100 g/ml an ingredient may carry
pub const MAX_NUTRIENT_VALUE: i64 = 1_000_000_000;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_path: PathBuf,
    pub pool_size: u32,
}

impl Config {
    /// Load configuration from `MEALPLAN_*` environment variables
    pub fn load() -> Self {
        Self {
            database_path: database_path(),
            pool_size: try_load("MEALPLAN_POOL_SIZE", 10),
        }
    }

    pub fn is_in_memory(&self) -> bool {
        self.database_path.as_os_str() == IN_MEMORY_PATH
    }
}

/// Tracing filter directive from `MEALPLAN_LOG`, default `mealplan=info`.
///
/// Read on its own so logging can start before the rest of the config loads.
pub fn log_filter() -> String {
    env::var("MEALPLAN_LOG").unwrap_or_else(|_| "mealplan=info".to_string())
}

fn try_load<T>(key: &str, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
{
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|e| {
            warn!("Invalid {key} value {raw:?}: {e}, using default {default}");
            default
        }),
        Err(_) => {
            info!("{key} not set, using default: {default}");
            default
        }
    }
}

/// Database path from the environment, or `<project>/data/mealplan.db`
fn database_path() -> PathBuf {
    env::var("MEALPLAN_DATABASE_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let mut path = env::current_exe()
                .ok()
                .and_then(|p| p.parent().map(|p| p.to_path_buf()))
                .unwrap_or_else(|| PathBuf::from("."));

            // Go up from target/release or target/debug to project root
            if path.ends_with("release") || path.ends_with("debug") {
                if let Some(grandparent) = path.parent().and_then(|p| p.parent()) {
                    path = grandparent.to_path_buf();
                }
            }

            path.push("data");
            path.push("mealplan.db");
            path
        })
}

/// Validate a client-supplied serving count
pub fn validate_servings(servings: Option<i64>) -> Result<Option<i64>, String> {
    match servings {
        Some(s) if !(MIN_SERVINGS..=MAX_SERVINGS).contains(&s) => Err(format!(
            "scaled_person must be between {} and {} (got {})",
            MIN_SERVINGS, MAX_SERVINGS, s
        )),
        other => Ok(other),
    }
}
