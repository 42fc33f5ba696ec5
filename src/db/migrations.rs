//! Database migrations
//!
//! Schema creation and migration logic.

use rusqlite::Connection;
use tracing::warn;

use super::connection::DbResult;
use crate::nutrition::Nutrient;

/// Current schema version
const SCHEMA_VERSION: i32 = 1;

/// Run all migrations to bring the database up to the current schema version
pub fn run_migrations(conn: &Connection) -> DbResult<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
        [],
    )?;

    let current_version = get_schema_version(conn)?;
    if current_version > SCHEMA_VERSION {
        warn!(
            "Database schema version {} is newer than this build ({})",
            current_version, SCHEMA_VERSION
        );
    }

    if current_version < 1 {
        migrate_v1(conn)?;
        conn.execute("INSERT INTO schema_migrations (version) VALUES (1)", [])?;
    }

    Ok(())
}

/// One nullable TEXT column per tracked nutrient (values per 100 g/ml)
fn nutrient_columns() -> String {
    Nutrient::ALL
        .iter()
        .map(|n| format!("            {} TEXT,", n.column()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Migration v1: Initial schema
fn migrate_v1(conn: &Connection) -> DbResult<()> {
    let sql = format!(
        r#"
        -- ============================================
        -- INGREDIENTS
        -- Catalog with nutrient values per 100 g/ml.
        -- NULL means unknown, never zero.
        -- name_key is the trimmed, lowercased name.
        -- ============================================
        CREATE TABLE ingredients (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            name_key TEXT NOT NULL UNIQUE,
            category TEXT NOT NULL DEFAULT 'other',
{nutrients}
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_ingredients_category ON ingredients(category);

        -- ============================================
        -- RECIPES
        -- ============================================
        CREATE TABLE recipes (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            recipe_type TEXT NOT NULL,
            description TEXT,
            origin TEXT,
            preparation_time INTEGER NOT NULL DEFAULT 0,   -- minutes
            cooking_time INTEGER,
            rest_time INTEGER,
            total_time INTEGER NOT NULL DEFAULT 0,         -- derived on every write
            person INTEGER NOT NULL CHECK(person > 0),     -- base serving count
            is_baby_friendly INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_recipes_name ON recipes(name);
        CREATE INDEX idx_recipes_origin ON recipes(origin);

        CREATE TABLE recipe_steps (
            recipe_id INTEGER NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
            step_order INTEGER NOT NULL,
            step TEXT NOT NULL,
            PRIMARY KEY (recipe_id, step_order)
        );

        -- ============================================
        -- RECIPE INGREDIENTS
        -- Owned by the recipe; same ingredient may appear
        -- more than once (e.g. with different units)
        -- ============================================
        CREATE TABLE recipe_ingredients (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            recipe_id INTEGER NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
            ingredient_id INTEGER NOT NULL REFERENCES ingredients(id) ON DELETE RESTRICT,
            position INTEGER NOT NULL,
            quantity TEXT NOT NULL,              -- decimal, >= 0
            unit TEXT NOT NULL                   -- free text, passed through unchanged
        );

        CREATE INDEX idx_recipe_ingredients_recipe ON recipe_ingredients(recipe_id, position);
        CREATE INDEX idx_recipe_ingredients_ingredient ON recipe_ingredients(ingredient_id);

        -- ============================================
        -- WEEKLY PLANS
        -- ============================================
        CREATE TABLE weekly_plans (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            start_date TEXT NOT NULL,
            end_date TEXT NOT NULL,
            duration_weeks INTEGER NOT NULL CHECK(duration_weeks > 0),
            description TEXT,
            created_date TEXT NOT NULL DEFAULT (date('now'))
        );

        CREATE TABLE plan_recipes (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            weekly_plan_id INTEGER NOT NULL REFERENCES weekly_plans(id) ON DELETE CASCADE,
            recipe_id INTEGER NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
            planned_date TEXT NOT NULL,
            meal_type TEXT,
            scaled_person INTEGER,
            added_date TEXT NOT NULL DEFAULT (date('now'))
        );

        CREATE INDEX idx_plan_recipes_plan ON plan_recipes(weekly_plan_id, planned_date);
        CREATE INDEX idx_plan_recipes_recipe ON plan_recipes(recipe_id);

        -- ============================================
        -- SHOPPING LIST ITEMS
        -- Derived per plan; replaced on every regeneration
        -- ============================================
        CREATE TABLE shopping_list_items (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            weekly_plan_id INTEGER NOT NULL REFERENCES weekly_plans(id) ON DELETE CASCADE,
            ingredient_id INTEGER NOT NULL REFERENCES ingredients(id) ON DELETE CASCADE,
            unit TEXT NOT NULL,
            quantity_needed TEXT NOT NULL,
            quantity_owned TEXT NOT NULL DEFAULT '0',
            quantity_to_buy TEXT NOT NULL,
            is_checked INTEGER NOT NULL DEFAULT 0,
            is_validated INTEGER NOT NULL DEFAULT 0,
            UNIQUE(weekly_plan_id, ingredient_id, unit)
        );

        CREATE INDEX idx_shopping_list_items_plan ON shopping_list_items(weekly_plan_id);
        "#,
        nutrients = nutrient_columns(),
    );

    conn.execute_batch(&sql)?;
    Ok(())
}

/// Get the current schema version
pub fn get_schema_version(conn: &Connection) -> DbResult<i32> {
    let version: i32 = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
            [],
            |row| row.get(0),
        )
        .unwrap_or(0);
    Ok(version)
}
