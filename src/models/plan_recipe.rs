//! Plan Recipe model
//!
//! A recipe scheduled on a date of a weekly plan, for a serving count.

use chrono::NaiveDate;
use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::{DbError, DbResult};

/// A planned recipe, with the recipe's name and base serving count
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanRecipe {
    pub id: i64,
    pub weekly_plan_id: i64,
    pub recipe_id: i64,
    pub recipe_name: String,
    pub recipe_person: i64,
    pub planned_date: NaiveDate,
    pub meal_type: Option<String>,
    pub scaled_person: Option<i64>,
    pub added_date: NaiveDate,
}

/// Data for adding a recipe to a plan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanRecipeCreate {
    pub weekly_plan_id: i64,
    pub recipe_id: i64,
    pub planned_date: NaiveDate,
    pub meal_type: Option<String>,
    /// Defaults to the recipe's base serving count
    pub scaled_person: Option<i64>,
}

const SELECT_DETAIL: &str = r#"
    SELECT pr.*, r.name AS recipe_name, r.person AS recipe_person
    FROM plan_recipes pr
    JOIN recipes r ON r.id = pr.recipe_id
"#;

impl PlanRecipe {
    /// Create a PlanRecipe from a joined database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            weekly_plan_id: row.get("weekly_plan_id")?,
            recipe_id: row.get("recipe_id")?,
            recipe_name: row.get("recipe_name")?,
            recipe_person: row.get("recipe_person")?,
            planned_date: row.get("planned_date")?,
            meal_type: row.get("meal_type")?,
            scaled_person: row.get("scaled_person")?,
            added_date: row.get("added_date")?,
        })
    }

    /// Insert a plan entry
    pub fn create(conn: &Connection, data: &PlanRecipeCreate) -> DbResult<Self> {
        conn.execute(
            r#"
            INSERT INTO plan_recipes (weekly_plan_id, recipe_id, planned_date, meal_type, scaled_person)
            VALUES (?1, ?2, ?3, ?4, COALESCE(?5, (SELECT person FROM recipes WHERE id = ?2)))
            "#,
            params![
                data.weekly_plan_id,
                data.recipe_id,
                data.planned_date,
                data.meal_type,
                data.scaled_person,
            ],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?.ok_or_else(|| DbError::not_found("plan recipe", id))
    }

    /// Get a plan entry by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let sql = format!("{} WHERE pr.id = ?1", SELECT_DETAIL);
        let mut stmt = conn.prepare(&sql)?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(entry) => Ok(Some(entry)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Entries of a plan ordered by planned date
    pub fn get_for_plan(conn: &Connection, weekly_plan_id: i64) -> DbResult<Vec<Self>> {
        let sql = format!(
            "{} WHERE pr.weekly_plan_id = ?1 ORDER BY pr.planned_date, pr.id",
            SELECT_DETAIL
        );
        let mut stmt = conn.prepare(&sql)?;

        let entries = stmt
            .query_map([weekly_plan_id], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(entries)
    }

    /// Remove a plan entry. Returns Ok(false) if not found.
    pub fn delete(conn: &Connection, id: i64) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM plan_recipes WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }
}
