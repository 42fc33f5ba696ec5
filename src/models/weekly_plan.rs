//! Weekly Plan model
//!
//! A plan covers `duration_weeks` whole weeks starting at `start_date`.
//! Its dates are fixed once created; copying a plan is the way to move it.

use chrono::{Duration, NaiveDate};
use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::{DbError, DbResult};
use super::plan_recipe::{PlanRecipe, PlanRecipeCreate};

/// A weekly plan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklyPlan {
    pub id: i64,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub duration_weeks: i64,
    pub description: Option<String>,
    pub created_date: NaiveDate,
}

/// Data for creating a plan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklyPlanCreate {
    pub name: String,
    pub start_date: NaiveDate,
    pub duration_weeks: i64,
    pub description: Option<String>,
}

/// Data for updating a plan; dates cannot change
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeeklyPlanUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Last day of a plan: start + 7 × weeks − 1 day, or `None` past the
/// supported calendar
pub fn end_date(start: NaiveDate, duration_weeks: i64) -> Option<NaiveDate> {
    let days = duration_weeks.checked_mul(7)?.checked_sub(1)?;
    start.checked_add_signed(Duration::try_days(days)?)
}

impl WeeklyPlan {
    /// Create a WeeklyPlan from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            start_date: row.get("start_date")?,
            end_date: row.get("end_date")?,
            duration_weeks: row.get("duration_weeks")?,
            description: row.get("description")?,
            created_date: row.get("created_date")?,
        })
    }

    /// Insert a new plan
    pub fn create(conn: &Connection, data: &WeeklyPlanCreate) -> DbResult<Self> {
        let end = end_date(data.start_date, data.duration_weeks).ok_or_else(|| {
            DbError::Invalid(format!(
                "a {}-week plan starting {} ends past the last supported date",
                data.duration_weeks, data.start_date
            ))
        })?;

        conn.execute(
            r#"
            INSERT INTO weekly_plans (name, start_date, end_date, duration_weeks, description)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                data.name.trim(),
                data.start_date,
                end,
                data.duration_weeks,
                data.description,
            ],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?.ok_or_else(|| DbError::not_found("weekly plan", id))
    }

    /// Get a plan by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM weekly_plans WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(plan) => Ok(Some(plan)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// All plans, newest first
    pub fn list(conn: &Connection) -> DbResult<Vec<Self>> {
        let mut stmt =
            conn.prepare("SELECT * FROM weekly_plans ORDER BY created_date DESC, id DESC")?;
        let plans = stmt
            .query_map([], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(plans)
    }

    /// Update name and description
    pub fn update(conn: &Connection, id: i64, data: &WeeklyPlanUpdate) -> DbResult<Option<Self>> {
        let mut updates = Vec::new();
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(ref name) = data.name {
            updates.push(format!("name = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(name.trim().to_string()));
        }
        if let Some(ref description) = data.description {
            updates.push(format!("description = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(description.clone()));
        }

        if updates.is_empty() {
            return Self::get_by_id(conn, id);
        }

        let sql = format!(
            "UPDATE weekly_plans SET {} WHERE id = ?{}",
            updates.join(", "),
            params_vec.len() + 1
        );

        params_vec.push(Box::new(id));

        let params_refs: Vec<&dyn rusqlite::ToSql> = params_vec.iter().map(|p| p.as_ref()).collect();
        conn.execute(&sql, params_refs.as_slice())?;

        Self::get_by_id(conn, id)
    }

    /// Copy a plan to a new start date.
    ///
    /// Entries keep their offset from the start, meal type and serving
    /// count. Shopping list items are not copied.
    pub fn copy(conn: &Connection, id: i64, new_start: NaiveDate) -> DbResult<Option<Self>> {
        let source = match Self::get_by_id(conn, id)? {
            Some(plan) => plan,
            None => return Ok(None),
        };

        let copy = Self::create(
            conn,
            &WeeklyPlanCreate {
                name: format!("Copy of {}", source.name),
                start_date: new_start,
                duration_weeks: source.duration_weeks,
                description: source.description.clone(),
            },
        )?;

        let shift = new_start.signed_duration_since(source.start_date);
        for entry in PlanRecipe::get_for_plan(conn, id)? {
            let planned_date = entry.planned_date.checked_add_signed(shift).ok_or_else(|| {
                DbError::Invalid(format!("{} shifted to {} is out of range", entry.planned_date, new_start))
            })?;
            PlanRecipe::create(
                conn,
                &PlanRecipeCreate {
                    weekly_plan_id: copy.id,
                    recipe_id: entry.recipe_id,
                    planned_date,
                    meal_type: entry.meal_type,
                    scaled_person: entry.scaled_person,
                },
            )?;
        }

        Ok(Some(copy))
    }

    /// Delete a plan; entries and shopping list items cascade.
    /// Returns Ok(false) if not found.
    pub fn delete(conn: &Connection, id: i64) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM weekly_plans WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }
}
