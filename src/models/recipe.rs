//! Recipe model
//!
//! A recipe stores its quantities for a base serving count (`person`).
//! Steps and ingredient lines are owned by the recipe and go with it.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::{DbError, DbResult};
use crate::models::ingredient::name_key;

/// A recipe with its ordered preparation steps
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    pub id: i64,
    pub name: String,
    pub recipe_type: String,
    pub description: Option<String>,
    pub origin: Option<String>,
    pub preparation_time: i64,
    pub cooking_time: Option<i64>,
    pub rest_time: Option<i64>,
    pub total_time: i64,
    pub person: i64,
    pub is_baby_friendly: bool,
    pub steps: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Data for creating a new recipe
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeCreate {
    pub name: String,
    pub recipe_type: String,
    pub description: Option<String>,
    pub origin: Option<String>,
    #[serde(default)]
    pub preparation_time: i64,
    pub cooking_time: Option<i64>,
    pub rest_time: Option<i64>,
    pub person: i64,
    #[serde(default)]
    pub is_baby_friendly: bool,
    #[serde(default)]
    pub steps: Vec<String>,
}

/// Data for updating a recipe. `steps` replaces all steps when present.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecipeUpdate {
    pub name: Option<String>,
    pub recipe_type: Option<String>,
    pub description: Option<String>,
    pub origin: Option<String>,
    pub preparation_time: Option<i64>,
    pub cooking_time: Option<i64>,
    pub rest_time: Option<i64>,
    pub person: Option<i64>,
    pub is_baby_friendly: Option<bool>,
    pub steps: Option<Vec<String>>,
}

/// Filters for listing recipes. Every filter that is set must match.
///
/// `origins` matches any of the listed origins. `ingredients` matches only
/// recipes that use all of the listed ingredient names. Blank entries are
/// ignored in both, and a list left empty does not filter.
#[derive(Debug, Clone, Default)]
pub struct RecipeFilter {
    pub query: Option<String>,
    pub origins: Vec<String>,
    pub ingredients: Vec<String>,
    pub baby_friendly: Option<bool>,
    pub min_total_time: Option<i64>,
    pub max_total_time: Option<i64>,
}

/// Trimmed, non-empty entries without case-insensitive duplicates
fn distinct_keys(values: &[String], key: impl Fn(&str) -> String) -> Vec<String> {
    let mut keys: Vec<String> = values
        .iter()
        .map(|v| key(v))
        .filter(|v| !v.is_empty())
        .collect();
    keys.sort();
    keys.dedup();
    keys
}

fn placeholders(params_vec: &mut Vec<Box<dyn rusqlite::ToSql>>, values: Vec<String>) -> String {
    let mut marks = Vec::with_capacity(values.len());
    for value in values {
        params_vec.push(Box::new(value));
        marks.push(format!("?{}", params_vec.len()));
    }
    marks.join(", ")
}

/// Sum of the present times
pub fn total_time(preparation: i64, cooking: Option<i64>, rest: Option<i64>) -> i64 {
    preparation + cooking.unwrap_or(0) + rest.unwrap_or(0)
}

const REFRESH_TOTAL_TIME: &str = "UPDATE recipes
     SET total_time = preparation_time + COALESCE(cooking_time, 0) + COALESCE(rest_time, 0)
     WHERE id = ?1";

impl Recipe {
    /// Create a Recipe from a database row; steps are loaded separately
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            recipe_type: row.get("recipe_type")?,
            description: row.get("description")?,
            origin: row.get("origin")?,
            preparation_time: row.get("preparation_time")?,
            cooking_time: row.get("cooking_time")?,
            rest_time: row.get("rest_time")?,
            total_time: row.get("total_time")?,
            person: row.get("person")?,
            is_baby_friendly: row.get::<_, i32>("is_baby_friendly")? != 0,
            steps: Vec::new(),
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    fn with_steps(mut self, conn: &Connection) -> DbResult<Self> {
        self.steps = Self::get_steps(conn, self.id)?;
        Ok(self)
    }

    /// Insert a new recipe and its steps
    pub fn create(conn: &Connection, data: &RecipeCreate) -> DbResult<Self> {
        conn.execute(
            r#"
            INSERT INTO recipes (
                name, recipe_type, description, origin,
                preparation_time, cooking_time, rest_time, total_time,
                person, is_baby_friendly
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
            params![
                data.name.trim(),
                data.recipe_type.trim(),
                data.description,
                data.origin,
                data.preparation_time,
                data.cooking_time,
                data.rest_time,
                total_time(data.preparation_time, data.cooking_time, data.rest_time),
                data.person,
                data.is_baby_friendly as i32,
            ],
        )?;

        let id = conn.last_insert_rowid();
        Self::set_steps(conn, id, &data.steps)?;

        Self::get_by_id(conn, id)?.ok_or_else(|| DbError::not_found("recipe", id))
    }

    /// Get a recipe by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM recipes WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(recipe) => Ok(Some(recipe.with_steps(conn)?)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Ordered preparation steps
    pub fn get_steps(conn: &Connection, recipe_id: i64) -> DbResult<Vec<String>> {
        let mut stmt =
            conn.prepare("SELECT step FROM recipe_steps WHERE recipe_id = ?1 ORDER BY step_order")?;
        let steps = stmt
            .query_map([recipe_id], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(steps)
    }

    /// Replace all steps of a recipe
    pub fn set_steps(conn: &Connection, recipe_id: i64, steps: &[String]) -> DbResult<()> {
        conn.execute("DELETE FROM recipe_steps WHERE recipe_id = ?1", [recipe_id])?;

        let mut stmt = conn
            .prepare("INSERT INTO recipe_steps (recipe_id, step_order, step) VALUES (?1, ?2, ?3)")?;
        for (order, step) in steps.iter().map(|s| s.trim()).filter(|s| !s.is_empty()).enumerate() {
            stmt.execute(params![recipe_id, order as i64, step])?;
        }
        Ok(())
    }

    /// List recipes matching every given filter, ordered by name
    pub fn list(conn: &Connection, filter: &RecipeFilter, limit: i64, offset: i64) -> DbResult<Vec<Self>> {
        let mut conditions = Vec::new();
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(ref q) = filter.query {
            conditions.push(format!("name LIKE ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(format!("%{}%", q.trim())));
        }
        let origins = distinct_keys(&filter.origins, |o| o.trim().to_ascii_lowercase());
        if !origins.is_empty() {
            let marks = placeholders(&mut params_vec, origins);
            conditions.push(format!("lower(trim(origin)) IN ({})", marks));
        }
        let ingredients = distinct_keys(&filter.ingredients, name_key);
        if !ingredients.is_empty() {
            let wanted = ingredients.len() as i64;
            let marks = placeholders(&mut params_vec, ingredients);
            conditions.push(format!(
                r#"id IN (
                    SELECT ri.recipe_id
                    FROM recipe_ingredients ri
                    JOIN ingredients i ON i.id = ri.ingredient_id
                    WHERE i.name_key IN ({})
                    GROUP BY ri.recipe_id
                    HAVING COUNT(DISTINCT i.id) = ?{}
                )"#,
                marks,
                params_vec.len() + 1
            ));
            params_vec.push(Box::new(wanted));
        }
        if let Some(baby) = filter.baby_friendly {
            conditions.push(format!("is_baby_friendly = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(baby as i32));
        }
        if let Some(min) = filter.min_total_time {
            conditions.push(format!("total_time >= ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(min));
        }
        if let Some(max) = filter.max_total_time {
            conditions.push(format!("total_time <= ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(max));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let sql = format!(
            "SELECT * FROM recipes {} ORDER BY name COLLATE NOCASE, id LIMIT ?{} OFFSET ?{}",
            where_clause,
            params_vec.len() + 1,
            params_vec.len() + 2
        );
        params_vec.push(Box::new(limit));
        params_vec.push(Box::new(offset));

        let params_refs: Vec<&dyn rusqlite::ToSql> = params_vec.iter().map(|p| p.as_ref()).collect();
        let mut stmt = conn.prepare(&sql)?;
        let recipes = stmt
            .query_map(params_refs.as_slice(), Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        recipes.into_iter().map(|r| r.with_steps(conn)).collect()
    }

    /// Recipes that contain every one of the given ingredient names.
    ///
    /// Names are trimmed and compared case-insensitively; duplicates count
    /// once. No usable name gives an empty result.
    pub fn search_by_ingredients(conn: &Connection, names: &[String]) -> DbResult<Vec<Self>> {
        let wanted = distinct_keys(names, name_key);
        if wanted.is_empty() {
            return Ok(Vec::new());
        }

        let filter = RecipeFilter {
            ingredients: wanted,
            ..Default::default()
        };
        Self::list(conn, &filter, i64::MAX, 0)
    }

    /// Distinct recipe origins, ordered case-insensitively
    pub fn origins(conn: &Connection) -> DbResult<Vec<String>> {
        let mut stmt = conn.prepare(
            "SELECT DISTINCT trim(origin) AS origin FROM recipes
             WHERE origin IS NOT NULL AND trim(origin) <> ''
             ORDER BY origin COLLATE NOCASE",
        )?;
        let origins = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(origins)
    }

    /// Update a recipe; `total_time` is recomputed
    pub fn update(conn: &Connection, id: i64, data: &RecipeUpdate) -> DbResult<Option<Self>> {
        if Self::get_by_id(conn, id)?.is_none() {
            return Ok(None);
        }

        let mut updates = Vec::new();
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(ref name) = data.name {
            updates.push(format!("name = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(name.trim().to_string()));
        }
        if let Some(ref recipe_type) = data.recipe_type {
            updates.push(format!("recipe_type = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(recipe_type.trim().to_string()));
        }
        if let Some(ref description) = data.description {
            updates.push(format!("description = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(description.clone()));
        }
        if let Some(ref origin) = data.origin {
            updates.push(format!("origin = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(origin.clone()));
        }
        if let Some(minutes) = data.preparation_time {
            updates.push(format!("preparation_time = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(minutes));
        }
        if let Some(minutes) = data.cooking_time {
            updates.push(format!("cooking_time = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(minutes));
        }
        if let Some(minutes) = data.rest_time {
            updates.push(format!("rest_time = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(minutes));
        }
        if let Some(person) = data.person {
            updates.push(format!("person = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(person));
        }
        if let Some(baby) = data.is_baby_friendly {
            updates.push(format!("is_baby_friendly = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(baby as i32));
        }

        if let Some(ref steps) = data.steps {
            Self::set_steps(conn, id, steps)?;
        }

        if updates.is_empty() && data.steps.is_none() {
            return Self::get_by_id(conn, id);
        }

        updates.push("updated_at = datetime('now')".to_string());

        let sql = format!(
            "UPDATE recipes SET {} WHERE id = ?{}",
            updates.join(", "),
            params_vec.len() + 1
        );

        params_vec.push(Box::new(id));

        let params_refs: Vec<&dyn rusqlite::ToSql> = params_vec.iter().map(|p| p.as_ref()).collect();
        conn.execute(&sql, params_refs.as_slice())?;
        conn.execute(REFRESH_TOTAL_TIME, [id])?;

        Self::get_by_id(conn, id)
    }

    /// Count recipes
    pub fn count(conn: &Connection) -> DbResult<i64> {
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM recipes", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Number of plan entries using this recipe
    pub fn plan_usage_count(conn: &Connection, id: i64) -> DbResult<i64> {
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM plan_recipes WHERE recipe_id = ?1",
            [id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Delete a recipe. Steps, ingredient lines and plan entries cascade.
    /// Returns Ok(false) if not found.
    pub fn delete(conn: &Connection, id: i64) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM recipes WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }
}
