//! Ingredient model
//!
//! Catalog entry with nutrient values per 100 g/ml. Names are unique,
//! compared through a Unicode-lowercased key (`name_key`).

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::{decimal, DbError, DbResult, SqlDecimal};
use crate::nutrition::{Nutrient, NutrientValues};

pub const DEFAULT_CATEGORY: &str = "other";

/// An ingredient with its nutrient profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ingredient {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub nutrients: NutrientValues,
    pub created_at: String,
    pub updated_at: String,
}

/// Data for creating a new ingredient
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngredientCreate {
    pub name: String,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub nutrients: NutrientValues,
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

/// Data for updating an ingredient.
///
/// Nutrient values present in `nutrients` overwrite the stored ones; values
/// left out (or null) keep what is stored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IngredientUpdate {
    pub name: Option<String>,
    pub category: Option<String>,
    pub nutrients: Option<NutrientValues>,
}

/// Lookup key for an ingredient name: trimmed and lowercased
pub fn name_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Read the 35 nutrient columns of an `ingredients` row
pub(crate) fn nutrients_from_row(row: &Row) -> rusqlite::Result<NutrientValues> {
    let mut values = NutrientValues::unknown();
    for nutrient in Nutrient::ALL {
        values.set(nutrient, decimal::get_opt(row, nutrient.column())?);
    }
    Ok(values)
}

fn nutrient_params(values: &NutrientValues) -> Vec<Option<SqlDecimal>> {
    values.iter().map(|(_, v)| v.map(SqlDecimal)).collect()
}

impl Ingredient {
    /// Create an Ingredient from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            category: row.get("category")?,
            nutrients: nutrients_from_row(row)?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// Insert a new ingredient. Fails with `Conflict` when the name is taken.
    pub fn create(conn: &Connection, data: &IngredientCreate) -> DbResult<Self> {
        let name = data.name.trim();
        if let Some(existing) = Self::find_by_name(conn, name)? {
            return Err(DbError::Conflict(format!(
                "ingredient '{}' already exists with id {}",
                existing.name, existing.id
            )));
        }

        let columns: Vec<&str> = Nutrient::ALL.iter().map(|n| n.column()).collect();
        let placeholders: Vec<String> = (0..columns.len()).map(|i| format!("?{}", i + 4)).collect();
        let sql = format!(
            "INSERT INTO ingredients (name, name_key, category, {}) VALUES (?1, ?2, ?3, {})",
            columns.join(", "),
            placeholders.join(", ")
        );

        let category = data.category.trim();
        let category = if category.is_empty() { DEFAULT_CATEGORY } else { category };

        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = vec![
            Box::new(name.to_string()),
            Box::new(name_key(name)),
            Box::new(category.to_string()),
        ];
        for value in nutrient_params(&data.nutrients) {
            params_vec.push(Box::new(value));
        }

        let params_refs: Vec<&dyn rusqlite::ToSql> = params_vec.iter().map(|p| p.as_ref()).collect();
        conn.execute(&sql, params_refs.as_slice())?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?.ok_or_else(|| DbError::not_found("ingredient", id))
    }

    /// Get an ingredient by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM ingredients WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(ingredient) => Ok(Some(ingredient)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Look up an ingredient by name, ignoring case and surrounding spaces
    pub fn find_by_name(conn: &Connection, name: &str) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM ingredients WHERE name_key = ?1")?;

        let result = stmt.query_row([name_key(name)], Self::from_row);
        match result {
            Ok(ingredient) => Ok(Some(ingredient)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Resolve an ingredient by name, creating it without nutrient data when
    /// it does not exist yet
    pub fn find_or_create(conn: &Connection, name: &str, category: Option<&str>) -> DbResult<Self> {
        if let Some(existing) = Self::find_by_name(conn, name)? {
            return Ok(existing);
        }

        Self::create(
            conn,
            &IngredientCreate {
                name: name.trim().to_string(),
                category: category.map(str::to_string).unwrap_or_else(default_category),
                nutrients: NutrientValues::unknown(),
            },
        )
    }

    /// List ingredients, optionally filtered by a name fragment
    pub fn list(conn: &Connection, query: Option<&str>, limit: i64, offset: i64) -> DbResult<Vec<Self>> {
        let ingredients = match query {
            Some(q) => {
                let mut stmt = conn.prepare(
                    "SELECT * FROM ingredients WHERE name_key LIKE ?1 ORDER BY name_key LIMIT ?2 OFFSET ?3",
                )?;
                let pattern = format!("%{}%", name_key(q));
                let rows = stmt.query_map(params![pattern, limit, offset], Self::from_row)?;
                rows.collect::<Result<Vec<_>, _>>()?
            }
            None => {
                let mut stmt =
                    conn.prepare("SELECT * FROM ingredients ORDER BY name_key LIMIT ?1 OFFSET ?2")?;
                let rows = stmt.query_map(params![limit, offset], Self::from_row)?;
                rows.collect::<Result<Vec<_>, _>>()?
            }
        };

        Ok(ingredients)
    }

    /// Count ingredients
    pub fn count(conn: &Connection) -> DbResult<i64> {
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM ingredients", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Update an ingredient
    pub fn update(conn: &Connection, id: i64, data: &IngredientUpdate) -> DbResult<Option<Self>> {
        let current = match Self::get_by_id(conn, id)? {
            Some(ingredient) => ingredient,
            None => return Ok(None),
        };

        let mut updates = Vec::new();
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(ref name) = data.name {
            let name = name.trim();
            if let Some(other) = Self::find_by_name(conn, name)? {
                if other.id != id {
                    return Err(DbError::Conflict(format!(
                        "ingredient '{}' already exists with id {}",
                        other.name, other.id
                    )));
                }
            }
            updates.push(format!("name = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(name.to_string()));
            updates.push(format!("name_key = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(name_key(name)));
        }
        if let Some(ref category) = data.category {
            updates.push(format!("category = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(category.trim().to_string()));
        }
        if let Some(ref patch) = data.nutrients {
            let mut merged = current.nutrients;
            merged.merge(patch);
            for (nutrient, value) in merged.iter() {
                updates.push(format!("{} = ?{}", nutrient.column(), params_vec.len() + 1));
                params_vec.push(Box::new(value.map(SqlDecimal)));
            }
        }

        if updates.is_empty() {
            return Ok(Some(current));
        }

        updates.push("updated_at = datetime('now')".to_string());

        let sql = format!(
            "UPDATE ingredients SET {} WHERE id = ?{}",
            updates.join(", "),
            params_vec.len() + 1
        );

        params_vec.push(Box::new(id));

        let params_refs: Vec<&dyn rusqlite::ToSql> = params_vec.iter().map(|p| p.as_ref()).collect();
        conn.execute(&sql, params_refs.as_slice())?;

        Self::get_by_id(conn, id)
    }

    /// Number of recipe lines referencing this ingredient
    pub fn usage_count(conn: &Connection, id: i64) -> DbResult<i64> {
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM recipe_ingredients WHERE ingredient_id = ?1",
            [id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Names of the recipes using this ingredient
    pub fn used_in_recipes(conn: &Connection, id: i64) -> DbResult<Vec<String>> {
        let mut stmt = conn.prepare(
            r#"
            SELECT DISTINCT r.name
            FROM recipe_ingredients ri
            JOIN recipes r ON r.id = ri.recipe_id
            WHERE ri.ingredient_id = ?1
            ORDER BY r.name
            "#,
        )?;
        let names = stmt
            .query_map([id], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(names)
    }

    /// Delete an ingredient.
    /// Returns Ok(false) if not found, and `Conflict` while recipes use it.
    pub fn delete(conn: &Connection, id: i64) -> DbResult<bool> {
        if Self::get_by_id(conn, id)?.is_none() {
            return Ok(false);
        }

        let usage = Self::usage_count(conn, id)?;
        if usage > 0 {
            return Err(DbError::Conflict(format!(
                "ingredient {} is used by {} recipe line(s)",
                id, usage
            )));
        }

        let rows = conn.execute("DELETE FROM ingredients WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;
    use rust_decimal::Decimal;

    fn conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("PRAGMA foreign_keys = ON;").unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    fn flour() -> IngredientCreate {
        IngredientCreate {
            name: "Flour".to_string(),
            category: "pantry".to_string(),
            nutrients: NutrientValues::unknown()
                .with(Nutrient::EnergyKcal, Decimal::from(364))
                .with(Nutrient::Protein, "10.33".parse().unwrap()),
        }
    }

    #[test]
    fn test_create_and_read_back_nutrients() {
        let conn = conn();
        let created = Ingredient::create(&conn, &flour()).unwrap();

        let read = Ingredient::get_by_id(&conn, created.id).unwrap().unwrap();
        assert_eq!(read.name, "Flour");
        assert_eq!(read.category, "pantry");
        assert_eq!(read.nutrients.get(Nutrient::EnergyKcal), Some(Decimal::from(364)));
        assert_eq!(read.nutrients.get(Nutrient::Protein), Some("10.33".parse().unwrap()));
        assert_eq!(read.nutrients.get(Nutrient::Iron), None);
        assert_eq!(read.nutrients.known_count(), 2);
    }

    #[test]
    fn test_duplicate_name_is_a_conflict() {
        let conn = conn();
        Ingredient::create(&conn, &flour()).unwrap();

        let mut dup = flour();
        dup.name = "  FLOUR ".to_string();
        let err = Ingredient::create(&conn, &dup).unwrap_err();
        assert!(matches!(err, DbError::Conflict(_)));
    }

    #[test]
    fn test_non_ascii_names_fold_case() {
        let conn = conn();
        let shallot = Ingredient::find_or_create(&conn, "Échalote", None).unwrap();

        let found = Ingredient::find_by_name(&conn, "ÉCHALOTE").unwrap().unwrap();
        assert_eq!(found.id, shallot.id);
        assert_eq!(found.name, "Échalote");

        let mut dup = flour();
        dup.name = "échalote".to_string();
        assert!(matches!(
            Ingredient::create(&conn, &dup),
            Err(DbError::Conflict(_))
        ));

        let listed = Ingredient::list(&conn, Some("ÉCHAL"), 50, 0).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(name_key(" Crème Fraîche "), "crème fraîche");
    }

    #[test]
    fn test_find_or_create_is_case_insensitive() {
        let conn = conn();
        let created = Ingredient::create(&conn, &flour()).unwrap();

        let found = Ingredient::find_or_create(&conn, "flour", None).unwrap();
        assert_eq!(found.id, created.id);

        let new = Ingredient::find_or_create(&conn, "Saffron", Some("spices")).unwrap();
        assert_ne!(new.id, created.id);
        assert_eq!(new.category, "spices");
        assert_eq!(new.nutrients.known_count(), 0);
        assert_eq!(Ingredient::count(&conn).unwrap(), 2);
    }

    #[test]
    fn test_update_merges_nutrients() {
        let conn = conn();
        let created = Ingredient::create(&conn, &flour()).unwrap();

        let update = IngredientUpdate {
            category: Some("baking".to_string()),
            nutrients: Some(NutrientValues::unknown().with(Nutrient::Fiber, Decimal::from(3))),
            ..Default::default()
        };
        let updated = Ingredient::update(&conn, created.id, &update).unwrap().unwrap();

        assert_eq!(updated.category, "baking");
        assert_eq!(updated.nutrients.get(Nutrient::Fiber), Some(Decimal::from(3)));
        assert_eq!(updated.nutrients.get(Nutrient::EnergyKcal), Some(Decimal::from(364)));
        assert!(Ingredient::update(&conn, 999, &update).unwrap().is_none());
    }

    #[test]
    fn test_rename_onto_existing_name_is_a_conflict() {
        let conn = conn();
        Ingredient::create(&conn, &flour()).unwrap();
        let egg = Ingredient::find_or_create(&conn, "Egg", None).unwrap();

        let update = IngredientUpdate {
            name: Some("flour".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            Ingredient::update(&conn, egg.id, &update),
            Err(DbError::Conflict(_))
        ));
    }

    #[test]
    fn test_list_filters_by_name() {
        let conn = conn();
        Ingredient::create(&conn, &flour()).unwrap();
        Ingredient::find_or_create(&conn, "Buckwheat flour", None).unwrap();
        Ingredient::find_or_create(&conn, "Egg", None).unwrap();

        let all = Ingredient::list(&conn, None, 50, 0).unwrap();
        assert_eq!(all.len(), 3);

        let floury = Ingredient::list(&conn, Some("flour"), 50, 0).unwrap();
        assert_eq!(floury.len(), 2);
    }

    #[test]
    fn test_delete_unused() {
        let conn = conn();
        let created = Ingredient::create(&conn, &flour()).unwrap();
        assert!(Ingredient::delete(&conn, created.id).unwrap());
        assert!(!Ingredient::delete(&conn, created.id).unwrap());
    }
}
