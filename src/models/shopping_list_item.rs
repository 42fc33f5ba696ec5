//! Shopping List Item model
//!
//! Items are derived from a plan's recipes and replaced wholesale every time
//! the list is regenerated; owned quantities and flags do not survive a
//! regeneration.

use std::collections::HashMap;

use rusqlite::{params, Connection, Row, TransactionBehavior};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::db::{decimal, DbError, DbResult, SqlDecimal};
use crate::nutrition::IngredientLine;
use crate::shopping::{aggregate, quantity_to_buy, PlanEntry};
use super::plan_recipe::PlanRecipe;
use super::recipe_ingredient::lines_for_recipe;
use super::weekly_plan::WeeklyPlan;

/// Ingredient reference embedded in an item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemIngredient {
    pub id: i64,
    pub name: String,
    pub category: String,
}

/// One line of a plan's shopping list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShoppingListItem {
    pub id: i64,
    pub weekly_plan_id: i64,
    pub ingredient: ItemIngredient,
    pub quantity_needed: Decimal,
    pub quantity_owned: Decimal,
    pub quantity_to_buy: Decimal,
    pub unit: String,
    pub is_checked: bool,
    pub is_validated: bool,
}

/// Editable fields of an item
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShoppingListItemUpdate {
    pub quantity_owned: Option<Decimal>,
    pub is_checked: Option<bool>,
    pub is_validated: Option<bool>,
}

const SELECT_DETAIL: &str = r#"
    SELECT s.*, i.name AS ingredient_name, i.category AS ingredient_category
    FROM shopping_list_items s
    JOIN ingredients i ON i.id = s.ingredient_id
"#;

impl ShoppingListItem {
    /// Create a ShoppingListItem from a joined database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            weekly_plan_id: row.get("weekly_plan_id")?,
            ingredient: ItemIngredient {
                id: row.get("ingredient_id")?,
                name: row.get("ingredient_name")?,
                category: row.get("ingredient_category")?,
            },
            quantity_needed: decimal::get(row, "quantity_needed")?,
            quantity_owned: decimal::get(row, "quantity_owned")?,
            quantity_to_buy: decimal::get(row, "quantity_to_buy")?,
            unit: row.get("unit")?,
            is_checked: row.get::<_, i32>("is_checked")? != 0,
            is_validated: row.get::<_, i32>("is_validated")? != 0,
        })
    }

    /// Get an item by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let sql = format!("{} WHERE s.id = ?1", SELECT_DETAIL);
        let mut stmt = conn.prepare(&sql)?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(item) => Ok(Some(item)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Items of a plan ordered by ingredient category, name, then unit
    pub fn get_for_plan(conn: &Connection, weekly_plan_id: i64) -> DbResult<Vec<Self>> {
        let sql = format!(
            "{} WHERE s.weekly_plan_id = ?1
             ORDER BY i.category COLLATE NOCASE, i.name_key, s.unit, s.id",
            SELECT_DETAIL
        );
        let mut stmt = conn.prepare(&sql)?;

        let items = stmt
            .query_map([weekly_plan_id], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(items)
    }

    /// Recompute a plan's shopping list from its planned recipes.
    ///
    /// Runs in one write-locking transaction: the previous items are deleted
    /// and the freshly aggregated ones inserted, so readers see either the
    /// old list or the new one.
    pub fn regenerate_for_plan(conn: &mut Connection, weekly_plan_id: i64) -> DbResult<Vec<Self>> {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        if WeeklyPlan::get_by_id(&tx, weekly_plan_id)?.is_none() {
            return Err(DbError::not_found("weekly plan", weekly_plan_id));
        }

        let planned = PlanRecipe::get_for_plan(&tx, weekly_plan_id)?;

        let mut lines_by_recipe: HashMap<i64, Vec<IngredientLine>> = HashMap::new();
        for entry in &planned {
            if !lines_by_recipe.contains_key(&entry.recipe_id) {
                lines_by_recipe.insert(entry.recipe_id, lines_for_recipe(&tx, entry.recipe_id)?);
            }
        }

        let entries: Vec<PlanEntry<'_>> = planned
            .iter()
            .map(|entry| PlanEntry {
                base_person: Some(entry.recipe_person),
                scaled_person: entry.scaled_person,
                lines: lines_by_recipe
                    .get(&entry.recipe_id)
                    .map(Vec::as_slice)
                    .unwrap_or(&[]),
            })
            .collect();

        let aggregated = aggregate(&entries)?;

        tx.execute(
            "DELETE FROM shopping_list_items WHERE weekly_plan_id = ?1",
            [weekly_plan_id],
        )?;

        {
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO shopping_list_items (
                    weekly_plan_id, ingredient_id, unit,
                    quantity_needed, quantity_owned, quantity_to_buy
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
            )?;
            for line in &aggregated {
                stmt.execute(params![
                    weekly_plan_id,
                    line.ingredient_id,
                    line.unit,
                    SqlDecimal(line.quantity_needed),
                    SqlDecimal(line.quantity_owned),
                    SqlDecimal(line.quantity_to_buy),
                ])?;
            }
        }

        let items = Self::get_for_plan(&tx, weekly_plan_id)?;
        tx.commit()?;

        info!(
            plan_id = weekly_plan_id,
            recipes = planned.len(),
            items = items.len(),
            "regenerated shopping list"
        );

        Ok(items)
    }

    /// Edit an item and recompute its quantity to buy.
    ///
    /// Fails with `NotFound` when the item is gone, e.g. replaced by a
    /// regeneration since the caller last read the list.
    pub fn update(conn: &mut Connection, id: i64, data: &ShoppingListItemUpdate) -> DbResult<Self> {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let current = match Self::get_by_id(&tx, id)? {
            Some(item) => item,
            None => {
                warn!(item_id = id, "shopping list item no longer exists");
                return Err(DbError::not_found("shopping list item", id));
            }
        };

        let owned = data.quantity_owned.unwrap_or(current.quantity_owned);
        let to_buy = quantity_to_buy(current.quantity_needed, owned);
        let checked = data.is_checked.unwrap_or(current.is_checked);
        let validated = data.is_validated.unwrap_or(current.is_validated);

        tx.execute(
            r#"
            UPDATE shopping_list_items
            SET quantity_owned = ?1, quantity_to_buy = ?2, is_checked = ?3, is_validated = ?4
            WHERE id = ?5
            "#,
            params![
                SqlDecimal(owned),
                SqlDecimal(to_buy),
                checked as i32,
                validated as i32,
                id,
            ],
        )?;

        let item = Self::get_by_id(&tx, id)?.ok_or_else(|| DbError::not_found("shopping list item", id))?;
        tx.commit()?;

        Ok(item)
    }
}
