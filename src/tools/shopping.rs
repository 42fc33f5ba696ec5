//! Shopping List MCP Tools
//!
//! Tools for generating and ticking off a plan's shopping list.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::config::MAX_QUANTITY;
use crate::db::{Database, DbError};
use crate::models::{ShoppingListItem, ShoppingListItemUpdate, WeeklyPlan};

/// A plan's shopping list
#[derive(Debug, Serialize)]
pub struct ShoppingListResponse {
    pub weekly_plan_id: i64,
    pub items: Vec<ShoppingListItem>,
    pub count: usize,
    pub remaining: usize,
}

impl ShoppingListResponse {
    fn new(weekly_plan_id: i64, items: Vec<ShoppingListItem>) -> Self {
        let remaining = items.iter().filter(|i| !i.is_checked).count();
        Self {
            weekly_plan_id,
            count: items.len(),
            remaining,
            items,
        }
    }
}

/// Recompute a plan's shopping list, discarding the previous one
pub fn generate_shopping_list(db: &Database, weekly_plan_id: i64) -> Result<ShoppingListResponse, String> {
    let items = db
        .with_conn_mut(|conn| ShoppingListItem::regenerate_for_plan(conn, weekly_plan_id))
        .map_err(|e| match e {
            DbError::NotFound { .. } => format!("Weekly plan not found with id: {}", weekly_plan_id),
            e => format!("Failed to generate shopping list: {}", e),
        })?;

    Ok(ShoppingListResponse::new(weekly_plan_id, items))
}

/// Current shopping list of a plan, ordered by category
pub fn get_shopping_list(db: &Database, weekly_plan_id: i64) -> Result<Option<ShoppingListResponse>, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    if WeeklyPlan::get_by_id(&conn, weekly_plan_id)
        .map_err(|e| format!("Database error: {}", e))?
        .is_none()
    {
        return Ok(None);
    }

    let items = ShoppingListItem::get_for_plan(&conn, weekly_plan_id)
        .map_err(|e| format!("Failed to get shopping list: {}", e))?;

    Ok(Some(ShoppingListResponse::new(weekly_plan_id, items)))
}

/// Record an owned quantity or tick an item
pub fn update_shopping_list_item(
    db: &Database,
    id: i64,
    data: ShoppingListItemUpdate,
) -> Result<ShoppingListItem, String> {
    match data.quantity_owned {
        Some(q) if q < Decimal::ZERO => return Err("quantity_owned cannot be negative".to_string()),
        Some(q) if q > Decimal::from(MAX_QUANTITY) => {
            return Err(format!("quantity_owned cannot exceed {}", MAX_QUANTITY))
        }
        _ => {}
    }

    db.with_conn_mut(|conn| ShoppingListItem::update(conn, id, &data))
        .map_err(|e| match e {
            DbError::NotFound { .. } => format!(
                "Shopping list item not found with id: {} (the list may have been regenerated)",
                id
            ),
            e => format!("Failed to update shopping list item: {}", e),
        })
}
