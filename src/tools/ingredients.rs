//! Ingredient MCP Tools
//!
//! Tools for managing the ingredient catalog.

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::warn;

use crate::config::MAX_NUTRIENT_VALUE;
use crate::db::{Database, DbError};
use crate::models::{Ingredient, IngredientCreate, IngredientUpdate};
use crate::nutrition::{Nutrient, NutrientValues};

/// Response for add_ingredient
#[derive(Debug, Serialize)]
pub struct AddIngredientResponse {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub known_nutrients: usize,
}

/// Summary of an ingredient for list results
#[derive(Debug, Serialize)]
pub struct IngredientSummary {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub energy_kcal: Option<Decimal>,
    pub known_nutrients: usize,
}

impl From<&Ingredient> for IngredientSummary {
    fn from(ingredient: &Ingredient) -> Self {
        Self {
            id: ingredient.id,
            name: ingredient.name.clone(),
            category: ingredient.category.clone(),
            energy_kcal: ingredient.nutrients.get(Nutrient::EnergyKcal),
            known_nutrients: ingredient.nutrients.known_count(),
        }
    }
}

/// Full ingredient detail
#[derive(Debug, Serialize)]
pub struct IngredientDetail {
    #[serde(flatten)]
    pub ingredient: Ingredient,
    pub usage_count: i64,
    pub used_in_recipes: Vec<String>,
}

/// Response for list_ingredients
#[derive(Debug, Serialize)]
pub struct ListIngredientsResponse {
    pub ingredients: Vec<IngredientSummary>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

/// Response for delete_ingredient blocked
#[derive(Debug, Serialize)]
pub struct DeleteIngredientBlockedResponse {
    pub error: String,
    pub usage_count: i64,
    pub used_in_recipes: Vec<String>,
}

/// Response for successful delete_ingredient
#[derive(Debug, Serialize)]
pub struct DeleteIngredientSuccessResponse {
    pub success: bool,
    pub deleted_id: i64,
}

fn validate_nutrients(values: &NutrientValues) -> Result<(), String> {
    for (nutrient, value) in values.iter() {
        match value {
            Some(v) if v < Decimal::ZERO => {
                return Err(format!("{} cannot be negative", nutrient));
            }
            Some(v) if v > Decimal::from(MAX_NUTRIENT_VALUE) => {
                return Err(format!("{} cannot exceed {} per 100 g/ml", nutrient, MAX_NUTRIENT_VALUE));
            }
            _ => {}
        }
    }
    Ok(())
}

/// Add a new ingredient
pub fn add_ingredient(db: &Database, data: IngredientCreate) -> Result<AddIngredientResponse, String> {
    if data.name.trim().is_empty() {
        return Err("Ingredient name cannot be empty".to_string());
    }
    validate_nutrients(&data.nutrients)?;

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let ingredient = Ingredient::create(&conn, &data).map_err(|e| match e {
        DbError::Conflict(msg) => msg,
        e => format!("Failed to create ingredient: {}", e),
    })?;

    Ok(AddIngredientResponse {
        id: ingredient.id,
        name: ingredient.name,
        category: ingredient.category,
        known_nutrients: ingredient.nutrients.known_count(),
    })
}

/// Get an ingredient with its nutrient profile and usage
pub fn get_ingredient(db: &Database, id: i64) -> Result<Option<IngredientDetail>, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let ingredient = Ingredient::get_by_id(&conn, id)
        .map_err(|e| format!("Failed to get ingredient: {}", e))?;

    match ingredient {
        Some(ingredient) => {
            let usage_count = Ingredient::usage_count(&conn, id)
                .map_err(|e| format!("Failed to check usage: {}", e))?;
            let used_in_recipes = Ingredient::used_in_recipes(&conn, id)
                .map_err(|e| format!("Failed to get recipe usage: {}", e))?;

            Ok(Some(IngredientDetail {
                ingredient,
                usage_count,
                used_in_recipes,
            }))
        }
        None => Ok(None),
    }
}

/// List ingredients with optional name search and pagination
pub fn list_ingredients(
    db: &Database,
    query: Option<&str>,
    limit: i64,
    offset: i64,
) -> Result<ListIngredientsResponse, String> {
    let limit = limit.clamp(1, 200);
    let offset = offset.max(0);

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let ingredients = Ingredient::list(&conn, query, limit, offset)
        .map_err(|e| format!("Failed to list ingredients: {}", e))?;

    let total = Ingredient::count(&conn)
        .map_err(|e| format!("Failed to count ingredients: {}", e))?;

    Ok(ListIngredientsResponse {
        ingredients: ingredients.iter().map(IngredientSummary::from).collect(),
        total,
        limit,
        offset,
    })
}

/// Update an ingredient's name, category or nutrient values
pub fn update_ingredient(
    db: &Database,
    id: i64,
    data: IngredientUpdate,
) -> Result<Option<Ingredient>, String> {
    if let Some(ref name) = data.name {
        if name.trim().is_empty() {
            return Err("Ingredient name cannot be empty".to_string());
        }
    }
    if let Some(ref nutrients) = data.nutrients {
        validate_nutrients(nutrients)?;
    }

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    Ingredient::update(&conn, id, &data).map_err(|e| match e {
        DbError::Conflict(msg) => msg,
        e => format!("Failed to update ingredient: {}", e),
    })
}

/// Delete an ingredient (only allowed if no recipe uses it)
pub fn delete_ingredient(
    db: &Database,
    id: i64,
) -> Result<Result<DeleteIngredientSuccessResponse, DeleteIngredientBlockedResponse>, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let ingredient = Ingredient::get_by_id(&conn, id)
        .map_err(|e| format!("Database error: {}", e))?;
    if ingredient.is_none() {
        return Err(format!("Ingredient not found with id: {}", id));
    }

    let usage_count = Ingredient::usage_count(&conn, id)
        .map_err(|e| format!("Failed to check usage: {}", e))?;

    if usage_count > 0 {
        let used_in_recipes = Ingredient::used_in_recipes(&conn, id)
            .map_err(|e| format!("Failed to get recipe usage: {}", e))?;

        warn!(ingredient_id = id, usage_count, "ingredient delete blocked");

        return Ok(Err(DeleteIngredientBlockedResponse {
            error: format!("Cannot delete ingredient: used in {} recipe line(s)", usage_count),
            usage_count,
            used_in_recipes,
        }));
    }

    Ingredient::delete(&conn, id)
        .map_err(|e| format!("Failed to delete ingredient: {}", e))?;

    Ok(Ok(DeleteIngredientSuccessResponse {
        success: true,
        deleted_id: id,
    }))
}
