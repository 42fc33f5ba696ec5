//! Meal Planner MCP Server Implementation
//!
//! Implements the MCP server with all meal planning tools.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::db::Database;
use crate::models::{
    IngredientCreate, IngredientUpdate, PlanRecipeCreate, RecipeCreate, RecipeFilter,
    RecipeIngredientInput, RecipeUpdate, ShoppingListItemUpdate, WeeklyPlanCreate,
    WeeklyPlanUpdate, DEFAULT_CATEGORY,
};
use crate::nutrition::{Nutrient, NutrientValues};
use crate::tools::status::StatusTracker;
use crate::tools::{ingredients, plans, recipes, shopping};

/// Meal Planner MCP Service
#[derive(Clone)]
pub struct MealPlanService {
    status_tracker: Arc<Mutex<StatusTracker>>,
    database: Database,
    tool_router: ToolRouter<MealPlanService>,
}

impl MealPlanService {
    pub fn new(database_path: PathBuf, database: Database) -> Self {
        Self {
            status_tracker: Arc::new(Mutex::new(StatusTracker::new(database_path))),
            database,
            tool_router: Self::tool_router(),
        }
    }
}

// ============================================================================
// Conversions
// ============================================================================

fn to_decimal(field: &str, value: f64) -> Result<Decimal, McpError> {
    Decimal::from_f64(value)
        .ok_or_else(|| McpError::invalid_params(format!("{} is not a valid number: {}", field, value), None))
}

fn to_nutrients(raw: BTreeMap<String, Option<f64>>) -> Result<NutrientValues, McpError> {
    let mut values = NutrientValues::unknown();
    for (key, value) in raw {
        let nutrient = Nutrient::from_key(&key)
            .ok_or_else(|| McpError::invalid_params(format!("Unknown nutrient: {}", key), None))?;
        let value = value.map(|v| to_decimal(&key, v)).transpose()?;
        values.set(nutrient, value);
    }
    Ok(values)
}

fn to_date(raw: &str) -> Result<chrono::NaiveDate, McpError> {
    plans::parse_date(raw).map_err(|e| McpError::invalid_params(e, None))
}

fn to_inputs(lines: Vec<IngredientLineParam>) -> Result<Vec<RecipeIngredientInput>, McpError> {
    lines
        .into_iter()
        .map(|l| -> Result<RecipeIngredientInput, McpError> {
            Ok(RecipeIngredientInput {
                quantity: to_decimal("quantity", l.quantity)?,
                name: l.name,
                category: l.category,
                unit: l.unit,
            })
        })
        .collect()
}

fn json_result<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value).map_err(|e| McpError::internal_error(e.to_string(), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

fn not_found(entity: &str, id: i64) -> Result<CallToolResult, McpError> {
    Ok(CallToolResult::success(vec![Content::text(format!(
        r#"{{"error": "{} not found", "id": {}}}"#,
        entity, id
    ))]))
}

// ============================================================================
// Ingredient Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AddIngredientParams {
    /// Ingredient name (unique, case-insensitive)
    pub name: String,
    /// Category used to group the shopping list (default "other")
    pub category: Option<String>,
    /// Nutrient values per 100 g/ml keyed by nutrient name (e.g. energy_kcal, protein, iron).
    /// Leave unknown values out.
    #[serde(default)]
    pub nutrients: BTreeMap<String, Option<f64>>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetIngredientParams {
    /// Ingredient ID
    pub id: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListIngredientsParams {
    /// Search query for ingredient name (optional)
    pub query: Option<String>,
    /// Maximum results (default 50, max 200)
    #[serde(default = "default_list_limit")]
    pub limit: i64,
    /// Offset for pagination (default 0)
    #[serde(default)]
    pub offset: i64,
}

fn default_list_limit() -> i64 { 50 }

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UpdateIngredientParams {
    /// Ingredient ID to update
    pub id: i64,
    /// New name (optional)
    pub name: Option<String>,
    /// New category (optional)
    pub category: Option<String>,
    /// Nutrient values to set, per 100 g/ml (optional, others are kept)
    pub nutrients: Option<BTreeMap<String, Option<f64>>>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DeleteIngredientParams {
    /// Ingredient ID to delete
    pub id: i64,
}

// ============================================================================
// Recipe Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct IngredientLineParam {
    /// Ingredient name; created if it does not exist yet
    pub name: String,
    /// Category for a newly created ingredient (optional)
    pub category: Option<String>,
    /// Quantity for the recipe's base number of people
    pub quantity: f64,
    /// Unit, free text (g, ml, piece, ...). Never converted.
    pub unit: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CreateRecipeParams {
    /// Name of the recipe
    pub name: String,
    /// Kind of dish (starter, main, dessert, ...)
    pub recipe_type: String,
    pub description: Option<String>,
    pub origin: Option<String>,
    /// Preparation time in minutes (default 0)
    #[serde(default)]
    pub preparation_time: i64,
    /// Cooking time in minutes (optional)
    pub cooking_time: Option<i64>,
    /// Resting time in minutes (optional)
    pub rest_time: Option<i64>,
    /// Number of people the quantities are written for
    pub person: i64,
    /// Suitable for babies (default false)
    #[serde(default)]
    pub is_baby_friendly: bool,
    /// Preparation steps in order
    #[serde(default)]
    pub steps: Vec<String>,
    /// Ingredient lines in order
    #[serde(default)]
    pub ingredients: Vec<IngredientLineParam>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetRecipeParams {
    /// Recipe ID
    pub id: i64,
    /// Number of people to scale the recipe to, 1 to 100 (optional)
    pub scaled_person: Option<i64>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListRecipesParams {
    /// Search query for recipe name (optional)
    pub query: Option<String>,
    /// Only recipes from one of these origins, case-insensitive (optional)
    #[serde(default)]
    pub origins: Vec<String>,
    /// Only recipes containing ALL of these ingredient names (optional)
    #[serde(default)]
    pub ingredients: Vec<String>,
    /// Only baby friendly (true) or not (false) recipes (optional)
    pub baby_friendly: Option<bool>,
    /// Minimum total time in minutes (optional)
    pub min_total_time: Option<i64>,
    /// Maximum total time in minutes (optional)
    pub max_total_time: Option<i64>,
    /// Number of people to scale the recipes to, 1 to 100 (optional)
    pub scaled_person: Option<i64>,
    /// Maximum results (default 50, max 200)
    #[serde(default = "default_list_limit")]
    pub limit: i64,
    /// Offset for pagination (default 0)
    #[serde(default)]
    pub offset: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SearchRecipesByIngredientsParams {
    /// Ingredient names; recipes must contain all of them
    pub ingredients: Vec<String>,
    /// Number of people to scale the recipes to, 1 to 100 (optional)
    pub scaled_person: Option<i64>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UpdateRecipeParams {
    /// Recipe ID to update
    pub id: i64,
    pub name: Option<String>,
    pub recipe_type: Option<String>,
    pub description: Option<String>,
    pub origin: Option<String>,
    pub preparation_time: Option<i64>,
    pub cooking_time: Option<i64>,
    pub rest_time: Option<i64>,
    /// New base number of people (optional)
    pub person: Option<i64>,
    pub is_baby_friendly: Option<bool>,
    /// Replaces all steps when given
    pub steps: Option<Vec<String>>,
    /// Replaces all ingredient lines when given
    pub ingredients: Option<Vec<IngredientLineParam>>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DeleteRecipeParams {
    /// Recipe ID to delete
    pub id: i64,
}

// ============================================================================
// Plan Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CreatePlanParams {
    /// Name of the plan
    pub name: String,
    /// First day of the plan (YYYY-MM-DD)
    pub start_date: String,
    /// Number of weeks (default 1)
    #[serde(default = "default_weeks")]
    pub duration_weeks: i64,
    pub description: Option<String>,
}

fn default_weeks() -> i64 { 1 }

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PlanIdParams {
    /// Weekly plan ID
    pub id: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UpdatePlanParams {
    /// Weekly plan ID to update
    pub id: i64,
    /// New name (optional)
    pub name: Option<String>,
    /// New description (optional)
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AddRecipeToPlanParams {
    /// Weekly plan ID
    pub weekly_plan_id: i64,
    /// Recipe ID
    pub recipe_id: i64,
    /// Day within the plan (YYYY-MM-DD)
    pub planned_date: String,
    /// Meal label such as breakfast, lunch or dinner (optional)
    pub meal_type: Option<String>,
    /// Number of people, 1 to 100 (default: the recipe's own count)
    pub scaled_person: Option<i64>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct RemoveRecipeFromPlanParams {
    /// Plan recipe entry ID
    pub id: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CopyPlanParams {
    /// Weekly plan ID to copy
    pub id: i64,
    /// Start date of the copy (YYYY-MM-DD)
    pub new_start_date: String,
}

// ============================================================================
// Shopping List Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ShoppingListParams {
    /// Weekly plan ID
    pub weekly_plan_id: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UpdateShoppingListItemParams {
    /// Shopping list item ID
    pub id: i64,
    /// Quantity already at home, same unit as the item (optional)
    pub quantity_owned: Option<f64>,
    /// Ticked off (optional)
    pub is_checked: Option<bool>,
    /// Validated (optional)
    pub is_validated: Option<bool>,
}

#[tool_router]
impl MealPlanService {
    // --- Status ---

    #[tool(description = "Get the current status of the meal planner service including build info, database status, and process information")]
    async fn status(&self) -> Result<CallToolResult, McpError> {
        let tracker = self.status_tracker.lock().await;
        let status = tracker.get_status();
        json_result(&status)
    }

    #[tool(description = "Get instructions for managing ingredients, recipes, weekly plans and shopping lists. Call this when starting a planning session or when unsure how to use the tools.")]
    fn planning_instructions(&self) -> Result<CallToolResult, McpError> {
        use crate::tools::status::PLANNING_INSTRUCTIONS;
        Ok(CallToolResult::success(vec![Content::text(PLANNING_INSTRUCTIONS)]))
    }

    // --- Ingredients ---

    #[tool(description = "Create a new ingredient with nutrient values per 100 g/ml")]
    fn add_ingredient(&self, Parameters(p): Parameters<AddIngredientParams>) -> Result<CallToolResult, McpError> {
        let data = IngredientCreate {
            name: p.name,
            category: p.category.unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
            nutrients: to_nutrients(p.nutrients)?,
        };
        let result = ingredients::add_ingredient(&self.database, data).map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Get an ingredient with all 35 nutrient values and the recipes using it")]
    fn get_ingredient(&self, Parameters(p): Parameters<GetIngredientParams>) -> Result<CallToolResult, McpError> {
        let result = ingredients::get_ingredient(&self.database, p.id).map_err(|e| McpError::internal_error(e, None))?;
        match result {
            Some(detail) => json_result(&detail),
            None => not_found("Ingredient", p.id),
        }
    }

    #[tool(description = "List ingredients with optional name search and pagination")]
    fn list_ingredients(&self, Parameters(p): Parameters<ListIngredientsParams>) -> Result<CallToolResult, McpError> {
        let result = ingredients::list_ingredients(&self.database, p.query.as_deref(), p.limit, p.offset)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Update an ingredient's name, category or nutrient values. Nutrient values not given are kept.")]
    fn update_ingredient(&self, Parameters(p): Parameters<UpdateIngredientParams>) -> Result<CallToolResult, McpError> {
        let data = IngredientUpdate {
            name: p.name,
            category: p.category,
            nutrients: p.nutrients.map(to_nutrients).transpose()?,
        };
        let result = ingredients::update_ingredient(&self.database, p.id, data).map_err(|e| McpError::internal_error(e, None))?;
        match result {
            Some(ingredient) => json_result(&ingredient),
            None => not_found("Ingredient", p.id),
        }
    }

    #[tool(description = "Delete an ingredient (only allowed if not used in any recipe)")]
    fn delete_ingredient(&self, Parameters(p): Parameters<DeleteIngredientParams>) -> Result<CallToolResult, McpError> {
        let result = ingredients::delete_ingredient(&self.database, p.id).map_err(|e| McpError::internal_error(e, None))?;
        match result {
            Ok(success) => json_result(&success),
            Err(blocked) => json_result(&blocked),
        }
    }

    // --- Recipes ---

    #[tool(description = "Create a recipe with its steps and ingredient lines. Ingredients are matched by name and created when missing.")]
    fn create_recipe(&self, Parameters(p): Parameters<CreateRecipeParams>) -> Result<CallToolResult, McpError> {
        let lines = to_inputs(p.ingredients)?;
        let data = RecipeCreate {
            name: p.name,
            recipe_type: p.recipe_type,
            description: p.description,
            origin: p.origin,
            preparation_time: p.preparation_time,
            cooking_time: p.cooking_time,
            rest_time: p.rest_time,
            person: p.person,
            is_baby_friendly: p.is_baby_friendly,
            steps: p.steps,
        };
        let result = recipes::create_recipe(&self.database, data, lines).map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Get a recipe with ingredient quantities scaled to scaled_person and nutrients per portion")]
    fn get_recipe(&self, Parameters(p): Parameters<GetRecipeParams>) -> Result<CallToolResult, McpError> {
        let result = recipes::get_recipe(&self.database, p.id, p.scaled_person).map_err(|e| McpError::internal_error(e, None))?;
        match result {
            Some(recipe) => json_result(&recipe),
            None => not_found("Recipe", p.id),
        }
    }

    #[tool(description = "List recipes filtered by name, origins, required ingredients, baby friendliness or a total time range, optionally scaled")]
    fn list_recipes(&self, Parameters(p): Parameters<ListRecipesParams>) -> Result<CallToolResult, McpError> {
        let filter = RecipeFilter {
            query: p.query,
            origins: p.origins,
            ingredients: p.ingredients,
            baby_friendly: p.baby_friendly,
            min_total_time: p.min_total_time,
            max_total_time: p.max_total_time,
        };
        let result = recipes::list_recipes(&self.database, filter, p.scaled_person, p.limit, p.offset)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "List the distinct recipe origins, for use as list_recipes origins")]
    fn list_origins(&self) -> Result<CallToolResult, McpError> {
        let result = recipes::list_origins(&self.database).map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Find recipes that contain ALL of the given ingredients (names, case-insensitive)")]
    fn search_recipes_by_ingredients(&self, Parameters(p): Parameters<SearchRecipesByIngredientsParams>) -> Result<CallToolResult, McpError> {
        let result = recipes::search_recipes_by_ingredients(&self.database, p.ingredients, p.scaled_person)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Update a recipe. Steps and ingredient lines are replaced when given.")]
    fn update_recipe(&self, Parameters(p): Parameters<UpdateRecipeParams>) -> Result<CallToolResult, McpError> {
        let lines = p.ingredients.map(to_inputs).transpose()?;
        let data = RecipeUpdate {
            name: p.name,
            recipe_type: p.recipe_type,
            description: p.description,
            origin: p.origin,
            preparation_time: p.preparation_time,
            cooking_time: p.cooking_time,
            rest_time: p.rest_time,
            person: p.person,
            is_baby_friendly: p.is_baby_friendly,
            steps: p.steps,
        };
        let result = recipes::update_recipe(&self.database, p.id, data, lines).map_err(|e| McpError::internal_error(e, None))?;
        match result {
            Some(recipe) => json_result(&recipe),
            None => not_found("Recipe", p.id),
        }
    }

    #[tool(description = "Delete a recipe. Also removes it from every weekly plan.")]
    fn delete_recipe(&self, Parameters(p): Parameters<DeleteRecipeParams>) -> Result<CallToolResult, McpError> {
        let result = recipes::delete_recipe(&self.database, p.id).map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    // --- Weekly Plans ---

    #[tool(description = "Create a weekly plan. The end date is start_date + 7 × duration_weeks - 1 day.")]
    fn create_plan(&self, Parameters(p): Parameters<CreatePlanParams>) -> Result<CallToolResult, McpError> {
        let data = WeeklyPlanCreate {
            name: p.name,
            start_date: to_date(&p.start_date)?,
            duration_weeks: p.duration_weeks,
            description: p.description,
        };
        let result = plans::create_plan(&self.database, data).map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Get a weekly plan with its scheduled recipes ordered by date")]
    fn get_plan(&self, Parameters(p): Parameters<PlanIdParams>) -> Result<CallToolResult, McpError> {
        let result = plans::get_plan(&self.database, p.id).map_err(|e| McpError::internal_error(e, None))?;
        match result {
            Some(plan) => json_result(&plan),
            None => not_found("Weekly plan", p.id),
        }
    }

    #[tool(description = "List all weekly plans, newest first")]
    fn list_plans(&self) -> Result<CallToolResult, McpError> {
        let result = plans::list_plans(&self.database).map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Rename a weekly plan or change its description. Dates cannot be changed; use copy_plan instead.")]
    fn update_plan(&self, Parameters(p): Parameters<UpdatePlanParams>) -> Result<CallToolResult, McpError> {
        let data = WeeklyPlanUpdate {
            name: p.name,
            description: p.description,
        };
        let result = plans::update_plan(&self.database, p.id, data).map_err(|e| McpError::internal_error(e, None))?;
        match result {
            Some(plan) => json_result(&plan),
            None => not_found("Weekly plan", p.id),
        }
    }

    #[tool(description = "Delete a weekly plan with its scheduled recipes and shopping list")]
    fn delete_plan(&self, Parameters(p): Parameters<PlanIdParams>) -> Result<CallToolResult, McpError> {
        let result = plans::delete_plan(&self.database, p.id).map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Schedule a recipe on a day of a weekly plan for a number of people")]
    fn add_recipe_to_plan(&self, Parameters(p): Parameters<AddRecipeToPlanParams>) -> Result<CallToolResult, McpError> {
        let data = PlanRecipeCreate {
            weekly_plan_id: p.weekly_plan_id,
            recipe_id: p.recipe_id,
            planned_date: to_date(&p.planned_date)?,
            meal_type: p.meal_type,
            scaled_person: p.scaled_person,
        };
        let result = plans::add_recipe_to_plan(&self.database, data).map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Remove a scheduled recipe from its weekly plan")]
    fn remove_recipe_from_plan(&self, Parameters(p): Parameters<RemoveRecipeFromPlanParams>) -> Result<CallToolResult, McpError> {
        let result = plans::remove_recipe_from_plan(&self.database, p.id).map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Copy a weekly plan to a new start date. Scheduled recipes keep their offset from the start. The shopping list is not copied.")]
    fn copy_plan(&self, Parameters(p): Parameters<CopyPlanParams>) -> Result<CallToolResult, McpError> {
        let new_start = to_date(&p.new_start_date)?;
        let result = plans::copy_plan(&self.database, p.id, new_start).map_err(|e| McpError::internal_error(e, None))?;
        match result {
            Some(plan) => json_result(&plan),
            None => not_found("Weekly plan", p.id),
        }
    }

    // --- Shopping Lists ---

    #[tool(description = "Generate the shopping list of a weekly plan. REPLACES the previous list: owned quantities and ticks are lost.")]
    fn generate_shopping_list(&self, Parameters(p): Parameters<ShoppingListParams>) -> Result<CallToolResult, McpError> {
        let result = shopping::generate_shopping_list(&self.database, p.weekly_plan_id)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Get the current shopping list of a weekly plan, grouped by ingredient category")]
    fn get_shopping_list(&self, Parameters(p): Parameters<ShoppingListParams>) -> Result<CallToolResult, McpError> {
        let result = shopping::get_shopping_list(&self.database, p.weekly_plan_id)
            .map_err(|e| McpError::internal_error(e, None))?;
        match result {
            Some(list) => json_result(&list),
            None => not_found("Weekly plan", p.weekly_plan_id),
        }
    }

    #[tool(description = "Set the owned quantity of a shopping list item or tick it. quantity_to_buy is recomputed.")]
    fn update_shopping_list_item(&self, Parameters(p): Parameters<UpdateShoppingListItemParams>) -> Result<CallToolResult, McpError> {
        let data = ShoppingListItemUpdate {
            quantity_owned: p.quantity_owned.map(|q| to_decimal("quantity_owned", q)).transpose()?,
            is_checked: p.is_checked,
            is_validated: p.is_validated,
        };
        let result = shopping::update_shopping_list_item(&self.database, p.id, data)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }
}

// ============================================================================
// Server Handler
// ============================================================================

#[tool_handler]
impl ServerHandler for MealPlanService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "mealplan".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("Meal Planner".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Meal Planner - recipes, weekly meal plans, portion scaling and shopping lists. \
                 IMPORTANT: Call planning_instructions first. \
                 Ingredients: add/get/list/update/delete_ingredient (nutrients per 100 g/ml). \
                 Recipes: create/get/list/update/delete_recipe, search_recipes_by_ingredients, list_origins; \
                 pass scaled_person to scale quantities. \
                 Plans: create/get/list/update/delete_plan, add_recipe_to_plan, remove_recipe_from_plan, copy_plan. \
                 Shopping: generate_shopping_list (replaces the list), get_shopping_list, update_shopping_list_item."
                    .into(),
            ),
        }
    }
}
