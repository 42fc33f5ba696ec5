//! Data models
//!
//! Rust structs representing database entities.

mod ingredient;
mod plan_recipe;
mod recipe;
mod recipe_ingredient;
mod shopping_list_item;
mod weekly_plan;

pub use ingredient::{name_key, Ingredient, IngredientCreate, IngredientUpdate, DEFAULT_CATEGORY};
pub use plan_recipe::{PlanRecipe, PlanRecipeCreate};
pub use recipe::{total_time, Recipe, RecipeCreate, RecipeFilter, RecipeUpdate};
pub use recipe_ingredient::{lines_for_recipe, replace_for_recipe, RecipeIngredientInput};
pub use shopping_list_item::{ItemIngredient, ShoppingListItem, ShoppingListItemUpdate};
pub use weekly_plan::{end_date, WeeklyPlan, WeeklyPlanCreate, WeeklyPlanUpdate};
