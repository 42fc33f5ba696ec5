//! Nutrition calculation module
//!
//! Portion scaling and per-portion nutrient totals. Pure functions over data
//! already loaded by the caller.

pub mod nutrients;
pub mod scaling;
pub mod totals;

pub use nutrients::{Nutrient, NutrientValues, NUTRIENT_COUNT};
pub use scaling::{scale_lines, scale_recipe, IngredientLine, QuantityOverflow, ScaledRecipe, Scaling};
pub use totals::{line_ratio, per_portion, recipe_totals};
