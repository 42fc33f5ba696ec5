//! Meal Planner Tools module
//!
//! MCP tool implementations for recipes, plans and shopping lists.

pub mod ingredients;
pub mod plans;
pub mod recipes;
pub mod shopping;
pub mod status;
