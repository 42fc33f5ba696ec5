//! Meal Planner Library
//!
//! Recipes, weekly meal plans, portion scaling, nutrition totals and
//! shopping lists.

pub mod build_info;
pub mod config;
pub mod db;
pub mod mcp;
pub mod models;
pub mod nutrition;
pub mod shopping;
pub mod tools;
