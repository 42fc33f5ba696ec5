//! Shopping list module
//!
//! Pure aggregation of a plan's recipes into shopping quantities.

pub mod aggregator;

pub use aggregator::{aggregate, quantity_to_buy, AggregatedLine, PlanEntry, ShoppingKey};
