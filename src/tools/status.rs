//! Meal Planner Status Tool
//!
//! Provides runtime status information and the client usage guide.

use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::build_info::BuildInfo;
use crate::config::IN_MEMORY_PATH;

/// Meal planning instructions for AI assistants
pub const PLANNING_INSTRUCTIONS: &str = r#"
# Meal Planner Instructions

This guide explains how to plan meals and build shopping lists with the
Meal Planner tools.

## Overview

1. **Ingredients** - Catalog entries with nutrient values per 100 g (or 100 ml)
2. **Recipes** - Ingredient lines with quantities for a base number of people
3. **Weekly Plans** - Recipes scheduled on dates, each for a number of people
4. **Shopping Lists** - Generated from a plan by merging every scheduled recipe

---

## Ingredients

- `add_ingredient` with a name, a category and any known nutrient values
- Nutrient values are **per 100 g/ml**. Leave unknown values out: an absent
  value means "unknown", never zero
- Names are unique regardless of case ("Flour" and "flour" are the same)
- `delete_ingredient` is refused while a recipe uses the ingredient

Nutrient keys: energy_kcal, carbohydrates, sugars, fiber, fat, saturated_fat,
protein, salt, sodium, vitamin_a, vitamin_b1, vitamin_b2, vitamin_b3,
vitamin_b5, vitamin_b6, vitamin_b7, vitamin_b9, vitamin_b12, vitamin_c,
vitamin_d, vitamin_e, vitamin_k, calcium, iron, magnesium, phosphorus,
potassium, zinc, copper, manganese, selenium, iodine, chromium, molybdenum,
fluoride.

---

## Recipes

- `create_recipe` takes the ingredient lines by **name**. Missing ingredients
  are created automatically (without nutrient data, so fill them in later)
- `person` is the number of people the quantities are written for
- Pass `scaled_person` (1 to 100) to `get_recipe`, `list_recipes` or
  `search_recipes_by_ingredients` to see quantities for another group size
- `list_recipes` filters combine: `origins` matches any of the listed origins
  (see `list_origins`), `ingredients` requires every listed ingredient, and
  `min_total_time`/`max_total_time` bound the total time in minutes
- `nutrition_per_portion` is always per person. It does not change with
  `scaled_person`, only the quantities do
- Units are free text and never converted. Use the same unit for the same
  ingredient across recipes ("g" everywhere, not "g" here and "kg" there) or
  the shopping list will show two separate lines

---

## Weekly Plans

- `create_plan` with a start date (YYYY-MM-DD) and a number of weeks. The end
  date is computed: start + 7 × weeks - 1 day. Plans last 1 to 52 weeks
- `add_recipe_to_plan` schedules a recipe on a date inside the plan. Without
  `scaled_person` the recipe's own `person` is used
- `copy_plan` duplicates a plan to a new start date. Every scheduled recipe
  keeps its offset from the start

---

## Shopping Lists

- `generate_shopping_list` merges all scheduled recipes per ingredient and unit
- **Regenerating replaces the whole list.** Owned quantities and ticks are lost,
  and item ids change. Generate once the plan is final, then tick items off
- `update_shopping_list_item` records what is already at home
  (`quantity_owned`) and ticks items (`is_checked`, `is_validated`).
  `quantity_to_buy` is recomputed and never goes below zero
- An update that reports "not found" means the list was regenerated: fetch it
  again with `get_shopping_list`
"#;

/// Runtime status of the meal planner service
#[derive(Debug, Clone, Serialize)]
pub struct PlannerStatus {
    /// Build information
    pub build_number: u64,
    pub build_timestamp: &'static str,
    pub version: &'static str,

    /// Database information
    pub database_path: String,
    pub database_size_bytes: Option<u64>,

    /// Process information
    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,
}

/// Status tracker for collecting runtime information
pub struct StatusTracker {
    start_time: Instant,
    database_path: PathBuf,
}

impl StatusTracker {
    /// Create a new status tracker
    pub fn new(database_path: PathBuf) -> Self {
        Self {
            start_time: Instant::now(),
            database_path,
        }
    }

    /// Get the current status
    pub fn get_status(&self) -> PlannerStatus {
        let build_info = BuildInfo::current();

        let database_size_bytes = if self.database_path.as_os_str() == IN_MEMORY_PATH {
            None
        } else {
            std::fs::metadata(&self.database_path).ok().map(|m| m.len())
        };

        let pid = std::process::id();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]));

        let memory_usage_bytes = sys
            .process(Pid::from_u32(pid))
            .map(|p| p.memory())
            .unwrap_or(0);

        PlannerStatus {
            build_number: build_info.build_number,
            build_timestamp: build_info.build_timestamp,
            version: build_info.version,
            database_path: self.database_path.display().to_string(),
            database_size_bytes,
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid,
            memory_usage_bytes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_database_has_no_size() {
        let tracker = StatusTracker::new(PathBuf::from(IN_MEMORY_PATH));
        let status = tracker.get_status();
        assert_eq!(status.database_size_bytes, None);
        assert_eq!(status.database_path, IN_MEMORY_PATH);
        assert_eq!(status.process_id, std::process::id());
    }

    #[test]
    fn test_instructions_mention_recipe_filters() {
        for word in ["list_origins", "origins", "min_total_time", "max_total_time"] {
            assert!(PLANNING_INSTRUCTIONS.contains(word), "missing {}", word);
        }
    }

    #[test]
    fn test_instructions_mention_every_shopping_tool() {
        for tool in ["generate_shopping_list", "get_shopping_list", "update_shopping_list_item"] {
            assert!(PLANNING_INSTRUCTIONS.contains(tool), "missing {}", tool);
        }
    }
}
