//! Weekly Plan MCP Tools
//!
//! Tools for building weekly plans and scheduling recipes in them.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::info;

use crate::config::{validate_servings, MAX_PLAN_WEEKS};
use crate::db::{Database, DbError};
use crate::models::{
    PlanRecipe, PlanRecipeCreate, Recipe, WeeklyPlan, WeeklyPlanCreate, WeeklyPlanUpdate,
};

/// A plan with its scheduled recipes
#[derive(Debug, Serialize)]
pub struct PlanDetail {
    #[serde(flatten)]
    pub plan: WeeklyPlan,
    pub recipes: Vec<PlanRecipe>,
}

/// Response for list_plans
#[derive(Debug, Serialize)]
pub struct ListPlansResponse {
    pub plans: Vec<WeeklyPlan>,
    pub count: usize,
}

/// Response for delete_plan / remove_recipe_from_plan
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub deleted_id: i64,
}

/// Parse a YYYY-MM-DD date
pub fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| format!("Invalid date '{}': expected YYYY-MM-DD", raw))
}

fn load_detail(db: &Database, id: i64) -> Result<Option<PlanDetail>, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let plan = WeeklyPlan::get_by_id(&conn, id)
        .map_err(|e| format!("Failed to get plan: {}", e))?;

    match plan {
        Some(plan) => {
            let recipes = PlanRecipe::get_for_plan(&conn, id)
                .map_err(|e| format!("Failed to get plan recipes: {}", e))?;
            Ok(Some(PlanDetail { plan, recipes }))
        }
        None => Ok(None),
    }
}

// ============================================================================
// Plan Tools
// ============================================================================

/// Create a plan starting at `start_date` for `duration_weeks` weeks
pub fn create_plan(db: &Database, data: WeeklyPlanCreate) -> Result<WeeklyPlan, String> {
    if data.name.trim().is_empty() {
        return Err("Plan name cannot be empty".to_string());
    }
    if !(1..=MAX_PLAN_WEEKS).contains(&data.duration_weeks) {
        return Err(format!("duration_weeks must be between 1 and {}", MAX_PLAN_WEEKS));
    }

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    WeeklyPlan::create(&conn, &data).map_err(|e| match e {
        DbError::Invalid(msg) => msg,
        e => format!("Failed to create plan: {}", e),
    })
}

/// Get a plan with its scheduled recipes
pub fn get_plan(db: &Database, id: i64) -> Result<Option<PlanDetail>, String> {
    load_detail(db, id)
}

/// List all plans, newest first
pub fn list_plans(db: &Database) -> Result<ListPlansResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let plans = WeeklyPlan::list(&conn).map_err(|e| format!("Failed to list plans: {}", e))?;

    Ok(ListPlansResponse {
        count: plans.len(),
        plans,
    })
}

/// Rename a plan or change its description
pub fn update_plan(db: &Database, id: i64, data: WeeklyPlanUpdate) -> Result<Option<WeeklyPlan>, String> {
    if matches!(data.name.as_deref(), Some(n) if n.trim().is_empty()) {
        return Err("Plan name cannot be empty".to_string());
    }

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    WeeklyPlan::update(&conn, id, &data).map_err(|e| format!("Failed to update plan: {}", e))
}

/// Delete a plan with its entries and shopping list
pub fn delete_plan(db: &Database, id: i64) -> Result<DeleteResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let deleted = WeeklyPlan::delete(&conn, id).map_err(|e| format!("Failed to delete plan: {}", e))?;
    if !deleted {
        return Err(format!("Weekly plan not found with id: {}", id));
    }

    Ok(DeleteResponse {
        success: true,
        deleted_id: id,
    })
}

/// Schedule a recipe in a plan
pub fn add_recipe_to_plan(db: &Database, data: PlanRecipeCreate) -> Result<PlanRecipe, String> {
    validate_servings(data.scaled_person)?;

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let plan = WeeklyPlan::get_by_id(&conn, data.weekly_plan_id)
        .map_err(|e| format!("Database error: {}", e))?
        .ok_or_else(|| format!("Weekly plan not found with id: {}", data.weekly_plan_id))?;

    if Recipe::get_by_id(&conn, data.recipe_id)
        .map_err(|e| format!("Database error: {}", e))?
        .is_none()
    {
        return Err(format!("Recipe not found with id: {}", data.recipe_id));
    }

    if data.planned_date < plan.start_date || data.planned_date > plan.end_date {
        return Err(format!(
            "planned_date {} is outside the plan ({} to {})",
            data.planned_date, plan.start_date, plan.end_date
        ));
    }

    PlanRecipe::create(&conn, &data).map_err(|e| format!("Failed to add recipe to plan: {}", e))
}

/// Remove a scheduled recipe from its plan
pub fn remove_recipe_from_plan(db: &Database, plan_recipe_id: i64) -> Result<DeleteResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let deleted = PlanRecipe::delete(&conn, plan_recipe_id)
        .map_err(|e| format!("Failed to remove plan recipe: {}", e))?;
    if !deleted {
        return Err(format!("Plan recipe not found with id: {}", plan_recipe_id));
    }

    Ok(DeleteResponse {
        success: true,
        deleted_id: plan_recipe_id,
    })
}

/// Copy a plan to a new start date, shifting every scheduled recipe
pub fn copy_plan(db: &Database, id: i64, new_start: NaiveDate) -> Result<Option<PlanDetail>, String> {
    let copy = db
        .with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            let copy = WeeklyPlan::copy(&tx, id, new_start)?;
            tx.commit()?;
            Ok(copy)
        })
        .map_err(|e| match e {
            DbError::Invalid(msg) => msg,
            e => format!("Failed to copy plan: {}", e),
        })?;

    match copy {
        Some(copy) => {
            info!(source_plan = id, new_plan = copy.id, start = %new_start, "copied plan");
            load_detail(db, copy.id)
        }
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::recipes::tests::{create_pasta, db};

    fn week(db: &Database) -> WeeklyPlan {
        create_plan(
            db,
            WeeklyPlanCreate {
                name: "Week 10".to_string(),
                start_date: parse_date("2024-03-04").unwrap(),
                duration_weeks: 1,
                description: None,
            },
        )
        .unwrap()
    }

    #[test]
    fn test_parse_date() {
        assert!(parse_date("2024-03-04").is_ok());
        assert!(parse_date("04/03/2024").is_err());
    }

    #[test]
    fn test_create_validates() {
        let db = db();
        let bad = WeeklyPlanCreate {
            name: "Zero".to_string(),
            start_date: parse_date("2024-03-04").unwrap(),
            duration_weeks: 0,
            description: None,
        };
        assert!(create_plan(&db, bad).is_err());

        let endless = WeeklyPlanCreate {
            name: "Endless".to_string(),
            start_date: parse_date("2024-03-04").unwrap(),
            duration_weeks: 100_000_000,
            description: None,
        };
        let err = create_plan(&db, endless).unwrap_err();
        assert!(err.contains("between 1 and 52"));

        let last_day = WeeklyPlanCreate {
            name: "Last".to_string(),
            start_date: NaiveDate::MAX,
            duration_weeks: 1,
            description: None,
        };
        assert!(create_plan(&db, last_day).unwrap_err().contains("last supported date"));

        assert_eq!(week(&db).end_date, parse_date("2024-03-10").unwrap());
    }

    #[test]
    fn test_add_recipe_checks_plan_recipe_and_dates() {
        let db = db();
        let plan = week(&db);
        let pasta = create_pasta(&db);

        let entry = |recipe_id, date: &str, servings| PlanRecipeCreate {
            weekly_plan_id: plan.id,
            recipe_id,
            planned_date: parse_date(date).unwrap(),
            meal_type: Some("dinner".to_string()),
            scaled_person: servings,
        };

        let added = add_recipe_to_plan(&db, entry(pasta.id, "2024-03-06", None)).unwrap();
        assert_eq!(added.scaled_person, Some(2));

        assert!(add_recipe_to_plan(&db, entry(999, "2024-03-06", None)).is_err());
        assert!(add_recipe_to_plan(&db, entry(pasta.id, "2024-03-11", None)).is_err());
        assert!(add_recipe_to_plan(&db, entry(pasta.id, "2024-03-06", Some(0))).is_err());

        let detail = get_plan(&db, plan.id).unwrap().unwrap();
        assert_eq!(detail.recipes.len(), 1);

        remove_recipe_from_plan(&db, added.id).unwrap();
        assert!(remove_recipe_from_plan(&db, added.id).is_err());
    }

    #[test]
    fn test_copy_plan() {
        let db = db();
        let plan = week(&db);
        let pasta = create_pasta(&db);
        add_recipe_to_plan(
            &db,
            PlanRecipeCreate {
                weekly_plan_id: plan.id,
                recipe_id: pasta.id,
                planned_date: parse_date("2024-03-08").unwrap(),
                meal_type: None,
                scaled_person: Some(6),
            },
        )
        .unwrap();

        let copy = copy_plan(&db, plan.id, parse_date("2024-03-11").unwrap()).unwrap().unwrap();
        assert_eq!(copy.plan.name, "Copy of Week 10");
        assert_eq!(copy.recipes.len(), 1);
        assert_eq!(copy.recipes[0].planned_date, parse_date("2024-03-15").unwrap());
        assert_eq!(copy.recipes[0].scaled_person, Some(6));

        assert!(copy_plan(&db, 999, parse_date("2024-03-11").unwrap()).unwrap().is_none());
        assert!(copy_plan(&db, plan.id, NaiveDate::MAX).unwrap_err().contains("last supported date"));

        let list = list_plans(&db).unwrap();
        assert_eq!(list.count, 2);
        assert_eq!(list.plans[0].id, copy.plan.id);
    }

    #[test]
    fn test_update_and_delete() {
        let db = db();
        let plan = week(&db);

        let update = WeeklyPlanUpdate {
            name: None,
            description: Some("Light week".to_string()),
        };
        let updated = update_plan(&db, plan.id, update).unwrap().unwrap();
        assert_eq!(updated.description.as_deref(), Some("Light week"));
        assert_eq!(updated.name, "Week 10");

        delete_plan(&db, plan.id).unwrap();
        assert!(get_plan(&db, plan.id).unwrap().is_none());
        assert!(delete_plan(&db, plan.id).is_err());
    }
}
