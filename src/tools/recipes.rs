//! Recipe MCP Tools
//!
//! Tools for managing recipes. Every read returns the recipe scaled to the
//! requested serving count, with per-portion nutrients.

use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::config::{validate_servings, MAX_QUANTITY};
use crate::db::{Database, DbResult};
use crate::models::{
    lines_for_recipe, replace_for_recipe, Recipe, RecipeCreate, RecipeFilter,
    RecipeIngredientInput, RecipeUpdate,
};
use crate::nutrition::{scale_recipe, IngredientLine, NutrientValues};

/// A recipe scaled to a serving count
#[derive(Debug, Serialize)]
pub struct RecipeView {
    pub id: i64,
    pub name: String,
    pub recipe_type: String,
    pub description: Option<String>,
    pub origin: Option<String>,
    pub preparation_time: i64,
    pub cooking_time: Option<i64>,
    pub rest_time: Option<i64>,
    pub total_time: i64,
    pub person: i64,
    pub scaled_person: Option<i64>,
    pub is_baby_friendly: bool,
    pub steps: Vec<String>,
    pub ingredients: Vec<IngredientLine>,
    pub nutrition_per_portion: NutrientValues,
}

/// Response for list_recipes
#[derive(Debug, Serialize)]
pub struct ListRecipesResponse {
    pub recipes: Vec<RecipeView>,
    pub count: usize,
    pub limit: i64,
    pub offset: i64,
}

/// Response for search_recipes_by_ingredients
#[derive(Debug, Serialize)]
pub struct SearchRecipesResponse {
    pub ingredients: Vec<String>,
    pub recipes: Vec<RecipeView>,
    pub count: usize,
}

/// Response for list_origins
#[derive(Debug, Serialize)]
pub struct ListOriginsResponse {
    pub origins: Vec<String>,
    pub count: usize,
}

/// Response for successful delete
#[derive(Debug, Serialize)]
pub struct RecipeDeleteResponse {
    pub success: bool,
    pub deleted_id: i64,
    pub plan_entries_removed: i64,
}

/// Load a recipe's lines and scale it
fn scaled_view(conn: &Connection, recipe: Recipe, requested: Option<i64>) -> DbResult<RecipeView> {
    let lines = lines_for_recipe(conn, recipe.id)?;
    let scaled = scale_recipe(Some(recipe.person), requested, &lines)?;

    Ok(RecipeView {
        id: recipe.id,
        name: recipe.name,
        recipe_type: recipe.recipe_type,
        description: recipe.description,
        origin: recipe.origin,
        preparation_time: recipe.preparation_time,
        cooking_time: recipe.cooking_time,
        rest_time: recipe.rest_time,
        total_time: recipe.total_time,
        person: recipe.person,
        scaled_person: scaled.scaling.effective_servings,
        is_baby_friendly: recipe.is_baby_friendly,
        steps: recipe.steps,
        ingredients: scaled.lines,
        nutrition_per_portion: scaled.nutrition_per_portion,
    })
}

fn validate_times(preparation: Option<i64>, cooking: Option<i64>, rest: Option<i64>) -> Result<(), String> {
    for (label, minutes) in [("preparation_time", preparation), ("cooking_time", cooking), ("rest_time", rest)] {
        if matches!(minutes, Some(m) if m < 0) {
            return Err(format!("{} cannot be negative", label));
        }
    }
    Ok(())
}

fn validate_ingredients(inputs: &[RecipeIngredientInput]) -> Result<(), String> {
    for (i, input) in inputs.iter().enumerate() {
        if input.name.trim().is_empty() {
            return Err(format!("Ingredient {}: name cannot be empty", i + 1));
        }
        if input.quantity < Decimal::ZERO {
            return Err(format!("Ingredient '{}': quantity cannot be negative", input.name.trim()));
        }
        if input.quantity > Decimal::from(MAX_QUANTITY) {
            return Err(format!(
                "Ingredient '{}': quantity cannot exceed {}",
                input.name.trim(),
                MAX_QUANTITY
            ));
        }
        if input.unit.trim().is_empty() {
            return Err(format!("Ingredient '{}': unit cannot be empty", input.name.trim()));
        }
    }
    Ok(())
}

// ============================================================================
// Recipe Tools
// ============================================================================

/// Create a recipe with its steps and ingredient lines
pub fn create_recipe(
    db: &Database,
    data: RecipeCreate,
    ingredients: Vec<RecipeIngredientInput>,
) -> Result<RecipeView, String> {
    if data.name.trim().is_empty() {
        return Err("Recipe name cannot be empty".to_string());
    }
    if data.recipe_type.trim().is_empty() {
        return Err("recipe_type cannot be empty".to_string());
    }
    if data.person < 1 {
        return Err("person must be at least 1".to_string());
    }
    validate_times(Some(data.preparation_time), data.cooking_time, data.rest_time)?;
    validate_ingredients(&ingredients)?;

    db.with_conn_mut(|conn| {
        let tx = conn.transaction()?;
        let recipe = Recipe::create(&tx, &data)?;
        replace_for_recipe(&tx, recipe.id, &ingredients)?;
        let view = scaled_view(&tx, recipe, None)?;
        tx.commit()?;
        Ok(view)
    })
    .map_err(|e| format!("Failed to create recipe: {}", e))
}

/// Get a recipe, optionally scaled to `scaled_person` servings
pub fn get_recipe(db: &Database, id: i64, scaled_person: Option<i64>) -> Result<Option<RecipeView>, String> {
    let scaled_person = validate_servings(scaled_person)?;

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let recipe = Recipe::get_by_id(&conn, id)
        .map_err(|e| format!("Failed to get recipe: {}", e))?;

    match recipe {
        Some(recipe) => scaled_view(&conn, recipe, scaled_person)
            .map(Some)
            .map_err(|e| format!("Failed to load ingredients: {}", e)),
        None => Ok(None),
    }
}

/// List recipes with filters and pagination
pub fn list_recipes(
    db: &Database,
    filter: RecipeFilter,
    scaled_person: Option<i64>,
    limit: i64,
    offset: i64,
) -> Result<ListRecipesResponse, String> {
    let scaled_person = validate_servings(scaled_person)?;
    match (filter.min_total_time, filter.max_total_time) {
        (Some(t), _) | (_, Some(t)) if t < 0 => {
            return Err("total time filters cannot be negative".to_string());
        }
        (Some(min), Some(max)) if min > max => {
            return Err("min_total_time cannot exceed max_total_time".to_string());
        }
        _ => {}
    }
    let limit = limit.clamp(1, 200);
    let offset = offset.max(0);

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let recipes = Recipe::list(&conn, &filter, limit, offset)
        .map_err(|e| format!("Failed to list recipes: {}", e))?;

    let views = recipes
        .into_iter()
        .map(|r| scaled_view(&conn, r, scaled_person))
        .collect::<DbResult<Vec<_>>>()
        .map_err(|e| format!("Failed to load ingredients: {}", e))?;

    Ok(ListRecipesResponse {
        count: views.len(),
        recipes: views,
        limit,
        offset,
    })
}

/// Distinct origins used by recipes, for building origin filters
pub fn list_origins(db: &Database) -> Result<ListOriginsResponse, String> {
    let origins = db
        .with_conn(Recipe::origins)
        .map_err(|e| format!("Failed to list origins: {}", e))?;

    Ok(ListOriginsResponse {
        count: origins.len(),
        origins,
    })
}

/// Recipes containing all of the given ingredients
pub fn search_recipes_by_ingredients(
    db: &Database,
    names: Vec<String>,
    scaled_person: Option<i64>,
) -> Result<SearchRecipesResponse, String> {
    let scaled_person = validate_servings(scaled_person)?;

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let recipes = Recipe::search_by_ingredients(&conn, &names)
        .map_err(|e| format!("Failed to search recipes: {}", e))?;

    let views = recipes
        .into_iter()
        .map(|r| scaled_view(&conn, r, scaled_person))
        .collect::<DbResult<Vec<_>>>()
        .map_err(|e| format!("Failed to load ingredients: {}", e))?;

    Ok(SearchRecipesResponse {
        ingredients: names,
        count: views.len(),
        recipes: views,
    })
}

/// Update a recipe. Steps and ingredient lines are replaced when supplied.
pub fn update_recipe(
    db: &Database,
    id: i64,
    data: RecipeUpdate,
    ingredients: Option<Vec<RecipeIngredientInput>>,
) -> Result<Option<RecipeView>, String> {
    if matches!(data.name.as_deref(), Some(n) if n.trim().is_empty()) {
        return Err("Recipe name cannot be empty".to_string());
    }
    if matches!(data.person, Some(p) if p < 1) {
        return Err("person must be at least 1".to_string());
    }
    validate_times(data.preparation_time, data.cooking_time, data.rest_time)?;
    if let Some(ref inputs) = ingredients {
        validate_ingredients(inputs)?;
    }

    db.with_conn_mut(|conn| {
        let tx = conn.transaction()?;
        let recipe = match Recipe::update(&tx, id, &data)? {
            Some(recipe) => recipe,
            None => return Ok(None),
        };
        if let Some(ref inputs) = ingredients {
            replace_for_recipe(&tx, id, inputs)?;
        }
        let view = scaled_view(&tx, recipe, None)?;
        tx.commit()?;
        Ok(Some(view))
    })
    .map_err(|e| format!("Failed to update recipe: {}", e))
}

/// Delete a recipe together with its lines, steps and plan entries
pub fn delete_recipe(db: &Database, id: i64) -> Result<RecipeDeleteResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let plan_entries_removed = Recipe::plan_usage_count(&conn, id)
        .map_err(|e| format!("Failed to check plan usage: {}", e))?;

    let deleted = Recipe::delete(&conn, id)
        .map_err(|e| format!("Failed to delete recipe: {}", e))?;
    if !deleted {
        return Err(format!("Recipe not found with id: {}", id));
    }

    Ok(RecipeDeleteResponse {
        success: true,
        deleted_id: id,
        plan_entries_removed,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::{Ingredient, IngredientUpdate};
    use crate::nutrition::Nutrient;

    pub(crate) fn db() -> Database {
        let db = Database::open_in_memory().unwrap();
        db.with_conn(|conn| crate::db::migrations::run_migrations(conn)).unwrap();
        db
    }

    pub(crate) fn input(name: &str, quantity: &str, unit: &str) -> RecipeIngredientInput {
        RecipeIngredientInput {
            name: name.to_string(),
            category: Some("pantry".to_string()),
            quantity: quantity.parse().unwrap(),
            unit: unit.to_string(),
        }
    }

    pub(crate) fn recipe(name: &str, person: i64) -> RecipeCreate {
        RecipeCreate {
            name: name.to_string(),
            recipe_type: "main".to_string(),
            description: None,
            origin: None,
            preparation_time: 20,
            cooking_time: Some(10),
            rest_time: None,
            person,
            is_baby_friendly: false,
            steps: vec!["Cook".to_string()],
        }
    }

    fn set_kcal(db: &Database, name: &str, kcal: i64) {
        db.with_conn(|conn| {
            let ingredient = Ingredient::find_by_name(conn, name)?.unwrap();
            let update = IngredientUpdate {
                nutrients: Some(NutrientValues::unknown().with(Nutrient::EnergyKcal, Decimal::from(kcal))),
                ..Default::default()
            };
            Ingredient::update(conn, ingredient.id, &update)?;
            Ok(())
        })
        .unwrap();
    }

    /// Pasta for 2: flour 200 g at 364 kcal, egg 100 g at 155 kcal
    pub(crate) fn create_pasta(db: &Database) -> RecipeView {
        let view = create_recipe(
            db,
            recipe("Pasta", 2),
            vec![input("Flour", "200", "g"), input("Egg", "100", "g")],
        )
        .unwrap();
        set_kcal(db, "Flour", 364);
        set_kcal(db, "Egg", 155);
        view
    }

    #[test]
    fn test_get_scaled_pasta() {
        let db = db();
        let pasta = create_pasta(&db);

        let view = get_recipe(&db, pasta.id, Some(4)).unwrap().unwrap();
        assert_eq!(view.person, 2);
        assert_eq!(view.scaled_person, Some(4));
        assert_eq!(view.ingredients[0].quantity, Decimal::from(400));
        assert_eq!(view.ingredients[1].quantity, Decimal::from(200));
        assert_eq!(
            view.nutrition_per_portion.get(Nutrient::EnergyKcal),
            Some("441.5".parse().unwrap())
        );
        assert_eq!(view.nutrition_per_portion.get(Nutrient::Protein), None);
    }

    #[test]
    fn test_get_unscaled_reports_base() {
        let db = db();
        let pasta = create_pasta(&db);

        let view = get_recipe(&db, pasta.id, None).unwrap().unwrap();
        assert_eq!(view.scaled_person, Some(2));
        assert_eq!(view.ingredients[0].quantity, Decimal::from(200));
        assert_eq!(view.total_time, 30);
    }

    #[test]
    fn test_servings_out_of_range_rejected() {
        let db = db();
        let pasta = create_pasta(&db);
        assert!(get_recipe(&db, pasta.id, Some(0)).is_err());
        assert!(get_recipe(&db, pasta.id, Some(101)).is_err());
        assert!(get_recipe(&db, 999, None).unwrap().is_none());
    }

    #[test]
    fn test_create_validates_input() {
        let db = db();
        assert!(create_recipe(&db, recipe("", 2), vec![]).is_err());
        assert!(create_recipe(&db, recipe("Soup", 0), vec![]).is_err());
        assert!(create_recipe(&db, recipe("Soup", 2), vec![input("Leek", "-1", "g")]).is_err());
        assert!(create_recipe(&db, recipe("Soup", 2), vec![input("Leek", "1", " ")]).is_err());
        assert!(create_recipe(&db, recipe("Soup", 2), vec![input("Leek", "1000000001", "g")]).is_err());
    }

    #[test]
    fn test_largest_quantity_scales_to_most_servings() {
        let db = db();
        let bulk = create_recipe(&db, recipe("Bulk", 1), vec![input("Rice", "1000000000", "g")]).unwrap();
        set_kcal(&db, "Rice", 1_000_000_000);

        let view = get_recipe(&db, bulk.id, Some(100)).unwrap().unwrap();
        assert_eq!(view.ingredients[0].quantity, Decimal::from(100_000_000_000i64));
        assert_eq!(
            view.nutrition_per_portion.get(Nutrient::EnergyKcal),
            Some(Decimal::from(10_000_000_000_000_000i64))
        );
    }

    #[test]
    fn test_search_requires_all_ingredients() {
        let db = db();
        create_pasta(&db);
        create_recipe(&db, recipe("Omelette", 1), vec![input("Egg", "150", "g")]).unwrap();

        let both = search_recipes_by_ingredients(&db, vec!["egg".to_string(), " FLOUR ".to_string()], None)
            .unwrap();
        assert_eq!(both.count, 1);
        assert_eq!(both.recipes[0].name, "Pasta");

        let egg = search_recipes_by_ingredients(&db, vec!["Egg".to_string(), "egg".to_string()], None)
            .unwrap();
        assert_eq!(egg.count, 2);

        assert_eq!(search_recipes_by_ingredients(&db, vec![], None).unwrap().count, 0);
        assert_eq!(
            search_recipes_by_ingredients(&db, vec!["Egg".to_string(), "Truffle".to_string()], None)
                .unwrap()
                .count,
            0
        );
    }

    #[test]
    fn test_update_replaces_lines() {
        let db = db();
        let pasta = create_pasta(&db);

        let update = RecipeUpdate {
            person: Some(4),
            ..Default::default()
        };
        let view = update_recipe(&db, pasta.id, update, Some(vec![input("Flour", "400", "g")]))
            .unwrap()
            .unwrap();

        assert_eq!(view.person, 4);
        assert_eq!(view.ingredients.len(), 1);
        assert_eq!(
            view.nutrition_per_portion.get(Nutrient::EnergyKcal),
            Some(Decimal::from(364))
        );

        assert!(update_recipe(&db, 999, RecipeUpdate::default(), None).unwrap().is_none());
    }

    #[test]
    fn test_list_scales_every_recipe() {
        let db = db();
        create_pasta(&db);

        let list = list_recipes(&db, RecipeFilter::default(), Some(6), 50, 0).unwrap();
        assert_eq!(list.count, 1);
        assert_eq!(list.recipes[0].ingredients[0].quantity, Decimal::from(600));
    }

    #[test]
    fn test_list_combines_filters() {
        let db = db();
        create_pasta(&db);
        let mut omelette = recipe("Omelette", 1);
        omelette.origin = Some("France".to_string());
        omelette.preparation_time = 5;
        omelette.cooking_time = Some(5);
        create_recipe(&db, omelette, vec![input("Egg", "120", "g")]).unwrap();

        let with_egg = RecipeFilter {
            ingredients: vec!["egg".to_string()],
            ..Default::default()
        };
        assert_eq!(list_recipes(&db, with_egg, None, 50, 0).unwrap().count, 2);

        let french_quick_egg = RecipeFilter {
            ingredients: vec!["EGG".to_string()],
            origins: vec!["france".to_string()],
            min_total_time: Some(5),
            max_total_time: Some(15),
            ..Default::default()
        };
        let list = list_recipes(&db, french_quick_egg, Some(2), 50, 0).unwrap();
        assert_eq!(list.count, 1);
        assert_eq!(list.recipes[0].name, "Omelette");
        assert_eq!(list.recipes[0].ingredients[0].quantity, Decimal::from(240));

        let at_least_half_hour = RecipeFilter {
            min_total_time: Some(30),
            ..Default::default()
        };
        let list = list_recipes(&db, at_least_half_hour, None, 50, 0).unwrap();
        assert_eq!(list.count, 1);
        assert_eq!(list.recipes[0].name, "Pasta");

        let inverted = RecipeFilter {
            min_total_time: Some(20),
            max_total_time: Some(10),
            ..Default::default()
        };
        assert!(list_recipes(&db, inverted, None, 50, 0).is_err());
        let negative = RecipeFilter {
            min_total_time: Some(-1),
            ..Default::default()
        };
        assert!(list_recipes(&db, negative, None, 50, 0).is_err());
    }

    #[test]
    fn test_list_origins() {
        let db = db();
        assert_eq!(list_origins(&db).unwrap().count, 0);

        create_pasta(&db);
        for (name, origin) in [("Pizza", "Italy"), ("Ratatouille", "France"), ("Lasagne", "Italy")] {
            let mut data = recipe(name, 2);
            data.origin = Some(origin.to_string());
            create_recipe(&db, data, Vec::new()).unwrap();
        }

        let origins = list_origins(&db).unwrap();
        assert_eq!(origins.count, 2);
        assert_eq!(origins.origins, vec!["France", "Italy"]);
    }

    #[test]
    fn test_delete() {
        let db = db();
        let pasta = create_pasta(&db);
        let result = delete_recipe(&db, pasta.id).unwrap();
        assert!(result.success);
        assert!(delete_recipe(&db, pasta.id).is_err());
    }
}
