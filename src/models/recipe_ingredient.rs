//! Recipe Ingredient model
//!
//! Ordered ingredient lines of a recipe, stored for the recipe's base
//! serving count.

use rusqlite::{params, Connection, Row};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::db::{decimal, DbResult, SqlDecimal};
use crate::nutrition::IngredientLine;
use super::ingredient::{nutrients_from_row, Ingredient};

/// One ingredient line as supplied by a client; the ingredient is named,
/// not referenced by id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeIngredientInput {
    pub name: String,
    /// Used only when the ingredient has to be created
    pub category: Option<String>,
    pub quantity: Decimal,
    pub unit: String,
}

/// Read a line joined with its ingredient's catalog row
fn line_from_row(row: &Row) -> rusqlite::Result<IngredientLine> {
    Ok(IngredientLine {
        ingredient_id: row.get("ingredient_id")?,
        name: row.get("name")?,
        category: row.get("category")?,
        quantity: decimal::get(row, "quantity")?,
        unit: row.get("unit")?,
        per_100: nutrients_from_row(row)?,
    })
}

/// Lines of a recipe in stored order, with ingredient names, categories and
/// nutrient values
pub fn lines_for_recipe(conn: &Connection, recipe_id: i64) -> DbResult<Vec<IngredientLine>> {
    let mut stmt = conn.prepare(
        r#"
        SELECT ri.ingredient_id, ri.quantity, ri.unit, i.*
        FROM recipe_ingredients ri
        JOIN ingredients i ON i.id = ri.ingredient_id
        WHERE ri.recipe_id = ?1
        ORDER BY ri.position, ri.id
        "#,
    )?;

    let lines = stmt
        .query_map([recipe_id], line_from_row)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(lines)
}

/// Replace every line of a recipe, resolving ingredients by name (and
/// creating the ones that do not exist yet)
pub fn replace_for_recipe(
    conn: &Connection,
    recipe_id: i64,
    inputs: &[RecipeIngredientInput],
) -> DbResult<Vec<IngredientLine>> {
    conn.execute("DELETE FROM recipe_ingredients WHERE recipe_id = ?1", [recipe_id])?;

    for (position, input) in inputs.iter().enumerate() {
        let ingredient = Ingredient::find_or_create(conn, &input.name, input.category.as_deref())?;
        conn.execute(
            r#"
            INSERT INTO recipe_ingredients (recipe_id, ingredient_id, position, quantity, unit)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                recipe_id,
                ingredient.id,
                position as i64,
                SqlDecimal(input.quantity),
                input.unit.trim(),
            ],
        )?;
    }

    lines_for_recipe(conn, recipe_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::recipe::tests::{conn, pasta_recipe};
    use crate::models::Recipe;
    use crate::nutrition::Nutrient;

    fn input(name: &str, quantity: &str, unit: &str) -> RecipeIngredientInput {
        RecipeIngredientInput {
            name: name.to_string(),
            category: None,
            quantity: quantity.parse().unwrap(),
            unit: unit.to_string(),
        }
    }

    #[test]
    fn test_replace_resolves_and_orders_lines() {
        let conn = conn();
        let recipe = Recipe::create(&conn, &pasta_recipe()).unwrap();

        let lines = replace_for_recipe(
            &conn,
            recipe.id,
            &[input("Flour", "200", "g"), input("Egg", "2", "pièce"), input("flour", "10", "g")],
        )
        .unwrap();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].name, "Flour");
        assert_eq!(lines[1].unit, "pièce");
        assert_eq!(lines[0].ingredient_id, lines[2].ingredient_id);
        assert_eq!(lines[2].quantity, Decimal::from(10));
        assert_eq!(Ingredient::count(&conn).unwrap(), 2);
    }

    #[test]
    fn test_lines_carry_nutrients() {
        let conn = conn();
        let recipe = Recipe::create(&conn, &pasta_recipe()).unwrap();
        replace_for_recipe(&conn, recipe.id, &[input("Flour", "200", "g")]).unwrap();

        let flour = Ingredient::find_by_name(&conn, "flour").unwrap().unwrap();
        conn.execute("UPDATE ingredients SET energy_kcal = '364' WHERE id = ?1", [flour.id])
            .unwrap();

        let lines = lines_for_recipe(&conn, recipe.id).unwrap();
        assert_eq!(lines[0].per_100.get(Nutrient::EnergyKcal), Some(Decimal::from(364)));
        assert_eq!(lines[0].per_100.get(Nutrient::Fat), None);
    }

    #[test]
    fn test_replace_drops_previous_lines() {
        let conn = conn();
        let recipe = Recipe::create(&conn, &pasta_recipe()).unwrap();
        replace_for_recipe(&conn, recipe.id, &[input("Flour", "200", "g"), input("Egg", "2", "pièce")])
            .unwrap();
        let lines = replace_for_recipe(&conn, recipe.id, &[input("Rice", "150", "g")]).unwrap();

        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].name, "Rice");
    }

    #[test]
    fn test_ingredient_in_use_cannot_be_deleted() {
        let conn = conn();
        let recipe = Recipe::create(&conn, &pasta_recipe()).unwrap();
        let lines = replace_for_recipe(&conn, recipe.id, &[input("Flour", "200", "g")]).unwrap();

        let err = Ingredient::delete(&conn, lines[0].ingredient_id).unwrap_err();
        assert!(matches!(err, crate::db::DbError::Conflict(_)));

        Recipe::delete(&conn, recipe.id).unwrap();
        assert!(Ingredient::delete(&conn, lines[0].ingredient_id).unwrap());
    }
}
