//! Portion scaling
//!
//! Recipes store quantities for a base serving count ("person"). Scaling to a
//! requested serving count multiplies every quantity by `requested / base`;
//! units are never converted.

use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

use super::nutrients::NutrientValues;
use super::totals::per_portion;

/// One recipe ingredient line with the catalog data needed for computation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IngredientLine {
    pub ingredient_id: i64,
    pub name: String,
    pub category: String,
    pub quantity: Decimal,
    pub unit: String,
    /// Nutrient values per 100 g/ml of the ingredient
    #[serde(skip)]
    pub per_100: NutrientValues,
}

/// A scaled or summed quantity does not fit in a `Decimal`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("quantity too large to scale")]
pub struct QuantityOverflow;

/// Scale factor and the serving count it produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Scaling {
    pub factor: Decimal,
    pub effective_servings: Option<i64>,
}

impl Scaling {
    /// Build the scaling for a recipe with `base` servings.
    ///
    /// A missing or non-positive request, or a missing or non-positive base,
    /// means no scaling: factor 1 and the base reported as effective.
    pub fn new(base: Option<i64>, requested: Option<i64>) -> Self {
        match (base, requested) {
            (Some(base), Some(requested)) if base > 0 && requested > 0 => Self {
                factor: Decimal::from(requested) / Decimal::from(base),
                effective_servings: Some(requested),
            },
            _ => Self::identity(base),
        }
    }

    pub fn identity(base: Option<i64>) -> Self {
        Self {
            factor: Decimal::ONE,
            effective_servings: base,
        }
    }

    pub fn apply(&self, quantity: Decimal) -> Result<Decimal, QuantityOverflow> {
        quantity.checked_mul(self.factor).ok_or(QuantityOverflow)
    }
}

/// Scale every line's quantity, keeping order and units
pub fn scale_lines(lines: &[IngredientLine], scaling: &Scaling) -> Result<Vec<IngredientLine>, QuantityOverflow> {
    lines
        .iter()
        .map(|line| {
            Ok(IngredientLine {
                quantity: scaling.apply(line.quantity)?,
                ..line.clone()
            })
        })
        .collect()
}

/// A recipe scaled to a serving count, with its per-portion nutrients
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScaledRecipe {
    pub scaling: Scaling,
    pub lines: Vec<IngredientLine>,
    pub nutrition_per_portion: NutrientValues,
}

/// Scale a recipe's lines and compute per-portion nutrients from the scaled
/// quantities.
pub fn scale_recipe(
    base: Option<i64>,
    requested: Option<i64>,
    lines: &[IngredientLine],
) -> Result<ScaledRecipe, QuantityOverflow> {
    let scaling = Scaling::new(base, requested);
    let lines = scale_lines(lines, &scaling)?;
    let nutrition_per_portion = per_portion(&lines, scaling.effective_servings);

    tracing::debug!(
        factor = %scaling.factor,
        servings = ?scaling.effective_servings,
        lines = lines.len(),
        "scaled recipe"
    );

    Ok(ScaledRecipe {
        scaling,
        lines,
        nutrition_per_portion,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::nutrition::Nutrient;

    pub(crate) fn d(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    pub(crate) fn line(id: i64, name: &str, quantity: &str, unit: &str, kcal: Option<&str>) -> IngredientLine {
        let mut per_100 = NutrientValues::unknown();
        per_100.set(Nutrient::EnergyKcal, kcal.map(d));
        IngredientLine {
            ingredient_id: id,
            name: name.to_string(),
            category: "pantry".to_string(),
            quantity: d(quantity),
            unit: unit.to_string(),
            per_100,
        }
    }

    pub(crate) fn pasta() -> Vec<IngredientLine> {
        vec![
            line(1, "Flour", "200", "g", Some("364")),
            line(2, "Egg", "100", "g", Some("155")),
        ]
    }

    #[test]
    fn test_factor_from_requested_over_base() {
        let scaling = Scaling::new(Some(2), Some(4));
        assert_eq!(scaling.factor, d("2"));
        assert_eq!(scaling.effective_servings, Some(4));
    }

    #[test]
    fn test_no_request_means_no_scaling() {
        let scaling = Scaling::new(Some(3), None);
        assert_eq!(scaling.factor, Decimal::ONE);
        assert_eq!(scaling.effective_servings, Some(3));
    }

    #[test]
    fn test_bad_base_means_no_scaling() {
        assert_eq!(Scaling::new(None, Some(4)), Scaling::identity(None));
        assert_eq!(Scaling::new(Some(0), Some(4)), Scaling::identity(Some(0)));
        assert_eq!(Scaling::new(Some(-2), Some(4)).factor, Decimal::ONE);
    }

    #[test]
    fn test_non_positive_request_means_no_scaling() {
        assert_eq!(Scaling::new(Some(2), Some(0)), Scaling::identity(Some(2)));
        assert_eq!(Scaling::new(Some(2), Some(-1)), Scaling::identity(Some(2)));
    }

    #[test]
    fn test_requesting_base_leaves_quantities_unchanged() {
        let lines = pasta();
        let scaled = scale_lines(&lines, &Scaling::new(Some(2), Some(2))).unwrap();
        assert_eq!(scaled, lines);
    }

    #[test]
    fn test_scaling_is_linear() {
        let lines = vec![line(1, "Rice", "250", "g", None), line(2, "Stock", "0.75", "l", None)];

        let via_three = scale_lines(&lines, &Scaling::new(Some(4), Some(3))).unwrap();
        let then_seven = scale_lines(&via_three, &Scaling::new(Some(3), Some(7))).unwrap();
        let direct = scale_lines(&lines, &Scaling::new(Some(4), Some(7))).unwrap();

        let tolerance = d("0.000000001");
        for (a, b) in then_seven.iter().zip(direct.iter()) {
            assert!((a.quantity - b.quantity).abs() < tolerance, "{} vs {}", a.quantity, b.quantity);
            assert_eq!(a.unit, b.unit);
        }
    }

    #[test]
    fn test_units_pass_through() {
        let lines = vec![line(1, "Egg", "3", "pièce", None)];
        let scaled = scale_lines(&lines, &Scaling::new(Some(2), Some(1))).unwrap();
        assert_eq!(scaled[0].unit, "pièce");
        assert_eq!(scaled[0].quantity, d("1.5"));
    }

    #[test]
    fn test_pasta_for_four() {
        let scaled = scale_recipe(Some(2), Some(4), &pasta()).unwrap();

        assert_eq!(scaled.lines[0].quantity, d("400"));
        assert_eq!(scaled.lines[1].quantity, d("200"));
        assert_eq!(scaled.scaling.effective_servings, Some(4));
        assert_eq!(scaled.nutrition_per_portion.get(Nutrient::EnergyKcal), Some(d("441.5")));
        assert_eq!(scaled.nutrition_per_portion.get(Nutrient::Protein), None);
    }

    #[test]
    fn test_per_portion_is_invariant_under_scaling() {
        let base = scale_recipe(Some(2), None, &pasta()).unwrap();
        let doubled = scale_recipe(Some(2), Some(4), &pasta()).unwrap();
        assert_eq!(
            base.nutrition_per_portion.get(Nutrient::EnergyKcal),
            doubled.nutrition_per_portion.get(Nutrient::EnergyKcal)
        );
    }

    #[test]
    fn test_overflowing_scale_is_an_error() {
        let mut huge = line(1, "Sand", "1", "g", Some("1"));
        huge.quantity = d("1000000000000000000000000000");

        assert_eq!(scale_recipe(Some(1), Some(100), &[huge.clone()]), Err(QuantityOverflow));
        // Unscaled, the same line is fine
        assert!(scale_recipe(Some(1), None, &[huge]).is_ok());
    }
}
