//! Nutrient totals
//!
//! Ingredient values are per 100 g/ml, so each line contributes
//! `quantity / 100 × value`. A nutrient with no contributing line is unknown,
//! which is tracked separately from the running sum so that a known zero is
//! still reported as zero. A sum that leaves the `Decimal` range is reported
//! as unknown.

use rust_decimal::{Decimal, RoundingStrategy};

use super::nutrients::{Nutrient, NutrientValues, NUTRIENT_COUNT};
use super::scaling::IngredientLine;

/// Fractional digits kept on the quantity/100 ratio
pub const RATIO_SCALE: u32 = 6;
/// Fractional digits of a per-portion value
pub const PORTION_SCALE: u32 = 3;

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

fn round_half_up(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

/// Line quantity as a fraction of the 100 g/ml reference
pub fn line_ratio(quantity: Decimal) -> Decimal {
    round_half_up(quantity / HUNDRED, RATIO_SCALE)
}

#[derive(Debug, Clone, Copy)]
struct Accumulator {
    sums: [Decimal; NUTRIENT_COUNT],
    contributed: [bool; NUTRIENT_COUNT],
    overflowed: [bool; NUTRIENT_COUNT],
}

impl Accumulator {
    fn new() -> Self {
        Self {
            sums: [Decimal::ZERO; NUTRIENT_COUNT],
            contributed: [false; NUTRIENT_COUNT],
            overflowed: [false; NUTRIENT_COUNT],
        }
    }

    fn add_line(&mut self, line: &IngredientLine) {
        if line.quantity <= Decimal::ZERO {
            return;
        }
        let ratio = line_ratio(line.quantity);
        for (nutrient, value) in line.per_100.iter() {
            if let Some(value) = value {
                let i = nutrient.index();
                self.contributed[i] = true;
                match ratio.checked_mul(value).and_then(|v| self.sums[i].checked_add(v)) {
                    Some(sum) => self.sums[i] = sum,
                    None => self.overflowed[i] = true,
                }
            }
        }
    }

    fn finish(self) -> NutrientValues {
        let mut totals = NutrientValues::unknown();
        for nutrient in Nutrient::ALL {
            let i = nutrient.index();
            if self.contributed[i] && !self.overflowed[i] {
                totals.set(nutrient, Some(self.sums[i]));
            }
        }
        totals
    }
}

/// Whole-recipe totals for the given lines, in line order
pub fn recipe_totals(lines: &[IngredientLine]) -> NutrientValues {
    let mut acc = Accumulator::new();
    for line in lines {
        acc.add_line(line);
    }
    acc.finish()
}

/// Per-portion totals: recipe totals divided by the serving count and
/// rounded half-up to 3 decimals. Everything is unknown when the serving
/// count is missing or not positive.
pub fn per_portion(lines: &[IngredientLine], servings: Option<i64>) -> NutrientValues {
    let servings = match servings {
        Some(s) if s > 0 => Decimal::from(s),
        _ => return NutrientValues::unknown(),
    };

    let totals = recipe_totals(lines);
    let mut portion = NutrientValues::unknown();
    for (nutrient, total) in totals.iter() {
        portion.set(nutrient, total.map(|t| round_half_up(t / servings, PORTION_SCALE)));
    }
    portion
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nutrition::scaling::tests::{d, line, pasta};

    #[test]
    fn test_ratio_rounds_to_six_places() {
        assert_eq!(line_ratio(d("200")), d("2"));
        assert_eq!(line_ratio(d("0.00005")), d("0.000001"));
        assert_eq!(line_ratio(d("0.00004")), d("0"));
    }

    #[test]
    fn test_pasta_totals_at_base() {
        let totals = recipe_totals(&pasta());
        assert_eq!(totals.get(Nutrient::EnergyKcal), Some(d("883")));
    }

    #[test]
    fn test_all_unknown_ingredients_give_unknown_totals() {
        let lines = vec![line(1, "Mystery", "150", "g", None), line(2, "Other", "20", "g", None)];
        let portion = per_portion(&lines, Some(2));
        assert_eq!(portion.known_count(), 0);
        assert_eq!(portion, NutrientValues::unknown());
    }

    #[test]
    fn test_partial_data_still_reported() {
        let lines = vec![line(1, "Flour", "100", "g", Some("364")), line(2, "Mystery", "500", "g", None)];
        let portion = per_portion(&lines, Some(1));
        assert_eq!(portion.get(Nutrient::EnergyKcal), Some(d("364")));
    }

    #[test]
    fn test_known_zero_is_reported_as_zero() {
        let lines = vec![line(1, "Water", "250", "ml", Some("0"))];
        let portion = per_portion(&lines, Some(1));
        assert_eq!(portion.get(Nutrient::EnergyKcal), Some(Decimal::ZERO));
    }

    #[test]
    fn test_zero_quantity_lines_do_not_contribute() {
        let lines = vec![line(1, "Salt", "0", "g", Some("0"))];
        assert_eq!(per_portion(&lines, Some(1)).get(Nutrient::EnergyKcal), None);
    }

    #[test]
    fn test_missing_or_bad_servings_give_unknown() {
        assert_eq!(per_portion(&pasta(), None), NutrientValues::unknown());
        assert_eq!(per_portion(&pasta(), Some(0)), NutrientValues::unknown());
        assert_eq!(per_portion(&pasta(), Some(-3)), NutrientValues::unknown());
    }

    #[test]
    fn test_per_portion_rounds_half_up() {
        // 100 g at 1.0005 kcal/100g = 1.0005 → 1.001
        let lines = vec![line(1, "Thing", "100", "g", Some("1.0005"))];
        assert_eq!(per_portion(&lines, Some(1)).get(Nutrient::EnergyKcal), Some(d("1.001")));

        // 883 / 3 = 294.333...
        assert_eq!(per_portion(&pasta(), Some(3)).get(Nutrient::EnergyKcal), Some(d("294.333")));
    }

    #[test]
    fn test_each_nutrient_reduced_independently() {
        let mut flour = line(1, "Flour", "200", "g", Some("364"));
        flour.per_100.set(Nutrient::Protein, Some(d("10")));
        let mut egg = line(2, "Egg", "100", "g", Some("155"));
        egg.per_100.set(Nutrient::Iron, Some(d("1.75")));

        let portion = per_portion(&[flour, egg], Some(2));
        assert_eq!(portion.get(Nutrient::EnergyKcal), Some(d("441.5")));
        assert_eq!(portion.get(Nutrient::Protein), Some(d("10")));
        assert_eq!(portion.get(Nutrient::Iron), Some(d("0.875")));
        assert_eq!(portion.get(Nutrient::Fat), None);
        assert_eq!(portion.known_count(), 3);
    }

    #[test]
    fn test_same_input_same_result() {
        let lines = vec![
            line(1, "A", "33.3", "g", Some("17.77")),
            line(2, "B", "66.6", "g", Some("3.141")),
            line(3, "C", "12.5", "g", Some("999.9")),
        ];
        assert_eq!(per_portion(&lines, Some(7)), per_portion(&lines, Some(7)));
    }

    #[test]
    fn test_overflowing_nutrient_becomes_unknown() {
        let mut huge = line(1, "Sand", "1000000000000000000000000000", "g", Some("10000"));
        huge.per_100.set(Nutrient::Protein, Some(d("1")));

        let portion = per_portion(&[huge], Some(1));
        assert_eq!(portion.get(Nutrient::EnergyKcal), None);
        assert_eq!(portion.get(Nutrient::Protein), Some(d("10000000000000000000000000")));
    }
}
