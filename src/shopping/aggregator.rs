//! Shopping list aggregation
//!
//! Merges the scaled ingredient lines of every recipe planned in a week into
//! one bucket per (ingredient, unit). Units are compared as exact strings, so
//! "g" and "kg" of the same ingredient stay separate.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::nutrition::{IngredientLine, QuantityOverflow, Scaling};

/// One planned recipe: its base serving count, the count it is planned for,
/// and its stored (unscaled) lines.
#[derive(Debug, Clone, Copy)]
pub struct PlanEntry<'a> {
    pub base_person: Option<i64>,
    pub scaled_person: Option<i64>,
    pub lines: &'a [IngredientLine],
}

/// Bucket key. Ordering gives a deterministic output order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ShoppingKey {
    pub ingredient_id: i64,
    pub unit: String,
}

/// A merged bucket, ready to become a shopping list item
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregatedLine {
    pub ingredient_id: i64,
    pub ingredient_name: String,
    pub category: String,
    pub unit: String,
    pub quantity_needed: Decimal,
    pub quantity_owned: Decimal,
    pub quantity_to_buy: Decimal,
}

/// Amount still to buy; never negative
pub fn quantity_to_buy(needed: Decimal, owned: Decimal) -> Decimal {
    (needed - owned).max(Decimal::ZERO)
}

/// Aggregate the entries of one plan.
///
/// Each entry is scaled by `scaled / base` (no scaling when either count is
/// missing or not positive). Output is ordered by ingredient id, then unit.
/// Fails when a scaled or summed quantity leaves the `Decimal` range.
pub fn aggregate(entries: &[PlanEntry<'_>]) -> Result<Vec<AggregatedLine>, QuantityOverflow> {
    let mut buckets: BTreeMap<ShoppingKey, AggregatedLine> = BTreeMap::new();

    for entry in entries {
        let scaling = Scaling::new(entry.base_person, entry.scaled_person);
        for line in entry.lines {
            let quantity = scaling.apply(line.quantity)?;
            let key = ShoppingKey {
                ingredient_id: line.ingredient_id,
                unit: line.unit.clone(),
            };
            match buckets.entry(key) {
                Entry::Occupied(mut bucket) => {
                    let bucket = bucket.get_mut();
                    bucket.quantity_needed = bucket
                        .quantity_needed
                        .checked_add(quantity)
                        .ok_or(QuantityOverflow)?;
                }
                Entry::Vacant(slot) => {
                    slot.insert(AggregatedLine {
                        ingredient_id: line.ingredient_id,
                        ingredient_name: line.name.clone(),
                        category: line.category.clone(),
                        unit: line.unit.clone(),
                        quantity_needed: quantity,
                        quantity_owned: Decimal::ZERO,
                        quantity_to_buy: Decimal::ZERO,
                    });
                }
            }
        }
    }

    Ok(buckets
        .into_values()
        .map(|mut bucket| {
            bucket.quantity_to_buy = quantity_to_buy(bucket.quantity_needed, bucket.quantity_owned);
            bucket
        })
        .collect())
}
