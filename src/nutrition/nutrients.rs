//! Tracked nutrients
//!
//! A fixed table of the 35 nutrients carried by every ingredient, and a
//! dense value set indexed by it. The same table drives the database columns,
//! the JSON keys and the per-portion reductions.

use std::collections::BTreeMap;
use std::fmt;

use rust_decimal::Decimal;
use serde::de::Error as _;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub const NUTRIENT_COUNT: usize = 35;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Nutrient {
    EnergyKcal,
    Carbohydrates,
    Sugars,
    Fiber,
    Fat,
    SaturatedFat,
    Protein,
    Salt,
    Sodium,
    // Vitamins
    VitaminA,
    VitaminB1,
    VitaminB2,
    VitaminB3,
    VitaminB5,
    VitaminB6,
    VitaminB7,
    VitaminB9,
    VitaminB12,
    VitaminC,
    VitaminD,
    VitaminE,
    VitaminK,
    // Minerals
    Calcium,
    Iron,
    Magnesium,
    Phosphorus,
    Potassium,
    Zinc,
    Copper,
    Manganese,
    Selenium,
    Iodine,
    Chromium,
    Molybdenum,
    Fluoride,
}

impl Nutrient {
    /// Every tracked nutrient, in reporting order
    pub const ALL: [Nutrient; NUTRIENT_COUNT] = [
        Nutrient::EnergyKcal,
        Nutrient::Carbohydrates,
        Nutrient::Sugars,
        Nutrient::Fiber,
        Nutrient::Fat,
        Nutrient::SaturatedFat,
        Nutrient::Protein,
        Nutrient::Salt,
        Nutrient::Sodium,
        Nutrient::VitaminA,
        Nutrient::VitaminB1,
        Nutrient::VitaminB2,
        Nutrient::VitaminB3,
        Nutrient::VitaminB5,
        Nutrient::VitaminB6,
        Nutrient::VitaminB7,
        Nutrient::VitaminB9,
        Nutrient::VitaminB12,
        Nutrient::VitaminC,
        Nutrient::VitaminD,
        Nutrient::VitaminE,
        Nutrient::VitaminK,
        Nutrient::Calcium,
        Nutrient::Iron,
        Nutrient::Magnesium,
        Nutrient::Phosphorus,
        Nutrient::Potassium,
        Nutrient::Zinc,
        Nutrient::Copper,
        Nutrient::Manganese,
        Nutrient::Selenium,
        Nutrient::Iodine,
        Nutrient::Chromium,
        Nutrient::Molybdenum,
        Nutrient::Fluoride,
    ];

    /// Position in [`Nutrient::ALL`]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Column name in the `ingredients` table, also the JSON key
    pub fn column(self) -> &'static str {
        match self {
            Nutrient::EnergyKcal => "energy_kcal",
            Nutrient::Carbohydrates => "carbohydrates",
            Nutrient::Sugars => "sugars",
            Nutrient::Fiber => "fiber",
            Nutrient::Fat => "fat",
            Nutrient::SaturatedFat => "saturated_fat",
            Nutrient::Protein => "protein",
            Nutrient::Salt => "salt",
            Nutrient::Sodium => "sodium",
            Nutrient::VitaminA => "vitamin_a",
            Nutrient::VitaminB1 => "vitamin_b1",
            Nutrient::VitaminB2 => "vitamin_b2",
            Nutrient::VitaminB3 => "vitamin_b3",
            Nutrient::VitaminB5 => "vitamin_b5",
            Nutrient::VitaminB6 => "vitamin_b6",
            Nutrient::VitaminB7 => "vitamin_b7",
            Nutrient::VitaminB9 => "vitamin_b9",
            Nutrient::VitaminB12 => "vitamin_b12",
            Nutrient::VitaminC => "vitamin_c",
            Nutrient::VitaminD => "vitamin_d",
            Nutrient::VitaminE => "vitamin_e",
            Nutrient::VitaminK => "vitamin_k",
            Nutrient::Calcium => "calcium",
            Nutrient::Iron => "iron",
            Nutrient::Magnesium => "magnesium",
            Nutrient::Phosphorus => "phosphorus",
            Nutrient::Potassium => "potassium",
            Nutrient::Zinc => "zinc",
            Nutrient::Copper => "copper",
            Nutrient::Manganese => "manganese",
            Nutrient::Selenium => "selenium",
            Nutrient::Iodine => "iodine",
            Nutrient::Chromium => "chromium",
            Nutrient::Molybdenum => "molybdenum",
            Nutrient::Fluoride => "fluoride",
        }
    }

    /// Parse a column/JSON key
    pub fn from_key(key: &str) -> Option<Self> {
        let key = key.trim().to_lowercase();
        Self::ALL.into_iter().find(|n| n.column() == key)
    }
}

impl fmt::Display for Nutrient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

/// One optional decimal per tracked nutrient.
///
/// Used both for an ingredient's per-100 profile and for computed
/// per-portion totals. `None` always means "unknown".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NutrientValues([Option<Decimal>; NUTRIENT_COUNT]);

impl Default for NutrientValues {
    fn default() -> Self {
        Self([None; NUTRIENT_COUNT])
    }
}

impl NutrientValues {
    /// All values unknown
    pub fn unknown() -> Self {
        Self::default()
    }

    pub fn get(&self, nutrient: Nutrient) -> Option<Decimal> {
        self.0[nutrient.index()]
    }

    pub fn set(&mut self, nutrient: Nutrient, value: Option<Decimal>) {
        self.0[nutrient.index()] = value;
    }

    pub fn with(mut self, nutrient: Nutrient, value: Decimal) -> Self {
        self.set(nutrient, Some(value));
        self
    }

    /// Iterate in table order
    pub fn iter(&self) -> impl Iterator<Item = (Nutrient, Option<Decimal>)> + '_ {
        Nutrient::ALL.into_iter().map(move |n| (n, self.get(n)))
    }

    /// Number of nutrients with a known value
    pub fn known_count(&self) -> usize {
        self.0.iter().filter(|v| v.is_some()).count()
    }

    /// Overwrite with every value present in `patch`
    pub fn merge(&mut self, patch: &NutrientValues) {
        for (nutrient, value) in patch.iter() {
            if value.is_some() {
                self.set(nutrient, value);
            }
        }
    }
}

/// Serialized as a map carrying every key, `null` for unknown values
impl Serialize for NutrientValues {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(NUTRIENT_COUNT))?;
        for (nutrient, value) in self.iter() {
            map.serialize_entry(nutrient.column(), &value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for NutrientValues {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<String, Option<Decimal>>::deserialize(deserializer)?;
        let mut values = NutrientValues::default();
        for (key, value) in raw {
            let nutrient = Nutrient::from_key(&key)
                .ok_or_else(|| D::Error::custom(format!("unknown nutrient: {}", key)))?;
            values.set(nutrient, value);
        }
        Ok(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_complete_and_ordered() {
        assert_eq!(Nutrient::ALL.len(), NUTRIENT_COUNT);
        for (i, nutrient) in Nutrient::ALL.iter().enumerate() {
            assert_eq!(nutrient.index(), i);
        }
    }

    #[test]
    fn test_from_key() {
        assert_eq!(Nutrient::from_key("energy_kcal"), Some(Nutrient::EnergyKcal));
        assert_eq!(Nutrient::from_key("Vitamin_B12"), Some(Nutrient::VitaminB12));
        assert_eq!(Nutrient::from_key("alcohol"), None);
    }

    #[test]
    fn test_serde_keys_match_columns() {
        for nutrient in Nutrient::ALL {
            let json = serde_json::to_string(&nutrient).unwrap();
            assert_eq!(json, format!("\"{}\"", nutrient.column()));
        }
    }

    #[test]
    fn test_serialize_includes_unknowns_as_null() {
        let values = NutrientValues::unknown().with(Nutrient::Protein, Decimal::new(125, 1));
        let json = serde_json::to_value(values).unwrap();
        let map = json.as_object().unwrap();

        assert_eq!(map.len(), NUTRIENT_COUNT);
        assert!(map["energy_kcal"].is_null());
        assert_eq!(map["protein"].as_f64(), Some(12.5));
    }

    #[test]
    fn test_deserialize_partial_map() {
        let values: NutrientValues =
            serde_json::from_str(r#"{"energy_kcal": 364, "iron": null}"#).unwrap();
        assert_eq!(values.get(Nutrient::EnergyKcal), Some(Decimal::from(364)));
        assert_eq!(values.get(Nutrient::Iron), None);
        assert_eq!(values.known_count(), 1);

        assert!(serde_json::from_str::<NutrientValues>(r#"{"unobtainium": 1}"#).is_err());
    }

    #[test]
    fn test_merge_only_overwrites_known() {
        let mut base = NutrientValues::unknown()
            .with(Nutrient::Fat, Decimal::from(3))
            .with(Nutrient::Salt, Decimal::from(1));
        let patch = NutrientValues::unknown().with(Nutrient::Fat, Decimal::from(5));
        base.merge(&patch);

        assert_eq!(base.get(Nutrient::Fat), Some(Decimal::from(5)));
        assert_eq!(base.get(Nutrient::Salt), Some(Decimal::from(1)));
    }
}
