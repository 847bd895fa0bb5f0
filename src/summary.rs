// ABOUTME: Pure presentation reductions over plan items: grouping, totals, progress
// ABOUTME: Also holds the add-time macro derivation shared with MealPlanItem
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Macrotrack

use std::collections::BTreeMap;

use crate::models::{DayOfWeek, Meal, MealPlanItem};

/// Macro values derived for a plan item at add-time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemMacros {
    /// Whole-number kilocalories
    pub calories: f64,
    /// Protein grams, one decimal
    pub protein_g: f64,
    /// Carbohydrate grams, one decimal
    pub carbohydrates_g: f64,
    /// Fat grams, one decimal
    pub fat_g: f64,
}

/// Macro totals for one day of a plan
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DailyTotals {
    /// Summed kilocalories
    pub calories: f64,
    /// Summed protein grams
    pub protein_g: f64,
    /// Summed carbohydrate grams
    pub carbohydrates_g: f64,
    /// Summed fat grams
    pub fat_g: f64,
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Derive item macros as `meal.<macro> * quantity / 100`.
///
/// Calories are fixed to whole kcal, gram values to one decimal place,
/// matching what the backend stores for persisted items.
#[must_use]
pub fn item_macros(meal: &Meal, quantity: f64) -> ItemMacros {
    let factor = quantity / 100.0;
    ItemMacros {
        calories: (meal.calories * factor).round(),
        protein_g: round1(meal.protein_g * factor),
        carbohydrates_g: round1(meal.carbohydrates_g * factor),
        fat_g: round1(meal.fat_g * factor),
    }
}

/// Partition items by day, Monday first.
///
/// Every item lands in exactly one bucket; days with no items are omitted.
#[must_use]
pub fn group_by_day(items: &[MealPlanItem]) -> BTreeMap<DayOfWeek, Vec<&MealPlanItem>> {
    let mut grouped: BTreeMap<DayOfWeek, Vec<&MealPlanItem>> = BTreeMap::new();
    for item in items {
        grouped.entry(item.day_of_week).or_default().push(item);
    }
    grouped
}

/// Sum derived macros per day
#[must_use]
pub fn daily_totals(items: &[MealPlanItem]) -> BTreeMap<DayOfWeek, DailyTotals> {
    let mut totals: BTreeMap<DayOfWeek, DailyTotals> = BTreeMap::new();
    for item in items {
        let entry = totals.entry(item.day_of_week).or_default();
        entry.calories += item.calories;
        entry.protein_g += item.protein_g;
        entry.carbohydrates_g += item.carbohydrates_g;
        entry.fat_g += item.fat_g;
    }
    totals
}

/// Progress toward a target as a percentage clamped to `0..=100`.
///
/// Returns `None` when no target is set or the target is not positive.
#[must_use]
pub fn percent_of_target(actual: f64, target: Option<f64>) -> Option<f64> {
    let target = target.filter(|t| *t > 0.0)?;
    Some(((actual / target) * 100.0).clamp(0.0, 100.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MealType;

    fn chicken() -> Meal {
        Meal {
            id: "m1".to_owned(),
            name: "Pechuga de pollo".to_owned(),
            calories: 165.0,
            protein_g: 31.0,
            carbohydrates_g: 0.0,
            fat_g: 3.6,
        }
    }

    #[test]
    fn macros_scale_by_quantity() {
        let m = item_macros(&chicken(), 150.0);
        assert_eq!(m.calories, 248.0);
        assert_eq!(m.protein_g, 46.5);
        assert_eq!(m.carbohydrates_g, 0.0);
        assert_eq!(m.fat_g, 5.4);
    }

    #[test]
    fn grouping_partitions_every_item() {
        let meal = chicken();
        let items = vec![
            MealPlanItem::from_meal(&meal, DayOfWeek::Lunes, MealType::Comida, 100.0),
            MealPlanItem::from_meal(&meal, DayOfWeek::Lunes, MealType::Cena, 50.0),
            MealPlanItem::from_meal(&meal, DayOfWeek::Domingo, MealType::Desayuno, 80.0),
        ];
        let grouped = group_by_day(&items);
        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped[&DayOfWeek::Lunes].len(), 2);
        assert_eq!(grouped[&DayOfWeek::Domingo].len(), 1);
        let total: usize = grouped.values().map(Vec::len).sum();
        assert_eq!(total, items.len());
        // BTreeMap ordering follows the declaration order, Monday first
        let first = grouped.keys().next().copied();
        assert_eq!(first, Some(DayOfWeek::Lunes));
    }

    #[test]
    fn totals_sum_derived_fields() {
        let meal = chicken();
        let items = vec![
            MealPlanItem::from_meal(&meal, DayOfWeek::Martes, MealType::Comida, 100.0),
            MealPlanItem::from_meal(&meal, DayOfWeek::Martes, MealType::Cena, 100.0),
        ];
        let totals = daily_totals(&items);
        assert_eq!(totals[&DayOfWeek::Martes].calories, 330.0);
        assert_eq!(totals[&DayOfWeek::Martes].protein_g, 62.0);
    }

    #[test]
    fn percent_clamps_and_rejects_empty_targets() {
        assert_eq!(percent_of_target(500.0, Some(2000.0)), Some(25.0));
        assert_eq!(percent_of_target(2500.0, Some(2000.0)), Some(100.0));
        assert_eq!(percent_of_target(100.0, Some(0.0)), None);
        assert_eq!(percent_of_target(100.0, None), None);
    }
}
