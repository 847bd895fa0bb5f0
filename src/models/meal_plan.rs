// ABOUTME: MealPlan aggregate, MealPlanItem, day/meal-type enums, and local-id helpers
// ABOUTME: Local-only records carry a synthesized `local-<millis>` identifier
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Macrotrack

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::meal::Meal;
use crate::summary::item_macros;

/// Prefix marking an identifier as never confirmed persisted by the backend
pub const LOCAL_ID_PREFIX: &str = "local-";

/// Whether an identifier carries the local-only prefix
#[must_use]
pub fn is_local_id(id: &str) -> bool {
    id.starts_with(LOCAL_ID_PREFIX)
}

/// Synthesize a fresh local identifier from a timestamp
#[must_use]
pub fn new_local_id(now: DateTime<Utc>) -> String {
    format!("{LOCAL_ID_PREFIX}{}", now.timestamp_millis())
}

/// Day of the week a plan item is scheduled on
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DayOfWeek {
    /// Monday
    Lunes,
    /// Tuesday
    Martes,
    /// Wednesday
    #[serde(rename = "Miércoles")]
    Miercoles,
    /// Thursday
    Jueves,
    /// Friday
    Viernes,
    /// Saturday
    #[serde(rename = "Sábado")]
    Sabado,
    /// Sunday
    Domingo,
}

impl DayOfWeek {
    /// All days in display order, Monday first
    pub const ALL: [Self; 7] = [
        Self::Lunes,
        Self::Martes,
        Self::Miercoles,
        Self::Jueves,
        Self::Viernes,
        Self::Sabado,
        Self::Domingo,
    ];

    /// Display name as stored on the wire
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Lunes => "Lunes",
            Self::Martes => "Martes",
            Self::Miercoles => "Miércoles",
            Self::Jueves => "Jueves",
            Self::Viernes => "Viernes",
            Self::Sabado => "Sábado",
            Self::Domingo => "Domingo",
        }
    }
}

/// Type of meal within a day
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum MealType {
    /// Breakfast
    Desayuno,
    /// Mid-morning meal
    Almuerzo,
    /// Main midday meal
    Comida,
    /// Afternoon snack
    Merienda,
    /// Dinner
    Cena,
    /// Unspecified or other meal type
    Otro,
}

impl MealType {
    /// Parse a meal type from string, mapping unknown values to `Otro`
    #[must_use]
    pub fn from_str_lossy(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "desayuno" => Self::Desayuno,
            "almuerzo" => Self::Almuerzo,
            "comida" => Self::Comida,
            "merienda" => Self::Merienda,
            "cena" => Self::Cena,
            _ => Self::Otro,
        }
    }
}

fn default_unit() -> String {
    "g".to_owned()
}

const fn default_true() -> bool {
    true
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_false(flag: &bool) -> bool {
    !*flag
}

/// A single scheduled meal within a plan
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MealPlanItem {
    /// Reference to the catalog meal
    pub meal_id: String,
    /// Day this item is scheduled on
    pub day_of_week: DayOfWeek,
    /// Slot within the day
    pub meal_type: MealType,
    /// Amount consumed, in `unit`
    pub quantity: f64,
    /// Measurement unit, grams unless stated otherwise
    #[serde(default = "default_unit")]
    pub unit: String,
    /// Derived kilocalories, whole-number, fixed at add-time
    #[serde(default)]
    pub calories: f64,
    /// Derived protein in grams, one decimal
    #[serde(default)]
    pub protein_g: f64,
    /// Derived carbohydrates in grams, one decimal
    #[serde(default)]
    pub carbohydrates_g: f64,
    /// Derived fat in grams, one decimal
    #[serde(default)]
    pub fat_g: f64,
}

impl MealPlanItem {
    /// Build an item from a catalog meal, deriving the macro fields
    /// as `meal.<macro> * quantity / 100`
    #[must_use]
    pub fn from_meal(
        meal: &Meal,
        day_of_week: DayOfWeek,
        meal_type: MealType,
        quantity: f64,
    ) -> Self {
        let macros = item_macros(meal, quantity);
        Self {
            meal_id: meal.id.clone(),
            day_of_week,
            meal_type,
            quantity,
            unit: default_unit(),
            calories: macros.calories,
            protein_g: macros.protein_g,
            carbohydrates_g: macros.carbohydrates_g,
            fat_g: macros.fat_g,
        }
    }
}

/// A meal plan as stored remotely or in the local mirror
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MealPlan {
    /// Server-assigned identifier, or `local-<millis>` when never synced
    pub id: String,
    /// Plan display name, non-empty
    pub plan_name: String,
    /// Optional free-form description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether the plan is the user's active one
    #[serde(default = "default_true")]
    pub is_active: bool,
    /// Daily calorie target in kcal
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_calories: Option<f64>,
    /// Daily protein target in grams
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_protein_g: Option<f64>,
    /// Daily carbohydrate target in grams
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_carbs_g: Option<f64>,
    /// Daily fat target in grams
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_fat_g: Option<f64>,
    /// Scheduled items; order only matters for display grouping
    #[serde(default)]
    pub items: Vec<MealPlanItem>,
    /// Set on creation, local or remote
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    /// Refreshed on every local or remote write
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
    /// True while the record has never been confirmed persisted remotely
    #[serde(rename = "_localOnly", default, skip_serializing_if = "is_false")]
    pub local_only: bool,
}

impl MealPlan {
    /// Realign the local-only flag with the identifier form.
    ///
    /// The flag and the `local-` prefix must agree; a hand-edited or
    /// pre-existing mirror file may carry one without the other.
    pub fn normalize_local_flag(&mut self) {
        self.local_only = is_local_id(&self.id);
    }
}

/// Payload for creating a plan; defaults are applied by the service
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewMealPlan {
    /// Plan display name; defaulted when empty
    #[serde(default)]
    pub plan_name: String,
    /// Optional free-form description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Defaults to true when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    /// Daily calorie target in kcal
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_calories: Option<f64>,
    /// Daily protein target in grams
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_protein_g: Option<f64>,
    /// Daily carbohydrate target in grams
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_carbs_g: Option<f64>,
    /// Daily fat target in grams
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_fat_g: Option<f64>,
    /// Initial items, empty unless supplied
    #[serde(default)]
    pub items: Vec<MealPlanItem>,
}

/// Partial update applied to a plan remotely or in the mirror
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MealPlanPatch {
    /// New plan name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan_name: Option<String>,
    /// New description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// New active flag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    /// New calorie target
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_calories: Option<f64>,
    /// New protein target
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_protein_g: Option<f64>,
    /// New carbohydrate target
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_carbs_g: Option<f64>,
    /// New fat target
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_fat_g: Option<f64>,
    /// Replacement item list
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<MealPlanItem>>,
}

impl MealPlanPatch {
    /// Apply the present fields onto `plan`, leaving the rest untouched.
    /// The caller refreshes `updated_at`.
    pub fn apply_to(&self, plan: &mut MealPlan) {
        if let Some(name) = &self.plan_name {
            plan.plan_name.clone_from(name);
        }
        if let Some(description) = &self.description {
            plan.description = Some(description.clone());
        }
        if let Some(is_active) = self.is_active {
            plan.is_active = is_active;
        }
        if let Some(v) = self.target_calories {
            plan.target_calories = Some(v);
        }
        if let Some(v) = self.target_protein_g {
            plan.target_protein_g = Some(v);
        }
        if let Some(v) = self.target_carbs_g {
            plan.target_carbs_g = Some(v);
        }
        if let Some(v) = self.target_fat_g {
            plan.target_fat_g = Some(v);
        }
        if let Some(items) = &self.items {
            plan.items.clone_from(items);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_id_round_trip() {
        let id = new_local_id(Utc::now());
        assert!(is_local_id(&id));
        assert!(!is_local_id("42"));
        assert!(!is_local_id("localish"));
    }

    #[test]
    fn meal_type_lossy_parse() {
        assert_eq!(MealType::from_str_lossy("Cena"), MealType::Cena);
        assert_eq!(MealType::from_str_lossy(" desayuno "), MealType::Desayuno);
        assert_eq!(MealType::from_str_lossy("brunch"), MealType::Otro);
    }

    #[test]
    fn day_serializes_with_accents() {
        let day = serde_json::to_string(&DayOfWeek::Miercoles).unwrap();
        assert_eq!(day, "\"Miércoles\"");
        let back: DayOfWeek = serde_json::from_str("\"Sábado\"").unwrap();
        assert_eq!(back, DayOfWeek::Sabado);
    }

    #[test]
    fn local_only_flag_skipped_when_false() {
        let plan: MealPlan = serde_json::from_str(
            r#"{"id":"7","plan_name":"Semana 1"}"#,
        )
        .unwrap();
        assert!(plan.is_active);
        assert!(plan.items.is_empty());
        assert!(!plan.local_only);
        let encoded = serde_json::to_value(&plan).unwrap();
        assert!(encoded.get("_localOnly").is_none());
    }

    #[test]
    fn normalize_realigns_flag_both_ways() {
        let mut stray: MealPlan = serde_json::from_str(
            r#"{"id":"42","plan_name":"Synced","_localOnly":true}"#,
        )
        .unwrap();
        stray.normalize_local_flag();
        assert!(!stray.local_only);

        let mut unflagged: MealPlan = serde_json::from_str(
            r#"{"id":"local-1700000000000","plan_name":"Offline"}"#,
        )
        .unwrap();
        unflagged.normalize_local_flag();
        assert!(unflagged.local_only);
    }

    #[test]
    fn patch_applies_only_present_fields() {
        let mut plan: MealPlan = serde_json::from_str(
            r#"{"id":"7","plan_name":"Y","description":"keep"}"#,
        )
        .unwrap();
        let patch = MealPlanPatch {
            plan_name: Some("X".to_owned()),
            ..MealPlanPatch::default()
        };
        patch.apply_to(&mut plan);
        assert_eq!(plan.plan_name, "X");
        assert_eq!(plan.description.as_deref(), Some("keep"));
    }
}
