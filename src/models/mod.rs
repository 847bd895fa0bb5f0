// ABOUTME: Data model for meal plans, catalog meals, and nutrition targets
// ABOUTME: Re-exports the canonical types consumed by the reconciliation layer
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Macrotrack

/// Catalog meal entity (read-only collaborator)
pub mod meal;
/// Meal plan aggregate, its items, and the local-id scheme
pub mod meal_plan;
/// Calculator-to-form nutrition target handoff
pub mod targets;

pub use meal::Meal;
pub use meal_plan::{
    is_local_id, new_local_id, DayOfWeek, MealPlan, MealPlanItem, MealPlanPatch, MealType,
    NewMealPlan, LOCAL_ID_PREFIX,
};
pub use targets::NutritionTargets;
