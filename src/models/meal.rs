// ABOUTME: Catalog meal entity consumed read-only from the backend
// ABOUTME: Macro values are expressed per 100 g and drive item derivation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Macrotrack

use serde::{Deserialize, Serialize};

/// A selectable meal from the backend catalog.
///
/// Owned by the backend; this crate never mutates meals. Macro fields are
/// per 100 g and feed the add-time derivation on [`super::MealPlanItem`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Meal {
    /// Backend identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Kilocalories per 100 g
    #[serde(default)]
    pub calories: f64,
    /// Protein grams per 100 g
    #[serde(default)]
    pub protein_g: f64,
    /// Carbohydrate grams per 100 g
    #[serde(default)]
    pub carbohydrates_g: f64,
    /// Fat grams per 100 g
    #[serde(default)]
    pub fat_g: f64,
}
