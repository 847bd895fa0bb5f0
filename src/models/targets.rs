// ABOUTME: Nutrition targets handed off from the calculator into the plan form
// ABOUTME: Persisted under a transient cache key and consumed exactly once
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Macrotrack

use serde::{Deserialize, Serialize};

/// Daily macro targets produced by the nutrition calculator.
///
/// Stored under the `temp_nutrition_targets` key so the plan form can pick
/// them up after navigation; [`crate::cache::LocalCache::take_targets`]
/// deletes the key on read.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct NutritionTargets {
    /// Daily kilocalorie target
    pub calories: f64,
    /// Daily protein target in grams
    pub protein_g: f64,
    /// Daily carbohydrate target in grams
    pub carbs_g: f64,
    /// Daily fat target in grams
    pub fat_g: f64,
}
