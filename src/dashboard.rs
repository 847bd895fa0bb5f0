// ABOUTME: Read-only models for the exercise history and activity heatmap dashboard
// ABOUTME: Disposable data: fetched per render, never mirrored locally
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Macrotrack

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Exercise history aggregates from `/ejercicios_stats`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExerciseStats {
    /// Total logged training sessions
    #[serde(default)]
    pub total_sessions: u64,
    /// Per-exercise breakdown
    #[serde(default)]
    pub by_exercise: Vec<ExerciseSummary>,
}

/// Aggregates for a single exercise
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExerciseSummary {
    /// Exercise name as logged
    pub exercise: String,
    /// Number of sessions including this exercise
    #[serde(default)]
    pub sessions: u64,
    /// Heaviest weight lifted, kilograms
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_weight_kg: Option<f64>,
    /// Most recent session timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_performed: Option<DateTime<Utc>>,
}

/// One cell of the activity heatmap from `/calendar_heatmap?year=`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct HeatmapDay {
    /// Calendar day
    pub date: NaiveDate,
    /// Activities logged that day
    #[serde(default)]
    pub count: u32,
}
