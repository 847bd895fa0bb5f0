// ABOUTME: Single normalization boundary for heterogeneous backend response shapes
// ABOUTME: Resolves each envelope once so downstream code only sees canonical types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Macrotrack

use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::errors::{SyncError, SyncResult};
use crate::models::MealPlan;

/// Shapes the list endpoint has been observed to return.
///
/// Variant order matters: serde tries them top to bottom, and a keyed or
/// wrapped object must not be mistaken for a single plan.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ListEnvelope {
    Bare(Vec<MealPlan>),
    Keyed {
        meal_plans: Vec<MealPlan>,
    },
    Wrapped {
        success: bool,
        data: Vec<MealPlan>,
    },
    Single(MealPlan),
}

/// Shapes a single-plan endpoint has been observed to return
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PlanEnvelope {
    Bare(MealPlan),
    Named { plan: MealPlan },
    Wrapped { success: bool, data: MealPlan },
}

/// Normalize a list response body into the canonical plan array.
///
/// Accepts a bare array, `{meal_plans: [...]}`, `{success, data: [...]}`,
/// or a single plan object. Anything else is a malformed response; the raw
/// payload is kept on the error for diagnosis.
pub fn plans_from_value(endpoint: &str, body: Value) -> SyncResult<Vec<MealPlan>> {
    match serde_json::from_value::<ListEnvelope>(body.clone()) {
        Ok(ListEnvelope::Bare(plans) | ListEnvelope::Keyed { meal_plans: plans }) => Ok(plans),
        Ok(ListEnvelope::Wrapped { success, data }) => {
            if !success {
                warn!(endpoint, "list envelope reported success=false");
            }
            Ok(data)
        }
        Ok(ListEnvelope::Single(plan)) => Ok(vec![plan]),
        Err(e) => {
            warn!(endpoint, error = %e, "unrecognized list envelope");
            Err(SyncError::MalformedResponse {
                endpoint: endpoint.to_owned(),
                body,
            })
        }
    }
}

/// Normalize a single-plan response body into a canonical [`MealPlan`].
///
/// Accepts a bare object carrying an `id`, `{plan: {...}}`, or
/// `{success, data: {...}}`. `items` always deserializes to at least an
/// empty vec, so callers never see an absent item list.
pub fn plan_from_value(endpoint: &str, body: Value) -> SyncResult<MealPlan> {
    match serde_json::from_value::<PlanEnvelope>(body.clone()) {
        Ok(PlanEnvelope::Bare(plan) | PlanEnvelope::Named { plan }) => Ok(plan),
        Ok(PlanEnvelope::Wrapped { success, data }) => {
            if !success {
                warn!(endpoint, "plan envelope reported success=false");
            }
            Ok(data)
        }
        Err(e) => {
            warn!(endpoint, error = %e, "unrecognized plan envelope");
            Err(SyncError::MalformedResponse {
                endpoint: endpoint.to_owned(),
                body,
            })
        }
    }
}
