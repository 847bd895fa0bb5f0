// ABOUTME: Offline-tolerant client library for the Macrotrack meal-plan API
// ABOUTME: Reconciles a remote JSON backend with a durable local mirror
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Macrotrack

//! Macrotrack meal-plan synchronization client.
//!
//! The crate exposes one orchestrator, [`service::ReconciliationService`],
//! which treats the remote API as the source of truth but never lets its
//! unavailability block the user: reads fall back to a durable local mirror,
//! creates degrade to local-only records, and updates patch the mirror when
//! the backend cannot be reached.
//!
//! This is an offline-tolerant CRUD cache, not a conflict-resolving sync
//! engine: reconciliation is last-write-wins and local-only records are not
//! replayed against the backend when connectivity returns.

/// Durable local mirror of meal plans and the targets handoff key
pub mod cache;
/// Environment-driven client configuration
pub mod config;
/// Read-only models for the exercise stats and heatmap dashboard
pub mod dashboard;
/// Typed error taxonomy for remote and local failures
pub mod errors;
/// Shared HTTP client with configured timeouts
pub mod http_client;
/// Read-only meal catalog collaborator
pub mod meals;
/// Meal plan, item, and target data model
pub mod models;
/// Remote store: HTTP calls and envelope normalization
pub mod remote;
/// Reconciliation service orchestrating remote and local stores
pub mod service;
/// Pure presentation reductions (grouping, totals, progress)
pub mod summary;

pub use cache::LocalCache;
pub use config::ClientConfig;
pub use errors::{SyncError, SyncResult};
pub use meals::{MealListing, MealService};
pub use models::{Meal, MealPlan, MealPlanItem, MealPlanPatch, NewMealPlan, NutritionTargets};
pub use remote::RemoteStore;
pub use service::{PlanListing, ReconciliationService};
