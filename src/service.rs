// ABOUTME: ReconciliationService: remote-first CRUD with a durable local fallback
// ABOUTME: Sole owner of the in-memory snapshot and the local mirror writes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Macrotrack

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use chrono::Utc;
use tracing::{debug, instrument, warn};

use crate::cache::LocalCache;
use crate::config::ClientConfig;
use crate::errors::{SyncError, SyncResult};
use crate::models::{is_local_id, new_local_id, MealPlan, MealPlanPatch, NewMealPlan};
use crate::remote::RemoteStore;

/// Fallback plan name applied when a create payload leaves it empty
const DEFAULT_PLAN_NAME: &str = "Nuevo plan";

/// Result of a [`ReconciliationService::get_all`] call
#[derive(Debug, Clone, PartialEq)]
pub struct PlanListing {
    /// Plans after the optional `is_active` filter
    pub meal_plans: Vec<MealPlan>,
    /// True when the remote call failed and the mirror answered instead
    pub from_local_storage: bool,
    /// Human-readable remote failure, present only on fallback
    pub error: Option<String>,
}

/// Orchestrates [`RemoteStore`] and [`LocalCache`] behind one CRUD contract.
///
/// The remote API is the source of truth, but its unavailability never
/// blocks the user: every operation has a local degrade path. Constructed
/// once per session; UI components call into it and never touch storage
/// directly.
#[derive(Debug)]
pub struct ReconciliationService {
    remote: RemoteStore,
    cache: LocalCache,
    /// Snapshot of the last listing served; invalidated before every fetch
    cached_plans: Mutex<Option<Vec<MealPlan>>>,
    /// Request generation; stale list responses must not touch shared state
    generation: AtomicU64,
}

impl ReconciliationService {
    /// Build the service from session configuration
    pub fn new(config: &ClientConfig) -> SyncResult<Self> {
        Ok(Self::from_parts(
            RemoteStore::from_config(config),
            LocalCache::new(config.data_dir.clone())?,
        ))
    }

    /// Build the service from pre-constructed stores
    #[must_use]
    pub fn from_parts(remote: RemoteStore, cache: LocalCache) -> Self {
        Self {
            remote,
            cache,
            cached_plans: Mutex::new(None),
            generation: AtomicU64::new(0),
        }
    }

    /// Drop the in-memory snapshot; the durable mirror is untouched
    pub fn clear_cache(&self) {
        if let Ok(mut guard) = self.cached_plans.lock() {
            *guard = None;
        }
    }

    /// The last listing served, if any call completed since `clear_cache`
    #[must_use]
    pub fn cached_snapshot(&self) -> Option<Vec<MealPlan>> {
        self.cached_plans.lock().ok().and_then(|guard| guard.clone())
    }

    /// List plans, remote first, mirror on failure.
    ///
    /// The in-memory snapshot is invalidated before every call; staleness
    /// has caused bugs before, so no stale-read optimization is attempted.
    /// On success the normalized array replaces the mirror wholesale. A
    /// response superseded by a newer call is still returned to its caller
    /// but leaves the mirror and snapshot alone.
    #[instrument(skip(self))]
    pub async fn get_all(&self, is_active: Option<bool>) -> PlanListing {
        self.clear_cache();
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        match self.remote.list_plans(is_active).await {
            Ok(plans) => {
                if self.generation.load(Ordering::SeqCst) == generation {
                    if let Err(e) = self.cache.store_plans(&plans) {
                        warn!(error = %e, "could not refresh local mirror after fetch");
                    }
                    if let Ok(mut guard) = self.cached_plans.lock() {
                        *guard = Some(plans.clone());
                    }
                } else {
                    debug!("list response superseded, leaving local state alone");
                }
                PlanListing {
                    meal_plans: filter_active(plans, is_active),
                    from_local_storage: false,
                    error: None,
                }
            }
            Err(e) => {
                warn!(error = %e, "remote listing failed, serving local mirror");
                PlanListing {
                    meal_plans: filter_active(self.cache.load_plans(), is_active),
                    from_local_storage: true,
                    error: Some(e.to_string()),
                }
            }
        }
    }

    /// Fetch one plan by id.
    ///
    /// Local-only ids resolve purely from the mirror. For remote ids a
    /// network failure falls back to the mirrored copy when one exists;
    /// an unrecognized response shape propagates as `MalformedResponse`.
    #[instrument(skip(self))]
    pub async fn get_by_id(&self, id: &str, with_items: bool) -> SyncResult<MealPlan> {
        if is_local_id(id) {
            return self.find_local(id);
        }

        match self.remote.fetch_plan(id, with_items).await {
            Ok(plan) => Ok(plan),
            Err(e) if e.is_network() => {
                warn!(id, error = %e, "remote fetch failed, trying local mirror");
                self.find_local(id).map_err(|_| e)
            }
            Err(e) => Err(e),
        }
    }

    /// Create a plan, degrading to a local-only record when offline.
    ///
    /// Never fails on remote unavailability: the degraded record carries a
    /// fresh `local-<millis>` id and `_localOnly` until a later sync (which
    /// this layer deliberately does not attempt on its own).
    #[instrument(skip(self, data))]
    pub async fn create(&self, data: NewMealPlan) -> SyncResult<MealPlan> {
        let payload = canonical_payload(data);

        match self.remote.create_plan(&payload).await {
            Ok(plan) => {
                self.clear_cache();
                // Append keeps the mirror consistent without a full refetch
                let mut plans = self.cache.load_plans();
                plans.push(plan.clone());
                if let Err(e) = self.cache.store_plans(&plans) {
                    warn!(error = %e, "created remotely but could not mirror locally");
                }
                Ok(plan)
            }
            Err(e) => {
                warn!(error = %e, "remote create failed, synthesizing local-only plan");
                let plan = synthesize_local(payload);
                let mut plans = self.cache.load_plans();
                plans.push(plan.clone());
                self.cache.store_plans(&plans)?;
                self.clear_cache();
                Ok(plan)
            }
        }
    }

    /// Update a plan, remote first.
    ///
    /// Local-only ids patch the mirror in place. For remote ids a network
    /// failure still succeeds if the mirror holds the record; otherwise the
    /// network error propagates.
    #[instrument(skip(self, patch))]
    pub async fn update(&self, id: &str, patch: MealPlanPatch) -> SyncResult<MealPlan> {
        if is_local_id(id) {
            return self.patch_local(id, &patch);
        }

        match self.remote.update_plan(id, &patch).await {
            Ok(plan) => {
                self.mirror_updated(&plan);
                self.clear_cache();
                Ok(plan)
            }
            Err(e) if e.is_network() => {
                warn!(id, error = %e, "remote update failed, patching local mirror");
                match self.patch_local(id, &patch) {
                    Ok(plan) => Ok(plan),
                    // Unknown locally as well: the remote failure is the story
                    Err(_) => Err(e),
                }
            }
            Err(e) => Err(e),
        }
    }

    /// Delete a plan from both stores, tolerating absence in either.
    ///
    /// The mirror purge runs regardless of the API outcome so the mirror
    /// never retains a plan the caller believes deleted; only when the
    /// purge itself fails does an API error propagate.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> SyncResult<bool> {
        if is_local_id(id) {
            self.purge_local(id)?;
            self.clear_cache();
            return Ok(true);
        }

        let api_result = match self.remote.delete_plan(id).await {
            Ok(()) => Ok(()),
            // Already gone remotely counts as deleted
            Err(SyncError::NotFound { .. }) => Ok(()),
            Err(e) => Err(e),
        };

        match (api_result, self.purge_local(id)) {
            (api_result, Ok(())) => {
                if let Err(e) = api_result {
                    warn!(id, error = %e, "remote delete failed, removed from mirror only");
                }
                self.clear_cache();
                Ok(true)
            }
            (Err(api_error), Err(purge_error)) => {
                warn!(id, error = %purge_error, "mirror purge failed after API error");
                Err(api_error)
            }
            (Ok(()), Err(purge_error)) => Err(purge_error),
        }
    }

    fn find_local(&self, id: &str) -> SyncResult<MealPlan> {
        self.cache
            .load_plans()
            .into_iter()
            .find(|plan| plan.id == id)
            .ok_or_else(|| SyncError::NotFound { id: id.to_owned() })
    }

    fn patch_local(&self, id: &str, patch: &MealPlanPatch) -> SyncResult<MealPlan> {
        let mut plans = self.cache.load_plans();
        let plan = plans
            .iter_mut()
            .find(|plan| plan.id == id)
            .ok_or_else(|| SyncError::NotFound { id: id.to_owned() })?;
        patch.apply_to(plan);
        plan.updated_at = Utc::now();
        let updated = plan.clone();
        self.cache.store_plans(&plans)?;
        self.clear_cache();
        Ok(updated)
    }

    /// Replace the mirrored copy of `plan` if the mirror holds one
    fn mirror_updated(&self, plan: &MealPlan) {
        let mut plans = self.cache.load_plans();
        let Some(slot) = plans.iter_mut().find(|p| p.id == plan.id) else {
            return;
        };
        *slot = plan.clone();
        if let Err(e) = self.cache.store_plans(&plans) {
            warn!(id = %plan.id, error = %e, "could not mirror remote update");
        }
    }

    fn purge_local(&self, id: &str) -> SyncResult<()> {
        let mut plans = self.cache.load_plans();
        let before = plans.len();
        plans.retain(|plan| plan.id != id);
        if plans.len() == before {
            return Ok(());
        }
        self.cache.store_plans(&plans)
    }
}

fn filter_active(plans: Vec<MealPlan>, is_active: Option<bool>) -> Vec<MealPlan> {
    match is_active {
        Some(active) => plans.into_iter().filter(|p| p.is_active == active).collect(),
        None => plans,
    }
}

fn canonical_payload(mut data: NewMealPlan) -> NewMealPlan {
    if data.plan_name.trim().is_empty() {
        data.plan_name = DEFAULT_PLAN_NAME.to_owned();
    }
    data.is_active = Some(data.is_active.unwrap_or(true));
    data
}

fn synthesize_local(payload: NewMealPlan) -> MealPlan {
    let now = Utc::now();
    MealPlan {
        id: new_local_id(now),
        plan_name: payload.plan_name,
        description: payload.description,
        is_active: payload.is_active.unwrap_or(true),
        target_calories: payload.target_calories,
        target_protein_g: payload.target_protein_g,
        target_carbs_g: payload.target_carbs_g,
        target_fat_g: payload.target_fat_g,
        items: payload.items,
        created_at: now,
        updated_at: now,
        local_only: true,
    }
}
