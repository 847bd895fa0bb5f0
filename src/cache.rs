// ABOUTME: Durable local mirror: one JSON file per namespaced key under the data dir
// ABOUTME: Reads swallow malformed content; writes are whole-value overwrites
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Macrotrack

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::errors::{SyncError, SyncResult};
use crate::models::{Meal, MealPlan, NutritionTargets};

/// Key holding the mirrored meal plan array
pub const PLANS_KEY: &str = "local_meal_plans";
/// Key holding the mirrored meal catalog
pub const MEALS_KEY: &str = "local_meals";
/// Transient key for the calculator-to-form targets handoff
pub const TARGETS_KEY: &str = "temp_nutrition_targets";

/// Persistence façade over a directory of JSON-encoded values.
///
/// No partial-write or transactional guarantees: values are small and
/// infrequent, and every write replaces the whole key. A read of absent or
/// malformed content yields the empty value, never an error, so a corrupt
/// mirror degrades to an empty cache instead of wedging the client.
#[derive(Debug, Clone)]
pub struct LocalCache {
    dir: PathBuf,
}

impl LocalCache {
    /// Open the cache rooted at `dir`, creating the directory if needed
    pub fn new(dir: impl Into<PathBuf>) -> SyncResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| SyncError::Storage {
            path: dir.clone(),
            source,
        })?;
        Ok(Self { dir })
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    /// Load the mirrored plans; absent or malformed content yields `[]`.
    ///
    /// The `_localOnly` flag is realigned with the id form on load, so an
    /// edited or pre-existing file cannot break that invariant.
    #[must_use]
    pub fn load_plans(&self) -> Vec<MealPlan> {
        let mut plans: Vec<MealPlan> = self.read_key(PLANS_KEY).unwrap_or_default();
        for plan in &mut plans {
            plan.normalize_local_flag();
        }
        plans
    }

    /// Replace the mirrored plans wholesale
    pub fn store_plans(&self, plans: &[MealPlan]) -> SyncResult<()> {
        self.write_key(PLANS_KEY, &plans, "meal plan mirror")
    }

    /// Load the mirrored meal catalog; absent or malformed content yields `[]`
    #[must_use]
    pub fn load_meals(&self) -> Vec<Meal> {
        self.read_key(MEALS_KEY).unwrap_or_default()
    }

    /// Replace the mirrored meal catalog wholesale
    pub fn store_meals(&self, meals: &[Meal]) -> SyncResult<()> {
        self.write_key(MEALS_KEY, &meals, "meal catalog mirror")
    }

    /// Stash calculator output for the plan form to pick up
    pub fn store_targets(&self, targets: &NutritionTargets) -> SyncResult<()> {
        self.write_key(TARGETS_KEY, targets, "nutrition targets handoff")
    }

    /// Consume the stashed targets: read the key, then delete it.
    /// A second call returns `None` until the next `store_targets`.
    #[must_use]
    pub fn take_targets(&self) -> Option<NutritionTargets> {
        let targets: Option<NutritionTargets> = self.read_key(TARGETS_KEY);
        if targets.is_some() {
            remove_quietly(&self.key_path(TARGETS_KEY));
        }
        targets
    }

    fn read_key<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let path = self.key_path(key);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                warn!(key, error = %e, "failed to read local store key");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(key, error = %e, "discarding malformed local store content");
                None
            }
        }
    }

    fn write_key<T: Serialize + ?Sized>(
        &self,
        key: &str,
        value: &T,
        context: &'static str,
    ) -> SyncResult<()> {
        let encoded =
            serde_json::to_vec(value).map_err(|source| SyncError::Serialization {
                context,
                source,
            })?;
        let path = self.key_path(key);
        fs::write(&path, encoded).map_err(|source| SyncError::Storage { path, source })?;
        debug!(key, "local store key written");
        Ok(())
    }
}

fn remove_quietly(path: &Path) {
    if let Err(e) = fs::remove_file(path) {
        if e.kind() != std::io::ErrorKind::NotFound {
            warn!(path = %path.display(), error = %e, "failed to delete local store key");
        }
    }
}
