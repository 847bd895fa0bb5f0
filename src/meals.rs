// ABOUTME: Read-only meal catalog collaborator with the same mirror-fallback shape
// ABOUTME: Forms consult it for the list of selectable meals when adding items
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Macrotrack

use tracing::{instrument, warn};

use crate::cache::LocalCache;
use crate::config::ClientConfig;
use crate::errors::SyncResult;
use crate::models::Meal;
use crate::remote::RemoteStore;

/// Result of a [`MealService::get_all`] call
#[derive(Debug, Clone, PartialEq)]
pub struct MealListing {
    /// Selectable catalog meals
    pub meals: Vec<Meal>,
    /// True when the remote call failed and the mirror answered instead
    pub from_local_storage: bool,
}

/// Read-only access to the backend meal catalog.
///
/// Meals are owned by the backend; this service never creates or mutates
/// them, it only keeps a mirrored copy so the add-item form still works
/// offline.
#[derive(Debug)]
pub struct MealService {
    remote: RemoteStore,
    cache: LocalCache,
}

impl MealService {
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
        Self { remote, cache }
    }

    /// List catalog meals, remote first, mirror on failure
    #[instrument(skip(self))]
    pub async fn get_all(&self) -> MealListing {
        match self.remote.list_meals().await {
            Ok(meals) => {
                if let Err(e) = self.cache.store_meals(&meals) {
                    warn!(error = %e, "could not refresh local meal mirror");
                }
                MealListing {
                    meals,
                    from_local_storage: false,
                }
            }
            Err(e) => {
                warn!(error = %e, "remote meal listing failed, serving local mirror");
                MealListing {
                    meals: self.cache.load_meals(),
                    from_local_storage: true,
                }
            }
        }
    }
}
