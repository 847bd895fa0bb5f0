// ABOUTME: RemoteStore performing HTTP calls against the backend meal-plan endpoints
// ABOUTME: Maps transport failures and non-2xx statuses into the SyncError taxonomy
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Macrotrack

/// Envelope normalization for heterogeneous response shapes
pub mod envelope;

use reqwest::{Client, Response, StatusCode};
use serde_json::Value;
use tracing::debug;

use crate::config::ClientConfig;
use crate::dashboard::{ExerciseStats, HeatmapDay};
use crate::errors::{SyncError, SyncResult};
use crate::http_client::shared_client;
use crate::models::{Meal, MealPlan, MealPlanPatch, NewMealPlan};

/// HTTP access to the backend meal-plan API.
///
/// Every method is a single bounded call; retries and fallback are the
/// [`crate::service::ReconciliationService`]'s concern, not this layer's.
#[derive(Debug, Clone)]
pub struct RemoteStore {
    base_url: String,
    client: Client,
}

impl RemoteStore {
    /// Build a store for the given base URL (no trailing slash expected)
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: shared_client().clone(),
        }
    }

    /// Build a store from session configuration
    #[must_use]
    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.api_base_url.clone())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// `GET /meal-plans?is_active=` — list plans, normalized
    pub async fn list_plans(&self, is_active: Option<bool>) -> SyncResult<Vec<MealPlan>> {
        let endpoint = "/meal-plans";
        let mut request = self.client.get(self.url(endpoint));
        if let Some(active) = is_active {
            request = request.query(&[("is_active", active)]);
        }
        let response = request
            .send()
            .await
            .map_err(|e| SyncError::from_transport(endpoint, &e))?;
        let body = read_json(endpoint, None, response).await?;
        envelope::plans_from_value(endpoint, body)
    }

    /// `GET /meal-plans/{id}?with_items=` — fetch one plan, normalized
    pub async fn fetch_plan(&self, id: &str, with_items: bool) -> SyncResult<MealPlan> {
        let endpoint = format!("/meal-plans/{id}");
        let response = self
            .client
            .get(self.url(&endpoint))
            .query(&[("with_items", with_items)])
            .send()
            .await
            .map_err(|e| SyncError::from_transport(&endpoint, &e))?;
        let body = read_json(&endpoint, Some(id), response).await?;
        envelope::plan_from_value(&endpoint, body)
    }

    /// `POST /meal-plans` — create a plan, returning the normalized record
    pub async fn create_plan(&self, payload: &NewMealPlan) -> SyncResult<MealPlan> {
        let endpoint = "/meal-plans";
        let response = self
            .client
            .post(self.url(endpoint))
            .json(payload)
            .send()
            .await
            .map_err(|e| SyncError::from_transport(endpoint, &e))?;
        let body = read_json(endpoint, None, response).await?;
        envelope::plan_from_value(endpoint, body)
    }

    /// `PUT /meal-plans/{id}` — update a plan, returning the normalized record
    pub async fn update_plan(&self, id: &str, patch: &MealPlanPatch) -> SyncResult<MealPlan> {
        let endpoint = format!("/meal-plans/{id}");
        let response = self
            .client
            .put(self.url(&endpoint))
            .json(patch)
            .send()
            .await
            .map_err(|e| SyncError::from_transport(&endpoint, &e))?;
        let body = read_json(&endpoint, Some(id), response).await?;
        envelope::plan_from_value(&endpoint, body)
    }

    /// `DELETE /meal-plans/{id}` — remove a plan remotely
    pub async fn delete_plan(&self, id: &str) -> SyncResult<()> {
        let endpoint = format!("/meal-plans/{id}");
        let response = self
            .client
            .delete(self.url(&endpoint))
            .send()
            .await
            .map_err(|e| SyncError::from_transport(&endpoint, &e))?;
        check_status(&endpoint, Some(id), &response)?;
        debug!(id, "remote plan deleted");
        Ok(())
    }

    /// `GET /meals` — the read-only meal catalog
    pub async fn list_meals(&self) -> SyncResult<Vec<Meal>> {
        let endpoint = "/meals";
        let response = self
            .client
            .get(self.url(endpoint))
            .send()
            .await
            .map_err(|e| SyncError::from_transport(endpoint, &e))?;
        let body = read_json(endpoint, None, response).await?;
        serde_json::from_value(body.clone()).map_err(|_| SyncError::MalformedResponse {
            endpoint: endpoint.to_owned(),
            body,
        })
    }

    /// `GET /ejercicios_stats` — exercise history aggregates for the dashboard
    pub async fn exercise_stats(&self) -> SyncResult<ExerciseStats> {
        let endpoint = "/ejercicios_stats";
        let response = self
            .client
            .get(self.url(endpoint))
            .send()
            .await
            .map_err(|e| SyncError::from_transport(endpoint, &e))?;
        let body = read_json(endpoint, None, response).await?;
        serde_json::from_value(body.clone()).map_err(|_| SyncError::MalformedResponse {
            endpoint: endpoint.to_owned(),
            body,
        })
    }

    /// `GET /calendar_heatmap?year=` — per-day activity counts
    pub async fn calendar_heatmap(&self, year: i32) -> SyncResult<Vec<HeatmapDay>> {
        let endpoint = "/calendar_heatmap";
        let response = self
            .client
            .get(self.url(endpoint))
            .query(&[("year", year)])
            .send()
            .await
            .map_err(|e| SyncError::from_transport(endpoint, &e))?;
        let body = read_json(endpoint, None, response).await?;
        serde_json::from_value(body.clone()).map_err(|_| SyncError::MalformedResponse {
            endpoint: endpoint.to_owned(),
            body,
        })
    }
}

/// Reject non-2xx statuses, mapping 404 to `NotFound` when an id is in play
fn check_status(endpoint: &str, id: Option<&str>, response: &Response) -> SyncResult<()> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }
    if status == StatusCode::NOT_FOUND {
        if let Some(id) = id {
            return Err(SyncError::NotFound { id: id.to_owned() });
        }
    }
    Err(SyncError::Network {
        endpoint: endpoint.to_owned(),
        reason: format!("HTTP {status}"),
    })
}

async fn read_json(endpoint: &str, id: Option<&str>, response: Response) -> SyncResult<Value> {
    check_status(endpoint, id, &response)?;
    response
        .json()
        .await
        .map_err(|e| SyncError::from_transport(endpoint, &e))
}
