// ABOUTME: Integration tests for the reconciliation service against a mock backend
// ABOUTME: Covers remote-first reads, offline degradation, and mirror guarantees
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Macrotrack
#![allow(missing_docs)]

use std::time::Duration;

use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use macrotrack_client::errors::SyncError;
use macrotrack_client::models::{MealPlanPatch, NewMealPlan};
use macrotrack_client::{LocalCache, MealService, ReconciliationService, RemoteStore};

/// A base URL nothing listens on; connections fail immediately
const DEAD_BACKEND: &str = "http://127.0.0.1:9";

fn service_for(base_url: &str, dir: &TempDir) -> ReconciliationService {
    ReconciliationService::from_parts(
        RemoteStore::new(base_url),
        LocalCache::new(dir.path()).unwrap(),
    )
}

fn plan_json(id: &str, name: &str, is_active: bool) -> serde_json::Value {
    json!({
        "id": id,
        "plan_name": name,
        "is_active": is_active,
        "items": [],
        "created_at": "2025-03-01T08:00:00Z",
        "updated_at": "2025-03-01T08:00:00Z"
    })
}

#[tokio::test]
async fn get_all_normalizes_and_mirrors_then_serves_offline() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/meal-plans"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "meal_plans": [plan_json("1", "Semana 1", true), plan_json("2", "Volumen", false)]
        })))
        .mount(&server)
        .await;

    let online = service_for(&server.uri(), &dir);
    let listing = online.get_all(None).await;
    assert!(!listing.from_local_storage);
    assert!(listing.error.is_none());
    assert_eq!(listing.meal_plans.len(), 2);
    assert_eq!(online.cached_snapshot().map(|p| p.len()), Some(2));

    // Same mirror directory, but the backend is gone
    let offline = service_for(DEAD_BACKEND, &dir);
    let fallback = offline.get_all(None).await;
    assert!(fallback.from_local_storage);
    assert!(fallback.error.is_some());
    assert_eq!(fallback.meal_plans.len(), 2);
    assert_eq!(fallback.meal_plans[0].plan_name, "Semana 1");

    let filtered = offline.get_all(Some(true)).await;
    assert_eq!(filtered.meal_plans.len(), 1);
    assert_eq!(filtered.meal_plans[0].id, "1");
}

#[tokio::test]
async fn get_all_is_idempotent_without_writes() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/meal-plans"))
        .respond_with(ResponseTemplate::new(200)
            .set_body_json(json!([plan_json("1", "Semana 1", true)])))
        .mount(&server)
        .await;

    let service = service_for(&server.uri(), &dir);
    let first = service.get_all(None).await;
    let second = service.get_all(None).await;
    assert_eq!(first.meal_plans, second.meal_plans);
}

#[tokio::test]
async fn empty_mirror_yields_empty_offline_listing() {
    let dir = TempDir::new().unwrap();
    let service = service_for(DEAD_BACKEND, &dir);
    let listing = service.get_all(None).await;
    assert!(listing.from_local_storage);
    assert!(listing.meal_plans.is_empty());
}

#[tokio::test]
async fn online_create_returns_server_record_and_appends_to_mirror() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("POST"))
        .and(path("/meal-plans"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "success": true,
            "data": plan_json("42", "Semana 1", true)
        })))
        .mount(&server)
        .await;

    let service = service_for(&server.uri(), &dir);
    let plan = service
        .create(NewMealPlan {
            plan_name: "Semana 1".to_owned(),
            ..NewMealPlan::default()
        })
        .await
        .unwrap();

    assert_eq!(plan.id, "42");
    assert!(plan.is_active);
    assert!(plan.items.is_empty());
    assert!(!plan.local_only);

    let mirror = LocalCache::new(dir.path()).unwrap().load_plans();
    assert_eq!(mirror.len(), 1);
    assert_eq!(mirror[0].id, "42");
}

#[tokio::test]
async fn offline_create_degrades_to_local_only_record() {
    let dir = TempDir::new().unwrap();
    let service = service_for(DEAD_BACKEND, &dir);

    let plan = service
        .create(NewMealPlan {
            plan_name: "Semana 1".to_owned(),
            ..NewMealPlan::default()
        })
        .await
        .unwrap();

    assert!(plan.local_only);
    assert!(plan.id.starts_with("local-"));
    assert_eq!(plan.plan_name, "Semana 1");
    assert!(plan.is_active);

    // Round trip through the mirror by id
    let fetched = service.get_by_id(&plan.id, true).await.unwrap();
    assert_eq!(fetched.plan_name, plan.plan_name);
    assert_eq!(fetched.is_active, plan.is_active);
    assert_eq!(fetched.items.len(), plan.items.len());
}

#[tokio::test]
async fn create_defaults_empty_plan_name() {
    let dir = TempDir::new().unwrap();
    let service = service_for(DEAD_BACKEND, &dir);
    let plan = service.create(NewMealPlan::default()).await.unwrap();
    assert!(!plan.id.is_empty());
    assert!(!plan.plan_name.is_empty());
    assert!(plan.items.is_empty());
}

#[tokio::test]
async fn get_by_id_accepts_named_envelope_and_defaults_items() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/meal-plans/9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "plan": {"id": "9", "plan_name": "Definición"}
        })))
        .mount(&server)
        .await;

    let service = service_for(&server.uri(), &dir);
    let plan = service.get_by_id("9", true).await.unwrap();
    assert_eq!(plan.id, "9");
    assert!(plan.items.is_empty());
}

#[tokio::test]
async fn get_by_id_propagates_not_found_and_malformed() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/meal-plans/404"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/meal-plans/9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"weird": 1})))
        .mount(&server)
        .await;

    let service = service_for(&server.uri(), &dir);

    let missing = service.get_by_id("404", true).await.unwrap_err();
    assert!(matches!(missing, SyncError::NotFound { id } if id == "404"));

    let malformed = service.get_by_id("9", true).await.unwrap_err();
    assert!(matches!(malformed, SyncError::MalformedResponse { .. }));

    let local_missing = service.get_by_id("local-777", true).await.unwrap_err();
    assert!(matches!(local_missing, SyncError::NotFound { .. }));
}

#[tokio::test]
async fn update_patches_local_only_record_in_mirror() {
    let dir = TempDir::new().unwrap();
    let service = service_for(DEAD_BACKEND, &dir);

    let created = service
        .create(NewMealPlan {
            plan_name: "Y".to_owned(),
            ..NewMealPlan::default()
        })
        .await
        .unwrap();

    let updated = service
        .update(
            &created.id,
            MealPlanPatch {
                plan_name: Some("X".to_owned()),
                ..MealPlanPatch::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.plan_name, "X");
    assert!(updated.updated_at >= created.updated_at);

    let mirror = LocalCache::new(dir.path()).unwrap().load_plans();
    assert_eq!(mirror[0].plan_name, "X");
}

#[tokio::test]
async fn remote_update_mirrors_normalized_result_when_present() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let cache = LocalCache::new(dir.path()).unwrap();
    let seeded: Vec<macrotrack_client::MealPlan> =
        serde_json::from_value(json!([plan_json("7", "Semana 1", true)])).unwrap();
    cache.store_plans(&seeded).unwrap();

    Mock::given(method("PUT"))
        .and(path("/meal-plans/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": plan_json("7", "Semana 2", true)
        })))
        .mount(&server)
        .await;

    let service = service_for(&server.uri(), &dir);
    let updated = service
        .update(
            "7",
            MealPlanPatch {
                plan_name: Some("Semana 2".to_owned()),
                ..MealPlanPatch::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.plan_name, "Semana 2");

    let mirror = cache.load_plans();
    assert_eq!(mirror.len(), 1);
    assert_eq!(mirror[0].plan_name, "Semana 2");
}

#[tokio::test]
async fn remote_update_of_unmirrored_plan_leaves_mirror_untouched() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let cache = LocalCache::new(dir.path()).unwrap();
    let seeded: Vec<macrotrack_client::MealPlan> =
        serde_json::from_value(json!([plan_json("7", "Semana 1", true)])).unwrap();
    cache.store_plans(&seeded).unwrap();

    Mock::given(method("PUT"))
        .and(path("/meal-plans/8"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "plan": plan_json("8", "Otra", true)
        })))
        .mount(&server)
        .await;

    let service = service_for(&server.uri(), &dir);
    let updated = service.update("8", MealPlanPatch::default()).await.unwrap();
    assert_eq!(updated.id, "8");

    // Plan 8 was never mirrored, so the mirror still only holds plan 7
    let mirror = cache.load_plans();
    assert_eq!(mirror.len(), 1);
    assert_eq!(mirror[0].id, "7");
    assert_eq!(mirror[0].plan_name, "Semana 1");
}

#[tokio::test]
async fn update_falls_back_to_mirror_when_remote_fails() {
    let dir = TempDir::new().unwrap();
    let cache = LocalCache::new(dir.path()).unwrap();
    let seeded: Vec<macrotrack_client::MealPlan> =
        serde_json::from_value(json!([plan_json("7", "Semana 1", true)])).unwrap();
    cache.store_plans(&seeded).unwrap();

    let service = service_for(DEAD_BACKEND, &dir);
    let updated = service
        .update(
            "7",
            MealPlanPatch {
                plan_name: Some("Semana 2".to_owned()),
                ..MealPlanPatch::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.plan_name, "Semana 2");

    // Unknown everywhere: the remote error is what the caller sees
    let err = service
        .update("999", MealPlanPatch::default())
        .await
        .unwrap_err();
    assert!(err.is_network());
}

#[tokio::test]
async fn delete_purges_mirror_even_when_backend_is_down() {
    let dir = TempDir::new().unwrap();
    let cache = LocalCache::new(dir.path()).unwrap();
    let seeded: Vec<macrotrack_client::MealPlan> =
        serde_json::from_value(json!([plan_json("7", "Semana 1", true)])).unwrap();
    cache.store_plans(&seeded).unwrap();

    let service = service_for(DEAD_BACKEND, &dir);
    assert!(service.delete("7").await.unwrap());

    let listing = service.get_all(None).await;
    assert!(listing.from_local_storage);
    assert!(listing.meal_plans.iter().all(|p| p.id != "7"));
}

#[tokio::test]
async fn delete_tolerates_absence_in_both_stores() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("DELETE"))
        .and(path("/meal-plans/7"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let service = service_for(&server.uri(), &dir);
    assert!(service.delete("7").await.unwrap());
}

#[tokio::test]
async fn superseded_listing_does_not_overwrite_mirror() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    // The first request is slow and superseded by the second
    Mock::given(method("GET"))
        .and(path("/meal-plans"))
        .and(query_param("is_active", "true"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([plan_json("stale", "Vieja", true)]))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/meal-plans"))
        .and(query_param("is_active", "false"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([plan_json("fresh", "Nueva", false)])),
        )
        .mount(&server)
        .await;

    let service = service_for(&server.uri(), &dir);
    let slow = service.get_all(Some(true));
    let fast = async {
        tokio::time::sleep(Duration::from_millis(100)).await;
        service.get_all(Some(false)).await
    };
    let (slow_listing, fast_listing) = tokio::join!(slow, fast);

    // Each caller still gets its own response
    assert_eq!(slow_listing.meal_plans[0].id, "stale");
    assert_eq!(fast_listing.meal_plans[0].id, "fresh");

    // But only the newer response reached the durable mirror
    let mirror = LocalCache::new(dir.path()).unwrap().load_plans();
    assert_eq!(mirror.len(), 1);
    assert_eq!(mirror[0].id, "fresh");
}

#[tokio::test]
async fn meal_catalog_mirrors_and_falls_back() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/meals"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "m1", "name": "Pechuga de pollo", "calories": 165.0, "protein_g": 31.0}
        ])))
        .mount(&server)
        .await;

    let online = MealService::from_parts(
        RemoteStore::new(server.uri()),
        LocalCache::new(dir.path()).unwrap(),
    );
    let listing = online.get_all().await;
    assert!(!listing.from_local_storage);
    assert_eq!(listing.meals.len(), 1);

    let offline = MealService::from_parts(
        RemoteStore::new(DEAD_BACKEND),
        LocalCache::new(dir.path()).unwrap(),
    );
    let fallback = offline.get_all().await;
    assert!(fallback.from_local_storage);
    assert_eq!(fallback.meals[0].name, "Pechuga de pollo");
}
