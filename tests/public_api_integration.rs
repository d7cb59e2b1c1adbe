//! HTTP-level tests driving the API and public routers together.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use cardlink::api::create_api_router;
use cardlink::public::create_public_router;
use cardlink::storage::{SqliteStorage, Storage};

async fn setup() -> (Router, Router, Arc<dyn Storage>) {
    let storage: Arc<dyn Storage> = Arc::new(
        SqliteStorage::new_with_max_connections("sqlite::memory:", 1)
            .await
            .expect("failed to open in-memory sqlite"),
    );
    storage.init().await.expect("failed to init schema");
    (
        create_api_router(Arc::clone(&storage)),
        create_public_router(Arc::clone(&storage)),
        storage,
    )
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("failed to read body");
    serde_json::from_slice(&bytes).expect("body is not json")
}

async fn create_jo(api: &Router) -> String {
    let request = Request::builder()
        .method("POST")
        .uri("/profiles")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({
                "owner_id": "owner-1",
                "display_name": "Jo Smith",
                "email": "jo@x.com",
                "headline": "Carpenter"
            })
            .to_string(),
        ))
        .unwrap();

    let response = api.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    body["slug"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn create_then_view_via_qr_records_one_event() {
    let (api, public, storage) = setup().await;
    let slug = create_jo(&api).await;

    assert!(slug.starts_with("jo-smith-jo-"));
    let suffix = slug.rsplit('-').next().unwrap();
    assert_eq!(suffix.len(), 3);

    let request = Request::builder()
        .uri(format!("/{slug}?ref=qr"))
        .header(header::USER_AGENT, "Mozilla/5.0 (iPhone; CPU iPhone OS 16_0)")
        .body(Body::empty())
        .unwrap();
    let response = public.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["display_name"], "Jo Smith");

    let profile = storage.get_profile(&slug).await.unwrap().unwrap();
    assert_eq!(profile.views, 1);

    let events = storage.recent_view_events(profile.id, 10).await.unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].referrer_category, "qr");
    assert_eq!(events[0].device_class, "mobile");
}

#[tokio::test]
async fn private_profiles_are_hidden_from_the_public_server() {
    let (api, public, _storage) = setup().await;
    let slug = create_jo(&api).await;

    let request = Request::builder()
        .method("PUT")
        .uri(format!("/profiles/{slug}"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({ "is_public": false }).to_string()))
        .unwrap();
    let response = api.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let request = Request::builder()
        .uri(format!("/{slug}"))
        .body(Body::empty())
        .unwrap();
    let response = public.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn slug_override_conflict_maps_to_409() {
    let (api, _public, _storage) = setup().await;
    let first = create_jo(&api).await;
    let second = create_jo(&api).await;

    let request = Request::builder()
        .method("PUT")
        .uri(format!("/profiles/{second}"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({ "slug": first }).to_string()))
        .unwrap();
    let response = api.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn vcard_download_is_text_vcard() {
    let (api, public, _storage) = setup().await;
    let slug = create_jo(&api).await;

    let request = Request::builder()
        .uri(format!("/{slug}/vcard"))
        .body(Body::empty())
        .unwrap();
    let response = public.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response
        .headers()
        .get(header::CONTENT_TYPE)
        .unwrap()
        .to_str()
        .unwrap()
        .starts_with("text/vcard"));

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let card = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(card.contains("FN:Jo Smith"));
    assert!(card.contains("EMAIL;TYPE=INTERNET:jo@x.com"));
}

#[tokio::test]
async fn lead_submission_shows_up_for_the_owner() {
    let (api, public, _storage) = setup().await;
    let slug = create_jo(&api).await;

    let request = Request::builder()
        .method("POST")
        .uri(format!("/{slug}/leads"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({
                "name": "Visitor",
                "email": "v@example.org",
                "message": "Quote for a deck?"
            })
            .to_string(),
        ))
        .unwrap();
    let response = public.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let request = Request::builder()
        .uri(format!("/profiles/{slug}/leads"))
        .body(Body::empty())
        .unwrap();
    let response = api.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["name"], "Visitor");
}

#[tokio::test]
async fn daily_stats_return_thirty_zero_filled_entries() {
    let (api, _public, _storage) = setup().await;
    let slug = create_jo(&api).await;

    let request = Request::builder()
        .uri(format!("/profiles/{slug}/stats/daily"))
        .body(Body::empty())
        .unwrap();
    let response = api.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;

    let series = body["series"].as_array().unwrap();
    assert_eq!(series.len(), 30);
    assert!(series.iter().all(|d| d["views"] == 0));
}
