use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::storage::Storage;

use super::handlers::{
    create_profile, delete_profile, get_profile, health_check, list_leads, list_profiles,
    list_sections, list_testimonials, replace_sections, set_testimonial_approval, update_profile,
    AppState,
};
use super::stats::{daily_views, device_breakdown, top_referrers};

pub fn create_api_router(storage: Arc<dyn Storage>) -> Router {
    let state = Arc::new(AppState { storage });

    Router::new()
        .route("/health", get(health_check))
        .route("/profiles", post(create_profile))
        .route("/profiles", get(list_profiles))
        .route("/profiles/{slug}", get(get_profile))
        .route("/profiles/{slug}", put(update_profile))
        .route("/profiles/{slug}", delete(delete_profile))
        .route("/profiles/{slug}/sections", get(list_sections))
        .route("/profiles/{slug}/sections", put(replace_sections))
        .route("/profiles/{slug}/leads", get(list_leads))
        .route("/profiles/{slug}/testimonials", get(list_testimonials))
        .route(
            "/testimonials/{id}/approval",
            put(set_testimonial_approval),
        )
        .route("/profiles/{slug}/stats/daily", get(daily_views))
        .route("/profiles/{slug}/stats/devices", get(device_breakdown))
        .route("/profiles/{slug}/stats/referrers", get(top_referrers))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
