use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::storage::Storage;

use super::handlers::{
    download_vcard, health_check, submit_lead, submit_testimonial, view_profile, PublicState,
};

pub fn create_public_router(storage: Arc<dyn Storage>) -> Router {
    let state = Arc::new(PublicState { storage });

    Router::new()
        .route("/", get(health_check))
        .route("/{slug}", get(view_profile))
        .route("/{slug}/vcard", get(download_vcard))
        .route("/{slug}/leads", post(submit_lead))
        .route("/{slug}/testimonials", post(submit_testimonial))
        .with_state(state)
}
