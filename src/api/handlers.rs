use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::models::{
    CreateProfileRequest, Lead, NewSection, Profile, ProfileSection, Testimonial,
    UpdateProfileRequest,
};
use crate::slug::{self, SlugError};
use crate::storage::{Storage, StorageError};

pub struct AppState {
    pub storage: Arc<dyn Storage>,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Serialize)]
pub struct SuccessResponse {
    pub message: String,
}

#[derive(Deserialize)]
pub struct ListQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    50
}

fn internal_error(e: impl std::fmt::Display) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: e.to_string(),
        }),
    )
}

fn not_found(what: &str) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: format!("{what} not found"),
        }),
    )
}

fn bad_request(msg: &str) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: msg.to_string(),
        }),
    )
}

/// Create a profile with a generated unique slug.
pub async fn create_profile(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateProfileRequest>,
) -> Result<(StatusCode, Json<Profile>), (StatusCode, Json<ErrorResponse>)> {
    if payload.display_name.trim().is_empty() {
        return Err(bad_request("display_name cannot be empty"));
    }
    if payload.email.trim().is_empty() || !payload.email.contains('@') {
        return Err(bad_request("a valid email is required"));
    }

    match slug::create_with_generated_slug(state.storage.as_ref(), payload).await {
        Ok(profile) => Ok((StatusCode::CREATED, Json(profile))),
        Err(e @ SlugError::SpaceExhausted { .. }) => {
            tracing::error!(error = %e, "slug assignment exhausted");
            Err(internal_error("failed to allocate a unique slug"))
        }
        Err(SlugError::Storage(e)) => {
            tracing::error!(error = %e, "failed to create profile");
            Err(internal_error("failed to create profile"))
        }
    }
}

pub async fn get_profile(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<Json<Profile>, (StatusCode, Json<ErrorResponse>)> {
    match state.storage.get_profile(&slug).await {
        Ok(Some(profile)) => Ok(Json(profile)),
        Ok(None) => Err(not_found("Profile")),
        Err(e) => Err(internal_error(e)),
    }
}

pub async fn list_profiles(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Profile>>, (StatusCode, Json<ErrorResponse>)> {
    let limit = query.limit.clamp(1, 500);
    match state.storage.list_profiles(limit, query.offset).await {
        Ok(profiles) => Ok(Json(profiles)),
        Err(e) => Err(internal_error(e)),
    }
}

/// Update a profile. A slug override is allowed but must not collide with
/// another profile's slug; a collision maps to 409.
pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<Profile>, (StatusCode, Json<ErrorResponse>)> {
    if let Some(override_slug) = payload.slug.as_deref() {
        if override_slug.trim().is_empty() {
            return Err(bad_request("slug override cannot be empty"));
        }
    }

    match state.storage.update_profile(&slug, &payload.into()).await {
        Ok(Some(profile)) => Ok(Json(profile)),
        Ok(None) => Err(not_found("Profile")),
        Err(StorageError::Conflict) => Err((
            StatusCode::CONFLICT,
            Json(ErrorResponse {
                error: "slug already in use".to_string(),
            }),
        )),
        Err(StorageError::Other(e)) => Err(internal_error(e)),
    }
}

pub async fn delete_profile(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<Json<SuccessResponse>, (StatusCode, Json<ErrorResponse>)> {
    match state.storage.delete_profile(&slug).await {
        Ok(true) => Ok(Json(SuccessResponse {
            message: "Profile deleted".to_string(),
        })),
        Ok(false) => Err(not_found("Profile")),
        Err(e) => Err(internal_error(e)),
    }
}

/// Replace the profile's full section list (experience, education, ...).
pub async fn replace_sections(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
    Json(payload): Json<Vec<NewSection>>,
) -> Result<Json<Vec<ProfileSection>>, (StatusCode, Json<ErrorResponse>)> {
    let profile = match state.storage.get_profile(&slug).await {
        Ok(Some(profile)) => profile,
        Ok(None) => return Err(not_found("Profile")),
        Err(e) => return Err(internal_error(e)),
    };

    match state.storage.replace_sections(profile.id, &payload).await {
        Ok(sections) => Ok(Json(sections)),
        Err(e) => Err(internal_error(e)),
    }
}

pub async fn list_sections(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<Json<Vec<ProfileSection>>, (StatusCode, Json<ErrorResponse>)> {
    let profile = match state.storage.get_profile(&slug).await {
        Ok(Some(profile)) => profile,
        Ok(None) => return Err(not_found("Profile")),
        Err(e) => return Err(internal_error(e)),
    };

    match state.storage.list_sections(profile.id).await {
        Ok(sections) => Ok(Json(sections)),
        Err(e) => Err(internal_error(e)),
    }
}

pub async fn list_leads(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<Json<Vec<Lead>>, (StatusCode, Json<ErrorResponse>)> {
    let profile = match state.storage.get_profile(&slug).await {
        Ok(Some(profile)) => profile,
        Ok(None) => return Err(not_found("Profile")),
        Err(e) => return Err(internal_error(e)),
    };

    match state.storage.list_leads(profile.id).await {
        Ok(leads) => Ok(Json(leads)),
        Err(e) => Err(internal_error(e)),
    }
}

#[derive(Deserialize)]
pub struct TestimonialListQuery {
    /// Include unapproved testimonials (owner view).
    #[serde(default)]
    pub all: bool,
}

pub async fn list_testimonials(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
    Query(query): Query<TestimonialListQuery>,
) -> Result<Json<Vec<Testimonial>>, (StatusCode, Json<ErrorResponse>)> {
    let profile = match state.storage.get_profile(&slug).await {
        Ok(Some(profile)) => profile,
        Ok(None) => return Err(not_found("Profile")),
        Err(e) => return Err(internal_error(e)),
    };

    match state.storage.list_testimonials(profile.id, query.all).await {
        Ok(testimonials) => Ok(Json(testimonials)),
        Err(e) => Err(internal_error(e)),
    }
}

#[derive(Deserialize)]
pub struct ApprovalRequest {
    pub approved: bool,
}

pub async fn set_testimonial_approval(
    State(state): State<Arc<AppState>>,
    Path(testimonial_id): Path<i64>,
    Json(payload): Json<ApprovalRequest>,
) -> Result<Json<SuccessResponse>, (StatusCode, Json<ErrorResponse>)> {
    match state
        .storage
        .set_testimonial_approval(testimonial_id, payload.approved)
        .await
    {
        Ok(true) => Ok(Json(SuccessResponse {
            message: if payload.approved {
                "Testimonial approved".to_string()
            } else {
                "Testimonial hidden".to_string()
            },
        })),
        Ok(false) => Err(not_found("Testimonial")),
        Err(e) => Err(internal_error(e)),
    }
}

/// Health check endpoint
pub async fn health_check() -> Json<SuccessResponse> {
    Json(SuccessResponse {
        message: "OK".to_string(),
    })
}
