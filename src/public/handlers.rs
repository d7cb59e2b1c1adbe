use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::vcard::render_vcard;
use crate::analytics::{record_view, RequestContext};
use crate::models::{Lead, NewLead, NewTestimonial, ProfileSection, Testimonial};
use crate::storage::Storage;

pub struct PublicState {
    pub storage: Arc<dyn Storage>,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Query parameters on the public profile URL. `ref=qr` marks a QR scan.
#[derive(Debug, Default, Deserialize)]
pub struct ViewQuery {
    #[serde(rename = "ref")]
    pub origin: Option<String>,
}

/// Public shape of a profile: owner identity stays internal.
#[derive(Debug, Serialize)]
pub struct PublicProfileResponse {
    pub slug: String,
    pub display_name: String,
    pub headline: Option<String>,
    pub bio: Option<String>,
    pub email: String,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub social_links: Option<serde_json::Value>,
    pub sections: Vec<ProfileSection>,
    pub testimonials: Vec<Testimonial>,
}

fn not_found() -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: "Profile not found".to_string(),
        }),
    )
}

fn request_context<'a>(headers: &'a HeaderMap, query: &'a ViewQuery) -> RequestContext<'a> {
    RequestContext {
        user_agent: headers
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok()),
        referrer: headers.get(header::REFERER).and_then(|v| v.to_str().ok()),
        qr_origin: query.origin.as_deref() == Some("qr"),
    }
}

/// Public profile view. Records one view event and bumps the counter;
/// recording failures are logged and never fail the response.
pub async fn view_profile(
    State(state): State<Arc<PublicState>>,
    Path(slug): Path<String>,
    Query(query): Query<ViewQuery>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let profile = match state.storage.get_profile(&slug).await {
        Ok(Some(profile)) if profile.is_public => profile,
        Ok(_) => return not_found().into_response(),
        Err(e) => {
            tracing::error!(slug = %slug, error = %e, "profile lookup failed");
            return (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response();
        }
    };

    let ctx = request_context(&headers, &query);
    if let Err(e) = record_view(state.storage.as_ref(), &profile, ctx).await {
        tracing::warn!(slug = %slug, error = %e, "failed to record view");
    }

    let sections = state
        .storage
        .list_sections(profile.id)
        .await
        .unwrap_or_else(|e| {
            tracing::warn!(slug = %slug, error = %e, "failed to load sections");
            Vec::new()
        });
    let testimonials = state
        .storage
        .list_testimonials(profile.id, false)
        .await
        .unwrap_or_else(|e| {
            tracing::warn!(slug = %slug, error = %e, "failed to load testimonials");
            Vec::new()
        });

    let social_links = profile
        .social_links
        .as_deref()
        .and_then(|raw| serde_json::from_str(raw).ok());

    Json(PublicProfileResponse {
        slug: profile.slug,
        display_name: profile.display_name,
        headline: profile.headline,
        bio: profile.bio,
        email: profile.email,
        phone: profile.phone,
        website: profile.website,
        social_links,
        sections,
        testimonials,
    })
    .into_response()
}

/// vCard download for a public profile. Does not count as a view.
pub async fn download_vcard(
    State(state): State<Arc<PublicState>>,
    Path(slug): Path<String>,
) -> impl IntoResponse {
    match state.storage.get_profile(&slug).await {
        Ok(Some(profile)) if profile.is_public => {
            let body = render_vcard(&profile);
            (
                [
                    (header::CONTENT_TYPE, "text/vcard; charset=utf-8".to_string()),
                    (
                        header::CONTENT_DISPOSITION,
                        format!("attachment; filename=\"{}.vcf\"", profile.slug),
                    ),
                ],
                body,
            )
                .into_response()
        }
        Ok(_) => not_found().into_response(),
        Err(e) => {
            tracing::error!(slug = %slug, error = %e, "profile lookup failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
        }
    }
}

/// Visitor-submitted contact request.
pub async fn submit_lead(
    State(state): State<Arc<PublicState>>,
    Path(slug): Path<String>,
    Json(payload): Json<NewLead>,
) -> Result<(StatusCode, Json<Lead>), (StatusCode, Json<ErrorResponse>)> {
    if payload.name.trim().is_empty() || payload.email.trim().is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "name and email are required".to_string(),
            }),
        ));
    }

    let profile = match state.storage.get_profile(&slug).await {
        Ok(Some(profile)) if profile.is_public => profile,
        Ok(_) => return Err(not_found()),
        Err(e) => {
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            ))
        }
    };

    match state.storage.insert_lead(profile.id, &payload).await {
        Ok(lead) => Ok((StatusCode::CREATED, Json(lead))),
        Err(e) => {
            tracing::error!(slug = %slug, error = %e, "failed to store lead");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "failed to submit lead".to_string(),
                }),
            ))
        }
    }
}

/// Visitor-submitted testimonial; starts unapproved.
pub async fn submit_testimonial(
    State(state): State<Arc<PublicState>>,
    Path(slug): Path<String>,
    Json(payload): Json<NewTestimonial>,
) -> Result<(StatusCode, Json<Testimonial>), (StatusCode, Json<ErrorResponse>)> {
    if payload.author_name.trim().is_empty() || payload.quote.trim().is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "author_name and quote are required".to_string(),
            }),
        ));
    }

    let profile = match state.storage.get_profile(&slug).await {
        Ok(Some(profile)) if profile.is_public => profile,
        Ok(_) => return Err(not_found()),
        Err(e) => {
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            ))
        }
    };

    match state.storage.insert_testimonial(profile.id, &payload).await {
        Ok(testimonial) => Ok((StatusCode::CREATED, Json(testimonial))),
        Err(e) => {
            tracing::error!(slug = %slug, error = %e, "failed to store testimonial");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "failed to submit testimonial".to_string(),
                }),
            ))
        }
    }
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    #[derive(Serialize)]
    struct HealthResponse {
        status: String,
    }

    Json(HealthResponse {
        status: "OK".to_string(),
    })
}
