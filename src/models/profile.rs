use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Profile {
    pub id: i64,
    pub owner_id: String,
    pub slug: String,
    pub display_name: String,
    pub headline: Option<String>,
    pub bio: Option<String>,
    pub email: String,
    pub phone: Option<String>,
    pub website: Option<String>,
    /// JSON object mapping a network name to a URL, stored as text.
    pub social_links: Option<String>,
    pub is_public: bool,
    pub views: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Deserialize)]
pub struct CreateProfileRequest {
    pub owner_id: String,
    pub display_name: String,
    pub email: String,
    pub headline: Option<String>,
    pub bio: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub social_links: Option<serde_json::Value>,
    pub is_public: Option<bool>,
}

/// Fully resolved row to insert, slug already assigned.
#[derive(Debug, Clone)]
pub struct NewProfile {
    pub owner_id: String,
    pub slug: String,
    pub display_name: String,
    pub headline: Option<String>,
    pub bio: Option<String>,
    pub email: String,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub social_links: Option<String>,
    pub is_public: bool,
}

/// Storage-level partial update, social links already serialized.
#[derive(Debug, Default, Clone)]
pub struct ProfilePatch {
    pub display_name: Option<String>,
    pub headline: Option<String>,
    pub bio: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub social_links: Option<String>,
    pub is_public: Option<bool>,
    pub slug: Option<String>,
}

impl From<UpdateProfileRequest> for ProfilePatch {
    fn from(req: UpdateProfileRequest) -> Self {
        ProfilePatch {
            display_name: req.display_name,
            headline: req.headline,
            bio: req.bio,
            email: req.email,
            phone: req.phone,
            website: req.website,
            social_links: req.social_links.map(|v| v.to_string()),
            is_public: req.is_public,
            slug: req.slug,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateProfileRequest {
    pub display_name: Option<String>,
    pub headline: Option<String>,
    pub bio: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub social_links: Option<serde_json::Value>,
    pub is_public: Option<bool>,
    /// Owner-supplied slug override. Uniqueness is still enforced by the
    /// storage layer; a taken slug surfaces as a conflict.
    pub slug: Option<String>,
}
