use anyhow::Result;
use async_trait::async_trait;
use thiserror::Error;

use crate::analytics::{DayCount, DimensionCount, NewViewEvent, ViewEvent};
use crate::models::{
    Lead, NewLead, NewProfile, NewSection, NewTestimonial, Profile, ProfilePatch, ProfileSection,
    Testimonial,
};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("slug already exists")]
    Conflict,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

#[async_trait]
pub trait Storage: Send + Sync {
    /// Initialize the storage (create tables and indexes).
    async fn init(&self) -> Result<()>;

    /// Insert a profile. The slug's unique constraint is the uniqueness
    /// check: a colliding slug comes back as [`StorageError::Conflict`].
    async fn create_profile(&self, new_profile: &NewProfile) -> StorageResult<Profile>;

    /// Fetch a profile by slug.
    async fn get_profile(&self, slug: &str) -> Result<Option<Profile>>;

    /// List profiles, newest first.
    async fn list_profiles(&self, limit: i64, offset: i64) -> Result<Vec<Profile>>;

    /// Apply a partial update. A slug override that collides with another
    /// profile surfaces as [`StorageError::Conflict`]. Returns `None` when
    /// no profile matches `slug`.
    async fn update_profile(&self, slug: &str, patch: &ProfilePatch)
        -> StorageResult<Option<Profile>>;

    /// Delete a profile and everything scoped to it: sections, leads,
    /// testimonials, view events.
    async fn delete_profile(&self, slug: &str) -> Result<bool>;

    /// Replace the full section list of a profile.
    async fn replace_sections(
        &self,
        profile_id: i64,
        sections: &[NewSection],
    ) -> Result<Vec<ProfileSection>>;

    /// Sections ordered by position.
    async fn list_sections(&self, profile_id: i64) -> Result<Vec<ProfileSection>>;

    /// Append one view event.
    async fn insert_view_event(&self, event: &NewViewEvent) -> Result<()>;

    /// Increment the profile view counter.
    async fn increment_views(&self, profile_id: i64) -> Result<()>;

    /// Most recent view events, newest first.
    async fn recent_view_events(&self, profile_id: i64, limit: i64) -> Result<Vec<ViewEvent>>;

    /// Views grouped by UTC day bucket since `start_ts`. Sparse: days
    /// without events produce no row; callers zero-fill.
    async fn views_per_day(&self, profile_id: i64, start_ts: i64) -> Result<Vec<DayCount>>;

    /// View counts grouped by device class, descending.
    async fn device_breakdown(&self, profile_id: i64) -> Result<Vec<DimensionCount>>;

    /// View counts grouped by referrer category, descending, limited.
    async fn top_referrers(&self, profile_id: i64, limit: i64) -> Result<Vec<DimensionCount>>;

    async fn insert_lead(&self, profile_id: i64, lead: &NewLead) -> Result<Lead>;

    async fn list_leads(&self, profile_id: i64) -> Result<Vec<Lead>>;

    async fn insert_testimonial(
        &self,
        profile_id: i64,
        testimonial: &NewTestimonial,
    ) -> Result<Testimonial>;

    /// Testimonials, newest first. Unapproved rows are included only when
    /// `include_unapproved` is set (owner views).
    async fn list_testimonials(
        &self,
        profile_id: i64,
        include_unapproved: bool,
    ) -> Result<Vec<Testimonial>>;

    /// Toggle a testimonial's approval flag. Returns false when the id is
    /// unknown.
    async fn set_testimonial_approval(&self, testimonial_id: i64, approved: bool) -> Result<bool>;
}
