//! Slug assignment for public profile URLs.
//!
//! A slug is derived from the display name plus the local part of the email,
//! normalized to lowercase hyphenated ASCII, with a short random suffix.
//! Uniqueness is enforced by the storage layer's unique constraint; a
//! constraint violation triggers a retry with a fresh suffix, bounded by
//! [`MAX_ATTEMPTS`].

use thiserror::Error;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::models::{CreateProfileRequest, NewProfile, Profile};
use crate::storage::{Storage, StorageError};

/// Upper bound on suffix regeneration before giving up.
pub const MAX_ATTEMPTS: usize = 20;

const SUFFIX_LEN: usize = 3;
const SUFFIX_CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

#[derive(Debug, Error)]
pub enum SlugError {
    #[error("slug space exhausted after {attempts} attempts for base '{base}'")]
    SpaceExhausted { base: String, attempts: usize },
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

/// Normalize free-form text into a lowercase hyphenated slug fragment.
///
/// Diacritics are stripped via NFD decomposition, anything outside
/// `[a-z0-9]` becomes a hyphen, and hyphen runs collapse to one.
pub fn slugify(raw: &str) -> String {
    let stripped: String = raw.nfd().filter(|c| !is_combining_mark(*c)).collect();

    let mut slug = String::with_capacity(stripped.len());
    let mut pending_hyphen = false;
    for ch in stripped.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            slug.push(ch.to_ascii_lowercase());
            pending_hyphen = false;
        } else {
            pending_hyphen = true;
        }
    }

    slug
}

/// Base slug for a profile: display name followed by the email local part.
pub fn base_slug(display_name: &str, email: &str) -> String {
    let local_part = email.split('@').next().unwrap_or("");
    let base = slugify(&format!("{display_name} {local_part}"));
    if base.is_empty() {
        "profile".to_string()
    } else {
        base
    }
}

/// Random lowercase alphanumeric suffix of fixed length.
pub fn random_suffix() -> String {
    use rand::Rng;
    let mut rng = rand::rng();
    (0..SUFFIX_LEN)
        .map(|_| SUFFIX_CHARSET[rng.random_range(0..SUFFIX_CHARSET.len())] as char)
        .collect()
}

/// One slug candidate: base plus a fresh random suffix.
pub fn candidate(display_name: &str, email: &str) -> String {
    format!("{}-{}", base_slug(display_name, email), random_suffix())
}

/// Create a profile with a generated unique slug.
///
/// The insert itself is the uniqueness check: the slug column carries a
/// unique constraint and a conflicting insert comes back as
/// [`StorageError::Conflict`], which triggers a retry with a new suffix.
/// There is no pre-check query, so two racing creations can never both
/// commit the same slug.
pub async fn create_with_generated_slug(
    storage: &dyn Storage,
    request: CreateProfileRequest,
) -> Result<Profile, SlugError> {
    let base = base_slug(&request.display_name, &request.email);
    let social_links = request.social_links.as_ref().map(|v| v.to_string());

    for _ in 0..MAX_ATTEMPTS {
        let slug = format!("{}-{}", base, random_suffix());
        let new_profile = NewProfile {
            owner_id: request.owner_id.clone(),
            slug,
            display_name: request.display_name.clone(),
            headline: request.headline.clone(),
            bio: request.bio.clone(),
            email: request.email.clone(),
            phone: request.phone.clone(),
            website: request.website.clone(),
            social_links: social_links.clone(),
            is_public: request.is_public.unwrap_or(true),
        };

        match storage.create_profile(&new_profile).await {
            Ok(profile) => return Ok(profile),
            Err(StorageError::Conflict) => continue,
            Err(StorageError::Other(e)) => return Err(SlugError::Storage(e)),
        }
    }

    Err(SlugError::SpaceExhausted {
        base,
        attempts: MAX_ATTEMPTS,
    })
}
