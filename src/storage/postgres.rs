use anyhow::Result;
use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::sync::Arc;

use crate::analytics::{DayCount, DimensionCount, NewViewEvent, ViewEvent};
use crate::models::{
    Lead, NewLead, NewProfile, NewSection, NewTestimonial, Profile, ProfilePatch, ProfileSection,
    Testimonial,
};
use crate::storage::{Storage, StorageError, StorageResult};

const PROFILE_COLS: &str = "id, owner_id, slug, display_name, headline, bio, email, phone, \
     website, social_links, is_public, views, created_at, updated_at";

pub struct PostgresStorage {
    pool: Arc<PgPool>,
}

impl PostgresStorage {
    pub async fn new(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;
        Ok(Self {
            pool: Arc::new(pool),
        })
    }
}

#[async_trait]
impl Storage for PostgresStorage {
    async fn init(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS profiles (
                id BIGSERIAL PRIMARY KEY,
                owner_id TEXT NOT NULL,
                slug TEXT NOT NULL UNIQUE,
                display_name TEXT NOT NULL,
                headline TEXT,
                bio TEXT,
                email TEXT NOT NULL,
                phone TEXT,
                website TEXT,
                social_links TEXT,
                is_public BOOLEAN NOT NULL DEFAULT TRUE,
                views BIGINT NOT NULL DEFAULT 0,
                created_at BIGINT NOT NULL,
                updated_at BIGINT NOT NULL
            )
            "#,
        )
        .execute(self.pool.as_ref())
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_profiles_owner ON profiles(owner_id)")
            .execute(self.pool.as_ref())
            .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS profile_sections (
                id BIGSERIAL PRIMARY KEY,
                profile_id BIGINT NOT NULL REFERENCES profiles(id),
                kind TEXT NOT NULL,
                title TEXT NOT NULL,
                organization TEXT,
                description TEXT,
                started_at TEXT,
                ended_at TEXT,
                position BIGINT NOT NULL DEFAULT 0
            )
            "#,
        )
        .execute(self.pool.as_ref())
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_sections_profile ON profile_sections(profile_id)",
        )
        .execute(self.pool.as_ref())
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS view_events (
                id BIGSERIAL PRIMARY KEY,
                profile_id BIGINT NOT NULL REFERENCES profiles(id),
                device_class TEXT NOT NULL,
                referrer_category TEXT NOT NULL,
                qr_scan BOOLEAN NOT NULL DEFAULT FALSE,
                created_at BIGINT NOT NULL
            )
            "#,
        )
        .execute(self.pool.as_ref())
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_events_profile_time ON view_events(profile_id, created_at)",
        )
        .execute(self.pool.as_ref())
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS leads (
                id BIGSERIAL PRIMARY KEY,
                profile_id BIGINT NOT NULL REFERENCES profiles(id),
                name TEXT NOT NULL,
                email TEXT NOT NULL,
                message TEXT,
                created_at BIGINT NOT NULL
            )
            "#,
        )
        .execute(self.pool.as_ref())
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS testimonials (
                id BIGSERIAL PRIMARY KEY,
                profile_id BIGINT NOT NULL REFERENCES profiles(id),
                author_name TEXT NOT NULL,
                quote TEXT NOT NULL,
                approved BOOLEAN NOT NULL DEFAULT FALSE,
                created_at BIGINT NOT NULL
            )
            "#,
        )
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }

    async fn create_profile(&self, new_profile: &NewProfile) -> StorageResult<Profile> {
        let now = chrono::Utc::now().timestamp();

        let profile = sqlx::query_as::<_, Profile>(&format!(
            r#"
            INSERT INTO profiles
                (owner_id, slug, display_name, headline, bio, email, phone, website,
                 social_links, is_public, views, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, 0, $11, $12)
            ON CONFLICT (slug) DO NOTHING
            RETURNING {PROFILE_COLS}
            "#
        ))
        .bind(&new_profile.owner_id)
        .bind(&new_profile.slug)
        .bind(&new_profile.display_name)
        .bind(&new_profile.headline)
        .bind(&new_profile.bio)
        .bind(&new_profile.email)
        .bind(&new_profile.phone)
        .bind(&new_profile.website)
        .bind(&new_profile.social_links)
        .bind(new_profile.is_public)
        .bind(now)
        .bind(now)
        .fetch_optional(self.pool.as_ref())
        .await
        .map_err(|e| StorageError::Other(e.into()))?;

        profile.ok_or(StorageError::Conflict)
    }

    async fn get_profile(&self, slug: &str) -> Result<Option<Profile>> {
        let profile = sqlx::query_as::<_, Profile>(&format!(
            "SELECT {PROFILE_COLS} FROM profiles WHERE slug = $1"
        ))
        .bind(slug)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(profile)
    }

    async fn list_profiles(&self, limit: i64, offset: i64) -> Result<Vec<Profile>> {
        let profiles = sqlx::query_as::<_, Profile>(&format!(
            "SELECT {PROFILE_COLS} FROM profiles ORDER BY created_at DESC LIMIT $1 OFFSET $2"
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(profiles)
    }

    async fn update_profile(
        &self,
        slug: &str,
        patch: &ProfilePatch,
    ) -> StorageResult<Option<Profile>> {
        let now = chrono::Utc::now().timestamp();

        let profile = sqlx::query_as::<_, Profile>(&format!(
            r#"
            UPDATE profiles SET
                display_name = COALESCE($1, display_name),
                headline = COALESCE($2, headline),
                bio = COALESCE($3, bio),
                email = COALESCE($4, email),
                phone = COALESCE($5, phone),
                website = COALESCE($6, website),
                social_links = COALESCE($7, social_links),
                is_public = COALESCE($8, is_public),
                slug = COALESCE($9, slug),
                updated_at = $10
            WHERE slug = $11
            RETURNING {PROFILE_COLS}
            "#
        ))
        .bind(&patch.display_name)
        .bind(&patch.headline)
        .bind(&patch.bio)
        .bind(&patch.email)
        .bind(&patch.phone)
        .bind(&patch.website)
        .bind(&patch.social_links)
        .bind(patch.is_public)
        .bind(&patch.slug)
        .bind(now)
        .bind(slug)
        .fetch_optional(self.pool.as_ref())
        .await
        .map_err(|e| {
            if e.as_database_error()
                .map(|d| d.is_unique_violation())
                .unwrap_or(false)
            {
                StorageError::Conflict
            } else {
                StorageError::Other(e.into())
            }
        })?;

        Ok(profile)
    }

    async fn delete_profile(&self, slug: &str) -> Result<bool> {
        let mut tx = self.pool.begin().await?;

        let profile_id: Option<i64> =
            sqlx::query_scalar("SELECT id FROM profiles WHERE slug = $1")
                .bind(slug)
                .fetch_optional(&mut *tx)
                .await?;

        let Some(profile_id) = profile_id else {
            return Ok(false);
        };

        for table in ["view_events", "leads", "testimonials", "profile_sections"] {
            sqlx::query(&format!("DELETE FROM {table} WHERE profile_id = $1"))
                .bind(profile_id)
                .execute(&mut *tx)
                .await?;
        }

        sqlx::query("DELETE FROM profiles WHERE id = $1")
            .bind(profile_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(true)
    }

    async fn replace_sections(
        &self,
        profile_id: i64,
        sections: &[NewSection],
    ) -> Result<Vec<ProfileSection>> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM profile_sections WHERE profile_id = $1")
            .bind(profile_id)
            .execute(&mut *tx)
            .await?;

        let mut inserted = Vec::with_capacity(sections.len());
        for section in sections {
            let row = sqlx::query_as::<_, ProfileSection>(
                r#"
                INSERT INTO profile_sections
                    (profile_id, kind, title, organization, description, started_at, ended_at, position)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                RETURNING id, profile_id, kind, title, organization, description, started_at, ended_at, position
                "#,
            )
            .bind(profile_id)
            .bind(section.kind.as_str())
            .bind(&section.title)
            .bind(&section.organization)
            .bind(&section.description)
            .bind(&section.started_at)
            .bind(&section.ended_at)
            .bind(section.position)
            .fetch_one(&mut *tx)
            .await?;
            inserted.push(row);
        }

        tx.commit().await?;
        Ok(inserted)
    }

    async fn list_sections(&self, profile_id: i64) -> Result<Vec<ProfileSection>> {
        let sections = sqlx::query_as::<_, ProfileSection>(
            r#"
            SELECT id, profile_id, kind, title, organization, description, started_at, ended_at, position
            FROM profile_sections
            WHERE profile_id = $1
            ORDER BY position, id
            "#,
        )
        .bind(profile_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(sections)
    }

    async fn insert_view_event(&self, event: &NewViewEvent) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO view_events (profile_id, device_class, referrer_category, qr_scan, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(event.profile_id)
        .bind(event.device_class.as_str())
        .bind(&event.referrer_category)
        .bind(event.qr_scan)
        .bind(event.created_at)
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }

    async fn increment_views(&self, profile_id: i64) -> Result<()> {
        sqlx::query("UPDATE profiles SET views = views + 1 WHERE id = $1")
            .bind(profile_id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(())
    }

    async fn recent_view_events(&self, profile_id: i64, limit: i64) -> Result<Vec<ViewEvent>> {
        let events = sqlx::query_as::<_, ViewEvent>(
            r#"
            SELECT id, profile_id, device_class, referrer_category, qr_scan, created_at
            FROM view_events
            WHERE profile_id = $1
            ORDER BY created_at DESC, id DESC
            LIMIT $2
            "#,
        )
        .bind(profile_id)
        .bind(limit)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(events)
    }

    async fn views_per_day(&self, profile_id: i64, start_ts: i64) -> Result<Vec<DayCount>> {
        let rows = sqlx::query_as::<_, DayCount>(
            r#"
            SELECT created_at / 86400 AS day_bucket, COUNT(*) AS views
            FROM view_events
            WHERE profile_id = $1 AND created_at >= $2
            GROUP BY day_bucket
            ORDER BY day_bucket
            "#,
        )
        .bind(profile_id)
        .bind(start_ts)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows)
    }

    async fn device_breakdown(&self, profile_id: i64) -> Result<Vec<DimensionCount>> {
        let rows = sqlx::query_as::<_, DimensionCount>(
            r#"
            SELECT device_class AS dimension, COUNT(*) AS views
            FROM view_events
            WHERE profile_id = $1
            GROUP BY device_class
            ORDER BY views DESC
            "#,
        )
        .bind(profile_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows)
    }

    async fn top_referrers(&self, profile_id: i64, limit: i64) -> Result<Vec<DimensionCount>> {
        let rows = sqlx::query_as::<_, DimensionCount>(
            r#"
            SELECT referrer_category AS dimension, COUNT(*) AS views
            FROM view_events
            WHERE profile_id = $1
            GROUP BY referrer_category
            ORDER BY views DESC
            LIMIT $2
            "#,
        )
        .bind(profile_id)
        .bind(limit)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows)
    }

    async fn insert_lead(&self, profile_id: i64, lead: &NewLead) -> Result<Lead> {
        let now = chrono::Utc::now().timestamp();

        let row = sqlx::query_as::<_, Lead>(
            r#"
            INSERT INTO leads (profile_id, name, email, message, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, profile_id, name, email, message, created_at
            "#,
        )
        .bind(profile_id)
        .bind(&lead.name)
        .bind(&lead.email)
        .bind(&lead.message)
        .bind(now)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(row)
    }

    async fn list_leads(&self, profile_id: i64) -> Result<Vec<Lead>> {
        let leads = sqlx::query_as::<_, Lead>(
            r#"
            SELECT id, profile_id, name, email, message, created_at
            FROM leads
            WHERE profile_id = $1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(profile_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(leads)
    }

    async fn insert_testimonial(
        &self,
        profile_id: i64,
        testimonial: &NewTestimonial,
    ) -> Result<Testimonial> {
        let now = chrono::Utc::now().timestamp();

        let row = sqlx::query_as::<_, Testimonial>(
            r#"
            INSERT INTO testimonials (profile_id, author_name, quote, approved, created_at)
            VALUES ($1, $2, $3, FALSE, $4)
            RETURNING id, profile_id, author_name, quote, approved, created_at
            "#,
        )
        .bind(profile_id)
        .bind(&testimonial.author_name)
        .bind(&testimonial.quote)
        .bind(now)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(row)
    }

    async fn list_testimonials(
        &self,
        profile_id: i64,
        include_unapproved: bool,
    ) -> Result<Vec<Testimonial>> {
        let testimonials = if include_unapproved {
            sqlx::query_as::<_, Testimonial>(
                r#"
                SELECT id, profile_id, author_name, quote, approved, created_at
                FROM testimonials
                WHERE profile_id = $1
                ORDER BY created_at DESC, id DESC
                "#,
            )
            .bind(profile_id)
            .fetch_all(self.pool.as_ref())
            .await?
        } else {
            sqlx::query_as::<_, Testimonial>(
                r#"
                SELECT id, profile_id, author_name, quote, approved, created_at
                FROM testimonials
                WHERE profile_id = $1 AND approved = TRUE
                ORDER BY created_at DESC, id DESC
                "#,
            )
            .bind(profile_id)
            .fetch_all(self.pool.as_ref())
            .await?
        };

        Ok(testimonials)
    }

    async fn set_testimonial_approval(&self, testimonial_id: i64, approved: bool) -> Result<bool> {
        let result = sqlx::query("UPDATE testimonials SET approved = $1 WHERE id = $2")
            .bind(approved)
            .bind(testimonial_id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
