//! Storage-layer integration tests over an in-memory SQLite database.

use cardlink::models::{NewLead, NewProfile, NewSection, NewTestimonial, ProfilePatch, SectionKind};
use cardlink::storage::{SqliteStorage, Storage, StorageError};

async fn memory_storage() -> SqliteStorage {
    let storage = SqliteStorage::new_with_max_connections("sqlite::memory:", 1)
        .await
        .expect("failed to open in-memory sqlite");
    storage.init().await.expect("failed to init schema");
    storage
}

fn new_profile(slug: &str) -> NewProfile {
    NewProfile {
        owner_id: "owner-1".to_string(),
        slug: slug.to_string(),
        display_name: "Jo Smith".to_string(),
        headline: Some("Carpenter".to_string()),
        bio: None,
        email: "jo@x.com".to_string(),
        phone: None,
        website: None,
        social_links: None,
        is_public: true,
    }
}

#[tokio::test]
async fn create_and_get_profile() {
    let storage = memory_storage().await;

    let created = storage.create_profile(&new_profile("jo-smith-jo-abc")).await.unwrap();
    assert_eq!(created.slug, "jo-smith-jo-abc");
    assert_eq!(created.views, 0);
    assert!(created.is_public);

    let fetched = storage.get_profile("jo-smith-jo-abc").await.unwrap().unwrap();
    assert_eq!(fetched.id, created.id);
    assert_eq!(fetched.display_name, "Jo Smith");

    assert!(storage.get_profile("missing").await.unwrap().is_none());
}

#[tokio::test]
async fn duplicate_slug_is_a_conflict() {
    let storage = memory_storage().await;

    storage.create_profile(&new_profile("taken-slug-abc")).await.unwrap();
    let err = storage
        .create_profile(&new_profile("taken-slug-abc"))
        .await
        .unwrap_err();

    assert!(matches!(err, StorageError::Conflict));
}

#[tokio::test]
async fn update_applies_partial_patch() {
    let storage = memory_storage().await;
    storage.create_profile(&new_profile("patch-me-abc")).await.unwrap();

    let patch = ProfilePatch {
        headline: Some("Master Carpenter".to_string()),
        ..Default::default()
    };
    let updated = storage
        .update_profile("patch-me-abc", &patch)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(updated.headline.as_deref(), Some("Master Carpenter"));
    // Untouched fields survive.
    assert_eq!(updated.display_name, "Jo Smith");
    assert_eq!(updated.slug, "patch-me-abc");
}

#[tokio::test]
async fn slug_override_is_applied_and_checked() {
    let storage = memory_storage().await;
    storage.create_profile(&new_profile("original-abc")).await.unwrap();
    storage.create_profile(&new_profile("occupied-abc")).await.unwrap();

    // Override to a free slug works.
    let patch = ProfilePatch {
        slug: Some("custom-handle".to_string()),
        ..Default::default()
    };
    let updated = storage
        .update_profile("original-abc", &patch)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.slug, "custom-handle");
    assert!(storage.get_profile("original-abc").await.unwrap().is_none());

    // Override onto a taken slug is rejected.
    let patch = ProfilePatch {
        slug: Some("occupied-abc".to_string()),
        ..Default::default()
    };
    let err = storage
        .update_profile("custom-handle", &patch)
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::Conflict));
}

#[tokio::test]
async fn update_of_missing_profile_returns_none() {
    let storage = memory_storage().await;
    let patch = ProfilePatch::default();
    assert!(storage.update_profile("ghost", &patch).await.unwrap().is_none());
}

#[tokio::test]
async fn sections_replace_and_order() {
    let storage = memory_storage().await;
    let profile = storage.create_profile(&new_profile("sectioned-abc")).await.unwrap();

    let sections = vec![
        NewSection {
            kind: SectionKind::Education,
            title: "Trade school".to_string(),
            organization: Some("City College".to_string()),
            description: None,
            started_at: Some("2015".to_string()),
            ended_at: Some("2017".to_string()),
            position: 1,
        },
        NewSection {
            kind: SectionKind::Experience,
            title: "Senior Carpenter".to_string(),
            organization: Some("Oak & Co".to_string()),
            description: None,
            started_at: Some("2017".to_string()),
            ended_at: None,
            position: 0,
        },
    ];

    storage.replace_sections(profile.id, &sections).await.unwrap();
    let listed = storage.list_sections(profile.id).await.unwrap();
    assert_eq!(listed.len(), 2);
    // Ordered by position, not insert order.
    assert_eq!(listed[0].kind, "experience");
    assert_eq!(listed[1].kind, "education");

    // Replacement drops the previous list.
    let replacement = vec![NewSection {
        kind: SectionKind::Service,
        title: "Custom furniture".to_string(),
        organization: None,
        description: None,
        started_at: None,
        ended_at: None,
        position: 0,
    }];
    storage.replace_sections(profile.id, &replacement).await.unwrap();
    let listed = storage.list_sections(profile.id).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].title, "Custom furniture");
}

#[tokio::test]
async fn testimonials_start_unapproved_and_toggle() {
    let storage = memory_storage().await;
    let profile = storage.create_profile(&new_profile("endorsed-abc")).await.unwrap();

    let t = storage
        .insert_testimonial(
            profile.id,
            &NewTestimonial {
                author_name: "Sam".to_string(),
                quote: "Great work".to_string(),
            },
        )
        .await
        .unwrap();
    assert!(!t.approved);

    // Public listing hides unapproved rows.
    assert!(storage.list_testimonials(profile.id, false).await.unwrap().is_empty());
    assert_eq!(storage.list_testimonials(profile.id, true).await.unwrap().len(), 1);

    assert!(storage.set_testimonial_approval(t.id, true).await.unwrap());
    let visible = storage.list_testimonials(profile.id, false).await.unwrap();
    assert_eq!(visible.len(), 1);
    assert!(visible[0].approved);

    // Unknown id reports false.
    assert!(!storage.set_testimonial_approval(9999, true).await.unwrap());
}

#[tokio::test]
async fn leads_are_scoped_to_profile() {
    let storage = memory_storage().await;
    let a = storage.create_profile(&new_profile("lead-a-abc")).await.unwrap();
    let b = storage.create_profile(&new_profile("lead-b-abc")).await.unwrap();

    storage
        .insert_lead(
            a.id,
            &NewLead {
                name: "Visitor".to_string(),
                email: "v@example.org".to_string(),
                message: Some("Call me".to_string()),
            },
        )
        .await
        .unwrap();

    assert_eq!(storage.list_leads(a.id).await.unwrap().len(), 1);
    assert!(storage.list_leads(b.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn delete_cascades_to_owned_records() {
    let storage = memory_storage().await;
    let profile = storage.create_profile(&new_profile("doomed-abc")).await.unwrap();

    storage
        .insert_lead(
            profile.id,
            &NewLead {
                name: "Visitor".to_string(),
                email: "v@example.org".to_string(),
                message: None,
            },
        )
        .await
        .unwrap();
    storage
        .insert_testimonial(
            profile.id,
            &NewTestimonial {
                author_name: "Sam".to_string(),
                quote: "Great".to_string(),
            },
        )
        .await
        .unwrap();
    storage
        .replace_sections(
            profile.id,
            &[NewSection {
                kind: SectionKind::Project,
                title: "Deck build".to_string(),
                organization: None,
                description: None,
                started_at: None,
                ended_at: None,
                position: 0,
            }],
        )
        .await
        .unwrap();

    assert!(storage.delete_profile("doomed-abc").await.unwrap());

    assert!(storage.get_profile("doomed-abc").await.unwrap().is_none());
    assert!(storage.list_leads(profile.id).await.unwrap().is_empty());
    assert!(storage.list_testimonials(profile.id, true).await.unwrap().is_empty());
    assert!(storage.list_sections(profile.id).await.unwrap().is_empty());

    // Deleting again reports false.
    assert!(!storage.delete_profile("doomed-abc").await.unwrap());
}
