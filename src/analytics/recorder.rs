//! View recording: classify the request context, append an event row,
//! bump the profile counter.

use anyhow::Result;

use super::device::classify_device;
use super::models::NewViewEvent;
use super::referrer::classify_referrer;
use crate::models::Profile;
use crate::storage::Storage;

/// The slice of an incoming request the recorder cares about.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestContext<'a> {
    pub user_agent: Option<&'a str>,
    pub referrer: Option<&'a str>,
    /// Set when the view arrived through the profile's QR code
    /// (`?ref=qr` on the public URL).
    pub qr_origin: bool,
}

/// Record one public view of `profile`.
///
/// Classification is infallible; only storage errors propagate. Callers on
/// the public view path treat a failure as non-fatal and still serve the
/// profile.
pub async fn record_view(
    storage: &dyn Storage,
    profile: &Profile,
    ctx: RequestContext<'_>,
) -> Result<()> {
    let device_class = classify_device(ctx.user_agent.unwrap_or(""));
    let referrer_category = classify_referrer(ctx.qr_origin, ctx.referrer);

    let event = NewViewEvent {
        profile_id: profile.id,
        device_class,
        referrer_category,
        qr_scan: ctx.qr_origin,
        created_at: chrono::Utc::now().timestamp(),
    };

    storage.insert_view_event(&event).await?;
    storage.increment_views(profile.id).await?;

    Ok(())
}
