use url::Url;

/// Category returned for QR-code scans.
pub const CATEGORY_QR: &str = "qr";
/// Category returned when no referrer is available.
pub const CATEGORY_DIRECT: &str = "direct";

// Ordered: first containment match wins. "t.co" must come after "twitter"
// only by convention; the two never overlap in a single host.
const HOST_KEYWORDS: &[(&str, &str)] = &[
    ("linkedin", "linkedin"),
    ("whatsapp", "whatsapp"),
    ("twitter", "twitter"),
    ("t.co", "twitter"),
    ("instagram", "instagram"),
    ("facebook", "facebook"),
    ("youtube", "youtube"),
];

/// Map a QR-origin flag and an optional raw referrer URL into a category.
///
/// Pure function. Malformed referrers degrade to `direct` rather than
/// erroring; unknown hosts are returned lowercased as-is.
pub fn classify_referrer(qr_origin: bool, referrer: Option<&str>) -> String {
    if qr_origin {
        return CATEGORY_QR.to_string();
    }

    let raw = match referrer {
        Some(r) if !r.trim().is_empty() => r,
        _ => return CATEGORY_DIRECT.to_string(),
    };

    let host = Url::parse(raw)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.to_lowercase()));

    match host {
        Some(host) => {
            for (needle, category) in HOST_KEYWORDS {
                if host.contains(needle) {
                    return (*category).to_string();
                }
            }
            host
        }
        None => CATEGORY_DIRECT.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qr_flag_wins_over_any_referrer() {
        assert_eq!(classify_referrer(true, None), "qr");
        assert_eq!(
            classify_referrer(true, Some("https://www.linkedin.com/in/someone")),
            "qr"
        );
    }

    #[test]
    fn missing_referrer_is_direct() {
        assert_eq!(classify_referrer(false, None), "direct");
        assert_eq!(classify_referrer(false, Some("")), "direct");
    }

    #[test]
    fn known_hosts_map_to_keywords() {
        assert_eq!(
            classify_referrer(false, Some("https://www.linkedin.com/feed/")),
            "linkedin"
        );
        assert_eq!(
            classify_referrer(false, Some("https://l.instagram.com/")),
            "instagram"
        );
        assert_eq!(
            classify_referrer(false, Some("https://m.facebook.com/profile")),
            "facebook"
        );
        assert_eq!(
            classify_referrer(false, Some("https://youtube.com/watch?v=x")),
            "youtube"
        );
    }

    #[test]
    fn shortened_twitter_host_maps_to_twitter() {
        assert_eq!(classify_referrer(false, Some("https://t.co/abc123")), "twitter");
        assert_eq!(
            classify_referrer(false, Some("https://twitter.com/someone")),
            "twitter"
        );
    }

    #[test]
    fn unknown_host_is_returned_lowercased() {
        assert_eq!(
            classify_referrer(false, Some("https://Example.ORG/some/page")),
            "example.org"
        );
    }

    #[test]
    fn malformed_referrer_degrades_to_direct() {
        assert_eq!(classify_referrer(false, Some("not a url")), "direct");
        assert_eq!(classify_referrer(false, Some("::::")), "direct");
    }
}
