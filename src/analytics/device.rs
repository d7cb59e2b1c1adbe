use super::models::DeviceClass;

// Tablet tokens are checked before mobile tokens: several tablet UAs also
// carry mobile-looking fragments.
const TABLET_TOKENS: &[&str] = &["ipad", "tablet", "kindle", "silk", "playbook"];

const MOBILE_TOKENS: &[&str] = &[
    "iphone",
    "ipod",
    "android",
    "blackberry",
    "windows phone",
    "opera mini",
    "mobile",
];

/// Classify a raw user-agent string into a coarse device category.
pub fn classify_device(user_agent: &str) -> DeviceClass {
    let ua = user_agent.to_lowercase();

    if TABLET_TOKENS.iter().any(|t| ua.contains(t)) {
        return DeviceClass::Tablet;
    }
    if MOBILE_TOKENS.iter().any(|t| ua.contains(t)) {
        return DeviceClass::Mobile;
    }
    DeviceClass::Desktop
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ipad_is_tablet_not_mobile() {
        let ua = "Mozilla/5.0 (iPad; CPU OS 16_0 like Mac OS X) Mobile/15E148";
        assert_eq!(classify_device(ua), DeviceClass::Tablet);
    }

    #[test]
    fn iphone_is_mobile() {
        let ua = "Mozilla/5.0 (iPhone; CPU iPhone OS 16_0 like Mac OS X)";
        assert_eq!(classify_device(ua), DeviceClass::Mobile);
    }

    #[test]
    fn plain_browser_is_desktop() {
        let ua = "Mozilla/5.0 (X11; Linux x86_64) Gecko/20100101 Firefox/126.0";
        assert_eq!(classify_device(ua), DeviceClass::Desktop);
    }

    #[test]
    fn android_tablet_token_wins_over_android() {
        let ua = "Mozilla/5.0 (Linux; Android 13; Tablet) AppleWebKit/537.36";
        assert_eq!(classify_device(ua), DeviceClass::Tablet);
    }

    #[test]
    fn empty_user_agent_is_desktop() {
        assert_eq!(classify_device(""), DeviceClass::Desktop);
    }
}
