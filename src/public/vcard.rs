//! vCard 3.0 assembly from profile contact fields.
//!
//! Plain text construction; no rendering library involved.

use crate::models::Profile;

/// Escape a text value per RFC 2426: backslash, comma, semicolon, newline.
fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            ',' => out.push_str("\\,"),
            ';' => out.push_str("\\;"),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            _ => out.push(ch),
        }
    }
    out
}

/// Render a downloadable vCard for a profile.
pub fn render_vcard(profile: &Profile) -> String {
    let mut lines = vec![
        "BEGIN:VCARD".to_string(),
        "VERSION:3.0".to_string(),
        format!("FN:{}", escape(&profile.display_name)),
        format!("N:{};;;;", escape(&profile.display_name)),
        format!("EMAIL;TYPE=INTERNET:{}", escape(&profile.email)),
    ];

    if let Some(phone) = &profile.phone {
        lines.push(format!("TEL;TYPE=CELL:{}", escape(phone)));
    }
    if let Some(website) = &profile.website {
        lines.push(format!("URL:{}", escape(website)));
    }
    if let Some(headline) = &profile.headline {
        lines.push(format!("TITLE:{}", escape(headline)));
    }
    if let Some(bio) = &profile.bio {
        lines.push(format!("NOTE:{}", escape(bio)));
    }

    lines.push("END:VCARD".to_string());
    lines.join("\r\n") + "\r\n"
}
