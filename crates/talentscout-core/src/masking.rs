//! Display masking for contact details.
//!
//! Masking is a display convenience, not encryption. Both functions expect
//! input that already passed the matching validator; anything else is a
//! caller bug that trips a `debug_assert!` and is clamped in release builds.

/// Redact the local part of an email address, keeping its first two
/// characters and the whole domain.
///
/// Local parts shorter than three characters collapse to a single `*`.
///
/// ```
/// use talentscout_core::mask_email;
/// assert_eq!(mask_email("johndoe@x.com"), "jo*****@x.com");
/// ```
pub fn mask_email(email: &str) -> String {
    debug_assert!(email.contains('@'), "mask_email called without '@'");

    let (local, domain) = email.split_once('@').unwrap_or((email, ""));
    let local_len = local.chars().count();

    let masked_local = if local_len < 3 {
        "*".to_string()
    } else {
        let visible: String = local.chars().take(2).collect();
        format!("{}{}", visible, "*".repeat(local_len - 2))
    };

    format!("{}@{}", masked_local, domain)
}

/// Redact all but the last four characters of a phone number.
///
/// ```
/// use talentscout_core::mask_phone;
/// assert_eq!(mask_phone("+919876543210"), "*********3210");
/// ```
pub fn mask_phone(phone: &str) -> String {
    let len = phone.chars().count();
    debug_assert!(len >= 4, "mask_phone called with fewer than 4 characters");

    let hidden = len.saturating_sub(4);
    let tail: String = phone.chars().skip(hidden).collect();
    format!("{}{}", "*".repeat(hidden), tail)
}
