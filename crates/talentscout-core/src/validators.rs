//! Syntactic validators for candidate contact details.
//!
//! These checks are permissive: they reject obvious typos, not
//! undeliverable addresses. Neither function can fail; a non-match is a normal
//! `false` result that the stage machine answers with a re-prompt.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// `local@domain.tld` with exactly one `@`, anchored at both ends.
    pub static ref EMAIL_PATTERN: Regex = Regex::new(
        r"^[^@]+@[^@]+\.[^@]+$"
    ).unwrap();

    /// Optional `+` followed by 10 to 13 digits, nothing else.
    pub static ref PHONE_PATTERN: Regex = Regex::new(
        r"^\+?\d{10,13}$"
    ).unwrap();
}

/// Check whether `s` looks like an email address.
pub fn valid_email(s: &str) -> bool {
    EMAIL_PATTERN.is_match(s)
}

/// Check whether `s` looks like a phone number.
pub fn valid_phone(s: &str) -> bool {
    PHONE_PATTERN.is_match(s)
}
