//! Local checks run before an RSVP is sent.

use super::types::{Field, FieldErrors};
use crate::types::RsvpDraft;
use regex::Regex;
use std::sync::LazyLock;

/// Shown when the name is blank
pub const NAME_REQUIRED: &str = "Name is required";
/// Shown when the email is blank
pub const EMAIL_REQUIRED: &str = "Email is required";
/// Shown when the email is not `local@domain.tld`
pub const EMAIL_INVALID: &str = "Please enter a valid email";

#[allow(clippy::expect_used)] // Constant pattern
static EMAIL_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

/// Coarse syntactic email check: `local@domain.tld`, no whitespace.
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_SHAPE.is_match(email)
}

/// Field messages for `draft`; empty when it may be submitted.
///
/// Contact and status are never checked.
#[must_use]
pub fn validate(draft: &RsvpDraft) -> FieldErrors {
    let mut errors = FieldErrors::new();

    if draft.name.trim().is_empty() {
        errors.insert(Field::Name, NAME_REQUIRED.to_string());
    }

    if draft.email.trim().is_empty() {
        errors.insert(Field::Email, EMAIL_REQUIRED.to_string());
    } else if !is_valid_email(&draft.email) {
        errors.insert(Field::Email, EMAIL_INVALID.to_string());
    }

    errors
}
