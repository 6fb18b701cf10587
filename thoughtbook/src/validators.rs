use std::sync::LazyLock;

use email_address::EmailAddress;
use regex::Regex;

use crate::errors::ValidationIssue;

/// Longest accepted `thoughtText`, in characters.
pub const THOUGHT_TEXT_MAX: usize = 280;
/// Longest accepted `reactionBody`, in characters.
pub const REACTION_BODY_MAX: usize = 280;

/// Domain part must be a dotted host with an alphabetic TLD, or a bracketed IPv4 literal.
static EMAIL_DOMAIN: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"^(\[[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\]|([A-Za-z0-9-]+\.)+[A-Za-z]{2,})$").ok()
});

/// Returns `true` if the provided string is a syntactically valid email address
/// with a routable-looking domain.
pub fn is_valid_email(value: &str) -> bool {
    match value.parse::<EmailAddress>() {
        Ok(address) => EMAIL_DOMAIN
            .as_ref()
            .is_some_and(|domain| domain.is_match(address.domain())),
        Err(_) => false,
    }
}

/// Trims `value` and records an issue when nothing is left.
pub fn required_trimmed(field: &str, value: &str, issues: &mut Vec<ValidationIssue>) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        issues.push(ValidationIssue::new(
            field,
            "validation.required",
            format!("{field} is required"),
        ));
    }
    trimmed.to_string()
}

/// Records an issue when the character count of `value` falls outside `min..=max`.
pub fn check_length(field: &str, value: &str, min: usize, max: usize, issues: &mut Vec<ValidationIssue>) {
    let len = value.chars().count();
    if len < min {
        issues.push(ValidationIssue::new(
            field,
            "validation.length",
            format!("length must be at least {min}"),
        ));
    } else if len > max {
        issues.push(ValidationIssue::new(
            field,
            "validation.length",
            format!("length must be at most {max}"),
        ));
    }
}

/// Records an issue when `value` is not a valid email address. Empty values are
/// left to the required check.
pub fn check_email(field: &str, value: &str, issues: &mut Vec<ValidationIssue>) {
    if !value.is_empty() && !is_valid_email(value) {
        issues.push(ValidationIssue::new(
            field,
            "validation.email",
            "Please enter a valid email address.",
        ));
    }
}
