// src/utils/validation.rs

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;
use validator::ValidationError;

pub const BLANK_MESSAGE: &str = "You must write a message!";
pub const BLANK_COMMENT: &str = "You must write a comment!";
pub const INVALID_SLUG: &str =
    "Use only latin letters, digits, hyphens and underscores in the identifier.";

pub const INVALID_USERNAME: &str = "Enter a valid username. This value may contain only letters, \
     numbers, and @/./+/-/_ characters.";

static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\w.@+-]+$").expect("username pattern is valid"));

static SLUG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-a-zA-Z0-9_]+$").expect("slug pattern is valid"));

fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}

fn blank_error(message: &'static str) -> ValidationError {
    ValidationError::new("blank").with_message(Cow::Borrowed(message))
}

/// Post text needs at least one non-whitespace character.
pub fn validate_message_text(text: &str) -> Result<(), ValidationError> {
    if is_blank(text) {
        return Err(blank_error(BLANK_MESSAGE));
    }
    Ok(())
}

/// Comment text needs at least one non-whitespace character.
pub fn validate_comment_text(text: &str) -> Result<(), ValidationError> {
    if is_blank(text) {
        return Err(blank_error(BLANK_COMMENT));
    }
    Ok(())
}

pub fn validate_slug(slug: &str) -> Result<(), ValidationError> {
    if !SLUG_RE.is_match(slug) {
        return Err(ValidationError::new("invalid_slug").with_message(Cow::Borrowed(INVALID_SLUG)));
    }
    Ok(())
}

/// Usernames end up as a path segment of profile URLs.
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    if !USERNAME_RE.is_match(username) {
        return Err(ValidationError::new("invalid_username")
            .with_message(Cow::Borrowed(INVALID_USERNAME)));
    }
    Ok(())
}
