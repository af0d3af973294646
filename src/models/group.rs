// src/models/group.rs

use std::fmt;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::utils::validation::validate_slug;

/// Represents the 'post_groups' table: a community posts can belong to.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Group {
    pub id: i64,
    /// Unique, at most 200 characters.
    pub title: String,
    /// Unique URL segment.
    pub slug: String,
    pub description: String,
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.title)
    }
}

/// DTO for an administrator creating a group.
#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct CreateGroupRequest {
    #[validate(length(
        min = 1,
        max = 200,
        message = "Group title must not exceed 200 characters"
    ))]
    pub title: String,

    #[validate(
        length(min = 1, max = 50),
        custom(function = "validate_slug")
    )]
    pub slug: String,

    #[serde(default)]
    pub description: String,
}
