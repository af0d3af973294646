// src/services/mod.rs

pub mod feed;
pub mod follows;
pub mod groups;
pub mod media;
pub mod posts;
pub mod users;
