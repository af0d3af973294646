// src/models/mod.rs

pub mod comment;
pub mod group;
pub mod post;
pub mod user;
