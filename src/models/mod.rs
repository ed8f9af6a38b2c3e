// src/models/mod.rs

pub mod actor;
pub mod comment;
pub mod post;
