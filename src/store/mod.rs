// src/store/mod.rs

pub mod comments;
pub mod posts;
