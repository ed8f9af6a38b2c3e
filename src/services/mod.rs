// src/services/mod.rs

pub mod comments;

pub use comments::CommentService;
