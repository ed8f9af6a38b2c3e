// src/lib.rs

pub mod config;
pub mod error;
pub mod hierarchy;
pub mod models;
pub mod services;
pub mod store;
pub mod utils;

pub use services::CommentService;
