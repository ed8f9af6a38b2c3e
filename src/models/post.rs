use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Represents the 'posts' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub author_id: String,
    pub created_at: DateTime<Utc>,

    /// When the daily board rolls over. Only the external scheduler reads it.
    pub reset_at: DateTime<Utc>,
}

/// Row for `store::posts::insert`. Posting rules (one per day, title
/// limits) are enforced by the web layer before it gets here.
#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    pub title: String,
    pub content: String,
    pub author_id: String,
    pub reset_at: DateTime<Utc>,
}
