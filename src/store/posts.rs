//! Post lookup. Post CRUD proper lives with the web layer; the comment
//! engine only needs to know whether a post exists.

use chrono::Utc;
use sqlx::SqliteConnection;

use crate::models::post::{CreatePostRequest, Post};

pub async fn find_by_id(conn: &mut SqliteConnection, id: i64) -> Result<Option<Post>, sqlx::Error> {
    sqlx::query_as::<_, Post>(
        r#"
        SELECT id, title, content, author_id, created_at, reset_at
        FROM posts
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await
}

pub async fn insert(conn: &mut SqliteConnection, payload: &CreatePostRequest) -> Result<Post, sqlx::Error> {
    sqlx::query_as::<_, Post>(
        r#"
        INSERT INTO posts (title, content, author_id, created_at, reset_at)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, title, content, author_id, created_at, reset_at
        "#,
    )
    .bind(&payload.title)
    .bind(&payload.content)
    .bind(&payload.author_id)
    .bind(Utc::now())
    .bind(payload.reset_at)
    .fetch_one(&mut *conn)
    .await
}

pub async fn count_all(conn: &mut SqliteConnection) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM posts")
        .fetch_one(&mut *conn)
        .await
}
