//! Comment store: plain row access over the `comments` table.
//!
//! No rules live here. Every function takes a connection so the engine can
//! run several of them inside one transaction.

use chrono::{DateTime, Utc};
use sqlx::SqliteConnection;

use crate::models::comment::{Comment, NewComment};

pub async fn insert(conn: &mut SqliteConnection, new: &NewComment) -> Result<Comment, sqlx::Error> {
    sqlx::query_as::<_, Comment>(
        r#"
        INSERT INTO comments (post_id, parent_id, author_id, content, depth, deleted, created_at)
        VALUES ($1, $2, $3, $4, $5, FALSE, $6)
        RETURNING id, post_id, parent_id, author_id, content, depth, deleted, created_at, updated_at
        "#,
    )
    .bind(new.post_id)
    .bind(new.parent_id)
    .bind(&new.author_id)
    .bind(&new.content)
    .bind(new.depth)
    .bind(new.created_at)
    .fetch_one(&mut *conn)
    .await
}

pub async fn update_content(
    conn: &mut SqliteConnection,
    id: i64,
    content: &str,
    updated_at: DateTime<Utc>,
) -> Result<Comment, sqlx::Error> {
    sqlx::query_as::<_, Comment>(
        r#"
        UPDATE comments SET content = $1, updated_at = $2
        WHERE id = $3
        RETURNING id, post_id, parent_id, author_id, content, depth, deleted, created_at, updated_at
        "#,
    )
    .bind(content)
    .bind(updated_at)
    .bind(id)
    .fetch_one(&mut *conn)
    .await
}

/// Soft delete: keep the row, flag it, overwrite the content.
pub async fn mark_deleted(
    conn: &mut SqliteConnection,
    id: i64,
    placeholder: &str,
    updated_at: DateTime<Utc>,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE comments SET deleted = TRUE, content = $1, updated_at = $2 WHERE id = $3 AND deleted = FALSE",
    )
    .bind(placeholder)
    .bind(updated_at)
    .bind(id)
    .execute(&mut *conn)
    .await?;

    Ok(result.rows_affected())
}

/// Hard delete, but only while the comment has no replies at all.
///
/// The child check and the delete are one statement, so a reply inserted
/// concurrently either lands first (nothing deleted) or fails its FK check.
/// Returns whether the row was removed.
pub async fn delete_leaf(conn: &mut SqliteConnection, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        DELETE FROM comments
        WHERE id = $1
          AND NOT EXISTS (SELECT 1 FROM comments AS child WHERE child.parent_id = $1)
        "#,
    )
    .bind(id)
    .execute(&mut *conn)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Whether an insert failed because `post_id` or `parent_id` points at a
/// row that no longer exists.
pub fn is_missing_reference(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(|db| db.is_foreign_key_violation())
}

pub async fn find_by_id(conn: &mut SqliteConnection, id: i64) -> Result<Option<Comment>, sqlx::Error> {
    sqlx::query_as::<_, Comment>(
        r#"
        SELECT id, post_id, parent_id, author_id, content, depth, deleted, created_at, updated_at
        FROM comments
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await
}

/// Non-deleted comments of a post, oldest first.
pub async fn find_active_by_post(
    conn: &mut SqliteConnection,
    post_id: i64,
) -> Result<Vec<Comment>, sqlx::Error> {
    sqlx::query_as::<_, Comment>(
        r#"
        SELECT id, post_id, parent_id, author_id, content, depth, deleted, created_at, updated_at
        FROM comments
        WHERE post_id = $1 AND deleted = FALSE
        ORDER BY created_at ASC, id ASC
        "#,
    )
    .bind(post_id)
    .fetch_all(&mut *conn)
    .await
}

/// Every row of a post, soft-deleted ones included, oldest first.
pub async fn find_all_by_post(
    conn: &mut SqliteConnection,
    post_id: i64,
) -> Result<Vec<Comment>, sqlx::Error> {
    sqlx::query_as::<_, Comment>(
        r#"
        SELECT id, post_id, parent_id, author_id, content, depth, deleted, created_at, updated_at
        FROM comments
        WHERE post_id = $1
        ORDER BY created_at ASC, id ASC
        "#,
    )
    .bind(post_id)
    .fetch_all(&mut *conn)
    .await
}

/// Direct replies, whatever their deletion state.
pub async fn find_children(
    conn: &mut SqliteConnection,
    parent_id: i64,
) -> Result<Vec<Comment>, sqlx::Error> {
    sqlx::query_as::<_, Comment>(
        r#"
        SELECT id, post_id, parent_id, author_id, content, depth, deleted, created_at, updated_at
        FROM comments
        WHERE parent_id = $1
        ORDER BY created_at ASC, id ASC
        "#,
    )
    .bind(parent_id)
    .fetch_all(&mut *conn)
    .await
}

pub async fn find_by_author(
    conn: &mut SqliteConnection,
    author_id: &str,
) -> Result<Vec<Comment>, sqlx::Error> {
    sqlx::query_as::<_, Comment>(
        r#"
        SELECT id, post_id, parent_id, author_id, content, depth, deleted, created_at, updated_at
        FROM comments
        WHERE author_id = $1 AND deleted = FALSE
        ORDER BY created_at DESC, id DESC
        "#,
    )
    .bind(author_id)
    .fetch_all(&mut *conn)
    .await
}

pub async fn find_recent(conn: &mut SqliteConnection, limit: i64) -> Result<Vec<Comment>, sqlx::Error> {
    sqlx::query_as::<_, Comment>(
        r#"
        SELECT id, post_id, parent_id, author_id, content, depth, deleted, created_at, updated_at
        FROM comments
        ORDER BY created_at DESC, id DESC
        LIMIT $1
        "#,
    )
    .bind(limit)
    .fetch_all(&mut *conn)
    .await
}

pub async fn count_active_by_post(conn: &mut SqliteConnection, post_id: i64) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM comments WHERE post_id = $1 AND deleted = FALSE")
        .bind(post_id)
        .fetch_one(&mut *conn)
        .await
}

pub async fn count_all(conn: &mut SqliteConnection) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM comments")
        .fetch_one(&mut *conn)
        .await
}
