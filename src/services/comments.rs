use chrono::Utc;
use sqlx::SqlitePool;
use validator::Validate;

use crate::{
    config::Config,
    error::AppError,
    hierarchy,
    models::{
        actor::Actor,
        comment::{
            Comment, CommentNode, CommentStats, CreateCommentRequest, DELETED_PLACEHOLDER,
            MAX_CONTENT_CHARS, MAX_DEPTH, NewComment, Removal, UpdateCommentRequest,
        },
    },
    store::{comments, posts},
    utils::html::clean_content,
};

/// Upper bound for `recent`.
const RECENT_LIMIT_MAX: i64 = 100;

/// Check-then-write transactions take the write lock up front. A deferred
/// transaction would read under a shared lock and then fail with
/// SQLITE_BUSY when two writers race to upgrade it.
const WRITE_TX: &str = "BEGIN IMMEDIATE";

/// Comment hierarchy engine.
///
/// Each call is one unit of work against the store. Writes that check and
/// then act run inside a single transaction.
#[derive(Clone)]
pub struct CommentService {
    pool: SqlitePool,
    keep_placeholders: bool,
}

impl CommentService {
    pub fn new(pool: SqlitePool, config: &Config) -> Self {
        Self {
            pool,
            keep_placeholders: config.keep_placeholders,
        }
    }

    /// Reply tree of a post, oldest first at every level.
    ///
    /// With placeholders on, soft-deleted comments that still have live
    /// replies show up as tombstone nodes. With them off, those replies are
    /// detached and left out.
    pub async fn list_hierarchy(&self, post_id: i64) -> Result<Vec<CommentNode>, AppError> {
        let mut conn = self.pool.acquire().await?;

        posts::find_by_id(&mut conn, post_id)
            .await?
            .ok_or(AppError::NotFound("Post not found".to_string()))?;

        let rows = if self.keep_placeholders {
            comments::find_all_by_post(&mut conn, post_id).await?
        } else {
            comments::find_active_by_post(&mut conn, post_id).await?
        };

        let tree = hierarchy::build(rows);
        if !tree.detached.is_empty() {
            tracing::warn!(
                "Post {} has comments detached from the tree: {:?}",
                post_id,
                tree.detached
            );
        }

        if self.keep_placeholders {
            Ok(hierarchy::prune_tombstones(tree.roots))
        } else {
            Ok(tree.roots)
        }
    }

    /// Create a top-level comment or a reply.
    pub async fn create(
        &self,
        post_id: i64,
        actor: &Actor,
        payload: CreateCommentRequest,
    ) -> Result<Comment, AppError> {
        payload.validate()?;
        let content = sanitize(&payload.content)?;

        let mut tx = self.pool.begin_with(WRITE_TX).await?;

        posts::find_by_id(&mut *tx, post_id)
            .await?
            .ok_or(AppError::NotFound("Post not found".to_string()))?;

        let mut depth = 0;
        if let Some(pid) = payload.parent_id {
            let parent = comments::find_by_id(&mut *tx, pid)
                .await?
                .filter(|parent| parent.post_id == post_id)
                .ok_or(AppError::NotFound("Parent comment not found".to_string()))?;

            if parent.deleted {
                return Err(AppError::InvalidState(
                    "Cannot reply to a deleted comment".to_string(),
                ));
            }
            if parent.depth >= MAX_DEPTH {
                return Err(AppError::DepthLimitExceeded {
                    parent_id: parent.id,
                    parent_depth: parent.depth,
                });
            }
            depth = parent.depth + 1;
        }

        let new = NewComment {
            post_id,
            parent_id: payload.parent_id,
            author_id: actor.id.clone(),
            content,
            depth,
            created_at: Utc::now(),
        };

        let comment = comments::insert(&mut *tx, &new).await.map_err(|e| {
            if comments::is_missing_reference(&e) {
                return AppError::NotFound("Parent comment not found".to_string());
            }
            tracing::error!("Failed to create comment: {:?}", e);
            AppError::InternalServerError(e.to_string())
        })?;

        tx.commit().await?;

        tracing::info!(
            "Comment {} created on post {} by {} at depth {}",
            comment.id,
            post_id,
            actor.id,
            comment.depth
        );
        Ok(comment)
    }

    /// Rewrite the content of a comment. Author only.
    pub async fn update(
        &self,
        comment_id: i64,
        actor: &Actor,
        payload: UpdateCommentRequest,
    ) -> Result<Comment, AppError> {
        payload.validate()?;
        let content = sanitize(&payload.content)?;

        let mut tx = self.pool.begin_with(WRITE_TX).await?;

        let comment = comments::find_by_id(&mut *tx, comment_id)
            .await?
            .ok_or(AppError::NotFound("Comment not found".to_string()))?;

        if !actor.can_edit(&comment.author_id) {
            return Err(AppError::Forbidden(
                "Only the author can edit this comment".to_string(),
            ));
        }
        if comment.deleted {
            return Err(AppError::InvalidState(
                "Deleted comments cannot be edited".to_string(),
            ));
        }

        let updated = comments::update_content(&mut *tx, comment_id, &content, Utc::now())
            .await
            .map_err(|e| {
                tracing::error!("Failed to update comment: {:?}", e);
                AppError::InternalServerError(e.to_string())
            })?;

        tx.commit().await?;

        tracing::info!("Comment {} edited by {}", comment_id, actor.id);
        Ok(updated)
    }

    /// Delete a comment. Author or admin.
    ///
    /// A comment nobody replied to is removed for good. One with replies is
    /// kept as a placeholder so the replies stay attached.
    pub async fn delete(&self, comment_id: i64, actor: &Actor) -> Result<Removal, AppError> {
        let mut tx = self.pool.begin_with(WRITE_TX).await?;

        let comment = comments::find_by_id(&mut *tx, comment_id)
            .await?
            .ok_or(AppError::NotFound("Comment not found".to_string()))?;

        if !actor.can_delete(&comment.author_id) {
            return Err(AppError::Forbidden(
                "You are not authorized to delete this comment".to_string(),
            ));
        }
        if comment.deleted {
            return Err(AppError::InvalidState(
                "Comment is already deleted".to_string(),
            ));
        }

        let children = comments::find_children(&mut *tx, comment_id).await?;

        // delete_leaf re-checks for replies, so one that slipped in after
        // the lookup turns this into a soft delete instead of an orphan.
        let removal = if children.is_empty() && comments::delete_leaf(&mut *tx, comment_id).await? {
            Removal::Purged
        } else {
            comments::mark_deleted(&mut *tx, comment_id, DELETED_PLACEHOLDER, Utc::now())
                .await
                .map_err(|e| {
                    tracing::error!("Failed to delete comment: {:?}", e);
                    AppError::InternalServerError(e.to_string())
                })?;
            Removal::Tombstoned
        };

        tx.commit().await?;

        tracing::info!(
            "Comment {} deleted by {} ({:?}, {} direct replies)",
            comment_id,
            actor.id,
            removal,
            children.len()
        );
        Ok(removal)
    }

    /// Totals over every row of a post. Unknown posts count as empty.
    pub async fn stats(&self, post_id: i64) -> Result<CommentStats, AppError> {
        let mut conn = self.pool.acquire().await?;
        let rows = comments::find_all_by_post(&mut conn, post_id).await?;
        Ok(CommentStats::from_comments(&rows))
    }

    pub async fn get(&self, comment_id: i64) -> Result<Option<Comment>, AppError> {
        let mut conn = self.pool.acquire().await?;
        Ok(comments::find_by_id(&mut conn, comment_id).await?)
    }

    /// Live comments written by one author, newest first.
    pub async fn by_author(&self, author_id: &str) -> Result<Vec<Comment>, AppError> {
        let mut conn = self.pool.acquire().await?;
        Ok(comments::find_by_author(&mut conn, author_id).await?)
    }

    /// Latest comments across all posts, for moderation.
    pub async fn recent(&self, limit: i64) -> Result<Vec<Comment>, AppError> {
        let limit = limit.clamp(1, RECENT_LIMIT_MAX);
        let mut conn = self.pool.acquire().await?;
        Ok(comments::find_recent(&mut conn, limit).await?)
    }

    /// Live comment count of a post; 0 for unknown posts.
    pub async fn active_count(&self, post_id: i64) -> Result<i64, AppError> {
        let mut conn = self.pool.acquire().await?;
        Ok(comments::count_active_by_post(&mut conn, post_id).await?)
    }
}

/// Sanitized content, re-checked after sanitizing since escaping can
/// grow it past the limit.
fn sanitize(raw: &str) -> Result<String, AppError> {
    let content =
        clean_content(raw).ok_or(AppError::BadRequest("Comment must not be empty".to_string()))?;

    if content.chars().count() > MAX_CONTENT_CHARS {
        return Err(AppError::BadRequest(format!(
            "Comment must be between 1 and {} characters",
            MAX_CONTENT_CHARS
        )));
    }
    Ok(content)
}
