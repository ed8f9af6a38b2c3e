use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::actor::Actor;

/// Deepest level a comment may sit at. Top-level comments are depth 0,
/// so this allows 5 levels in total.
pub const MAX_DEPTH: i32 = 4;

/// Longest stored comment, counted after sanitizing.
pub const MAX_CONTENT_CHARS: usize = 1000;

/// Content written over a soft-deleted comment.
pub const DELETED_PLACEHOLDER: &str = "this comment has been deleted";

/// Represents the 'comments' table in the database.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub post_id: i64,
    pub parent_id: Option<i64>,
    pub author_id: String,
    pub content: String,
    pub depth: i32,
    pub deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// DTO for creating a new comment.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCommentRequest {
    #[validate(length(
        min = 1,
        max = 1000,
        message = "Comment must be between 1 and 1000 characters"
    ))]
    pub content: String,

    /// Optional: the ID of the comment being replied to.
    pub parent_id: Option<i64>,
}

/// DTO for editing a comment.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCommentRequest {
    #[validate(length(
        min = 1,
        max = 1000,
        message = "Comment must be between 1 and 1000 characters"
    ))]
    pub content: String,
}

/// Row about to be written by the store.
#[derive(Debug, Clone)]
pub struct NewComment {
    pub post_id: i64,
    pub parent_id: Option<i64>,
    pub author_id: String,
    pub content: String,
    pub depth: i32,
    pub created_at: DateTime<Utc>,
}

/// A comment together with its direct replies, oldest first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommentNode {
    #[serde(flatten)]
    pub comment: Comment,
    pub children: Vec<CommentNode>,
}

impl CommentNode {
    pub fn new(comment: Comment) -> Self {
        Self {
            comment,
            children: Vec::new(),
        }
    }

    pub fn id(&self) -> i64 {
        self.comment.id
    }

    pub fn is_reply(&self) -> bool {
        self.comment.parent_id.is_some() && self.comment.depth > 0
    }

    pub fn can_reply(&self) -> bool {
        !self.comment.deleted && self.comment.depth < MAX_DEPTH
    }

    pub fn is_editable_by(&self, actor: &Actor) -> bool {
        !self.comment.deleted && actor.can_edit(&self.comment.author_id)
    }

    pub fn is_deletable_by(&self, actor: &Actor) -> bool {
        !self.comment.deleted && actor.can_delete(&self.comment.author_id)
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Number of nodes in this subtree, including itself.
    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(CommentNode::subtree_len).sum::<usize>()
    }
}

/// What `delete` ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Removal {
    /// Row removed for good; the comment had no replies.
    Purged,
    /// Row kept as a placeholder so its replies stay attached.
    Tombstoned,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CommentStats {
    pub total: i64,
    pub deleted: i64,
    pub active: i64,
    pub max_depth: i32,
}

impl CommentStats {
    pub fn from_comments(comments: &[Comment]) -> Self {
        let total = comments.len() as i64;
        let deleted = comments.iter().filter(|c| c.deleted).count() as i64;
        let max_depth = comments.iter().map(|c| c.depth).max().unwrap_or(0);

        Self {
            total,
            deleted,
            active: total - deleted,
            max_depth,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comment(id: i64, depth: i32, deleted: bool) -> Comment {
        Comment {
            id,
            post_id: 1,
            parent_id: (depth > 0).then_some(id - 1),
            author_id: "u1".to_string(),
            content: "hello".to_string(),
            depth,
            deleted,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    #[test]
    fn stats_of_nothing_are_zero() {
        assert_eq!(CommentStats::from_comments(&[]), CommentStats::default());
    }

    #[test]
    fn stats_count_deleted_rows_in_total() {
        let rows = [comment(1, 0, true), comment(2, 1, false), comment(3, 2, false)];
        let stats = CommentStats::from_comments(&rows);

        assert_eq!(stats.total, 3);
        assert_eq!(stats.deleted, 1);
        assert_eq!(stats.active, 2);
        assert_eq!(stats.max_depth, 2);
    }

    #[test]
    fn deepest_and_deleted_nodes_take_no_replies() {
        assert!(CommentNode::new(comment(1, 3, false)).can_reply());
        assert!(!CommentNode::new(comment(1, MAX_DEPTH, false)).can_reply());
        assert!(!CommentNode::new(comment(1, 0, true)).can_reply());
    }

    #[test]
    fn deleted_nodes_are_neither_editable_nor_deletable() {
        let node = CommentNode::new(comment(1, 0, true));
        assert!(!node.is_editable_by(&Actor::member("u1")));
        assert!(!node.is_deletable_by(&Actor::admin("root")));
    }

    #[test]
    fn node_serializes_flat_with_children() {
        let mut root = CommentNode::new(comment(1, 0, false));
        root.children.push(CommentNode::new(comment(2, 1, false)));

        assert_eq!(root.child_count(), 1);
        assert!(!root.is_reply());
        assert!(root.children[0].is_reply());

        let json = serde_json::to_value(&root).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["children"][0]["parent_id"], 1);
        assert_eq!(json["children"][0]["children"], serde_json::json!([]));
    }
}
