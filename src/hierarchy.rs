//! Builds the reply tree of a post from a flat, time-ordered list of rows.
//!
//! The list is indexed once by id and every row is then hung under its
//! parent's slot. Nothing walks live relationships, so malformed rows (a
//! parent id from another post, a cycle) can only drop nodes. They can
//! never loop.

use std::collections::HashMap;

use crate::models::comment::{Comment, CommentNode};

#[derive(Debug, Default)]
pub struct Hierarchy {
    /// Top-level comments in input order, replies nested below.
    pub roots: Vec<CommentNode>,
    /// Rows not reachable from any root, in input order.
    pub detached: Vec<i64>,
}

/// Arranges `comments` (already ordered oldest first) into a forest.
///
/// Roots and siblings keep input order. A row whose parent is missing from
/// the input is left out of the forest and its id reported in `detached`,
/// together with everything below it.
pub fn build(comments: Vec<Comment>) -> Hierarchy {
    let index: HashMap<i64, usize> = comments
        .iter()
        .enumerate()
        .map(|(slot, c)| (c.id, slot))
        .collect();

    let mut children: Vec<Vec<usize>> = vec![Vec::new(); comments.len()];
    let mut roots = Vec::new();

    for (slot, comment) in comments.iter().enumerate() {
        match comment.parent_id {
            None => roots.push(slot),
            Some(parent_id) => {
                if let Some(&parent_slot) = index.get(&parent_id).filter(|&&p| p != slot) {
                    children[parent_slot].push(slot);
                }
            }
        }
    }

    let mut nodes: Vec<Option<CommentNode>> = comments.into_iter().map(|c| Some(CommentNode::new(c))).collect();
    let roots: Vec<CommentNode> = roots
        .into_iter()
        .filter_map(|slot| assemble(slot, &mut nodes, &children))
        .collect();

    // Slots still filled were never reached from a root: a missing parent
    // somewhere up the chain, or a cycle.
    let detached = nodes.iter().flatten().map(CommentNode::id).collect();

    Hierarchy { roots, detached }
}

fn assemble(slot: usize, nodes: &mut [Option<CommentNode>], children: &[Vec<usize>]) -> Option<CommentNode> {
    let mut node = nodes[slot].take()?;
    node.children = children[slot]
        .iter()
        .filter_map(|&child| assemble(child, nodes, children))
        .collect();
    Some(node)
}

/// Drops soft-deleted nodes that no longer anchor any live reply.
///
/// Works bottom-up, so a chain of tombstones disappears once its last live
/// descendant is gone.
pub fn prune_tombstones(nodes: Vec<CommentNode>) -> Vec<CommentNode> {
    nodes
        .into_iter()
        .filter_map(|mut node| {
            node.children = prune_tombstones(std::mem::take(&mut node.children));
            if node.comment.deleted && node.children.is_empty() {
                None
            } else {
                Some(node)
            }
        })
        .collect()
}
