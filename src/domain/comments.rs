//! Comment records and flat-list-to-tree assembly.
//!
//! The CMS returns published comments for one document as a flat list sorted
//! by creation time. The tree is assembled in memory in two passes: create a
//! node per comment, then link each node under its parent. A node whose
//! parent is missing from the list is hoisted to the root level rather than
//! dropped, so moderation holes never hide whole reply threads.

use serde::Serialize;
use std::collections::HashMap;
use time::OffsetDateTime;
use uuid::Uuid;

use super::error::DomainError;

/// Which collection a comment is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Posts,
    Projects,
}

/// The document a comment belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DocumentRef {
    pub kind: DocumentKind,
    pub id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommentRecord {
    pub id: Uuid,
    pub doc: DocumentRef,
    pub parent_id: Option<Uuid>,
    pub author_name: Option<String>,
    pub content: String,
    pub created_at: OffsetDateTime,
}

/// A comment with its replies, as rendered by the comments section.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommentNode {
    pub comment: CommentRecord,
    pub depth: usize,
    pub replies: Vec<CommentNode>,
}

/// Check that `parent` can accept a reply on `doc`.
///
/// A reply's parent must be a comment on the same document; replying across
/// documents is rejected by the CMS and is rejected here before a create
/// request is ever issued.
pub fn validate_parent(parent: &CommentRecord, doc: &DocumentRef) -> Result<(), DomainError> {
    if parent.doc != *doc {
        return Err(DomainError::validation(
            "parent comment does not belong to the same document",
        ));
    }
    Ok(())
}

/// Assemble the reply tree from a flat, creation-ordered list.
///
/// Input order is preserved among siblings. A `parent_id` that does not
/// appear in `comments` (or that points at a different document's comment)
/// makes the node a root.
pub fn build_comment_tree(comments: &[CommentRecord]) -> Vec<CommentNode> {
    let known: HashMap<Uuid, &CommentRecord> =
        comments.iter().map(|comment| (comment.id, comment)).collect();

    let mut children: HashMap<Uuid, Vec<&CommentRecord>> = HashMap::new();
    let mut roots: Vec<&CommentRecord> = Vec::new();

    for comment in comments {
        let parent = comment.parent_id.and_then(|id| known.get(&id).copied());
        match parent {
            Some(parent) if parent.doc == comment.doc => {
                children.entry(parent.id).or_default().push(comment);
            }
            _ => roots.push(comment),
        }
    }

    roots
        .into_iter()
        .map(|comment| attach(comment, 0, &children))
        .collect()
}

fn attach(
    comment: &CommentRecord,
    depth: usize,
    children: &HashMap<Uuid, Vec<&CommentRecord>>,
) -> CommentNode {
    let replies = children
        .get(&comment.id)
        .map(|nodes| {
            nodes
                .iter()
                .map(|child| attach(child, depth + 1, children))
                .collect()
        })
        .unwrap_or_default();

    CommentNode {
        comment: comment.clone(),
        depth,
        replies,
    }
}
