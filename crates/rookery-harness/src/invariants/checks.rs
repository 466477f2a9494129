//! Standard invariant checks.
//!
//! These invariants capture behavioral properties that must always hold.
//! They verify WHAT must be true, not specific test scenarios.

use std::collections::HashSet;

use rookery_app::ThreadState;

use super::{FeedSnapshot, Invariant, InvariantKind, InvariantResult, Violation};

/// Selection must point at something that exists.
///
/// The selected post index is within the feed (or 0 for an empty feed), and
/// a thread row selection is within the selected post's visible rows.
pub struct SelectionInBounds;

impl Invariant for SelectionInBounds {
    fn kind(&self) -> InvariantKind {
        InvariantKind::SelectionInBounds
    }

    fn check(&self, state: &FeedSnapshot) -> InvariantResult {
        let posts = state.posts.len();
        if (posts == 0 && state.selected != 0) || (posts > 0 && state.selected >= posts) {
            return Err(Violation {
                invariant: self.kind(),
                message: format!("selected {} with {} posts", state.selected, posts),
            });
        }
        if let Some(row) = state.focus_row {
            if row >= state.visible_rows {
                return Err(Violation {
                    invariant: self.kind(),
                    message: format!("focus row {row} with {} visible rows", state.visible_rows),
                });
            }
        }
        Ok(())
    }
}

/// A deleted post never stays in the feed, and no post appears twice.
pub struct DeletedPostsAbsent;

impl Invariant for DeletedPostsAbsent {
    fn kind(&self) -> InvariantKind {
        InvariantKind::DeletedPostsAbsent
    }

    fn check(&self, state: &FeedSnapshot) -> InvariantResult {
        let mut seen = HashSet::new();
        for post in &state.posts {
            if post.removed {
                return Err(Violation {
                    invariant: self.kind(),
                    message: format!("post {} deleted but still in feed", post.id),
                });
            }
            if !seen.insert(&post.id) {
                return Err(Violation {
                    invariant: self.kind(),
                    message: format!("post {} listed twice", post.id),
                });
            }
        }
        Ok(())
    }
}

/// A reply target always refers to a comment in the loaded thread.
pub struct ReplyTargetInThread;

impl Invariant for ReplyTargetInThread {
    fn kind(&self) -> InvariantKind {
        InvariantKind::ReplyTargetInThread
    }

    fn check(&self, state: &FeedSnapshot) -> InvariantResult {
        for post in &state.posts {
            if let Some(target) = &post.reply_target {
                if !post.comment_ids.contains(target) {
                    return Err(Violation {
                        invariant: self.kind(),
                        message: format!(
                            "post {}: reply target {} not among {} loaded comments",
                            post.id,
                            target,
                            post.comment_ids.len()
                        ),
                    });
                }
            }
        }
        Ok(())
    }
}

/// Once a thread is loaded, the displayed comment count is the number of
/// loaded top-level comments.
pub struct CommentCountConsistent;

impl Invariant for CommentCountConsistent {
    fn kind(&self) -> InvariantKind {
        InvariantKind::CommentCountConsistent
    }

    fn check(&self, state: &FeedSnapshot) -> InvariantResult {
        for post in &state.posts {
            let loaded = matches!(post.thread, ThreadState::Loaded { .. });
            if loaded && post.displayed_comment_count != post.top_level_comments as u64 {
                return Err(Violation {
                    invariant: self.kind(),
                    message: format!(
                        "post {}: shows {} comments, {} loaded",
                        post.id, post.displayed_comment_count, post.top_level_comments
                    ),
                });
            }
            if !loaded && !post.comment_ids.is_empty() {
                return Err(Violation {
                    invariant: self.kind(),
                    message: format!("post {}: comments present in {:?}", post.id, post.thread),
                });
            }
        }
        Ok(())
    }
}

/// Input modes refer to posts in the feed, and only the author is ever
/// asked to confirm a delete.
pub struct ModeTargetsPresent;

impl Invariant for ModeTargetsPresent {
    fn kind(&self) -> InvariantKind {
        InvariantKind::ModeTargetsPresent
    }

    fn check(&self, state: &FeedSnapshot) -> InvariantResult {
        let Some(post_id) = &state.mode_post else {
            return Ok(());
        };
        let Some(post) = state.post(post_id) else {
            return Err(Violation {
                invariant: self.kind(),
                message: format!("mode refers to post {post_id} not in feed"),
            });
        };
        if state.confirming_delete && state.viewer.as_ref() != Some(&post.author) {
            return Err(Violation {
                invariant: self.kind(),
                message: format!(
                    "delete confirmation for post {post_id} by {} shown to {:?}",
                    post.author, state.viewer
                ),
            });
        }
        Ok(())
    }
}
