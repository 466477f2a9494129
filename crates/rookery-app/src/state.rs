//! Observable application state types.
//!
//! These structures serve as the "View Model" for the application. They hold
//! the subset of server state necessary for rendering, reconciled from API
//! responses rather than computed locally.

use rookery_client::{CommentId, PostId, User};

/// Session state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// Viewer not yet resolved.
    Resolving,
    /// Browsing without an account.
    Anonymous,
    /// Authenticated viewer.
    SignedIn(User),
}

impl SessionState {
    /// Authenticated viewer, if any.
    pub fn user(&self) -> Option<&User> {
        match self {
            Self::SignedIn(user) => Some(user),
            Self::Resolving | Self::Anonymous => None,
        }
    }
}

/// Like flag and count for one entity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LikeState {
    /// Viewer likes the entity.
    pub liked: bool,
    /// Displayed like count.
    pub count: u64,
}

impl LikeState {
    /// State from a server flag and count.
    pub fn new(liked: bool, count: u64) -> Self {
        Self { liked, count }
    }

    /// Reconcile with a confirmed toggle result.
    ///
    /// The count only moves when the flag changes, so a result matching the
    /// current flag is a no-op and the count never drops below zero.
    pub fn apply(&mut self, liked: bool) {
        if liked == self.liked {
            return;
        }
        self.liked = liked;
        self.count = if liked { self.count.saturating_add(1) } else { self.count.saturating_sub(1) };
    }
}

/// Comment being replied to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyTarget {
    /// Parent comment.
    pub comment_id: CommentId,
    /// Parent author's handle, without `@`.
    pub handle: String,
}

/// Comment thread lifecycle for a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThreadState {
    /// Never fetched, or last fetch failed.
    Collapsed,
    /// First fetch in flight.
    Loading,
    /// Tree fetched at least once.
    Loaded {
        /// Thread is shown.
        visible: bool,
    },
}

impl ThreadState {
    /// Thread is shown.
    pub fn is_visible(self) -> bool {
        matches!(self, Self::Loaded { visible: true })
    }
}

/// What keyboard input is currently editing or confirming.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Navigating the feed.
    Browse,
    /// Writing a comment or reply on a post.
    ComposeComment {
        /// Post being commented on.
        post_id: PostId,
    },
    /// Writing a new post.
    ComposePost,
    /// Waiting for delete confirmation.
    ConfirmDelete {
        /// Post pending deletion.
        post_id: PostId,
    },
}

/// Which list the selection cursor moves in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    /// Feed posts.
    Posts,
    /// Comment rows of the selected post's thread.
    Thread {
        /// Index into the flattened rows.
        row: usize,
    },
}
