//! Application input events.
//!
//! This module defines [`AppEvent`], the set of inputs that drive the
//! [`crate::Feed`] state machine.
//!
//! Events originate from two distinct sources:
//! - User interactions (Keyboard, Resize) and system ticks.
//! - API call completions translated by the [`crate::Bridge`].

use rookery_client::{ClientError, Comment, LikeTarget, Post, PostId, User};

use crate::KeyInput;

/// Events processed by the Feed state machine.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// Keyboard input.
    Key(KeyInput),

    /// Periodic tick.
    Tick,

    /// Terminal resize (columns, rows).
    Resize(u16, u16),

    /// Viewer resolved.
    SessionStarted {
        /// Authenticated viewer.
        user: User,
    },

    /// No usable session. The feed is browsed anonymously.
    SessionFailed {
        /// Cause.
        error: ClientError,
    },

    /// Feed listing arrived.
    FeedLoaded {
        /// Posts, newest first.
        posts: Vec<Post>,
    },

    /// Feed listing failed.
    FeedFailed {
        /// Cause.
        error: ClientError,
    },

    /// New post published.
    PostCreated {
        /// Server copy of the post.
        post: Post,
    },

    /// Publishing a post failed.
    PostCreateFailed {
        /// Cause.
        error: ClientError,
    },

    /// Initial like flag and count for a mounted post.
    LikeStatusLoaded {
        /// Post the status belongs to.
        post_id: PostId,
        /// Like generation echoed from the request. Results from an older
        /// generation are stale.
        generation: u64,
        /// Viewer likes the post.
        liked: bool,
        /// Server like count.
        count: u64,
    },

    /// Initial like status could not be fetched.
    LikeStatusFailed {
        /// Post the status belongs to.
        post_id: PostId,
        /// Cause.
        error: ClientError,
    },

    /// Server confirmed a like toggle.
    LikeToggled {
        /// Post owning the target.
        post_id: PostId,
        /// Entity that was toggled.
        target: LikeTarget,
        /// Viewer's like flag after the toggle.
        liked: bool,
    },

    /// Like toggle failed.
    LikeFailed {
        /// Post owning the target.
        post_id: PostId,
        /// Entity that was toggled.
        target: LikeTarget,
        /// Cause.
        error: ClientError,
    },

    /// Comment tree arrived.
    ThreadLoaded {
        /// Post owning the thread.
        post_id: PostId,
        /// Top-level comments with nested replies.
        comments: Vec<Comment>,
    },

    /// Comment tree could not be fetched.
    ThreadFailed {
        /// Post owning the thread.
        post_id: PostId,
        /// Cause.
        error: ClientError,
    },

    /// Comment or reply created.
    CommentCreated {
        /// Post the comment belongs to.
        post_id: PostId,
        /// Server copy of the comment.
        comment: Comment,
    },

    /// Creating a comment failed.
    CommentFailed {
        /// Post the comment was for.
        post_id: PostId,
        /// Cause.
        error: ClientError,
    },

    /// Post deleted on the server.
    PostDeleted {
        /// Deleted post.
        post_id: PostId,
    },

    /// Deleting a post failed.
    DeleteFailed {
        /// Post that was not deleted.
        post_id: PostId,
        /// Cause.
        error: ClientError,
    },
}

impl AppEvent {
    /// Post this event is scoped to, if any.
    pub fn post_id(&self) -> Option<&PostId> {
        match self {
            Self::LikeStatusLoaded { post_id, .. }
            | Self::LikeStatusFailed { post_id, .. }
            | Self::LikeToggled { post_id, .. }
            | Self::LikeFailed { post_id, .. }
            | Self::ThreadLoaded { post_id, .. }
            | Self::ThreadFailed { post_id, .. }
            | Self::CommentCreated { post_id, .. }
            | Self::CommentFailed { post_id, .. }
            | Self::PostDeleted { post_id }
            | Self::DeleteFailed { post_id, .. } => Some(post_id),
            Self::Key(_)
            | Self::Tick
            | Self::Resize(..)
            | Self::SessionStarted { .. }
            | Self::SessionFailed { .. }
            | Self::FeedLoaded { .. }
            | Self::FeedFailed { .. }
            | Self::PostCreated { .. }
            | Self::PostCreateFailed { .. } => None,
        }
    }
}
