//! Application side-effects and intents.
//!
//! This module defines the [`AppAction`] enum, which represents instructions
//! produced by the [`crate::Feed`] and [`crate::PostView`] state machines for
//! the runtime to execute.

use rookery_client::{Credentials, LikeTarget, NewComment, NewPost, PostId};

/// Actions produced by the application state machines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppAction {
    /// Render the UI.
    Render,

    /// Quit the application.
    Quit,

    /// Resolve the viewer from the configured token.
    ResolveSession,

    /// Exchange credentials for a session.
    Login {
        /// Email and password.
        credentials: Credentials,
    },

    /// Fetch the feed listing.
    LoadFeed,

    /// Publish a new post.
    CreatePost {
        /// Post body.
        post: NewPost,
    },

    /// Fetch the like count for a post, and the viewer's like flag when
    /// signed in.
    FetchLikeStatus {
        /// Post being mounted.
        post_id: PostId,
        /// Like generation of the view when the request was issued.
        generation: u64,
        /// Ask the server whether the viewer likes the post. Anonymous
        /// viewers never like anything, so only the count is read.
        signed_in: bool,
    },

    /// Toggle the viewer's like on a post or comment.
    ToggleLike {
        /// Post owning the target, used to route the completion.
        post_id: PostId,
        /// Entity being liked.
        target: LikeTarget,
    },

    /// Fetch the full comment tree for a post.
    LoadThread {
        /// Post whose thread to load.
        post_id: PostId,
    },

    /// Create a comment or reply.
    SubmitComment {
        /// Comment body, target post and optional parent.
        comment: NewComment,
    },

    /// Delete a post authored by the viewer.
    DeletePost {
        /// Post to delete.
        post_id: PostId,
    },

    /// Place text on the system clipboard.
    CopyToClipboard {
        /// Text to copy.
        text: String,
    },

    /// A post view finished deleting its post. The feed has already dropped
    /// it; the runtime only observes this.
    PostRemoved {
        /// Deleted post.
        post_id: PostId,
    },
}

impl AppAction {
    /// Action requires a call to the remote API.
    pub fn is_request(&self) -> bool {
        matches!(
            self,
            Self::ResolveSession
                | Self::Login { .. }
                | Self::LoadFeed
                | Self::CreatePost { .. }
                | Self::FetchLikeStatus { .. }
                | Self::ToggleLike { .. }
                | Self::LoadThread { .. }
                | Self::SubmitComment { .. }
                | Self::DeletePost { .. }
        )
    }
}
