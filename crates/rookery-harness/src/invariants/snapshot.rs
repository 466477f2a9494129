//! Observable state snapshots for invariant checking.
//!
//! Snapshots capture the observable state of the feed at a point in time.
//! Invariants operate on snapshots rather than live state to ensure
//! consistent, atomic checks.

use rookery_app::{Feed, Focus, LikeState, Mode, PostView, ThreadState};
use rookery_client::{CommentId, PostId, UserId};

/// Snapshot of the whole feed.
#[derive(Debug, Clone, Default)]
pub struct FeedSnapshot {
    /// Authenticated viewer. `None` when anonymous or resolving.
    pub viewer: Option<UserId>,
    /// Posts in feed order.
    pub posts: Vec<PostSnapshot>,
    /// Selected post index.
    pub selected: usize,
    /// Selected thread row when focus is in a thread.
    pub focus_row: Option<usize>,
    /// Rows shown for the selected post's thread.
    pub visible_rows: usize,
    /// Post referenced by the current input mode.
    pub mode_post: Option<PostId>,
    /// Input mode is waiting for delete confirmation.
    pub confirming_delete: bool,
}

impl FeedSnapshot {
    /// Create an empty snapshot (no posts).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Capture the observable state of a feed.
    pub fn from_feed(feed: &Feed) -> Self {
        let focus_row = match feed.focus() {
            Focus::Thread { row } => Some(row),
            Focus::Posts => None,
        };
        let mode_post = match feed.mode() {
            Mode::ComposeComment { post_id } | Mode::ConfirmDelete { post_id } => {
                Some(post_id.clone())
            },
            Mode::Browse | Mode::ComposePost => None,
        };

        Self {
            viewer: feed.session().user().map(|user| user.id.clone()),
            posts: feed.posts().iter().map(PostSnapshot::from_view).collect(),
            selected: feed.selected_index(),
            focus_row,
            visible_rows: feed.selected_post().map_or(0, |view| view.visible_rows().len()),
            mode_post,
            confirming_delete: matches!(feed.mode(), Mode::ConfirmDelete { .. }),
        }
    }

    /// Snapshot of a post by id.
    pub fn post(&self, post_id: &PostId) -> Option<&PostSnapshot> {
        self.posts.iter().find(|post| &post.id == post_id)
    }
}

/// Snapshot of one post view.
#[derive(Debug, Clone)]
pub struct PostSnapshot {
    /// Post id.
    pub id: PostId,
    /// Post author.
    pub author: UserId,
    /// Displayed like flag and count.
    pub like: LikeState,
    /// Thread lifecycle.
    pub thread: ThreadState,
    /// Comment count shown next to the post.
    pub displayed_comment_count: u64,
    /// Loaded top-level comments.
    pub top_level_comments: usize,
    /// Every loaded comment id, replies included, in render order.
    pub comment_ids: Vec<CommentId>,
    /// Comment targeted for reply.
    pub reply_target: Option<CommentId>,
    /// Delete confirmed by the server.
    pub removed: bool,
}

impl PostSnapshot {
    /// Capture one post view.
    pub fn from_view(view: &PostView) -> Self {
        Self {
            id: view.id().clone(),
            author: view.post().author.id.clone(),
            like: view.like(),
            thread: view.thread_state(),
            displayed_comment_count: view.comment_count(),
            top_level_comments: view.comments().len(),
            comment_ids: view.rows().iter().map(|row| row.comment.id.clone()).collect(),
            reply_target: view.reply_target().map(|target| target.comment_id.clone()),
            removed: view.is_removed(),
        }
    }
}
