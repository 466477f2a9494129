//! Per-post interaction state machine.
//!
//! A [`PostView`] owns everything the viewer can do with one post: toggling
//! its like, expanding its comment thread, writing comments and replies,
//! deleting it (author only) and sharing its link.
//!
//! Like [`crate::Feed`], it never performs I/O. Operations return
//! [`AppAction`]s, and API completions come back as [`AppEvent`]s through
//! [`PostView::handle`]. Displayed counters are always reconciled from
//! server responses, never incremented on the optimistic path.

use std::collections::HashMap;

use rookery_client::{Comment, CommentId, LikeTarget, NewComment, Post, PostId, UserId};

use crate::{
    AppAction, AppEvent, LikeState, ReplyTarget, TextInput, ThreadState,
    thread::{self, CommentRow},
};

/// Interactive state for one post.
#[derive(Debug, Clone)]
pub struct PostView {
    post: Post,
    viewer: Option<UserId>,
    share_url: String,
    like: LikeState,
    /// Bumped on every post like request and confirmation. A status fetch
    /// issued under an older generation may straddle a toggle.
    like_generation: u64,
    likes_in_flight: u32,
    /// Like status fetched for the current viewer.
    mounted: bool,
    thread: ThreadState,
    comments: Vec<Comment>,
    comment_likes: HashMap<CommentId, LikeState>,
    reply_target: Option<ReplyTarget>,
    draft: TextInput,
    submitting: bool,
    deleting: bool,
    removed: bool,
}

impl PostView {
    /// View for `post` as seen by `viewer`. Links are built on
    /// `share_base_url`.
    pub fn new(post: Post, viewer: Option<UserId>, share_base_url: &str) -> Self {
        let like =
            LikeState::new(post.is_liked_by_current_user.unwrap_or(false), post.likes_count);
        let share_url = format!("{share_base_url}/posts/{}", post.id);
        Self {
            post,
            viewer,
            share_url,
            like,
            like_generation: 0,
            likes_in_flight: 0,
            mounted: false,
            thread: ThreadState::Collapsed,
            comments: Vec::new(),
            comment_likes: HashMap::new(),
            reply_target: None,
            draft: TextInput::new(),
            submitting: false,
            deleting: false,
            removed: false,
        }
    }

    /// Post id.
    pub fn id(&self) -> &PostId {
        &self.post.id
    }

    /// Post as last fetched.
    pub fn post(&self) -> &Post {
        &self.post
    }

    /// Replace the post with a newer server copy. Thread, draft and reply
    /// target survive.
    ///
    /// The listing's flag and count are only taken as a pair. A listing
    /// without the viewer's flag leaves the like state alone and schedules a
    /// status fetch on the next [`PostView::mount`].
    pub fn refresh(&mut self, post: Post) {
        if self.likes_in_flight == 0 {
            let liked = match (post.is_liked_by_current_user, &self.viewer) {
                (Some(liked), _) => Some(liked),
                (None, None) => Some(false),
                (None, Some(_)) => None,
            };
            match liked {
                Some(liked) => self.like = LikeState::new(liked, post.likes_count),
                None => self.mounted = false,
            }
        }
        self.post = post;
    }

    /// Actions to run once the view is displayed. Empty if the like status
    /// was already fetched for the current viewer.
    pub fn mount(&mut self) -> Vec<AppAction> {
        if self.mounted {
            return vec![];
        }
        self.mounted = true;
        vec![AppAction::FetchLikeStatus {
            post_id: self.post.id.clone(),
            generation: self.like_generation,
            signed_in: self.viewer.is_some(),
        }]
    }

    /// Switch the viewer. Comment like flags are rederived from the loaded
    /// tree, and the post's like status is fetched again on the next mount.
    pub fn set_viewer(&mut self, viewer: Option<UserId>) {
        if viewer != self.viewer {
            self.mounted = false;
            self.like_generation += 1;
            if viewer.is_none() {
                self.like = LikeState::new(false, self.like.count);
            }
        }
        self.viewer = viewer;
        self.comment_likes = thread::like_states(&self.comments, self.viewer.as_ref());
    }

    /// Post like flag and count.
    pub fn like(&self) -> LikeState {
        self.like
    }

    /// Request a like toggle on the post.
    pub fn toggle_like(&mut self) -> Vec<AppAction> {
        self.likes_in_flight += 1;
        self.like_generation += 1;
        vec![AppAction::ToggleLike {
            post_id: self.post.id.clone(),
            target: LikeTarget::Post(self.post.id.clone()),
        }]
    }

    /// Request a like toggle on a comment in the loaded thread. Unknown
    /// comments are ignored.
    pub fn toggle_comment_like(&self, comment_id: &CommentId) -> Vec<AppAction> {
        if thread::find(&self.comments, comment_id).is_none() {
            return vec![];
        }
        vec![AppAction::ToggleLike {
            post_id: self.post.id.clone(),
            target: LikeTarget::Comment(comment_id.clone()),
        }]
    }

    /// Like state of a loaded comment.
    pub fn comment_like(&self, comment_id: &CommentId) -> Option<LikeState> {
        self.comment_likes.get(comment_id).copied()
    }

    /// Thread lifecycle.
    pub fn thread_state(&self) -> ThreadState {
        self.thread
    }

    /// Loaded top-level comments.
    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    /// Rows of the loaded thread in render order.
    pub fn rows(&self) -> Vec<CommentRow<'_>> {
        thread::flatten(&self.comments, &self.comment_likes)
    }

    /// Rows currently shown. Empty while the thread is hidden.
    pub fn visible_rows(&self) -> Vec<CommentRow<'_>> {
        if self.thread.is_visible() { self.rows() } else { Vec::new() }
    }

    /// Comment count to display: top-level comments once loaded, the
    /// server's counter before that.
    pub fn comment_count(&self) -> u64 {
        match self.thread {
            ThreadState::Loaded { .. } => self.comments.len() as u64,
            ThreadState::Collapsed | ThreadState::Loading => self.post.comments_count,
        }
    }

    /// Show or hide the thread. The first expansion fetches it; later
    /// toggles only flip visibility.
    pub fn toggle_comments(&mut self) -> Vec<AppAction> {
        match self.thread {
            ThreadState::Collapsed => {
                self.thread = ThreadState::Loading;
                vec![AppAction::LoadThread { post_id: self.post.id.clone() }, AppAction::Render]
            },
            ThreadState::Loading => vec![],
            ThreadState::Loaded { visible } => {
                self.thread = ThreadState::Loaded { visible: !visible };
                vec![AppAction::Render]
            },
        }
    }

    /// Draft being composed.
    pub fn draft(&self) -> &TextInput {
        &self.draft
    }

    /// Mutable draft for key input.
    pub fn draft_mut(&mut self) -> &mut TextInput {
        &mut self.draft
    }

    /// Discard the draft text.
    pub fn clear_draft(&mut self) {
        self.draft.clear();
    }

    /// Comment being replied to.
    pub fn reply_target(&self) -> Option<&ReplyTarget> {
        self.reply_target.as_ref()
    }

    /// Target a comment for reply and prefill the draft with a mention of
    /// its author. Returns `false` if the comment is not in the thread.
    pub fn set_reply_target(&mut self, comment_id: &CommentId) -> bool {
        let Some(comment) = thread::find(&self.comments, comment_id) else {
            return false;
        };
        let handle = comment.author.handle().to_owned();
        self.draft.set(format!("@{handle} "));
        self.reply_target = Some(ReplyTarget { comment_id: comment_id.clone(), handle });
        true
    }

    /// Drop the reply target. The draft text is kept.
    pub fn clear_reply_target(&mut self) {
        self.reply_target = None;
    }

    /// A comment submission is in flight.
    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Submit the draft as a comment, or as a reply when a target is set.
    ///
    /// Blank drafts and submissions while one is in flight produce no
    /// actions.
    pub fn submit_comment(&mut self) -> Vec<AppAction> {
        if self.draft.is_blank() || self.submitting {
            return vec![];
        }
        self.submitting = true;
        let comment = NewComment {
            content: self.draft.text().trim().to_owned(),
            post_id: self.post.id.clone(),
            parent_id: self.reply_target.as_ref().map(|target| target.comment_id.clone()),
        };
        vec![AppAction::SubmitComment { comment }, AppAction::Render]
    }

    /// Viewer authored the post.
    pub fn can_delete(&self) -> bool {
        self.viewer.as_ref() == Some(&self.post.author.id)
    }

    /// Delete request in flight.
    pub fn is_deleting(&self) -> bool {
        self.deleting
    }

    /// Post was deleted on the server.
    pub fn is_removed(&self) -> bool {
        self.removed
    }

    /// Delete after the viewer confirmed. Ignored for non-authors and while
    /// a delete is already in flight.
    pub fn confirm_delete(&mut self) -> Vec<AppAction> {
        if !self.can_delete() || self.deleting || self.removed {
            return vec![];
        }
        self.deleting = true;
        vec![AppAction::DeletePost { post_id: self.post.id.clone() }, AppAction::Render]
    }

    /// Shareable link to the post.
    pub fn share_url(&self) -> &str {
        &self.share_url
    }

    /// Copy the share link.
    pub fn share(&self) -> Vec<AppAction> {
        vec![AppAction::CopyToClipboard { text: self.share_url.clone() }]
    }

    /// Apply an API completion scoped to this post.
    pub fn handle(&mut self, event: AppEvent) -> Vec<AppAction> {
        match event {
            AppEvent::LikeStatusLoaded { generation, liked, count, .. } => {
                if generation != self.like_generation || self.likes_in_flight > 0 {
                    tracing::debug!(post_id = %self.post.id, generation, "dropping stale like status");
                    return vec![];
                }
                self.like = LikeState::new(liked, count);
                vec![AppAction::Render]
            },
            AppEvent::LikeToggled { target, liked, .. } => {
                match target {
                    LikeTarget::Post(_) => {
                        self.settle_like();
                        self.like.apply(liked);
                    },
                    LikeTarget::Comment(comment_id) => {
                        if let Some(state) = self.comment_likes.get_mut(&comment_id) {
                            state.apply(liked);
                        }
                    },
                }
                vec![AppAction::Render]
            },
            AppEvent::ThreadLoaded { comments, .. } => {
                self.comment_likes = thread::like_states(&comments, self.viewer.as_ref());
                self.comments = comments;
                self.thread = match self.thread {
                    ThreadState::Loaded { visible } => ThreadState::Loaded { visible },
                    ThreadState::Collapsed | ThreadState::Loading => {
                        ThreadState::Loaded { visible: true }
                    },
                };
                let target_gone = self
                    .reply_target
                    .as_ref()
                    .is_some_and(|target| thread::find(&self.comments, &target.comment_id).is_none());
                if target_gone {
                    self.reply_target = None;
                }
                vec![AppAction::Render]
            },
            AppEvent::ThreadFailed { error, .. } => {
                tracing::warn!(post_id = %self.post.id, %error, "failed to load comments");
                if self.thread == ThreadState::Loading {
                    self.thread = ThreadState::Collapsed;
                }
                vec![AppAction::Render]
            },
            AppEvent::CommentCreated { comment, .. } => {
                tracing::debug!(post_id = %self.post.id, comment_id = %comment.id, "comment created");
                self.submitting = false;
                self.draft.clear();
                self.reply_target = None;
                if self.thread == ThreadState::Collapsed {
                    self.thread = ThreadState::Loading;
                }
                vec![AppAction::LoadThread { post_id: self.post.id.clone() }, AppAction::Render]
            },
            AppEvent::CommentFailed { error, .. } => {
                tracing::warn!(post_id = %self.post.id, %error, "failed to submit comment");
                self.submitting = false;
                vec![AppAction::Render]
            },
            AppEvent::PostDeleted { .. } => {
                self.deleting = false;
                if self.removed {
                    return vec![];
                }
                self.removed = true;
                vec![AppAction::PostRemoved { post_id: self.post.id.clone() }, AppAction::Render]
            },
            AppEvent::DeleteFailed { error, .. } => {
                tracing::warn!(post_id = %self.post.id, %error, "failed to delete post");
                self.deleting = false;
                vec![AppAction::Render]
            },
            AppEvent::LikeStatusFailed { error, .. } => {
                tracing::warn!(post_id = %self.post.id, %error, "failed to fetch like status");
                self.mounted = false;
                vec![]
            },
            AppEvent::LikeFailed { target, error, .. } => {
                tracing::warn!(post_id = %self.post.id, %target, %error, "failed to toggle like");
                if matches!(target, LikeTarget::Post(_)) {
                    self.settle_like();
                }
                vec![AppAction::Render]
            },
            AppEvent::Key(_)
            | AppEvent::Tick
            | AppEvent::Resize(..)
            | AppEvent::SessionStarted { .. }
            | AppEvent::SessionFailed { .. }
            | AppEvent::FeedLoaded { .. }
            | AppEvent::FeedFailed { .. }
            | AppEvent::PostCreated { .. }
            | AppEvent::PostCreateFailed { .. } => vec![],
        }
    }

    fn settle_like(&mut self) {
        self.likes_in_flight = self.likes_in_flight.saturating_sub(1);
        self.like_generation += 1;
    }
}
