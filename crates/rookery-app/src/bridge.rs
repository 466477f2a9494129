//! API-to-Application translation layer.
//!
//! The [`Bridge`] wraps an [`InteractionClient`] and adapts it to the
//! application lifecycle.
//!
//! # Responsibilities
//!
//! - Converts request [`crate::AppAction`]s into client calls.
//! - Converts each call's result, success or failure, back into exactly one
//!   [`crate::AppEvent`] carrying enough context (post id, like target) to
//!   route it to the view that issued the request.

use rookery_client::{ClientError, InteractionClient, LikeTarget};

use crate::{AppAction, AppEvent};

/// Bridge between application state machines and the remote API.
///
/// Cheap to clone; each in-flight request runs on its own clone.
#[derive(Debug, Clone)]
pub struct Bridge<C> {
    client: C,
}

impl<C: InteractionClient> Bridge<C> {
    /// Wrap a client.
    pub fn new(client: C) -> Self {
        Self { client }
    }

    /// Underlying client.
    pub fn client(&self) -> &C {
        &self.client
    }

    /// Execute a request action and translate its outcome.
    ///
    /// Returns `None` for actions that do not touch the API.
    pub async fn execute(&self, action: AppAction) -> Option<AppEvent> {
        let event = match action {
            AppAction::ResolveSession => match self.client.current_user().await {
                Ok(user) => AppEvent::SessionStarted { user },
                Err(error) => AppEvent::SessionFailed { error },
            },
            AppAction::Login { credentials } => match self.client.login(credentials).await {
                Ok(session) => AppEvent::SessionStarted { user: session.user },
                Err(error) => AppEvent::SessionFailed { error },
            },
            AppAction::LoadFeed => match self.client.list_posts().await {
                Ok(posts) => AppEvent::FeedLoaded { posts },
                Err(error) => AppEvent::FeedFailed { error },
            },
            AppAction::CreatePost { post } => match self.client.create_post(post).await {
                Ok(post) => AppEvent::PostCreated { post },
                Err(error) => AppEvent::PostCreateFailed { error },
            },
            AppAction::FetchLikeStatus { post_id, generation, signed_in } => {
                match self.like_status(LikeTarget::Post(post_id.clone()), signed_in).await {
                    Ok((liked, count)) => {
                        AppEvent::LikeStatusLoaded { post_id, generation, liked, count }
                    },
                    Err(error) => AppEvent::LikeStatusFailed { post_id, error },
                }
            },
            AppAction::ToggleLike { post_id, target } => {
                match self.client.toggle_like(target.clone()).await {
                    Ok(status) => AppEvent::LikeToggled { post_id, target, liked: status.liked },
                    Err(error) => AppEvent::LikeFailed { post_id, target, error },
                }
            },
            AppAction::LoadThread { post_id } => {
                match self.client.comment_thread(post_id.clone()).await {
                    Ok(comments) => AppEvent::ThreadLoaded { post_id, comments },
                    Err(error) => AppEvent::ThreadFailed { post_id, error },
                }
            },
            AppAction::SubmitComment { comment } => {
                let post_id = comment.post_id.clone();
                match self.client.create_comment(comment).await {
                    Ok(comment) => AppEvent::CommentCreated { post_id, comment },
                    Err(error) => AppEvent::CommentFailed { post_id, error },
                }
            },
            AppAction::DeletePost { post_id } => {
                match self.client.delete_post(post_id.clone()).await {
                    Ok(()) => AppEvent::PostDeleted { post_id },
                    Err(error) => AppEvent::DeleteFailed { post_id, error },
                }
            },
            AppAction::Render
            | AppAction::Quit
            | AppAction::CopyToClipboard { .. }
            | AppAction::PostRemoved { .. } => return None,
        };
        Some(event)
    }

    /// Like flag and count for `target`. The flag check is authenticated, so
    /// it is skipped for anonymous viewers.
    async fn like_status(
        &self,
        target: LikeTarget,
        signed_in: bool,
    ) -> Result<(bool, u64), ClientError> {
        let liked = if signed_in { self.client.is_liked(target.clone()).await?.liked } else { false };
        let count = self.client.like_count(target).await?;
        Ok((liked, count))
    }
}
