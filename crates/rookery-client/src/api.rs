//! Remote API abstraction.
//!
//! The [`InteractionClient`] trait decouples the application from the
//! transport. Production uses [`crate::http::HttpClient`]; tests and demo mode
//! use [`crate::MemoryClient`]. Every call is a single request/response with
//! no retry and no timeout policy: a failure is returned once.

use std::future::Future;

use crate::{
    ClientError, Comment, Credentials, LikeStatus, LikeTarget, NewComment, NewPost, Post, PostId,
    Session, User,
};

/// Remote API collaborator.
///
/// Implementations must be cheap to clone (shared connection pool or shared
/// state behind `Arc`) so each in-flight call can own a handle.
pub trait InteractionClient: Clone + Send + Sync + 'static {
    /// Like the target if not liked by the viewer, unlike it otherwise.
    fn toggle_like(
        &self,
        target: LikeTarget,
    ) -> impl Future<Output = Result<LikeStatus, ClientError>> + Send;

    /// Whether the viewer currently likes the target. Requires a signed-in
    /// viewer.
    fn is_liked(
        &self,
        target: LikeTarget,
    ) -> impl Future<Output = Result<LikeStatus, ClientError>> + Send;

    /// Current server like count for the target.
    fn like_count(&self, target: LikeTarget)
    -> impl Future<Output = Result<u64, ClientError>> + Send;

    /// Full comment tree for a post, in server order.
    fn comment_thread(
        &self,
        post_id: PostId,
    ) -> impl Future<Output = Result<Vec<Comment>, ClientError>> + Send;

    /// Create a comment, or a reply when `parent_id` is set.
    fn create_comment(
        &self,
        comment: NewComment,
    ) -> impl Future<Output = Result<Comment, ClientError>> + Send;

    /// Delete a post authored by the viewer.
    fn delete_post(&self, post_id: PostId) -> impl Future<Output = Result<(), ClientError>> + Send;

    /// Feed listing.
    fn list_posts(&self) -> impl Future<Output = Result<Vec<Post>, ClientError>> + Send;

    /// Publish a new post.
    fn create_post(&self, post: NewPost) -> impl Future<Output = Result<Post, ClientError>> + Send;

    /// Profile of the authenticated viewer.
    fn current_user(&self) -> impl Future<Output = Result<User, ClientError>> + Send;

    /// Exchange credentials for a session. Subsequent calls on this client
    /// are authenticated as the returned user.
    fn login(
        &self,
        credentials: Credentials,
    ) -> impl Future<Output = Result<Session, ClientError>> + Send;
}
