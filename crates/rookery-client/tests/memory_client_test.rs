//! Behavioral tests for the in-memory API.
//!
//! The in-memory server stands in for the remote API in every application
//! test, so its semantics must match what the real server guarantees:
//! author-only deletion, server-side counters, and tree assembly in creation
//! order.

use rookery_client::{
    ClientError, CommentId, Credentials, InteractionClient, LikeTarget, MemoryClient, NewComment,
    NewPost, PostId, User, UserId,
};

fn server_with_viewer() -> (MemoryClient, UserId, UserId) {
    let client = MemoryClient::new();
    let viewer = client.add_user(User::new("u1", "ann").with_name("Ann", "Lee"));
    let other = client.add_user(User::new("u2", "bo"));
    client.sign_in_as(&viewer);
    (client, viewer, other)
}

#[tokio::test]
async fn toggle_like_twice_restores_count() {
    let (client, _, other) = server_with_viewer();
    let post = client.seed_post(&other, "t", "body");
    let target = LikeTarget::Post(post);

    assert_eq!(client.like_count(target.clone()).await.unwrap(), 0);
    assert!(client.toggle_like(target.clone()).await.unwrap().liked);
    assert_eq!(client.like_count(target.clone()).await.unwrap(), 1);
    assert!(!client.toggle_like(target.clone()).await.unwrap().liked);
    assert_eq!(client.like_count(target).await.unwrap(), 0);
}

#[tokio::test]
async fn reply_is_nested_under_parent() {
    let (client, _, other) = server_with_viewer();
    let post = client.seed_post(&other, "t", "body");
    let top = client.seed_comment(&other, &post, None, "top");

    let reply = client
        .create_comment(NewComment {
            content: "@bo hi".into(),
            post_id: post.clone(),
            parent_id: Some(top.clone()),
        })
        .await
        .unwrap();

    let thread = client.comment_thread(post).await.unwrap();
    assert_eq!(thread.len(), 1);
    assert_eq!(thread[0].id, top);
    assert_eq!(thread[0].replies.len(), 1);
    assert_eq!(thread[0].replies[0].id, reply.id);
    assert_eq!(thread[0].replies[0].parent_id, Some(top));
}

#[tokio::test]
async fn siblings_keep_creation_order() {
    let (client, viewer, _) = server_with_viewer();
    let post = client.seed_post(&viewer, "t", "body");
    let ids: Vec<CommentId> =
        (0..4).map(|i| client.seed_comment(&viewer, &post, None, &format!("#{i}"))).collect();

    let thread = client.comment_thread(post).await.unwrap();
    let order: Vec<CommentId> = thread.into_iter().map(|c| c.id).collect();
    assert_eq!(order, ids);
}

#[tokio::test]
async fn reply_to_comment_on_other_post_rejected() {
    let (client, viewer, _) = server_with_viewer();
    let first = client.seed_post(&viewer, "a", "a");
    let second = client.seed_post(&viewer, "b", "b");
    let foreign = client.seed_comment(&viewer, &first, None, "elsewhere");

    let result = client
        .create_comment(NewComment {
            content: "x".into(),
            post_id: second,
            parent_id: Some(foreign),
        })
        .await;
    assert!(matches!(result, Err(ClientError::NotFound(_))));
}

#[tokio::test]
async fn empty_comment_rejected() {
    let (client, viewer, _) = server_with_viewer();
    let post = client.seed_post(&viewer, "t", "body");

    let result = client
        .create_comment(NewComment { content: "   ".into(), post_id: post, parent_id: None })
        .await;
    assert!(matches!(result, Err(ClientError::Validation(_))));
}

#[tokio::test]
async fn delete_requires_authorship() {
    let (client, viewer, other) = server_with_viewer();
    let theirs = client.seed_post(&other, "t", "theirs");
    let mine = client.seed_post(&viewer, "t", "mine");

    let denied = client.delete_post(theirs).await;
    assert!(matches!(denied, Err(ClientError::Unauthorized(_))));
    assert_eq!(client.post_count(), 2);

    client.delete_post(mine.clone()).await.unwrap();
    assert_eq!(client.post_count(), 1);
    assert!(matches!(client.comment_thread(mine).await, Err(ClientError::NotFound(_))));
}

#[tokio::test]
async fn offline_fails_and_counts_requests() {
    let (client, viewer, _) = server_with_viewer();
    let post = client.seed_post(&viewer, "t", "body");
    client.set_offline(true);

    let result = client.toggle_like(LikeTarget::Post(post.clone())).await;
    assert!(matches!(result, Err(ClientError::Network(_))));
    assert_eq!(client.request_count(), 1);

    client.set_offline(false);
    assert_eq!(client.like_count(LikeTarget::Post(post)).await.unwrap(), 0);
    assert_eq!(client.request_count(), 2);
}

#[tokio::test]
async fn anonymous_mutations_unauthorized() {
    let (client, viewer, _) = server_with_viewer();
    let post = client.seed_post(&viewer, "t", "body");
    client.sign_out();

    let like = client.toggle_like(LikeTarget::Post(post)).await;
    assert!(matches!(like, Err(ClientError::Unauthorized(_))));
    assert!(client.current_user().await.unwrap_err().is_unauthorized());
}

#[tokio::test]
async fn like_check_needs_viewer_but_count_is_public() {
    let (client, viewer, _) = server_with_viewer();
    let post = client.seed_post(&viewer, "t", "body");
    client.seed_like(&viewer, LikeTarget::Post(post.clone()));
    client.sign_out();

    let check = client.is_liked(LikeTarget::Post(post.clone())).await;
    assert!(matches!(check, Err(ClientError::Unauthorized(_))));
    assert_eq!(client.like_count(LikeTarget::Post(post)).await.unwrap(), 1);
}

#[tokio::test]
async fn listing_is_newest_first_with_viewer_flags() {
    let (client, viewer, other) = server_with_viewer();
    let older = client.seed_post(&other, "old", "old");
    let newer = client
        .create_post(NewPost { title: "new".into(), content: "new".into(), image_url: None })
        .await
        .unwrap();
    client.seed_like(&viewer, LikeTarget::Post(older.clone()));

    let posts = client.list_posts().await.unwrap();
    let ids: Vec<&PostId> = posts.iter().map(|p| &p.id).collect();
    assert_eq!(ids, vec![&newer.id, &older]);
    assert_eq!(posts[1].likes_count, 1);
    assert_eq!(posts[1].is_liked_by_current_user, Some(true));
    assert_eq!(posts[0].author.id, viewer);
}

#[tokio::test]
async fn login_switches_viewer() {
    let client = MemoryClient::new();
    let ann = client.add_user(User::new("u1", "ann"));
    client.add_account("ann@example.test", "secret", &ann);

    let bad = client
        .login(Credentials { email: "ann@example.test".into(), password: "nope".into() })
        .await;
    assert!(matches!(bad, Err(ClientError::Unauthorized(_))));

    let session = client
        .login(Credentials { email: "ann@example.test".into(), password: "secret".into() })
        .await
        .unwrap();
    assert_eq!(session.user.id, ann);
    assert_eq!(client.current_user().await.unwrap().id, ann);
}

#[tokio::test]
async fn demo_seed_has_nested_thread() {
    let client = MemoryClient::demo();
    let posts = client.list_posts().await.unwrap();
    let welcome = posts.iter().find(|p| p.title == "Hello rookery").unwrap();

    let thread = client.comment_thread(welcome.id.clone()).await.unwrap();
    assert_eq!(thread.len(), 2);
    assert_eq!(thread[0].replies[0].replies.len(), 1);
    assert_eq!(welcome.comments_count, 4);
}
