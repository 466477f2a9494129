//! Integration tests for Feed and Bridge behavior.
//!
//! # Oracle Pattern
//!
//! Tests drive the Feed API, push every request through the Bridge against
//! the in-memory server, and end with oracle checks that verify:
//! - Feed state reflects the server state
//! - Counts and flags agree with what the server recorded
//! - Failed requests leave local state recoverable

use rookery_app::{AppAction, AppConfig, AppEvent, Bridge, Feed, KeyInput, Mode, ThreadState};
use rookery_client::{
    ClientError, CommentId, InteractionClient, LikeTarget, MemoryClient, PostId, User, UserId,
};

struct World {
    client: MemoryClient,
    ann: UserId,
    bo: UserId,
    bo_post: PostId,
    ann_post: PostId,
    top: CommentId,
}

fn world() -> World {
    let client = MemoryClient::new();
    let ann = client.add_user(User::new("u-ann", "ann").with_name("Ann", "Lee"));
    let bo = client.add_user(User::new("u-bo", "bo"));
    client.sign_in_as(&ann);

    let bo_post = client.seed_post(&bo, "", "Morning run");
    let top = client.seed_comment(&bo, &bo_post, None, "10k today");
    let ann_post = client.seed_post(&ann, "", "Hello");

    World { client, ann, bo, bo_post, ann_post, top }
}

/// Execute requests through the Bridge until no action is left, feeding every
/// completion back into the Feed. Returns the non-request actions seen.
async fn process_actions(
    feed: &mut Feed,
    bridge: &Bridge<MemoryClient>,
    actions: Vec<AppAction>,
) -> Vec<AppAction> {
    let mut queue = std::collections::VecDeque::from(actions);
    let mut effects = Vec::new();

    while let Some(action) = queue.pop_front() {
        if action.is_request() {
            if let Some(event) = bridge.execute(action).await {
                queue.extend(feed.handle(event));
            }
        } else if action != AppAction::Render {
            effects.push(action);
        }
    }
    effects
}

async fn started(world: &World) -> (Feed, Bridge<MemoryClient>) {
    let mut feed = Feed::new(AppConfig::new("https://rookery.test"));
    let bridge = Bridge::new(world.client.clone());
    let actions = feed.start(None);
    process_actions(&mut feed, &bridge, actions).await;
    (feed, bridge)
}

async fn key(feed: &mut Feed, bridge: &Bridge<MemoryClient>, key: KeyInput) -> Vec<AppAction> {
    let actions = feed.handle(AppEvent::Key(key));
    process_actions(feed, bridge, actions).await
}

async fn type_text(feed: &mut Feed, bridge: &Bridge<MemoryClient>, text: &str) {
    for c in text.chars() {
        key(feed, bridge, KeyInput::Char(c)).await;
    }
}

#[tokio::test]
async fn start_resolves_viewer_and_loads_feed() {
    let world = world();
    let (feed, _bridge) = started(&world).await;

    assert_eq!(feed.session().user().map(|u| &u.id), Some(&world.ann));
    let ids: Vec<_> = feed.posts().iter().map(|v| v.id().clone()).collect();
    assert_eq!(ids, vec![world.ann_post.clone(), world.bo_post.clone()]);

    // Oracle: like states were fetched for every mounted post
    for view in feed.posts() {
        assert_eq!(view.like().count, 0);
        assert!(!view.like().liked);
    }
}

#[tokio::test]
async fn like_twice_returns_to_server_state() {
    let world = world();
    let (mut feed, bridge) = started(&world).await;
    feed.select_post(&world.bo_post);

    let actions = feed.toggle_like();
    process_actions(&mut feed, &bridge, actions).await;
    assert!(feed.post(&world.bo_post).unwrap().like().liked);
    assert_eq!(feed.post(&world.bo_post).unwrap().like().count, 1);

    let actions = feed.toggle_like();
    process_actions(&mut feed, &bridge, actions).await;

    // Oracle: local state matches the server after each round trip
    let view = feed.post(&world.bo_post).unwrap();
    let target = LikeTarget::Post(world.bo_post.clone());
    assert!(!view.like().liked);
    assert_eq!(view.like().count, world.client.like_count(target.clone()).await.unwrap());
    assert!(!world.client.is_liked(target).await.unwrap().liked);
}

#[tokio::test]
async fn like_count_reflects_other_users() {
    let world = world();
    world.client.seed_like(&world.bo, LikeTarget::Post(world.bo_post.clone()));
    let (mut feed, bridge) = started(&world).await;
    feed.select_post(&world.bo_post);

    let actions = feed.toggle_like();
    process_actions(&mut feed, &bridge, actions).await;

    let like = feed.post(&world.bo_post).unwrap().like();
    assert!(like.liked);
    assert_eq!(like.count, 2);
}

#[tokio::test]
async fn comment_then_refetch_shows_server_thread() {
    let world = world();
    let (mut feed, bridge) = started(&world).await;
    feed.select_post(&world.bo_post);

    key(&mut feed, &bridge, KeyInput::Char('c')).await;
    key(&mut feed, &bridge, KeyInput::Char('i')).await;
    type_text(&mut feed, &bridge, "  nice pace  ").await;
    key(&mut feed, &bridge, KeyInput::Enter).await;

    let view = feed.post(&world.bo_post).unwrap();
    assert_eq!(feed.mode(), &Mode::Browse);
    assert!(view.draft().is_blank());
    assert_eq!(view.thread_state(), ThreadState::Loaded { visible: true });

    // Oracle: the refetched thread equals the server's thread
    let server = world.client.comment_thread(world.bo_post.clone()).await.unwrap();
    assert_eq!(view.comments(), server.as_slice());
    assert_eq!(view.comment_count(), 2);
    assert!(server.iter().any(|c| c.content == "nice pace"));
}

#[tokio::test]
async fn reply_nests_under_target() {
    let world = world();
    let (mut feed, bridge) = started(&world).await;
    feed.select_post(&world.bo_post);

    key(&mut feed, &bridge, KeyInput::Char('c')).await;
    key(&mut feed, &bridge, KeyInput::Tab).await;
    key(&mut feed, &bridge, KeyInput::Char('r')).await;
    assert_eq!(feed.post(&world.bo_post).unwrap().draft().text(), "@bo ");

    type_text(&mut feed, &bridge, "congrats").await;
    key(&mut feed, &bridge, KeyInput::Enter).await;

    let view = feed.post(&world.bo_post).unwrap();
    let top = view.comments().iter().find(|c| c.id == world.top).unwrap();
    assert_eq!(top.replies.len(), 1);
    assert_eq!(top.replies[0].content, "@bo congrats");
    assert_eq!(top.replies[0].parent_id.as_ref(), Some(&world.top));
    assert!(view.reply_target().is_none());
}

#[tokio::test]
async fn failed_comment_keeps_draft_for_retry() {
    let world = world();
    let (mut feed, bridge) = started(&world).await;
    feed.select_post(&world.bo_post);

    key(&mut feed, &bridge, KeyInput::Char('i')).await;
    type_text(&mut feed, &bridge, "retry me").await;
    world.client.set_offline(true);
    key(&mut feed, &bridge, KeyInput::Enter).await;

    let view = feed.post(&world.bo_post).unwrap();
    assert_eq!(view.draft().text(), "retry me");
    assert!(!view.is_submitting());
    assert!(feed.status_message().unwrap().starts_with("Could not post comment"));

    world.client.set_offline(false);
    key(&mut feed, &bridge, KeyInput::Enter).await;

    // Oracle: exactly one comment reached the server
    let server = world.client.comment_thread(world.bo_post.clone()).await.unwrap();
    assert_eq!(server.iter().filter(|c| c.content == "retry me").count(), 1);
}

#[tokio::test]
async fn author_delete_removes_post_everywhere() {
    let world = world();
    let (mut feed, bridge) = started(&world).await;
    feed.select_post(&world.ann_post);

    key(&mut feed, &bridge, KeyInput::Char('d')).await;
    assert_eq!(feed.mode(), &Mode::ConfirmDelete { post_id: world.ann_post.clone() });
    let effects = key(&mut feed, &bridge, KeyInput::Char('y')).await;

    assert!(effects.contains(&AppAction::PostRemoved { post_id: world.ann_post.clone() }));
    assert!(feed.post(&world.ann_post).is_none());
    assert_eq!(world.client.post_count(), 1);
}

#[tokio::test]
async fn non_author_cannot_request_delete() {
    let world = world();
    let (mut feed, bridge) = started(&world).await;
    feed.select_post(&world.bo_post);

    key(&mut feed, &bridge, KeyInput::Char('d')).await;

    assert_eq!(feed.mode(), &Mode::Browse);
    assert_eq!(feed.status_message(), Some("Only the author can delete this post"));
    assert_eq!(world.client.post_count(), 2);
}

#[tokio::test]
async fn failed_delete_raises_alert_and_keeps_post() {
    let world = world();
    let (mut feed, bridge) = started(&world).await;
    feed.select_post(&world.ann_post);

    key(&mut feed, &bridge, KeyInput::Char('d')).await;
    world.client.set_offline(true);
    key(&mut feed, &bridge, KeyInput::Enter).await;

    assert!(feed.alert().unwrap().starts_with("Failed to delete post"));
    let view = feed.post(&world.ann_post).unwrap();
    assert!(!view.is_deleting());

    // Any key dismisses the alert without acting on it
    key(&mut feed, &bridge, KeyInput::Char('d')).await;
    assert!(feed.alert().is_none());
    assert_eq!(feed.mode(), &Mode::Browse);
}

#[tokio::test]
async fn share_emits_post_link() {
    let world = world();
    let (mut feed, bridge) = started(&world).await;
    feed.select_post(&world.bo_post);

    let effects = key(&mut feed, &bridge, KeyInput::Char('s')).await;

    assert_eq!(
        effects,
        vec![AppAction::CopyToClipboard { text: format!("https://rookery.test/posts/{}", world.bo_post) }]
    );
}

#[tokio::test]
async fn anonymous_like_asks_to_sign_in() {
    let world = world();
    world.client.sign_out();
    let (mut feed, bridge) = started(&world).await;
    assert!(feed.session().user().is_none());
    feed.select_post(&world.bo_post);

    let actions = feed.toggle_like();
    process_actions(&mut feed, &bridge, actions).await;

    assert_eq!(feed.status_message(), Some("Sign in to like"));
    assert!(!feed.post(&world.bo_post).unwrap().like().liked);
}

#[tokio::test]
async fn anonymous_mount_reconciles_like_count() {
    let world = world();
    world.client.sign_out();
    let listing = world.client.list_posts().await.unwrap();
    world.client.seed_like(&world.bo, LikeTarget::Post(world.bo_post.clone()));

    let mut feed = Feed::new(AppConfig::new("https://rookery.test"));
    let bridge = Bridge::new(world.client.clone());
    let _ = feed.start(None);
    let _ = feed.handle(AppEvent::SessionFailed {
        error: ClientError::Unauthorized("no token".into()),
    });
    let actions = feed.handle(AppEvent::FeedLoaded { posts: listing });
    process_actions(&mut feed, &bridge, actions).await;

    // Oracle: the count comes from the server even though the like check
    // is not available to anonymous viewers
    let view = feed.post(&world.bo_post).unwrap();
    let count = world.client.like_count(LikeTarget::Post(world.bo_post.clone())).await.unwrap();
    assert_eq!(view.like().count, count);
    assert_eq!(count, 1);
    assert!(!view.like().liked);
}

#[tokio::test]
async fn new_post_appears_at_top() {
    let world = world();
    let (mut feed, bridge) = started(&world).await;

    key(&mut feed, &bridge, KeyInput::Char('n')).await;
    type_text(&mut feed, &bridge, "Fresh").await;
    key(&mut feed, &bridge, KeyInput::Enter).await;

    assert_eq!(feed.mode(), &Mode::Browse);
    assert_eq!(feed.posts().len(), 3);
    assert_eq!(feed.posts()[0].post().content, "Fresh");
    assert_eq!(feed.posts()[0].post().author.id, world.ann);
}
