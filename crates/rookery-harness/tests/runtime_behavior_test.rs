//! End-to-end tests for feed behavior through the production runtime.
//!
//! # Test Strategy
//!
//! Each test simulates what a user does in the terminal:
//! 1. Press keys (select, like, expand, reply, delete, share)
//! 2. Process through Feed → Runtime → Bridge → in-memory API
//! 3. Let every spawned request complete
//! 4. Verify feed state and server state agree
//!
//! Invariants are checked on every render.

use rookery_app::{AppEvent, KeyInput, LikeState, Mode, Runtime, SessionState, ThreadState};
use rookery_client::{Credentials, InteractionClient, LikeTarget, MemoryClient};
use rookery_harness::{
    Scenario, SimDriver,
    scenario::{SHARE_BASE_URL, chars, press},
};

type SimRuntime = Runtime<SimDriver, MemoryClient>;

fn contents(runtime: &SimRuntime) -> Vec<String> {
    runtime.feed().posts().iter().map(|view| view.post().content.clone()).collect()
}

/// Select `bo_post` (second in the feed) and expand its thread.
async fn open_bo_thread(runtime: &mut SimRuntime) {
    press(runtime, [KeyInput::Down, KeyInput::Char('c')]).await.unwrap();
}

#[tokio::test]
async fn startup_resolves_viewer_and_loads_feed() {
    let world = Scenario::seeded();
    let (runtime, driver) = world.started().await.unwrap();

    assert!(matches!(runtime.feed().session(), SessionState::SignedIn(user) if user.id == world.ann));
    assert_eq!(contents(&runtime), vec!["First post", "Back from the coast"]);
    assert_eq!(runtime.in_flight(), 0);

    let frame = driver.last_frame().unwrap();
    assert_eq!(frame.posts.len(), 2);
    assert_eq!(frame.posts[1].like, LikeState::new(false, 0));
}

#[tokio::test]
async fn login_with_credentials_signs_in() {
    let world = Scenario::seeded();
    world.client.sign_out();
    world.client.add_account("ann@rookery.test", "pw", &world.ann);

    let (runtime, _driver) = world.runtime();
    let mut runtime = runtime
        .with_credentials(Credentials { email: "ann@rookery.test".into(), password: "pw".into() });
    runtime.start().unwrap();
    runtime.settle().await.unwrap();

    assert_eq!(runtime.feed().session().user().map(|u| u.id.clone()), Some(world.ann.clone()));
    assert_eq!(runtime.feed().posts().len(), 2);
}

#[tokio::test]
async fn anonymous_viewer_still_sees_feed() {
    let world = Scenario::seeded();
    world.client.sign_out();
    let (runtime, _driver) = world.started().await.unwrap();

    assert_eq!(runtime.feed().session(), &SessionState::Anonymous);
    assert_eq!(runtime.feed().posts().len(), 2);
    assert!(!runtime.feed().posts()[0].can_delete());
}

#[tokio::test]
async fn like_round_trip_matches_server() {
    let world = Scenario::seeded();
    let (mut runtime, _driver) = world.started().await.unwrap();
    let target = LikeTarget::Post(world.bo_post.clone());

    press(&mut runtime, [KeyInput::Down, KeyInput::Char('l')]).await.unwrap();
    let view = runtime.feed().post(&world.bo_post).unwrap();
    assert_eq!(view.like(), LikeState::new(true, 1));
    assert_eq!(world.client.like_count(target.clone()).await.unwrap(), 1);

    press(&mut runtime, chars("l")).await.unwrap();
    let view = runtime.feed().post(&world.bo_post).unwrap();
    assert_eq!(view.like(), LikeState::new(false, 0));
    assert_eq!(world.client.like_count(target).await.unwrap(), 0);
}

#[tokio::test]
async fn like_failure_leaves_count_and_reports() {
    let world = Scenario::seeded();
    let (mut runtime, _driver) = world.started().await.unwrap();
    world.client.set_offline(true);

    press(&mut runtime, chars("l")).await.unwrap();

    let view = runtime.feed().post(&world.ann_post).unwrap();
    assert_eq!(view.like(), LikeState::new(false, 0));
    assert!(runtime.feed().status_message().unwrap().starts_with("Could not update like"));
}

#[tokio::test]
async fn expanding_thread_shows_nested_rows() {
    let world = Scenario::seeded();
    let (mut runtime, _driver) = world.started().await.unwrap();
    open_bo_thread(&mut runtime).await;

    let view = runtime.feed().post(&world.bo_post).unwrap();
    assert_eq!(view.thread_state(), ThreadState::Loaded { visible: true });
    let rows: Vec<_> = view.visible_rows().iter().map(|r| (r.comment.id.clone(), r.depth)).collect();
    assert_eq!(rows, vec![(world.top.clone(), 0), (world.reply.clone(), 1)]);
    assert_eq!(view.comment_count(), 1);

    let requests = world.client.request_count();
    press(&mut runtime, chars("cc")).await.unwrap();
    assert_eq!(world.client.request_count(), requests);
    assert!(runtime.feed().post(&world.bo_post).unwrap().thread_state().is_visible());
}

#[tokio::test]
async fn failed_thread_load_collapses() {
    let world = Scenario::seeded();
    let (mut runtime, _driver) = world.started().await.unwrap();
    world.client.set_offline(true);
    open_bo_thread(&mut runtime).await;

    let view = runtime.feed().post(&world.bo_post).unwrap();
    assert_eq!(view.thread_state(), ThreadState::Collapsed);

    world.client.set_offline(false);
    press(&mut runtime, chars("c")).await.unwrap();
    assert!(runtime.feed().post(&world.bo_post).unwrap().thread_state().is_visible());
}

#[tokio::test]
async fn comment_like_round_trip() {
    let world = Scenario::seeded();
    let (mut runtime, _driver) = world.started().await.unwrap();
    open_bo_thread(&mut runtime).await;
    let post_like = runtime.feed().post(&world.bo_post).unwrap().like();

    press(&mut runtime, [KeyInput::Tab, KeyInput::Down, KeyInput::Char('l')]).await.unwrap();

    let view = runtime.feed().post(&world.bo_post).unwrap();
    assert_eq!(view.comment_like(&world.reply), Some(LikeState::new(true, 1)));
    assert_eq!(view.comment_like(&world.top), Some(LikeState::new(false, 0)));
    assert_eq!(view.like(), post_like);
    let count = world.client.like_count(LikeTarget::Comment(world.reply.clone())).await.unwrap();
    assert_eq!(count, 1);
    let post_count = world.client.like_count(LikeTarget::Post(world.bo_post.clone())).await.unwrap();
    assert_eq!(post_count, post_like.count);
}

#[tokio::test]
async fn reply_nests_under_target_after_refetch() {
    let world = Scenario::seeded();
    let (mut runtime, _driver) = world.started().await.unwrap();
    open_bo_thread(&mut runtime).await;

    press(&mut runtime, [KeyInput::Tab, KeyInput::Char('r')]).await.unwrap();
    assert_eq!(runtime.feed().mode(), &Mode::ComposeComment { post_id: world.bo_post.clone() });
    assert_eq!(runtime.feed().post(&world.bo_post).unwrap().draft().text(), "@bo ");

    press(&mut runtime, chars("nice")).await.unwrap();
    press(&mut runtime, [KeyInput::Enter]).await.unwrap();

    let thread = world.client.comment_thread(world.bo_post.clone()).await.unwrap();
    assert_eq!(thread[0].replies.len(), 2);
    assert_eq!(thread[0].replies[1].content, "@bo nice");

    let view = runtime.feed().post(&world.bo_post).unwrap();
    assert_eq!(view.rows().len(), 3);
    assert!(view.draft().is_blank());
    assert!(view.reply_target().is_none());
    assert_eq!(runtime.feed().mode(), &Mode::Browse);
}

#[tokio::test]
async fn top_level_comment_without_expanding() {
    let world = Scenario::seeded();
    let (mut runtime, _driver) = world.started().await.unwrap();

    press(&mut runtime, chars("ihello")).await.unwrap();
    press(&mut runtime, [KeyInput::Enter]).await.unwrap();

    let view = runtime.feed().post(&world.ann_post).unwrap();
    assert!(view.thread_state().is_visible());
    assert_eq!(view.comments().len(), 1);
    assert_eq!(view.comments()[0].content, "hello");
    assert_eq!(view.comments()[0].parent_id, None);
}

#[tokio::test]
async fn blank_submit_sends_nothing() {
    let world = Scenario::seeded();
    let (mut runtime, _driver) = world.started().await.unwrap();
    let requests = world.client.request_count();

    press(&mut runtime, chars("i  ")).await.unwrap();
    press(&mut runtime, [KeyInput::Enter]).await.unwrap();

    assert_eq!(world.client.request_count(), requests);
    assert_eq!(runtime.feed().status_message(), Some("Comment cannot be empty"));
}

#[tokio::test]
async fn failed_submit_keeps_draft_and_target() {
    let world = Scenario::seeded();
    let (mut runtime, _driver) = world.started().await.unwrap();
    open_bo_thread(&mut runtime).await;
    press(&mut runtime, [KeyInput::Tab, KeyInput::Char('r')]).await.unwrap();
    press(&mut runtime, chars("hi")).await.unwrap();

    world.client.set_offline(true);
    press(&mut runtime, [KeyInput::Enter]).await.unwrap();

    let view = runtime.feed().post(&world.bo_post).unwrap();
    assert_eq!(view.draft().text(), "@bo hi");
    assert_eq!(view.reply_target().map(|t| t.comment_id.clone()), Some(world.top.clone()));
    assert!(runtime.feed().status_message().unwrap().starts_with("Could not post comment"));

    world.client.set_offline(false);
    press(&mut runtime, [KeyInput::Enter]).await.unwrap();
    let thread = world.client.comment_thread(world.bo_post.clone()).await.unwrap();
    assert_eq!(thread[0].replies.len(), 2);
}

#[tokio::test]
async fn author_deletes_post_after_confirmation() {
    let world = Scenario::seeded();
    let (mut runtime, driver) = world.started().await.unwrap();

    press(&mut runtime, chars("d")).await.unwrap();
    assert_eq!(runtime.feed().mode(), &Mode::ConfirmDelete { post_id: world.ann_post.clone() });
    assert_eq!(world.client.post_count(), 2);

    press(&mut runtime, chars("y")).await.unwrap();

    assert_eq!(world.client.post_count(), 1);
    assert!(runtime.feed().post(&world.ann_post).is_none());
    assert_eq!(runtime.feed().selected_index(), 0);
    assert!(driver.last_frame().unwrap().post(&world.ann_post).is_none());
}

#[tokio::test]
async fn declining_confirmation_keeps_post() {
    let world = Scenario::seeded();
    let (mut runtime, _driver) = world.started().await.unwrap();

    press(&mut runtime, [KeyInput::Char('d'), KeyInput::Esc]).await.unwrap();

    assert_eq!(runtime.feed().mode(), &Mode::Browse);
    assert_eq!(world.client.post_count(), 2);
    assert_eq!(runtime.feed().posts().len(), 2);
}

#[tokio::test]
async fn delete_failure_alerts_and_keeps_post() {
    let world = Scenario::seeded();
    let (mut runtime, _driver) = world.started().await.unwrap();
    world.client.set_offline(true);

    press(&mut runtime, chars("dy")).await.unwrap();

    assert!(runtime.feed().alert().is_some());
    assert_eq!(runtime.feed().posts().len(), 2);
    assert_eq!(world.client.post_count(), 2);
}

#[tokio::test]
async fn non_author_is_not_offered_delete() {
    let world = Scenario::seeded();
    let (mut runtime, _driver) = world.started().await.unwrap();
    let requests = world.client.request_count();

    press(&mut runtime, [KeyInput::Down, KeyInput::Char('d'), KeyInput::Char('y')]).await.unwrap();

    assert_eq!(runtime.feed().mode(), &Mode::Browse);
    assert_eq!(world.client.request_count(), requests);
    assert_eq!(world.client.post_count(), 2);
}

#[tokio::test]
async fn share_copies_post_link() {
    let world = Scenario::seeded();
    let (mut runtime, driver) = world.started().await.unwrap();

    press(&mut runtime, chars("s")).await.unwrap();

    assert_eq!(driver.clipboard(), vec![format!("{SHARE_BASE_URL}/posts/{}", world.ann_post)]);
    assert_eq!(runtime.feed().status_message(), Some("Link copied to clipboard"));
}

#[tokio::test]
async fn share_without_clipboard_shows_link() {
    let world = Scenario::seeded();
    let (mut runtime, driver) = world.started().await.unwrap();
    driver.set_clipboard_available(false);

    press(&mut runtime, chars("s")).await.unwrap();

    let expected = format!("Link: {SHARE_BASE_URL}/posts/{}", world.ann_post);
    assert_eq!(runtime.feed().status_message(), Some(expected.as_str()));
}

#[tokio::test]
async fn compose_post_publishes_and_refreshes() {
    let world = Scenario::seeded();
    let (mut runtime, _driver) = world.started().await.unwrap();

    press(&mut runtime, chars("nHello there")).await.unwrap();
    press(&mut runtime, [KeyInput::Enter]).await.unwrap();

    assert_eq!(contents(&runtime)[0], "Hello there");
    assert_eq!(world.client.post_count(), 3);
    assert!(runtime.feed().post_draft().is_blank());
}

#[tokio::test]
async fn completion_for_unmounted_post_is_dropped() {
    let world = Scenario::seeded();
    let (mut runtime, _driver) = world.started().await.unwrap();

    runtime.dispatch(AppEvent::Key(KeyInput::Down)).unwrap();
    runtime.dispatch(AppEvent::Key(KeyInput::Char('c'))).unwrap();
    assert_eq!(runtime.in_flight(), 1);

    runtime.dispatch(AppEvent::FeedLoaded { posts: Vec::new() }).unwrap();
    runtime.settle().await.unwrap();

    assert!(runtime.feed().posts().is_empty());
    assert_eq!(runtime.in_flight(), 0);
}

#[tokio::test]
async fn concurrent_requests_all_complete() {
    let world = Scenario::seeded();
    let (mut runtime, _driver) = world.started().await.unwrap();

    for key in [KeyInput::Char('l'), KeyInput::Down, KeyInput::Char('l'), KeyInput::Char('c')] {
        runtime.dispatch(AppEvent::Key(key)).unwrap();
    }
    assert_eq!(runtime.in_flight(), 3);
    runtime.settle().await.unwrap();

    assert!(runtime.feed().post(&world.ann_post).unwrap().like().liked);
    assert!(runtime.feed().post(&world.bo_post).unwrap().like().liked);
    assert!(runtime.feed().post(&world.bo_post).unwrap().thread_state().is_visible());
}

#[tokio::test]
async fn run_loop_processes_completions_until_quit() {
    let world = Scenario::seeded();
    let (runtime, driver) = world.runtime();
    for _ in 0..20 {
        driver.inject_tick();
    }
    driver.inject_key(KeyInput::Char('q'));

    runtime.run().await.unwrap();

    assert!(driver.is_stopped());
    assert!(!driver.has_pending());
    assert_eq!(driver.last_frame().unwrap().posts.len(), 2);
}
