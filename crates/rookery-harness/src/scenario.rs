//! Seeded worlds for end-to-end tests.
//!
//! A [`Scenario`] is an in-memory server with a known cast and known posts,
//! wired to a [`Runtime`] over a [`SimDriver`]. Tests script key presses,
//! let in-flight requests settle, then check the feed against the server.

use rookery_app::{AppConfig, Feed, KeyInput, Runtime};
use rookery_client::{CommentId, MemoryClient, PostId, User, UserId};

use crate::{InvariantRegistry, SimDriver, SimDriverError};

/// Share origin used by scenarios.
pub const SHARE_BASE_URL: &str = "https://rookery.test";

/// Known server state.
///
/// Two users: `ann` (the viewer) and `bo`. Two posts, newest first in the
/// feed: `ann_post` by ann, then `bo_post` by bo with a two-level thread
/// (`top` and its reply `reply`).
pub struct Scenario {
    /// In-memory server.
    pub client: MemoryClient,
    /// Signed-in viewer.
    pub ann: UserId,
    /// Another user.
    pub bo: UserId,
    /// Post by bo with comments.
    pub bo_post: PostId,
    /// Post by the viewer, no comments.
    pub ann_post: PostId,
    /// Top-level comment by bo on `bo_post`.
    pub top: CommentId,
    /// Reply by ann to `top`.
    pub reply: CommentId,
}

impl Scenario {
    /// Seed the standard world, signed in as ann.
    pub fn seeded() -> Self {
        let client = MemoryClient::new();
        let ann = client.add_user(User::new("u-ann", "ann").with_name("Ann", "Lee"));
        let bo = client.add_user(User::new("u-bo", "bo").with_name("Bo", "Park"));
        client.sign_in_as(&ann);

        let bo_post = client.seed_post(&bo, "Trip", "Back from the coast");
        let top = client.seed_comment(&bo, &bo_post, None, "Photos soon");
        let reply = client.seed_comment(&ann, &bo_post, Some(&top), "@bo can't wait");
        let ann_post = client.seed_post(&ann, "", "First post");

        Self { client, ann, bo, bo_post, ann_post, top, reply }
    }

    /// Runtime over this world with invariants checked on every render.
    /// Returns the driver handle the test keeps.
    pub fn runtime(&self) -> (Runtime<SimDriver, MemoryClient>, SimDriver) {
        let driver = SimDriver::new().with_invariants(InvariantRegistry::standard());
        let feed = Feed::new(AppConfig::new(SHARE_BASE_URL));
        let runtime = Runtime::new(driver.clone(), feed, self.client.clone());
        (runtime, driver)
    }

    /// Runtime that has resolved the session and loaded the feed.
    ///
    /// # Errors
    ///
    /// Returns an error if the simulated driver fails.
    pub async fn started(&self) -> Result<(Runtime<SimDriver, MemoryClient>, SimDriver), SimDriverError> {
        let (mut runtime, driver) = self.runtime();
        runtime.start()?;
        runtime.settle().await?;
        Ok((runtime, driver))
    }
}

/// Press keys one at a time, letting requests settle after each.
///
/// Returns `true` if a key asked the runtime to quit.
///
/// # Errors
///
/// Returns an error if the simulated driver fails.
pub async fn press(
    runtime: &mut Runtime<SimDriver, MemoryClient>,
    keys: impl IntoIterator<Item = KeyInput>,
) -> Result<bool, SimDriverError> {
    for key in keys {
        if runtime.dispatch(rookery_app::AppEvent::Key(key))? || runtime.settle().await? {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Key presses for each character of `text`.
pub fn chars(text: &str) -> Vec<KeyInput> {
    text.chars().map(KeyInput::Char).collect()
}
