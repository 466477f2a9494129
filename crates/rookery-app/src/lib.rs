//! Application layer for Rookery
//!
//! Pure state machines and generic runtime for the feed and post
//! interactions, enabling deterministic simulation testing with the same code
//! that runs in production.
//!
//! # Components
//!
//! - [`Feed`]: Feed state machine (session, selection, modes, key mapping)
//! - [`PostView`]: Per-post state machine (likes, thread, comments, delete)
//! - [`Bridge`]: API bridge (translates actions into client calls)
//! - [`Driver`]: Trait for platform-specific I/O abstraction
//! - [`Runtime`]: Generic orchestration loop using Driver

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod action;
mod bridge;
mod config;
mod driver;
mod event;
mod feed;
mod input;
mod post_view;
mod runtime;
mod state;
pub mod thread;
mod time;

pub use action::AppAction;
pub use bridge::Bridge;
pub use config::{AppConfig, DEFAULT_SHARE_BASE_URL};
pub use driver::Driver;
pub use event::AppEvent;
pub use feed::Feed;
pub use input::{KeyInput, TextInput};
pub use post_view::PostView;
pub use runtime::Runtime;
pub use state::{Focus, LikeState, Mode, ReplyTarget, SessionState, ThreadState};
pub use time::relative_time;
