//! Client
//!
//! Domain model and remote API collaborator for the Rookery social network.
//! All business logic (persistence, authorization, counters) lives on the
//! server; this crate only describes the data that crosses the wire and the
//! operations the application may request.
//!
//! # Components
//!
//! - [`InteractionClient`]: Async trait over the remote API
//! - [`MemoryClient`]: Shared in-memory server model for tests and demo mode
//! - [`Post`], [`Comment`], [`User`]: Wire model (camelCase JSON)
//! - [`ClientError`]: Failure taxonomy surfaced to the application layer
//! - [`json::from_slice`]: Response decoding without a nesting limit
//!
//! # Transport (optional)
//!
//! With the `http` feature enabled, this crate also provides
//! [`http::HttpClient`], a `reqwest` implementation speaking the REST API.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod api;
mod config;
mod error;
pub mod json;
mod memory;
mod model;

#[cfg(feature = "http")]
pub mod http;

pub use api::InteractionClient;
pub use config::{ClientConfig, DEFAULT_API_URL};
pub use error::ClientError;
pub use memory::MemoryClient;
pub use model::{
    Comment, CommentId, Credentials, LikeStatus, LikeTarget, NewComment, NewPost, Post, PostId,
    Session, User, UserId,
};
