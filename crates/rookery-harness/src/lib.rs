//! Deterministic simulation harness for the Rookery application layer.
//!
//! A scripted [`SimDriver`] and the in-memory API let the production
//! [`rookery_app::Runtime`] run end to end without a terminal or a network.
//!
//! # Invariant Testing
//!
//! The `invariants` module provides behavioral testing through invariant
//! checks. Invariants verify WHAT must be true across all execution paths, not
//! specific scenarios. Use [`InvariantRegistry::standard()`] for the full
//! feed invariant set.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod invariants;
pub mod scenario;
pub mod sim_driver;

pub use invariants::{
    CommentCountConsistent, DeletedPostsAbsent, FeedSnapshot, Invariant, InvariantKind,
    InvariantRegistry, InvariantResult, ModeTargetsPresent, PostSnapshot, ReplyTargetInThread,
    SelectionInBounds, Violation,
};
pub use scenario::Scenario;
pub use sim_driver::{SimDriver, SimDriverError};
