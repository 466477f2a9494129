//! Invariant checking for deterministic simulation testing.
//!
//! Invariants are properties that must always hold during execution. Unlike
//! example-based tests that check specific scenarios, invariants verify
//! behavioral properties across all possible execution paths.
//!
//! # Architecture
//!
//! The invariant system extracts observable state from a
//! [`rookery_app::Feed`] into a [`FeedSnapshot`], then runs registered
//! [`Invariant`] checks against it. Violations trigger panics with detailed
//! context for debugging.
//!
//! # Usage
//!
//! ```ignore
//! let registry = InvariantRegistry::standard();
//! let snapshot = FeedSnapshot::from_feed(&feed);
//! registry.check_all(&snapshot)?;
//! ```

mod checks;
mod snapshot;

pub use checks::{
    CommentCountConsistent, DeletedPostsAbsent, ModeTargetsPresent, ReplyTargetInThread,
    SelectionInBounds,
};
pub use snapshot::{FeedSnapshot, PostSnapshot};

/// Invariant check result.
pub type InvariantResult = Result<(), Violation>;

/// Identifies which invariant was violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InvariantKind {
    /// See [`SelectionInBounds`].
    SelectionInBounds,
    /// See [`DeletedPostsAbsent`].
    DeletedPostsAbsent,
    /// See [`ReplyTargetInThread`].
    ReplyTargetInThread,
    /// See [`CommentCountConsistent`].
    CommentCountConsistent,
    /// See [`ModeTargetsPresent`].
    ModeTargetsPresent,
}

impl std::fmt::Display for InvariantKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::SelectionInBounds => "selection_in_bounds",
            Self::DeletedPostsAbsent => "deleted_posts_absent",
            Self::ReplyTargetInThread => "reply_target_in_thread",
            Self::CommentCountConsistent => "comment_count_consistent",
            Self::ModeTargetsPresent => "mode_targets_present",
        };
        f.write_str(name)
    }
}

/// Invariant violation with context.
#[derive(Debug, Clone)]
pub struct Violation {
    /// Which invariant was violated.
    pub invariant: InvariantKind,
    /// Description of what went wrong.
    pub message: String,
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.invariant, self.message)
    }
}

impl std::error::Error for Violation {}

/// An invariant that can be checked against feed state.
///
/// Invariants are behavioral properties that must always hold.
/// They capture WHAT must be true, not specific test scenarios.
pub trait Invariant: Send + Sync {
    /// Which invariant this is, for error reporting.
    fn kind(&self) -> InvariantKind;

    /// Check the invariant against the current state.
    ///
    /// Returns `Ok(())` if the invariant holds, or a [`Violation`]
    /// describing what went wrong.
    fn check(&self, state: &FeedSnapshot) -> InvariantResult;
}

/// Registry of invariants to check.
///
/// Collects multiple invariants and runs them all against feed state.
/// Use [`InvariantRegistry::standard()`] for the full standard set.
pub struct InvariantRegistry {
    invariants: Vec<Box<dyn Invariant>>,
}

impl Default for InvariantRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl InvariantRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self { invariants: Vec::new() }
    }

    /// Create a registry with the standard feed invariants.
    ///
    /// Includes:
    /// - [`SelectionInBounds`]: selection points at an existing post or row
    /// - [`DeletedPostsAbsent`]: deleted posts leave the feed, no duplicates
    /// - [`ReplyTargetInThread`]: reply targets exist in the loaded thread
    /// - [`CommentCountConsistent`]: displayed count matches loaded thread
    /// - [`ModeTargetsPresent`]: modes refer to posts in the feed
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.add(SelectionInBounds);
        registry.add(DeletedPostsAbsent);
        registry.add(ReplyTargetInThread);
        registry.add(CommentCountConsistent);
        registry.add(ModeTargetsPresent);
        registry
    }

    /// Add an invariant to the registry.
    pub fn add<I: Invariant + 'static>(&mut self, invariant: I) {
        self.invariants.push(Box::new(invariant));
    }

    /// Check all invariants against the given state.
    ///
    /// Returns `Ok(())` if all invariants hold, or all violations found.
    pub fn check_all(&self, state: &FeedSnapshot) -> Result<(), Vec<Violation>> {
        let violations: Vec<_> =
            self.invariants.iter().filter_map(|inv| inv.check(state).err()).collect();

        if violations.is_empty() { Ok(()) } else { Err(violations) }
    }

    /// Check all invariants, panicking on first violation.
    ///
    /// Use this in tests where you want immediate failure with context.
    pub fn assert_all(&self, state: &FeedSnapshot, context: &str) {
        if let Err(violations) = self.check_all(state) {
            for violation in &violations {
                tracing::error!(invariant = %violation.invariant, context, "{}", violation.message);
            }
            let messages: Vec<_> = violations.iter().map(|v| v.to_string()).collect();
            panic!("Invariant violation {context}:\n  {}", messages.join("\n  "));
        }
    }

    /// Number of registered invariants.
    pub fn len(&self) -> usize {
        self.invariants.len()
    }

    /// Check if registry is empty.
    pub fn is_empty(&self) -> bool {
        self.invariants.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_registry_has_invariants() {
        let registry = InvariantRegistry::standard();
        assert!(!registry.is_empty());
        assert_eq!(registry.len(), 5);
    }

    #[test]
    fn empty_snapshot_passes_invariants() {
        let registry = InvariantRegistry::standard();
        let snapshot = FeedSnapshot::empty();
        assert!(registry.check_all(&snapshot).is_ok());
    }
}
