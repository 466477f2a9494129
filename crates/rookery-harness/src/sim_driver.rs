//! Simulation driver implementing the Driver trait.
//!
//! `SimDriver` provides the same interface as `TerminalDriver` but for
//! deterministic testing. It implements [`Driver`] so the same
//! [`rookery_app::Runtime`] orchestration code runs in both production and
//! simulation.

#![allow(clippy::disallowed_types, reason = "Synchronous locking operations only")]

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use rookery_app::{AppEvent, Driver, Feed, KeyInput};
use thiserror::Error;

use crate::invariants::{FeedSnapshot, InvariantRegistry};

/// Error type for simulation driver.
#[derive(Debug, Clone, Error)]
pub enum SimDriverError {
    /// Clipboard disabled with [`SimDriver::set_clipboard_available`].
    #[error("clipboard unavailable")]
    ClipboardUnavailable,
}

/// Shared state for event injection.
///
/// This allows injection and inspection from outside async contexts, and
/// after the driver has been moved into a runtime.
#[derive(Default)]
struct SharedState {
    pending_events: VecDeque<AppEvent>,
    renders: usize,
    last_frame: Option<FeedSnapshot>,
    clipboard: Vec<String>,
    clipboard_unavailable: bool,
    stopped: bool,
}

/// Simulation driver for deterministic testing.
///
/// Clones share state, so a test can keep one handle while the runtime owns
/// another.
#[derive(Clone)]
pub struct SimDriver {
    state: Arc<Mutex<SharedState>>,
    invariants: Option<Arc<InvariantRegistry>>,
}

impl Default for SimDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl SimDriver {
    /// Create a new simulation driver.
    pub fn new() -> Self {
        Self { state: Arc::new(Mutex::new(SharedState::default())), invariants: None }
    }

    /// Enable invariant checking on every render.
    #[must_use]
    pub fn with_invariants(mut self, registry: InvariantRegistry) -> Self {
        self.invariants = Some(Arc::new(registry));
        self
    }

    fn lock(&self) -> MutexGuard<'_, SharedState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Inject an `AppEvent` for processing.
    pub fn inject_event(&self, event: AppEvent) {
        self.lock().pending_events.push_back(event);
    }

    /// Inject a key press.
    pub fn inject_key(&self, key: KeyInput) {
        self.inject_event(AppEvent::Key(key));
    }

    /// Inject one key press per character.
    pub fn type_text(&self, text: &str) {
        let mut state = self.lock();
        state.pending_events.extend(text.chars().map(|c| AppEvent::Key(KeyInput::Char(c))));
    }

    /// Inject a tick event.
    pub fn inject_tick(&self) {
        self.inject_event(AppEvent::Tick);
    }

    /// Check if there are pending events to process.
    pub fn has_pending(&self) -> bool {
        !self.lock().pending_events.is_empty()
    }

    /// Make clipboard writes fail.
    pub fn set_clipboard_available(&self, available: bool) {
        self.lock().clipboard_unavailable = !available;
    }

    /// Everything copied so far, oldest first.
    pub fn clipboard(&self) -> Vec<String> {
        self.lock().clipboard.clone()
    }

    /// Number of renders performed.
    pub fn render_count(&self) -> usize {
        self.lock().renders
    }

    /// Snapshot taken at the last render.
    pub fn last_frame(&self) -> Option<FeedSnapshot> {
        self.lock().last_frame.clone()
    }

    /// Driver was stopped by the runtime.
    pub fn is_stopped(&self) -> bool {
        self.lock().stopped
    }

    /// Check invariants against Feed state.
    pub fn check_invariants(&self, feed: &Feed, context: &str) {
        if let Some(registry) = &self.invariants {
            registry.assert_all(&FeedSnapshot::from_feed(feed), context);
        }
    }
}

impl Driver for SimDriver {
    type Error = SimDriverError;

    async fn poll_event(&mut self) -> Result<Option<AppEvent>, Self::Error> {
        // Let spawned requests run before the next scripted input.
        tokio::task::yield_now().await;
        Ok(self.lock().pending_events.pop_front())
    }

    fn render(&mut self, feed: &Feed) -> Result<(), Self::Error> {
        self.check_invariants(feed, "at render");
        let mut state = self.lock();
        state.renders += 1;
        state.last_frame = Some(FeedSnapshot::from_feed(feed));
        Ok(())
    }

    fn copy_to_clipboard(&mut self, text: &str) -> Result<(), Self::Error> {
        let mut state = self.lock();
        if state.clipboard_unavailable {
            return Err(SimDriverError::ClipboardUnavailable);
        }
        state.clipboard.push(text.to_owned());
        Ok(())
    }

    fn stop(&mut self) {
        self.lock().stopped = true;
    }
}
