//! Driver trait for abstracting I/O operations.
//!
//! The [`Driver`] trait decouples the application runtime from specific I/O
//! implementations. Each frontend implements the trait to provide
//! platform-specific I/O, while the generic [`crate::Runtime`] handles all
//! orchestration.

use std::future::Future;

use crate::{AppEvent, Feed};

/// Abstracts terminal-side I/O for the application runtime.
///
/// API traffic is not part of the driver: it flows through the
/// [`Bridge`](crate::Bridge). The driver only supplies user input, draws the
/// feed and reaches the clipboard.
///
/// # Implementations
///
/// - **TUI**: Uses crossterm for terminal events, ratatui for drawing
/// - **Simulation**: Scripted events and recorded renders
pub trait Driver: Send {
    /// Platform-specific error type.
    type Error: std::error::Error + Send + 'static;

    /// Poll for the next input event.
    ///
    /// Returns the next event or `None` if no events are ready.
    fn poll_event(&mut self) -> impl Future<Output = Result<Option<AppEvent>, Self::Error>> + Send;

    /// Render the application state.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    fn render(&mut self, feed: &Feed) -> Result<(), Self::Error>;

    /// Place text on the system clipboard.
    ///
    /// # Errors
    ///
    /// Returns an error if no clipboard is reachable. The runtime reports
    /// this to the user and keeps running.
    fn copy_to_clipboard(&mut self, text: &str) -> Result<(), Self::Error>;

    /// Restore the terminal and clean up resources.
    fn stop(&mut self);
}
