//! Terminal UI for Rookery
//!
//! A thin shell over [`rookery_app::Driver`] that provides terminal-specific
//! I/O. All orchestration logic lives in the generic [`rookery_app::Runtime`]
//!
//! This crate only handles argument parsing, terminal input and rendering.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod cli;
pub mod terminal;
pub mod ui;

pub use cli::Args;
pub use rookery_app::{AppAction, AppEvent, Bridge, Driver, Feed, KeyInput, Runtime};
pub use terminal::{TerminalDriver, TerminalError};
