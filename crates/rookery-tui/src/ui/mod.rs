//! UI rendering
//!
//! Rendering functions that convert Feed state into terminal output using
//! ratatui widgets. All functions are pure (no I/O), taking state and
//! returning widget trees. The current time is passed in so relative
//! timestamps render deterministically.

mod input;
mod popup;
mod post;
mod posts;
mod status;
mod thread;

use chrono::{DateTime, Utc};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
};
use rookery_app::{Feed, Mode};

pub use thread::MAX_VISUAL_DEPTH;

/// Render the entire UI.
pub fn render(frame: &mut Frame, feed: &Feed, now: DateTime<Utc>) {
    const MAIN_AREA_MIN_HEIGHT: u16 = 3;
    const INPUT_HEIGHT: u16 = 3;
    const STATUS_HEIGHT: u16 = 1;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(MAIN_AREA_MIN_HEIGHT),
            Constraint::Length(INPUT_HEIGHT),
            Constraint::Length(STATUS_HEIGHT),
        ])
        .split(frame.area());

    let [main_area, input_area, status_area] = chunks.as_ref() else {
        return;
    };

    render_main_area(frame, feed, now, *main_area);
    input::render(frame, feed, *input_area);
    status::render(frame, feed, *status_area);

    if let Mode::ConfirmDelete { post_id } = feed.mode() {
        popup::confirm_delete(frame, feed, post_id);
    }
    if let Some(alert) = feed.alert() {
        popup::alert(frame, alert);
    }
}

/// Render the main area (post list + selected post).
fn render_main_area(frame: &mut Frame, feed: &Feed, now: DateTime<Utc>, area: Rect) {
    const POST_LIST_PERCENT: u16 = 35;
    const POST_AREA_MIN_WIDTH: u16 = 30;

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(POST_LIST_PERCENT), Constraint::Min(POST_AREA_MIN_WIDTH)])
        .split(area);

    let [list_area, post_area] = chunks.as_ref() else {
        return;
    };

    posts::render(frame, feed, now, *list_area);
    post::render(frame, feed, now, *post_area);
}

/// Rectangle of `width` x `height` centered in `area`, clamped to fit.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
