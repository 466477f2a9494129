//! Status bar
//!
//! Displays the session and the latest status message.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};
use rookery_app::{Feed, SessionState};

/// Render the status bar.
pub fn render(frame: &mut Frame, feed: &Feed, area: Rect) {
    let session = match feed.session() {
        SessionState::Resolving => Span::styled("Signing in...", Style::default().fg(Color::Yellow)),
        SessionState::Anonymous => Span::styled("Anonymous", Style::default().fg(Color::Red)),
        SessionState::SignedIn(user) => Span::styled(
            format!("@{}", user.handle()),
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ),
    };

    let message = feed.status_message().map_or_else(String::new, |message| format!(" | {message}"));

    let status_line = Line::from(vec![Span::raw(" "), session, Span::raw(message)]);

    let paragraph =
        Paragraph::new(status_line).style(Style::default().bg(Color::DarkGray).fg(Color::White));

    frame.render_widget(paragraph, area);
}
