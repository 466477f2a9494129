//! Modal popups
//!
//! Delete confirmation and error alerts drawn over the main layout.

use ratatui::{
    Frame,
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};
use rookery_app::Feed;
use rookery_client::PostId;

use super::centered;

const POPUP_WIDTH: u16 = 50;
const POPUP_HEIGHT: u16 = 6;

/// Ask before deleting a post.
pub fn confirm_delete(frame: &mut Frame, feed: &Feed, post_id: &PostId) {
    let preview = feed
        .post(post_id)
        .and_then(|view| view.post().content.lines().next().map(str::to_owned))
        .unwrap_or_default();

    let lines = vec![
        Line::from(Span::styled(format!("\"{preview}\""), Style::default().fg(Color::DarkGray))),
        Line::default(),
        Line::from(vec![
            Span::styled("y", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
            Span::raw(" delete   "),
            Span::styled("any key", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" cancel"),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Delete post? ")
        .border_style(Style::default().fg(Color::Red));
    draw(frame, Paragraph::new(lines).block(block));
}

/// Error that must be acknowledged.
pub fn alert(frame: &mut Frame, message: &str) {
    let lines = vec![
        Line::from(message.to_owned()),
        Line::default(),
        Line::from(Span::styled("press any key", Style::default().fg(Color::DarkGray))),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Error ")
        .border_style(Style::default().fg(Color::Red));
    draw(frame, Paragraph::new(lines).block(block));
}

fn draw(frame: &mut Frame, paragraph: Paragraph<'_>) {
    let area = centered(frame.area(), POPUP_WIDTH, POPUP_HEIGHT);
    frame.render_widget(Clear, area);
    frame.render_widget(paragraph.alignment(Alignment::Center).wrap(Wrap { trim: true }), area);
}
