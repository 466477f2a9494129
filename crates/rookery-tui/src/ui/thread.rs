//! Comment thread
//!
//! Turns flattened comment rows into indented lines.

use chrono::{DateTime, Utc};
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};
use rookery_app::{relative_time, thread::CommentRow};

/// Nesting beyond this depth is drawn at this depth so deep threads stay
/// readable in narrow terminals.
pub const MAX_VISUAL_DEPTH: usize = 6;

const INDENT: &str = "  ";
const REPLY_MARKER: &str = "↳ ";

/// Two lines per comment: header and body.
pub fn lines(
    rows: &[CommentRow<'_>],
    focused: Option<usize>,
    reply_to: Option<&rookery_client::CommentId>,
    now: DateTime<Utc>,
) -> Vec<Line<'static>> {
    let mut lines = Vec::with_capacity(rows.len() * 2);

    for (index, row) in rows.iter().enumerate() {
        let comment = row.comment;
        let depth = row.depth.min(MAX_VISUAL_DEPTH);
        let indent = INDENT.repeat(depth);
        let marker = if row.depth > 0 { REPLY_MARKER } else { "" };

        let mut name_style = Style::default().fg(Color::Green).add_modifier(Modifier::BOLD);
        if focused == Some(index) {
            name_style = name_style.bg(Color::DarkGray);
        }
        let heart = if row.like.liked { "♥" } else { "♡" };

        let mut header = vec![
            Span::raw(format!("{indent}{marker}")),
            Span::styled(comment.author.display_name(), name_style),
            Span::styled(
                format!(" · {} · {heart} {}", relative_time(comment.created_at, now), row.like.count),
                Style::default().fg(Color::DarkGray),
            ),
        ];
        if reply_to == Some(&comment.id) {
            header.push(Span::styled(" (replying)", Style::default().fg(Color::Cyan)));
        }

        let body_indent = INDENT.repeat(depth) + &" ".repeat(marker.chars().count());
        lines.push(Line::from(header));
        lines.push(Line::from(format!("{body_indent}{}", comment.content)));
    }

    lines
}
