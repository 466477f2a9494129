//! Selected post
//!
//! Shows the full post, its like state, share link and, when expanded, the
//! comment thread.

use chrono::{DateTime, Utc};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use rookery_app::{Feed, Focus, ThreadState, relative_time};

use super::thread;

const BORDER_SIZE: u16 = 2;

/// Render the selected post.
pub fn render(frame: &mut Frame, feed: &Feed, now: DateTime<Utc>, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" Post ");

    let Some(view) = feed.selected_post() else {
        let hint = Paragraph::new(Line::from(Span::styled(
            "Nothing selected",
            Style::default().fg(Color::DarkGray),
        )))
        .block(block);
        frame.render_widget(hint, area);
        return;
    };

    let post = view.post();
    let dim = Style::default().fg(Color::DarkGray);
    let mut lines = vec![Line::from(vec![
        Span::styled(
            post.author.display_name(),
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!(" @{} · {}", post.author.handle(), relative_time(post.created_at, now)), dim),
    ])];
    if !post.title.is_empty() {
        lines.push(Line::from(Span::styled(
            post.title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )));
    }
    lines.extend(post.content.lines().map(|l| Line::from(l.to_owned())));
    if let Some(image_url) = &post.image_url {
        lines.push(Line::from(Span::styled(format!("[image] {image_url}"), dim)));
    }
    lines.push(Line::default());

    let like = view.like();
    let (heart, heart_style) = if like.liked {
        ("♥", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))
    } else {
        ("♡", Style::default())
    };
    let mut actions = vec![
        Span::styled(format!("{heart} {}", like.count), heart_style),
        Span::raw(format!("   {} comments", view.comment_count())),
    ];
    if view.is_deleting() {
        actions.push(Span::styled("   deleting...", Style::default().fg(Color::Yellow)));
    } else if view.can_delete() {
        actions.push(Span::styled("   d delete", dim));
    }
    lines.push(Line::from(actions));
    lines.push(Line::from(Span::styled(format!("share: {}", view.share_url()), dim)));
    lines.push(Line::default());

    match view.thread_state() {
        ThreadState::Collapsed => {
            lines.push(Line::from(Span::styled("c show comments", dim)));
        },
        ThreadState::Loading => {
            lines.push(Line::from(Span::styled("Loading comments...", dim)));
        },
        ThreadState::Loaded { visible: false } => {
            lines.push(Line::from(Span::styled("c show comments", dim)));
        },
        ThreadState::Loaded { visible: true } => {
            let rows = view.visible_rows();
            if rows.is_empty() {
                lines.push(Line::from(Span::styled("No comments yet. Press i to add one.", dim)));
            }
            let focused = match feed.focus() {
                Focus::Thread { row } => Some(row),
                Focus::Posts => None,
            };
            let reply_to = view.reply_target().map(|target| &target.comment_id);
            lines.extend(thread::lines(&rows, focused, reply_to, now));
        },
    }

    // Keep the focused comment on screen. Thread rows start after the header.
    let header_len = lines.len().saturating_sub(view.visible_rows().len() * 2);
    let visible_height = area.height.saturating_sub(BORDER_SIZE) as usize;
    let scroll = match feed.focus() {
        Focus::Thread { row } => (header_len + row * 2 + 2).saturating_sub(visible_height),
        Focus::Posts => 0,
    };

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((u16::try_from(scroll).unwrap_or(u16::MAX), 0));
    frame.render_widget(paragraph, area);
}
