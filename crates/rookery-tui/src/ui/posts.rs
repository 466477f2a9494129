//! Post list
//!
//! Displays the feed, newest first, with the selection marker.

use chrono::{DateTime, Utc};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
};
use rookery_app::{Feed, Focus, relative_time};

const SELECTED_PREFIX: &str = "> ";
const UNSELECTED_PREFIX: &str = "  ";
const BORDER_SIZE: u16 = 2;
const LINES_PER_POST: usize = 3;

/// Render the post list.
pub fn render(frame: &mut Frame, feed: &Feed, now: DateTime<Utc>, area: Rect) {
    let title = if feed.is_loading() { " Feed (loading) " } else { " Feed " };
    let border_style = if feed.focus() == Focus::Posts {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let block = Block::default().borders(Borders::ALL).title(title).border_style(border_style);

    if feed.posts().is_empty() {
        let empty = ListItem::new(Line::from(Span::styled(
            if feed.is_loading() { "Loading..." } else { "No posts yet. Press n to write one." },
            Style::default().fg(Color::DarkGray),
        )));
        frame.render_widget(List::new(vec![empty]).block(block), area);
        return;
    }

    let items: Vec<ListItem> = feed
        .posts()
        .iter()
        .enumerate()
        .map(|(index, view)| {
            let post = view.post();
            let selected = index == feed.selected_index();
            let (prefix, name_style) = if selected {
                (SELECTED_PREFIX, Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
            } else {
                (UNSELECTED_PREFIX, Style::default().fg(Color::Green))
            };

            let like = view.like();
            let heart = if like.liked { "♥" } else { "♡" };
            let comments = view.comment_count();
            let noun = if comments == 1 { "comment" } else { "comments" };
            let summary = post.content.lines().next().unwrap_or_default();
            let headline = if post.title.is_empty() { summary } else { post.title.as_str() };

            ListItem::new(vec![
                Line::from(vec![
                    Span::raw(prefix),
                    Span::styled(post.author.display_name(), name_style),
                    Span::styled(
                        format!(" · {}", relative_time(post.created_at, now)),
                        Style::default().fg(Color::DarkGray),
                    ),
                ]),
                Line::from(vec![Span::raw(UNSELECTED_PREFIX), Span::raw(headline.to_owned())]),
                Line::from(Span::styled(
                    format!("{UNSELECTED_PREFIX}{heart} {}  {comments} {noun}", like.count),
                    Style::default().fg(Color::DarkGray),
                )),
            ])
        })
        .collect();

    // Keep the selected post on screen.
    let visible_posts = (area.height.saturating_sub(BORDER_SIZE) as usize / LINES_PER_POST).max(1);
    let skip = (feed.selected_index() + 1).saturating_sub(visible_posts);
    let visible_items: Vec<_> = items.into_iter().skip(skip).collect();

    frame.render_widget(List::new(visible_items).block(block), area);
}
