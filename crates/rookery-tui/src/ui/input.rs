//! Input line
//!
//! Displays the draft being composed with its cursor, or key hints while
//! browsing.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Borders, Paragraph},
};
use rookery_app::{Feed, Mode, TextInput};

const PROMPT_WIDTH: u16 = 3; // "> "
const INPUT_LINE_OFFSET_Y: u16 = 1; // inside top border
const RIGHT_PADDING: u16 = 1; // inside right border

const BROWSE_HINT: &str = "j/k move · tab thread · l like · c comments · i comment · r reply · n post · d delete · s share · q quit";

/// Render the input line.
pub fn render(frame: &mut Frame, feed: &Feed, area: Rect) {
    let (title, draft) = match feed.mode() {
        Mode::ComposeComment { post_id } => {
            let Some(view) = feed.post(post_id) else {
                return render_hint(frame, area);
            };
            let title = match view.reply_target() {
                Some(target) => format!(" Replying to @{} (esc drops reply) ", target.handle),
                None if view.is_submitting() => " Posting... ".to_owned(),
                None => " Comment (enter to send, esc to cancel) ".to_owned(),
            };
            (title, view.draft())
        },
        Mode::ComposePost => (" New post (enter to publish, esc to cancel) ".to_owned(), feed.post_draft()),
        Mode::Browse | Mode::ConfirmDelete { .. } => return render_hint(frame, area),
    };

    render_draft(frame, &title, draft, area);
}

fn render_draft(frame: &mut Frame, title: &str, draft: &TextInput, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(title.to_owned());

    let input_text = format!("> {}", draft.text());
    let paragraph =
        Paragraph::new(input_text).style(Style::default().fg(Color::White)).block(block);

    frame.render_widget(paragraph, area);

    let available_width = area.width.saturating_sub(PROMPT_WIDTH + RIGHT_PADDING);
    let cursor_offset = u16::try_from(draft.cursor()).unwrap_or(u16::MAX).min(available_width);

    let cursor_x = area.x.saturating_add(PROMPT_WIDTH).saturating_add(cursor_offset);
    let cursor_y = area.y.saturating_add(INPUT_LINE_OFFSET_Y);
    let max_x = area.x.saturating_add(area.width).saturating_sub(RIGHT_PADDING);
    let cursor_x = cursor_x.min(max_x);

    frame.set_cursor_position((cursor_x, cursor_y));
}

fn render_hint(frame: &mut Frame, area: Rect) {
    let block = Block::default().borders(Borders::ALL);
    let paragraph =
        Paragraph::new(BROWSE_HINT).style(Style::default().fg(Color::DarkGray)).block(block);
    frame.render_widget(paragraph, area);
}
