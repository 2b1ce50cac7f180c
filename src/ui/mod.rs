pub mod chat;
pub mod recipe;
pub mod widgets;

use std::str::FromStr;
use std::time::Instant;

use crate::app::App;
use crate::models::ThemeConfig;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Color,
    text::Line,
    Frame,
};

pub fn render(frame: &mut Frame, app: &mut App, theme: &ThemeConfig, now: Instant) {
    let status_height = if app.is_loading() {
        widgets::PROGRESS_HEIGHT
    } else if app.error.is_some() {
        widgets::ERROR_HEIGHT
    } else {
        0
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),             // Title and description
            Constraint::Length(3),             // URL form
            Constraint::Length(status_height), // Progress or error
            Constraint::Min(0),                // Recipe display
            Constraint::Length(1),             // Bottom keymap bar
        ])
        .split(frame.area());

    widgets::render_header(frame, chunks[0]);
    widgets::render_url_form(frame, app, theme, chunks[1]);

    if app.is_loading() {
        widgets::render_progress(frame, app, chunks[2]);
    } else if let Some(error) = &app.error {
        widgets::render_error(frame, error, chunks[2]);
    }

    if app.is_recipe_visible() {
        recipe::render_recipe_display(frame, app, theme, chunks[3]);
    }

    widgets::render_bottom_bar(frame, app, chunks[4]);

    // The chat floats over everything except the bottom bar
    let overlay = Rect {
        height: frame.area().height.saturating_sub(1),
        ..frame.area()
    };
    let visibility = app.chat.visibility(now);
    if let Some(dialog) = app.chat.dialog_mut() {
        chat::render_chat_dialog(frame, dialog, theme, visibility, overlay);
    }

    if app.show_help {
        widgets::render_help_window(frame, frame.area());
    }
}

/// Parse a configured colour name, falling back when it is not recognised.
pub fn theme_color(name: &str, fallback: Color) -> Color {
    Color::from_str(name).unwrap_or(fallback)
}

/// Number of terminal rows `lines` occupy when wrapped to `width` columns.
pub fn wrapped_height(lines: &[Line], width: usize) -> usize {
    if width == 0 {
        return lines.len();
    }

    lines
        .iter()
        .map(|line| line.width().div_ceil(width).max(1))
        .sum()
}
