use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::chat::ChatDialog;
use crate::models::{Message, MessageRole, ThemeConfig};

const DIALOG_WIDTH: u16 = 52;
const DIALOG_HEIGHT: u16 = 26;

/// Visual treatment for one message, chosen by its role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageStyle {
    pub alignment: Alignment,
    pub color: Color,
    pub badge: &'static str,
    pub label: &'static str,
}

pub fn message_style(role: MessageRole, theme: &ThemeConfig) -> MessageStyle {
    match role {
        MessageRole::User => MessageStyle {
            alignment: Alignment::Right,
            color: super::theme_color(&theme.user_message_color, Color::Blue),
            badge: " U ",
            label: "You",
        },
        MessageRole::Assistant => MessageStyle {
            alignment: Alignment::Left,
            color: super::theme_color(&theme.assistant_message_color, Color::Green),
            badge: " A ",
            label: "Assistant",
        },
    }
}

pub fn message_lines(message: &Message, theme: &ThemeConfig) -> Vec<Line<'static>> {
    let style = message_style(message.role, theme);
    let badge = Span::styled(
        style.badge,
        Style::default()
            .fg(Color::Black)
            .bg(style.color)
            .add_modifier(Modifier::BOLD),
    );
    let label = Span::styled(
        style.label,
        Style::default().fg(style.color).add_modifier(Modifier::BOLD),
    );
    let time = Span::styled(
        message
            .sent_at
            .with_timezone(&chrono::Local)
            .format("%H:%M")
            .to_string(),
        Style::default().fg(Color::DarkGray),
    );

    let header = match message.role {
        MessageRole::User => Line::from(vec![time, Span::raw(" "), label, Span::raw(" "), badge]),
        MessageRole::Assistant => Line::from(vec![badge, Span::raw(" "), label, Span::raw(" "), time]),
    };

    let mut lines = vec![header.alignment(style.alignment)];
    for content_line in message.content.lines() {
        lines.push(
            Line::from(Span::styled(
                content_line.to_string(),
                Style::default().fg(style.color),
            ))
            .alignment(style.alignment),
        );
    }
    lines.push(Line::from(""));
    lines
}

/// Area of the floating dialog, shrunk towards the bottom edge by `visibility`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn dialog_area(area: Rect, visibility: f32) -> Rect {
    let width = DIALOG_WIDTH.min(area.width);
    let full_height = DIALOG_HEIGHT.min(area.height);
    let height = (f32::from(full_height) * visibility.clamp(0.0, 1.0)).round() as u16;

    Rect {
        x: area.x + area.width - width,
        y: area.y + area.height - height,
        width,
        height,
    }
}

pub fn render_chat_dialog(
    frame: &mut Frame,
    dialog: &mut ChatDialog,
    theme: &ThemeConfig,
    visibility: f32,
    area: Rect,
) {
    let popup = dialog_area(area, visibility);
    // Too small to draw borders and the input box
    if popup.height < 6 || popup.width < 12 {
        return;
    }

    let border_style = Style::default().fg(super::theme_color(&theme.border_color, Color::Cyan));
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Recipe Assistant ")
        .border_style(border_style);
    let inner = block.inner(popup);
    frame.render_widget(Clear, popup);
    frame.render_widget(block, popup);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Conversation
            Constraint::Length(1), // Loading indicator
            Constraint::Length(3), // Input
        ])
        .split(inner);

    render_messages(frame, dialog, theme, chunks[0]);

    if dialog.is_loading() {
        let thinking = Paragraph::new("Thinking...")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC));
        frame.render_widget(thinking, chunks[1]);
    }

    render_input(frame, dialog, border_style, chunks[2]);
}

fn render_messages(frame: &mut Frame, dialog: &mut ChatDialog, theme: &ThemeConfig, area: Rect) {
    let lines: Vec<Line> = dialog
        .messages()
        .iter()
        .flat_map(|message| message_lines(message, theme))
        .collect();

    let max_scroll = super::wrapped_height(&lines, area.width as usize)
        .saturating_sub(area.height as usize);
    dialog.scroll_offset = dialog.scroll_offset.min(max_scroll);

    let conversation = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((u16::try_from(dialog.scroll_offset).unwrap_or(u16::MAX), 0));
    frame.render_widget(conversation, area);
}

fn render_input(frame: &mut Frame, dialog: &ChatDialog, border_style: Style, area: Rect) {
    let (text, style) = if dialog.input.is_empty() {
        ("Type your message...", Style::default().fg(Color::Gray))
    } else if dialog.is_loading() {
        (dialog.input.as_str(), Style::default().fg(Color::DarkGray))
    } else {
        (
            dialog.input.as_str(),
            Style::default().add_modifier(Modifier::BOLD),
        )
    };

    let send_hint = if dialog.can_submit() { " Enter ↵ " } else { "" };
    let input = Paragraph::new(text).style(style).block(
        Block::default()
            .borders(Borders::ALL)
            .title_bottom(Line::from(send_hint).right_aligned())
            .border_style(border_style),
    );

    frame.render_widget(input, area);
}
