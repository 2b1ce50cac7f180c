use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, Focus};
use crate::models::ThemeConfig;

/// Gauge, task list and borders.
pub const PROGRESS_HEIGHT: u16 = 9;
pub const ERROR_HEIGHT: u16 = 3;

const URL_PLACEHOLDER: &str = "https://example.com/recipe";

pub fn render_header(frame: &mut Frame, area: Rect) {
    let header = Paragraph::new(vec![
        Line::from(Span::styled(
            "Recipe Extractor",
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "Enter a recipe URL to extract the details",
            Style::default().fg(Color::DarkGray),
        )),
    ]);

    frame.render_widget(header, area);
}

pub fn render_url_form(frame: &mut Frame, app: &App, theme: &ThemeConfig, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(16)])
        .split(area);

    let focused = app.focus == Focus::UrlInput && !app.chat.is_open();
    let border_color = if focused {
        super::theme_color(&theme.border_color, Color::Cyan)
    } else {
        Color::DarkGray
    };

    let (input_text, input_style) = if app.url_input.is_empty() {
        (URL_PLACEHOLDER, Style::default().fg(Color::Gray))
    } else {
        (
            app.url_input.as_str(),
            Style::default().add_modifier(Modifier::BOLD),
        )
    };

    let input = Paragraph::new(input_text).style(input_style).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Recipe URL ")
            .border_style(Style::default().fg(border_color)),
    );
    frame.render_widget(input, chunks[0]);

    let (label, style) = if app.is_loading() {
        (
            "Processing...",
            Style::default().fg(Color::DarkGray),
        )
    } else {
        (
            "Process",
            Style::default().fg(Color::Black).bg(Color::Cyan).add_modifier(Modifier::BOLD),
        )
    };
    let button = Paragraph::new(label)
        .alignment(Alignment::Center)
        .style(style)
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::DarkGray)));
    frame.render_widget(button, chunks[1]);
}

pub fn task_lines(app: &App) -> Vec<Line<'static>> {
    app.progress
        .tasks()
        .iter()
        .map(|task| {
            if task.completed {
                Line::from(vec![
                    Span::styled(" ✓ ", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
                    Span::raw(task.name),
                ])
            } else {
                Line::from(vec![
                    Span::styled(" · ", Style::default().fg(Color::DarkGray)),
                    Span::styled(task.name, Style::default().fg(Color::DarkGray)),
                ])
            }
        })
        .collect()
}

pub fn render_progress(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Extracting ")
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1), Constraint::Min(0)])
        .split(inner);

    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(Color::Green).bg(Color::Black))
        .percent(app.progress.percent());
    frame.render_widget(gauge, chunks[0]);

    frame.render_widget(Paragraph::new(task_lines(app)), chunks[2]);
}

pub fn render_error(frame: &mut Frame, error: &str, area: Rect) {
    let paragraph = Paragraph::new(error)
        .style(Style::default().fg(Color::Red))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        )
        .wrap(Wrap { trim: true });

    frame.render_widget(paragraph, area);
}

pub fn render_bottom_bar(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(12)])
        .split(area);

    let (text, style) = if app.exit_pending {
        (
            "Press Ctrl+C again to exit, Esc to cancel",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )
    } else if app.chat.is_open() {
        (
            "Enter: Send | PgUp/PgDn: Scroll | Esc: Close chat | Ctrl+C: Quit",
            Style::default().fg(Color::DarkGray),
        )
    } else {
        (
            "Enter: Process | Tab: Focus | ←/→: Tabs | Ctrl+T: Chat | Ctrl+H: Help | Ctrl+C: Quit",
            Style::default().fg(Color::DarkGray),
        )
    };

    let bar = Paragraph::new(text)
        .alignment(Alignment::Center)
        .style(style);
    frame.render_widget(bar, chunks[0]);

    // Launcher button
    let launcher = if app.chat.is_open() { "[ Close ]" } else { "[ Chat ]" };
    let launcher = Paragraph::new(launcher)
        .alignment(Alignment::Right)
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));
    frame.render_widget(launcher, chunks[1]);
}

pub fn render_help_window(frame: &mut Frame, area: Rect) {
    let help_text = vec![
        Line::from(Span::styled(
            "Recipe Extractor - Keyboard Shortcuts",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled("General:", Style::default().add_modifier(Modifier::BOLD))),
        Line::from("  Ctrl+H        - Show/hide this help"),
        Line::from("  Ctrl+T        - Open/close the recipe assistant"),
        Line::from("  Ctrl+Q        - Quit application"),
        Line::from("  Ctrl+C        - Quit application (press twice)"),
        Line::from(""),
        Line::from(Span::styled("Recipe:", Style::default().add_modifier(Modifier::BOLD))),
        Line::from("  Enter         - Process the URL"),
        Line::from("  Tab           - Switch between URL field and recipe"),
        Line::from("  Left/Right    - Change recipe tab"),
        Line::from("  Up/Down       - Scroll recipe"),
        Line::from(""),
        Line::from(Span::styled("Chat:", Style::default().add_modifier(Modifier::BOLD))),
        Line::from("  Enter         - Send message"),
        Line::from("  PgUp/PgDn     - Scroll conversation"),
        Line::from("  Esc           - Close chat"),
        Line::from(""),
        Line::from(Span::styled(
            "Press Ctrl+H or Esc to close",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let help_paragraph = Paragraph::new(help_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Help ")
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .wrap(Wrap { trim: false });

    let popup_width = 60;
    let popup_height = 22;
    let x = (area.width.saturating_sub(popup_width)) / 2;
    let y = (area.height.saturating_sub(popup_height)) / 2;

    let popup_area = Rect {
        x: area.x + x,
        y: area.y + y,
        width: popup_width.min(area.width),
        height: popup_height.min(area.height),
    };

    frame.render_widget(Clear, popup_area);
    frame.render_widget(help_paragraph, popup_area);
}
