// Tabbed view of an extracted recipe

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs, Wrap},
    Frame,
};

use crate::app::{App, Focus, RecipeTab};
use crate::models::{Amount, RecipeData, ThemeConfig};

fn heading(text: &'static str) -> Line<'static> {
    Line::from(Span::styled(
        text,
        Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
    ))
}

fn bullets(items: &[String]) -> impl Iterator<Item = Line<'static>> + '_ {
    items.iter().map(|item| Line::from(format!("  • {item}")))
}

fn numbered(items: &[String]) -> impl Iterator<Item = Line<'static>> + '_ {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| Line::from(format!("  {}. {item}", i + 1)))
}

fn amount(value: Option<&Amount>) -> String {
    value.map_or_else(|| "-".to_string(), ToString::to_string)
}

fn badge(text: &str) -> Span<'static> {
    Span::styled(
        format!(" {text} "),
        Style::default().fg(Color::Black).bg(Color::Gray),
    )
}

/// Title, badges and timings shown above the tabs.
pub fn header_lines(data: &RecipeData) -> Vec<Line<'static>> {
    let recipe = &data.data.recipe;

    let mut badges = Vec::new();
    let labels = [&recipe.cuisine, &recipe.category, &recipe.difficulty]
        .into_iter()
        .chain(recipe.diet_labels.iter().flatten())
        .filter(|label| !label.is_empty());
    for label in labels {
        if !badges.is_empty() {
            badges.push(Span::raw(" "));
        }
        badges.push(badge(label));
    }

    let muted = Style::default().fg(Color::DarkGray);
    vec![
        Line::from(Span::styled(
            recipe.name.clone(),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(badges),
        Line::from(vec![
            Span::styled(
                format!("Prep: {} min", amount(recipe.prep_time.as_ref())),
                muted,
            ),
            Span::styled("  |  ", muted),
            Span::styled(
                format!("Cook: {} min", amount(recipe.cook_time.as_ref())),
                muted,
            ),
            Span::styled("  |  ", muted),
            Span::styled(
                format!("Total: {} min", amount(recipe.total_time.as_ref())),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::styled("  |  ", muted),
            Span::raw(format!("Servings: {}", amount(recipe.servings.as_ref()))),
        ]),
    ]
}

/// Body of the selected tab.
pub fn tab_lines(data: &RecipeData, tab: RecipeTab) -> Vec<Line<'static>> {
    let recipe = &data.data.recipe;
    let mut lines = Vec::new();

    match tab {
        RecipeTab::Ingredients => lines.extend(bullets(&recipe.ingredients)),
        RecipeTab::Instructions => {
            lines.push(heading("Preparation"));
            lines.extend(numbered(&data.data.prep_json.prep_instructions));
            lines.push(Line::from(""));
            lines.push(heading("Cooking Instructions"));
            lines.extend(numbered(&recipe.instructions));
        }
        RecipeTab::Equipment => {
            let equipment = &data.data.equipment_json;
            lines.push(heading("Required Equipment"));
            lines.extend(bullets(&equipment.equipment));
            if let Some(optional) = equipment.optional_equipment.as_deref().filter(|o| !o.is_empty()) {
                lines.push(Line::from(""));
                lines.push(heading("Optional Equipment"));
                lines.extend(bullets(optional));
            }
        }
        RecipeTab::Tips => match recipe.author_tips.as_deref() {
            Some(tips) if !tips.is_empty() => lines.extend(bullets(tips)),
            _ => lines.push(Line::from(Span::styled(
                "  No tips from the author.",
                Style::default().fg(Color::DarkGray),
            ))),
        },
        RecipeTab::Nutrition => {
            let nutrition = &data.data.nutrition_json;
            lines.push(heading("Nutrition Information"));
            lines.push(Line::from(format!(
                "  • Calories: {}",
                amount(nutrition.calories.as_ref())
            )));
            lines.push(Line::from(format!(
                "  • Carbs: {} g",
                amount(nutrition.carbs.as_ref())
            )));
            lines.push(Line::from(format!(
                "  • Fat: {} g",
                amount(nutrition.fat.as_ref())
            )));
            lines.push(Line::from(format!(
                "  • Protein: {} g",
                amount(nutrition.protein.as_ref())
            )));
        }
    }

    lines
}

pub fn render_recipe_display(frame: &mut Frame, app: &mut App, theme: &ThemeConfig, area: Rect) {
    let Some(data) = app.recipe.as_ref() else {
        return;
    };

    let border_color = if app.focus == Focus::Recipe && !app.chat.is_open() {
        super::theme_color(&theme.border_color, Color::Cyan)
    } else {
        Color::DarkGray
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(1), // Gap
            Constraint::Length(1), // Tabs
            Constraint::Length(1), // Gap
            Constraint::Min(0),    // Tab body
        ])
        .split(inner);

    frame.render_widget(
        Paragraph::new(header_lines(data)).wrap(Wrap { trim: true }),
        chunks[0],
    );

    let tabs = Tabs::new(RecipeTab::ALL.iter().map(|tab| tab.title()))
        .select(app.selected_tab.index())
        .style(Style::default().fg(Color::DarkGray))
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD | Modifier::REVERSED),
        )
        .divider("|");
    frame.render_widget(tabs, chunks[2]);

    let lines = tab_lines(data, app.selected_tab);
    let body = chunks[4];
    let max_scroll = super::wrapped_height(&lines, body.width as usize)
        .saturating_sub(body.height as usize);
    app.recipe_scroll = app.recipe_scroll.min(max_scroll);

    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((u16::try_from(app.recipe_scroll).unwrap_or(u16::MAX), 0));
    frame.render_widget(paragraph, body);
}
