//! Recipe detail screen UI
//!
//! Renders a single recipe: title, publisher, rating, dates, source link and
//! the ingredient list, scrollable when it does not fit.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::app::App;
use crate::data::Recipe;

/// Renders the recipe detail screen
///
/// # Arguments
/// * `frame` - The ratatui frame to render into
/// * `app` - The application state
/// * `recipe_id` - The recipe being shown, used while it is still loading
pub fn render(frame: &mut Frame, app: &App, recipe_id: i32) {
    let area = frame.area();

    let Some(recipe) = app.recipe_detail.recipe() else {
        render_placeholder(frame, area, recipe_id, app.recipe_detail.loading());
        return;
    };

    let main_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(Span::styled(
            format!(" {} ", recipe.title),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ));

    let inner_area = main_block.inner(area);
    frame.render_widget(main_block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(inner_area);

    let lines = detail_lines(recipe);
    let max_scroll = (lines.len() as u16).saturating_sub(chunks[0].height);
    let scroll = app.detail_scroll_offset.min(max_scroll);

    let content = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));
    frame.render_widget(content, chunks[0]);

    render_help_text(frame, chunks[1]);
}

fn detail_lines(recipe: &Recipe) -> Vec<Line<'static>> {
    let label = Style::default().fg(Color::Cyan);

    let mut lines = vec![
        Line::from(vec![
            Span::styled("Publisher  ", label),
            Span::raw(recipe.publisher.clone()),
        ]),
        Line::from(vec![
            Span::styled("Rating     ", label),
            Span::raw(format!("{}/100", recipe.rating)),
        ]),
        Line::from(vec![
            Span::styled("Updated    ", label),
            Span::raw(recipe.date_updated.format("%b %d, %Y").to_string()),
        ]),
        Line::from(vec![
            Span::styled("Source     ", label),
            Span::styled(
                recipe.source_url.clone(),
                Style::default().fg(Color::Blue),
            ),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "Ingredients",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
    ];

    if recipe.ingredients.is_empty() {
        lines.push(Line::from(Span::styled(
            "  No ingredients listed",
            Style::default().fg(Color::DarkGray),
        )));
    } else {
        lines.extend(
            recipe
                .ingredients
                .iter()
                .map(|ingredient| Line::from(format!("  • {}", ingredient))),
        );
    }

    lines
}

fn render_placeholder(frame: &mut Frame, area: Rect, recipe_id: i32, loading: bool) {
    let message = if loading {
        format!("Loading recipe {}...", recipe_id)
    } else {
        format!("Recipe {} is not available", recipe_id)
    };

    let paragraph = Paragraph::new(Span::styled(message, Style::default().fg(Color::Gray)))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(paragraph, area);
}

fn render_help_text(frame: &mut Frame, area: Rect) {
    let help = Paragraph::new(Span::styled(
        "↑/k ↓/j scroll  g top  Esc back  q quit",
        Style::default().fg(Color::DarkGray),
    ));
    frame.render_widget(help, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    fn recipe() -> Recipe {
        Recipe {
            id: 1551,
            title: "Chili".to_string(),
            publisher: "texas".to_string(),
            featured_image: String::new(),
            rating: 88,
            source_url: "https://example.com/chili".to_string(),
            ingredients: vec!["beans".to_string(), "beef".to_string()],
            date_added: DateTime::from_timestamp(0, 0).unwrap(),
            date_updated: DateTime::from_timestamp(1_606_348_709, 0).unwrap(),
        }
    }

    #[test]
    fn test_detail_lines_list_every_ingredient() {
        let lines = detail_lines(&recipe());
        let text: Vec<String> = lines.iter().map(|line| line.to_string()).collect();

        assert!(text.iter().any(|l| l.contains("88/100")));
        assert!(text.iter().any(|l| l.contains("• beans")));
        assert!(text.iter().any(|l| l.contains("• beef")));
        assert!(text.iter().any(|l| l.contains("Nov 25, 2020")));
    }

    #[test]
    fn test_detail_lines_without_ingredients() {
        let mut recipe = recipe();
        recipe.ingredients.clear();

        let lines = detail_lines(&recipe);

        assert!(lines
            .iter()
            .any(|line| line.to_string().contains("No ingredients listed")));
    }
}
