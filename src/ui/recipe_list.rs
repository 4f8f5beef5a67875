//! Recipe list screen rendering
//!
//! Renders the query bar, the food category chips, the loaded recipes and a
//! status line with paging and loading information.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::app::{App, InputMode};
use crate::data::{FoodCategory, Recipe};

/// Color for a rating out of 100
fn rating_color(rating: i32) -> Color {
    if rating >= 90 {
        Color::Green
    } else if rating >= 70 {
        Color::Yellow
    } else {
        Color::Gray
    }
}

/// Renders the recipe list screen
///
/// # Arguments
/// * `frame` - The ratatui Frame to render to
/// * `app` - The application state holding the list state
pub fn render_recipe_list(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Query bar
            Constraint::Length(1), // Category chips
            Constraint::Min(3),    // Recipes
            Constraint::Length(1), // Status line
        ])
        .split(frame.area());

    render_query_bar(frame, app, chunks[0]);
    render_categories(frame, app, chunks[1]);
    render_list(frame, app, chunks[2]);
    render_status(frame, app, chunks[3]);
}

fn render_query_bar(frame: &mut Frame, app: &App, area: Rect) {
    let editing = app.input_mode == InputMode::EditingQuery;
    let query = app.recipe_list.query();

    let text = if editing {
        Line::from(vec![
            Span::raw(query.to_string()),
            Span::styled("█", Style::default().fg(Color::Yellow)),
        ])
    } else if query.is_empty() {
        Line::from(Span::styled(
            "Press / to search",
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        Line::from(Span::raw(query.to_string()))
    };

    let border_color = if editing { Color::Yellow } else { Color::Cyan };
    let block = Block::default()
        .title(Span::styled(
            " RECIPES ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));

    frame.render_widget(Paragraph::new(text).block(block), area);
}

fn render_categories(frame: &mut Frame, app: &App, area: Rect) {
    let selected = app.recipe_list.selected_category();
    let cursor = app.recipe_list.category_scroll_position;

    let mut spans = vec![Span::raw(" ")];
    for (i, category) in FoodCategory::ALL.iter().enumerate() {
        let style = if Some(*category) == selected {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else if i == cursor {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::Gray)
        };
        spans.push(Span::styled(format!(" {} ", category.value()), style));
        spans.push(Span::raw(" "));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn recipe_item(recipe: &Recipe) -> ListItem<'static> {
    ListItem::new(Line::from(vec![
        Span::styled(
            format!("{:>3} ", recipe.rating),
            Style::default().fg(rating_color(recipe.rating)),
        ),
        Span::styled(recipe.title.clone(), Style::default().fg(Color::White)),
        Span::styled(
            format!("  · {}", recipe.publisher),
            Style::default().fg(Color::DarkGray),
        ),
    ]))
}

fn render_list(frame: &mut Frame, app: &App, area: Rect) {
    let recipes = app.recipe_list.recipes();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    if recipes.is_empty() {
        let message = if app.recipe_list.loading() {
            "Loading recipes..."
        } else {
            "No recipes found"
        };
        let paragraph = Paragraph::new(Span::styled(message, Style::default().fg(Color::Gray)))
            .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let items: Vec<ListItem> = recipes.iter().map(recipe_item).collect();
    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▶ ");

    let mut state = ListState::default().with_selected(Some(app.recipe_list.list_position()));
    frame.render_stateful_widget(list, area, &mut state);
}

fn render_status(frame: &mut Frame, app: &App, area: Rect) {
    let list = &app.recipe_list;

    let mut spans = vec![Span::styled(
        format!(
            " page {} · {} recipes ",
            list.page(),
            list.recipes().len()
        ),
        Style::default().fg(Color::Gray),
    )];
    if list.loading() {
        spans.push(Span::styled(" loading… ", Style::default().fg(Color::Yellow)));
    }
    if !list.network_available() {
        spans.push(Span::styled(" offline ", Style::default().fg(Color::Red)));
    }
    spans.push(Span::styled(
        " ? help  q quit",
        Style::default().fg(Color::DarkGray),
    ));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
