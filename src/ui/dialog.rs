//! Error dialog overlay
//!
//! Shows the head of the active screen's dialog queue as a centered modal.

use ratatui::{
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use super::centered_rect;
use crate::presentation::DialogQueue;

/// Renders the oldest queued dialog, if any
pub fn render(frame: &mut Frame, dialogs: &DialogQueue) {
    let Some(dialog) = dialogs.head() else {
        return;
    };

    let area = centered_rect(56, 9, frame.area());
    frame.render_widget(Clear, area);

    let waiting = dialogs.len().saturating_sub(1);
    let footer = if waiting > 0 {
        format!("[Enter] Ok  ({} more)", waiting)
    } else {
        "[Enter] Ok".to_string()
    };

    let lines = vec![
        Line::from(Span::raw(dialog.description.clone())),
        Line::from(""),
        Line::from(Span::styled(footer, Style::default().fg(Color::DarkGray))),
    ];

    let block = Block::default()
        .title(Span::styled(
            format!(" {} ", dialog.title),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: true });

    frame.render_widget(paragraph, area);
}
