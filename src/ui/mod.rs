//! UI rendering module for Recipe Search
//!
//! This module contains all the rendering logic for the terminal user interface,
//! using the ratatui library for TUI components.

pub mod dialog;
pub mod help_overlay;
pub mod recipe_detail;
pub mod recipe_list;

pub use dialog::render as render_dialog;
pub use help_overlay::render as render_help_overlay;
pub use recipe_detail::render as render_recipe_detail;
pub use recipe_list::render_recipe_list;

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Helper function to create a centered rect
pub(crate) fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length((area.height.saturating_sub(height)) / 2),
            Constraint::Length(height.min(area.height)),
            Constraint::Min(0),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length((area.width.saturating_sub(width)) / 2),
            Constraint::Length(width.min(area.width)),
            Constraint::Min(0),
        ])
        .split(vertical[1]);

    horizontal[1]
}
