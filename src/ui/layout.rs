//! Screen region computation

use ratatui::layout::{Constraint, Direction, Layout, Rect};

#[derive(Debug, Clone, Copy)]
pub struct UiAreas {
    pub size: Rect,
    pub header: Rect,
    pub tab_bar: Rect,
    pub body: Rect,
    pub command_line: Rect,
}

pub fn areas(size: Rect) -> UiAreas {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(8),
            Constraint::Length(1),
        ])
        .split(size);

    UiAreas {
        size,
        header: chunks[0],
        tab_bar: chunks[1],
        body: chunks[2],
        command_line: chunks[3],
    }
}
