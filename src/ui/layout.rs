use ratatui::layout::{Constraint, Direction, Layout, Rect};

pub struct AppLayout {
    pub form: Rect,
    pub grid: Rect,
    pub activity: Rect,
    pub status_bar: Rect,
}

pub fn compute_layout(area: Rect) -> AppLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Registration form
            Constraint::Min(8),    // Candidate grid
            Constraint::Length(8), // Activity log
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    AppLayout {
        form: chunks[0],
        grid: chunks[1],
        activity: chunks[2],
        status_bar: chunks[3],
    }
}
