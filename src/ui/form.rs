use crate::app::state::{AppState, FieldInput, FocusPanel};
use crate::ui::theme::Theme;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};
use unicode_width::UnicodeWidthStr;

pub fn render(frame: &mut Frame, area: Rect, state: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(area);

    render_field(
        frame,
        chunks[0],
        " Name ",
        &state.form.name,
        state.focus == FocusPanel::NameField,
    );
    render_field(
        frame,
        chunks[1],
        " Image file ",
        &state.form.image_path,
        state.focus == FocusPanel::ImageField,
    );
}

fn render_field(frame: &mut Frame, area: Rect, title: &str, field: &FieldInput, focused: bool) {
    let block = Block::default()
        .title(title)
        .title_style(if focused { Theme::title() } else { Theme::border() })
        .borders(Borders::ALL)
        .border_style(if focused {
            Theme::border_focused()
        } else {
            Theme::border()
        });

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let paragraph = Paragraph::new(field.text.as_str()).style(Theme::text());
    frame.render_widget(paragraph, inner);

    if focused {
        let cursor_x = inner.x + field.text[..field.cursor].width() as u16;
        frame.set_cursor_position((cursor_x.min(inner.right().saturating_sub(1)), inner.y));
    }
}
