use crate::app::state::{AppState, MessageKind};
use crate::ui::theme::Theme;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

pub fn render(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default()
        .title(" Activity ")
        .title_style(Theme::title())
        .borders(Borders::ALL)
        .border_style(Theme::border());

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let visible = inner.height as usize;
    let start = state.activity.len().saturating_sub(visible);

    let lines: Vec<Line> = state.activity[start..]
        .iter()
        .map(|msg| {
            let style = match msg.kind {
                MessageKind::System => Theme::system_message(),
                MessageKind::Chain => Theme::chain_message(),
                MessageKind::Error => Theme::error_message(),
            };
            Line::from(vec![
                Span::styled(format!("{} ", msg.timestamp), Theme::timestamp()),
                Span::styled(msg.text.as_str(), style),
            ])
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), inner);
}
