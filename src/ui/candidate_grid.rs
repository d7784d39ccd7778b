use crate::app::state::{AppState, FocusPanel};
use crate::chain::contract::Candidate;
use crate::ui::theme::Theme;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

const CARD_WIDTH: u16 = 32;
const CARD_HEIGHT: u16 = 5;

pub fn render(frame: &mut Frame, area: Rect, state: &AppState) {
    let focused = state.focus == FocusPanel::Grid;
    let block = Block::default()
        .title(format!(" Candidates ({}) ", state.candidates.len()))
        .title_style(if focused { Theme::title() } else { Theme::border() })
        .borders(Borders::ALL)
        .border_style(if focused {
            Theme::border_focused()
        } else {
            Theme::border()
        });

    let inner = block.inner(area);
    frame.render_widget(block, area);

    if state.candidates.is_empty() {
        let hint = Paragraph::new(
            "No candidates yet. Fill in the form above and press Enter to register.",
        )
        .style(Style::default().fg(Theme::TEXT_DIM));
        frame.render_widget(hint, inner);
        return;
    }

    let cols = (inner.width / CARD_WIDTH).max(1) as usize;
    let visible_rows = (inner.height / CARD_HEIGHT).max(1) as usize;

    // Scroll whole rows so the selected card stays visible.
    let selected_row = state.selected / cols;
    let first_row = selected_row.saturating_sub(visible_rows.saturating_sub(1));

    for (i, candidate) in state.candidates.iter().enumerate() {
        let row = i / cols;
        if row < first_row || row >= first_row + visible_rows {
            continue;
        }
        let col = i % cols;
        let card = Rect {
            x: inner.x + (col as u16) * CARD_WIDTH,
            y: inner.y + ((row - first_row) as u16) * CARD_HEIGHT,
            width: CARD_WIDTH.min(inner.width - (col as u16) * CARD_WIDTH),
            height: CARD_HEIGHT.min(inner.height - ((row - first_row) as u16) * CARD_HEIGHT),
        };
        render_card(frame, card, candidate, focused && i == state.selected);
    }
}

fn render_card(frame: &mut Frame, area: Rect, candidate: &Candidate, selected: bool) {
    let block = Block::default()
        .title(format!(" {} ", truncate(&candidate.name, (area.width as usize).saturating_sub(4))))
        .title_style(if selected {
            Theme::card_selected()
        } else {
            Theme::title()
        })
        .borders(Borders::ALL)
        .border_style(if selected {
            Theme::border_focused()
        } else {
            Theme::border()
        });

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let width = inner.width as usize;
    let mut lines = vec![
        Line::from(Span::styled(
            format!(
                "#{}  {} vote{}",
                candidate.id,
                candidate.total_vote,
                plural(candidate.total_vote)
            ),
            Theme::vote_count(),
        )),
        Line::from(Span::styled(
            short_address(&candidate.candidate_address),
            Theme::text(),
        )),
        Line::from(Span::styled(
            truncate(&candidate.image_hash, width),
            Style::default().fg(Theme::TEXT_DIM),
        )),
    ];
    if selected {
        lines.push(Line::from(Span::styled(
            "press v to vote",
            Style::default().fg(Theme::ACCENT),
        )));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}

fn plural(n: u64) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}

fn short_address(address: &str) -> String {
    if address.len() > 14 {
        format!("{}…{}", &address[..8], &address[address.len() - 4..])
    } else {
        address.to_string()
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_address_keeps_both_ends() {
        assert_eq!(
            short_address("0x5FbDB2315678afecb367f032d93F642f64180aa3"),
            "0x5FbDB2…0aa3"
        );
        assert_eq!(short_address("0xabc"), "0xabc");
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("héllo world", 6), "héllo…");
        assert_eq!(truncate("short", 10), "short");
    }
}
