use crate::app::state::AppState;
use crate::ui::theme::Theme;
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

const SPINNER: [char; 4] = ['|', '/', '-', '\\'];

pub fn render(frame: &mut Frame, area: Rect, state: &AppState) {
    let wallet = match &state.wallet {
        Some(wallet) => format!(" {} ", wallet),
        None => " no wallet ".to_string(),
    };

    let mut left = format!("{}| {} candidates", wallet, state.candidates.len());
    if state.fetches_in_flight > 0 {
        let spin = SPINNER[(state.tick_count as usize) % SPINNER.len()];
        left.push_str(&format!(" | syncing {}", spin));
    }

    let hints = "Tab focus | Enter register/vote | r refresh | Ctrl-C quit";
    let pad = (area.width as usize)
        .saturating_sub(left.chars().count() + hints.chars().count() + 1);
    let text = format!("{}{}{} ", left, " ".repeat(pad), hints);

    frame.render_widget(Paragraph::new(text).style(Theme::status_bar()), area);
}
