mod activity_log;
mod candidate_grid;
mod form;
mod layout;
mod status_bar;
mod theme;

use crate::app::state::AppState;
use ratatui::prelude::*;

pub fn render(frame: &mut Frame, state: &AppState) {
    let area = frame.area();
    let app_layout = layout::compute_layout(area);

    form::render(frame, app_layout.form, state);
    candidate_grid::render(frame, app_layout.grid, state);
    activity_log::render(frame, app_layout.activity, state);
    status_bar::render(frame, app_layout.status_bar, state);
}
