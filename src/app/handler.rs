use crate::app::action::Action;
use crate::app::event::AppEvent;
use crate::app::state::*;
use crossterm::event::{Event as CEvent, KeyCode, KeyEvent, KeyModifiers};
use std::path::PathBuf;

pub fn handle_event(state: &mut AppState, event: AppEvent) -> Vec<Action> {
    match event {
        AppEvent::Terminal(cevent) => {
            state.dirty = true;
            handle_terminal(state, cevent)
        }
        AppEvent::HandleReady { wallet } => {
            state.handle_ready = true;
            state.wallet = Some(wallet.clone());
            state.system_message(format!("Wallet {} ready.", wallet));
            vec![Action::RefreshCandidates, Action::CheckPinAuth]
        }
        AppEvent::ContractEvent { kind } => {
            state.chain_message(format!("Contract event: {}", kind.label()));
            vec![Action::RefreshCandidates]
        }
        AppEvent::CandidatesFetched { candidates } => {
            state.fetches_in_flight = state.fetches_in_flight.saturating_sub(1);
            state.set_candidates(candidates);
            vec![]
        }
        AppEvent::FetchFailed { error } => {
            state.fetches_in_flight = state.fetches_in_flight.saturating_sub(1);
            state.error_message(format!("Candidate fetch failed: {}", error));
            vec![]
        }
        AppEvent::RegisterSubmitted { name, tx_hash } => {
            state.chain_message(format!("Registration for \"{}\" submitted: {}", name, tx_hash));
            vec![]
        }
        AppEvent::RegisterFailed { error } => {
            state.error_message(format!("Registration failed: {}", error));
            vec![]
        }
        AppEvent::VoteSubmitted { address, tx_hash } => {
            state.chain_message(format!("Vote for {} submitted: {}", address, tx_hash));
            vec![]
        }
        AppEvent::VoteFailed { address, error } => {
            state.error_message(format!("Vote for {} failed: {}", address, error));
            vec![]
        }
        AppEvent::PinAuthChecked { error } => {
            match error {
                None => state.system_message("Pinning service credentials OK.".to_string()),
                Some(e) => state.error_message(format!("Pinning auth check failed: {}", e)),
            }
            vec![]
        }
        AppEvent::Tick => {
            state.tick_count = state.tick_count.wrapping_add(1);
            // Keep the sync spinner moving.
            if state.fetches_in_flight > 0 {
                state.dirty = true;
            }
            vec![]
        }
    }
}

fn handle_terminal(state: &mut AppState, event: CEvent) -> Vec<Action> {
    match event {
        CEvent::Key(key) => handle_key(state, key),
        CEvent::Resize(_, _) => {
            state.dirty = true;
            vec![]
        }
        _ => vec![],
    }
}

fn handle_key(state: &mut AppState, key: KeyEvent) -> Vec<Action> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return vec![Action::Quit];
    }

    if key.code == KeyCode::Tab {
        state.cycle_focus();
        return vec![];
    }

    match state.focus {
        FocusPanel::NameField | FocusPanel::ImageField => handle_field_key(state, key),
        FocusPanel::Grid => handle_grid_key(state, key),
    }
}

fn handle_field_key(state: &mut AppState, key: KeyEvent) -> Vec<Action> {
    match key.code {
        KeyCode::Enter => return submit_register(state),
        KeyCode::Esc => {
            state.focus = FocusPanel::Grid;
            return vec![];
        }
        KeyCode::Up | KeyCode::Down => {
            state.focus = match state.focus {
                FocusPanel::NameField => FocusPanel::ImageField,
                _ => FocusPanel::NameField,
            };
            return vec![];
        }
        _ => {}
    }

    if let Some(field) = state.form.field_mut(state.focus) {
        match key.code {
            KeyCode::Char(c) => field.insert_char(c),
            KeyCode::Backspace => field.delete_back(),
            KeyCode::Delete => field.delete_forward(),
            KeyCode::Left => field.move_left(),
            KeyCode::Right => field.move_right(),
            KeyCode::Home => field.move_home(),
            KeyCode::End => field.move_end(),
            _ => {}
        }
    }
    vec![]
}

fn handle_grid_key(state: &mut AppState, key: KeyEvent) -> Vec<Action> {
    match key.code {
        KeyCode::Left | KeyCode::Up => {
            state.select_prev();
            vec![]
        }
        KeyCode::Right | KeyCode::Down => {
            state.select_next();
            vec![]
        }
        KeyCode::Enter | KeyCode::Char('v') => submit_vote(state),
        KeyCode::Char('r') => submit_refresh(state),
        KeyCode::Char('q') => vec![Action::Quit],
        _ => vec![],
    }
}

/// Validation gate for the registration flow. Nothing is uploaded and
/// nothing is sent on-chain unless the handle is ready, the name is
/// non-empty, and an image file is selected.
fn submit_register(state: &mut AppState) -> Vec<Action> {
    if !state.handle_ready {
        state.error_message("Contract not loaded.".to_string());
        return vec![];
    }
    let name = state.form.name.text.trim().to_string();
    if name.is_empty() {
        state.error_message("Name is required.".to_string());
        return vec![];
    }
    let image = state.form.image_path.text.trim().to_string();
    if image.is_empty() {
        state.error_message("No image selected.".to_string());
        return vec![];
    }
    state.system_message(format!("Registering \"{}\"...", name));
    vec![Action::RegisterCandidate {
        name,
        image_path: PathBuf::from(image),
    }]
}

fn submit_vote(state: &mut AppState) -> Vec<Action> {
    if !state.handle_ready {
        state.error_message("Contract not loaded.".to_string());
        return vec![];
    }
    let Some(candidate) = state.selected_candidate() else {
        return vec![];
    };
    let name = candidate.name.clone();
    let address = candidate.candidate_address.clone();
    if address.is_empty() {
        state.error_message("Invalid candidate address.".to_string());
        return vec![];
    }
    state.system_message(format!("Voting for {}...", name));
    vec![Action::Vote { address }]
}

fn submit_refresh(state: &mut AppState) -> Vec<Action> {
    if state.handle_ready {
        vec![Action::RefreshCandidates]
    } else {
        vec![]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::event::ContractEventKind;
    use crate::chain::contract::Candidate;
    use crate::config::AppConfig;

    fn ready_state() -> AppState {
        let mut state = AppState::new(AppConfig::default());
        state.handle_ready = true;
        state
    }

    fn key(code: KeyCode) -> AppEvent {
        AppEvent::Terminal(CEvent::Key(KeyEvent::new(code, KeyModifiers::NONE)))
    }

    fn type_text(state: &mut AppState, text: &str) {
        for c in text.chars() {
            handle_event(state, key(KeyCode::Char(c)));
        }
    }

    fn candidate(name: &str, address: &str) -> Candidate {
        Candidate {
            id: 1,
            name: name.into(),
            total_vote: 0,
            image_hash: "Qm123".into(),
            candidate_address: address.into(),
        }
    }

    #[test]
    fn empty_name_submits_nothing() {
        let mut state = ready_state();
        state.focus = FocusPanel::ImageField;
        type_text(&mut state, "/tmp/face.png");
        let actions = handle_event(&mut state, key(KeyCode::Enter));
        assert!(actions.is_empty());
        assert!(state.activity.iter().any(|m| m.text == "Name is required."));
    }

    #[test]
    fn missing_image_submits_nothing() {
        let mut state = ready_state();
        type_text(&mut state, "Alice");
        let actions = handle_event(&mut state, key(KeyCode::Enter));
        assert!(actions.is_empty());
        assert!(state.activity.iter().any(|m| m.text == "No image selected."));
    }

    #[test]
    fn valid_form_registers_exactly_once() {
        let mut state = ready_state();
        type_text(&mut state, "Alice");
        state.focus = FocusPanel::ImageField;
        type_text(&mut state, "/tmp/face.png");
        let actions = handle_event(&mut state, key(KeyCode::Enter));
        assert_eq!(
            actions,
            vec![Action::RegisterCandidate {
                name: "Alice".into(),
                image_path: PathBuf::from("/tmp/face.png"),
            }]
        );
    }

    #[test]
    fn register_without_handle_is_rejected() {
        let mut state = AppState::new(AppConfig::default());
        type_text(&mut state, "Alice");
        let actions = handle_event(&mut state, key(KeyCode::Enter));
        assert!(actions.is_empty());
        assert!(state.activity.iter().any(|m| m.text == "Contract not loaded."));
    }

    #[test]
    fn vote_targets_selected_candidate() {
        let mut state = ready_state();
        state.set_candidates(vec![
            candidate("Alice", "0x0000000000000000000000000000000000000abc"),
            candidate("Bob", "0x0000000000000000000000000000000000000def"),
        ]);
        state.focus = FocusPanel::Grid;
        handle_event(&mut state, key(KeyCode::Down));
        let actions = handle_event(&mut state, key(KeyCode::Char('v')));
        assert_eq!(
            actions,
            vec![Action::Vote {
                address: "0x0000000000000000000000000000000000000def".into()
            }]
        );
    }

    #[test]
    fn vote_without_handle_makes_zero_calls() {
        let mut state = AppState::new(AppConfig::default());
        state.set_candidates(vec![candidate(
            "Alice",
            "0x0000000000000000000000000000000000000abc",
        )]);
        state.focus = FocusPanel::Grid;
        let actions = handle_event(&mut state, key(KeyCode::Enter));
        assert!(actions.is_empty());
    }

    #[test]
    fn each_contract_event_triggers_one_refresh() {
        let mut state = ready_state();
        for kind in [ContractEventKind::CandidateCreated, ContractEventKind::Voted] {
            let actions = handle_event(&mut state, AppEvent::ContractEvent { kind });
            assert_eq!(actions, vec![Action::RefreshCandidates]);
        }
    }

    #[test]
    fn handle_ready_triggers_initial_refresh_and_auth_check() {
        let mut state = AppState::new(AppConfig::default());
        let actions = handle_event(
            &mut state,
            AppEvent::HandleReady {
                wallet: "0x1".into(),
            },
        );
        assert_eq!(actions, vec![Action::RefreshCandidates, Action::CheckPinAuth]);
        assert!(state.handle_ready);
    }

    #[test]
    fn later_fetch_wins() {
        let mut state = ready_state();
        handle_event(
            &mut state,
            AppEvent::CandidatesFetched {
                candidates: vec![candidate("Alice", "0x0000000000000000000000000000000000000abc")],
            },
        );
        handle_event(
            &mut state,
            AppEvent::CandidatesFetched {
                candidates: vec![
                    candidate("Bob", "0x0000000000000000000000000000000000000def"),
                    candidate("Carol", "0x0000000000000000000000000000000000000123"),
                ],
            },
        );
        assert_eq!(state.candidates.len(), 2);
        assert_eq!(state.candidates[0].name, "Bob");
    }

    #[test]
    fn fetch_failure_only_logs() {
        let mut state = ready_state();
        state.set_candidates(vec![candidate(
            "Alice",
            "0x0000000000000000000000000000000000000abc",
        )]);
        state.fetches_in_flight = 1;
        let actions = handle_event(
            &mut state,
            AppEvent::FetchFailed {
                error: "boom".into(),
            },
        );
        assert!(actions.is_empty());
        assert_eq!(state.fetches_in_flight, 0);
        // The displayed list simply does not update.
        assert_eq!(state.candidates.len(), 1);
    }
}
