use crate::chain::contract::Candidate;
use crate::config::AppConfig;
use chrono::Local;

#[derive(Debug, Clone, PartialEq)]
pub enum MessageKind {
    System,
    Error,
    Chain,
}

#[derive(Debug, Clone)]
pub struct Message {
    pub timestamp: String,
    pub text: String,
    pub kind: MessageKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusPanel {
    NameField,
    ImageField,
    Grid,
}

/// One editable text field with a byte cursor.
#[derive(Debug, Default)]
pub struct FieldInput {
    pub text: String,
    pub cursor: usize,
}

impl FieldInput {
    pub fn insert_char(&mut self, c: char) {
        self.text.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    pub fn delete_back(&mut self) {
        if self.cursor > 0 {
            let prev = self.text[..self.cursor]
                .char_indices()
                .next_back()
                .map(|(i, _)| i)
                .unwrap_or(0);
            self.text.drain(prev..self.cursor);
            self.cursor = prev;
        }
    }

    pub fn delete_forward(&mut self) {
        if self.cursor < self.text.len() {
            let next = self.text[self.cursor..]
                .char_indices()
                .nth(1)
                .map(|(i, _)| self.cursor + i)
                .unwrap_or(self.text.len());
            self.text.drain(self.cursor..next);
        }
    }

    pub fn move_left(&mut self) {
        if self.cursor > 0 {
            self.cursor = self.text[..self.cursor]
                .char_indices()
                .next_back()
                .map(|(i, _)| i)
                .unwrap_or(0);
        }
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.text.len() {
            self.cursor = self.text[self.cursor..]
                .char_indices()
                .nth(1)
                .map(|(i, _)| self.cursor + i)
                .unwrap_or(self.text.len());
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.text.len();
    }
}

/// Registration form: name plus the path of the image to pin. Fields are
/// edited independently; mutating one never touches the other. The form is
/// not reset after a successful submission.
#[derive(Debug, Default)]
pub struct FormState {
    pub name: FieldInput,
    pub image_path: FieldInput,
}

impl FormState {
    pub fn field_mut(&mut self, panel: FocusPanel) -> Option<&mut FieldInput> {
        match panel {
            FocusPanel::NameField => Some(&mut self.name),
            FocusPanel::ImageField => Some(&mut self.image_path),
            FocusPanel::Grid => None,
        }
    }
}

pub struct AppState {
    pub config: AppConfig,
    /// True once the contract handle is constructed; actions gate on it.
    pub handle_ready: bool,
    pub wallet: Option<String>,
    /// Display copy of the on-chain candidate set; replaced wholesale by
    /// every settled fetch.
    pub candidates: Vec<Candidate>,
    pub selected: usize,
    pub form: FormState,
    pub focus: FocusPanel,
    pub activity: Vec<Message>,
    /// Messages not yet flushed to the on-disk activity log.
    pub new_messages: Vec<Message>,
    pub fetches_in_flight: usize,
    pub should_quit: bool,
    pub dirty: bool,
    pub tick_count: u64,
    timestamp_format: String,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let timestamp_format = config.ui.timestamp_format.clone();
        Self {
            config,
            handle_ready: false,
            wallet: None,
            candidates: Vec::new(),
            selected: 0,
            form: FormState::default(),
            focus: FocusPanel::NameField,
            activity: Vec::new(),
            new_messages: Vec::new(),
            fetches_in_flight: 0,
            should_quit: false,
            dirty: true,
            tick_count: 0,
            timestamp_format,
        }
    }

    fn push_message(&mut self, kind: MessageKind, text: String) {
        let msg = Message {
            timestamp: Local::now().format(&self.timestamp_format).to_string(),
            text,
            kind,
        };
        self.new_messages.push(msg.clone());
        self.activity.push(msg);
        if self.activity.len() > self.config.ui.max_scrollback {
            self.activity.remove(0);
        }
        self.dirty = true;
    }

    pub fn system_message(&mut self, text: String) {
        self.push_message(MessageKind::System, text);
    }

    pub fn error_message(&mut self, text: String) {
        self.push_message(MessageKind::Error, text);
    }

    pub fn chain_message(&mut self, text: String) {
        self.push_message(MessageKind::Chain, text);
    }

    /// Replace the displayed list with a settled fetch result. No merging,
    /// no diffing: when fetches race, the last one to settle wins.
    pub fn set_candidates(&mut self, candidates: Vec<Candidate>) {
        self.candidates = candidates;
        if self.selected >= self.candidates.len() {
            self.selected = self.candidates.len().saturating_sub(1);
        }
        self.dirty = true;
    }

    pub fn selected_candidate(&self) -> Option<&Candidate> {
        self.candidates.get(self.selected)
    }

    pub fn select_next(&mut self) {
        if !self.candidates.is_empty() {
            self.selected = (self.selected + 1) % self.candidates.len();
            self.dirty = true;
        }
    }

    pub fn select_prev(&mut self) {
        if !self.candidates.is_empty() {
            self.selected = if self.selected == 0 {
                self.candidates.len() - 1
            } else {
                self.selected - 1
            };
            self.dirty = true;
        }
    }

    pub fn cycle_focus(&mut self) {
        self.focus = match self.focus {
            FocusPanel::NameField => FocusPanel::ImageField,
            FocusPanel::ImageField => FocusPanel::Grid,
            FocusPanel::Grid => FocusPanel::NameField,
        };
        self.dirty = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(id: u64, name: &str) -> Candidate {
        Candidate {
            id,
            name: name.into(),
            total_vote: 0,
            image_hash: format!("Qm{id}"),
            candidate_address: format!("0x{:040x}", id),
        }
    }

    #[test]
    fn set_candidates_replaces_wholesale() {
        let mut state = AppState::new(AppConfig::default());
        state.set_candidates(vec![candidate(1, "Alice"), candidate(2, "Bob")]);
        state.set_candidates(vec![candidate(3, "Carol")]);
        assert_eq!(state.candidates.len(), 1);
        assert_eq!(state.candidates[0].name, "Carol");
    }

    #[test]
    fn selection_is_clamped_when_list_shrinks() {
        let mut state = AppState::new(AppConfig::default());
        state.set_candidates(vec![candidate(1, "a"), candidate(2, "b"), candidate(3, "c")]);
        state.selected = 2;
        state.set_candidates(vec![candidate(1, "a")]);
        assert_eq!(state.selected, 0);
        state.set_candidates(vec![]);
        assert_eq!(state.selected, 0);
        assert!(state.selected_candidate().is_none());
    }

    #[test]
    fn form_fields_are_independent() {
        let mut form = FormState::default();
        for c in "Alice".chars() {
            form.name.insert_char(c);
        }
        for c in "/tmp/a.png".chars() {
            form.image_path.insert_char(c);
        }
        form.name.delete_back();
        assert_eq!(form.name.text, "Alic");
        assert_eq!(form.image_path.text, "/tmp/a.png");
    }

    #[test]
    fn field_editing_is_utf8_aware() {
        let mut field = FieldInput::default();
        field.insert_char('é');
        field.insert_char('x');
        field.move_left();
        field.move_left();
        field.delete_forward();
        assert_eq!(field.text, "x");
        assert_eq!(field.cursor, 0);
    }

    #[test]
    fn activity_respects_scrollback_cap() {
        let mut config = AppConfig::default();
        config.ui.max_scrollback = 3;
        let mut state = AppState::new(config);
        for i in 0..5 {
            state.system_message(format!("line {i}"));
        }
        assert_eq!(state.activity.len(), 3);
        assert_eq!(state.activity[0].text, "line 2");
        assert_eq!(state.new_messages.len(), 5);
    }
}
