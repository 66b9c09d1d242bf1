//! Application state for the TUI.
//!
//! Holds the input line, the transcript, and the in-flight indicator. Key
//! handling is pure state mutation; anything that needs the session is
//! returned to the run loop as an [`Action`].

use super::events::Event;
use super::widgets::spinner::Spinner;
use crate::output::Output;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Lines moved per PageUp/PageDown.
const PAGE_SCROLL: usize = 10;

/// One item in the transcript.
#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    /// A submitted question.
    Question(String),
    /// Output of a load or a pipeline run.
    Output(Output),
}

/// What the run loop must do after an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    None,
    /// Answer this question.
    Submit(String),
    /// Cancel the in-flight question.
    Cancel,
    /// Leave the application.
    Quit,
}

/// Input state for text editing.
///
/// The cursor is a character index, not a byte offset.
#[derive(Debug, Default)]
pub struct InputState {
    pub text: String,
    pub cursor: usize,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_index)
            .map_or(self.text.len(), |(i, _)| i)
    }

    fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    /// Inserts a character at the cursor position.
    pub fn insert(&mut self, c: char) {
        let at = self.byte_index(self.cursor);
        self.text.insert(at, c);
        self.cursor += 1;
    }

    /// Deletes the character before the cursor.
    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let at = self.byte_index(self.cursor);
            self.text.remove(at);
        }
    }

    /// Deletes the character at the cursor.
    pub fn delete(&mut self) {
        if self.cursor < self.char_count() {
            let at = self.byte_index(self.cursor);
            self.text.remove(at);
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.char_count() {
            self.cursor += 1;
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.char_count();
    }

    /// Deletes from the cursor back to the start of the previous word.
    pub fn delete_word_backward(&mut self) {
        let chars: Vec<char> = self.text.chars().collect();
        let mut start = self.cursor;
        while start > 0 && chars[start - 1].is_whitespace() {
            start -= 1;
        }
        while start > 0 && !chars[start - 1].is_whitespace() {
            start -= 1;
        }
        let (from, to) = (self.byte_index(start), self.byte_index(self.cursor));
        self.text.replace_range(from..to, "");
        self.cursor = start;
    }

    /// Clears the input and returns the previous text.
    pub fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.text)
    }
}

/// Main application state.
pub struct App {
    pub running: bool,
    pub input: InputState,
    pub entries: Vec<Entry>,
    /// Transcript scroll offset (lines from bottom).
    pub scroll: usize,
    /// Loaded dataset name; `None` disables the query interface.
    pub dataset_name: Option<String>,
    /// Present while a question is in flight.
    pub spinner: Option<Spinner>,
}

impl App {
    /// Creates the TUI state, starting the transcript with the load output.
    pub fn new(dataset_name: Option<&str>, load_output: Output) -> Self {
        Self {
            running: true,
            input: InputState::new(),
            entries: vec![Entry::Output(load_output)],
            scroll: 0,
            dataset_name: dataset_name.map(str::to_string),
            spinner: None,
        }
    }

    pub fn query_enabled(&self) -> bool {
        self.dataset_name.is_some()
    }

    pub fn is_busy(&self) -> bool {
        self.spinner.is_some()
    }

    /// Adds an entry and scrolls to the bottom.
    pub fn push(&mut self, entry: Entry) {
        self.entries.push(entry);
        self.scroll = 0;
    }

    /// Records a submitted question and starts the spinner.
    pub fn begin_request(&mut self, question: &str) {
        if !question.trim().is_empty() {
            self.push(Entry::Question(question.trim().to_string()));
        }
        self.spinner = Some(Spinner::thinking());
    }

    /// Stops the spinner and appends the pipeline output.
    pub fn finish_request(&mut self, output: Output) {
        self.spinner = None;
        self.push(Entry::Output(output));
    }

    /// Clears the transcript.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.scroll = 0;
    }

    /// Handles an event and updates state.
    pub fn handle_event(&mut self, event: Event) -> Action {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Resize(_, _) | Event::Tick => Action::None,
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Action {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('c') | KeyCode::Char('q') if ctrl => {
                self.running = false;
                Action::Quit
            }
            KeyCode::Char('l') if ctrl => {
                self.clear();
                Action::None
            }
            KeyCode::Char('w') if ctrl => {
                self.input.delete_word_backward();
                Action::None
            }
            KeyCode::Esc if self.is_busy() => Action::Cancel,
            KeyCode::Enter => {
                if self.is_busy() || !self.query_enabled() {
                    Action::None
                } else {
                    Action::Submit(self.input.take())
                }
            }
            KeyCode::PageUp => {
                self.scroll = self.scroll.saturating_add(PAGE_SCROLL);
                Action::None
            }
            KeyCode::PageDown => {
                self.scroll = self.scroll.saturating_sub(PAGE_SCROLL);
                Action::None
            }
            KeyCode::Up if ctrl => {
                self.scroll = self.scroll.saturating_add(1);
                Action::None
            }
            KeyCode::Down if ctrl => {
                self.scroll = self.scroll.saturating_sub(1);
                Action::None
            }
            _ if self.query_enabled() => {
                self.handle_input_key(key);
                Action::None
            }
            _ => Action::None,
        }
    }

    fn handle_input_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char(c) => self.input.insert(c),
            KeyCode::Backspace => self.input.backspace(),
            KeyCode::Delete => self.input.delete(),
            KeyCode::Left => self.input.move_left(),
            KeyCode::Right => self.input.move_right(),
            KeyCode::Home => self.input.move_home(),
            KeyCode::End => self.input.move_end(),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn ctrl(c: char) -> Event {
        Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL))
    }

    fn ready_app() -> App {
        App::new(Some("GoldLoan.xlsx"), Output::info("loaded"))
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_event(key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn test_input_insert_and_backspace() {
        let mut input = InputState::new();
        input.insert('h');
        input.insert('i');
        assert_eq!(input.text, "hi");
        input.backspace();
        assert_eq!(input.text, "h");
        assert_eq!(input.cursor, 1);
    }

    #[test]
    fn test_input_backspace_at_start() {
        let mut input = InputState::new();
        input.insert('a');
        input.move_home();
        input.backspace();
        assert_eq!(input.text, "a");
    }

    #[test]
    fn test_input_multibyte_characters() {
        let mut input = InputState::new();
        for c in "₹500".chars() {
            input.insert(c);
        }
        input.move_home();
        input.delete();
        assert_eq!(input.text, "500");
        input.move_end();
        input.insert('₹');
        assert_eq!(input.text, "500₹");
        assert_eq!(input.cursor, 4);
    }

    #[test]
    fn test_input_cursor_movement() {
        let mut input = InputState::new();
        input.insert('a');
        input.insert('b');
        input.move_left();
        input.insert('x');
        assert_eq!(input.text, "axb");
        input.move_right();
        input.move_right();
        assert_eq!(input.cursor, 3);
    }

    #[test]
    fn test_delete_word_backward() {
        let mut input = InputState::new();
        for c in "total gold weight".chars() {
            input.insert(c);
        }
        input.delete_word_backward();
        assert_eq!(input.text, "total gold ");
        input.delete_word_backward();
        assert_eq!(input.text, "total ");
    }

    #[test]
    fn test_enter_submits_input() {
        let mut app = ready_app();
        type_text(&mut app, "average loan");
        assert_eq!(
            app.handle_event(key(KeyCode::Enter)),
            Action::Submit("average loan".to_string())
        );
        assert!(app.input.text.is_empty());
    }

    #[test]
    fn test_enter_submits_blank_input() {
        let mut app = ready_app();
        assert_eq!(
            app.handle_event(key(KeyCode::Enter)),
            Action::Submit(String::new())
        );
    }

    #[test]
    fn test_no_dataset_disables_queries() {
        let mut app = App::new(None, Output::error("not found"));
        type_text(&mut app, "hello");
        assert!(app.input.text.is_empty());
        assert_eq!(app.handle_event(key(KeyCode::Enter)), Action::None);
    }

    #[test]
    fn test_esc_cancels_only_when_busy() {
        let mut app = ready_app();
        assert_eq!(app.handle_event(key(KeyCode::Esc)), Action::None);
        app.begin_request("average loan");
        assert_eq!(app.handle_event(key(KeyCode::Esc)), Action::Cancel);
        assert_eq!(app.handle_event(key(KeyCode::Enter)), Action::None);
    }

    #[test]
    fn test_request_lifecycle() {
        let mut app = ready_app();
        app.begin_request("  total gold weight  ");
        assert!(app.is_busy());
        assert_eq!(
            app.entries.last(),
            Some(&Entry::Question("total gold weight".to_string()))
        );
        app.finish_request(Output::warning("Request cancelled."));
        assert!(!app.is_busy());
        assert_eq!(app.entries.len(), 3);
    }

    #[test]
    fn test_ctrl_c_quits() {
        let mut app = ready_app();
        assert_eq!(app.handle_event(ctrl('c')), Action::Quit);
        assert!(!app.running);
    }

    #[test]
    fn test_ctrl_l_clears_transcript() {
        let mut app = ready_app();
        app.handle_event(ctrl('l'));
        assert!(app.entries.is_empty());
    }

    #[test]
    fn test_scroll_resets_on_new_entry() {
        let mut app = ready_app();
        app.handle_event(key(KeyCode::PageUp));
        assert_eq!(app.scroll, PAGE_SCROLL);
        app.push(Entry::Output(Output::info("more")));
        assert_eq!(app.scroll, 0);
    }
}
