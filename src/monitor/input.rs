//! Input handling for the terminal dashboard.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Input action resulting from user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Quit the application.
    Quit,
    /// Lengthen the sampling interval by one second.
    SlowDown,
    /// Shorten the sampling interval by one second.
    SpeedUp,
    /// Reset the interval to the default.
    ResetInterval,
    /// Take a sample right now.
    SampleNow,
    /// Pause or resume the schedule.
    TogglePause,
    /// Toggle help.
    Help,
    /// No action.
    None,
}

/// Input handler with configurable vim keys.
#[derive(Debug, Clone)]
pub struct InputHandler {
    /// Enable vim-style keys (j/k).
    pub vim_keys: bool,
}

impl InputHandler {
    /// Creates a new input handler.
    #[must_use]
    pub fn new(vim_keys: bool) -> Self {
        Self { vim_keys }
    }

    /// Handles a key event and returns the corresponding action.
    #[must_use]
    pub fn handle_key(&self, event: KeyEvent) -> Action {
        // Check for Ctrl+C or Ctrl+Q
        if event.modifiers.contains(KeyModifiers::CONTROL) {
            match event.code {
                KeyCode::Char('c' | 'q') => return Action::Quit,
                _ => {}
            }
        }

        match event.code {
            KeyCode::Char('q') | KeyCode::Esc => Action::Quit,

            KeyCode::Char('+' | '=') | KeyCode::Up => Action::SlowDown,
            KeyCode::Char('-' | '_') | KeyCode::Down => Action::SpeedUp,
            KeyCode::Char('k') if self.vim_keys => Action::SlowDown,
            KeyCode::Char('j') if self.vim_keys => Action::SpeedUp,
            KeyCode::Char('0') => Action::ResetInterval,

            KeyCode::Char('r') | KeyCode::F(5) => Action::SampleNow,
            KeyCode::Char(' ' | 'p') => Action::TogglePause,

            KeyCode::Char('?') | KeyCode::F(1) => Action::Help,

            _ => Action::None,
        }
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new(true)
    }
}
