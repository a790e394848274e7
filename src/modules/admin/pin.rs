use crate::modules::admin::session::{AdminGate, INVALID_PIN_MESSAGE};

pub const PIN_LENGTH: usize = 4;

/// State of the 4-digit PIN entry form
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PinPrompt {
    input: String,
    error: Option<String>,
}

impl PinPrompt {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the typed value. Non-digits are dropped and the value is cut
    /// at four digits. Typing clears a previous error.
    pub fn push_input(&mut self, raw: &str) {
        self.input = raw.chars().filter(char::is_ascii_digit).take(PIN_LENGTH).collect();
        self.error = None;
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn can_submit(&self) -> bool {
        self.input.len() == PIN_LENGTH
    }

    /// Try the typed PIN against the gate. A rejected PIN clears the field.
    pub fn submit(&mut self, gate: &AdminGate) -> bool {
        if !self.can_submit() {
            return false;
        }

        match gate.login(&self.input) {
            Ok(()) => {
                self.input.clear();
                self.error = None;
                true
            }
            Err(e) => {
                log::debug!("PIN rejected: {}", e);
                self.input.clear();
                self.error = Some(INVALID_PIN_MESSAGE.to_string());
                false
            }
        }
    }
}
