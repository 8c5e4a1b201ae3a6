//! Numeric input component
//!
//! A [`TextInput`] restricted to decimal characters, with a parsed
//! accessor for submission.

use ratatui::layout::Rect;
use ratatui::Frame;

use crate::theme::Theme;

use super::text_input::TextInput;
use super::validation::{PositiveNumber, Required, ValidationResult, ValidatorChain};

pub struct NumberInput {
    inner: TextInput,
}

impl NumberInput {
    /// A required, positive decimal field.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            inner: TextInput::new(label)
                .validators(ValidatorChain::new().add(Required::new()).add(PositiveNumber::new()))
                .max_length(12),
        }
    }

    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.inner = self.inner.placeholder(placeholder);
        self
    }

    pub fn value(&self) -> &str {
        self.inner.value()
    }

    /// The parsed value, when the buffer holds a valid number.
    pub fn parsed(&self) -> Option<f64> {
        self.inner.value().trim().parse().ok()
    }

    /// Accept digits and at most one decimal point.
    pub fn insert(&mut self, c: char) -> bool {
        let acceptable = c.is_ascii_digit() || (c == '.' && !self.inner.value().contains('.'));
        if acceptable {
            self.inner.insert(c)
        } else {
            false
        }
    }

    pub fn backspace(&mut self) -> bool {
        self.inner.backspace()
    }

    pub fn clear(&mut self) {
        self.inner.clear();
    }

    pub fn validate(&mut self) -> ValidationResult {
        self.inner.validate()
    }

    pub fn error(&self) -> Option<&str> {
        self.inner.error()
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, theme: &Theme, focused: bool) {
        self.inner.render(frame, area, theme, focused);
    }
}
