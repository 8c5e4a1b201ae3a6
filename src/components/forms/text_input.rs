//! Text input component
//!
//! A single-line input with a label, placeholder, validation, and an
//! optional uppercase transform for ticker fields.

use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::theme::Theme;

use super::validation::{FieldMeta, ValidationResult, ValidatorChain};

pub struct TextInput {
    value: String,
    label: String,
    placeholder: String,
    validators: ValidatorChain,
    meta: FieldMeta,
    max_length: Option<usize>,
    uppercase: bool,
}

impl TextInput {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            value: String::new(),
            label: label.into(),
            placeholder: String::new(),
            validators: ValidatorChain::new(),
            meta: FieldMeta::default(),
            max_length: None,
            uppercase: false,
        }
    }

    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    pub fn validators(mut self, validators: ValidatorChain) -> Self {
        self.validators = validators;
        self
    }

    pub fn max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }

    /// Uppercase every inserted character.
    pub fn uppercase(mut self) -> Self {
        self.uppercase = true;
        self
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.meta.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.value.trim().is_empty()
    }

    /// Append a typed character, honoring max length and the uppercase
    /// transform. Returns whether the value changed.
    pub fn insert(&mut self, c: char) -> bool {
        if c.is_control() {
            return false;
        }
        if let Some(max) = self.max_length {
            if self.value.chars().count() >= max {
                return false;
            }
        }
        if self.uppercase {
            self.value.extend(c.to_uppercase());
        } else {
            self.value.push(c);
        }
        self.meta.clear();
        true
    }

    /// Delete the last character. Returns whether the value changed.
    pub fn backspace(&mut self) -> bool {
        if self.value.pop().is_some() {
            self.meta.clear();
            true
        } else {
            false
        }
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.meta.clear();
    }

    /// Run the validator chain and record the result for rendering.
    pub fn validate(&mut self) -> ValidationResult {
        let result = self.validators.validate(self.value.trim());
        self.meta.record(result.clone());
        result
    }

    pub fn error(&self) -> Option<&str> {
        self.meta.error()
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, theme: &Theme, focused: bool) {
        let border_style = if self.error().is_some() {
            Style::default().fg(theme.negative)
        } else if focused {
            Style::default().fg(theme.accent)
        } else {
            Style::default().fg(theme.border)
        };
        let title = match self.error() {
            Some(err) => Line::from(vec![
                Span::styled(format!(" {} ", self.label), Style::default().fg(theme.text_secondary)),
                Span::styled(format!("{err} "), Style::default().fg(theme.negative)),
            ]),
            None => Line::from(Span::styled(
                format!(" {} ", self.label),
                Style::default().fg(theme.text_secondary),
            )),
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(title);

        let content = if self.value.is_empty() && !focused {
            Line::from(Span::styled(
                self.placeholder.clone(),
                Style::default().fg(theme.text_muted),
            ))
        } else {
            let mut spans = vec![Span::styled(
                self.value.clone(),
                Style::default().fg(theme.text),
            )];
            if focused {
                spans.push(Span::styled(
                    "\u{2588}",
                    Style::default().fg(theme.accent).add_modifier(Modifier::SLOW_BLINK),
                ));
            }
            Line::from(spans)
        };
        frame.render_widget(Paragraph::new(content).block(block), area);
    }
}
