//! Form validation rules
//!
//! Validation runs before any request leaves the client; a failing field
//! renders its message inline and the submission never happens.

use regex::Regex;

/// Validation result for a single field.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationResult {
    Valid,
    Invalid(String),
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            ValidationResult::Valid => None,
            ValidationResult::Invalid(msg) => Some(msg),
        }
    }
}

/// Validation rule over a raw field value.
pub trait ValidationRule {
    fn validate(&self, value: &str) -> ValidationResult;
}

/// The field must be non-empty after trimming.
pub struct Required {
    message: String,
}

impl Required {
    pub fn new() -> Self {
        Self {
            message: "This field is required".to_string(),
        }
    }
}

impl Default for Required {
    fn default() -> Self {
        Self::new()
    }
}

impl ValidationRule for Required {
    fn validate(&self, value: &str) -> ValidationResult {
        if value.trim().is_empty() {
            ValidationResult::Invalid(self.message.clone())
        } else {
            ValidationResult::Valid
        }
    }
}

/// The field must look like a ticker symbol. Empty values pass; pair
/// with [`Required`] when the field is mandatory.
pub struct SymbolPattern {
    pattern: Regex,
    message: String,
}

impl SymbolPattern {
    pub fn new() -> Self {
        Self {
            pattern: Regex::new(r"^[A-Z]{1,5}$").unwrap(),
            message: "Enter 1-5 uppercase letters".to_string(),
        }
    }
}

impl Default for SymbolPattern {
    fn default() -> Self {
        Self::new()
    }
}

impl ValidationRule for SymbolPattern {
    fn validate(&self, value: &str) -> ValidationResult {
        if value.is_empty() || self.pattern.is_match(value) {
            ValidationResult::Valid
        } else {
            ValidationResult::Invalid(self.message.clone())
        }
    }
}

/// The field must parse as a number greater than zero. Empty values
/// pass; pair with [`Required`] when the field is mandatory.
pub struct PositiveNumber {
    message: String,
}

impl PositiveNumber {
    pub fn new() -> Self {
        Self {
            message: "Enter a number greater than 0".to_string(),
        }
    }
}

impl Default for PositiveNumber {
    fn default() -> Self {
        Self::new()
    }
}

impl ValidationRule for PositiveNumber {
    fn validate(&self, value: &str) -> ValidationResult {
        if value.is_empty() {
            return ValidationResult::Valid;
        }
        match value.parse::<f64>() {
            Ok(n) if n > 0.0 => ValidationResult::Valid,
            _ => ValidationResult::Invalid(self.message.clone()),
        }
    }
}

/// Runs rules in order; the first failure wins.
pub struct ValidatorChain {
    rules: Vec<Box<dyn ValidationRule>>,
}

impl ValidatorChain {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    pub fn add(mut self, rule: impl ValidationRule + 'static) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    pub fn validate(&self, value: &str) -> ValidationResult {
        for rule in &self.rules {
            let result = rule.validate(value);
            if !result.is_valid() {
                return result;
            }
        }
        ValidationResult::Valid
    }
}

impl Default for ValidatorChain {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-field validation state. Errors only render once the field has
/// been validated, so pristine forms start clean.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FieldMeta {
    pub validation: Option<ValidationResult>,
}

impl FieldMeta {
    pub fn record(&mut self, result: ValidationResult) {
        self.validation = Some(result);
    }

    pub fn clear(&mut self) {
        self.validation = None;
    }

    pub fn error(&self) -> Option<&str> {
        self.validation.as_ref().and_then(|v| v.error_message())
    }
}
