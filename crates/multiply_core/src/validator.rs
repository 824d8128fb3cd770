/// Message recorded in the `error` field when an operand is not a number.
pub const NOT_A_NUMBER: &str = "Please write two numbers";

/// Outcome of checking one operand's text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Validation {
    Valid(f64),
    Invalid(&'static str),
    /// Operand not provided yet; neither a number nor an error.
    Empty,
}

impl Validation {
    pub fn value(self) -> Option<f64> {
        match self {
            Validation::Valid(value) => Some(value),
            Validation::Invalid(_) | Validation::Empty => None,
        }
    }
}

/// Parses operand text. Callers trim before validating.
pub fn validate(text: &str) -> Validation {
    if text.is_empty() {
        return Validation::Empty;
    }
    match text.parse::<f64>() {
        Ok(value) if value.is_finite() => Validation::Valid(value),
        _ => Validation::Invalid(NOT_A_NUMBER),
    }
}
