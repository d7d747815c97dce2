use log::debug;

use super::{CalcError, calculate, format_number};

/// What the display shows after a failed evaluation
pub const ERROR_TEXT: &str = "Error";

/// Button-pad calculator display. Input accumulates as text; `evaluate`
/// replaces it with the result, or with `Error` until the next input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Calculator {
    expression: String,
    errored: bool,
}

impl Calculator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn display(&self) -> &str {
        if self.errored {
            ERROR_TEXT
        } else {
            &self.expression
        }
    }

    pub fn is_error(&self) -> bool {
        self.errored
    }

    /// Append input. An `Error` display is discarded first.
    pub fn push(&mut self, input: &str) {
        if self.errored {
            self.clear();
        }
        self.expression.push_str(input);
    }

    pub fn clear(&mut self) {
        self.expression.clear();
        self.errored = false;
    }

    /// Drop the last character. Does nothing while `Error` is shown.
    pub fn backspace(&mut self) {
        if !self.errored {
            self.expression.pop();
        }
    }

    /// Evaluate the current expression, leaving the result (or `Error`) on
    /// the display
    pub fn evaluate(&mut self) -> Result<f64, CalcError> {
        if self.errored {
            return Err(CalcError::Empty);
        }
        match calculate(&self.expression) {
            Ok(value) => {
                self.expression = format_number(value);
                Ok(value)
            }
            Err(e) => {
                debug!("Cannot evaluate '{}': {e}", self.expression);
                self.expression.clear();
                self.errored = true;
                Err(e)
            }
        }
    }
}
