//! Calculator: a recursive-descent parser and evaluator over a small fixed
//! grammar, plus the button-pad display state that drives it.
//!
//! Grammar, lowest precedence first:
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/') unary)*
//! unary   := ('-' | '+') unary | power
//! power   := primary ('^' unary)?
//! primary := NUMBER | 'pi' | FUNC '(' expr ')' | '(' expr ')'
//! FUNC    := sqrt | sin | cos | tan | log | ln
//! ```
//!
//! `^` is right-associative and binds tighter than a unary minus on its
//! left, so `-2^2` is `-4`. `log` is base 10 and `ln` is natural.

pub mod calculator;
pub mod eval;
pub mod lexer;
pub mod parser;

use thiserror::Error;

pub use calculator::Calculator;
pub use eval::evaluate;
pub use lexer::{Token, TokenKind, tokenize};
pub use parser::{BinaryOp, Expr, Function, MAX_DEPTH, parse};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalcError {
    #[error("unexpected character '{ch}' at {pos}")]
    UnexpectedChar { ch: char, pos: usize },

    #[error("malformed number '{text}' at {pos}")]
    InvalidNumber { text: String, pos: usize },

    #[error("unknown name '{name}' at {pos}")]
    UnknownIdentifier { name: String, pos: usize },

    #[error("unexpected {found} at {pos}")]
    UnexpectedToken { found: String, pos: usize },

    #[error("unexpected end of expression")]
    UnexpectedEnd,

    #[error("empty expression")]
    Empty,

    #[error("expression nested deeper than {limit} levels")]
    TooDeep { limit: usize },

    #[error("division by zero")]
    DivisionByZero,

    #[error("{function} is undefined for {value}")]
    Domain { function: Function, value: f64 },

    #[error("result is not a finite number")]
    NonFinite,
}

/// Parse and evaluate `input` in one go
pub fn calculate(input: &str) -> Result<f64, CalcError> {
    let expr = parse(input)?;
    evaluate(&expr)
}

/// Render a result the way the display shows it: shortest round-trip form,
/// without a trailing `.0` and without negative zero.
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    value.to_string()
}
