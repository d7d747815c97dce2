use super::CalcError;
use super::parser::{BinaryOp, Expr, Function};

/// Evaluate a parsed expression. Any step that produces an infinite or NaN
/// value fails, so the result is always a finite number.
pub fn evaluate(expr: &Expr) -> Result<f64, CalcError> {
    let value = match expr {
        Expr::Number(n) => *n,
        Expr::Neg(inner) => -evaluate(inner)?,
        Expr::Binary { op, lhs, rhs } => {
            let lhs = evaluate(lhs)?;
            let rhs = evaluate(rhs)?;
            match op {
                BinaryOp::Add => lhs + rhs,
                BinaryOp::Sub => lhs - rhs,
                BinaryOp::Mul => lhs * rhs,
                BinaryOp::Div => {
                    if rhs == 0.0 {
                        return Err(CalcError::DivisionByZero);
                    }
                    lhs / rhs
                }
                BinaryOp::Pow => {
                    if lhs == 0.0 && rhs < 0.0 {
                        return Err(CalcError::DivisionByZero);
                    }
                    lhs.powf(rhs)
                }
            }
        }
        Expr::Call { func, arg } => apply(*func, evaluate(arg)?)?,
    };

    if value.is_finite() {
        Ok(value)
    } else {
        Err(CalcError::NonFinite)
    }
}

fn apply(func: Function, value: f64) -> Result<f64, CalcError> {
    let domain = || CalcError::Domain {
        function: func,
        value,
    };
    match func {
        Function::Sqrt if value < 0.0 => Err(domain()),
        Function::Sqrt => Ok(value.sqrt()),
        Function::Sin => Ok(value.sin()),
        Function::Cos => Ok(value.cos()),
        Function::Tan => Ok(value.tan()),
        Function::Log | Function::Ln if value <= 0.0 => Err(domain()),
        Function::Log => Ok(value.log10()),
        Function::Ln => Ok(value.ln()),
    }
}
