use anyhow::{Context, Result};
use log::warn;
use std::io::{BufRead, Write};

use crate::calc::{Calculator, calculate, format_number};

/// Line-driven calculator.
///
/// Each line is appended to the display and evaluated, so a line such as
/// `*2` keeps working on the previous result. `C` clears, `del` removes the
/// last character, `q` leaves.
pub struct CalcMode {
    calculator: Calculator,
}

impl CalcMode {
    pub fn new() -> Self {
        Self {
            calculator: Calculator::new(),
        }
    }

    /// Evaluate a single expression and return the display text
    pub fn run_once(expression: &str) -> Result<String> {
        let value = calculate(expression)
            .with_context(|| format!("Cannot evaluate '{expression}'"))?;
        Ok(format_number(value))
    }

    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> Result<()> {
        for line in input.lines() {
            let line = line.context("Failed to read input")?;
            let line = line.trim();

            match line {
                "" => continue,
                "q" | "quit" => break,
                "C" => self.calculator.clear(),
                "del" => self.calculator.backspace(),
                _ => {
                    self.calculator.push(line);
                    if let Err(e) = self.calculator.evaluate() {
                        warn!("{e}");
                    }
                }
            }

            writeln!(output, "{}", self.calculator.display()).context("Failed to write output")?;
        }

        output.flush().context("Failed to flush output")?;
        Ok(())
    }
}

impl Default for CalcMode {
    fn default() -> Self {
        Self::new()
    }
}
