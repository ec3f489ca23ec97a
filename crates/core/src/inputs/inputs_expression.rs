//! Arithmetic amount entry, e.g. `10000*12` for a yearly total.

use std::str::FromStr;

use rust_decimal::Decimal;

use crate::errors::ValidationError;
use crate::{Error, Result};

const MAX_NESTING: usize = 32;

type ParseResult = std::result::Result<Decimal, String>;

/// Evaluates an arithmetic expression and floors the result to a whole
/// amount.
///
/// Accepts decimal numbers, `+ - * /` with the usual precedence, unary signs,
/// parentheses and whitespace. Any other character is rejected, as are
/// division by zero and results outside the decimal range.
pub fn evaluate_amount(expression: &str) -> Result<Decimal> {
    let invalid = |reason: String| {
        Error::Validation(ValidationError::InvalidExpression {
            expression: expression.to_string(),
            reason,
        })
    };

    if expression.trim().is_empty() {
        return Err(invalid("expression is empty".to_string()));
    }
    if let Some(c) = expression.chars().find(|c| !is_allowed(*c)) {
        return Err(invalid(format!("unexpected character '{}'", c)));
    }

    let mut parser = ExpressionParser {
        input: expression.as_bytes(),
        pos: 0,
        depth: 0,
    };
    let value = parser.expression().map_err(invalid)?;
    if let Some(c) = parser.peek() {
        return Err(invalid(format!(
            "unexpected '{}' at position {}",
            c as char,
            parser.pos + 1
        )));
    }

    Ok(value.floor())
}

fn is_allowed(c: char) -> bool {
    c.is_ascii_digit() || "+-*/().".contains(c) || c.is_ascii_whitespace()
}

/// Recursive descent over an ASCII expression.
struct ExpressionParser<'a> {
    input: &'a [u8],
    pos: usize,
    depth: usize,
}

impl ExpressionParser<'_> {
    fn peek(&mut self) -> Option<u8> {
        while self
            .input
            .get(self.pos)
            .is_some_and(|c| c.is_ascii_whitespace())
        {
            self.pos += 1;
        }
        self.input.get(self.pos).copied()
    }

    // expression := term (('+' | '-') term)*
    fn expression(&mut self) -> ParseResult {
        let mut value = self.term()?;
        while let Some(op @ (b'+' | b'-')) = self.peek() {
            self.pos += 1;
            let rhs = self.term()?;
            let next = if op == b'+' {
                value.checked_add(rhs)
            } else {
                value.checked_sub(rhs)
            };
            value = next.ok_or_else(overflow)?;
        }
        Ok(value)
    }

    // term := factor (('*' | '/') factor)*
    fn term(&mut self) -> ParseResult {
        let mut value = self.factor()?;
        while let Some(op @ (b'*' | b'/')) = self.peek() {
            self.pos += 1;
            let rhs = self.factor()?;
            value = if op == b'*' {
                value.checked_mul(rhs).ok_or_else(overflow)?
            } else if rhs.is_zero() {
                return Err("division by zero".to_string());
            } else {
                value.checked_div(rhs).ok_or_else(overflow)?
            };
        }
        Ok(value)
    }

    // factor := ('+' | '-') factor | '(' expression ')' | number
    fn factor(&mut self) -> ParseResult {
        match self.peek() {
            Some(b'-') => {
                self.pos += 1;
                self.nested(Self::factor).map(|value| -value)
            }
            Some(b'+') => {
                self.pos += 1;
                self.nested(Self::factor)
            }
            Some(b'(') => {
                self.pos += 1;
                let value = self.nested(Self::expression)?;
                if self.peek() != Some(b')') {
                    return Err("missing closing parenthesis".to_string());
                }
                self.pos += 1;
                Ok(value)
            }
            Some(c) if c.is_ascii_digit() || c == b'.' => self.number(),
            Some(c) => Err(format!("unexpected '{}'", c as char)),
            None => Err("unexpected end of expression".to_string()),
        }
    }

    fn nested(&mut self, parse: fn(&mut Self) -> ParseResult) -> ParseResult {
        if self.depth >= MAX_NESTING {
            return Err("expression is nested too deeply".to_string());
        }
        self.depth += 1;
        let value = parse(self);
        self.depth -= 1;
        value
    }

    fn number(&mut self) -> ParseResult {
        let start = self.pos;
        while self
            .input
            .get(self.pos)
            .is_some_and(|c| c.is_ascii_digit() || *c == b'.')
        {
            self.pos += 1;
        }
        let literal = std::str::from_utf8(&self.input[start..self.pos])
            .map_err(|e| e.to_string())?;
        Decimal::from_str(literal).map_err(|_| format!("invalid number '{}'", literal))
    }
}

fn overflow() -> String {
    "result is out of range".to_string()
}
