//! Recursive-descent evaluation of the token stream.

use std::collections::BTreeMap;

use crate::ExprError;
use crate::lexer::Token;

/// Evaluate a token stream against a variable table.
///
/// Arithmetic is done in `f64` so division stays numeric (`7/2` is 3.5
/// here; flooring happens once, at the caller's final clamp). Unknown
/// variables are an error, not zero; the caller decides the fallback.
pub fn eval_tokens(tokens: &[Token], vars: &BTreeMap<String, i64>) -> Result<f64, ExprError> {
    let mut parser = Parser {
        tokens,
        pos: 0,
        vars,
    };
    let value = parser.expr()?;
    if parser.pos != tokens.len() {
        return Err(ExprError::TrailingInput);
    }
    Ok(value)
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    vars: &'a BTreeMap<String, i64>,
}

impl Parser<'_> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn bump(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    // expr := term (('+' | '-') term)*
    fn expr(&mut self) -> Result<f64, ExprError> {
        let mut value = self.term()?;
        while let Some(op) = self.peek() {
            match op {
                Token::Plus => {
                    self.pos += 1;
                    value += self.term()?;
                }
                Token::Minus => {
                    self.pos += 1;
                    value -= self.term()?;
                }
                _ => break,
            }
        }
        Ok(value)
    }

    // term := factor (('*' | '/') factor)*
    fn term(&mut self) -> Result<f64, ExprError> {
        let mut value = self.factor()?;
        while let Some(op) = self.peek() {
            match op {
                Token::Star => {
                    self.pos += 1;
                    value *= self.factor()?;
                }
                Token::Slash => {
                    self.pos += 1;
                    value /= self.factor()?;
                }
                _ => break,
            }
        }
        Ok(value)
    }

    // factor := Integer | Ident | '-' factor | '(' expr ')'
    fn factor(&mut self) -> Result<f64, ExprError> {
        match self.bump() {
            Some(Token::Integer(n)) => Ok(n as f64),
            Some(Token::Ident(name)) => self
                .vars
                .get(&name)
                .map(|v| *v as f64)
                .ok_or_else(|| ExprError::UnknownVariable(name)),
            Some(Token::Minus) => Ok(-self.factor()?),
            Some(Token::LParen) => {
                let value = self.expr()?;
                match self.bump() {
                    Some(Token::RParen) => Ok(value),
                    _ => Err(ExprError::UnbalancedParens),
                }
            }
            _ => Err(ExprError::UnexpectedToken),
        }
    }
}
