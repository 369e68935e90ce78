//! Sandboxed arithmetic for template step counts.
//!
//! Template authors write draw and flip counts as small expressions over
//! the session's setup variables (`"playersCount * 2"`). This crate
//! evaluates them with a fixed grammar (integers, variables, `+ - * /`,
//! parentheses) and nothing else: no function calls, no assignment, no
//! access to anything outside the variable table.
//!
//! [`evaluate`] never fails. A count field holding garbage degrades through
//! a fallback chain and bottoms out at 0, which the stores treat as a no-op.

/// Token stream for count expressions.
pub mod lexer;
/// Recursive-descent evaluation of the token stream.
pub mod parser;

use std::collections::BTreeMap;

pub use lexer::{Token, lex};
pub use parser::eval_tokens;

/// Why an expression failed to evaluate.
///
/// These never escape [`evaluate`]; they exist so the strict path
/// ([`eval_strict`]) can report what went wrong in tests and diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExprError {
    /// An unrecognized character in the input.
    #[error("unrecognized character at offset {offset}")]
    Lex {
        /// Byte offset of the bad character.
        offset: usize,
    },
    /// A variable not present in the table.
    #[error("unknown variable `{0}`")]
    UnknownVariable(String),
    /// An operator or operand where one cannot appear.
    #[error("unexpected token")]
    UnexpectedToken,
    /// A `(` without its `)`.
    #[error("unbalanced parentheses")]
    UnbalancedParens,
    /// Leftover tokens after a complete expression.
    #[error("trailing input after expression")]
    TrailingInput,
}

/// Evaluate an expression, reporting failures instead of falling back.
pub fn eval_strict(expr: &str, vars: &BTreeMap<String, i64>) -> Result<f64, ExprError> {
    eval_tokens(&lex(expr)?, vars)
}

/// Evaluate a count expression to a non-negative integer.
///
/// The result is `max(0, floor(value))`. Failures degrade in order:
/// lex/parse/eval failure falls back to substituting variables into the raw
/// text and reading a leading integer; if that fails too, the result is 0.
/// Empty input is 0 without touching the parser.
pub fn evaluate(expr: &str, vars: &BTreeMap<String, i64>) -> i64 {
    let trimmed = expr.trim();
    if trimmed.is_empty() {
        return 0;
    }
    match eval_strict(trimmed, vars) {
        Ok(value) => clamp(value),
        Err(_) => fallback(trimmed, vars),
    }
}

fn clamp(value: f64) -> i64 {
    // Division by zero is well-formed but non-finite; it counts as 0
    // rather than re-entering the text fallback.
    if !value.is_finite() {
        return 0;
    }
    // `as` saturates, so absurdly large values stay representable.
    (value.floor() as i64).max(0)
}

fn fallback(expr: &str, vars: &BTreeMap<String, i64>) -> i64 {
    let substituted = substitute(expr, vars);
    parse_leading_int(substituted.trim()).map_or(0, |n| n.max(0))
}

/// Replace each whole identifier that names a known variable with its value.
/// Identifiers are maximal `[A-Za-z_][A-Za-z0-9_]*` runs, so `playersCount`
/// never matches a `players` variable.
fn substitute(expr: &str, vars: &BTreeMap<String, i64>) -> String {
    let mut out = String::with_capacity(expr.len());
    let mut word = String::new();
    for ch in expr.chars() {
        if ch.is_ascii_alphanumeric() || ch == '_' {
            word.push(ch);
            continue;
        }
        flush_word(&mut out, &mut word, vars);
        out.push(ch);
    }
    flush_word(&mut out, &mut word, vars);
    out
}

fn flush_word(out: &mut String, word: &mut String, vars: &BTreeMap<String, i64>) {
    if word.is_empty() {
        return;
    }
    match vars.get(word.as_str()) {
        Some(value) => out.push_str(&value.to_string()),
        None => out.push_str(word),
    }
    word.clear();
}

/// Read a leading `-?[0-9]+` prefix, ignoring whatever follows.
fn parse_leading_int(s: &str) -> Option<i64> {
    let digits_start = usize::from(s.starts_with('-'));
    let digits_end = s[digits_start..]
        .find(|c: char| !c.is_ascii_digit())
        .map_or(s.len(), |i| digits_start + i);
    if digits_end == digits_start {
        return None;
    }
    s[..digits_end].parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(entries: &[(&str, i64)]) -> BTreeMap<String, i64> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), *v))
            .collect()
    }

    #[test]
    fn plain_integers_pass_through() {
        assert_eq!(evaluate("3", &vars(&[])), 3);
        assert_eq!(evaluate("  10  ", &vars(&[])), 10);
    }

    #[test]
    fn variables_resolve_from_the_table() {
        assert_eq!(evaluate("playersCount", &vars(&[("playersCount", 4)])), 4);
        assert_eq!(
            evaluate("playersCount * 2", &vars(&[("playersCount", 3)])),
            6
        );
    }

    #[test]
    fn empty_input_is_zero() {
        assert_eq!(evaluate("", &vars(&[])), 0);
        assert_eq!(evaluate("   ", &vars(&[])), 0);
    }

    #[test]
    fn results_floor_and_clamp_at_zero() {
        assert_eq!(evaluate("7 / 2", &vars(&[])), 3);
        assert_eq!(evaluate("-5", &vars(&[])), 0);
        assert_eq!(evaluate("10 - 20", &vars(&[])), 0);
    }

    #[test]
    fn malformed_input_without_a_leading_integer_is_zero() {
        assert_eq!(evaluate("(1 + 2", &vars(&[])), 0);
        assert_eq!(evaluate("* draw", &vars(&[])), 0);
        assert_eq!(evaluate("draw some cards", &vars(&[])), 0);
    }

    #[test]
    fn unknown_variables_fall_back_to_zero() {
        assert_eq!(evaluate("nope * 2", &vars(&[("playersCount", 3)])), 0);
    }

    #[test]
    fn fallback_reads_a_leading_integer() {
        // No '.' in the grammar, so this goes through the fallback and
        // reads the integer prefix.
        assert_eq!(evaluate("3.5", &vars(&[])), 3);
        assert_eq!(evaluate("4 cards", &vars(&[])), 4);
        // Malformed past the prefix still yields the prefix.
        assert_eq!(evaluate("2 + * 3", &vars(&[])), 2);
    }

    #[test]
    fn fallback_substitutes_whole_tokens_only() {
        let table = vars(&[("n", 2)]);
        // "n!" fails the lexer; substitution turns it into "2!" and the
        // leading-integer read yields 2.
        assert_eq!(evaluate("n!", &table), 2);
        // "nx" is a different identifier and must not be touched.
        assert_eq!(evaluate("nx!", &table), 0);
    }

    #[test]
    fn division_by_zero_is_zero() {
        assert_eq!(evaluate("5 / 0", &vars(&[])), 0);
    }
}
