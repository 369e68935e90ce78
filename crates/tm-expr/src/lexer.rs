//! Token stream for count expressions.

use logos::Logos;

use crate::ExprError;

/// A single expression token.
///
/// The grammar is tiny on purpose: non-negative integer literals, variable
/// names, the four arithmetic operators, and parentheses. Negative numbers
/// are handled as unary minus in the parser.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n]+")]
pub enum Token {
    /// Integer literal.
    #[regex(r"[0-9]+", |lex| lex.slice().parse::<i64>().ok())]
    Integer(i64),

    /// Variable name.
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
    Ident(String),

    /// `+`
    #[token("+")]
    Plus,

    /// `-`
    #[token("-")]
    Minus,

    /// `*`
    #[token("*")]
    Star,

    /// `/`
    #[token("/")]
    Slash,

    /// `(`
    #[token("(")]
    LParen,

    /// `)`
    #[token(")")]
    RParen,
}

/// Lex an expression into tokens. The first unrecognized character aborts
/// the lex; callers fall back to plain-integer parsing instead.
pub fn lex(source: &str) -> Result<Vec<Token>, ExprError> {
    let mut tokens = Vec::new();
    for (result, span) in Token::lexer(source).spanned() {
        match result {
            Ok(token) => tokens.push(token),
            Err(()) => return Err(ExprError::Lex { offset: span.start }),
        }
    }
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lexes_operators_and_operands() {
        let tokens = lex("playersCount * 2 + (7 - 1)").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Ident("playersCount".into()),
                Token::Star,
                Token::Integer(2),
                Token::Plus,
                Token::LParen,
                Token::Integer(7),
                Token::Minus,
                Token::Integer(1),
                Token::RParen,
            ]
        );
    }

    #[test]
    fn rejects_unknown_characters() {
        assert!(lex("2 ^ 3").is_err());
        assert!(lex("3.5").is_err());
    }
}
