//! Tokens of the expression language.

use logos::Logos;

/// A lexical token.
#[derive(Logos, Debug, PartialEq, Eq, Clone, Copy)]
#[logos(skip r"[ \t\n\r]+")]
pub enum Token {
    /// Identifier: variable, constant or function name.
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Ident,
    /// Decimal literal, optionally with an exponent.
    #[regex(r"\d+\.\d+([eE][+-]?\d+)?")]
    #[regex(r"\.\d+([eE][+-]?\d+)?")]
    Float,
    /// Integer literal.
    #[regex(r"\d+")]
    Integer,
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
    /// `^` or `**`
    #[token("^")]
    #[token("**")]
    Caret,
    /// `(`
    #[token("(")]
    LParen,
    /// `)`
    #[token(")")]
    RParen,
}

/// A token with its source text and byte offset.
#[derive(Debug, Clone, PartialEq)]
pub struct SpannedToken {
    /// The token kind.
    pub token: Token,
    /// The matched source text.
    pub lexeme: String,
    /// Byte offset of the first character.
    pub start: usize,
}

/// Tokenizes `input`, stopping at the first unrecognized character.
///
/// # Errors
///
/// Returns the offending text and its byte offset.
pub fn tokenize(input: &str) -> Result<Vec<SpannedToken>, (String, usize)> {
    let mut lex = Token::lexer(input);
    let mut out = Vec::new();
    while let Some(res) = lex.next() {
        let span = lex.span();
        match res {
            Ok(token) => out.push(SpannedToken {
                token,
                lexeme: lex.slice().to_string(),
                start: span.start,
            }),
            Err(()) => return Err((lex.slice().to_string(), span.start)),
        }
    }
    Ok(out)
}
