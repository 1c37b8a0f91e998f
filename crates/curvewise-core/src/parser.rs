//! Recursive-descent parser for the expression language.
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/') unary | <implicit> power)*
//! unary   := ('-' | '+') unary | power
//! power   := primary ('^' unary)?
//! primary := number | ident | ident '(' expr ')' | '(' expr ')'
//! ```
//!
//! `^` (also spelled `**`) is right associative and binds tighter than
//! unary minus, so `-x^2` is `-(x^2)`. Juxtaposition multiplies: `2x`,
//! `3(x + 1)`, `(x + 1)(x - 1)`.

use curvewise_integers::Rational;
use thiserror::Error;

use crate::expr::{Constant, Expr, Function};
use crate::lexer::{tokenize, SpannedToken, Token};

/// Nesting depth beyond which input is rejected.
const MAX_DEPTH: usize = 256;

/// A parse failure with its location.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("parse error at position {position}: {message}")]
pub struct ParseError {
    /// What went wrong.
    pub message: String,
    /// Byte offset into the input.
    pub position: usize,
    /// The offending token text, if any.
    pub found_token: Option<String>,
    /// What the parser expected instead.
    pub expected: Option<String>,
}

impl ParseError {
    fn at(position: usize, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            position,
            found_token: None,
            expected: None,
        }
    }

    fn found(mut self, token: &str) -> Self {
        self.found_token = Some(token.to_string());
        self
    }

    fn expected(mut self, what: &str) -> Self {
        self.expected = Some(what.to_string());
        self
    }
}

/// Parses `input` with the free variable `x`.
///
/// # Errors
///
/// Returns a [`ParseError`] for malformed input or unknown identifiers.
pub fn parse(input: &str) -> Result<Expr, ParseError> {
    Parser::new("x").parse(input)
}

/// A parser bound to one free-variable name.
#[derive(Debug, Clone)]
pub struct Parser {
    variable: String,
}

impl Parser {
    /// Creates a parser that accepts `variable` as the only free identifier.
    #[must_use]
    pub fn new(variable: impl Into<String>) -> Self {
        Self {
            variable: variable.into(),
        }
    }

    /// The accepted variable name.
    #[must_use]
    pub fn variable(&self) -> &str {
        &self.variable
    }

    /// Parses a complete expression.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] for malformed input or unknown identifiers.
    pub fn parse(&self, input: &str) -> Result<Expr, ParseError> {
        let tokens = tokenize(input)
            .map_err(|(text, pos)| ParseError::at(pos, "invalid character").found(&text))?;
        if tokens.is_empty() {
            return Err(ParseError::at(0, "empty expression").expected("an expression"));
        }
        let mut state = State {
            tokens,
            pos: 0,
            depth: 0,
            end: input.len(),
            variable: &self.variable,
        };
        let expr = state.parse_expr()?;
        if let Some(tok) = state.peek() {
            return Err(ParseError::at(tok.start, "unexpected trailing input")
                .found(&tok.lexeme)
                .expected("end of input"));
        }
        Ok(expr)
    }
}

struct State<'a> {
    tokens: Vec<SpannedToken>,
    pos: usize,
    depth: usize,
    end: usize,
    variable: &'a str,
}

impl State<'_> {
    fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        self.enter()?;
        let mut terms = vec![self.parse_term()?];
        loop {
            if self.consume(Token::Plus) {
                terms.push(self.parse_term()?);
            } else if self.consume(Token::Minus) {
                terms.push(self.parse_term()?.neg());
            } else {
                break;
            }
        }
        self.depth -= 1;
        Ok(Expr::add(terms))
    }

    fn parse_term(&mut self) -> Result<Expr, ParseError> {
        let mut factors = vec![self.parse_unary()?];
        loop {
            if self.consume(Token::Star) {
                factors.push(self.parse_unary()?);
            } else if self.consume(Token::Slash) {
                let divisor = self.parse_unary()?;
                factors.push(Expr::powi(divisor, -1));
            } else if matches!(
                self.peek_token(),
                Some(Token::Ident | Token::LParen | Token::Integer | Token::Float)
            ) {
                factors.push(self.parse_power()?);
            } else {
                break;
            }
        }
        Ok(Expr::mul(factors))
    }

    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        if self.consume(Token::Minus) {
            self.enter()?;
            let inner = self.parse_unary()?;
            self.depth -= 1;
            return Ok(inner.neg());
        }
        if self.consume(Token::Plus) {
            self.enter()?;
            let inner = self.parse_unary();
            self.depth -= 1;
            return inner;
        }
        self.parse_power()
    }

    fn parse_power(&mut self) -> Result<Expr, ParseError> {
        let base = self.parse_primary()?;
        if self.consume(Token::Caret) {
            self.enter()?;
            let exp = self.parse_unary()?;
            self.depth -= 1;
            return Ok(Expr::pow(base, exp));
        }
        Ok(base)
    }

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let Some(tok) = self.next() else {
            return Err(ParseError::at(self.end, "unexpected end of input").expected("an operand"));
        };
        match tok.token {
            Token::Integer | Token::Float => Rational::parse_decimal(&tok.lexeme)
                .map(Expr::number)
                .ok_or_else(|| ParseError::at(tok.start, "invalid number").found(&tok.lexeme)),
            Token::LParen => {
                let inner = self.parse_expr()?;
                self.expect(Token::RParen, "')'")?;
                Ok(inner)
            }
            Token::Ident => self.parse_ident(&tok),
            _ => Err(ParseError::at(tok.start, "unexpected token")
                .found(&tok.lexeme)
                .expected("an operand")),
        }
    }

    fn parse_ident(&mut self, tok: &SpannedToken) -> Result<Expr, ParseError> {
        let name = tok.lexeme.as_str();
        if name == self.variable {
            return Ok(Expr::var(name));
        }
        if name == "sqrt" {
            return Ok(Expr::sqrt(self.parse_call_arg(name)?));
        }
        if let Some(func) = Function::from_name(name) {
            return Ok(Expr::func(func, self.parse_call_arg(name)?));
        }
        match name {
            "pi" => Ok(Expr::constant(Constant::Pi)),
            "e" => Ok(Expr::constant(Constant::E)),
            _ => Err(ParseError::at(tok.start, format!("unknown identifier '{name}'"))
                .found(name)
                .expected(&format!("the variable '{}'", self.variable))),
        }
    }

    fn parse_call_arg(&mut self, name: &str) -> Result<Expr, ParseError> {
        self.expect(Token::LParen, &format!("'(' after {name}"))?;
        let arg = self.parse_expr()?;
        self.expect(Token::RParen, "')'")?;
        Ok(arg)
    }

    fn enter(&mut self) -> Result<(), ParseError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            let pos = self.peek().map_or(self.end, |t| t.start);
            return Err(ParseError::at(pos, "expression nested too deeply"));
        }
        Ok(())
    }

    fn expect(&mut self, token: Token, what: &str) -> Result<(), ParseError> {
        match self.next() {
            Some(tok) if tok.token == token => Ok(()),
            Some(tok) => Err(ParseError::at(tok.start, "unexpected token")
                .found(&tok.lexeme)
                .expected(what)),
            None => Err(ParseError::at(self.end, "unexpected end of input").expected(what)),
        }
    }

    fn peek(&self) -> Option<&SpannedToken> {
        self.tokens.get(self.pos)
    }

    fn peek_token(&self) -> Option<Token> {
        self.peek().map(|t| t.token)
    }

    fn next(&mut self) -> Option<SpannedToken> {
        let tok = self.tokens.get(self.pos).cloned();
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn consume(&mut self, token: Token) -> bool {
        if self.peek_token() == Some(token) {
            self.pos += 1;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn x() -> Expr {
        Expr::var("x")
    }

    #[test]
    fn test_precedence() {
        // 1 + 2*x^2
        let expected = Expr::add([
            Expr::one(),
            Expr::mul([Expr::integer(2), Expr::powi(x(), 2)]),
        ]);
        assert_eq!(parse("1 + 2*x^2").unwrap(), expected);
        assert_eq!(parse("-x^2").unwrap(), Expr::powi(x(), 2).neg());
        assert_eq!(parse("2^3^2").unwrap(), Expr::integer(512));
    }

    #[test]
    fn test_double_star_and_negative_exponent() {
        assert_eq!(parse("x**2").unwrap(), parse("x^2").unwrap());
        assert_eq!(parse("x^-1").unwrap(), Expr::powi(x(), -1));
    }

    #[test]
    fn test_implicit_multiplication() {
        assert_eq!(parse("2x").unwrap(), parse("2*x").unwrap());
        assert_eq!(parse("3(x+1)").unwrap(), parse("3*(x+1)").unwrap());
        assert_eq!(parse("(x+1)(x-1)").unwrap(), parse("(x+1)*(x-1)").unwrap());
    }

    #[test]
    fn test_functions_and_constants() {
        assert_eq!(parse("sqrt(x)").unwrap(), Expr::sqrt(x()));
        assert_eq!(parse("log(x)").unwrap(), Expr::func(Function::Ln, x()));
        assert_eq!(parse("pi").unwrap(), Expr::constant(Constant::Pi));
    }

    #[test]
    fn test_decimals_are_exact() {
        assert_eq!(parse("0.5*x").unwrap(), parse("x/2").unwrap());
    }

    #[test]
    fn test_other_variable() {
        let parser = Parser::new("t");
        assert_eq!(parser.parse("t + 1").unwrap().var_name(), Some("t"));
        let err = parser.parse("x + 1").unwrap_err();
        assert_eq!(err.found_token.as_deref(), Some("x"));
    }

    #[test]
    fn test_errors() {
        assert_eq!(parse("").unwrap_err().message, "empty expression");
        let err = parse("x +").unwrap_err();
        assert_eq!(err.position, 3);
        assert!(parse("(x + 1").is_err());
        assert!(parse("x + y").is_err());
        assert!(parse("sin x").is_err());
        assert!(parse("x $ 2").is_err());
        assert!(parse("x )").is_err());
    }

    #[test]
    fn test_depth_limit() {
        let deep = format!("{}x{}", "(".repeat(1000), ")".repeat(1000));
        assert!(parse(&deep).is_err());
    }
}
