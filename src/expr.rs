//! Arrival-rate expression evaluator.
//!
//! Parses a closed-form function `f(t)` of the hour index `t` into an
//! AST at configuration time and evaluates it per hour during arrival
//! generation. The grammar covers the arithmetic subset used by the
//! configured arrival profiles:
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := factor (('*' | '/') factor)*
//! factor  := '-' factor | primary
//! primary := number | 't' | 'pi' | func '(' expr (',' expr)* ')' | '(' expr ')'
//! func    := 'cos' | 'sin' | 'min' | 'max'
//! ```
//!
//! Evaluation takes `&self` and touches no shared state, so one parsed
//! expression can be evaluated concurrently for different `t`.

use crate::error::{EngineError, Result};

/// A parsed arrival-rate function with its configuration label.
///
/// The effective mean inter-arrival time at hour `t` is
/// `tau0 / f(t)`; [`ArrivalRate::multiplier`] returns `f(t)` and
/// rejects non-positive values.
#[derive(Debug, Clone)]
pub struct ArrivalRate {
    label: String,
    ast: Expr,
}

impl ArrivalRate {
    /// Parses an expression string under the given label.
    pub fn parse(label: impl Into<String>, expression: &str) -> Result<Self> {
        let ast = Parser::new(expression)
            .and_then(Parser::parse)
            .map_err(|message| EngineError::ExpressionParse {
                expression: expression.to_string(),
                message,
            })?;
        Ok(Self {
            label: label.into(),
            ast,
        })
    }

    /// The configuration label this function was registered under.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Evaluates `f(t)` for an hour index.
    ///
    /// Fails fast with [`EngineError::ArrivalRateNonPositive`] when the
    /// configured profile dips to zero or below; a non-positive
    /// multiplier would produce an infinite or negative mean
    /// inter-arrival time.
    pub fn multiplier(&self, t: i64) -> Result<f64> {
        let value = self.ast.eval(t as f64);
        if value > 0.0 && value.is_finite() {
            Ok(value)
        } else {
            Err(EngineError::ArrivalRateNonPositive {
                label: self.label.clone(),
                t,
                value,
            })
        }
    }
}

/// Expression AST.
#[derive(Debug, Clone, PartialEq)]
enum Expr {
    Number(f64),
    Time,
    Pi,
    Neg(Box<Expr>),
    Add(Box<Expr>, Box<Expr>),
    Sub(Box<Expr>, Box<Expr>),
    Mul(Box<Expr>, Box<Expr>),
    Div(Box<Expr>, Box<Expr>),
    Sin(Box<Expr>),
    Cos(Box<Expr>),
    Min(Box<Expr>, Box<Expr>),
    Max(Box<Expr>, Box<Expr>),
}

impl Expr {
    fn eval(&self, t: f64) -> f64 {
        match self {
            Expr::Number(n) => *n,
            Expr::Time => t,
            Expr::Pi => std::f64::consts::PI,
            Expr::Neg(e) => -e.eval(t),
            Expr::Add(a, b) => a.eval(t) + b.eval(t),
            Expr::Sub(a, b) => a.eval(t) - b.eval(t),
            Expr::Mul(a, b) => a.eval(t) * b.eval(t),
            Expr::Div(a, b) => a.eval(t) / b.eval(t),
            Expr::Sin(e) => e.eval(t).sin(),
            Expr::Cos(e) => e.eval(t).cos(),
            Expr::Min(a, b) => a.eval(t).min(b.eval(t)),
            Expr::Max(a, b) => a.eval(t).max(b.eval(t)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
    Comma,
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn new(input: &str) -> std::result::Result<Self, String> {
        Ok(Self {
            tokens: tokenize(input)?,
            pos: 0,
        })
    }

    fn parse(mut self) -> std::result::Result<Expr, String> {
        let expr = self.expr()?;
        if self.pos < self.tokens.len() {
            return Err(format!("unexpected trailing input at token {}", self.pos));
        }
        Ok(expr)
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<Token> {
        let t = self.tokens.get(self.pos).cloned();
        if t.is_some() {
            self.pos += 1;
        }
        t
    }

    fn expect(&mut self, token: Token) -> std::result::Result<(), String> {
        match self.advance() {
            Some(t) if t == token => Ok(()),
            other => Err(format!("expected {token:?}, found {other:?}")),
        }
    }

    fn expr(&mut self) -> std::result::Result<Expr, String> {
        let mut lhs = self.term()?;
        loop {
            match self.peek() {
                Some(Token::Plus) => {
                    self.advance();
                    lhs = Expr::Add(Box::new(lhs), Box::new(self.term()?));
                }
                Some(Token::Minus) => {
                    self.advance();
                    lhs = Expr::Sub(Box::new(lhs), Box::new(self.term()?));
                }
                _ => return Ok(lhs),
            }
        }
    }

    fn term(&mut self) -> std::result::Result<Expr, String> {
        let mut lhs = self.factor()?;
        loop {
            match self.peek() {
                Some(Token::Star) => {
                    self.advance();
                    lhs = Expr::Mul(Box::new(lhs), Box::new(self.factor()?));
                }
                Some(Token::Slash) => {
                    self.advance();
                    lhs = Expr::Div(Box::new(lhs), Box::new(self.factor()?));
                }
                _ => return Ok(lhs),
            }
        }
    }

    fn factor(&mut self) -> std::result::Result<Expr, String> {
        if matches!(self.peek(), Some(Token::Minus)) {
            self.advance();
            return Ok(Expr::Neg(Box::new(self.factor()?)));
        }
        self.primary()
    }

    fn primary(&mut self) -> std::result::Result<Expr, String> {
        match self.advance() {
            Some(Token::Number(n)) => Ok(Expr::Number(n)),
            Some(Token::LParen) => {
                let inner = self.expr()?;
                self.expect(Token::RParen)?;
                Ok(inner)
            }
            Some(Token::Ident(name)) => match name.as_str() {
                "t" => Ok(Expr::Time),
                "pi" => Ok(Expr::Pi),
                "sin" => Ok(Expr::Sin(Box::new(self.unary_args()?))),
                "cos" => Ok(Expr::Cos(Box::new(self.unary_args()?))),
                "min" => {
                    let (a, b) = self.binary_args()?;
                    Ok(Expr::Min(Box::new(a), Box::new(b)))
                }
                "max" => {
                    let (a, b) = self.binary_args()?;
                    Ok(Expr::Max(Box::new(a), Box::new(b)))
                }
                other => Err(format!("unknown identifier '{other}'")),
            },
            other => Err(format!("unexpected token {other:?}")),
        }
    }

    fn unary_args(&mut self) -> std::result::Result<Expr, String> {
        self.expect(Token::LParen)?;
        let arg = self.expr()?;
        self.expect(Token::RParen)?;
        Ok(arg)
    }

    fn binary_args(&mut self) -> std::result::Result<(Expr, Expr), String> {
        self.expect(Token::LParen)?;
        let a = self.expr()?;
        self.expect(Token::Comma)?;
        let b = self.expr()?;
        self.expect(Token::RParen)?;
        Ok((a, b))
    }
}

fn tokenize(input: &str) -> std::result::Result<Vec<Token>, String> {
    let mut tokens = Vec::new();
    let chars: Vec<char> = input.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        match c {
            ' ' | '\t' => i += 1,
            '+' => {
                tokens.push(Token::Plus);
                i += 1;
            }
            '-' => {
                tokens.push(Token::Minus);
                i += 1;
            }
            '*' => {
                tokens.push(Token::Star);
                i += 1;
            }
            '/' => {
                tokens.push(Token::Slash);
                i += 1;
            }
            '(' => {
                tokens.push(Token::LParen);
                i += 1;
            }
            ')' => {
                tokens.push(Token::RParen);
                i += 1;
            }
            ',' => {
                tokens.push(Token::Comma);
                i += 1;
            }
            '0'..='9' | '.' => {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                    i += 1;
                }
                // Scientific notation tail (e.g. 1.5e-3)
                if i < chars.len() && (chars[i] == 'e' || chars[i] == 'E') {
                    let mut j = i + 1;
                    if j < chars.len() && (chars[j] == '+' || chars[j] == '-') {
                        j += 1;
                    }
                    if j < chars.len() && chars[j].is_ascii_digit() {
                        i = j;
                        while i < chars.len() && chars[i].is_ascii_digit() {
                            i += 1;
                        }
                    }
                }
                let text: String = chars[start..i].iter().collect();
                let n = text
                    .parse::<f64>()
                    .map_err(|_| format!("malformed number '{text}'"))?;
                tokens.push(Token::Number(n));
            }
            c if c.is_ascii_alphabetic() => {
                let start = i;
                while i < chars.len() && chars[i].is_ascii_alphanumeric() {
                    i += 1;
                }
                tokens.push(Token::Ident(chars[start..i].iter().collect()));
            }
            other => return Err(format!("invalid character '{other}'")),
        }
    }
    Ok(tokens)
}
