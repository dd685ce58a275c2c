//! Breakpoint and watchpoint conditions.
//!
//! A [`Condition`] is a closed predicate over a fixed set of [`Term`]s:
//! registers, individual flags, the record's hit count and, for watchpoints,
//! the last observed value. Conditions are built directly, parsed from a small
//! expression language, or wrapped around a compiled closure.
//!
//! # Expression language
//!
//! ```text
//! expr       := and ( "||" and )*
//! and        := unary ( "&&" unary )*
//! unary      := "!" unary | "(" expr ")" | term [ op number ]
//! op         := "==" | "!=" | "<" | "<=" | ">" | ">="
//! number     := decimal | "$" hex | "0x" hex | "%" binary
//! ```
//!
//! Terms are case-insensitive: `a`, `x`, `y`, `sp`, `pc`, any flag name
//! (`c`, `carry`, `z`, `zero`, ...), `hits` / `hit_count`, `value` /
//! `last_value`. A term without a comparison means "term != 0".
//!
//! ```
//! use emu6502::{Condition, ConditionContext, Registers};
//!
//! let cond = Condition::parse("a == $10 && !carry").unwrap();
//!
//! let mut registers = Registers::default();
//! registers.a = 0x10;
//! let ctx = ConditionContext { registers, hit_count: 0, last_value: None };
//! assert_eq!(cond.evaluate(&ctx), Ok(true));
//! ```

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use thiserror::Error;

use crate::registers::{Flag, Registers};

/// A value a condition can read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Term {
    /// Accumulator
    A,
    /// X index register
    X,
    /// Y index register
    Y,
    /// Stack pointer
    Sp,
    /// Program counter
    Pc,
    /// One status flag, 0 or 1
    Flag(Flag),
    /// Hits recorded before the current evaluation
    HitCount,
    /// Last value observed by a watchpoint
    LastValue,
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::A => f.write_str("a"),
            Term::X => f.write_str("x"),
            Term::Y => f.write_str("y"),
            Term::Sp => f.write_str("sp"),
            Term::Pc => f.write_str("pc"),
            Term::Flag(Flag::Unused) => f.write_str("u"),
            Term::Flag(flag) => write!(f, "{}", flag.letter().to_ascii_lowercase()),
            Term::HitCount => f.write_str("hits"),
            Term::LastValue => f.write_str("value"),
        }
    }
}

impl FromStr for Term {
    type Err = ConditionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let term = match s.to_ascii_lowercase().as_str() {
            "a" => Term::A,
            "x" => Term::X,
            "y" => Term::Y,
            "sp" => Term::Sp,
            "pc" => Term::Pc,
            "hits" | "hit_count" | "hitcount" => Term::HitCount,
            "value" | "last_value" | "lastvalue" => Term::LastValue,
            other => match other.parse::<Flag>() {
                Ok(flag) => Term::Flag(flag),
                Err(_) => return Err(ConditionError::UnknownTerm(s.to_string())),
            },
        };
        Ok(term)
    }
}

/// Comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Comparison {
    /// `==`
    Eq,
    /// `!=`
    Ne,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
}

impl Comparison {
    fn apply(self, lhs: u64, rhs: u64) -> bool {
        match self {
            Comparison::Eq => lhs == rhs,
            Comparison::Ne => lhs != rhs,
            Comparison::Lt => lhs < rhs,
            Comparison::Le => lhs <= rhs,
            Comparison::Gt => lhs > rhs,
            Comparison::Ge => lhs >= rhs,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Comparison::Eq => "==",
            Comparison::Ne => "!=",
            Comparison::Lt => "<",
            Comparison::Le => "<=",
            Comparison::Gt => ">",
            Comparison::Ge => ">=",
        }
    }
}

/// Why a condition could not be built or evaluated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ConditionError {
    /// The expression text is malformed.
    #[error("parse error at offset {position}: {message}")]
    Parse {
        /// Byte offset into the expression
        position: usize,
        /// What went wrong
        message: String,
    },

    /// The expression names something that is not a term.
    #[error("unknown term `{0}`")]
    UnknownTerm(String),

    /// The term has no value in this context (e.g. `value` on a breakpoint).
    #[error("term `{0}` is not available here")]
    Unavailable(Term),

    /// A compiled predicate reported a failure.
    #[error("{0}")]
    Custom(String),
}

/// State a condition is evaluated against, captured after the step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConditionContext {
    /// Registers after the step
    pub registers: Registers,
    /// Hits recorded so far, not counting the one being evaluated
    pub hit_count: u64,
    /// Last value seen by a watchpoint; `None` for breakpoints or when memory
    /// could not be read at registration
    pub last_value: Option<u8>,
}

impl ConditionContext {
    /// Reads one term.
    pub fn value_of(&self, term: Term) -> Result<u64, ConditionError> {
        let r = &self.registers;
        Ok(match term {
            Term::A => r.a as u64,
            Term::X => r.x as u64,
            Term::Y => r.y as u64,
            Term::Sp => r.sp as u64,
            Term::Pc => r.pc as u64,
            Term::Flag(flag) => r.p.get(flag) as u64,
            Term::HitCount => self.hit_count,
            Term::LastValue => self
                .last_value
                .map(u64::from)
                .ok_or(ConditionError::Unavailable(Term::LastValue))?,
        })
    }
}

type PredicateFn = dyn Fn(&ConditionContext) -> Result<bool, ConditionError> + Send + Sync;

/// A named compiled predicate.
#[derive(Clone)]
pub struct CustomPredicate {
    name: String,
    predicate: Arc<PredicateFn>,
}

impl CustomPredicate {
    /// Label shown when the condition is displayed.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Debug for CustomPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomPredicate")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// A predicate attached to a breakpoint or watchpoint.
#[derive(Debug, Clone)]
pub enum Condition {
    /// `term op value`
    Compare {
        /// Left-hand side
        term: Term,
        /// Operator
        op: Comparison,
        /// Right-hand side
        value: u64,
    },
    /// Every sub-condition holds (true when empty).
    All(Vec<Condition>),
    /// At least one sub-condition holds (false when empty).
    Any(Vec<Condition>),
    /// Negation.
    Not(Box<Condition>),
    /// A compiled predicate.
    Custom(CustomPredicate),
}

impl Condition {
    /// Shorthand for [`Condition::Compare`].
    pub fn compare(term: Term, op: Comparison, value: u64) -> Self {
        Condition::Compare { term, op, value }
    }

    /// "Not hit yet": the condition of a temporary breakpoint.
    pub fn not_yet_hit() -> Self {
        Condition::compare(Term::HitCount, Comparison::Lt, 1)
    }

    /// Wraps a closure.
    ///
    /// ```
    /// use emu6502::{Condition, ConditionContext, ConditionError, Registers};
    ///
    /// let even_x = Condition::custom("even x", |ctx: &ConditionContext| {
    ///     Ok::<_, ConditionError>(ctx.registers.x % 2 == 0)
    /// });
    ///
    /// let ctx = ConditionContext { registers: Registers::default(), hit_count: 0, last_value: None };
    /// assert_eq!(even_x.evaluate(&ctx), Ok(true));
    /// assert_eq!(even_x.to_string(), "<even x>");
    /// ```
    pub fn custom<F>(name: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&ConditionContext) -> Result<bool, ConditionError> + Send + Sync + 'static,
    {
        Condition::Custom(CustomPredicate {
            name: name.into(),
            predicate: Arc::new(predicate),
        })
    }

    /// Parses the expression language described in the module docs.
    pub fn parse(text: &str) -> Result<Self, ConditionError> {
        Parser::new(text)?.parse()
    }

    /// Evaluates the condition.
    ///
    /// `All` and `Any` short-circuit, so a failing term after the deciding one
    /// is never read.
    pub fn evaluate(&self, ctx: &ConditionContext) -> Result<bool, ConditionError> {
        match self {
            Condition::Compare { term, op, value } => Ok(op.apply(ctx.value_of(*term)?, *value)),
            Condition::All(parts) => {
                for part in parts {
                    if !part.evaluate(ctx)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            Condition::Any(parts) => {
                for part in parts {
                    if part.evaluate(ctx)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            Condition::Not(inner) => Ok(!inner.evaluate(ctx)?),
            Condition::Custom(custom) => (custom.predicate)(ctx),
        }
    }
}

impl FromStr for Condition {
    type Err = ConditionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Condition::parse(s)
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn joined(f: &mut fmt::Formatter<'_>, parts: &[Condition], sep: &str) -> fmt::Result {
            f.write_str("(")?;
            for (i, part) in parts.iter().enumerate() {
                if i > 0 {
                    f.write_str(sep)?;
                }
                write!(f, "{part}")?;
            }
            f.write_str(")")
        }

        match self {
            Condition::Compare { term, op, value } => write!(f, "{term} {} {value}", op.as_str()),
            Condition::All(parts) => joined(f, parts, " && "),
            Condition::Any(parts) => joined(f, parts, " || "),
            Condition::Not(inner) => write!(f, "!({inner})"),
            Condition::Custom(custom) => write!(f, "<{}>", custom.name),
        }
    }
}

// ========== Parser ==========

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Ident(String),
    Number(u64),
    Op(Comparison),
    AndAnd,
    OrOr,
    Bang,
    LParen,
    RParen,
}

fn parse_error(position: usize, message: impl Into<String>) -> ConditionError {
    ConditionError::Parse {
        position,
        message: message.into(),
    }
}

fn tokenize(text: &str) -> Result<Vec<(usize, Token)>, ConditionError> {
    let bytes = text.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let c = bytes[i];
        let start = i;

        if c.is_ascii_whitespace() {
            i += 1;
            continue;
        }

        let two = bytes.get(i..i + 2);
        let token = match (c, two) {
            (_, Some(b"&&")) => {
                i += 2;
                Token::AndAnd
            }
            (_, Some(b"||")) => {
                i += 2;
                Token::OrOr
            }
            (_, Some(b"==")) => {
                i += 2;
                Token::Op(Comparison::Eq)
            }
            (_, Some(b"!=")) => {
                i += 2;
                Token::Op(Comparison::Ne)
            }
            (_, Some(b"<=")) => {
                i += 2;
                Token::Op(Comparison::Le)
            }
            (_, Some(b">=")) => {
                i += 2;
                Token::Op(Comparison::Ge)
            }
            (b'<', _) => {
                i += 1;
                Token::Op(Comparison::Lt)
            }
            (b'>', _) => {
                i += 1;
                Token::Op(Comparison::Gt)
            }
            (b'!', _) => {
                i += 1;
                Token::Bang
            }
            (b'(', _) => {
                i += 1;
                Token::LParen
            }
            (b')', _) => {
                i += 1;
                Token::RParen
            }
            (b'$' | b'%' | b'0'..=b'9', _) => {
                let (radix, digits_start) = match (c, two) {
                    (b'$', _) => (16, i + 1),
                    (b'%', _) => (2, i + 1),
                    (_, Some(b"0x" | b"0X")) => (16, i + 2),
                    _ => (10, i),
                };
                let mut end = digits_start;
                while end < bytes.len() && bytes[end].is_ascii_alphanumeric() {
                    end += 1;
                }
                let digits = &text[digits_start..end];
                let value = u64::from_str_radix(digits, radix).map_err(|_| {
                    parse_error(start, format!("invalid number `{}`", &text[start..end]))
                })?;
                i = end;
                Token::Number(value)
            }
            (c, _) if c.is_ascii_alphabetic() || c == b'_' => {
                let mut end = i;
                while end < bytes.len()
                    && (bytes[end].is_ascii_alphanumeric() || bytes[end] == b'_')
                {
                    end += 1;
                }
                let ident = text[i..end].to_string();
                i = end;
                Token::Ident(ident)
            }
            _ => {
                let ch = text[i..].chars().next().unwrap_or('?');
                return Err(parse_error(start, format!("unexpected character `{ch}`")));
            }
        };
        tokens.push((start, token));
    }

    Ok(tokens)
}

/// Deepest run of `!` and `(` the parser accepts.
const MAX_NESTING: usize = 64;

struct Parser {
    tokens: Vec<(usize, Token)>,
    pos: usize,
    end: usize,
    depth: usize,
}

impl Parser {
    fn new(text: &str) -> Result<Self, ConditionError> {
        Ok(Self {
            tokens: tokenize(text)?,
            pos: 0,
            end: text.len(),
            depth: 0,
        })
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(_, t)| t)
    }

    fn offset(&self) -> usize {
        self.tokens.get(self.pos).map_or(self.end, |(at, _)| *at)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).map(|(_, t)| t.clone());
        self.pos += 1;
        token
    }

    fn descend(&mut self, at: usize) -> Result<(), ConditionError> {
        if self.depth == MAX_NESTING {
            return Err(parse_error(at, format!("nesting deeper than {MAX_NESTING} levels")));
        }
        self.depth += 1;
        Ok(())
    }

    fn parse(mut self) -> Result<Condition, ConditionError> {
        if self.tokens.is_empty() {
            return Err(parse_error(0, "empty expression"));
        }
        let cond = self.parse_or()?;
        if self.peek().is_some() {
            return Err(parse_error(self.offset(), "unexpected trailing input"));
        }
        Ok(cond)
    }

    fn parse_or(&mut self) -> Result<Condition, ConditionError> {
        let mut parts = vec![self.parse_and()?];
        while self.peek() == Some(&Token::OrOr) {
            self.pos += 1;
            parts.push(self.parse_and()?);
        }
        Ok(if parts.len() == 1 {
            parts.remove(0)
        } else {
            Condition::Any(parts)
        })
    }

    fn parse_and(&mut self) -> Result<Condition, ConditionError> {
        let mut parts = vec![self.parse_unary()?];
        while self.peek() == Some(&Token::AndAnd) {
            self.pos += 1;
            parts.push(self.parse_unary()?);
        }
        Ok(if parts.len() == 1 {
            parts.remove(0)
        } else {
            Condition::All(parts)
        })
    }

    fn parse_unary(&mut self) -> Result<Condition, ConditionError> {
        let at = self.offset();
        match self.next() {
            Some(Token::Bang) => {
                self.descend(at)?;
                let inner = self.parse_unary()?;
                self.depth -= 1;
                Ok(Condition::Not(Box::new(inner)))
            }
            Some(Token::LParen) => {
                self.descend(at)?;
                let inner = self.parse_or()?;
                self.depth -= 1;
                match self.next() {
                    Some(Token::RParen) => Ok(inner),
                    _ => Err(parse_error(at, "unclosed `(`")),
                }
            }
            Some(Token::Ident(name)) => {
                let term: Term = name.parse()?;
                if let Some(Token::Op(op)) = self.peek().cloned() {
                    self.pos += 1;
                    let value_at = self.offset();
                    match self.next() {
                        Some(Token::Number(value)) => Ok(Condition::compare(term, op, value)),
                        _ => Err(parse_error(value_at, "expected a number")),
                    }
                } else {
                    Ok(Condition::compare(term, Comparison::Ne, 0))
                }
            }
            Some(_) => Err(parse_error(at, "expected a term, `!` or `(`")),
            None => Err(parse_error(at, "unexpected end of expression")),
        }
    }
}
