//! Error taxonomy. Three disjoint kinds, hand-rolled (`Display` + `Error`
//! impls, no derive macro) rather than a `thiserror` derive.

use std::error::Error as StdError;
use std::fmt::{self, Display};

/// No rule matched at a non-empty position, or a zero-width match would loop.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LexError {
    pub message: String,
    pub lineno: usize,
    pub offset: usize,
}

impl LexError {
    pub fn new(message: impl Into<String>, lineno: usize, offset: usize) -> Self {
        Self {
            message: message.into(),
            lineno,
            offset,
        }
    }
}

impl Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "lexing error at ({}, {}): {}",
            self.lineno, self.offset, self.message
        )
    }
}

impl StdError for LexError {}

/// Unresolved reduce/reduce conflict or a malformed production.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GrammarError {
    ReduceReduceConflict {
        state: usize,
        left_a: String,
        left_b: String,
    },
    UnknownNonTerminal(String),
}

impl Display for GrammarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GrammarError::ReduceReduceConflict {
                state,
                left_a,
                left_b,
            } => write!(
                f,
                "reduce/reduce conflict in state {state}: {left_a} vs {left_b}"
            ),
            GrammarError::UnknownNonTerminal(name) => {
                write!(f, "unknown nonterminal referenced: {name}")
            }
        }
    }
}

impl StdError for GrammarError {}

/// No action for `(state, lookahead)`, unexpected end of input, or `Accept` under the wrong start.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParseError {
    UnexpectedEndOfInput,
    UnexpectedSymbol {
        symbol: String,
        lineno: usize,
        offset: usize,
    },
    WrongAcceptEntry {
        expected: String,
        actual: String,
    },
}

impl Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::UnexpectedEndOfInput => write!(f, "unexpected end of input"),
            ParseError::UnexpectedSymbol {
                symbol,
                lineno,
                offset,
            } => write!(
                f,
                "unexpected symbol: {symbol} at ({lineno}, {offset})"
            ),
            ParseError::WrongAcceptEntry { expected, actual } => write!(
                f,
                "unexpected symbol parsed: expected entry {expected}, got {actual}"
            ),
        }
    }
}

impl StdError for ParseError {}

/// Sum of the three error kinds, for callers that don't care which stage failed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    Lex(LexError),
    Grammar(GrammarError),
    Parse(ParseError),
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Lex(e) => e.fmt(f),
            Error::Grammar(e) => e.fmt(f),
            Error::Parse(e) => e.fmt(f),
        }
    }
}

impl StdError for Error {}

impl From<LexError> for Error {
    fn from(e: LexError) -> Self {
        Error::Lex(e)
    }
}

impl From<GrammarError> for Error {
    fn from(e: GrammarError) -> Self {
        Error::Grammar(e)
    }
}

impl From<ParseError> for Error {
    fn from(e: ParseError) -> Self {
        Error::Parse(e)
    }
}
