//! Runtime-constructed lexer and LR(0)/SLR(1) parser-table generator.
//!
//! A host declares a set of named lexical modes (prioritized regex rules
//! with jump/emit/custom actions) and a context-free grammar (productions
//! with "maker" constructors); this crate builds a table-driven shift/reduce
//! parser and a lazy tokenizer from them. See [`parser::Parser`] and
//! [`lexer::Lexer`] for the two entry points.

pub mod automaton;
pub mod error;
pub mod grammar;
pub mod lexer;
pub mod parser;
pub mod table;
pub mod token;

pub use error::{Error, GrammarError, LexError, ParseError};
pub use grammar::{Maker, StackValue, Symbol};
pub use lexer::{Action, CustomOutcome, Lexer};
pub use parser::Parser;
pub use token::{Associativity, Term, TerminalKind, Token, TokenFactory, TokenInstance};
