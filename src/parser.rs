//! The table-driven shift/reduce parse loop, and the `Parser` type that
//! owns a built grammar + action table. Grounded in `plare.parser.Parser`
//! (`__init__` builds the table once; `parse` runs the loop).

use std::collections::HashMap;

use crate::automaton;
use crate::error::{GrammarError, ParseError};
use crate::grammar::{build_first_sets, build_follow_sets, Grammar, Maker, StackValue, Symbol};
use crate::table::{self, ActionTable, TerminalAction};
use crate::token::{Term, TerminalKind, Token};

pub struct Parser<K: TerminalKind, T, Tok> {
    grammar: Grammar<K, T, Tok>,
    table: ActionTable<K, T, Tok>,
    entry_states: HashMap<String, usize>,
}

impl<K: TerminalKind, T, Tok> Parser<K, T, Tok>
where
    T: Clone,
    Tok: Clone + Token<K>,
{
    /// Builds the FIRST/FOLLOW sets, the canonical LR(0) item-set
    /// automaton, and the action table, once. `productions` maps a
    /// nonterminal name to its ordered right-hand sides.
    pub fn new(
        productions: Vec<(String, Vec<(Vec<Symbol<K>>, Maker<T, Tok>)>)>,
    ) -> Result<Self, GrammarError> {
        let grammar = Grammar::new(productions)?;
        build_first_sets(&grammar);
        build_follow_sets(&grammar);

        let automaton = automaton::build(&grammar);
        let entry_states = automaton.entry_states.clone();
        let table = table::build(&grammar, &automaton)?;

        log::info!("parser created");
        Ok(Parser {
            grammar,
            table,
            entry_states,
        })
    }

    /// Runs the shift/reduce loop over `tokens`, entering at `entry`. The
    /// caller's iterator never needs to produce an explicit EOS; once it
    /// is exhausted the driver treats the next lookahead as `Term::Eos`
    /// (see DESIGN.md for why no literal EOS token value is needed).
    pub fn parse<I>(
        &self,
        entry: &str,
        tokens: I,
    ) -> Result<StackValue<T, Tok>, ParseError>
    where
        I: IntoIterator<Item = Tok>,
    {
        let &entry_state = self
            .entry_states
            .get(entry)
            .ok_or_else(|| ParseError::UnexpectedSymbol {
                symbol: entry.to_string(),
                lineno: 0,
                offset: 0,
            })?;

        let mut tokens = tokens.into_iter();
        let mut state_stack = vec![entry_state];
        let mut value_stack: Vec<StackValue<T, Tok>> = Vec::new();

        let mut pending: Option<Tok> = tokens.next();
        let mut lookahead: Option<Lookahead<K>> = None;

        loop {
            let key = match &lookahead {
                Some(l) => l.clone(),
                None => match &pending {
                    Some(tok) => Lookahead::Term(Term::Kind(tok.kind())),
                    None => Lookahead::Term(Term::Eos),
                },
            };

            let &state = state_stack.last().unwrap();
            log::debug!("state {state}, lookahead {key:?}");

            match &key {
                Lookahead::Term(term) => {
                    let action = self.table.action(state, *term).cloned();
                    lookahead = None;
                    match action {
                        Some(TerminalAction::Shift(next)) => {
                            let tok = pending.take().ok_or(ParseError::UnexpectedEndOfInput)?;
                            state_stack.push(next);
                            value_stack.push(StackValue::Token(tok));
                            pending = tokens.next();
                        }
                        Some(TerminalAction::Reduce(reduction)) => {
                            let n = reduction.n;
                            let popped = if n > 0 {
                                let split_at = value_stack.len() - n;
                                state_stack.truncate(state_stack.len() - n);
                                value_stack.split_off(split_at)
                            } else {
                                Vec::new()
                            };
                            let produced = reduction.maker.apply(&popped);
                            value_stack.push(produced);
                            lookahead = Some(Lookahead::NonTerminal(reduction.left));
                        }
                        Some(TerminalAction::Accept(symbol)) => {
                            if symbol != entry {
                                return Err(ParseError::WrongAcceptEntry {
                                    expected: entry.to_string(),
                                    actual: symbol,
                                });
                            }
                            break;
                        }
                        None => {
                            let (lineno, offset) = pending
                                .as_ref()
                                .map(|t| t.position())
                                .unwrap_or((0, 0));
                            return Err(ParseError::UnexpectedSymbol {
                                symbol: format!("{term:?}"),
                                lineno,
                                offset,
                            });
                        }
                    }
                }
                Lookahead::NonTerminal(name) => {
                    let next = self.table.goto(state, name).ok_or_else(|| {
                        ParseError::UnexpectedSymbol {
                            symbol: name.clone(),
                            lineno: 0,
                            offset: 0,
                        }
                    })?;
                    state_stack.push(next);
                    lookahead = match &pending {
                        Some(tok) => Some(Lookahead::Term(Term::Kind(tok.kind()))),
                        None => Some(Lookahead::Term(Term::Eos)),
                    };
                }
            }
        }

        debug_assert_eq!(value_stack.len(), 1, "accept must leave exactly one semantic value");
        Ok(value_stack.pop().expect("accept leaves exactly one value"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::Symbol;
    use crate::token::Associativity;

    #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
    enum Kind {
        Num,
        Plus,
    }

    impl TerminalKind for Kind {
        fn precedence(&self) -> i32 {
            0
        }
        fn associativity(&self) -> Associativity {
            Associativity::Left
        }
    }

    fn sum_parser() -> Parser<Kind, i64, crate::token::TokenInstance<Kind>> {
        let exp = (
            "exp".to_string(),
            vec![
                (
                    vec![
                        Symbol::NonTerminal("exp".to_string()),
                        Symbol::Terminal(Kind::Plus),
                        Symbol::NonTerminal("exp".to_string()),
                    ],
                    Maker::construct(vec![0, 2], |args| {
                        let mut it = args.into_iter();
                        let l = it.next().unwrap().into_node().unwrap();
                        let r = it.next().unwrap().into_node().unwrap();
                        l + r
                    }),
                ),
                (
                    vec![Symbol::Terminal(Kind::Num)],
                    Maker::construct(vec![0], |args| {
                        args.into_iter().next().unwrap().into_token().unwrap().text.parse().unwrap()
                    }),
                ),
            ],
        );
        Parser::new(vec![exp]).unwrap()
    }

    fn tok(kind: Kind, text: &str, offset: usize) -> crate::token::TokenInstance<Kind> {
        crate::token::TokenInstance {
            kind,
            text: text.to_string(),
            lineno: 1,
            offset,
        }
    }

    #[test]
    fn successful_parse_produces_a_single_node() {
        let parser = sum_parser();
        let tokens = vec![
            tok(Kind::Num, "1", 0),
            tok(Kind::Plus, "+", 1),
            tok(Kind::Num, "2", 2),
            tok(Kind::Plus, "+", 3),
            tok(Kind::Num, "3", 4),
        ];
        let result = parser.parse("exp", tokens).unwrap();
        assert_eq!(result.into_node(), Some(6));
    }

    #[test]
    fn trailing_token_after_accept_state_is_rejected() {
        let parser = sum_parser();
        let tokens = vec![tok(Kind::Num, "1", 0), tok(Kind::Num, "2", 1)];
        assert!(parser.parse("exp", tokens).is_err());
    }
}

#[derive(Clone, Debug)]
enum Lookahead<K: TerminalKind> {
    Term(Term<K>),
    NonTerminal(String),
}
