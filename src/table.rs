//! The action table: `Shift`/`Reduce`/`Goto`/`Accept` per `(state, symbol)`,
//! with precedence/associativity-driven conflict resolution. Grounded in
//! `plare.parser.Table`/`Parser.__init__`'s two-phase "attempt insert, catch
//! conflict, resolve, overwrite" shape.

use std::collections::HashMap;
use std::rc::Rc;

use crate::automaton::Automaton;
use crate::error::GrammarError;
use crate::grammar::{Grammar, Maker, Nt, Symbol};
use crate::token::{Associativity, Term, TerminalKind};

pub struct Reduction<T, Tok> {
    pub left: String,
    pub n: usize,
    pub maker: Rc<Maker<T, Tok>>,
    pub precedence: i32,
}

impl<T, Tok> Clone for Reduction<T, Tok> {
    fn clone(&self) -> Self {
        Reduction {
            left: self.left.clone(),
            n: self.n,
            maker: self.maker.clone(),
            precedence: self.precedence,
        }
    }
}

pub enum TerminalAction<T, Tok> {
    Shift(usize),
    Reduce(Reduction<T, Tok>),
    Accept(String),
}

impl<T, Tok> Clone for TerminalAction<T, Tok> {
    fn clone(&self) -> Self {
        match self {
            TerminalAction::Shift(s) => TerminalAction::Shift(*s),
            TerminalAction::Reduce(r) => TerminalAction::Reduce(r.clone()),
            TerminalAction::Accept(name) => TerminalAction::Accept(name.clone()),
        }
    }
}

enum ConflictKind {
    ShiftReduce,
    ReduceReduce { left: String, precedence: i32 },
}

pub struct ActionTable<K: TerminalKind, T, Tok> {
    terminal: Vec<HashMap<Term<K>, TerminalAction<T, Tok>>>,
    goto: Vec<HashMap<String, usize>>,
}

impl<K: TerminalKind, T, Tok> ActionTable<K, T, Tok> {
    pub fn action(&self, state: usize, term: Term<K>) -> Option<&TerminalAction<T, Tok>> {
        self.terminal[state].get(&term)
    }

    pub fn goto(&self, state: usize, nonterminal: &str) -> Option<usize> {
        self.goto[state].get(nonterminal).copied()
    }

    fn try_set_terminal(
        &mut self,
        state: usize,
        term: Term<K>,
        action: TerminalAction<T, Tok>,
    ) -> Result<(), ConflictKind> {
        match self.terminal[state].get(&term) {
            None => {
                self.terminal[state].insert(term, action);
                Ok(())
            }
            Some(existing) => match (existing, &action) {
                (TerminalAction::Shift(_), TerminalAction::Reduce(_)) => {
                    Err(ConflictKind::ShiftReduce)
                }
                (TerminalAction::Reduce(r), TerminalAction::Reduce(_)) => {
                    Err(ConflictKind::ReduceReduce {
                        left: r.left.clone(),
                        precedence: r.precedence,
                    })
                }
                _ => unreachable!(
                    "internal invariant violated: state {state} already has a {} action for {term:?}, \
                     but a {} action was produced; goto/shift collisions are builder bugs, not grammar errors",
                    action_name(existing),
                    action_name(&action),
                ),
            },
        }
    }

    fn force_set_terminal(&mut self, state: usize, term: Term<K>, action: TerminalAction<T, Tok>) {
        self.terminal[state].insert(term, action);
    }
}

fn action_name<T, Tok>(action: &TerminalAction<T, Tok>) -> &'static str {
    match action {
        TerminalAction::Shift(_) => "Shift",
        TerminalAction::Reduce(_) => "Reduce",
        TerminalAction::Accept(_) => "Accept",
    }
}

pub fn build<K: TerminalKind, T, Tok>(
    grammar: &Grammar<K, T, Tok>,
    automaton: &Automaton<K, T, Tok>,
) -> Result<ActionTable<K, T, Tok>, GrammarError> {
    let n = automaton.states.len();
    let mut table = ActionTable {
        terminal: (0..n).map(|_| HashMap::new()).collect(),
        goto: (0..n).map(|_| HashMap::new()).collect(),
    };

    for (from, symbol, to) in &automaton.edges {
        match symbol {
            Symbol::Terminal(k) => {
                log::debug!("[{from}, {k:?}] -> Shift({to})");
                table.terminal[*from].insert(Term::Kind(*k), TerminalAction::Shift(*to));
            }
            Symbol::NonTerminal(name) => {
                log::debug!("[{from}, {name}] -> Goto({to})");
                table.goto[*from].insert(name.clone(), *to);
            }
        }
    }

    for state in &automaton.states {
        for item in &state.items {
            if !item.is_complete() {
                continue;
            }

            match &item.left {
                Nt::Start(name) => {
                    log::debug!("[{}, EOS] -> Accept({name})", state.id);
                    table
                        .terminal
                        .get_mut(state.id)
                        .unwrap()
                        .insert(Term::Eos, TerminalAction::Accept(name.clone()));
                }
                Nt::Plain(name) => {
                    let rule = &grammar.rules[&item.left];
                    let follow_ref = rule.follow.borrow();
                    let follow = follow_ref
                        .as_ref()
                        .expect("FOLLOW sets must be built before the action table");
                    let follow: Vec<Term<K>> = follow.iter().copied().collect();
                    drop(follow_ref);

                    for term in follow {
                        let reduction = Reduction {
                            left: name.clone(),
                            n: item.rhs.len(),
                            maker: item.maker.clone(),
                            precedence: item.precedence,
                        };
                        match table.try_set_terminal(
                            state.id,
                            term,
                            TerminalAction::Reduce(reduction.clone()),
                        ) {
                            Ok(()) => {}
                            Err(ConflictKind::ShiftReduce) => {
                                log::info!(
                                    "shift/reduce conflict in state {}: {:?} vs {name}",
                                    state.id,
                                    term
                                );
                                let rp = item.precedence;
                                let ap = term.precedence();
                                let prefer_reduce = rp > ap
                                    || (rp == ap && term.associativity() == Associativity::Left);
                                if prefer_reduce {
                                    table.force_set_terminal(
                                        state.id,
                                        term,
                                        TerminalAction::Reduce(reduction),
                                    );
                                }
                            }
                            Err(ConflictKind::ReduceReduce {
                                left: other_left,
                                precedence: other_precedence,
                            }) => {
                                log::info!(
                                    "reduce/reduce conflict in state {}: {other_left} vs {name}",
                                    state.id
                                );
                                if item.precedence > other_precedence {
                                    table.force_set_terminal(
                                        state.id,
                                        term,
                                        TerminalAction::Reduce(reduction),
                                    );
                                } else if item.precedence == other_precedence {
                                    return Err(GrammarError::ReduceReduceConflict {
                                        state: state.id,
                                        left_a: other_left,
                                        left_b: name.clone(),
                                    });
                                }
                            }
                        }
                    }
                }
            }
        }
    }

    log::info!("parser table built: {n} states");
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automaton;
    use crate::grammar::Grammar;
    use crate::token::Associativity;

    #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
    enum Kind {
        Term,
    }

    impl TerminalKind for Kind {
        fn precedence(&self) -> i32 {
            0
        }
        fn associativity(&self) -> Associativity {
            Associativity::Left
        }
    }

    #[derive(Clone)]
    struct TokStub;

    #[test]
    fn equal_precedence_reduce_reduce_is_a_grammar_error() {
        use crate::grammar::Maker;

        let grammar: Grammar<Kind, (), TokStub> = Grammar::new(vec![
            (
                "s".to_string(),
                vec![
                    (vec![Symbol::NonTerminal("a".to_string())], Maker::identity(0)),
                    (vec![Symbol::NonTerminal("b".to_string())], Maker::identity(0)),
                ],
            ),
            ("a".to_string(), vec![(vec![Symbol::Terminal(Kind::Term)], Maker::identity(0))]),
            ("b".to_string(), vec![(vec![Symbol::Terminal(Kind::Term)], Maker::identity(0))]),
        ])
        .unwrap();

        crate::grammar::build_first_sets(&grammar);
        crate::grammar::build_follow_sets(&grammar);
        let automaton = automaton::build(&grammar);

        let err = build(&grammar, &automaton).unwrap_err();
        assert!(matches!(err, GrammarError::ReduceReduceConflict { .. }));
    }

    #[test]
    fn lookups_are_deterministic_one_state_per_row() {
        let grammar: Grammar<Kind, (), TokStub> = Grammar::new(vec![(
            "s".to_string(),
            vec![(vec![Symbol::Terminal(Kind::Term)], crate::grammar::Maker::identity(0))],
        )])
        .unwrap();
        crate::grammar::build_first_sets(&grammar);
        crate::grammar::build_follow_sets(&grammar);
        let automaton = automaton::build(&grammar);
        let table = build(&grammar, &automaton).unwrap();

        assert_eq!(table.terminal.len(), automaton.states.len());
        for state in &automaton.states {
            let first = table.action(state.id, Term::Kind(Kind::Term)).is_some();
            let second = table.action(state.id, Term::Kind(Kind::Term)).is_some();
            assert_eq!(first, second);
        }
    }
}
