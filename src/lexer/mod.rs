//! The mode-switching lexer engine: prioritized regex rules per mode,
//! longest-prefix-*by-rule-order* matching (not longest-match-across-rules),
//! position tracking, and lazy token production. Generalized from a
//! fixed-dispatch-by-leading-character lexer shape to runtime-declared
//! regex modes.

mod pattern;

pub use pattern::{Action, CompiledRule, CustomOutcome};

use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use crate::error::LexError;
use crate::token::{TerminalKind, TokenFactory};

/// An immutable, runtime-built set of lexical modes plus a per-run state
/// factory. Cheap to clone (everything behind `Rc`/owned small maps) and
/// safe to share across independent `lex` calls, each of which gets its own
/// state object.
pub struct Lexer<K: TerminalKind, Tok, St> {
    modes: HashMap<String, Vec<CompiledRule<K, Tok, St>>>,
    state_factory: Rc<dyn Fn() -> St>,
}

impl<K: TerminalKind, Tok, St> Lexer<K, Tok, St> {
    /// `modes` maps a mode name to its ordered `(regex_source, action)`
    /// rules. Fails if any regex source is malformed.
    pub fn new(
        modes: HashMap<String, Vec<(String, Action<K, Tok, St>)>>,
        state_factory: impl Fn() -> St + 'static,
    ) -> Result<Self, LexError> {
        let mut compiled = HashMap::with_capacity(modes.len());
        for (mode, rules) in modes {
            let mut compiled_rules = Vec::with_capacity(rules.len());
            for (source, action) in rules {
                compiled_rules.push(CompiledRule::compile(&source, action)?);
            }
            compiled.insert(mode, compiled_rules);
        }
        Ok(Lexer {
            modes: compiled,
            state_factory: Rc::new(state_factory),
        })
    }

    /// Starts a fresh, lazy token stream over `source`, entering `mode`.
    /// Not restartable; call again for a second pass.
    pub fn lex<'a>(&'a self, mode: &str, source: &'a str) -> LexStream<'a, K, Tok, St>
    where
        Tok: TokenFactory<K>,
    {
        LexStream {
            lexer: self,
            remaining: source,
            mode: mode.to_string(),
            lineno: 1,
            offset: 0,
            state: (self.state_factory)(),
            pending: VecDeque::new(),
            done: false,
        }
    }
}

/// The lazy sequence `lex` hands back. Yields tokens until the input is
/// exhausted or a rule fails to match, at which point it yields one `Err`
/// and then stops. No error recovery.
pub struct LexStream<'a, K: TerminalKind, Tok, St> {
    lexer: &'a Lexer<K, Tok, St>,
    remaining: &'a str,
    mode: String,
    lineno: usize,
    offset: usize,
    state: St,
    pending: VecDeque<Tok>,
    done: bool,
}

fn advance_position(lineno: &mut usize, offset: &mut usize, matched: &str) {
    let newlines = matched.matches('\n').count();
    if newlines > 0 {
        *lineno += newlines;
        let last_line = matched.rsplit('\n').next().unwrap_or("");
        *offset = last_line.chars().count();
    } else {
        *offset += matched.chars().count();
    }
}

impl<'a, K: TerminalKind, Tok: TokenFactory<K>, St> Iterator for LexStream<'a, K, Tok, St> {
    type Item = Result<Tok, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(tok) = self.pending.pop_front() {
            return Some(Ok(tok));
        }

        loop {
            if self.done {
                return None;
            }
            if self.remaining.is_empty() {
                self.done = true;
                return None;
            }

            let rules = match self.lexer.modes.get(&self.mode) {
                Some(rules) => rules,
                None => {
                    self.done = true;
                    return Some(Err(LexError::new(
                        format!("unknown lexer mode: {}", self.mode),
                        self.lineno,
                        self.offset,
                    )));
                }
            };

            let found = rules
                .iter()
                .find_map(|rule| rule.regex.find(self.remaining).map(|m| (rule, m.end())));

            let Some((rule, matched_len)) = found else {
                self.done = true;
                let offending = self.remaining.chars().next().unwrap();
                return Some(Err(LexError::new(
                    format!("no rule matches character '{offending}'"),
                    self.lineno,
                    self.offset,
                )));
            };

            let matched_text = &self.remaining[..matched_len];
            let zero_width = matched_text.is_empty();
            let start_lineno = self.lineno;
            let start_offset = self.offset;
            let before_mode = self.mode.clone();

            self.remaining = &self.remaining[matched_len..];
            advance_position(&mut self.lineno, &mut self.offset, matched_text);

            match &rule.action {
                Action::Jump(target) => {
                    if zero_width && *target == before_mode {
                        self.done = true;
                        return Some(Err(LexError::new(
                            "zero-width match does not change mode; would loop",
                            start_lineno,
                            start_offset,
                        )));
                    }
                    self.mode = target.clone();
                    continue;
                }
                Action::Emit(kind) => {
                    if zero_width {
                        self.done = true;
                        return Some(Err(LexError::new(
                            "zero-width match does not change mode; would loop",
                            start_lineno,
                            start_offset,
                        )));
                    }
                    let token = Tok::from_match(*kind, matched_text, start_lineno, start_offset);
                    return Some(Ok(token));
                }
                Action::Custom(f) => {
                    let outcome = f(matched_text, &mut self.state, start_lineno, start_offset);
                    match outcome {
                        CustomOutcome::Token(tok) => {
                            if zero_width {
                                self.done = true;
                                return Some(Err(LexError::new(
                                    "zero-width match does not change mode; would loop",
                                    start_lineno,
                                    start_offset,
                                )));
                            }
                            return Some(Ok(tok));
                        }
                        CustomOutcome::Tokens(mut toks) => {
                            if zero_width && toks.is_empty() {
                                self.done = true;
                                return Some(Err(LexError::new(
                                    "zero-width match does not change mode; would loop",
                                    start_lineno,
                                    start_offset,
                                )));
                            }
                            if toks.is_empty() {
                                continue;
                            }
                            let first = toks.remove(0);
                            self.pending.extend(toks);
                            return Some(Ok(first));
                        }
                        CustomOutcome::Jump(target) => {
                            if zero_width && target == before_mode {
                                self.done = true;
                                return Some(Err(LexError::new(
                                    "zero-width match does not change mode; would loop",
                                    start_lineno,
                                    start_offset,
                                )));
                            }
                            self.mode = target;
                            continue;
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::{Associativity, TokenInstance};

    #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
    enum Kind {
        Plus,
        Num,
    }

    impl TerminalKind for Kind {
        fn precedence(&self) -> i32 {
            0
        }
        fn associativity(&self) -> Associativity {
            Associativity::Left
        }
    }

    fn build_lexer() -> Lexer<Kind, TokenInstance<Kind>, ()> {
        let mut modes = HashMap::new();
        modes.insert(
            "start".to_string(),
            vec![
                (r"\+".to_string(), Action::Emit(Kind::Plus)),
                ("".to_string(), Action::Jump("digit".to_string())),
            ],
        );
        modes.insert(
            "digit".to_string(),
            vec![(r"\d+".to_string(), Action::Emit(Kind::Num))],
        );
        Lexer::new(modes, || ()).unwrap()
    }

    #[test]
    fn zero_width_jump_reaches_digit_mode() {
        let lexer = build_lexer();
        let tokens: Result<Vec<_>, _> = lexer.lex("start", "+123").collect();
        let tokens = tokens.unwrap();
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].kind, Kind::Plus);
        assert_eq!(tokens[1].kind, Kind::Num);
    }

    #[test]
    fn trailing_unreachable_input_fails() {
        let lexer = build_lexer();
        let tokens: Result<Vec<_>, _> = lexer.lex("start", "+123+").collect();
        let err = tokens.unwrap_err();
        assert_eq!(err.offset, 4);
    }

    #[test]
    fn newline_resets_offset_and_bumps_line() {
        let mut modes = HashMap::new();
        modes.insert(
            "start".to_string(),
            vec![(r"[\n ]+".to_string(), Action::Jump("start".to_string()))],
        );
        let lexer: Lexer<Kind, TokenInstance<Kind>, ()> = Lexer::new(modes, || ()).unwrap();
        let mut stream = lexer.lex("start", "\n\n  ");
        assert!(stream.next().is_none());
        assert_eq!(stream.lineno, 3);
        assert_eq!(stream.offset, 2);
    }
}
