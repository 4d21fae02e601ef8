//! Compiled per-mode rules: an anchored regex paired with an action.
//! Generalizes a fixed dispatch string table into runtime-supplied regex
//! sources.

use std::rc::Rc;

use regex::Regex;

use crate::error::LexError;
use crate::token::TerminalKind;

/// What happens when a rule fires.
pub enum Action<K: TerminalKind, Tok, St> {
    /// Switch to a different mode; the matched text is consumed, nothing emitted.
    Jump(String),
    /// Construct one token of this kind from the matched text.
    Emit(K),
    /// Call out to host code; its result is classified by [`CustomOutcome`].
    Custom(Rc<dyn Fn(&str, &mut St, usize, usize) -> CustomOutcome<Tok>>),
}

impl<K: TerminalKind, Tok, St> Clone for Action<K, Tok, St> {
    fn clone(&self) -> Self {
        match self {
            Action::Jump(mode) => Action::Jump(mode.clone()),
            Action::Emit(k) => Action::Emit(*k),
            Action::Custom(f) => Action::Custom(f.clone()),
        }
    }
}

/// What a [`Action::Custom`] function handed back.
pub enum CustomOutcome<Tok> {
    Token(Tok),
    Tokens(Vec<Tok>),
    Jump(String),
}

/// One compiled rule: an anchored regex plus its action, in the declaration
/// order the mode lists it.
pub struct CompiledRule<K: TerminalKind, Tok, St> {
    pub regex: Regex,
    pub action: Action<K, Tok, St>,
}

impl<K: TerminalKind, Tok, St> Clone for CompiledRule<K, Tok, St> {
    fn clone(&self) -> Self {
        CompiledRule {
            regex: self.regex.clone(),
            action: self.action.clone(),
        }
    }
}

impl<K: TerminalKind, Tok, St> CompiledRule<K, Tok, St> {
    /// Anchors `source` at the start of the haystack (`^(?:...)`) so a
    /// match only ever considers a prefix of what is left to lex.
    pub fn compile(source: &str, action: Action<K, Tok, St>) -> Result<Self, LexError> {
        let anchored = format!("^(?:{source})");
        let regex = Regex::new(&anchored)
            .map_err(|e| LexError::new(format!("invalid pattern /{source}/: {e}"), 0, 0))?;
        Ok(CompiledRule { regex, action })
    }
}
