//! Terminal kinds, the EOS/EPSILON markers and the ready-made [`TokenInstance`]
//! type host programs can use instead of rolling their own.

use std::fmt::Debug;
use std::hash::Hash;

/// Associativity of a terminal kind, used by the shift/reduce resolver.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Associativity {
    #[default]
    Left,
    Right,
}

/// A host-declared terminal kind: an opaque identity plus the two static
/// attributes the table builder consults when resolving conflicts. `EOS` and
/// `EPSILON` are *not* values of this trait; they are bookkeeping-only and
/// are represented separately by [`Term`].
pub trait TerminalKind: Copy + Eq + Hash + Debug + 'static {
    fn precedence(&self) -> i32 {
        0
    }

    fn associativity(&self) -> Associativity {
        Associativity::Left
    }
}

/// A terminal kind, widened with the two bookkeeping-only markers used by
/// FIRST/FOLLOW and the action table. Never constructed from user grammar
/// productions directly: `EOS` never appears in an RHS (an invariant the
/// grammar builder enforces), and `EPSILON` only ever appears inside FIRST
/// sets.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Term<K: TerminalKind> {
    Kind(K),
    Eos,
    Epsilon,
}

impl<K: TerminalKind> Term<K> {
    pub fn precedence(&self) -> i32 {
        match self {
            Term::Kind(k) => k.precedence(),
            Term::Eos | Term::Epsilon => 0,
        }
    }

    pub fn associativity(&self) -> Associativity {
        match self {
            Term::Kind(k) => k.associativity(),
            Term::Eos | Term::Epsilon => Associativity::Left,
        }
    }
}

/// Something a lexer can hand to a parser: a terminal kind plus a source
/// position. Host programs may implement this on their own token type;
/// [`TokenInstance`] is provided for hosts that don't want to.
pub trait Token<K: TerminalKind>: Clone {
    fn kind(&self) -> K;
    fn position(&self) -> (usize, usize);
}

/// Builds a `Self` from a matched lexeme, a terminal kind and a position.
/// Implemented by [`TokenInstance`]; host token types may implement it too
/// so the lexer engine can construct them directly from `Emit` actions.
pub trait TokenFactory<K: TerminalKind>: Sized {
    fn from_match(kind: K, text: &str, lineno: usize, offset: usize) -> Self;
}

/// A token instance: matched text, its kind, and its `(lineno, offset)`
/// position. Equality and hashing follow `plare.token.Token` exactly:
/// identity is `(kind, lineno, offset)`, the matched text is not part of
/// it.
#[derive(Clone, Debug)]
pub struct TokenInstance<K: TerminalKind> {
    pub kind: K,
    pub text: String,
    pub lineno: usize,
    pub offset: usize,
}

impl<K: TerminalKind> PartialEq for TokenInstance<K> {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.lineno == other.lineno && self.offset == other.offset
    }
}

impl<K: TerminalKind> Eq for TokenInstance<K> {}

impl<K: TerminalKind> Hash for TokenInstance<K> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.kind.hash(state);
        self.lineno.hash(state);
        self.offset.hash(state);
    }
}

impl<K: TerminalKind> Token<K> for TokenInstance<K> {
    fn kind(&self) -> K {
        self.kind
    }

    fn position(&self) -> (usize, usize) {
        (self.lineno, self.offset)
    }
}

impl<K: TerminalKind> TokenFactory<K> for TokenInstance<K> {
    fn from_match(kind: K, text: &str, lineno: usize, offset: usize) -> Self {
        TokenInstance {
            kind,
            text: text.to_string(),
            lineno,
            offset,
        }
    }
}
