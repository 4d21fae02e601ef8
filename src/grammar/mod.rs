//! Grammar model: productions, the "maker" that fabricates a semantic value
//! from popped symbols, and the rule map productions are resolved against.
//! Grounded in `plare.parser.Rule`/`Item`/`StartVariable`.

mod first_follow;

pub use first_follow::{
    build_first_sets, build_follow_sets, first_of_sequence, FirstSets, FollowSets,
};

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::error::GrammarError;
use crate::token::{Term, TerminalKind};

/// A nonterminal name, distinguishing ordinary user nonterminals from the
/// synthetic augmented-start variant (`S' -> S`). Kept as a distinct variant
/// rather than a tagged string so that an ordinary nonterminal never
/// compares equal to its own augmentation.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum Nt {
    Plain(String),
    Start(String),
}

impl Nt {
    pub fn plain(name: impl Into<String>) -> Self {
        Nt::Plain(name.into())
    }

    /// The user-facing name, stripped of augmentation.
    pub fn orig(&self) -> &str {
        match self {
            Nt::Plain(n) | Nt::Start(n) => n,
        }
    }
}

impl fmt::Display for Nt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Nt::Plain(n) => write!(f, "{n}"),
            Nt::Start(n) => write!(f, "{n}'"),
        }
    }
}

/// A symbol on the right-hand side of a production: a terminal kind or a
/// (plain) nonterminal name. `EOS`/`EPSILON` and augmented starts never
/// appear here; that invariant is enforced at grammar-construction time.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum Symbol<K: TerminalKind> {
    Terminal(K),
    NonTerminal(String),
}

/// A value living on the parser's semantic stack: either a token the lexer
/// produced, or a node some maker constructed. The result of a successful
/// parse is one of these.
#[derive(Clone, Debug)]
pub enum StackValue<T, Tok> {
    Token(Tok),
    Node(T),
}

impl<T, Tok> StackValue<T, Tok> {
    pub fn into_node(self) -> Option<T> {
        match self {
            StackValue::Node(t) => Some(t),
            StackValue::Token(_) => None,
        }
    }

    pub fn into_token(self) -> Option<Tok> {
        match self {
            StackValue::Token(tok) => Some(tok),
            StackValue::Node(_) => None,
        }
    }
}

type ConstructFn<T, Tok> = Rc<dyn Fn(Vec<StackValue<T, Tok>>) -> T>;

/// The constructor-or-identity selector that builds a semantic value from a
/// reduction's popped symbols (`plare.parser.TMaker`/`IDMaker`).
#[derive(Clone)]
pub enum Maker<T, Tok> {
    /// Passes one popped value through unchanged.
    Identity(usize),
    /// Gathers the selected indices (in order) and applies a user constructor.
    Construct(ConstructFn<T, Tok>, Vec<usize>),
}

impl<T, Tok> Maker<T, Tok>
where
    T: Clone,
    Tok: Clone,
{
    pub fn identity(index: usize) -> Self {
        Maker::Identity(index)
    }

    pub fn construct<F>(indices: Vec<usize>, ctor: F) -> Self
    where
        F: Fn(Vec<StackValue<T, Tok>>) -> T + 'static,
    {
        Maker::Construct(Rc::new(ctor), indices)
    }

    /// `popped` holds exactly the production's RHS-length values, in RHS order.
    pub fn apply(&self, popped: &[StackValue<T, Tok>]) -> StackValue<T, Tok> {
        match self {
            Maker::Identity(i) => popped[*i].clone(),
            Maker::Construct(ctor, indices) => {
                let args: Vec<_> = indices.iter().map(|&i| popped[i].clone()).collect();
                StackValue::Node(ctor(args))
            }
        }
    }
}

/// One right-hand side of a rule, with its derived precedence: the
/// precedence of the first positive-precedence RHS terminal, else the first
/// negative one, else 0. Deliberately asymmetric; see DESIGN.md.
pub struct Production<K: TerminalKind, T, Tok> {
    pub symbols: Vec<Symbol<K>>,
    pub maker: Rc<Maker<T, Tok>>,
    pub precedence: i32,
}

impl<K: TerminalKind, T, Tok> Production<K, T, Tok> {
    pub fn new(symbols: Vec<Symbol<K>>, maker: Maker<T, Tok>) -> Self {
        let precedence = derive_precedence(&symbols);
        Production {
            symbols,
            maker: Rc::new(maker),
            precedence,
        }
    }
}

fn derive_precedence<K: TerminalKind>(symbols: &[Symbol<K>]) -> i32 {
    let terminals: Vec<K> = symbols
        .iter()
        .filter_map(|s| match s {
            Symbol::Terminal(k) => Some(*k),
            Symbol::NonTerminal(_) => None,
        })
        .collect();

    for k in &terminals {
        if k.precedence() > 0 {
            return k.precedence();
        }
    }
    for k in &terminals {
        if k.precedence() < 0 {
            return k.precedence();
        }
    }
    0
}

/// A nonterminal with its ordered productions, plus memoized FIRST/FOLLOW
/// sets filled in by the grammar builder.
pub struct Rule<K: TerminalKind, T, Tok> {
    pub left: Nt,
    pub productions: Vec<Production<K, T, Tok>>,
    pub(crate) first: RefCell<Option<std::collections::HashSet<Term<K>>>>,
    pub(crate) follow: RefCell<Option<std::collections::HashSet<Term<K>>>>,
}

impl<K: TerminalKind, T, Tok> Rule<K, T, Tok> {
    pub fn new(left: Nt, productions: Vec<Production<K, T, Tok>>) -> Self {
        Rule {
            left,
            productions,
            first: RefCell::new(None),
            follow: RefCell::new(None),
        }
    }
}

/// The full rule map, name-indexed (resolved by indirection to avoid object
/// cycles), with one augmented start synthesized per user-declared
/// nonterminal.
pub struct Grammar<K: TerminalKind, T, Tok> {
    pub rules: HashMap<Nt, Rule<K, T, Tok>>,
    pub declared_order: Vec<String>,
    pub start_variables: Vec<Nt>,
}

impl<K: TerminalKind, T, Tok> Grammar<K, T, Tok>
where
    T: Clone,
    Tok: Clone,
{
    /// `productions` maps a nonterminal name to its ordered right-hand
    /// sides, each a `(symbols, maker)` pair.
    pub fn new(
        productions: Vec<(String, Vec<(Vec<Symbol<K>>, Maker<T, Tok>)>)>,
    ) -> Result<Self, GrammarError> {
        let declared_order: Vec<String> = productions.iter().map(|(name, _)| name.clone()).collect();
        let declared: std::collections::HashSet<&str> =
            declared_order.iter().map(|s| s.as_str()).collect();

        let mut rules = HashMap::new();
        for (name, rhs) in &productions {
            for (symbols, _) in rhs {
                for s in symbols {
                    if let Symbol::NonTerminal(n) = s {
                        if !declared.contains(n.as_str()) {
                            return Err(GrammarError::UnknownNonTerminal(n.clone()));
                        }
                    }
                }
            }
            let prods = rhs
                .iter()
                .map(|(symbols, maker)| Production::new(symbols.clone(), maker.clone()))
                .collect();
            rules.insert(Nt::plain(name), Rule::new(Nt::plain(name), prods));
        }

        let mut start_variables = Vec::new();
        for name in &declared_order {
            let start = Nt::Start(name.clone());
            let entry_production = Production::new(
                vec![Symbol::NonTerminal(name.clone())],
                Maker::identity(0),
            );
            rules.insert(start.clone(), Rule::new(start.clone(), vec![entry_production]));
            start_variables.push(start);
        }

        Ok(Grammar {
            rules,
            declared_order,
            start_variables,
        })
    }
}

