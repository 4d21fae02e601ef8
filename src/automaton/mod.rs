//! The canonical collection of LR(0) item sets and the edges between them.
//! Grounded in `plare.parser.closure`/`goto`/`Parser.__init__`'s worklist.

mod item;

pub use item::Item;

use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use crate::grammar::{Grammar, Nt, Symbol};
use crate::token::TerminalKind;

pub type ItemSet<K, T, Tok> = HashSet<Item<K, T, Tok>>;

pub struct State<K: TerminalKind, T, Tok> {
    pub id: usize,
    pub items: ItemSet<K, T, Tok>,
}

impl<K: TerminalKind, T, Tok> PartialEq for State<K, T, Tok> {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}
impl<K: TerminalKind, T, Tok> Eq for State<K, T, Tok> {}

/// All items of every rule, indexed by nonterminal. Used to seed closure
/// without re-walking `Grammar::rules` on every step.
fn all_items<K: TerminalKind, T, Tok>(
    grammar: &Grammar<K, T, Tok>,
) -> HashMap<Nt, ItemSet<K, T, Tok>> {
    grammar
        .rules
        .iter()
        .map(|(left, rule)| {
            let items: ItemSet<K, T, Tok> = rule
                .productions
                .iter()
                .map(|p| {
                    Item::new(
                        left.clone(),
                        Rc::new(p.symbols.clone()),
                        p.maker.clone(),
                        p.precedence,
                    )
                })
                .collect();
            (left.clone(), items)
        })
        .collect()
}

/// Closure(I): repeatedly add every production of a nonterminal sitting
/// right after a dot, until nothing new appears.
pub fn closure<K: TerminalKind, T, Tok>(
    items: ItemSet<K, T, Tok>,
    all_items: &HashMap<Nt, ItemSet<K, T, Tok>>,
) -> ItemSet<K, T, Tok> {
    let mut items = items;
    let mut worklist: Vec<Item<K, T, Tok>> = items.iter().cloned().collect();

    while let Some(item) = worklist.pop() {
        let Some(Symbol::NonTerminal(name)) = item.next_symbol() else {
            continue;
        };
        let key = Nt::plain(name);
        if let Some(productions) = all_items.get(&key) {
            for candidate in productions {
                if items.insert(candidate.clone()) {
                    worklist.push(candidate.clone());
                }
            }
        }
    }
    items
}

/// Goto(I, X): advance every item whose next symbol is `X`, then close.
pub fn goto<K: TerminalKind, T, Tok>(
    items: &ItemSet<K, T, Tok>,
    symbol: &Symbol<K>,
    all_items: &HashMap<Nt, ItemSet<K, T, Tok>>,
) -> ItemSet<K, T, Tok> {
    let moved: ItemSet<K, T, Tok> = items.iter().filter_map(|item| item.advance(symbol)).collect();
    closure(moved, all_items)
}

/// One canonical collection: states plus the (from, symbol, to) edges
/// between them, plus which state id each declared nonterminal's augmented
/// start enters from.
pub struct Automaton<K: TerminalKind, T, Tok> {
    pub states: Vec<State<K, T, Tok>>,
    pub edges: Vec<(usize, Symbol<K>, usize)>,
    pub entry_states: HashMap<String, usize>,
}

pub fn build<K: TerminalKind, T, Tok>(grammar: &Grammar<K, T, Tok>) -> Automaton<K, T, Tok> {
    let all = all_items(grammar);

    let mut states: Vec<State<K, T, Tok>> = Vec::new();
    let mut entry_states = HashMap::new();

    for start in &grammar.start_variables {
        let rule = &grammar.rules[start];
        let seed: ItemSet<K, T, Tok> = rule
            .productions
            .iter()
            .map(|p| Item::new(start.clone(), Rc::new(p.symbols.clone()), p.maker.clone(), p.precedence))
            .collect();
        let items = closure(seed, &all);
        let id = states.len();
        entry_states.insert(start.orig().to_string(), id);
        states.push(State { id, items });
    }

    let mut edges: Vec<(usize, Symbol<K>, usize)> = Vec::new();
    let mut worklist: Vec<usize> = (0..states.len()).collect();

    while let Some(state_id) = worklist.pop() {
        let nexts: HashSet<Symbol<K>> = states[state_id]
            .items
            .iter()
            .filter_map(|item| item.next_symbol().cloned())
            .collect();

        for symbol in nexts {
            let target_items = goto(&states[state_id].items, &symbol, &all);

            let existing = states.iter().position(|s| s.items == target_items);
            let target_id = match existing {
                Some(id) => id,
                None => {
                    let id = states.len();
                    states.push(State { id, items: target_items });
                    worklist.push(id);
                    id
                }
            };

            if !edges
                .iter()
                .any(|(f, s, t)| *f == state_id && *s == symbol && *t == target_id)
            {
                edges.push((state_id, symbol, target_id));
            }
        }
    }

    Automaton {
        states,
        edges,
        entry_states,
    }
}
