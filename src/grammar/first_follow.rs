//! FIRST/FOLLOW computation. FIRST follows `plare.parser.Rule.calc_first`
//! line for line, including its self-recursion workaround. FOLLOW is
//! computed to an explicit fixpoint using the full-suffix FIRST(beta)
//! formula; see DESIGN.md for why that's broader than the recursive-with-memo
//! approach it's adapted from.

use std::collections::{HashMap, HashSet};

use super::{Grammar, Nt, Rule, Symbol};
use crate::token::{Term, TerminalKind};

pub type FirstSets<K> = HashMap<Nt, HashSet<Term<K>>>;
pub type FollowSets<K> = HashMap<Nt, HashSet<Term<K>>>;

/// FIRST(A), memoized on the rule itself via its `RefCell`. Mirrors
/// `Rule.calc_first`: self-recursive suffixes (where the walk re-encounters
/// `A` itself) are deferred and only replayed once `EPSILON` is known to be
/// in `FIRST(A)`.
pub fn calc_first<K: TerminalKind, T, Tok>(
    left: &Nt,
    rules: &HashMap<Nt, Rule<K, T, Tok>>,
) -> HashSet<Term<K>> {
    let rule = &rules[left];
    if let Some(existing) = rule.first.borrow().as_ref() {
        return existing.clone();
    }

    let mut first = HashSet::new();
    let mut recursive_rights: Vec<&[Symbol<K>]> = Vec::new();

    for production in &rule.productions {
        let right = &production.symbols[..];
        if right.is_empty() {
            first.insert(Term::Epsilon);
            continue;
        }
        walk_production(right, left, rules, &mut first, &mut recursive_rights);
    }

    if first.contains(&Term::Epsilon) {
        for right in recursive_rights.clone() {
            walk_deferred(right, left, rules, &mut first);
        }
    }

    rule.first.replace(Some(first.clone()));
    first
}

fn walk_production<'a, K: TerminalKind, T, Tok>(
    right: &'a [Symbol<K>],
    left: &Nt,
    rules: &HashMap<Nt, Rule<K, T, Tok>>,
    first: &mut HashSet<Term<K>>,
    recursive_rights: &mut Vec<&'a [Symbol<K>]>,
) {
    for (i, symbol) in right.iter().enumerate() {
        match symbol {
            Symbol::Terminal(k) => {
                first.insert(Term::Kind(*k));
                return;
            }
            Symbol::NonTerminal(name) => {
                let candidate = Nt::plain(name);
                if &candidate == left {
                    recursive_rights.push(&right[i + 1..]);
                    return;
                }
                let nested = calc_first(&candidate, rules);
                let nullable = nested.contains(&Term::Epsilon);
                first.extend(nested.iter().filter(|t| **t != Term::Epsilon));
                if !nullable {
                    return;
                }
            }
        }
    }
    first.insert(Term::Epsilon);
}

fn walk_deferred<K: TerminalKind, T, Tok>(
    right: &[Symbol<K>],
    left: &Nt,
    rules: &HashMap<Nt, Rule<K, T, Tok>>,
    first: &mut HashSet<Term<K>>,
) {
    for symbol in right {
        match symbol {
            Symbol::Terminal(k) => {
                first.insert(Term::Kind(*k));
                return;
            }
            Symbol::NonTerminal(name) => {
                let candidate = Nt::plain(name);
                if &candidate == left {
                    continue;
                }
                let nested = calc_first(&candidate, rules);
                let nullable = nested.contains(&Term::Epsilon);
                first.extend(nested.iter().filter(|t| **t != Term::Epsilon));
                if !nullable {
                    return;
                }
            }
        }
    }
}

/// FIRST of a symbol sequence (e.g. the suffix beta after a nonterminal
/// occurrence), computed the standard way: walk left to right, stop at the
/// first non-nullable symbol.
pub fn first_of_sequence<K: TerminalKind, T, Tok>(
    symbols: &[Symbol<K>],
    rules: &HashMap<Nt, Rule<K, T, Tok>>,
) -> HashSet<Term<K>> {
    let mut result = HashSet::new();
    for symbol in symbols {
        match symbol {
            Symbol::Terminal(k) => {
                result.insert(Term::Kind(*k));
                return result;
            }
            Symbol::NonTerminal(name) => {
                let nested = calc_first(&Nt::plain(name), rules);
                let nullable = nested.contains(&Term::Epsilon);
                result.extend(nested.iter().filter(|t| **t != Term::Epsilon));
                if !nullable {
                    return result;
                }
            }
        }
    }
    result.insert(Term::Epsilon);
    result
}

/// Computes every rule's FIRST set.
pub fn build_first_sets<K: TerminalKind, T, Tok>(
    grammar: &Grammar<K, T, Tok>,
) -> FirstSets<K> {
    for left in grammar.rules.keys() {
        calc_first(left, &grammar.rules);
    }
    grammar
        .rules
        .iter()
        .map(|(left, rule)| (left.clone(), rule.first.borrow().clone().unwrap()))
        .collect()
}

/// Computes every rule's FOLLOW set to a fixpoint.
///
/// `FOLLOW(S') = {EOS}` for every augmented start. For every production
/// `B -> alpha A beta`: add `FIRST(beta) \ {EPSILON}` to `FOLLOW(A)`; if
/// `beta` is empty or nullable and `B != A`, add `FOLLOW(B)` to `FOLLOW(A)`.
pub fn build_follow_sets<K: TerminalKind, T, Tok>(
    grammar: &Grammar<K, T, Tok>,
) -> FollowSets<K> {
    let mut follow: FollowSets<K> = HashMap::new();
    for left in grammar.rules.keys() {
        follow.insert(left.clone(), HashSet::new());
    }
    for start in &grammar.start_variables {
        follow.get_mut(start).unwrap().insert(Term::Eos);
    }

    loop {
        let mut changed = false;
        for (b, rule) in &grammar.rules {
            for production in &rule.productions {
                let right = &production.symbols;
                for (i, symbol) in right.iter().enumerate() {
                    let Symbol::NonTerminal(name) = symbol else {
                        continue;
                    };
                    let a = Nt::plain(name);
                    let beta = &right[i + 1..];
                    let first_beta = first_of_sequence(beta, &grammar.rules);

                    let entry = follow.get_mut(&a).unwrap();
                    for t in first_beta.iter().filter(|t| **t != Term::Epsilon) {
                        changed |= entry.insert(*t);
                    }

                    if beta.is_empty() || first_beta.contains(&Term::Epsilon) {
                        if b != &a {
                            let follow_b = follow[b].clone();
                            let entry = follow.get_mut(&a).unwrap();
                            for t in follow_b {
                                changed |= entry.insert(t);
                            }
                        }
                    }
                }
            }
        }
        if !changed {
            break;
        }
    }

    for (left, rule) in &grammar.rules {
        rule.follow.replace(Some(follow[left].clone()));
    }
    follow
}
