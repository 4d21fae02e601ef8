//! LR(0) items: a production plus a dot position. Grounded in
//! `plare.parser.Item`. Equality/hash deliberately ignore `maker` and
//! `precedence` since both are functionally determined by `(left, right,
//! loc)`.

use std::hash::{Hash, Hasher};
use std::rc::Rc;

use crate::grammar::{Maker, Nt, Symbol};
use crate::token::TerminalKind;

pub struct Item<K: TerminalKind, T, Tok> {
    pub left: Nt,
    pub rhs: Rc<Vec<Symbol<K>>>,
    pub dot: usize,
    pub maker: Rc<Maker<T, Tok>>,
    pub precedence: i32,
}

impl<K: TerminalKind, T, Tok> Item<K, T, Tok> {
    pub fn new(left: Nt, rhs: Rc<Vec<Symbol<K>>>, maker: Rc<Maker<T, Tok>>, precedence: i32) -> Self {
        Item {
            left,
            rhs,
            dot: 0,
            maker,
            precedence,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.dot == self.rhs.len()
    }

    pub fn next_symbol(&self) -> Option<&Symbol<K>> {
        self.rhs.get(self.dot)
    }

    /// Returns the item with the dot advanced past `symbol`, if the symbol
    /// right after the dot matches.
    pub fn advance(&self, symbol: &Symbol<K>) -> Option<Item<K, T, Tok>> {
        if self.next_symbol() == Some(symbol) {
            Some(Item {
                left: self.left.clone(),
                rhs: self.rhs.clone(),
                dot: self.dot + 1,
                maker: self.maker.clone(),
                precedence: self.precedence,
            })
        } else {
            None
        }
    }
}

impl<K: TerminalKind, T, Tok> Clone for Item<K, T, Tok> {
    fn clone(&self) -> Self {
        Item {
            left: self.left.clone(),
            rhs: self.rhs.clone(),
            dot: self.dot,
            maker: self.maker.clone(),
            precedence: self.precedence,
        }
    }
}

impl<K: TerminalKind, T, Tok> PartialEq for Item<K, T, Tok> {
    fn eq(&self, other: &Self) -> bool {
        self.left == other.left && self.rhs == other.rhs && self.dot == other.dot
    }
}

impl<K: TerminalKind, T, Tok> Eq for Item<K, T, Tok> {}

impl<K: TerminalKind, T, Tok> Hash for Item<K, T, Tok> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.left.hash(state);
        self.rhs.hash(state);
        self.dot.hash(state);
    }
}

impl<K: TerminalKind + std::fmt::Debug, T, Tok> std::fmt::Debug for Item<K, T, Tok> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let before = &self.rhs[..self.dot];
        let after = &self.rhs[self.dot..];
        let arrow = match self.left {
            Nt::Start(_) => "=>",
            Nt::Plain(_) => "->",
        };
        write!(f, "{} {} {:?} . {:?}", self.left, arrow, before, after)
    }
}
