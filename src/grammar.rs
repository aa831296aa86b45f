//! Grammar contract consumed by the parse engine.
//!
//! Comment-style grammars are defined elsewhere; this module only fixes the
//! shape the engine reads: an ordered list of productions, each holding
//! ordered derivation rules, plus a declared start symbol and a
//! symbol-to-index lookup consistent with production order.
//!
//! Ambiguity is intentional. A symbol may derive the same span several ways;
//! rule weights bias the engine toward the reading the grammar author
//! prefers. Well-formedness (no dangling symbol references) is assumed, not
//! validated: a dangling reference simply never matches during table
//! filling.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::token::TokenKind;

/// Opaque name of a grammar nonterminal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Symbol(String);

impl Symbol {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Symbol {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// One derivation option for a production.
///
/// `A` is the annotation type the downstream diagnostic layer attaches to
/// binary rules; its semantics are opaque to the parsing core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DerivationRule<A> {
    /// Derive a single token of the given category.
    Terminal { kind: TokenKind, weight: u32 },
    /// Derive two adjacent sub-spans, left then right.
    Binary {
        left: Symbol,
        right: Symbol,
        annotations: Vec<A>,
        weight: u32,
    },
}

impl<A> DerivationRule<A> {
    pub fn terminal(kind: TokenKind, weight: u32) -> Self {
        DerivationRule::Terminal { kind, weight }
    }

    pub fn binary(left: impl Into<Symbol>, right: impl Into<Symbol>, weight: u32) -> Self {
        DerivationRule::Binary {
            left: left.into(),
            right: right.into(),
            annotations: Vec::new(),
            weight,
        }
    }

    pub fn binary_annotated(
        left: impl Into<Symbol>,
        right: impl Into<Symbol>,
        annotations: Vec<A>,
        weight: u32,
    ) -> Self {
        DerivationRule::Binary {
            left: left.into(),
            right: right.into(),
            annotations,
            weight,
        }
    }
}

/// The ordered rule set for one left-hand-side symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Production<A> {
    pub lhs: Symbol,
    pub rules: Vec<DerivationRule<A>>,
}

impl<A> Production<A> {
    pub fn new(lhs: impl Into<Symbol>, rules: Vec<DerivationRule<A>>) -> Self {
        Self {
            lhs: lhs.into(),
            rules,
        }
    }
}

/// A complete weighted grammar: ordered productions and a start symbol.
///
/// The symbol lookup is built once at construction and mirrors production
/// order, so the engine can index its table by production.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Grammar<A> {
    productions: Vec<Production<A>>,
    start: Symbol,
    lookup: HashMap<Symbol, usize>,
}

impl<A> Grammar<A> {
    pub fn new(productions: Vec<Production<A>>, start: impl Into<Symbol>) -> Self {
        let lookup = productions
            .iter()
            .enumerate()
            .map(|(index, production)| (production.lhs.clone(), index))
            .collect();
        Self {
            productions,
            start: start.into(),
            lookup,
        }
    }

    pub fn productions(&self) -> &[Production<A>] {
        &self.productions
    }

    pub fn start(&self) -> &Symbol {
        &self.start
    }

    /// Index of the production whose left-hand side is `symbol`, per the
    /// lookup built at construction. `None` means a dangling reference.
    pub fn index_of(&self, symbol: &Symbol) -> Option<usize> {
        self.lookup.get(symbol).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_mirrors_production_order() {
        let grammar: Grammar<()> = Grammar::new(
            vec![
                Production::new("S", vec![DerivationRule::binary("A", "B", 1)]),
                Production::new("A", vec![DerivationRule::terminal(TokenKind::Word, 0)]),
                Production::new("B", vec![DerivationRule::terminal(TokenKind::Colon, 0)]),
            ],
            "S",
        );
        assert_eq!(grammar.index_of(&Symbol::new("S")), Some(0));
        assert_eq!(grammar.index_of(&Symbol::new("A")), Some(1));
        assert_eq!(grammar.index_of(&Symbol::new("B")), Some(2));
        assert_eq!(grammar.index_of(&Symbol::new("missing")), None);
    }
}
