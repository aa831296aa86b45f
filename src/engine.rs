//! The CYK parse engine.
//!
//! A bottom-up dynamic-programming parser filling a table of
//! (span length, start position, production) cells by increasing span
//! length. CYK was chosen because comment-style grammars are deliberately
//! ambiguous, which CYK absorbs at a predictable O(n³) worst case; rule
//! weights then bias the table toward the grammar author's preferred
//! reading.
//!
//! The engine is a pure function: it allocates only its own table and the
//! returned tree, performs no I/O, and never mutates the grammar or the
//! tokens.

use crate::errors::ParseError;
use crate::grammar::{DerivationRule, Grammar};
use crate::token::Token;
use crate::tree::ParseNode;

/// Parse `tokens` against `grammar`, returning the maximum-weight tree for
/// the start symbol over the full span, or `None` if the tokens do not
/// derive from it. Empty input is `None`, not an error.
///
/// Ambiguity policy, applied uniformly to terminal and binary rules: a
/// candidate for an already-filled cell wins unless the existing entry's
/// weight is strictly greater; ties go to the later-evaluated rule.
pub fn parse<A: Clone>(grammar: &Grammar<A>, tokens: &[Token]) -> Option<ParseNode<A>> {
    if tokens.is_empty() {
        return None;
    }
    let n = tokens.len();
    let r = grammar.productions().len();

    // table[l - 1][s][p]: best node for production p over the span of
    // length l starting at token s.
    let mut table: Vec<Vec<Vec<Option<ParseNode<A>>>>> = vec![vec![vec![None; r]; n]; n];

    // Base case: spans of length one, filled from terminal rules.
    for (s, token) in tokens.iter().enumerate() {
        for (v, production) in grammar.productions().iter().enumerate() {
            for rule in &production.rules {
                let DerivationRule::Terminal { kind, weight } = rule else {
                    continue;
                };
                if *kind != token.kind {
                    continue;
                }
                let leaf = ParseNode::leaf(production.lhs.clone(), token.clone(), *weight);
                place(&mut table[0][s], v, leaf);
            }
        }
    }

    // Inductive case: spans of length l, split into a left part of length p
    // and a right part of length l - p at every admissible point.
    for l in 2..=n {
        for s in 0..=(n - l) {
            for p in 1..l {
                for (a, production) in grammar.productions().iter().enumerate() {
                    for rule in &production.rules {
                        let DerivationRule::Binary {
                            left,
                            right,
                            annotations,
                            weight,
                        } = rule
                        else {
                            continue;
                        };
                        // A dangling symbol reference can never match.
                        let (Some(b), Some(c)) = (grammar.index_of(left), grammar.index_of(right))
                        else {
                            continue;
                        };
                        let (Some(left_entry), Some(right_entry)) =
                            (table[p - 1][s][b].as_ref(), table[l - p - 1][s + p][c].as_ref())
                        else {
                            continue;
                        };
                        let candidate = ParseNode::branch(
                            production.lhs.clone(),
                            left_entry.clone(),
                            right_entry.clone(),
                            annotations.clone(),
                            *weight,
                        );
                        place(&mut table[l - 1][s], a, candidate);
                    }
                }
            }
        }
    }

    let start = grammar.index_of(grammar.start())?;
    table[n - 1][0][start].take()
}

/// Parse, but surface the two no-tree outcomes as diagnostics for callers
/// that report them.
pub fn try_parse<A: Clone>(
    grammar: &Grammar<A>,
    tokens: &[Token],
) -> Result<ParseNode<A>, ParseError> {
    if tokens.is_empty() {
        return Err(ParseError::EmptyInput);
    }
    parse(grammar, tokens).ok_or_else(|| ParseError::NoDerivation {
        start: grammar.start().clone(),
        first_line: tokens[0].line,
        last_line: tokens[tokens.len() - 1].line,
    })
}

/// Resolve competition for one table cell: highest weight wins, ties go to
/// the candidate (the later-evaluated rule). Weights compared are resolved
/// node weights, so an unweighted derivation still carries the strongest
/// signal from below.
fn place<A>(cell_row: &mut [Option<ParseNode<A>>], index: usize, candidate: ParseNode<A>) {
    if let Some(existing) = &cell_row[index] {
        if existing.weight > candidate.weight {
            return;
        }
    }
    cell_row[index] = Some(candidate);
}
