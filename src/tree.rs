//! The parse tree produced by the engine.
//!
//! A `ParseNode` owns its children outright: the tree is a strict binary
//! tree with one parent per node, no cycles, no sharing. After construction
//! the tree is immutable, with one exception: the line-span memo, which is
//! populated lazily and tolerates redundant recomputation instead of taking
//! a lock (the computation is pure and always yields the same value).

use once_cell::sync::OnceCell;
use std::collections::VecDeque;
use std::fmt;

use crate::grammar::Symbol;
use crate::token::{Token, TokenKind};

/// Ceiling on recursion depth for line-span computation. A best guess at the
/// maximum height of a comment parse tree; past it we degrade to `None`
/// rather than risk the stack on a pathological tree.
pub const MAX_TREE_DEPTH: usize = 300;

// ============================================================================
// CORE DATA STRUCTURE
// ============================================================================

/// A node in a CYK parse tree.
///
/// Either a leaf wrapping exactly one input token (`value` set, no children)
/// or an internal node (children set, no `value`); the grammar in practice
/// always gives internal nodes exactly two children.
///
/// `A` is the annotation type carried through from the grammar's binary
/// rules; the downstream diagnostic layer interprets it, this crate never
/// does.
#[derive(Debug, Clone)]
pub struct ParseNode<A> {
    pub symbol: Symbol,
    pub left: Option<Box<ParseNode<A>>>,
    pub right: Option<Box<ParseNode<A>>>,
    pub value: Option<Token>,
    pub annotations: Vec<A>,
    pub weight: u32,
    line_span: OnceCell<Option<(usize, usize)>>,
}

impl<A> ParseNode<A> {
    /// General constructor admitting any node shape.
    ///
    /// An explicit non-zero weight is kept as given; a zero weight resolves
    /// to `max(0, left.weight, right.weight)`, so wrapping a high-weight
    /// subtree never silently demotes it.
    pub fn new(
        symbol: Symbol,
        left: Option<Box<ParseNode<A>>>,
        right: Option<Box<ParseNode<A>>>,
        value: Option<Token>,
        annotations: Vec<A>,
        weight: u32,
    ) -> Self {
        let weight = if weight != 0 {
            weight
        } else {
            let left_weight = left.as_ref().map_or(0, |node| node.weight);
            let right_weight = right.as_ref().map_or(0, |node| node.weight);
            left_weight.max(right_weight)
        };
        Self {
            symbol,
            left,
            right,
            value,
            annotations,
            weight,
            line_span: OnceCell::new(),
        }
    }

    /// A leaf wrapping one token.
    pub fn leaf(symbol: Symbol, token: Token, weight: u32) -> Self {
        Self::new(symbol, None, None, Some(token), Vec::new(), weight)
    }

    /// An internal node with two children, the shape table filling produces.
    pub fn branch(
        symbol: Symbol,
        left: ParseNode<A>,
        right: ParseNode<A>,
        annotations: Vec<A>,
        weight: u32,
    ) -> Self {
        Self::new(
            symbol,
            Some(Box::new(left)),
            Some(Box::new(right)),
            None,
            annotations,
            weight,
        )
    }

    // ========================================================================
    // TRAVERSAL
    // ========================================================================

    /// In-order traversal: left subtree, self, right subtree.
    ///
    /// Because the grammar always pairs a left span with the immediately
    /// following right span, this visits terminals in original token order.
    /// Lazy and restartable; call again for a fresh iterator.
    pub fn in_order(&self) -> InOrder<'_, A> {
        let mut stack = Vec::new();
        push_left_spine(&mut stack, self);
        InOrder { stack }
    }

    /// Breadth-first traversal: self, then depth 1 left to right, and so on.
    pub fn level_order(&self) -> LevelOrder<'_, A> {
        let mut queue = VecDeque::new();
        queue.push_back(self);
        LevelOrder { queue }
    }

    /// Leaf tokens in original order.
    pub fn terminals(&self) -> impl Iterator<Item = &Token> {
        self.in_order().filter_map(|node| node.value.as_ref())
    }

    /// The first node in breadth-first order carrying `symbol`.
    pub fn first_match(&self, symbol: &Symbol) -> Option<&ParseNode<A>> {
        self.level_order().find(|node| &node.symbol == symbol)
    }

    /// Whether any node in the tree carries `symbol`. A testing aid.
    pub fn contains(&self, symbol: &Symbol) -> bool {
        self.in_order().any(|node| &node.symbol == symbol)
    }

    // ========================================================================
    // COMPARISON & RECONSTRUCTION
    // ========================================================================

    /// Structural equality: symbols and terminal values match and
    /// corresponding children match recursively. Symmetric: a child present
    /// on either side with no counterpart on the other fails.
    ///
    /// Weights and annotations are deliberately ignored; two derivations of
    /// the same shape are the same parse.
    pub fn structurally_equals(&self, other: &ParseNode<A>) -> bool {
        self.symbol == other.symbol
            && self.value == other.value
            && children_match(self.left.as_deref(), other.left.as_deref())
            && children_match(self.right.as_deref(), other.right.as_deref())
    }

    /// Rebuild the comment text covered by this subtree.
    ///
    /// Spacing between adjacent terminals follows the token categories: no
    /// space when either side is structural whitespace (indentation or a
    /// line break) or when the right-hand terminal is a colon, otherwise
    /// exactly one space. Empty string if the subtree has no terminals.
    pub fn reconstruct_text(&self) -> String {
        let mut terminals = self.terminals();
        let Some(first) = terminals.next() else {
            return String::new();
        };
        let mut text = first.text.clone();
        let mut previous = first;
        for token in terminals {
            let glued = previous.kind.is_structural_whitespace()
                || token.kind.is_structural_whitespace()
                || token.kind == TokenKind::Colon;
            if !glued {
                text.push(' ');
            }
            text.push_str(&token.text);
            previous = token;
        }
        text
    }

    // ========================================================================
    // LINE SPANS
    // ========================================================================

    /// The (first, last) source line covered by the terminals of this
    /// subtree, or `None` for a subtree with no terminals.
    ///
    /// Computed recursively once and memoized. Recursion is capped at
    /// [`MAX_TREE_DEPTH`]; past the ceiling the result degrades to `None`
    /// instead of recursing without bound.
    pub fn line_span(&self) -> Option<(usize, usize)> {
        self.line_span_bounded(0).0
    }

    /// Returns the span plus whether the depth ceiling truncated it. A
    /// truncated span is never cached: a later call starting lower in the
    /// tree must still be able to compute the true value.
    fn line_span_bounded(&self, depth: usize) -> (Option<(usize, usize)>, bool) {
        if depth > MAX_TREE_DEPTH {
            return (None, true);
        }
        if let Some(token) = &self.value {
            return (Some((token.line, token.line)), false);
        }
        if let Some(cached) = self.line_span.get() {
            return (*cached, false);
        }
        let (left, left_capped) = match self.left.as_deref() {
            Some(node) => node.line_span_bounded(depth + 1),
            None => (None, false),
        };
        let (right, right_capped) = match self.right.as_deref() {
            Some(node) => node.line_span_bounded(depth + 1),
            None => (None, false),
        };
        let span = match (left, right) {
            (Some((first, _)), Some((_, last))) => Some((first, last)),
            (Some(only), None) | (None, Some(only)) => Some(only),
            (None, None) => None,
        };
        let capped = left_capped || right_capped;
        if !capped {
            // A concurrent reader may have raced us here; both computed the
            // same pure value, so a lost set is harmless.
            let _ = self.line_span.set(span);
        }
        (span, capped)
    }
}

fn children_match<A>(ours: Option<&ParseNode<A>>, theirs: Option<&ParseNode<A>>) -> bool {
    match (ours, theirs) {
        (None, None) => true,
        (Some(a), Some(b)) => a.structurally_equals(b),
        _ => false,
    }
}

fn push_left_spine<'a, A>(stack: &mut Vec<&'a ParseNode<A>>, from: &'a ParseNode<A>) {
    let mut current = Some(from);
    while let Some(node) = current {
        stack.push(node);
        current = node.left.as_deref();
    }
}

// ============================================================================
// ITERATORS
// ============================================================================

/// Lazy in-order iterator over a parse tree. See [`ParseNode::in_order`].
pub struct InOrder<'a, A> {
    stack: Vec<&'a ParseNode<A>>,
}

impl<'a, A> Iterator for InOrder<'a, A> {
    type Item = &'a ParseNode<A>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        if let Some(right) = node.right.as_deref() {
            push_left_spine(&mut self.stack, right);
        }
        Some(node)
    }
}

/// Lazy breadth-first iterator over a parse tree. See
/// [`ParseNode::level_order`].
pub struct LevelOrder<'a, A> {
    queue: VecDeque<&'a ParseNode<A>>,
}

impl<'a, A> Iterator for LevelOrder<'a, A> {
    type Item = &'a ParseNode<A>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.queue.pop_front()?;
        if let Some(left) = node.left.as_deref() {
            self.queue.push_back(left);
        }
        if let Some(right) = node.right.as_deref() {
            self.queue.push_back(right);
        }
        Some(node)
    }
}

// ============================================================================
// DISPLAY
// ============================================================================

impl<A: fmt::Debug> fmt::Display for ParseNode<A> {
    /// Indented tree dump, one node per line: the symbol for internal nodes,
    /// `Kind: "text"` for leaves, annotations appended where present.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_at_indent(f, 0)
    }
}

impl<A: fmt::Debug> ParseNode<A> {
    fn fmt_at_indent(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        write!(f, "{:indent$}", "")?;
        match &self.value {
            Some(token) => write!(f, "{:?}: {:?}", token.kind, token.text)?,
            None => write!(f, "{}", self.symbol)?,
        }
        if !self.annotations.is_empty() {
            let rendered: Vec<String> = self
                .annotations
                .iter()
                .map(|annotation| format!("{annotation:?}"))
                .collect();
            write!(f, ": {}", rendered.join(", "))?;
        }
        if let Some(left) = self.left.as_deref() {
            writeln!(f)?;
            left.fmt_at_indent(f, indent + 2)?;
        }
        if let Some(right) = self.right.as_deref() {
            writeln!(f)?;
            right.fmt_at_indent(f, indent + 2)?;
        }
        Ok(())
    }
}
