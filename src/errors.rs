//! Error surface for callers that treat a failed parse as reportable.
//!
//! The core engine itself never raises: empty input and underivable input
//! both come back as `None` from [`crate::engine::parse`]. This type exists
//! for the [`crate::engine::try_parse`] wrapper, so the linter layer above
//! can hand a ready-made diagnostic to its reporter.

use miette::Diagnostic;
use thiserror::Error;

use crate::grammar::Symbol;

#[derive(Debug, Error, Diagnostic)]
pub enum ParseError {
    #[error("empty token stream")]
    #[diagnostic(
        code(marginalia::parse::empty),
        help("the comment produced no tokens; there is nothing to lint")
    )]
    EmptyInput,

    #[error("tokens on lines {first_line}..={last_line} do not derive from start symbol `{start}`")]
    #[diagnostic(
        code(marginalia::parse::no_derivation),
        help("the comment does not match any layout this grammar accepts")
    )]
    NoDerivation {
        start: Symbol,
        first_line: usize,
        last_line: usize,
    },
}
