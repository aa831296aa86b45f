pub use crate::engine::{parse, try_parse};
pub use crate::errors::ParseError;
pub use crate::grammar::{DerivationRule, Grammar, Production, Symbol};
pub use crate::token::{Token, TokenKind};
pub use crate::tree::{InOrder, LevelOrder, ParseNode, MAX_TREE_DEPTH};

pub mod engine;
pub mod errors;
pub mod grammar;
pub mod token;
pub mod tree;
