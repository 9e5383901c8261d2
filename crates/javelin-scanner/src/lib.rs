//! Scanner/tokenizer for the javelin front end.
//!
//! This crate provides the lexical analysis phase:
//! - `SyntaxKind` - Token types
//! - `Scanner` - Tokenizer state machine with save/restore look-ahead
//! - The completion sentinel: a cursor span installed before a completion
//!   parse, causing the (possibly empty) identifier at the cursor to be
//!   emitted as a flagged completion identifier token

pub mod scanner;
pub mod syntax_kind;

pub use scanner::{Scanner, ScannerSnapshot, TokenFlags};
pub use syntax_kind::{
    SyntaxKind, keyword_from_text, keyword_to_text, token_is_assignment_operator,
    token_is_identifier_or_keyword, token_is_keyword, token_is_modifier, token_is_primitive_type,
    token_is_punctuation,
};
