//! Error-tolerant parser and completion-node machinery for the javelin
//! front end.
//!
//! The crate has two layers:
//!
//! - the base parser: a recursive-descent, best-effort parser for a
//!   Java-like language that never rejects input, collecting diagnostics
//!   instead (`ParserState`, `ast`, `arena`, `recovery`);
//! - the completion layer (`completion`): a secondary context-marker
//!   stack synchronized with token shifts and production completions, a
//!   priority-ordered completion-node synthesizer, an orphan
//!   reattachment engine, and a small recovery coordinator. Together
//!   they guarantee that a parse started with a cursor produces a tree
//!   containing exactly one completion node.
//!
//! The parser state is split across `state_*.rs` files by concern
//! (statements, class members, expressions, types); the completion layer
//! extends the same `ParserState` from the `completion` module.

pub mod arena;
pub mod ast;
pub mod completion;
pub mod recovery;

mod state;
mod state_expressions;
mod state_members;
mod state_statements;
mod state_types;

pub use arena::NodeArena;
pub use ast::{Node, NodeIndex, NodeList};
pub use completion::{
    CompletionKind, CompletionSession, coordinator::CoordinatorState, tracker::MarkerKind,
};
pub use state::ParserState;
