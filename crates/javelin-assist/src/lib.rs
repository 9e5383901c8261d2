//! Per-request completion engine.
//!
//! The one entry point is [`complete`]: given source text, a cursor and
//! language options, it runs a completion parse and returns a
//! [`CompletionOutcome`] holding the recovered tree, the single
//! completion node and serializable context metadata for a proposal
//! engine downstream.
//!
//! The entry is total. Invalid cursors are reported in the outcome
//! rather than as an error, and a panicking parse is caught here so the
//! caller always gets the best partial result. Parser state is
//! per-request and never shared between calls.

use std::panic::{AssertUnwindSafe, catch_unwind};

use javelin_common::diagnostics::Diagnostic;
use javelin_common::options::LanguageOptions;
use javelin_common::span::TextRange;
use javelin_parser::ast::ModifierFlags;
use javelin_parser::completion::CompletionKind;
use javelin_parser::{Node, NodeArena, NodeIndex, ParserState};
use javelin_scanner::keyword_to_text;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// How the engine call ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompletionStatus {
    /// The parse ran to the end of the input.
    Completed,
    /// The cursor was outside `-1..source.len()`; no parse was attempted.
    InvalidCursor,
    /// The parse panicked; the outcome carries the best partial result.
    Recovered,
}

/// Serializable description of the completion position, for the
/// proposal engine on the other side of the wire.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionContext {
    /// Expected role at the cursor.
    pub kind: CompletionKind,
    /// Identifier characters between the word start and the cursor.
    pub prefix: String,
    /// Range of the word being completed; replacing it with a proposal
    /// yields the completed source.
    pub replace_range: TextRange,
    /// Source text of the receiver or qualifier expression, if any.
    pub receiver_text: Option<String>,
    pub receiver_range: Option<TextRange>,
    /// Candidate keyword spellings for keyword positions.
    pub keywords: Vec<String>,
    /// Number of sibling arguments already parsed in the enclosing call.
    pub argument_count: Option<usize>,
    /// Modifiers of the innermost enclosing declaration.
    pub enclosing_modifiers: ModifierFlags,
}

/// Result of one engine call: the recovered tree plus completion
/// metadata. One outcome per call; the arena is owned by the outcome.
#[derive(Debug, Serialize)]
pub struct CompletionOutcome {
    pub status: CompletionStatus,
    pub arena: NodeArena,
    /// Root compilation unit; `NONE` when no parse ran.
    pub root: NodeIndex,
    /// The single completion node; `NONE` when no parse ran.
    pub node: NodeIndex,
    pub context: Option<CompletionContext>,
    pub diagnostics: Vec<Diagnostic>,
}

impl CompletionOutcome {
    fn invalid_cursor() -> CompletionOutcome {
        CompletionOutcome {
            status: CompletionStatus::InvalidCursor,
            arena: NodeArena::new(),
            root: NodeIndex::NONE,
            node: NodeIndex::NONE,
            context: None,
            diagnostics: Vec::new(),
        }
    }
}

/// Run a completion parse over `source`.
///
/// `cursor` is the index of the character to the left of the caret:
/// `-1` puts the caret before the first character, `n` after the n-th.
/// A cursor at or past `source.len()` is invalid and reported as such
/// without parsing.
pub fn complete(source: &str, cursor: i32, options: &LanguageOptions) -> CompletionOutcome {
    let len = source.len() as i64;
    if i64::from(cursor) < -1 || i64::from(cursor) >= len {
        debug!(cursor, len, "cursor outside the source");
        return CompletionOutcome::invalid_cursor();
    }
    let insertion = (cursor + 1) as u32;

    let mut state = ParserState::for_completion(source, insertion, *options);
    let parse = catch_unwind(AssertUnwindSafe(|| {
        state.parse();
    }));
    let status = match parse {
        Ok(()) => CompletionStatus::Completed,
        Err(_) => {
            // The sentinel is cleared on the normal path by the parse
            // itself; clear it here too so no exit leaves it armed.
            state.clear_sentinel();
            warn!(cursor, "completion parse panicked; returning partial result");
            CompletionStatus::Recovered
        }
    };

    let node = state.completion_node();
    let root = state.root;
    let context = build_context(&state.arena, root, source, node);
    let arena = std::mem::take(&mut state.arena);
    let diagnostics = std::mem::take(&mut state.diagnostics);

    CompletionOutcome {
        status,
        arena,
        root,
        node,
        context,
        diagnostics,
    }
}

fn build_context(
    arena: &NodeArena,
    root: NodeIndex,
    source: &str,
    node: NodeIndex,
) -> Option<CompletionContext> {
    let Node::Completion(data) = arena.get(node)? else {
        return None;
    };
    let replace_range = data.base.range();
    let receiver_range = arena.range(data.receiver);
    let receiver_text = receiver_range.map(|range| slice_source(source, range));
    let keywords = data
        .keywords
        .iter()
        .filter_map(|kind| keyword_to_text(*kind))
        .map(str::to_string)
        .collect();
    let argument_count = data.arguments.as_ref().map(|arguments| arguments.len());
    let enclosing_modifiers = enclosing_modifiers(arena, root, replace_range.start);
    debug!(
        kind = ?data.kind,
        modifiers = ?enclosing_modifiers.names(),
        "completion context built"
    );

    Some(CompletionContext {
        kind: data.kind,
        prefix: data.prefix.clone(),
        replace_range,
        receiver_text,
        receiver_range,
        keywords,
        argument_count,
        enclosing_modifiers,
    })
}

/// Byte-range slice of the source, clamped and boundary-safe.
fn slice_source(source: &str, range: TextRange) -> String {
    let start = (range.start as usize).min(source.len());
    let end = (range.end as usize).min(source.len()).max(start);
    source.get(start..end).unwrap_or("").to_string()
}

fn enclosing_modifiers(arena: &NodeArena, root: NodeIndex, offset: u32) -> ModifierFlags {
    let enclosing = arena.deepest_containing(root, offset, |node| {
        matches!(
            node,
            Node::TypeDeclaration(_)
                | Node::MethodDeclaration(_)
                | Node::FieldDeclaration(_)
                | Node::Initializer(_)
        )
    });
    match enclosing.and_then(|index| arena.get(index)) {
        Some(Node::TypeDeclaration(data)) => data.modifiers,
        Some(Node::MethodDeclaration(data)) => data.modifiers,
        Some(Node::FieldDeclaration(data)) => data.modifiers,
        Some(Node::Initializer(data)) => data.modifiers,
        _ => ModifierFlags::empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_past_eof_is_invalid() {
        let outcome = complete("class A {}", 10, &LanguageOptions::default());
        assert_eq!(outcome.status, CompletionStatus::InvalidCursor);
        assert!(outcome.node.is_none());
        assert!(outcome.context.is_none());
        assert!(outcome.arena.is_empty());
    }

    #[test]
    fn cursor_far_negative_is_invalid() {
        let outcome = complete("class A {}", -2, &LanguageOptions::default());
        assert_eq!(outcome.status, CompletionStatus::InvalidCursor);
    }

    #[test]
    fn minimal_member_access() {
        let source = "class A { void m() { this.fo; } }";
        let cursor = source.find(';').map(|i| i as i32 - 1);
        let outcome = complete(source, cursor.unwrap(), &LanguageOptions::default());
        assert_eq!(outcome.status, CompletionStatus::Completed);
        assert!(outcome.node.is_some());
        let context = outcome.context.expect("context for a valid cursor");
        assert_eq!(context.kind, CompletionKind::MemberAccess);
        assert_eq!(context.prefix, "fo");
        assert_eq!(context.receiver_text.as_deref(), Some("this"));
    }
}
