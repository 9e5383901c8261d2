//! Centralized limits and thresholds for the javelin front end.
//!
//! Centralizing these values prevents duplicate definitions with
//! inconsistent values and documents the rationale for each limit.

/// Maximum recursion depth for statement/expression parsing.
///
/// The parser is recursive descent; deeply nested input (hundreds of
/// nested parentheses or blocks) would otherwise overflow the native
/// stack. Past this depth the parser stops descending and treats the
/// remainder as an error region.
pub const MAX_PARSE_DEPTH: u32 = 400;

/// Maximum number of tokens the parser may skip while resynchronizing
/// after a single syntax error. Prevents quadratic skip loops on
/// pathological input.
pub const MAX_ERROR_SKIP_TOKENS: u32 = 50;

/// Bounded search depth for best-effort context-marker pops.
///
/// Grammar productions can be reached via multiple paths, so some
/// push/pop pairs are optimistic; a pop whose kind does not match the top
/// of the marker stack searches at most this many frames down before
/// giving up as a silent no-op.
pub const MAX_MARKER_POP_SEARCH: usize = 4;

/// Maximum depth of the context-marker stack. Input nested more deeply
/// than this stops pushing markers; completion degrades but never fails.
pub const MAX_MARKER_DEPTH: usize = 1024;

/// Pre-allocation size for the node arena on a typical completion parse.
pub const ARENA_PREALLOC: usize = 512;
