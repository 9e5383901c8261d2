//! Parser state and token plumbing.
//!
//! `ParserState` is per-request: one instance serves one parse and is
//! not shared. The parsing methods are split across the `state_*.rs`
//! files; this module owns the fields, the token cursor, and the
//! completion-session lifecycle.

use crate::arena::NodeArena;
use crate::ast::{IdentifierData, Node, NodeBase, NodeIndex};
use crate::completion::tracker::Production;
use crate::completion::CompletionSession;
use javelin_common::diagnostics::{diagnostic_codes, Diagnostic};
use javelin_common::limits;
use javelin_common::options::LanguageOptions;
use javelin_common::span::LineMap;
use javelin_scanner::{Scanner, SyntaxKind};
use tracing::debug;

pub struct ParserState {
    pub(crate) scanner: Scanner,
    pub arena: NodeArena,
    pub options: LanguageOptions,
    pub diagnostics: Vec<Diagnostic>,
    pub(crate) line_map: LineMap,

    pub(crate) token: SyntaxKind,
    pub(crate) prev_token: SyntaxKind,
    /// End offset of the previously consumed token; used as the end of
    /// nodes finished before the current token.
    pub(crate) prev_token_end: u32,
    pub(crate) paren_depth: u32,
    pub(crate) bracket_depth: u32,
    pub(crate) brace_depth: u32,

    /// Most recently completed expression; the tracker captures it as
    /// the receiver/left-hand payload of operator markers.
    pub(crate) last_expression: NodeIndex,

    /// Closing angle brackets still owed by enclosing type-argument
    /// lists when a `>>`/`>>>` token closed several at once.
    pub(crate) pending_close_angles: u32,

    /// Inside a speculative look-ahead: completion hooks and synthesis
    /// are suspended.
    pub(crate) in_lookahead: bool,
    pub(crate) recursion_depth: u32,

    pub(crate) completion: Option<CompletionSession>,

    /// Root compilation unit, set by [`ParserState::parse`].
    pub root: NodeIndex,
}

impl ParserState {
    /// Plain parse, no completion.
    pub fn new(source: &str, options: LanguageOptions) -> ParserState {
        let line_map = LineMap::new(source);
        ParserState {
            scanner: Scanner::new(source.to_string()),
            arena: NodeArena::new(),
            options,
            diagnostics: Vec::new(),
            line_map,
            token: SyntaxKind::Unknown,
            prev_token: SyntaxKind::Unknown,
            prev_token_end: 0,
            paren_depth: 0,
            bracket_depth: 0,
            brace_depth: 0,
            last_expression: NodeIndex::NONE,
            pending_close_angles: 0,
            in_lookahead: false,
            recursion_depth: 0,
            completion: None,
            root: NodeIndex::NONE,
        }
    }

    /// Completion parse. `insertion` is the insertion index (cursor
    /// offset + 1); the scanner sentinel is installed here and cleared
    /// again when the parse finishes.
    pub fn for_completion(source: &str, insertion: u32, options: LanguageOptions) -> ParserState {
        let mut state = ParserState::new(source, options);
        state.scanner.set_completion_pos(insertion);
        state.completion = Some(CompletionSession::new(insertion));
        state
    }

    /// Run the parse to completion. Total: returns the compilation-unit
    /// root for any input. For a completion parse this also fires the
    /// fallback synthesis, reattaches an orphaned completion node, and
    /// clears the scanner sentinel.
    pub fn parse(&mut self) -> NodeIndex {
        self.next_token();
        let root = self.parse_compilation_unit();
        self.root = root;
        self.finish_completion();
        self.diagnostics.extend_from_slice(self.scanner.diagnostics());
        root
    }

    /// The synthesized completion node, if this was a completion parse
    /// and synthesis succeeded.
    pub fn completion_node(&self) -> NodeIndex {
        self.completion.as_ref().map_or(NodeIndex::NONE, |s| s.node)
    }

    pub fn completion_session(&self) -> Option<&CompletionSession> {
        self.completion.as_ref()
    }

    // =========================================================================
    // Token cursor
    // =========================================================================

    pub(crate) fn token_start(&self) -> u32 {
        self.scanner.token_start()
    }

    pub(crate) fn token_end(&self) -> u32 {
        self.scanner.token_end()
    }

    pub(crate) fn at(&self, kind: SyntaxKind) -> bool {
        self.token == kind
    }

    pub(crate) fn at_eof(&self) -> bool {
        self.token == SyntaxKind::EndOfFileToken
    }

    /// Advance to the next token, running the completion dispatch on the
    /// shift. Bracket depths are counted as the outgoing token leaves
    /// currency, so the dispatch observes the depth in effect *between*
    /// the two tokens.
    pub(crate) fn next_token(&mut self) -> SyntaxKind {
        let outgoing = self.token;
        match outgoing {
            SyntaxKind::OpenParenToken => self.paren_depth += 1,
            SyntaxKind::CloseParenToken => self.paren_depth = self.paren_depth.saturating_sub(1),
            SyntaxKind::OpenBracketToken => self.bracket_depth += 1,
            SyntaxKind::CloseBracketToken => {
                self.bracket_depth = self.bracket_depth.saturating_sub(1);
            }
            SyntaxKind::OpenBraceToken => self.brace_depth += 1,
            SyntaxKind::CloseBraceToken => self.brace_depth = self.brace_depth.saturating_sub(1),
            _ => {}
        }

        // The flagged completion token must synthesize before it leaves
        // the stream, whatever path consumes it.
        if !self.in_lookahead
            && self.scanner.is_completion_identifier()
            && self.completion.as_ref().is_some_and(|s| !s.fired)
        {
            self.synthesize_completion();
        }

        self.prev_token = outgoing;
        self.prev_token_end = self.scanner.token_end();
        let mut kind = self.scanner.scan();

        // Clamped end of input: everything past the enclosing recovered
        // declaration reads as EOF.
        if let Some(session) = &self.completion {
            if session.coordinator.is_past_eof(self.scanner.token_start())
                && !self.scanner.is_completion_identifier()
            {
                kind = SyntaxKind::EndOfFileToken;
            }
        }
        self.token = kind;

        if !self.in_lookahead && self.completion.is_some() {
            self.completion_on_token_shift(outgoing, kind);
        }
        kind
    }

    /// Consume the current token if it matches.
    pub(crate) fn eat(&mut self, kind: SyntaxKind) -> bool {
        if self.token == kind {
            self.next_token();
            true
        } else {
            false
        }
    }

    /// Consume `kind` or report a diagnostic at the current token. Never
    /// skips; the caller decides how to resynchronize.
    pub(crate) fn parse_expected(&mut self, kind: SyntaxKind) -> bool {
        if self.eat(kind) {
            return true;
        }
        self.error_at_current(
            diagnostic_codes::UNEXPECTED_TOKEN,
            format!("expected {:?}", kind),
        );
        false
    }

    /// Report a reduction to the completion dispatch table.
    pub(crate) fn reduce(&mut self, production: Production, payload: NodeIndex) {
        if !self.in_lookahead && self.completion.is_some() {
            self.completion_on_reduction(production, payload);
        }
    }

    /// Push a context marker directly from a parse method, for contexts
    /// the token dispatch cannot classify on its own (type-argument
    /// lists, annotation argument lists).
    pub(crate) fn push_marker(
        &mut self,
        kind: crate::completion::tracker::MarkerKind,
        info: u32,
        node: NodeIndex,
    ) {
        if self.in_lookahead {
            return;
        }
        if let Some(session) = self.completion.as_mut() {
            session.markers.push(kind, info, node);
        }
    }

    /// Best-effort pop of a context marker from a parse method.
    pub(crate) fn pop_marker(&mut self, kind: crate::completion::tracker::MarkerKind) {
        if self.in_lookahead {
            return;
        }
        if let Some(session) = self.completion.as_mut() {
            session.markers.pop(kind);
        }
    }

    /// Record the receiver expression of a pending `.`-selector, fixing
    /// up the marker the token dispatch pushed with a stale payload.
    pub(crate) fn set_selector_receiver(&mut self, receiver: NodeIndex, is_type: bool) {
        if self.in_lookahead {
            return;
        }
        if let Some(session) = self.completion.as_mut() {
            session.selector_receiver = receiver;
            session.selector_is_type = is_type;
            session
                .markers
                .set_node(crate::completion::tracker::MarkerKind::Selector, receiver);
        }
    }

    /// Mutate a session flag, if a session is active and this is not a
    /// look-ahead.
    pub(crate) fn with_session(&mut self, f: impl FnOnce(&mut CompletionSession)) {
        if self.in_lookahead {
            return;
        }
        if let Some(session) = self.completion.as_mut() {
            f(session);
        }
    }

    /// Record a completed expression for the tracker's value payloads.
    pub(crate) fn note_expression(&mut self, node: NodeIndex) -> NodeIndex {
        if node.is_some() {
            self.last_expression = node;
        }
        node
    }

    // =========================================================================
    // Identifiers
    // =========================================================================

    /// Parse an identifier, or synthesize the completion node if the
    /// current token is the flagged completion identifier.
    pub(crate) fn parse_identifier(&mut self) -> NodeIndex {
        if self.token == SyntaxKind::Identifier {
            if !self.in_lookahead
                && self.scanner.is_completion_identifier()
                && self.completion.as_ref().is_some_and(|s| !s.fired)
            {
                let node = self.synthesize_completion();
                self.last_expression = node;
                self.next_token();
                return node;
            }
            let node = self.arena.add(Node::Identifier(IdentifierData {
                base: NodeBase::new(self.token_start(), self.token_end()),
                text: self.scanner.token_value().to_string(),
            }));
            self.last_expression = node;
            self.next_token();
            return node;
        }
        self.error_at_current(diagnostic_codes::IDENTIFIER_EXPECTED, "identifier expected");
        NodeIndex::NONE
    }

    /// Identifier without consuming; `NONE` if the current token is not
    /// an identifier. Used where an identifier is optional.
    pub(crate) fn parse_optional_identifier(&mut self) -> NodeIndex {
        if self.token == SyntaxKind::Identifier {
            self.parse_identifier()
        } else {
            NodeIndex::NONE
        }
    }

    // =========================================================================
    // Look-ahead
    // =========================================================================

    /// Run `f` speculatively and restore the token cursor afterwards.
    /// Completion hooks are suspended for the duration.
    pub(crate) fn look_ahead<T>(&mut self, f: impl FnOnce(&mut ParserState) -> T) -> T {
        let snapshot = self.scanner.save_state();
        let token = self.token;
        let prev_token = self.prev_token;
        let prev_token_end = self.prev_token_end;
        let paren_depth = self.paren_depth;
        let bracket_depth = self.bracket_depth;
        let brace_depth = self.brace_depth;
        let last_expression = self.last_expression;
        let pending_close_angles = self.pending_close_angles;
        let was_lookahead = self.in_lookahead;
        self.in_lookahead = true;

        let result = f(self);

        self.scanner.restore_state(snapshot);
        self.token = token;
        self.prev_token = prev_token;
        self.prev_token_end = prev_token_end;
        self.paren_depth = paren_depth;
        self.bracket_depth = bracket_depth;
        self.brace_depth = brace_depth;
        self.last_expression = last_expression;
        self.pending_close_angles = pending_close_angles;
        self.in_lookahead = was_lookahead;
        result
    }

    // =========================================================================
    // Recursion and error recovery
    // =========================================================================

    pub(crate) fn enter(&mut self) -> bool {
        if self.recursion_depth >= limits::MAX_PARSE_DEPTH {
            return false;
        }
        self.recursion_depth += 1;
        true
    }

    pub(crate) fn exit(&mut self) {
        self.recursion_depth = self.recursion_depth.saturating_sub(1);
    }

    pub(crate) fn error_at_current(&mut self, code: u32, message: impl Into<String>) {
        if self.in_lookahead {
            return;
        }
        let start = self.token_start();
        let length = self.token_end().saturating_sub(start);
        self.diagnostics
            .push(Diagnostic::error(start, length, message, code));
    }

    /// Skip tokens until one of `sync` (or EOF), bounded. Returns the
    /// number skipped.
    pub(crate) fn skip_until(&mut self, sync: &[SyntaxKind]) -> u32 {
        let mut skipped = 0;
        while !self.at_eof()
            && !sync.contains(&self.token)
            && skipped < limits::MAX_ERROR_SKIP_TOKENS
        {
            self.next_token();
            skipped += 1;
        }
        if skipped >= limits::MAX_ERROR_SKIP_TOKENS {
            // The skip bound is the parser's signal that resynchronizing
            // here is hopeless. After the cursor the coordinator takes
            // over; it accepts the tree rather than clamping, since the
            // enclosing declaration's extent is unknown mid-parse.
            if let Some(session) = self.completion.as_mut() {
                if session.fired {
                    session.coordinator.begin_recovery(None);
                }
            }
        }
        skipped
    }

    /// Skip a balanced `{ ... }` region without building statements.
    /// Used in diet mode once the cursor region has been passed.
    pub(crate) fn skip_block(&mut self) {
        if !self.at(SyntaxKind::OpenBraceToken) {
            return;
        }
        let mut depth = 0u32;
        loop {
            match self.token {
                SyntaxKind::OpenBraceToken => depth += 1,
                SyntaxKind::CloseBraceToken => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        self.next_token();
                        return;
                    }
                }
                SyntaxKind::EndOfFileToken => return,
                _ => {}
            }
            self.next_token();
        }
    }

    /// Whether statement bodies still need full detail. Diet mode kicks
    /// in once the completion node exists and the body in question
    /// starts past the cursor.
    pub(crate) fn wants_diet_body(&self) -> bool {
        match &self.completion {
            Some(session) => session.fired && self.token_start() > session.cursor,
            None => false,
        }
    }

    // =========================================================================
    // Completion finishing
    // =========================================================================

    /// End-of-parse completion duties: fallback synthesis if the cursor
    /// was never crossed through an identifier path, orphan
    /// reattachment, bookkeeping drain, and sentinel clearing. Runs once.
    fn finish_completion(&mut self) {
        if self.completion.is_none() {
            return;
        }

        if self.completion.as_ref().is_some_and(|s| !s.fired) {
            self.synthesize_completion();
        }

        self.reattach_completion();

        if let Some(session) = self.completion.as_mut() {
            session.markers.drain();
            session.coordinator.finish();
            debug!(node = ?session.node, "completion parse finished");
        }
        self.scanner.clear_completion_pos();
    }

    /// Clear the scanner sentinel without finishing the parse. The
    /// engine calls this after catching an unwind, so the sentinel is
    /// gone on every exit path.
    pub fn clear_sentinel(&mut self) {
        self.scanner.clear_completion_pos();
    }
}

impl std::fmt::Debug for ParserState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParserState")
            .field("token", &self.token)
            .field("root", &self.root)
            .field("nodes", &self.arena.len())
            .field("diagnostics", &self.diagnostics.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookahead_restores_cursor() {
        let mut state = ParserState::new("a b c", LanguageOptions::default());
        state.next_token();
        assert_eq!(state.token, SyntaxKind::Identifier);
        let start = state.token_start();

        let ahead = state.look_ahead(|s| {
            s.next_token();
            s.token_start()
        });
        assert!(ahead > start);
        assert_eq!(state.token_start(), start);
    }

    #[test]
    fn skip_until_is_bounded() {
        let source = "x ".repeat(200);
        let mut state = ParserState::new(&source, LanguageOptions::default());
        state.next_token();
        let skipped = state.skip_until(&[SyntaxKind::SemicolonToken]);
        assert_eq!(skipped, limits::MAX_ERROR_SKIP_TOKENS);
    }

    #[test]
    fn skip_block_balances_braces() {
        let mut state = ParserState::new("{ { a; } b; } c", LanguageOptions::default());
        state.next_token();
        state.skip_block();
        assert_eq!(state.token, SyntaxKind::Identifier);
        assert_eq!(state.scanner.token_value(), "c");
    }
}
