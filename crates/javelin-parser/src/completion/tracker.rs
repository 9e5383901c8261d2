//! Completion context tracker.
//!
//! A secondary LIFO stack of context markers kept in sync with parsing,
//! so the synthesizer and the reattachment engine can ask "what
//! syntactic position, and what N enclosing positions, are we in" in
//! O(1) amortized.
//!
//! Markers are pushed/popped by two dispatch tables: one keyed on
//! (previous token, current token, current top marker) run on every
//! shifted token, and one run on completed productions, because some
//! contexts close only when a whole production completes (a cast's scope
//! closes once the parenthesized-type-then-operand production fires, not
//! on any single token).
//!
//! Failure semantics: unmatched pops are non-fatal; the tracker never
//! raises.

use crate::ast::NodeIndex;
use crate::state::ParserState;
use javelin_common::limits;
use javelin_scanner::{SyntaxKind, token_is_assignment_operator};
use smallvec::SmallVec;
use tracing::trace;

/// Context-marker kinds.
///
/// A marker is pushed entering a syntactic construct and popped on
/// leaving it; the kind determines the meaning of the `info`/`node`
/// payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MarkerKind {
    // Structural delimiters
    /// Open statement block; `info` = brace depth.
    BlockDelimiter,
    /// Open type body; `node` = enclosing type declaration placeholder.
    TypeDelimiter,
    /// Open method body.
    MethodDelimiter,
    /// Field declarator initializer in progress.
    FieldInitializerDelimiter,
    /// Local declarator initializer in progress.
    LocalInitializerDelimiter,

    // Selector / invocation
    /// A `.` has been consumed, a member name is pending; `node` = receiver.
    Selector,
    /// Inside a call's argument list; `info` = paren depth of the list.
    SelectorInvocationType,
    /// Receiver captured for an open invocation; `node` = receiver.
    SelectorQualifier,

    // Allocation
    /// Between `new` and the allocated type / `[`.
    BetweenNewAndLeftBracket,
    /// Inside an array creation's brackets/initializer.
    ArrayCreation,

    // Statement-keyword frames; `info` = paren+bracket depth at push.
    InsideReturnStatement,
    InsideThrowStatement,
    InsideBreakStatement,
    InsideContinueStatement,

    // Parenthesized headers; `info` = paren depth before the `(`.
    BetweenIfAndRightParen,
    BetweenWhileAndRightParen,
    BetweenForAndRightParen,
    BetweenSwitchAndRightParen,
    BetweenSynchronizedAndRightParen,
    BetweenCatchAndRightParen,

    /// Open if statement body; `node` = recorded condition expression.
    InsideIfBody,

    // Pending type-reference roles
    NextTypeRefIsClass,
    NextTypeRefIsException,
    NextTypeRefIsInterface,

    // Operators; `info` = operator token as u16 where relevant.
    BinaryOperator,
    UnaryOperator,
    /// `node` = left-hand side at push time.
    AssignmentOperator,
    /// `node` = condition at push time.
    ConditionalOperator,

    // Initializers and labels
    ArrayInitializer,
    LabelDefinition,
    SwitchLabel,

    // Annotations
    BetweenAnnotationAndRightParen,
    MemberValueArrayInitializer,
    /// Inside a member value (after `name =` in an annotation).
    AttributeValue,

    // Misc expression contexts
    CastStatement,
    ParameterizedTypeRef,
    ParameterizedAllocation,
    ParameterizedMethodInvocation,
    BetweenInstanceofAndType,
    /// Catch parameter between the header's parens; suppresses the
    /// union-separator `|` from opening an operator context.
    InsideCatchParen,
    /// Right-hand side of an assignment being parsed.
    InsideAssignment,
    InsideCondition,
    InsideForConditional,
}

impl MarkerKind {
    /// Operator markers are drained eagerly at statement boundaries.
    fn is_operator(self) -> bool {
        matches!(
            self,
            MarkerKind::BinaryOperator
                | MarkerKind::UnaryOperator
                | MarkerKind::AssignmentOperator
                | MarkerKind::ConditionalOperator
        )
    }
}

/// One entry of the context-marker stack.
#[derive(Clone, Copy, Debug)]
pub struct Marker {
    pub kind: MarkerKind,
    /// Small integer payload; meaning depends on `kind`.
    pub info: u32,
    /// AST payload; meaning depends on `kind`.
    pub node: NodeIndex,
}

/// The context-marker stack.
///
/// Strictly LIFO-nested on successful paths; `pop` tolerates optimistic
/// push/pop pairs with a bounded best-effort search.
#[derive(Debug, Default)]
pub struct MarkerStack {
    stack: SmallVec<[Marker; 32]>,
    pushed: u64,
    popped: u64,
}

impl MarkerStack {
    pub fn new() -> MarkerStack {
        MarkerStack::default()
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn pushes(&self) -> u64 {
        self.pushed
    }

    pub fn pops(&self) -> u64 {
        self.popped
    }

    pub fn push(&mut self, kind: MarkerKind, info: u32, node: NodeIndex) {
        if self.stack.len() >= limits::MAX_MARKER_DEPTH {
            return;
        }
        trace!(?kind, info, "marker push");
        self.stack.push(Marker { kind, info, node });
        self.pushed += 1;
    }

    /// Pop the top marker if it has `kind`; otherwise search a bounded
    /// number of frames down and remove the first match. Silent no-op if
    /// nothing matches.
    pub fn pop(&mut self, kind: MarkerKind) -> Option<Marker> {
        let len = self.stack.len();
        let search = len.min(limits::MAX_MARKER_POP_SEARCH);
        for depth in 0..search {
            let index = len - 1 - depth;
            if self.stack[index].kind == kind {
                let marker = self.stack.remove(index);
                trace!(?kind, depth, "marker pop");
                self.popped += 1;
                return Some(marker);
            }
        }
        None
    }

    /// Pop the top marker unconditionally.
    pub fn pop_any(&mut self) -> Option<Marker> {
        let marker = self.stack.pop();
        if marker.is_some() {
            self.popped += 1;
        }
        marker
    }

    pub fn peek(&self, depth: usize) -> Option<&Marker> {
        let len = self.stack.len();
        if depth < len {
            self.stack.get(len - 1 - depth)
        } else {
            None
        }
    }

    pub fn peek_kind(&self, depth: usize) -> Option<MarkerKind> {
        self.peek(depth).map(|m| m.kind)
    }

    pub fn peek_info(&self, depth: usize) -> Option<u32> {
        self.peek(depth).map(|m| m.info)
    }

    pub fn peek_node(&self, depth: usize) -> Option<NodeIndex> {
        self.peek(depth).map(|m| m.node)
    }

    /// Overwrite the node payload of the top marker, if it has `kind`.
    /// Used by the parser to fix up a receiver captured at shift time
    /// once the actual expression is known.
    pub fn set_node(&mut self, kind: MarkerKind, node: NodeIndex) {
        if let Some(top) = self.stack.last_mut() {
            if top.kind == kind {
                top.node = node;
            }
        }
    }

    /// Depth (from the top, 0-based) of the nearest marker of `kind`.
    pub fn find_last_index_of(&self, kind: MarkerKind) -> Option<usize> {
        self.stack
            .iter()
            .rev()
            .position(|marker| marker.kind == kind)
    }

    /// Snapshot of the whole stack, top last.
    pub fn snapshot(&self) -> Vec<Marker> {
        self.stack.to_vec()
    }

    /// Drop every remaining marker, counting them as pops. Called once
    /// at end of parse so that pushes equal pops on every completed
    /// parse.
    pub fn drain(&mut self) {
        self.popped += self.stack.len() as u64;
        self.stack.clear();
    }

    /// Pop operator markers sitting on top of the stack; used at
    /// statement boundaries where any open operator context is dead.
    fn drain_operators(&mut self) {
        while self.peek_kind(0).is_some_and(|k| k.is_operator()) {
            self.pop_any();
        }
    }
}

/// Productions the parser reports to the reduction dispatch table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Production {
    IfHeader,
    IfStatement,
    WhileHeader,
    WhileStatement,
    ForHeader,
    ForStatement,
    SwitchHeader,
    SynchronizedHeader,
    CatchHeader,
    TryStatement,
    BinaryExpression,
    UnaryExpression,
    AssignmentExpression,
    ConditionalExpression,
    CastExpression,
    InstanceofExpression,
    AllocationExpression,
    ArrayCreationExpression,
    TypeArguments,
    AnnotationArguments,
    HeritageClause,
    ThrowsClause,
    StatementLabel,
}

impl ParserState {
    // =========================================================================
    // Token-shift dispatch
    // =========================================================================

    /// Called on every shifted token, before the new token becomes
    /// relevant to completion decisions. Keyed on (previous token,
    /// current token, current top marker).
    pub(crate) fn completion_on_token_shift(&mut self, prev: SyntaxKind, current: SyntaxKind) {
        let last_expression = self.last_expression;
        let paren_depth = self.paren_depth;
        let bracket_depth = self.bracket_depth;
        let brace_depth = self.brace_depth;
        let stmt_depth = paren_depth + bracket_depth;

        let Some(session) = self.completion.as_mut() else {
            return;
        };
        let markers = &mut session.markers;

        // A `{` is classified when it was shifted but pushed only now,
        // as it leaves currency, so the declaration parser has had a
        // chance to mark it as a type or method body first.
        if prev == SyntaxKind::OpenBraceToken {
            let kind = session
                .pending_brace_marker
                .take()
                .unwrap_or(MarkerKind::BlockDelimiter);
            markers.push(kind, brace_depth, NodeIndex::NONE);
        }

        // A consumed member name resolves its pending selector; further
        // dots and call-opening parens are handled by their own cases.
        if prev == SyntaxKind::Identifier
            && markers.peek_kind(0) == Some(MarkerKind::Selector)
            && current != SyntaxKind::OpenParenToken
        {
            markers.pop_any();
        }

        match current {
            SyntaxKind::DotToken => {
                markers.push(MarkerKind::Selector, 0, last_expression);
            }
            SyntaxKind::OpenParenToken => {
                let top = markers.peek_kind(0);
                if top == Some(MarkerKind::Selector) {
                    // A call is opening: the pending selector becomes an
                    // invocation; capture the receiver for later
                    // reconstruction of the message send.
                    let receiver = markers.pop(MarkerKind::Selector).map(|m| m.node);
                    markers.push(MarkerKind::SelectorInvocationType, paren_depth + 1, NodeIndex::NONE);
                    markers.push(
                        MarkerKind::SelectorQualifier,
                        paren_depth + 1,
                        receiver.unwrap_or(NodeIndex::NONE),
                    );
                } else if prev == SyntaxKind::Identifier
                    && !session.in_declaration_header
                    && !matches!(
                        top,
                        Some(
                            MarkerKind::BetweenIfAndRightParen
                                | MarkerKind::BetweenWhileAndRightParen
                                | MarkerKind::BetweenForAndRightParen
                                | MarkerKind::BetweenSwitchAndRightParen
                                | MarkerKind::BetweenSynchronizedAndRightParen
                                | MarkerKind::BetweenCatchAndRightParen
                                | MarkerKind::BetweenAnnotationAndRightParen
                        )
                    )
                {
                    // Unqualified call.
                    markers.push(MarkerKind::SelectorInvocationType, paren_depth + 1, NodeIndex::NONE);
                    markers.push(MarkerKind::SelectorQualifier, paren_depth + 1, NodeIndex::NONE);
                }
            }
            SyntaxKind::CloseParenToken => {
                // Close invocation frames opened at this depth.
                while matches!(
                    markers.peek_kind(0),
                    Some(MarkerKind::SelectorQualifier | MarkerKind::SelectorInvocationType)
                ) && markers.peek_info(0) == Some(paren_depth)
                {
                    markers.pop_any();
                }
                // Close a parenthesized header whose `(` sat at this depth.
                let header = matches!(
                    markers.peek_kind(0),
                    Some(
                        MarkerKind::BetweenIfAndRightParen
                            | MarkerKind::BetweenWhileAndRightParen
                            | MarkerKind::BetweenForAndRightParen
                            | MarkerKind::BetweenSwitchAndRightParen
                            | MarkerKind::BetweenSynchronizedAndRightParen
                            | MarkerKind::BetweenCatchAndRightParen
                            | MarkerKind::BetweenAnnotationAndRightParen
                    )
                );
                if header && markers.peek_info(0) == Some(paren_depth.saturating_sub(1)) {
                    markers.pop_any();
                }
            }
            SyntaxKind::SemicolonToken => {
                // `return`/`throw`/`break`/`continue` frames close at a
                // semicolon, but only when the bracket depth recorded at
                // push time matches the current depth; this guards
                // against popping the wrong frame inside nested
                // parentheses.
                markers.drain_operators();
                for kind in [
                    MarkerKind::InsideReturnStatement,
                    MarkerKind::InsideThrowStatement,
                    MarkerKind::InsideBreakStatement,
                    MarkerKind::InsideContinueStatement,
                    MarkerKind::FieldInitializerDelimiter,
                    MarkerKind::LocalInitializerDelimiter,
                ] {
                    if let Some(depth) = markers.find_last_index_of(kind) {
                        if depth < limits::MAX_MARKER_POP_SEARCH
                            && markers.peek_info(depth) == Some(stmt_depth)
                        {
                            markers.pop(kind);
                        }
                    }
                }
            }
            SyntaxKind::CommaToken => {
                // A comma between declarators ends the previous
                // initializer (`int a = 1, b = 2;`). Commas nested in
                // argument lists or array initializers sit at a deeper
                // bracket depth and leave the frame alone.
                for kind in [
                    MarkerKind::FieldInitializerDelimiter,
                    MarkerKind::LocalInitializerDelimiter,
                ] {
                    if let Some(depth) = markers.find_last_index_of(kind) {
                        if depth < limits::MAX_MARKER_POP_SEARCH
                            && markers.peek_info(depth) == Some(stmt_depth)
                        {
                            markers.pop(kind);
                        }
                    }
                }
            }
            SyntaxKind::OpenBraceToken => {
                // Classify only; the push happens when the brace is
                // consumed (see the `prev` handling above), and an
                // explicit classification from the parser wins.
                if session.pending_brace_marker.is_none() {
                    let kind = if matches!(markers.peek_kind(0), Some(MarkerKind::AttributeValue)) {
                        MarkerKind::MemberValueArrayInitializer
                    } else if prev == SyntaxKind::EqualsToken
                        || prev == SyntaxKind::CloseBracketToken
                            && matches!(markers.peek_kind(0), Some(MarkerKind::ArrayCreation))
                        || matches!(
                            markers.peek_kind(0),
                            Some(MarkerKind::ArrayInitializer | MarkerKind::ArrayCreation)
                        ) && matches!(prev, SyntaxKind::CommaToken | SyntaxKind::OpenBraceToken)
                    {
                        MarkerKind::ArrayInitializer
                    } else {
                        MarkerKind::BlockDelimiter
                    };
                    session.pending_brace_marker = Some(kind);
                }
            }
            SyntaxKind::CloseBraceToken => {
                markers.drain_operators();
                for kind in [
                    MarkerKind::ArrayInitializer,
                    MarkerKind::MemberValueArrayInitializer,
                    MarkerKind::BlockDelimiter,
                    MarkerKind::MethodDelimiter,
                    MarkerKind::TypeDelimiter,
                ] {
                    if markers.peek_kind(0) == Some(kind) {
                        markers.pop_any();
                        break;
                    }
                }
            }
            SyntaxKind::OpenBracketToken => {
                if markers.peek_kind(0) == Some(MarkerKind::BetweenNewAndLeftBracket) {
                    markers.pop_any();
                    markers.push(MarkerKind::ArrayCreation, bracket_depth + 1, NodeIndex::NONE);
                }
            }
            SyntaxKind::ColonToken => {
                if markers.peek_kind(0) == Some(MarkerKind::SwitchLabel) {
                    markers.pop_any();
                }
            }
            SyntaxKind::QuestionToken => {
                markers.push(MarkerKind::ConditionalOperator, 0, last_expression);
            }

            // Statement keywords
            SyntaxKind::ReturnKeyword => {
                markers.push(MarkerKind::InsideReturnStatement, stmt_depth, NodeIndex::NONE);
            }
            SyntaxKind::ThrowKeyword => {
                markers.push(MarkerKind::InsideThrowStatement, stmt_depth, NodeIndex::NONE);
            }
            SyntaxKind::BreakKeyword => {
                markers.push(MarkerKind::InsideBreakStatement, stmt_depth, NodeIndex::NONE);
            }
            SyntaxKind::ContinueKeyword => {
                markers.push(MarkerKind::InsideContinueStatement, stmt_depth, NodeIndex::NONE);
            }
            SyntaxKind::IfKeyword => {
                markers.push(MarkerKind::BetweenIfAndRightParen, paren_depth, NodeIndex::NONE);
            }
            SyntaxKind::WhileKeyword => {
                markers.push(MarkerKind::BetweenWhileAndRightParen, paren_depth, NodeIndex::NONE);
            }
            SyntaxKind::ForKeyword => {
                markers.push(MarkerKind::BetweenForAndRightParen, paren_depth, NodeIndex::NONE);
            }
            SyntaxKind::SwitchKeyword => {
                markers.push(MarkerKind::BetweenSwitchAndRightParen, paren_depth, NodeIndex::NONE);
            }
            SyntaxKind::SynchronizedKeyword => {
                // Also a modifier; only a statement-header when a block is
                // open around us.
                if matches!(
                    markers.peek_kind(0),
                    Some(MarkerKind::BlockDelimiter | MarkerKind::MethodDelimiter)
                ) {
                    markers.push(
                        MarkerKind::BetweenSynchronizedAndRightParen,
                        paren_depth,
                        NodeIndex::NONE,
                    );
                }
            }
            SyntaxKind::CatchKeyword => {
                markers.push(MarkerKind::BetweenCatchAndRightParen, paren_depth, NodeIndex::NONE);
            }
            SyntaxKind::NewKeyword => {
                markers.push(MarkerKind::BetweenNewAndLeftBracket, 0, NodeIndex::NONE);
            }
            SyntaxKind::InstanceofKeyword => {
                markers.push(MarkerKind::BetweenInstanceofAndType, 0, last_expression);
            }
            SyntaxKind::CaseKeyword => {
                markers.push(MarkerKind::SwitchLabel, 0, NodeIndex::NONE);
            }
            SyntaxKind::ExtendsKeyword => {
                markers.push(MarkerKind::NextTypeRefIsClass, 0, NodeIndex::NONE);
            }
            SyntaxKind::ImplementsKeyword => {
                markers.push(MarkerKind::NextTypeRefIsInterface, 0, NodeIndex::NONE);
            }
            SyntaxKind::ThrowsKeyword => {
                markers.push(MarkerKind::NextTypeRefIsException, 0, NodeIndex::NONE);
            }

            SyntaxKind::BarToken => {
                // In a catch parameter `|` separates union-type
                // alternatives and must not open a binary-operator
                // context.
                let in_catch = markers
                    .find_last_index_of(MarkerKind::BetweenCatchAndRightParen)
                    .is_some_and(|depth| {
                        markers.peek_info(depth) == Some(paren_depth.saturating_sub(1))
                    });
                if !in_catch {
                    markers.push(MarkerKind::BinaryOperator, current as u32, last_expression);
                }
            }

            kind if token_is_assignment_operator(kind) => {
                if session.in_declarator {
                    let enclosing_method =
                        markers.find_last_index_of(MarkerKind::MethodDelimiter).is_some();
                    let marker = if enclosing_method {
                        MarkerKind::LocalInitializerDelimiter
                    } else {
                        MarkerKind::FieldInitializerDelimiter
                    };
                    markers.push(marker, stmt_depth, NodeIndex::NONE);
                    session.in_declarator = false;
                } else if matches!(
                    markers.peek_kind(0),
                    Some(MarkerKind::BetweenAnnotationAndRightParen)
                ) {
                    markers.push(MarkerKind::AttributeValue, 0, NodeIndex::NONE);
                } else {
                    markers.push(MarkerKind::AssignmentOperator, current as u32, last_expression);
                }
            }

            kind if matches!(kind, SyntaxKind::PlusPlusToken | SyntaxKind::MinusMinusToken)
                && ends_expression(prev) =>
            {
                // Postfix increment/decrement: no pending operand, no
                // marker.
            }

            kind if is_binary_operator_token(kind) => {
                // Both the generics-opening `<` and the comparison `<`
                // push the same binary-operator marker; disambiguation
                // happens at pop time by inspecting the markers below.
                if ends_expression(prev) {
                    markers.push(MarkerKind::BinaryOperator, current as u32, last_expression);
                } else if matches!(
                    kind,
                    SyntaxKind::PlusToken
                        | SyntaxKind::MinusToken
                        | SyntaxKind::BangToken
                        | SyntaxKind::TildeToken
                        | SyntaxKind::PlusPlusToken
                        | SyntaxKind::MinusMinusToken
                ) {
                    markers.push(MarkerKind::UnaryOperator, current as u32, NodeIndex::NONE);
                }
            }

            _ => {}
        }
    }

    // =========================================================================
    // Reduction dispatch
    // =========================================================================

    /// Called after a grammar production completes. `payload` is the node
    /// the production produced where the table needs it (e.g. an if
    /// header's condition).
    pub(crate) fn completion_on_reduction(&mut self, production: Production, payload: NodeIndex) {
        let Some(session) = self.completion.as_mut() else {
            return;
        };
        let markers = &mut session.markers;
        trace!(?production, "reduction");

        match production {
            Production::IfHeader => {
                markers.pop(MarkerKind::BetweenIfAndRightParen);
                markers.push(MarkerKind::InsideIfBody, 0, payload);
            }
            Production::IfStatement => {
                markers.pop(MarkerKind::InsideIfBody);
            }
            Production::WhileHeader => {
                markers.pop(MarkerKind::BetweenWhileAndRightParen);
            }
            Production::ForHeader => {
                markers.pop(MarkerKind::BetweenForAndRightParen);
                markers.pop(MarkerKind::InsideForConditional);
            }
            Production::SwitchHeader => {
                markers.pop(MarkerKind::BetweenSwitchAndRightParen);
            }
            Production::SynchronizedHeader => {
                markers.pop(MarkerKind::BetweenSynchronizedAndRightParen);
            }
            Production::CatchHeader => {
                markers.pop(MarkerKind::BetweenCatchAndRightParen);
                markers.pop(MarkerKind::NextTypeRefIsException);
            }
            Production::TryStatement | Production::WhileStatement | Production::ForStatement => {}
            Production::BinaryExpression => {
                markers.pop(MarkerKind::BinaryOperator);
            }
            Production::UnaryExpression => {
                markers.pop(MarkerKind::UnaryOperator);
            }
            Production::AssignmentExpression => {
                markers.pop(MarkerKind::AssignmentOperator);
            }
            Production::ConditionalExpression => {
                markers.pop(MarkerKind::ConditionalOperator);
            }
            Production::CastExpression => {
                markers.pop(MarkerKind::CastStatement);
            }
            Production::InstanceofExpression => {
                markers.pop(MarkerKind::BetweenInstanceofAndType);
            }
            Production::AllocationExpression => {
                markers.pop(MarkerKind::BetweenNewAndLeftBracket);
                markers.pop(MarkerKind::ParameterizedAllocation);
            }
            Production::ArrayCreationExpression => {
                markers.pop(MarkerKind::ArrayCreation);
                markers.pop(MarkerKind::BetweenNewAndLeftBracket);
            }
            Production::TypeArguments => {
                // The `<` that opened this list pushed a binary-operator
                // marker before the list committed to being generics; the
                // parameterized marker next to it signals that the
                // operator context was bogus.
                markers.pop(MarkerKind::ParameterizedTypeRef);
                if markers.peek_kind(0) == Some(MarkerKind::BinaryOperator)
                    && markers.peek_info(0) == Some(SyntaxKind::LessThanToken as u32)
                {
                    markers.pop_any();
                }
            }
            Production::AnnotationArguments => {
                markers.pop(MarkerKind::AttributeValue);
                markers.pop(MarkerKind::BetweenAnnotationAndRightParen);
            }
            Production::HeritageClause => {
                markers.pop(MarkerKind::NextTypeRefIsClass);
                markers.pop(MarkerKind::NextTypeRefIsInterface);
            }
            Production::ThrowsClause => {
                markers.pop(MarkerKind::NextTypeRefIsException);
            }
            Production::StatementLabel => {
                markers.push(MarkerKind::LabelDefinition, 0, payload);
            }
        }
    }
}

/// Tokens that can end a completed expression; a binary operator after
/// one of these is genuinely binary rather than unary.
fn ends_expression(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::Identifier
            | SyntaxKind::NumericLiteral
            | SyntaxKind::StringLiteral
            | SyntaxKind::CharLiteral
            | SyntaxKind::CloseParenToken
            | SyntaxKind::CloseBracketToken
            | SyntaxKind::ThisKeyword
            | SyntaxKind::SuperKeyword
            | SyntaxKind::TrueKeyword
            | SyntaxKind::FalseKeyword
            | SyntaxKind::NullKeyword
            | SyntaxKind::ClassKeyword
    )
}

fn is_binary_operator_token(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::PlusToken
            | SyntaxKind::MinusToken
            | SyntaxKind::AsteriskToken
            | SyntaxKind::SlashToken
            | SyntaxKind::PercentToken
            | SyntaxKind::AmpersandToken
            | SyntaxKind::CaretToken
            | SyntaxKind::AmpersandAmpersandToken
            | SyntaxKind::BarBarToken
            | SyntaxKind::EqualsEqualsToken
            | SyntaxKind::BangEqualsToken
            | SyntaxKind::LessThanToken
            | SyntaxKind::GreaterThanToken
            | SyntaxKind::LessThanEqualsToken
            | SyntaxKind::GreaterThanEqualsToken
            | SyntaxKind::LessThanLessThanToken
            | SyntaxKind::GreaterThanGreaterThanToken
            | SyntaxKind::GreaterThanGreaterThanGreaterThanToken
            | SyntaxKind::BangToken
            | SyntaxKind::TildeToken
            | SyntaxKind::PlusPlusToken
            | SyntaxKind::MinusMinusToken
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pop_matches_top_first() {
        let mut stack = MarkerStack::new();
        stack.push(MarkerKind::BlockDelimiter, 1, NodeIndex::NONE);
        stack.push(MarkerKind::BinaryOperator, 0, NodeIndex::NONE);
        assert!(stack.pop(MarkerKind::BinaryOperator).is_some());
        assert_eq!(stack.peek_kind(0), Some(MarkerKind::BlockDelimiter));
    }

    #[test]
    fn pop_searches_bounded_depth() {
        let mut stack = MarkerStack::new();
        stack.push(MarkerKind::BlockDelimiter, 1, NodeIndex::NONE);
        stack.push(MarkerKind::BinaryOperator, 0, NodeIndex::NONE);
        stack.push(MarkerKind::UnaryOperator, 0, NodeIndex::NONE);
        // BlockDelimiter is 2 frames down, within the search bound.
        assert!(stack.pop(MarkerKind::BlockDelimiter).is_some());
        assert_eq!(stack.depth(), 2);
    }

    #[test]
    fn unmatched_pop_is_silent() {
        let mut stack = MarkerStack::new();
        stack.push(MarkerKind::BlockDelimiter, 1, NodeIndex::NONE);
        assert!(stack.pop(MarkerKind::ArrayInitializer).is_none());
        assert_eq!(stack.depth(), 1);
        assert_eq!(stack.pops(), 0);
    }

    #[test]
    fn drain_balances_counts() {
        let mut stack = MarkerStack::new();
        stack.push(MarkerKind::BlockDelimiter, 1, NodeIndex::NONE);
        stack.push(MarkerKind::Selector, 0, NodeIndex::NONE);
        stack.pop(MarkerKind::Selector);
        stack.drain();
        assert_eq!(stack.pushes(), stack.pops());
        assert_eq!(stack.depth(), 0);
    }

    #[test]
    fn find_last_index_scans_from_top() {
        let mut stack = MarkerStack::new();
        stack.push(MarkerKind::BlockDelimiter, 1, NodeIndex::NONE);
        stack.push(MarkerKind::BetweenCatchAndRightParen, 0, NodeIndex::NONE);
        stack.push(MarkerKind::BinaryOperator, 0, NodeIndex::NONE);
        assert_eq!(
            stack.find_last_index_of(MarkerKind::BetweenCatchAndRightParen),
            Some(1)
        );
        assert_eq!(stack.find_last_index_of(MarkerKind::Selector), None);
    }
}
