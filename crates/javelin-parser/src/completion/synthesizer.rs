//! Completion node synthesizer.
//!
//! The instant the cursor boundary is crossed, a priority-ordered chain
//! of recognizers decides which completion-node variant to manufacture.
//! The chain fires at most once per parse; each check assumes every
//! earlier one failed, and the ordering is load-bearing (invocation must
//! come after member access, because a member access can itself be the
//! still-open receiver of an invocation).

use crate::ast::{Node, NodeBase, NodeIndex, NodeList};
use crate::completion::keywords;
use crate::completion::tracker::MarkerKind;
use crate::completion::{CompletionData, CompletionKind};
use crate::state::ParserState;
use javelin_common::limits;
use javelin_scanner::SyntaxKind;
use tracing::debug;

/// Everything a recognizer produces: variant, receiver, keyword pool,
/// call arguments.
struct Synthesis {
    kind: CompletionKind,
    receiver: NodeIndex,
    keywords: Vec<SyntaxKind>,
    arguments: Option<NodeList>,
}

impl Synthesis {
    fn bare(kind: CompletionKind) -> Synthesis {
        Synthesis {
            kind,
            receiver: NodeIndex::NONE,
            keywords: Vec::new(),
            arguments: None,
        }
    }

    fn with_receiver(kind: CompletionKind, receiver: NodeIndex) -> Synthesis {
        Synthesis {
            receiver,
            ..Synthesis::bare(kind)
        }
    }
}

impl ParserState {
    /// Fire the synthesizer. Idempotent: after the first call the
    /// existing node is returned unchanged.
    pub(crate) fn synthesize_completion(&mut self) -> NodeIndex {
        let Some(session) = self.completion.as_ref() else {
            return NodeIndex::NONE;
        };
        if session.fired {
            return session.node;
        }

        // Range and prefix come from the flagged token when it is
        // current; otherwise the cursor was crossed without one (clamped
        // EOF) and an empty node is placed at the insertion index.
        let (start, end, prefix) = if self.scanner.is_completion_identifier() {
            (
                self.token_start(),
                self.token_end(),
                self.scanner.token_value().to_string(),
            )
        } else {
            let at = session.cursor;
            (at, at, String::new())
        };

        let synthesis = self.recognize(&prefix);
        let node = self.arena.add(Node::Completion(CompletionData {
            base: NodeBase::new(start, end),
            kind: synthesis.kind,
            prefix,
            receiver: synthesis.receiver,
            keywords: synthesis.keywords,
            arguments: synthesis.arguments,
            orphan: true,
        }));

        debug!(kind = ?synthesis.kind, ?node, start, end, "completion node synthesized");
        if let Some(session) = self.completion.as_mut() {
            session.node = node;
            session.fired = true;
            session.marker_snapshot = session.markers.snapshot();
            session.coordinator.cursor_found();
        }
        node
    }

    /// The priority chain. First match wins.
    fn recognize(&self, prefix: &str) -> Synthesis {
        let Some(session) = self.completion.as_ref() else {
            return Synthesis::bare(CompletionKind::NameReference);
        };
        let markers = &session.markers;
        let prev = self.prev_token;

        let near = |kind: MarkerKind| {
            markers
                .find_last_index_of(kind)
                .is_some_and(|d| d < limits::MAX_MARKER_POP_SEARCH)
        };

        // 1. Member-value name inside an annotation argument list.
        if near(MarkerKind::BetweenAnnotationAndRightParen)
            && !near(MarkerKind::AttributeValue)
            && matches!(prev, SyntaxKind::OpenParenToken | SyntaxKind::CommaToken)
        {
            return Synthesis::bare(CompletionKind::MemberValueName);
        }
        if prev == SyntaxKind::AtToken {
            return Synthesis::bare(CompletionKind::AnnotationName);
        }

        // 2. Reserved-keyword positions at declaration level.
        if let Some(synthesis) = self.recognize_declaration_keyword(prefix) {
            return synthesis;
        }

        // 3. Type reference inside a recovered type/method header or
        //    other committed type position.
        if let Some(synthesis) = self.recognize_type_position() {
            return synthesis;
        }

        // 4. Allocation target after `new`.
        if near(MarkerKind::BetweenNewAndLeftBracket) {
            let qualifier = session.selector_receiver;
            return if qualifier.is_some() {
                Synthesis::with_receiver(CompletionKind::QualifiedAllocation, qualifier)
            } else {
                Synthesis::bare(CompletionKind::AllocationExpression)
            };
        }

        // 5./6. Member access and class-literal access after a dot.
        if let Some(depth) = markers.find_last_index_of(MarkerKind::Selector) {
            if depth < limits::MAX_MARKER_POP_SEARCH {
                let receiver = match markers.peek_node(depth) {
                    Some(node) if node.is_some() => node,
                    _ => session.selector_receiver,
                };
                if session.in_import_or_package {
                    return Synthesis::with_receiver(
                        CompletionKind::QualifiedNameReference,
                        receiver,
                    );
                }
                if self.receiver_is_class_literal_base(receiver) {
                    let mut synthesis =
                        Synthesis::with_receiver(CompletionKind::ClassLiteralAccess, receiver);
                    synthesis.keywords = vec![SyntaxKind::ClassKeyword];
                    return synthesis;
                }
                if session.selector_is_type || self.in_type_marker_context() {
                    return Synthesis::with_receiver(
                        CompletionKind::QualifiedTypeReference,
                        receiver,
                    );
                }
                if self.receiver_is_name(receiver) {
                    return Synthesis::with_receiver(
                        CompletionKind::QualifiedNameReference,
                        receiver,
                    );
                }
                return Synthesis::with_receiver(CompletionKind::MemberAccess, receiver);
            }
        }

        // 7. `instanceof` keyword after a complete expression.
        if ends_expression(prev)
            && !prefix.is_empty()
            && keywords::matches_prefix(SyntaxKind::InstanceofKeyword, prefix)
        {
            let mut synthesis = Synthesis::bare(CompletionKind::Keyword);
            synthesis.keywords = keywords::after_expression_keywords();
            return synthesis;
        }

        // 8. Invocation: trailing argument position of an open call.
        if matches!(prev, SyntaxKind::OpenParenToken | SyntaxKind::CommaToken) {
            if let Some(depth) = markers.find_last_index_of(MarkerKind::SelectorQualifier) {
                if depth < limits::MAX_MARKER_POP_SEARCH
                    && markers.peek_info(depth) == Some(self.paren_depth)
                {
                    let receiver = markers.peek_node(depth).unwrap_or(NodeIndex::NONE);
                    let mut synthesis =
                        Synthesis::with_receiver(CompletionKind::MessageSend, receiver);
                    synthesis.arguments = session.enclosing_call_arguments.clone();
                    return synthesis;
                }
            }
        }

        // 9. Parameterized type / invocation.
        if near(MarkerKind::ParameterizedTypeRef)
            || near(MarkerKind::ParameterizedAllocation)
            || near(MarkerKind::ParameterizedMethodInvocation)
        {
            return Synthesis::bare(CompletionKind::ParameterizedType);
        }

        // 10. Labels.
        if prev == SyntaxKind::BreakKeyword && near(MarkerKind::InsideBreakStatement) {
            return Synthesis::bare(CompletionKind::BreakLabel);
        }
        if prev == SyntaxKind::ContinueKeyword && near(MarkerKind::InsideContinueStatement) {
            return Synthesis::bare(CompletionKind::ContinueLabel);
        }

        // 11. Fallback: bare name, with statement keywords when the
        //     cursor sits at a statement boundary.
        let mut synthesis = Synthesis::bare(CompletionKind::NameReference);
        if matches!(
            prev,
            SyntaxKind::OpenBraceToken | SyntaxKind::CloseBraceToken | SyntaxKind::SemicolonToken
        ) && self.in_statement_context()
        {
            synthesis.keywords =
                keywords::filter_by_prefix(keywords::statement_keywords(&self.options), prefix);
        }
        synthesis
    }

    /// Declaration-level keyword positions (check 2): unit header, type
    /// body member start.
    fn recognize_declaration_keyword(&self, prefix: &str) -> Option<Synthesis> {
        let session = self.completion.as_ref()?;
        let markers = &session.markers;
        let at_boundary = matches!(
            self.prev_token,
            SyntaxKind::Unknown
                | SyntaxKind::OpenBraceToken
                | SyntaxKind::CloseBraceToken
                | SyntaxKind::SemicolonToken
        );
        if !at_boundary {
            return None;
        }

        match markers.peek_kind(0) {
            None => {
                // Compilation-unit level.
                let mut synthesis = Synthesis::bare(CompletionKind::Keyword);
                synthesis.keywords = keywords::filter_by_prefix(
                    keywords::unit_header_keywords(&self.options),
                    prefix,
                );
                Some(synthesis)
            }
            Some(MarkerKind::TypeDelimiter) => {
                if prefix.is_empty() {
                    let mut synthesis = Synthesis::bare(CompletionKind::Keyword);
                    synthesis.keywords = keywords::member_declaration_keywords(&self.options);
                    Some(synthesis)
                } else {
                    // A prefix narrows the position to a member type,
                    // with the declaration keywords still viable.
                    let mut synthesis = Synthesis::bare(CompletionKind::FieldType);
                    synthesis.keywords = keywords::filter_by_prefix(
                        keywords::member_declaration_keywords(&self.options),
                        prefix,
                    );
                    Some(synthesis)
                }
            }
            _ => None,
        }
    }

    /// Committed type positions (check 3).
    fn recognize_type_position(&self) -> Option<Synthesis> {
        let session = self.completion.as_ref()?;
        let markers = &session.markers;
        let near = |kind: MarkerKind| {
            markers
                .find_last_index_of(kind)
                .is_some_and(|d| d < limits::MAX_MARKER_POP_SEARCH)
        };

        // Exception positions: catch parameter, throws clause.
        if near(MarkerKind::BetweenCatchAndRightParen) || near(MarkerKind::NextTypeRefIsException) {
            return Some(Synthesis::bare(CompletionKind::ExceptionReference));
        }
        if near(MarkerKind::BetweenInstanceofAndType) {
            return Some(Synthesis::bare(CompletionKind::TypeReference));
        }
        if near(MarkerKind::NextTypeRefIsClass) || near(MarkerKind::NextTypeRefIsInterface) {
            return Some(Synthesis::bare(CompletionKind::TypeReference));
        }
        if session.in_method_name {
            return Some(Synthesis::bare(CompletionKind::MethodName));
        }
        if session.in_parameter_name {
            return Some(Synthesis::bare(CompletionKind::ArgumentName));
        }
        if session.in_declaration_header {
            let kind = if session.after_type_parameters {
                CompletionKind::MethodReturnType
            } else if near(MarkerKind::MethodDelimiter) {
                CompletionKind::TypeReference
            } else {
                CompletionKind::FieldType
            };
            return Some(Synthesis::bare(kind));
        }
        None
    }

    fn in_type_marker_context(&self) -> bool {
        let Some(session) = self.completion.as_ref() else {
            return false;
        };
        let markers = &session.markers;
        [
            MarkerKind::NextTypeRefIsClass,
            MarkerKind::NextTypeRefIsInterface,
            MarkerKind::NextTypeRefIsException,
            MarkerKind::BetweenInstanceofAndType,
            MarkerKind::ParameterizedTypeRef,
        ]
        .into_iter()
        .any(|kind| {
            markers
                .find_last_index_of(kind)
                .is_some_and(|d| d < limits::MAX_MARKER_POP_SEARCH + 1)
        })
    }

    /// Array types and primitive types admit only `class` after a dot.
    fn receiver_is_class_literal_base(&self, receiver: NodeIndex) -> bool {
        match self.arena.get(receiver) {
            Some(Node::PrimitiveType(_)) => true,
            Some(Node::NamedType(d)) => d.dims > 0,
            _ => false,
        }
    }

    fn receiver_is_name(&self, receiver: NodeIndex) -> bool {
        matches!(
            self.arena.get(receiver),
            Some(Node::Identifier(_) | Node::QualifiedName(_))
        )
    }

    /// Whether the nearest structural marker is a statement container.
    fn in_statement_context(&self) -> bool {
        let Some(session) = self.completion.as_ref() else {
            return false;
        };
        let markers = &session.markers;
        for depth in 0..markers.depth() {
            match markers.peek_kind(depth) {
                Some(MarkerKind::BlockDelimiter | MarkerKind::MethodDelimiter) => return true,
                Some(MarkerKind::TypeDelimiter) => return false,
                _ => continue,
            }
        }
        false
    }
}

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
            | SyntaxKind::TrueKeyword
            | SyntaxKind::FalseKeyword
            | SyntaxKind::NullKeyword
    )
}
