//! Orphan reattachment.
//!
//! The synthesizer can fire from stack inspection rather than from a
//! normal reduction, leaving the completion node outside the tree. This
//! engine runs once, after parsing, and splices the node back in: it
//! walks the marker stack captured at fire time from the top down,
//! wrapping the node in the enclosing expressions/statements each marker
//! implies, then hands the result to the recovery skeleton's insertion
//! primitive. Missing markers or unexpected shapes degrade to attaching
//! the bare node; this code never raises.

use crate::ast::{
    ArrayCreationData, ArrayInitializerData, AssignmentData, BlockData, CatchClauseData,
    ConditionalData, ExpressionStatementData, FieldDeclData, IfData, Node, NodeBase, NodeIndex,
    NodeList, ParameterData, ReturnData, ThrowData, TryData, WhileData,
};
use crate::completion::tracker::{Marker, MarkerKind};
use crate::completion::CompletionKind;
use crate::recovery::{self, AddPriority};
use crate::state::ParserState;
use javelin_common::span::TextRange;
use javelin_scanner::SyntaxKind;
use tracing::debug;

impl ParserState {
    /// Splice an orphaned completion node into the recovered tree.
    /// Guarded by the orphan flag: runs at most once, and a node the
    /// parser already linked is only marked attached.
    pub(crate) fn reattach_completion(&mut self) {
        let Some(session) = self.completion.as_ref() else {
            return;
        };
        let node = session.node;
        if node.is_none() || self.root.is_none() {
            return;
        }
        let already_orphan = match self.arena.get(node) {
            Some(Node::Completion(d)) => d.orphan,
            _ => return,
        };
        if !already_orphan {
            return;
        }

        if self.arena.is_reachable(self.root, node) {
            self.mark_attached(node);
            return;
        }

        let kind = match self.arena.get(node) {
            Some(Node::Completion(d)) => d.kind,
            _ => return,
        };
        let range = self.arena.range(node).unwrap_or(TextRange::empty(0));
        let snapshot = session.marker_snapshot.clone();

        // Exception references under an open catch header get the full
        // try-statement synthesis.
        if kind == CompletionKind::ExceptionReference
            && snapshot
                .iter()
                .rev()
                .take(4)
                .any(|m| m.kind == MarkerKind::BetweenCatchAndRightParen)
        {
            self.attach_as_catch_clause(node, range);
            return;
        }

        // Member-position type completions attach as a field
        // declaration's type.
        if matches!(kind, CompletionKind::FieldType | CompletionKind::MethodReturnType) {
            let field = self.arena.add(Node::FieldDeclaration(FieldDeclData {
                base: NodeBase::new(range.start, range.end),
                modifiers: Default::default(),
                annotations: NodeList::new(),
                type_ref: node,
                declarators: NodeList::new(),
            }));
            self.attach_into_skeleton(node, field, range);
            return;
        }

        let wrapped = self.wrap_by_markers(node, &snapshot, range);
        self.attach_into_skeleton(node, wrapped, range);
    }

    /// Walk the marker snapshot top-down, wrapping `node` per marker
    /// kind. Returns the outermost synthesized node.
    fn wrap_by_markers(&mut self, node: NodeIndex, snapshot: &[Marker], range: TextRange) -> NodeIndex {
        let base = NodeBase::new(range.start, range.end);
        let mut current = node;
        let mut is_statement = false;
        let mut in_array_initializer = false;

        for marker in snapshot.iter().rev() {
            if is_statement {
                // Statement wrapping continues only for the
                // instanceof-guarded-if policy below.
                if marker.kind == MarkerKind::InsideIfBody
                    && self.condition_is_instanceof(marker.node)
                {
                    current = self.arena.add(Node::IfStatement(IfData {
                        base,
                        condition: marker.node,
                        then_statement: current,
                        else_statement: NodeIndex::NONE,
                    }));
                }
                if is_structural(marker.kind) {
                    break;
                }
                continue;
            }

            match marker.kind {
                MarkerKind::AssignmentOperator => {
                    current = self.arena.add(Node::Assignment(AssignmentData {
                        base,
                        left: marker.node,
                        operator: SyntaxKind::EqualsToken,
                        right: current,
                    }));
                }
                MarkerKind::ConditionalOperator => {
                    // The captured condition takes the condition slot;
                    // the node lands in the then-branch.
                    current = self.arena.add(Node::Conditional(ConditionalData {
                        base,
                        condition: marker.node,
                        when_true: current,
                        when_false: NodeIndex::NONE,
                    }));
                }
                MarkerKind::ArrayInitializer | MarkerKind::MemberValueArrayInitializer => {
                    let mut expressions = NodeList::new();
                    expressions.push(current);
                    current = self.arena.add(Node::ArrayInitializer(ArrayInitializerData {
                        base,
                        expressions,
                    }));
                    in_array_initializer = true;
                }
                MarkerKind::ArrayCreation if in_array_initializer => {
                    current = self.arena.add(Node::ArrayCreation(ArrayCreationData {
                        base,
                        element_type: NodeIndex::NONE,
                        dim_expressions: NodeList::new(),
                        dims: 1,
                        initializer: current,
                    }));
                    in_array_initializer = false;
                }
                MarkerKind::InsideReturnStatement => {
                    current = self.arena.add(Node::ReturnStatement(ReturnData {
                        base,
                        expression: current,
                    }));
                    is_statement = true;
                }
                MarkerKind::InsideThrowStatement => {
                    current = self.arena.add(Node::ThrowStatement(ThrowData {
                        base,
                        expression: current,
                    }));
                    is_statement = true;
                }
                MarkerKind::BetweenIfAndRightParen => {
                    current = self.arena.add(Node::IfStatement(IfData {
                        base,
                        condition: current,
                        then_statement: NodeIndex::NONE,
                        else_statement: NodeIndex::NONE,
                    }));
                    is_statement = true;
                }
                MarkerKind::BetweenWhileAndRightParen => {
                    current = self.arena.add(Node::WhileStatement(WhileData {
                        base,
                        condition: current,
                        body: NodeIndex::NONE,
                    }));
                    is_statement = true;
                }
                MarkerKind::InsideIfBody if self.condition_is_instanceof(marker.node) => {
                    let statement = self.statementize(current, base);
                    current = self.arena.add(Node::IfStatement(IfData {
                        base,
                        condition: marker.node,
                        then_statement: statement,
                        else_statement: NodeIndex::NONE,
                    }));
                    is_statement = true;
                }
                kind if is_structural(kind) => break,
                _ => {}
            }
        }

        if is_statement {
            current
        } else {
            self.statementize(current, base)
        }
    }

    fn statementize(&mut self, node: NodeIndex, base: NodeBase) -> NodeIndex {
        if self.arena.get(node).is_some_and(Node::is_statement) {
            return node;
        }
        self.arena.add(Node::ExpressionStatement(ExpressionStatementData {
            base,
            expression: node,
        }))
    }

    fn condition_is_instanceof(&self, condition: NodeIndex) -> bool {
        match self.arena.get(condition) {
            Some(Node::Instanceof(_)) => true,
            Some(Node::Parenthesized(d)) => self.condition_is_instanceof(d.expression),
            _ => false,
        }
    }

    /// Full try-statement synthesis for an exception reference under an
    /// open catch header: fabricated empty catch block, placeholder
    /// argument typed with the reference. If a broken try statement
    /// already encloses the node's position, the new clause joins its
    /// existing catch clauses in order instead.
    fn attach_as_catch_clause(&mut self, node: NodeIndex, range: TextRange) {
        let base = NodeBase::new(range.start, range.end);
        let parameter = self.arena.add(Node::Parameter(ParameterData {
            base,
            modifiers: Default::default(),
            annotations: NodeList::new(),
            type_ref: node,
            name: NodeIndex::NONE,
            varargs: false,
        }));
        let block = self.arena.add(Node::Block(BlockData {
            base,
            statements: NodeList::new(),
        }));
        let clause = self.arena.add(Node::CatchClause(CatchClauseData {
            base,
            parameter,
            block,
        }));

        let enclosing_try = self.arena.deepest_containing(self.root, range.start, |n| {
            matches!(n, Node::TryStatement(_))
        });
        if let Some(try_index) = enclosing_try {
            if let Some(Node::TryStatement(d)) = self.arena.get_mut(try_index) {
                d.catch_clauses.push(clause);
                debug!(?try_index, "completion catch clause joined existing try");
                self.mark_attached(node);
                return;
            }
        }

        let empty_block = self.arena.add(Node::Block(BlockData {
            base,
            statements: NodeList::new(),
        }));
        let try_statement = self.arena.add(Node::TryStatement(TryData {
            base,
            try_block: empty_block,
            catch_clauses: {
                let mut clauses = NodeList::new();
                clauses.push(clause);
                clauses
            },
            finally_block: NodeIndex::NONE,
        }));
        self.attach_into_skeleton(node, try_statement, range);
    }

    /// Hand the wrapped node to the skeleton, honoring the
    /// method-body-start heuristic: a statement on the same line as a
    /// brace-less method header belongs to the broken header, so it is
    /// attached to the enclosing type instead of the phantom body.
    fn attach_into_skeleton(&mut self, node: NodeIndex, wrapped: NodeIndex, range: TextRange) {
        let container = recovery::enclosing_container(&self.arena, self.root, range.start);

        if let Some(method) = self.suppressing_method(range.start) {
            debug!(?method, "statement suppressed by broken method header");
            let type_container = self
                .arena
                .deepest_containing(self.root, range.start, |n| {
                    matches!(n, Node::TypeDeclaration(_))
                })
                .unwrap_or(self.root);
            recovery::add(&mut self.arena, type_container, node, AddPriority::High);
            self.mark_attached(node);
            return;
        }

        recovery::add(&mut self.arena, container, wrapped, AddPriority::High);
        if self.arena.is_reachable(self.root, node) {
            self.mark_attached(node);
        }
    }

    /// The enclosing method whose header line equals the node's line and
    /// whose body brace is missing, if any.
    fn suppressing_method(&self, offset: u32) -> Option<NodeIndex> {
        let method = self.arena.deepest_containing(self.root, offset, |n| {
            matches!(n, Node::MethodDeclaration(_))
        })?;
        match self.arena.get(method) {
            Some(Node::MethodDeclaration(d)) if !d.has_open_brace => {
                let header_line = self.line_map.line_of(d.base.pos);
                let node_line = self.line_map.line_of(offset);
                (header_line == node_line).then_some(method)
            }
            _ => None,
        }
    }

    fn mark_attached(&mut self, node: NodeIndex) {
        if let Some(Node::Completion(d)) = self.arena.get_mut(node) {
            d.orphan = false;
        }
    }
}

fn is_structural(kind: MarkerKind) -> bool {
    matches!(
        kind,
        MarkerKind::BlockDelimiter | MarkerKind::MethodDelimiter | MarkerKind::TypeDelimiter
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use javelin_common::options::LanguageOptions;

    #[test]
    fn second_reattachment_leaves_the_tree_alone() {
        let source = "class A { void m() { this.fo } }";
        let insertion = source.find("fo").map(|i| i as u32 + 2).unwrap();
        let mut state = ParserState::for_completion(source, insertion, LanguageOptions::default());
        state.parse();

        let node = state.completion_node();
        assert!(node.is_some());
        assert!(state.arena.is_reachable(state.root, node));
        let nodes_before = state.arena.len();
        let reachable_before = state.arena.reachable_completion_nodes(state.root);

        // The orphan flag is already cleared, so this is a no-op.
        state.reattach_completion();

        assert_eq!(state.arena.len(), nodes_before);
        assert_eq!(
            state.arena.reachable_completion_nodes(state.root),
            reachable_before
        );
    }
}
