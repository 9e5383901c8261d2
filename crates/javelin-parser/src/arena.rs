//! Node arena for AST storage.

use crate::ast::{Node, NodeIndex, NodeList, TextRange};
use javelin_common::limits;
use serde::Serialize;

/// Arena-based storage for AST nodes.
/// Nodes are stored contiguously and referenced by index.
#[derive(Debug, Default, Serialize)]
pub struct NodeArena {
    pub nodes: Vec<Node>,
}

impl NodeArena {
    pub fn new() -> NodeArena {
        NodeArena {
            nodes: Vec::with_capacity(limits::ARENA_PREALLOC),
        }
    }

    /// Add a node to the arena and return its index.
    pub fn add(&mut self, node: Node) -> NodeIndex {
        let index = self.nodes.len() as u32;
        self.nodes.push(node);
        NodeIndex(index)
    }

    /// Get a node by index.
    pub fn get(&self, index: NodeIndex) -> Option<&Node> {
        if index.is_none() {
            None
        } else {
            self.nodes.get(index.0 as usize)
        }
    }

    /// Get a mutable node by index.
    pub fn get_mut(&mut self, index: NodeIndex) -> Option<&mut Node> {
        if index.is_none() {
            None
        } else {
            self.nodes.get_mut(index.0 as usize)
        }
    }

    /// Replace a node at the given index, returning the old node.
    pub fn replace(&mut self, index: NodeIndex, new_node: Node) -> Option<Node> {
        if index.is_none() {
            None
        } else {
            self.nodes
                .get_mut(index.0 as usize)
                .map(|old| std::mem::replace(old, new_node))
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn range(&self, index: NodeIndex) -> Option<TextRange> {
        self.get(index).map(|n| n.base().range())
    }

    pub fn identifier_text(&self, index: NodeIndex) -> Option<&str> {
        match self.get(index)? {
            Node::Identifier(data) => Some(&data.text),
            _ => None,
        }
    }

    /// Direct children of a node, in source order.
    pub fn children(&self, index: NodeIndex) -> Vec<NodeIndex> {
        let node = match self.get(index) {
            Some(n) => n,
            None => return Vec::new(),
        };

        let mut children = Vec::new();
        let add = |children: &mut Vec<NodeIndex>, idx: NodeIndex| {
            if idx.is_some() {
                children.push(idx);
            }
        };
        let add_list = |children: &mut Vec<NodeIndex>, list: &NodeList| {
            children.extend(list.nodes.iter().copied());
        };
        let add_opt_list = |children: &mut Vec<NodeIndex>, list: &Option<NodeList>| {
            if let Some(l) = list {
                children.extend(l.nodes.iter().copied());
            }
        };

        match node {
            Node::Identifier(_)
            | Node::Literal(_)
            | Node::This(_)
            | Node::Super(_)
            | Node::PrimitiveType(_)
            | Node::EmptyStatement(_)
            | Node::ErrorNode(_) => {}
            Node::QualifiedName(d) => {
                add(&mut children, d.qualifier);
                add(&mut children, d.name);
            }
            Node::Binary(d) => {
                add(&mut children, d.left);
                add(&mut children, d.right);
            }
            Node::Instanceof(d) => {
                add(&mut children, d.expression);
                add(&mut children, d.type_ref);
            }
            Node::Unary(d) => add(&mut children, d.operand),
            Node::Assignment(d) => {
                add(&mut children, d.left);
                add(&mut children, d.right);
            }
            Node::Conditional(d) => {
                add(&mut children, d.condition);
                add(&mut children, d.when_true);
                add(&mut children, d.when_false);
            }
            Node::Cast(d) => {
                add(&mut children, d.type_ref);
                add(&mut children, d.expression);
            }
            Node::Parenthesized(d) => add(&mut children, d.expression),
            Node::FieldAccess(d) => {
                add(&mut children, d.receiver);
                add(&mut children, d.name);
            }
            Node::ArrayAccess(d) => {
                add(&mut children, d.array);
                add(&mut children, d.index);
            }
            Node::MethodInvocation(d) => {
                add(&mut children, d.receiver);
                add(&mut children, d.name);
                add_opt_list(&mut children, &d.type_arguments);
                add_list(&mut children, &d.arguments);
            }
            Node::ClassInstanceCreation(d) => {
                add(&mut children, d.qualifier);
                add(&mut children, d.type_ref);
                add_opt_list(&mut children, &d.type_arguments);
                add_list(&mut children, &d.arguments);
                add(&mut children, d.body);
            }
            Node::ArrayCreation(d) => {
                add(&mut children, d.element_type);
                add_list(&mut children, &d.dim_expressions);
                add(&mut children, d.initializer);
            }
            Node::ArrayInitializer(d) => add_list(&mut children, &d.expressions),
            Node::ClassLiteral(d) => add(&mut children, d.type_ref),
            Node::NamedType(d) => {
                add(&mut children, d.name);
                add_opt_list(&mut children, &d.type_arguments);
            }
            Node::Wildcard(d) => add(&mut children, d.bound),
            Node::UnionType(d) => add_list(&mut children, &d.types),
            Node::CompilationUnit(d) => {
                add(&mut children, d.package);
                add_list(&mut children, &d.imports);
                add_list(&mut children, &d.types);
            }
            Node::PackageDeclaration(d) => {
                add_list(&mut children, &d.annotations);
                add(&mut children, d.name);
            }
            Node::ImportDeclaration(d) => add(&mut children, d.name),
            Node::TypeDeclaration(d) => {
                add_list(&mut children, &d.annotations);
                add(&mut children, d.name);
                add_opt_list(&mut children, &d.type_parameters);
                add(&mut children, d.superclass);
                add_list(&mut children, &d.interfaces);
                add_list(&mut children, &d.members);
            }
            Node::FieldDeclaration(d) => {
                add_list(&mut children, &d.annotations);
                add(&mut children, d.type_ref);
                add_list(&mut children, &d.declarators);
            }
            Node::VariableDeclarator(d) => {
                add(&mut children, d.name);
                add(&mut children, d.initializer);
            }
            Node::MethodDeclaration(d) => {
                add_list(&mut children, &d.annotations);
                add_opt_list(&mut children, &d.type_parameters);
                add(&mut children, d.return_type);
                add(&mut children, d.name);
                add_list(&mut children, &d.parameters);
                add_list(&mut children, &d.throws);
                add(&mut children, d.body);
            }
            Node::Parameter(d) => {
                add_list(&mut children, &d.annotations);
                add(&mut children, d.type_ref);
                add(&mut children, d.name);
            }
            Node::TypeParameter(d) => {
                add(&mut children, d.name);
                add_list(&mut children, &d.bounds);
            }
            Node::Initializer(d) => add(&mut children, d.body),
            Node::EnumConstant(d) => {
                add_list(&mut children, &d.annotations);
                add(&mut children, d.name);
                add_list(&mut children, &d.arguments);
                add(&mut children, d.body);
            }
            Node::Annotation(d) => {
                add(&mut children, d.name);
                add_list(&mut children, &d.member_values);
            }
            Node::MemberValuePair(d) => {
                add(&mut children, d.name);
                add(&mut children, d.value);
            }
            Node::Block(d) => add_list(&mut children, &d.statements),
            Node::LocalDeclaration(d) => {
                add_list(&mut children, &d.annotations);
                add(&mut children, d.type_ref);
                add_list(&mut children, &d.declarators);
            }
            Node::ExpressionStatement(d) => add(&mut children, d.expression),
            Node::IfStatement(d) => {
                add(&mut children, d.condition);
                add(&mut children, d.then_statement);
                add(&mut children, d.else_statement);
            }
            Node::WhileStatement(d) => {
                add(&mut children, d.condition);
                add(&mut children, d.body);
            }
            Node::DoStatement(d) => {
                add(&mut children, d.body);
                add(&mut children, d.condition);
            }
            Node::ForStatement(d) => {
                add_list(&mut children, &d.initializers);
                add(&mut children, d.condition);
                add_list(&mut children, &d.updates);
                add(&mut children, d.body);
            }
            Node::ForeachStatement(d) => {
                add(&mut children, d.parameter);
                add(&mut children, d.expression);
                add(&mut children, d.body);
            }
            Node::SwitchStatement(d) => {
                add(&mut children, d.expression);
                add_list(&mut children, &d.statements);
            }
            Node::SwitchCase(d) => add(&mut children, d.expression),
            Node::TryStatement(d) => {
                add(&mut children, d.try_block);
                add_list(&mut children, &d.catch_clauses);
                add(&mut children, d.finally_block);
            }
            Node::CatchClause(d) => {
                add(&mut children, d.parameter);
                add(&mut children, d.block);
            }
            Node::ReturnStatement(d) => add(&mut children, d.expression),
            Node::ThrowStatement(d) => add(&mut children, d.expression),
            Node::BreakStatement(d) => add(&mut children, d.label),
            Node::ContinueStatement(d) => add(&mut children, d.label),
            Node::LabeledStatement(d) => {
                add(&mut children, d.label);
                add(&mut children, d.statement);
            }
            Node::SynchronizedStatement(d) => {
                add(&mut children, d.expression);
                add(&mut children, d.body);
            }
            Node::AssertStatement(d) => {
                add(&mut children, d.condition);
                add(&mut children, d.message);
            }
            Node::Completion(d) => {
                add(&mut children, d.receiver);
                if let Some(args) = &d.arguments {
                    children.extend(args.nodes.iter().copied());
                }
            }
        }

        children
    }

    /// Whether `target` is reachable from `root` through child links.
    pub fn is_reachable(&self, root: NodeIndex, target: NodeIndex) -> bool {
        if root.is_none() || target.is_none() {
            return false;
        }
        let mut work = vec![root];
        while let Some(current) = work.pop() {
            if current == target {
                return true;
            }
            work.extend(self.children(current));
        }
        false
    }

    /// All completion nodes reachable from `root`. The exactly-one
    /// invariant says this has length 1 after a completion parse.
    pub fn reachable_completion_nodes(&self, root: NodeIndex) -> Vec<NodeIndex> {
        let mut found = Vec::new();
        if root.is_none() {
            return found;
        }
        let mut work = vec![root];
        while let Some(current) = work.pop() {
            if self.get(current).is_some_and(|n| n.is_completion()) {
                found.push(current);
            }
            work.extend(self.children(current));
        }
        found
    }

    /// Deepest node satisfying `predicate` whose range contains `offset`,
    /// found by walking down from `root`.
    pub fn deepest_containing(
        &self,
        root: NodeIndex,
        offset: u32,
        predicate: impl Fn(&Node) -> bool,
    ) -> Option<NodeIndex> {
        let mut best: Option<NodeIndex> = None;
        let mut work = vec![root];
        while let Some(current) = work.pop() {
            let Some(node) = self.get(current) else {
                continue;
            };
            let range = node.base().range();
            if range.start <= offset && offset <= range.end {
                if predicate(node) {
                    let better = match best {
                        None => true,
                        Some(prev) => {
                            let prev_range = self
                                .range(prev)
                                .unwrap_or(TextRange::new(0, u32::MAX));
                            range.len() <= prev_range.len()
                        }
                    };
                    if better {
                        best = Some(current);
                    }
                }
                work.extend(self.children(current));
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{IdentifierData, NodeBase, ParenthesizedData};

    #[test]
    fn add_get_replace() {
        let mut arena = NodeArena::new();
        let ident = arena.add(Node::Identifier(IdentifierData {
            base: NodeBase::new(0, 3),
            text: "foo".into(),
        }));
        assert_eq!(arena.identifier_text(ident), Some("foo"));

        let old = arena.replace(
            ident,
            Node::Identifier(IdentifierData {
                base: NodeBase::new(0, 3),
                text: "bar".into(),
            }),
        );
        assert!(old.is_some());
        assert_eq!(arena.identifier_text(ident), Some("bar"));
        assert!(arena.get(NodeIndex::NONE).is_none());
    }

    #[test]
    fn reachability_follows_child_links() {
        let mut arena = NodeArena::new();
        let inner = arena.add(Node::Identifier(IdentifierData {
            base: NodeBase::new(1, 2),
            text: "x".into(),
        }));
        let outer = arena.add(Node::Parenthesized(ParenthesizedData {
            base: NodeBase::new(0, 3),
            expression: inner,
        }));
        let stray = arena.add(Node::Identifier(IdentifierData {
            base: NodeBase::new(5, 6),
            text: "y".into(),
        }));
        assert!(arena.is_reachable(outer, inner));
        assert!(!arena.is_reachable(outer, stray));
    }
}
