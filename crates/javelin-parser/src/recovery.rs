//! Recovered-skeleton bookkeeping.
//!
//! After an error-tolerant parse the tree is a best-effort skeleton:
//! declarations and blocks may be missing braces, bodies, or children.
//! This module provides the insertion primitive used to splice a late
//! node (typically a reattached completion fragment) into that skeleton
//! by source position.

use crate::arena::NodeArena;
use crate::ast::{Node, NodeIndex};
use tracing::debug;

/// Insertion priority for [`add`]. Among children starting at the same
/// offset, higher-priority nodes sort first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum AddPriority {
    Low,
    Normal,
    High,
}

/// Containers a late node can be spliced into.
fn container_child_list(node: &mut Node) -> Option<&mut Vec<NodeIndex>> {
    match node {
        Node::Block(d) => Some(&mut d.statements.nodes),
        Node::TypeDeclaration(d) => Some(&mut d.members.nodes),
        Node::SwitchStatement(d) => Some(&mut d.statements.nodes),
        Node::CompilationUnit(d) => Some(&mut d.types.nodes),
        _ => None,
    }
}

fn is_container(node: &Node) -> bool {
    matches!(
        node,
        Node::Block(_) | Node::TypeDeclaration(_) | Node::SwitchStatement(_) | Node::CompilationUnit(_)
    )
}

/// Deepest container in the tree under `root` whose range contains
/// `offset`. Falls back to `root` itself when nothing narrower matches.
pub fn enclosing_container(arena: &NodeArena, root: NodeIndex, offset: u32) -> NodeIndex {
    arena
        .deepest_containing(root, offset, is_container)
        .unwrap_or(root)
}

/// Insert `node` among `container`'s children, ordered by source start
/// (stable; `priority` breaks ties). The recovered skeleton's ranges are
/// monotone, so a plain ordered insert positions the node among its
/// siblings correctly. No-op if `container` cannot hold children or the
/// node is already present.
pub fn add(arena: &mut NodeArena, container: NodeIndex, node: NodeIndex, priority: AddPriority) {
    let Some(start) = arena.range(node).map(|r| r.start) else {
        return;
    };

    // Collect sibling starts first; the mutable borrow comes after.
    let siblings: Vec<(NodeIndex, u32)> = match arena.get(container) {
        Some(parent) => {
            let list = match parent {
                Node::Block(d) => &d.statements.nodes,
                Node::TypeDeclaration(d) => &d.members.nodes,
                Node::SwitchStatement(d) => &d.statements.nodes,
                Node::CompilationUnit(d) => &d.types.nodes,
                _ => return,
            };
            if list.contains(&node) {
                return;
            }
            list.iter()
                .map(|&child| {
                    let start = arena.range(child).map(|r| r.start).unwrap_or(u32::MAX);
                    (child, start)
                })
                .collect()
        }
        None => return,
    };

    let mut insert_at = siblings.len();
    for (position, &(_, sibling_start)) in siblings.iter().enumerate() {
        if sibling_start > start || (sibling_start == start && priority == AddPriority::High) {
            insert_at = position;
            break;
        }
    }

    debug!(?container, ?node, insert_at, "skeleton add");
    if let Some(parent) = arena.get_mut(container) {
        if let Some(list) = container_child_list(parent) {
            list.insert(insert_at, node);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{BlockData, EmptyStatementData, NodeBase, NodeList};

    fn empty_statement(arena: &mut NodeArena, pos: u32, end: u32) -> NodeIndex {
        arena.add(Node::EmptyStatement(EmptyStatementData {
            base: NodeBase::new(pos, end),
        }))
    }

    #[test]
    fn add_orders_by_source_position() {
        let mut arena = NodeArena::new();
        let first = empty_statement(&mut arena, 2, 3);
        let last = empty_statement(&mut arena, 10, 11);
        let block = arena.add(Node::Block(BlockData {
            base: NodeBase::new(0, 20),
            statements: NodeList {
                nodes: vec![first, last],
            },
        }));

        let middle = empty_statement(&mut arena, 5, 6);
        add(&mut arena, block, middle, AddPriority::Normal);

        match arena.get(block) {
            Some(Node::Block(d)) => {
                assert_eq!(d.statements.nodes, vec![first, middle, last]);
            }
            _ => panic!("expected block"),
        }
    }

    #[test]
    fn add_is_idempotent() {
        let mut arena = NodeArena::new();
        let block = arena.add(Node::Block(BlockData {
            base: NodeBase::new(0, 20),
            statements: NodeList::new(),
        }));
        let statement = empty_statement(&mut arena, 5, 6);
        add(&mut arena, block, statement, AddPriority::Normal);
        add(&mut arena, block, statement, AddPriority::Normal);
        match arena.get(block) {
            Some(Node::Block(d)) => assert_eq!(d.statements.len(), 1),
            _ => panic!("expected block"),
        }
    }

    #[test]
    fn add_into_non_container_is_noop() {
        let mut arena = NodeArena::new();
        let statement = empty_statement(&mut arena, 0, 1);
        let other = empty_statement(&mut arena, 2, 3);
        add(&mut arena, statement, other, AddPriority::Normal);
        assert_eq!(arena.len(), 2);
    }
}
