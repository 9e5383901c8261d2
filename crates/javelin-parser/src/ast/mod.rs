//! AST node types.
//!
//! Nodes are stored in a [`crate::arena::NodeArena`] and referenced by
//! [`NodeIndex`]. The node representation is a fat enum: one variant per
//! node kind, each carrying a typed data struct with a shared
//! [`NodeBase`] (source range) first.

mod nodes;

pub use nodes::*;

use serde::{Deserialize, Serialize};

pub use javelin_common::span::TextRange;

/// Index of a node in the arena. `NodeIndex::NONE` is the absent node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeIndex(pub u32);

impl NodeIndex {
    pub const NONE: NodeIndex = NodeIndex(u32::MAX);

    #[inline]
    pub fn is_none(self) -> bool {
        self.0 == u32::MAX
    }

    #[inline]
    pub fn is_some(self) -> bool {
        self.0 != u32::MAX
    }
}

impl Default for NodeIndex {
    fn default() -> Self {
        NodeIndex::NONE
    }
}

/// An ordered list of child nodes.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeList {
    pub nodes: Vec<NodeIndex>,
}

impl NodeList {
    pub fn new() -> NodeList {
        NodeList { nodes: Vec::new() }
    }

    pub fn push(&mut self, index: NodeIndex) {
        if index.is_some() {
            self.nodes.push(index);
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl FromIterator<NodeIndex> for NodeList {
    fn from_iter<T: IntoIterator<Item = NodeIndex>>(iter: T) -> Self {
        NodeList {
            nodes: iter.into_iter().filter(|n| n.is_some()).collect(),
        }
    }
}

/// Common fields present in all AST nodes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeBase {
    /// Start position (byte offset).
    pub pos: u32,
    /// End position (byte offset, exclusive).
    pub end: u32,
}

impl NodeBase {
    pub fn new(pos: u32, end: u32) -> NodeBase {
        NodeBase { pos, end }
    }

    pub fn range(&self) -> TextRange {
        TextRange::new(self.pos, self.end.max(self.pos))
    }
}

bitflags::bitflags! {
    /// Declaration modifier flags.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub struct ModifierFlags: u16 {
        const PUBLIC       = 1 << 0;
        const PROTECTED    = 1 << 1;
        const PRIVATE      = 1 << 2;
        const STATIC       = 1 << 3;
        const FINAL        = 1 << 4;
        const ABSTRACT     = 1 << 5;
        const NATIVE       = 1 << 6;
        const SYNCHRONIZED = 1 << 7;
        const TRANSIENT    = 1 << 8;
        const VOLATILE     = 1 << 9;
        const STRICTFP     = 1 << 10;
    }
}

impl ModifierFlags {
    /// Human-readable names of the set flags, in declaration order.
    pub fn names(self) -> Vec<&'static str> {
        const TABLE: &[(ModifierFlags, &str)] = &[
            (ModifierFlags::PUBLIC, "public"),
            (ModifierFlags::PROTECTED, "protected"),
            (ModifierFlags::PRIVATE, "private"),
            (ModifierFlags::STATIC, "static"),
            (ModifierFlags::FINAL, "final"),
            (ModifierFlags::ABSTRACT, "abstract"),
            (ModifierFlags::NATIVE, "native"),
            (ModifierFlags::SYNCHRONIZED, "synchronized"),
            (ModifierFlags::TRANSIENT, "transient"),
            (ModifierFlags::VOLATILE, "volatile"),
            (ModifierFlags::STRICTFP, "strictfp"),
        ];
        TABLE
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_index_none() {
        let index = NodeIndex(0);
        assert!(index.is_some());
        assert!(!index.is_none());

        let none = NodeIndex::NONE;
        assert!(none.is_none());
        assert!(!none.is_some());
        assert_eq!(NodeIndex::default(), NodeIndex::NONE);
    }

    #[test]
    fn node_list_skips_none() {
        let mut list = NodeList::new();
        list.push(NodeIndex(1));
        list.push(NodeIndex::NONE);
        list.push(NodeIndex(2));
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn modifier_names_in_order() {
        let flags = ModifierFlags::STATIC | ModifierFlags::PUBLIC | ModifierFlags::FINAL;
        assert_eq!(flags.names(), vec!["public", "static", "final"]);
    }
}
