//! Internal node implementation for the suffix tree.
//!
//! This module contains the internal `Node` structure that forms the backbone
//! of the generalized suffix tree. Nodes live in an arena owned by the tree and
//! are addressed by `NodeId`; edges refer to their destination by id, and so do
//! suffix links.

use std::fmt;

use crate::child_index::ChildIndex;
use crate::edge::Edge;

/// Handle of a node inside the tree's arena.
///
/// Holding a `NodeId` does not keep anything alive: the tree owns every node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct NodeId(usize);

impl NodeId {
    pub(crate) const fn new(idx: usize) -> Self {
        NodeId(idx)
    }

    pub(crate) fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// Internal node type for the suffix tree.
///
/// Each node holds its outgoing edges, the identifiers of the keys that end
/// exactly here, an optional suffix link and the cached size of its subtree's
/// identifier set.
#[derive(Debug, Clone)]
pub(crate) struct Node<T> {
    /// Outgoing edges indexed by the first symbol of their label
    pub edges: ChildIndex<T>,

    /// Identifiers terminating at this node, sorted and deduplicated
    data: Vec<usize>,

    /// Node whose path is this node's path minus its first symbol
    pub suffix: Option<NodeId>,

    /// Number of distinct identifiers in this subtree, set by `compute_count`
    result_count: Option<usize>,
}

impl<T> Node<T> {
    /// Creates a node with no edges and no identifiers.
    pub fn new() -> Self {
        Node {
            edges: ChildIndex::new(),
            data: Vec::new(),
            suffix: None,
            result_count: None,
        }
    }

    /// Identifiers stored directly on this node.
    pub fn refs(&self) -> &[usize] {
        &self.data
    }

    pub fn contains(&self, index: usize) -> bool {
        self.data.binary_search(&index).is_ok()
    }

    /// Stores `index` on this node only. Returns `false` if it was already here.
    ///
    /// Identifiers usually arrive in non-decreasing order, so this is an append
    /// in the common case.
    pub fn insert_ref(&mut self, index: usize) -> bool {
        match self.data.last() {
            Some(&last) if last < index => {
                self.data.push(index);
                true
            }
            None => {
                self.data.push(index);
                true
            }
            Some(_) => match self.data.binary_search(&index) {
                Ok(_) => false,
                Err(pos) => {
                    self.data.insert(pos, index);
                    true
                }
            },
        }
    }

    pub fn result_count(&self) -> Option<usize> {
        self.result_count
    }

    pub fn set_result_count(&mut self, count: usize) {
        self.result_count = Some(count);
    }

    pub fn is_leaf(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn children(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.edges.values().map(Edge::dest)
    }
}

impl<T> Default for Node<T> {
    fn default() -> Self {
        Self::new()
    }
}
