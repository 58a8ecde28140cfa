//! Labeled edges between tree nodes.

use crate::node::NodeId;

/// An edge from a parent node to `dest`.
///
/// The parent is implicit: it is the node whose child index holds the edge.
/// Every non-root node is the destination of exactly one edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Edge<T> {
    label: Vec<T>,
    dest: NodeId,
}

impl<T> Edge<T> {
    pub fn new(label: Vec<T>, dest: NodeId) -> Self {
        debug_assert!(!label.is_empty(), "edge labels are never empty");
        Edge { label, dest }
    }

    pub fn label(&self) -> &[T] {
        &self.label
    }

    pub fn dest(&self) -> NodeId {
        self.dest
    }

    /// The symbol the parent indexes this edge under.
    pub fn first(&self) -> &T {
        &self.label[0]
    }

    /// Drops the first `len` symbols of the label, keeping the destination.
    ///
    /// Used when a split hangs this edge below a new node.
    pub fn strip_prefix(&mut self, len: usize) {
        debug_assert!(len < self.label.len(), "split must leave a non-empty label");
        self.label.drain(..len);
    }
}
