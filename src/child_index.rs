//! Per-node map from a first symbol to the outgoing edge.
//!
//! Most nodes have a handful of children, so lookups scan a small array. Once
//! a node grows past `BSEARCH_THRESHOLD` children the array is kept sorted and
//! lookups switch to binary search.

use std::mem;

use crate::edge::Edge;

/// Degree above which the symbol array is kept sorted.
pub(crate) const BSEARCH_THRESHOLD: usize = 6;

/// Outgoing edges of a node, keyed by the first symbol of their label.
///
/// `symbols[i]` is the key of `edges[i]`.
#[derive(Debug, Clone)]
pub(crate) struct ChildIndex<T> {
    symbols: Vec<T>,
    edges: Vec<Edge<T>>,
}

impl<T> ChildIndex<T> {
    pub fn new() -> Self {
        ChildIndex {
            symbols: Vec::new(),
            edges: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// All edges of the node, in no particular order.
    pub fn values(&self) -> impl Iterator<Item = &Edge<T>> {
        self.edges.iter()
    }

    /// `(symbol, edge)` pairs, in no particular order.
    #[cfg(test)]
    pub fn iter(&self) -> impl Iterator<Item = (&T, &Edge<T>)> {
        self.symbols.iter().zip(self.edges.iter())
    }

    fn is_sorted(&self) -> bool {
        self.len() > BSEARCH_THRESHOLD
    }
}

impl<T: Ord> ChildIndex<T> {
    pub fn get(&self, symbol: &T) -> Option<&Edge<T>> {
        self.position(symbol).map(|idx| &self.edges[idx])
    }

    /// Maps `symbol` to `edge`, returning the edge it replaced, if any.
    pub fn put(&mut self, symbol: T, edge: Edge<T>) -> Option<Edge<T>> {
        if let Some(idx) = self.position(&symbol) {
            return Some(mem::replace(&mut self.edges[idx], edge));
        }

        if self.is_sorted() {
            let idx = self.symbols.binary_search(&symbol).unwrap_or_else(|idx| idx);
            self.symbols.insert(idx, symbol);
            self.edges.insert(idx, edge);
        } else {
            self.symbols.push(symbol);
            self.edges.push(edge);
            if self.is_sorted() {
                // Threshold just crossed.
                self.sort_arrays();
            }
        }

        None
    }

    fn position(&self, symbol: &T) -> Option<usize> {
        if self.is_sorted() {
            self.symbols.binary_search(symbol).ok()
        } else {
            self.symbols.iter().position(|s| s == symbol)
        }
    }

    /// Insertion sort over both arrays, keyed by `symbols`.
    fn sort_arrays(&mut self) {
        for i in 1..self.symbols.len() {
            let mut j = i;
            while j > 0 && self.symbols[j - 1] > self.symbols[j] {
                self.symbols.swap(j - 1, j);
                self.edges.swap(j - 1, j);
                j -= 1;
            }
        }
    }
}

impl<T> Default for ChildIndex<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeId;

    fn edge(label: &str, dest: usize) -> Edge<char> {
        Edge::new(label.chars().collect(), NodeId::new(dest))
    }

    #[test]
    fn test_put_and_get() {
        let mut bag = ChildIndex::new();
        bag.put('a', edge("asd", 1));
        bag.put('e', edge("errimo", 2));
        bag.put('f', edge("foo", 3));
        bag.put('b', edge("bar", 4));

        assert_eq!(bag.len(), 4);
        assert_eq!(bag.get(&'a'), Some(&edge("asd", 1)));
        assert_eq!(bag.get(&'e'), Some(&edge("errimo", 2)));
        assert_eq!(bag.get(&'f'), Some(&edge("foo", 3)));
        assert_eq!(bag.get(&'b'), Some(&edge("bar", 4)));
        assert!(bag.get(&'z').is_none());
    }

    #[test]
    fn test_put_replaces_without_growing() {
        let mut bag = ChildIndex::new();
        assert!(bag.put('a', edge("abc", 1)).is_none());

        let old = bag.put('a', edge("ab", 2));

        assert_eq!(old, Some(edge("abc", 1)));
        assert_eq!(bag.len(), 1);
        assert_eq!(bag.get(&'a').map(|e| e.dest()), Some(NodeId::new(2)));
    }

    #[test]
    fn test_threshold_crossing_sorts() {
        let mut bag = ChildIndex::new();
        let symbols = ['q', 'd', 'z', 'a', 'm', 'c', 'x', 'b', 'k', 'e'];
        for (i, &c) in symbols.iter().enumerate() {
            bag.put(c, edge(&c.to_string(), i));

            // Every symbol inserted so far must stay reachable, on both sides
            // of the threshold.
            for (j, &seen) in symbols[..=i].iter().enumerate() {
                assert_eq!(bag.get(&seen).map(|e| e.dest()), Some(NodeId::new(j)));
            }
        }

        assert!(bag.len() > BSEARCH_THRESHOLD);
        let keys: Vec<char> = bag.iter().map(|(c, _)| *c).collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
        for (c, e) in bag.iter() {
            assert_eq!(e.first(), c);
        }
    }

    #[test]
    fn test_replace_after_threshold() {
        let mut bag = ChildIndex::new();
        for (i, c) in ('a'..='j').enumerate() {
            bag.put(c, edge(&c.to_string(), i));
        }

        let old = bag.put('e', edge("eee", 99));

        assert_eq!(old.map(|e| e.dest()), Some(NodeId::new(4)));
        assert_eq!(bag.len(), 10);
        assert_eq!(bag.get(&'e').map(|e| e.label().len()), Some(3));
    }

    #[test]
    fn test_values_empty() {
        let bag: ChildIndex<u8> = ChildIndex::default();
        assert!(bag.is_empty());
        assert_eq!(bag.values().count(), 0);
    }
}
