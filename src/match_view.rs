//! Match view into a suffix tree.
//!
//! This module provides the `MatchView` type, a lightweight handle on the
//! subtree reached by a search word. Every identifier stored in that subtree
//! belongs to a key containing the word.

use std::collections::{BTreeSet, HashSet};
use std::fmt;

use tracing::trace;

use crate::node::NodeId;
use crate::tree::GeneralizedSuffixTree;

/// A borrowed view of the keys that contain a given word.
///
/// # Examples
///
/// ```
/// use suffix_index::GeneralizedSuffixTree;
///
/// let mut tree = GeneralizedSuffixTree::<char>::new();
/// tree.put_str("libertypike", 0).unwrap();
/// tree.put_str("franklintn", 1).unwrap();
/// tree.put_str("carothers", 2).unwrap();
///
/// let word: Vec<char> = "li".chars().collect();
/// let view = tree.view(&word);
///
/// assert!(view.exists());
/// assert!(view.contains(0));
/// assert!(view.contains(1));
/// assert!(!view.contains(2));
/// assert_eq!(view.total_count(), 2);
/// ```
pub struct MatchView<'a, T> {
    /// The tree this view borrows
    tree: &'a GeneralizedSuffixTree<T>,

    /// The node at or right below the end of the word, if the word occurs
    node: Option<NodeId>,
}

/// An iterator over the identifiers of a `MatchView`.
///
/// Performs a depth-first traversal of the matched subtree and yields each
/// identifier once, in no particular order.
pub struct MatchIter<'a, T> {
    tree: &'a GeneralizedSuffixTree<T>,

    /// Nodes still to visit
    stack: Vec<NodeId>,

    /// Identifiers of the node being visited that were not yielded yet
    refs: std::slice::Iter<'a, usize>,

    /// Identifiers already yielded
    seen: HashSet<usize>,
}

impl<'a, T> MatchView<'a, T> {
    pub(crate) fn new(tree: &'a GeneralizedSuffixTree<T>, node: Option<NodeId>) -> Self {
        MatchView { tree, node }
    }

    /// Returns whether any key contains the word.
    pub fn exists(&self) -> bool {
        self.node.is_some()
    }

    /// Returns an iterator over the distinct matching identifiers.
    pub fn iter(&self) -> MatchIter<'a, T> {
        let empty: &'a [usize] = &[];
        MatchIter {
            tree: self.tree,
            stack: self.node.into_iter().collect(),
            refs: empty.iter(),
            seen: HashSet::new(),
        }
    }

    /// Checks if the key with identifier `index` contains the word.
    pub fn contains(&self, index: usize) -> bool {
        match self.node {
            Some(node) if self.tree.node(node).contains(index) => true,
            Some(_) => self.iter().any(|found| found == index),
            None => false,
        }
    }

    /// Collects up to `limit` identifiers, or all of them for `None`.
    ///
    /// Returns `None` if the word does not occur.
    pub fn indices(&self, limit: Option<usize>) -> Option<BTreeSet<usize>> {
        self.node?;
        let found = match limit {
            Some(max) => self.iter().take(max).collect(),
            None => self.iter().collect(),
        };
        Some(found)
    }

    /// Returns the number of distinct matching identifiers.
    ///
    /// Uses the count cached by `compute_count` when it is up to date, and
    /// walks the subtree otherwise.
    pub fn total_count(&self) -> usize {
        let node = match self.node {
            Some(node) => node,
            None => return 0,
        };

        if self.tree.counts_valid() {
            if let Some(count) = self.tree.node(node).result_count() {
                return count;
            }
        }

        trace!(%node, "counting matches without cached totals");
        self.iter().count()
    }
}

impl<T> Clone for MatchView<'_, T> {
    fn clone(&self) -> Self {
        MatchView {
            tree: self.tree,
            node: self.node,
        }
    }
}

impl<T> fmt::Debug for MatchView<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MatchView")
            .field("exists", &self.exists())
            .field("node", &self.node)
            .finish()
    }
}

impl<'a, T> Iterator for MatchIter<'a, T> {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            for &index in self.refs.by_ref() {
                if self.seen.insert(index) {
                    return Some(index);
                }
            }

            let tree: &'a GeneralizedSuffixTree<T> = self.tree;
            let node = tree.node(self.stack.pop()?);
            if !node.is_leaf() {
                self.stack.extend(node.children());
            }
            self.refs = node.refs().iter();
        }
    }
}

impl<'a, T> IntoIterator for &MatchView<'a, T> {
    type Item = usize;
    type IntoIter = MatchIter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn test_missing_word() {
        let mut tree = GeneralizedSuffixTree::<char>::new();
        tree.put_str("cacao", 0).unwrap();

        let view = tree.view(&chars("coca"));
        assert!(!view.exists());
        assert_eq!(view.iter().count(), 0);
        assert_eq!(view.indices(None), None);
        assert_eq!(view.total_count(), 0);
        assert!(!view.contains(0));
    }

    #[test]
    fn test_iter_yields_each_index_once() {
        let mut tree = GeneralizedSuffixTree::<char>::new();
        tree.put_str("aaaa", 0).unwrap();
        tree.put_str("aa", 1).unwrap();
        tree.put_str("baab", 2).unwrap();

        let mut found: Vec<usize> = tree.view(&chars("a")).iter().collect();
        found.sort();
        assert_eq!(found, vec![0, 1, 2]);
    }

    #[test]
    fn test_indices_with_limit() {
        let mut tree = GeneralizedSuffixTree::<char>::new();
        for i in 0..5 {
            tree.put_str("xyz", i).unwrap();
        }

        let view = tree.view(&chars("yz"));
        assert_eq!(view.indices(Some(2)).map(|s| s.len()), Some(2));
        assert_eq!(view.indices(Some(50)).map(|s| s.len()), Some(5));
        assert_eq!(view.indices(None).map(|s| s.len()), Some(5));
    }

    #[test]
    fn test_total_count_uses_cache() {
        let mut tree = GeneralizedSuffixTree::<char>::new();
        tree.put_str("abab", 0).unwrap();
        tree.put_str("bab", 1).unwrap();

        let uncached = tree.view(&chars("ab")).total_count();
        tree.compute_count();
        let cached = tree.view(&chars("ab")).total_count();

        assert_eq!(uncached, 2);
        assert_eq!(cached, 2);
    }

    #[test]
    fn test_into_iterator() {
        let mut tree = GeneralizedSuffixTree::<u8>::new();
        tree.put(b"hello", 3).unwrap();

        let view = tree.view(b"ll");
        let mut seen = Vec::new();
        for index in &view {
            seen.push(index);
        }
        assert_eq!(seen, vec![3]);
    }
}
