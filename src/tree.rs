//! The suffix tree engine.
//!
//! This module contains the `GeneralizedSuffixTree` type, which builds the
//! index online with Ukkonen's algorithm and answers substring queries.
//!
//! Unlike a textbook suffix tree, leaves are labeled with the whole remainder
//! of the key they were created for, so a leaf never needs to be extended by
//! later symbols, and the same tree can keep accepting new keys.

use std::collections::{BTreeSet, HashSet};

use tracing::{debug, trace, warn};

use crate::edge::Edge;
use crate::key_converter::{BytesKeyConverter, KeyToSymbols, StrKeyConverter};
use crate::match_view::MatchView;
use crate::node::{Node, NodeId};
use crate::util::{overlap, prefix_match, Overlap};
use crate::{Error, Result};

/// The root always sits in the first arena slot.
pub(crate) const ROOT: NodeId = NodeId::new(0);

/// A capped set of matches together with the total number of matches.
///
/// Returned by [`GeneralizedSuffixTree::search_with_count`]. A word that is not
/// in the index yields an empty set and a total of 0.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultInfo {
    /// Some (or all) of the matching identifiers
    pub results: BTreeSet<usize>,

    /// The number of distinct matching identifiers in the index
    pub total_results: usize,
}

/// A generalized suffix tree over keys made of symbols of type `T`.
///
/// After `put(key, i)`, `search(word)` returns a set containing `i` for every
/// `word` that is a substring of `key`. A search costs time proportional to
/// the length of the word, plus the size of the returned set.
///
/// # Examples
///
/// ```
/// use suffix_index::GeneralizedSuffixTree;
///
/// let mut tree = GeneralizedSuffixTree::<u8>::new();
/// tree.put(b"banana", 0).unwrap();
/// tree.put(b"bano", 1).unwrap();
///
/// let found = tree.search(b"ban").unwrap();
/// assert!(found.contains(&0) && found.contains(&1));
/// assert_eq!(tree.search(b"nana").unwrap().into_iter().collect::<Vec<_>>(), vec![0]);
/// assert!(tree.search(b"nab").is_none());
/// ```
#[derive(Debug, Clone)]
pub struct GeneralizedSuffixTree<T> {
    /// Node arena; edges and suffix links hold indices into it
    nodes: Vec<Node<T>>,

    /// Highest identifier accepted so far
    last: usize,

    /// Number of successful insertions
    keys: usize,

    /// Last leaf created by the running insertion, waiting for its suffix link
    active_leaf: NodeId,

    /// Whether every cached count reflects the current tree
    counts_valid: bool,
}

impl<T> GeneralizedSuffixTree<T> {
    /// Creates a new, empty tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use suffix_index::GeneralizedSuffixTree;
    ///
    /// let tree = GeneralizedSuffixTree::<char>::new();
    /// assert!(tree.is_empty());
    /// ```
    pub fn new() -> Self {
        GeneralizedSuffixTree {
            nodes: vec![Node::new()],
            last: 0,
            keys: 0,
            active_leaf: ROOT,
            counts_valid: false,
        }
    }

    /// The highest identifier accepted so far (0 for an empty tree).
    pub fn last_index(&self) -> usize {
        self.last
    }

    /// Number of keys inserted so far. Re-insertions count again.
    pub fn key_count(&self) -> usize {
        self.keys
    }

    /// Returns `true` if no key has been inserted.
    pub fn is_empty(&self) -> bool {
        self.keys == 0
    }

    /// Number of explicit nodes, root included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn node(&self, id: NodeId) -> &Node<T> {
        &self.nodes[id.index()]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node<T> {
        &mut self.nodes[id.index()]
    }

    fn new_node(&mut self) -> NodeId {
        self.nodes.push(Node::new());
        NodeId::new(self.nodes.len() - 1)
    }

    pub(crate) fn counts_valid(&self) -> bool {
        self.counts_valid
    }

    /// Node ids in depth-first pre-order, starting at the root.
    fn preorder(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![ROOT];
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.node(id).children());
        }
        order
    }

    /// Recomputes the cached result count of every node.
    ///
    /// Returns the number of distinct identifiers in the whole tree. The
    /// totals reported by [`search_with_count`](Self::search_with_count) come
    /// from this cache, so call it again after further insertions.
    pub fn compute_count(&mut self) -> usize {
        let order = self.preorder();
        let mut sets: Vec<Option<HashSet<usize>>> = vec![None; self.nodes.len()];

        // Reverse pre-order visits every child before its parent.
        for &id in order.iter().rev() {
            let node = self.node(id);
            let mut set = HashSet::new();
            for child in node.children() {
                if let Some(child_set) = sets[child.index()].take() {
                    if child_set.len() > set.len() {
                        let smaller = std::mem::replace(&mut set, child_set);
                        set.extend(smaller);
                    } else {
                        set.extend(child_set);
                    }
                }
            }
            set.extend(node.refs().iter().copied());

            self.node_mut(id).set_result_count(set.len());
            sets[id.index()] = Some(set);
        }

        self.counts_valid = true;
        let total = self.node(ROOT).result_count().unwrap_or(0);
        debug!(nodes = self.nodes.len(), total, "computed result counts");
        total
    }
}

impl<T: Ord + Clone> GeneralizedSuffixTree<T> {
    /// Adds `index` to the tree under `key`.
    ///
    /// Identifiers must arrive in non-decreasing order. A smaller identifier
    /// is rejected with [`Error::OutOfOrderIndex`] and the tree is not touched.
    ///
    /// # Examples
    ///
    /// ```
    /// use suffix_index::{Error, GeneralizedSuffixTree};
    ///
    /// let mut tree = GeneralizedSuffixTree::<u8>::new();
    /// tree.put(b"cacao", 3).unwrap();
    ///
    /// assert_eq!(
    ///     tree.put(b"cocoa", 2),
    ///     Err(Error::OutOfOrderIndex { index: 2, last: 3 })
    /// );
    /// assert!(tree.search(b"coc").is_none());
    /// ```
    pub fn put(&mut self, key: &[T], index: usize) -> Result<()> {
        if index < self.last {
            warn!(index, last = self.last, "out-of-order index rejected");
            return Err(Error::OutOfOrderIndex {
                index,
                last: self.last,
            });
        }
        self.last = index;
        self.keys += 1;
        self.counts_valid = false;
        self.active_leaf = ROOT;

        // Active point: node `s` plus the pending window `key[k..i]`.
        let mut s = ROOT;
        let mut k = 0;
        for i in 0..key.len() {
            let (node, start) = self.update(s, key, k, i, index);
            let (node, start) = self.canonize(node, key, start, i + 1);
            s = node;
            k = start;
        }

        let leaf = self.active_leaf;
        if leaf != ROOT && leaf != s && self.node(leaf).suffix.is_none() {
            self.node_mut(leaf).suffix = Some(s);
        }

        debug!(index, len = key.len(), nodes = self.nodes.len(), "inserted key");
        Ok(())
    }

    /// Extends the tree with `key[i]` for every suffix of `key[k..=i]` that
    /// is not represented yet, starting from the active node.
    ///
    /// Returns the new active point as `(node, window start)`; the window ends
    /// after `key[i]`.
    fn update(
        &mut self,
        node: NodeId,
        key: &[T],
        start: usize,
        i: usize,
        index: usize,
    ) -> (NodeId, usize) {
        let symbol = &key[i];
        let rest = &key[i..];
        let mut s = node;
        let mut k = start;
        let mut old_root = ROOT;

        let (mut endpoint, mut r) = self.test_and_split(s, key, k, i, index);
        while !endpoint {
            // A node reached through an earlier key may already branch on
            // `symbol`; its child then stands in for the new leaf.
            let existing = self.node(r).edges.get(symbol).map(Edge::dest);
            let leaf = match existing {
                Some(dest) => dest,
                None => {
                    let leaf = self.new_node();
                    self.node_mut(leaf).insert_ref(index);
                    self.node_mut(r)
                        .edges
                        .put(symbol.clone(), Edge::new(rest.to_vec(), leaf));
                    trace!(parent = %r, %leaf, "created leaf");
                    leaf
                }
            };

            let previous = self.active_leaf;
            if previous != ROOT {
                self.node_mut(previous).suffix = Some(leaf);
            }
            self.active_leaf = leaf;

            if old_root != ROOT {
                self.node_mut(old_root).suffix = Some(r);
            }
            old_root = r;

            match self.node(s).suffix {
                Some(link) => {
                    let (next, next_start) = self.canonize(link, key, k, i);
                    s = next;
                    k = next_start;
                }
                None => {
                    // Stepping from the root drops the first pending symbol.
                    debug_assert_eq!(s, ROOT, "only the root lacks a suffix link here");
                    k += 1;
                }
            }

            let (found, next_r) = self.test_and_split(s, key, k, i, index);
            endpoint = found;
            r = next_r;
        }

        if old_root != ROOT {
            self.node_mut(old_root).suffix = Some(r);
        }

        (s, k)
    }

    /// Tests whether `key[k..i]` followed by `key[i]` is already spelled out
    /// below `node`, splitting an edge when the position has to become
    /// explicit.
    ///
    /// Returns `(true, _)` when the extension is already present. Otherwise
    /// returns `(false, r)` where `r` is the node the caller hangs the new
    /// leaf from.
    fn test_and_split(
        &mut self,
        node: NodeId,
        key: &[T],
        start: usize,
        i: usize,
        index: usize,
    ) -> (bool, NodeId) {
        let symbol = &key[i];
        let remainder = &key[i..];
        let (s, k) = self.canonize(node, key, start, i);

        if k < i {
            // The position lies strictly inside an edge.
            let pending = &key[k..i];
            let edge = self
                .node(s)
                .edges
                .get(&pending[0])
                .expect("canonical pending string must start an edge");
            if edge.label()[pending.len()] == *symbol {
                return (true, s);
            }

            let r = self.new_node();
            let mut old = self
                .node_mut(s)
                .edges
                .put(pending[0].clone(), Edge::new(pending.to_vec(), r))
                .expect("edge being split must exist");
            old.strip_prefix(pending.len());
            let first = old.first().clone();
            self.node_mut(r).edges.put(first, old);
            trace!(parent = %s, split = %r, depth = pending.len(), "split edge");

            return (false, r);
        }

        let (dest, relation) = match self.node(s).edges.get(symbol) {
            None => return (false, s),
            Some(edge) => (edge.dest(), overlap(remainder, edge.label())),
        };

        match relation {
            Overlap::Equal => {
                self.add_ref(dest, index);
                (true, s)
            }
            // A divergence further down is split once the active point
            // reaches it.
            Overlap::ExtendsLabel | Overlap::Diverges => (true, s),
            Overlap::ExtendedByLabel => {
                // The key ends inside the edge: make that point explicit.
                let split = self.new_node();
                self.node_mut(split).insert_ref(index);
                let mut old = self
                    .node_mut(s)
                    .edges
                    .put(symbol.clone(), Edge::new(remainder.to_vec(), split))
                    .expect("edge being split must exist");
                old.strip_prefix(remainder.len());
                let first = old.first().clone();
                self.node_mut(split).edges.put(first, old);
                trace!(parent = %s, %split, depth = remainder.len(), "split edge at key end");

                (false, s)
            }
        }
    }

    /// Descends from `node` along `key[start..end]` as far as whole edges
    /// allow.
    ///
    /// Returns the furthest node reached and the start of the unmatched
    /// remainder. The path is known to exist, so only lengths are compared.
    fn canonize(&self, node: NodeId, key: &[T], start: usize, end: usize) -> (NodeId, usize) {
        let mut node = node;
        let mut k = start;
        while k < end {
            let edge = match self.node(node).edges.get(&key[k]) {
                Some(edge) => edge,
                None => break,
            };
            let len = edge.label().len();
            if len > end - k {
                break;
            }
            debug_assert_eq!(prefix_match(key, k, edge.label()), len);
            k += len;
            node = edge.dest();
        }
        (node, k)
    }

    /// Stores `index` on `node` and on every node of its suffix-link chain,
    /// stopping at the first node that already has it.
    fn add_ref(&mut self, node: NodeId, index: usize) {
        let mut current = Some(node);
        while let Some(id) = current {
            let node = self.node_mut(id);
            if !node.insert_ref(index) {
                break;
            }
            current = node.suffix;
        }
    }

    /// Returns the node at or right below the end of the path spelled by `word`.
    fn search_node(&self, word: &[T]) -> Option<NodeId> {
        let mut node = ROOT;
        let mut i = 0;

        while i < word.len() {
            let edge = self.node(node).edges.get(&word[i])?;
            let label = edge.label();
            let len_to_match = (word.len() - i).min(label.len());
            if prefix_match(word, i, label) < len_to_match {
                return None;
            }

            if label.len() >= word.len() - i {
                return Some(edge.dest());
            }
            node = edge.dest();
            i += len_to_match;
        }

        None
    }

    /// Creates a view of the keys containing `word`.
    ///
    /// The view exists only if some key contains `word`. The empty word does
    /// not match anything.
    pub fn view(&self, word: &[T]) -> MatchView<'_, T> {
        MatchView::new(self, self.search_node(word))
    }

    /// Returns the identifiers of all keys containing `word`, or `None` if
    /// there are none.
    pub fn search(&self, word: &[T]) -> Option<BTreeSet<usize>> {
        self.view(word).indices(None)
    }

    /// Like [`search`](Self::search), but returns at most `max_results`
    /// identifiers. Which ones are returned is unspecified.
    pub fn search_with_limit(&self, word: &[T], max_results: usize) -> Option<BTreeSet<usize>> {
        self.view(word).indices(Some(max_results))
    }

    /// Returns up to `limit` identifiers of the keys containing `word`
    /// (all of them for `None`) along with their total number.
    ///
    /// The total is read from the counts cached by
    /// [`compute_count`](Self::compute_count). If keys were inserted since, the
    /// total is recomputed for the matched subtree.
    ///
    /// # Examples
    ///
    /// ```
    /// use suffix_index::GeneralizedSuffixTree;
    ///
    /// let mut tree = GeneralizedSuffixTree::<u8>::new();
    /// for (i, key) in ["cacao", "cocoa", "tacos"].iter().enumerate() {
    ///     tree.put(key.as_bytes(), i).unwrap();
    /// }
    /// tree.compute_count();
    ///
    /// let info = tree.search_with_count(b"co", Some(1));
    /// assert_eq!(info.results.len(), 1);
    /// assert_eq!(info.total_results, 2);
    ///
    /// let missing = tree.search_with_count(b"xyz", None);
    /// assert!(missing.results.is_empty());
    /// assert_eq!(missing.total_results, 0);
    /// ```
    pub fn search_with_count(&self, word: &[T], limit: Option<usize>) -> ResultInfo {
        let view = self.view(word);
        match view.indices(limit) {
            Some(results) => ResultInfo {
                results,
                total_results: view.total_count(),
            },
            None => ResultInfo::default(),
        }
    }

    /// Inserts a key after converting it to symbols with the converter `C`.
    pub fn put_key<C, K>(&mut self, key: &K, index: usize) -> Result<()>
    where
        C: KeyToSymbols<K, T>,
        K: ?Sized,
    {
        let symbols = C::convert(key);
        self.put(&symbols, index)
    }

    /// Searches for a word after converting it to symbols with the converter `C`.
    pub fn search_key<C, K>(&self, word: &K) -> Option<BTreeSet<usize>>
    where
        C: KeyToSymbols<K, T>,
        K: ?Sized,
    {
        let symbols = C::convert(word);
        self.search(&symbols)
    }
}

impl GeneralizedSuffixTree<char> {
    /// Inserts a string key, one `char` per symbol.
    pub fn put_str<K: AsRef<str> + ?Sized>(&mut self, key: &K, index: usize) -> Result<()> {
        self.put_key::<StrKeyConverter, K>(key, index)
    }

    /// Searches for a string, one `char` per symbol.
    pub fn search_str<K: AsRef<str> + ?Sized>(&self, word: &K) -> Option<BTreeSet<usize>> {
        self.search_key::<StrKeyConverter, K>(word)
    }
}

impl GeneralizedSuffixTree<u8> {
    /// Inserts a key given as raw bytes.
    pub fn put_bytes<K: AsRef<[u8]> + ?Sized>(&mut self, key: &K, index: usize) -> Result<()> {
        self.put_key::<BytesKeyConverter, K>(key, index)
    }

    /// Searches for a word given as raw bytes.
    pub fn search_bytes<K: AsRef<[u8]> + ?Sized>(&self, word: &K) -> Option<BTreeSet<usize>> {
        self.search_key::<BytesKeyConverter, K>(word)
    }
}

impl<T> Default for GeneralizedSuffixTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
impl<T: Ord + Clone + std::fmt::Debug> GeneralizedSuffixTree<T> {
    /// Panics unless the child indexes are prefix free, every non-root node
    /// has exactly one incoming edge and every suffix link is in bounds.
    pub(crate) fn assert_invariants(&self) {
        let mut incoming = vec![0usize; self.nodes.len()];
        for (idx, node) in self.nodes.iter().enumerate() {
            let mut firsts = BTreeSet::new();
            for (symbol, edge) in node.edges.iter() {
                assert!(!edge.label().is_empty(), "empty label below n{}", idx);
                assert_eq!(edge.first(), symbol, "edge filed under the wrong symbol");
                assert!(firsts.insert(symbol), "two edges of n{} start with {:?}", idx, symbol);
                incoming[edge.dest().index()] += 1;
            }
            if let Some(link) = node.suffix {
                assert!(link.index() < self.nodes.len(), "dangling suffix link");
            }
        }

        assert_eq!(incoming[ROOT.index()], 0, "root has a parent");
        for (idx, count) in incoming.iter().enumerate().skip(1) {
            assert_eq!(*count, 1, "n{} has {} parents", idx, count);
        }
    }

    /// Panics unless every cached count equals a fresh traversal of its subtree.
    pub(crate) fn assert_counts_consistent(&self) {
        assert!(self.counts_valid, "compute_count() has not run since the last put");
        for id in self.preorder() {
            let fresh = MatchView::new(self, Some(id)).iter().count();
            assert_eq!(self.node(id).result_count(), Some(fresh), "stale count on {}", id);
        }
    }
}
