//! # Suffix Index
//!
//! A generalized suffix tree for substring search over many keys.
//!
//! Each key is inserted together with a numeric identifier. Afterwards, a
//! search for any word returns the identifiers of every key that contains the
//! word as a contiguous substring. The tree is built online with Ukkonen's
//! algorithm, extended so that new keys can be added at any time.
//!
//! ## Features
//!
//! - **Online construction**: Keys are added one at a time, in time linear in their length
//! - **Any symbol type**: Keys are slices of any `Ord + Clone` type, with helpers for `str` and bytes
//! - **Capped searches**: Return only the first few matches, optionally with the total count
//! - **Match views**: Inspect the matches for a word lazily through a borrowed view
//!
//! ## Example
//!
//! ```rust
//! use suffix_index::StringSuffixTree;
//!
//! let mut tree = StringSuffixTree::new();
//!
//! // Identifiers must not decrease from one insertion to the next
//! tree.put_str("cacao", 0).unwrap();
//! tree.put_str("chocolate", 1).unwrap();
//!
//! // Every key containing the word is found
//! let found = tree.search_str("o").unwrap();
//! assert!(found.contains(&0));
//! assert!(found.contains(&1));
//!
//! // A word no key contains is not found at all
//! assert!(tree.search_str("cocoa").is_none());
//! ```

mod child_index;
mod edge;
mod key_converter;
mod match_view;
mod node;
mod tree;
mod util;

#[cfg(test)]
mod qc_test;

// Re-export public types
pub use crate::key_converter::{BytesKeyConverter, KeyToSymbols, StrKeyConverter};
pub use crate::match_view::{MatchIter, MatchView};
pub use crate::tree::{GeneralizedSuffixTree, ResultInfo};

/// A suffix tree over `char` symbols, for text keys.
pub type StringSuffixTree = GeneralizedSuffixTree<char>;

/// A suffix tree over raw bytes.
pub type ByteSuffixTree = GeneralizedSuffixTree<u8>;

/// Errors that can occur in suffix tree operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The identifier is smaller than one inserted earlier
    #[error("index {index} is lower than the last inserted index {last}")]
    OutOfOrderIndex {
        /// The rejected identifier
        index: usize,
        /// The highest identifier accepted so far
        last: usize,
    },
}

/// Result type for suffix tree operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::OutOfOrderIndex { index: 1, last: 7 };
        assert_eq!(
            err.to_string(),
            "index 1 is lower than the last inserted index 7"
        );
    }

    #[test]
    fn test_aliases() {
        let mut text = StringSuffixTree::new();
        text.put_str("naïve", 0).unwrap();
        assert!(text.search_str("ïv").is_some());

        let mut bytes = ByteSuffixTree::new();
        bytes.put_bytes(b"\x00\xff\x00", 0).unwrap();
        assert!(bytes.search_bytes(&[0xffu8, 0x00]).is_some());
    }
}
