//! Property tests against a brute-force substring index.

use std::collections::BTreeSet;

use quickcheck::{quickcheck, Arbitrary, Gen};

use crate::GeneralizedSuffixTree;

const MAX_KEYS: usize = 8;
const MAX_KEY_LEN: usize = 12;

/// A small alphabet makes shared substrings, splits and repeated keys likely.
const ALPHABET: &[u8] = b"abc";

#[derive(Clone, Debug)]
struct Keys(Vec<Vec<u8>>);

fn arbitrary_word(g: &mut Gen, max_len: usize) -> Vec<u8> {
    let len = usize::arbitrary(g) % max_len;
    (0..len).map(|_| *g.choose(ALPHABET).unwrap()).collect()
}

impl Arbitrary for Keys {
    fn arbitrary(g: &mut Gen) -> Keys {
        let count = 1 + usize::arbitrary(g) % MAX_KEYS;
        Keys((0..count).map(|_| arbitrary_word(g, MAX_KEY_LEN)).collect())
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Keys>> {
        Box::new(self.0.shrink().filter(|keys| !keys.is_empty()).map(Keys))
    }
}

impl Keys {
    fn build(&self) -> GeneralizedSuffixTree<u8> {
        let mut tree = GeneralizedSuffixTree::<u8>::new();
        for (i, key) in self.0.iter().enumerate() {
            tree.put(key, i).unwrap();
        }
        tree
    }

    /// Identifiers of the keys containing `word`, found by scanning.
    fn oracle(&self, word: &[u8]) -> Option<BTreeSet<usize>> {
        let found: BTreeSet<usize> = self
            .0
            .iter()
            .enumerate()
            .filter(|(_, key)| key.windows(word.len()).any(|w| w == word))
            .map(|(i, _)| i)
            .collect();
        if found.is_empty() {
            None
        } else {
            Some(found)
        }
    }

    /// Every distinct non-empty substring of every key.
    fn substrings(&self) -> BTreeSet<Vec<u8>> {
        let mut words = BTreeSet::new();
        for key in &self.0 {
            for start in 0..key.len() {
                for end in start + 1..=key.len() {
                    words.insert(key[start..end].to_vec());
                }
            }
        }
        words
    }
}

quickcheck! {
    fn every_substring_finds_its_key(keys: Keys) -> bool {
        let tree = keys.build();
        keys.0.iter().enumerate().all(|(i, key)| {
            (0..key.len()).all(|start| {
                (start + 1..=key.len()).all(|end| {
                    tree.search(&key[start..end]).map_or(false, |found| found.contains(&i))
                })
            })
        })
    }

    fn search_matches_oracle(keys: Keys) -> bool {
        let tree = keys.build();
        keys.substrings().iter().all(|word| tree.search(word) == keys.oracle(word))
    }

    fn absent_words_are_not_found(keys: Keys, probe: Vec<u8>) -> bool {
        // Symbols outside the alphabet never occur in a key.
        let mut word: Vec<u8> = probe.into_iter().map(|b| b % 4 + b'a').collect();
        word.push(b'z');
        let tree = keys.build();
        tree.search(&word).is_none() && keys.oracle(&word).is_none()
    }

    fn random_words_match_oracle(keys: Keys, probe: Vec<u8>) -> bool {
        let word: Vec<u8> = probe.into_iter().take(6).map(|b| ALPHABET[b as usize % 3]).collect();
        if word.is_empty() {
            return true;
        }
        keys.build().search(&word) == keys.oracle(&word)
    }

    fn structure_is_well_formed(keys: Keys) -> bool {
        keys.build().assert_invariants();
        true
    }

    fn counts_match_traversal(keys: Keys) -> bool {
        let mut tree = keys.build();
        let total = tree.compute_count();
        tree.assert_counts_consistent();

        let non_empty = keys.0.iter().filter(|key| !key.is_empty()).count();
        total >= non_empty && keys.substrings().iter().all(|word| {
            let info = tree.search_with_count(word, Some(1));
            info.results.len() == 1 && Some(info.total_results) == keys.oracle(word).map(|s| s.len())
        })
    }

    fn limit_caps_results(keys: Keys, limit: usize) -> bool {
        let tree = keys.build();
        let limit = limit % 4;
        keys.substrings().iter().all(|word| {
            let full = tree.search(word).unwrap_or_default();
            let capped = tree.search_with_limit(word, limit).unwrap_or_default();
            capped.len() == full.len().min(limit) && capped.is_subset(&full)
        })
    }
}
