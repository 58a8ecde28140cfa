//! Examples of using the suffix index
use suffix_index::{ByteSuffixTree, GeneralizedSuffixTree, StrKeyConverter, StringSuffixTree};

fn main() {
    // Log every insertion and the count pass
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    // Index some place names under increasing identifiers
    let places = ["libertypike", "franklintn", "dightonma", "dightonrock", "lowgapky"];
    let mut tree = StringSuffixTree::new();
    for (i, place) in places.iter().enumerate() {
        tree.put_str(place, i).unwrap();
    }

    // Every place containing the word
    let found = tree.search_str("ton").unwrap();
    assert_eq!(found.into_iter().collect::<Vec<_>>(), vec![2, 3]);
    assert!(tree.search_str("tonk").is_none());

    // Identifiers must not go backwards
    assert!(tree.put_str("bethesda", 1).is_err());

    // Capped search with the total number of matches
    tree.compute_count();
    let word: Vec<char> = "n".chars().collect();
    let info = tree.search_with_count(&word, Some(2));
    assert_eq!(info.results.len(), 2);
    assert_eq!(info.total_results, 3);

    // Or use the explicit converter on a generic tree
    let mut generic = GeneralizedSuffixTree::<char>::new();
    generic
        .put_key::<StrKeyConverter, _>("hello world", 7)
        .unwrap();
    assert!(generic
        .search_key::<StrKeyConverter, _>("o w")
        .unwrap()
        .contains(&7));

    // Byte keys work the same way
    let mut bytes = ByteSuffixTree::new();
    bytes.put(&[0xde, 0xad, 0xbe, 0xef], 0).unwrap();
    assert!(bytes.search(&[0xbe, 0xef]).is_some());

    println!("{} nodes indexing {} keys", tree.node_count(), tree.key_count());
}
