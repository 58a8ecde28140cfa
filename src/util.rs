/// Finds the length of the common prefix between a word and an edge label.
///
/// Returns the number of symbols that match starting from the given offset
/// into `word`.
pub fn prefix_match<T: PartialEq>(word: &[T], start_idx: usize, label: &[T]) -> usize {
    let mut i = 0;

    while i < label.len() && start_idx + i < word.len() && word[start_idx + i] == label[i] {
        i += 1;
    }

    i
}

/// How a string relates to an edge label that starts with the same symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Overlap {
    /// Both sequences are identical.
    Equal,
    /// The string runs past the end of the label.
    ExtendsLabel,
    /// The label runs past the end of the string.
    ExtendedByLabel,
    /// They share a prefix, then disagree.
    Diverges,
}

pub(crate) fn overlap<T: PartialEq>(s: &[T], label: &[T]) -> Overlap {
    let common = prefix_match(s, 0, label);
    match (common == s.len(), common == label.len()) {
        (true, true) => Overlap::Equal,
        (false, true) => Overlap::ExtendsLabel,
        (true, false) => Overlap::ExtendedByLabel,
        (false, false) => Overlap::Diverges,
    }
}
