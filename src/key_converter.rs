//! Defines traits and structs for converting keys into symbol sequences.
use std::borrow::Cow;

/// A trait for types that can convert a key of type `K` into a slice of `T`
/// symbols, the unit the suffix tree indexes.
pub trait KeyToSymbols<K: ?Sized, T: Clone> {
    /// Converts the given key into a `Cow<[T]>`.
    /// Keys that already are symbol slices are borrowed; anything that needs
    /// decoding produces an owned `Vec<T>`.
    fn convert<'a>(key: &'a K) -> Cow<'a, [T]>;
}

/// A key converter for keys that implement `AsRef<str>`, yielding one `char`
/// per symbol.
/// Examples: `String`, `&str`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StrKeyConverter;

impl<K: AsRef<str> + ?Sized> KeyToSymbols<K, char> for StrKeyConverter {
    fn convert<'a>(key: &'a K) -> Cow<'a, [char]> {
        Cow::Owned(key.as_ref().chars().collect())
    }
}

/// A key converter for keys that implement `AsRef<[u8]>`, yielding one byte
/// per symbol.
/// Examples: `Vec<u8>`, `&[u8]`, `String`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BytesKeyConverter;

impl<K: AsRef<[u8]> + ?Sized> KeyToSymbols<K, u8> for BytesKeyConverter {
    fn convert<'a>(key: &'a K) -> Cow<'a, [u8]> {
        Cow::Borrowed(key.as_ref())
    }
}
