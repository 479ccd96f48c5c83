//! Order-preserving anagram grouping
//!
//! An [`OrderedGrouping`] maps an [`AnagramKey`] to the words that share it
//! and remembers the order in which keys were first seen. Lookup goes through
//! a hash map; order lives in a separate append-only key list.

use ahash::RandomState;
use bstr::{BStr, BString, ByteSlice};
use hashbrown::HashMap;
use std::fmt;

/// A single input line, compared byte for byte
pub type Word = BString;

/// Canonical representative of an anagram class: the word's bytes sorted ascending
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnagramKey(Vec<u8>);

impl AnagramKey {
    /// Compute the key of a word by sorting a copy of its bytes
    pub fn of(word: &[u8]) -> Self {
        let mut bytes = word.to_vec();
        bytes.sort_unstable();
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for AnagramKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AnagramKey({:?})", self.0.as_bstr())
    }
}

/// Key → words map that iterates in first-seen key order
#[derive(Clone, Default)]
pub struct OrderedGrouping {
    groups: HashMap<AnagramKey, Vec<Word>, RandomState>,
    order: Vec<AnagramKey>,
}

impl OrderedGrouping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `words` to the group for `key`, recording the key if it is new.
    ///
    /// Never deduplicates: appending the same word twice stores it twice.
    pub fn append_values<I>(&mut self, key: AnagramKey, words: I)
    where
        I: IntoIterator<Item = Word>,
    {
        let mut words = words.into_iter().peekable();
        if words.peek().is_none() {
            return;
        }

        match self.groups.get_mut(&key) {
            Some(group) => group.extend(words),
            None => {
                self.order.push(key.clone());
                self.groups.insert(key, words.collect());
            }
        }
    }

    /// Words grouped under `key`, if any
    pub fn get(&self, key: &AnagramKey) -> Option<&[Word]> {
        self.groups.get(key).map(Vec::as_slice)
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Total number of words across all groups
    pub fn word_count(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    /// Traverse groups in first-seen key order. Each call starts over.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            keys: self.order.iter(),
            groups: &self.groups,
        }
    }
}

impl fmt::Debug for OrderedGrouping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.iter().map(|(k, words)| {
                let words: Vec<&BStr> = words.iter().map(|w| w.as_bstr()).collect();
                (k, words)
            }))
            .finish()
    }
}

/// Borrowing iterator over an [`OrderedGrouping`]
pub struct Iter<'a> {
    keys: std::slice::Iter<'a, AnagramKey>,
    groups: &'a HashMap<AnagramKey, Vec<Word>, RandomState>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a AnagramKey, &'a [Word]);

    fn next(&mut self) -> Option<Self::Item> {
        let key = self.keys.next()?;
        let words = self.groups.get(key).map(Vec::as_slice).unwrap_or_default();
        Some((key, words))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.keys.size_hint()
    }
}

impl<'a> IntoIterator for &'a OrderedGrouping {
    type Item = (&'a AnagramKey, &'a [Word]);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Owning iterator, moves each word list out in first-seen key order
pub struct IntoIter {
    keys: std::vec::IntoIter<AnagramKey>,
    groups: HashMap<AnagramKey, Vec<Word>, RandomState>,
}

impl Iterator for IntoIter {
    type Item = (AnagramKey, Vec<Word>);

    fn next(&mut self) -> Option<Self::Item> {
        let key = self.keys.next()?;
        let words = self.groups.remove(&key).unwrap_or_default();
        Some((key, words))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.keys.size_hint()
    }
}

impl IntoIterator for OrderedGrouping {
    type Item = (AnagramKey, Vec<Word>);
    type IntoIter = IntoIter;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            keys: self.order.into_iter(),
            groups: self.groups,
        }
    }
}

/// Group a word sequence on the calling thread
pub fn group_words<I>(words: I) -> OrderedGrouping
where
    I: IntoIterator<Item = Word>,
{
    let mut grouping = OrderedGrouping::new();
    for word in words {
        grouping.append_values(AnagramKey::of(&word), [word]);
    }
    grouping
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(list: &[&str]) -> Vec<Word> {
        list.iter().map(|w| Word::from(*w)).collect()
    }

    fn multi_groups(grouping: &OrderedGrouping) -> Vec<Vec<String>> {
        grouping
            .iter()
            .filter(|(_, words)| words.len() > 1)
            .map(|(_, words)| words.iter().map(|w| w.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_key_sorts_bytes() {
        assert_eq!(AnagramKey::of(b"cat").as_bytes(), b"act");
        assert_eq!(AnagramKey::of(b"God").as_bytes(), b"Gdo");
        assert_eq!(AnagramKey::of(b"dog").as_bytes(), b"dgo");
        assert_eq!(AnagramKey::of(b"").len(), 0);
    }

    #[test]
    fn test_key_preserves_length() {
        for w in ["a", "ab", "tree", "tom marvolo riddle", "  "] {
            assert_eq!(AnagramKey::of(w.as_bytes()).len(), w.len());
        }
    }

    #[test]
    fn test_sample_groups() {
        let g = group_words(words(&["act", "cat", "tree", "race", "care", "acre", "bee"]));

        assert_eq!(g.len(), 4);
        assert_eq!(g.word_count(), 7);
        assert_eq!(
            multi_groups(&g),
            vec![vec!["act", "cat"], vec!["race", "care", "acre"]]
        );
    }

    #[test]
    fn test_case_sensitive() {
        let g = group_words(words(&["God", "dog"]));
        assert_eq!(g.len(), 2);
        assert!(multi_groups(&g).is_empty());
    }

    #[test]
    fn test_space_sensitive() {
        let g = group_words(words(&["tom marvolo riddle", "i am lord voldemort"]));
        assert!(multi_groups(&g).is_empty());
    }

    #[test]
    fn test_append_twice_keeps_both() {
        let mut g = OrderedGrouping::new();
        let key = AnagramKey::of(b"tac");
        g.append_values(key.clone(), [Word::from("cat")]);
        g.append_values(key.clone(), [Word::from("cat")]);

        assert_eq!(g.len(), 1);
        assert_eq!(g.get(&key).unwrap(), &words(&["cat", "cat"])[..]);
    }

    #[test]
    fn test_empty_append_records_nothing() {
        let mut g = OrderedGrouping::new();
        g.append_values(AnagramKey::of(b"x"), Vec::new());
        assert!(g.is_empty());
        assert_eq!(g.iter().count(), 0);
    }

    #[test]
    fn test_first_seen_order() {
        let mut g = OrderedGrouping::new();
        for w in ["zz", "aa", "mm", "aa", "zz"] {
            g.append_values(AnagramKey::of(w.as_bytes()), [Word::from(w)]);
        }

        let keys: Vec<&[u8]> = g.iter().map(|(k, _)| k.as_bytes()).collect();
        assert_eq!(keys, vec![&b"zz"[..], &b"aa"[..], &b"mm"[..]]);
    }

    #[test]
    fn test_iteration_is_restartable() {
        let g = group_words(words(&["ab", "ba", "cd"]));
        let first: Vec<_> = g.iter().map(|(k, w)| (k.clone(), w.to_vec())).collect();
        let second: Vec<_> = g.iter().map(|(k, w)| (k.clone(), w.to_vec())).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_into_iter_matches_iter() {
        let g = group_words(words(&["listen", "silent", "enlist", "google", "tinsel"]));
        let borrowed: Vec<_> = g.iter().map(|(k, w)| (k.clone(), w.to_vec())).collect();
        let owned: Vec<_> = g.into_iter().collect();
        assert_eq!(borrowed, owned);
    }

    #[test]
    fn test_empty_word_is_grouped() {
        let g = group_words(words(&["", "", "a"]));
        assert_eq!(g.get(&AnagramKey::of(b"")).unwrap().len(), 2);
    }
}
