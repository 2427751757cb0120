//! Read-only rank queries over a frozen substring trie.
//!
//! This module provides the `SubstringIndex` type. It owns the same arena the
//! build phase produced but exposes no way to change it, which is what makes
//! the per-node size cache safe: a size is computed once, on first read, and
//! the subtree it describes can never grow afterwards.

use std::fmt;
use std::iter::FusedIterator;

use log::debug;

use crate::alphabet;
use crate::node::{NodeId, TrieNode, ROOT};
use crate::util::prefix_match;

/// Answer given for a rank past the last distinct substring.
pub const OUT_OF_RANGE: &str = "INVALID";

/// The distinct substrings of a set of words, ranked lexicographically.
///
/// Ranks are 0-based: rank 0 is the smallest distinct substring. Queries never
/// fail; a rank at or past [`len`](Self::len) yields `None` from
/// [`select`](Self::select) and [`OUT_OF_RANGE`] from
/// [`answer`](Self::answer).
///
/// # Examples
///
/// ```
/// use substring_index::{build, OUT_OF_RANGE};
///
/// let index = build(["ab", "bc"]).unwrap();
///
/// assert_eq!(index.len(), 5);
/// assert_eq!(index.answer(0), "a");
/// assert_eq!(index.answer(2), "b");
/// assert_eq!(index.answer(4), "c");
/// assert_eq!(index.answer(5), OUT_OF_RANGE);
/// ```
pub struct SubstringIndex {
    words: Vec<Box<str>>,
    nodes: Vec<TrieNode>,
}

impl SubstringIndex {
    pub(crate) fn new(words: Vec<Box<str>>, nodes: Vec<TrieNode>) -> Self {
        SubstringIndex { words, nodes }
    }

    /// Returns the number of distinct substrings.
    pub fn len(&self) -> usize {
        self.size(ROOT)
    }

    /// Returns `true` if no non-empty word was indexed.
    pub fn is_empty(&self) -> bool {
        self.nodes[ROOT].children().next().is_none()
    }

    /// Returns the distinct substring with the given rank, if there is one.
    ///
    /// The walk starts at the root and, at each node, first offers the
    /// prefixes ending on the node's own edge, then skips whole children by
    /// their cached sizes in alphabet order.
    ///
    /// # Examples
    ///
    /// ```
    /// use substring_index::build;
    ///
    /// let index = build(["aa"]).unwrap();
    ///
    /// assert_eq!(index.select(0), Some("a"));
    /// assert_eq!(index.select(1), Some("aa"));
    /// assert_eq!(index.select(2), None);
    /// ```
    pub fn select(&self, rank: usize) -> Option<&str> {
        let mut node = ROOT;
        let mut rank = rank;

        loop {
            let n = &self.nodes[node];
            let own = n.own_count();
            if rank < own {
                return Some(&self.text(node)[..n.level + rank]);
            }
            rank -= own;

            let mut next = None;
            for child in n.children() {
                let size = self.size(child);
                if rank < size {
                    next = Some(child);
                    break;
                }
                rank -= size;
            }
            node = next?;
        }
    }

    /// Returns the substring with the given rank, or [`OUT_OF_RANGE`].
    pub fn answer(&self, rank: usize) -> &str {
        self.select(rank).unwrap_or(OUT_OF_RANGE)
    }

    /// Answers a batch of ranks, one answer per rank, in order.
    pub fn answer_all<I>(&self, ranks: I) -> Vec<&str>
    where
        I: IntoIterator<Item = usize>,
    {
        ranks.into_iter().map(|rank| self.answer(rank)).collect()
    }

    /// Returns `true` if `substring` occurs in any indexed word.
    ///
    /// The empty string is never reported as a member.
    ///
    /// # Examples
    ///
    /// ```
    /// use substring_index::build;
    ///
    /// let index = build(["banana"]).unwrap();
    ///
    /// assert!(index.contains("nan"));
    /// assert!(!index.contains("nab"));
    /// ```
    pub fn contains(&self, substring: &str) -> bool {
        let key = substring.as_bytes();
        if key.is_empty() {
            return false;
        }

        let mut node = ROOT;
        loop {
            let n = &self.nodes[node];
            // The first `level` bytes were matched on the way down.
            let text = self.text(node).as_bytes();
            let matched = n.level + prefix_match(&text[n.level..], &key[n.level..]);
            if matched == key.len() {
                return true;
            }
            if matched < n.len {
                return false;
            }

            let next = key[matched];
            if !next.is_ascii_lowercase() {
                return false;
            }
            match n.child(alphabet::slot(next)) {
                Some(child) => node = child,
                None => return false,
            }
        }
    }

    /// Returns an iterator over all distinct substrings in ascending order.
    ///
    /// The iterator walks the trie once, depth first, so a full pass is linear
    /// in the number of substrings.
    pub fn iter(&self) -> Iter<'_> {
        let mut stack: Vec<NodeId> = self.nodes[ROOT].children().collect();
        stack.reverse();
        Iter {
            index: self,
            stack,
            node: ROOT,
            end: 1,
            remaining: self.len(),
        }
    }

    fn text(&self, id: NodeId) -> &str {
        let node = &self.nodes[id];
        if node.len == 0 {
            return "";
        }
        &self.words[node.source][node.offset..node.offset + node.len]
    }

    /// Subtree size of `id`, computing and caching it on first use.
    ///
    /// Sizes are filled bottom-up with an explicit stack so a deep trie does
    /// not exhaust the call stack. Other readers may fill cells concurrently;
    /// every size handed out is read back from its cell.
    fn size(&self, id: NodeId) -> usize {
        if let Some(&size) = self.nodes[id].cached_size.get() {
            return size;
        }

        let mut stack = vec![(id, false)];
        while let Some((node, expanded)) = stack.pop() {
            let n = &self.nodes[node];
            if !expanded {
                if n.cached_size.get().is_none() {
                    stack.push((node, true));
                    stack.extend(n.children().map(|c| (c, false)));
                }
                continue;
            }
            self.fill(node);
        }

        let total = self.fill(id);
        if id == ROOT {
            debug!("substring index holds {} distinct substrings", total);
        }
        total
    }

    /// Caches the size of a node whose children are all cached.
    fn fill(&self, id: NodeId) -> usize {
        let n = &self.nodes[id];
        *n.cached_size.get_or_init(|| {
            let below: usize = n
                .children()
                .map(|c| self.nodes[c].cached_size.get().copied().unwrap_or(0))
                .sum();
            n.own_count() + below
        })
    }
}

impl fmt::Debug for SubstringIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubstringIndex")
            .field("words", &self.words.len())
            .field("nodes", &self.nodes.len())
            .finish()
    }
}

/// An iterator over the distinct substrings of a [`SubstringIndex`].
///
/// Yields substrings in ascending lexicographic order, each exactly once.
pub struct Iter<'a> {
    index: &'a SubstringIndex,

    /// Nodes still to visit, the next one on top
    stack: Vec<NodeId>,

    /// Node whose edge is being walked
    node: NodeId,

    /// Length of the next prefix to yield from `node`
    end: usize,

    remaining: usize,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.index;
        loop {
            let n = &index.nodes[self.node];
            if !n.is_root() && self.end <= n.len {
                let item = &index.text(self.node)[..self.end];
                self.end += 1;
                self.remaining -= 1;
                return Some(item);
            }

            let next = self.stack.pop()?;
            let first_child = self.stack.len();
            self.stack.extend(index.nodes[next].children());
            self.stack[first_child..].reverse();
            self.node = next;
            self.end = index.nodes[next].level;
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl FusedIterator for Iter<'_> {}

impl<'a> IntoIterator for &'a SubstringIndex {
    type Item = &'a str;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build;

    #[test]
    fn test_two_words() {
        let index = build(["ab", "bc"]).unwrap();

        assert_eq!(index.len(), 5);
        let all: Vec<_> = index.iter().collect();
        assert_eq!(all, vec!["a", "ab", "b", "bc", "c"]);
        assert_eq!(index.answer(5), OUT_OF_RANGE);
        assert_eq!(index.answer(usize::MAX), OUT_OF_RANGE);
    }

    #[test]
    fn test_repeated_letter() {
        let index = build(["aa"]).unwrap();

        assert_eq!(index.len(), 2);
        assert_eq!(index.answer_all([0, 1, 2]), vec!["a", "aa", OUT_OF_RANGE]);
    }

    #[test]
    fn test_empty_index() {
        let index = build(Vec::<String>::new()).unwrap();

        assert!(index.is_empty());
        assert_eq!(index.len(), 0);
        assert_eq!(index.select(0), None);
        assert_eq!(index.iter().next(), None);

        let index = build([""]).unwrap();
        assert!(index.is_empty());
        assert_eq!(index.answer(0), OUT_OF_RANGE);
    }

    #[test]
    fn test_prefixes_come_before_extensions() {
        let index = build(["abc", "ab", "b"]).unwrap();

        let all: Vec<_> = index.iter().collect();
        assert_eq!(all, vec!["a", "ab", "abc", "b", "bc", "c"]);
    }

    #[test]
    fn test_sizes_are_cached() {
        let index = build(["banana"]).unwrap();

        assert!(index.nodes[ROOT].cached_size.get().is_none());
        assert_eq!(index.len(), 15);
        for node in &index.nodes {
            assert!(node.cached_size.get().is_some());
        }

        // Cached values are reused, not recomputed.
        assert_eq!(index.len(), 15);
    }

    #[test]
    fn test_size_with_partly_filled_cache() {
        let index = build(["mississippi"]).unwrap();
        let expected = build(["mississippi"]).unwrap().len();

        // Another reader got to some subtrees first.
        for child in index.nodes[ROOT].children().collect::<Vec<_>>() {
            index.size(child);
        }
        assert_eq!(index.len(), expected);

        // The root itself filled while its subtrees were already cached.
        let index = build(["mississippi"]).unwrap();
        let deepest = index.nodes.len() - 1;
        index.size(deepest);
        assert_eq!(index.size(ROOT), expected);
        assert_eq!(index.fill(ROOT), expected);
    }

    #[test]
    fn test_iter_agrees_with_select() {
        let index = build(["abracadabra", "cadabra", "zz"]).unwrap();

        let walked: Vec<_> = index.iter().collect();
        let selected: Vec<_> = (0..index.len()).map(|r| index.select(r).unwrap()).collect();
        assert_eq!(walked, selected);

        let mut iter = index.iter();
        for _ in 0..index.len() {
            assert!(iter.next().is_some());
        }
        assert_eq!(iter.next(), None);
        assert_eq!(iter.next(), None);
    }

    #[test]
    fn test_contains() {
        let index = build(["abcab", "xyz"]).unwrap();

        for s in ["a", "ab", "abca", "bcab", "cab", "xyz", "yz", "z"] {
            assert!(index.contains(s), "{} should be present", s);
        }
        for s in ["", "ac", "abcabc", "zx", "xz", "A", "ab1"] {
            assert!(!index.contains(s), "{} should be absent", s);
        }
    }

    #[test]
    fn test_iter_size_hint() {
        let index = build(["abc"]).unwrap();
        let mut iter = index.iter();

        assert_eq!(iter.len(), 6);
        iter.next();
        assert_eq!(iter.len(), 5);
        assert_eq!((&index).into_iter().count(), 6);
    }

    #[test]
    fn test_deep_trie_size() {
        let word = format!("{}b", "a".repeat(3_000));
        let index = build([word.as_str()]).unwrap();

        // a^k for k in 1..=3000, plus a^k b for k in 0..=3000
        assert_eq!(index.len(), 3_000 + 3_001);
        assert_eq!(index.select(2_999), Some(&word[..3_000]));
        assert_eq!(index.select(3_000), Some(&word[..]));
        assert_eq!(index.answer(6_000), "b");
    }

    #[test]
    fn test_index_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SubstringIndex>();
    }
}
