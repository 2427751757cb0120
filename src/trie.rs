//! The mutable build phase.
//!
//! This module contains the `SubstringTrie` type, which collects every suffix
//! of every inserted word into one compressed trie. Once all words are in,
//! [`SubstringTrie::freeze`] turns it into a read-only
//! [`SubstringIndex`](crate::SubstringIndex) that can answer rank queries.

use log::{debug, trace};

use crate::alphabet;
use crate::index::SubstringIndex;
use crate::node::{NodeId, TrieNode, ROOT};
use crate::util::prefix_match;
use crate::Error;

/// A compressed trie over all suffixes of the inserted words.
///
/// Every path from the root spells a substring of some inserted word, so the
/// trie holds each distinct substring exactly once. Consecutive suffixes of a
/// word are inserted starting from the shortcut left by the previous one
/// rather than from the root.
///
/// # Examples
///
/// ```
/// use substring_index::SubstringTrie;
///
/// let mut trie = SubstringTrie::new();
/// trie.insert("ab").unwrap();
/// trie.insert("bc").unwrap();
///
/// let index = trie.freeze();
/// assert_eq!(index.len(), 5);
/// assert_eq!(index.select(1), Some("ab"));
/// ```
#[derive(Debug)]
pub struct SubstringTrie {
    /// Owned copies of the inserted words; nodes slice into these
    pub(crate) words: Vec<Box<str>>,

    /// Node arena, the root first
    pub(crate) nodes: Vec<TrieNode>,
}

impl SubstringTrie {
    /// Creates an empty trie.
    pub fn new() -> Self {
        SubstringTrie {
            words: Vec::new(),
            nodes: vec![TrieNode::root()],
        }
    }

    /// Returns the number of words stored so far.
    ///
    /// Words that fail validation are not stored; empty words are skipped.
    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    /// Returns the number of nodes in the trie, the root included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Inserts every suffix of `word`, longest first.
    ///
    /// The word is validated before anything is stored, so an error leaves
    /// the trie untouched.
    ///
    /// # Examples
    ///
    /// ```
    /// use substring_index::SubstringTrie;
    ///
    /// let mut trie = SubstringTrie::new();
    /// assert!(trie.insert("aa").is_ok());
    /// assert!(trie.insert("Aa").is_err());
    ///
    /// assert_eq!(trie.freeze().len(), 2);
    /// ```
    pub fn insert(&mut self, word: &str) -> Result<(), Error> {
        alphabet::validate(self.words.len(), word)?;
        if word.is_empty() {
            return Ok(());
        }

        let source = self.words.len();
        self.words.push(word.into());

        let mut prev: Option<NodeId> = None;
        for offset in 0..word.len() {
            let start = prev
                .and_then(|p| self.nodes[p].shortcut)
                .unwrap_or(ROOT);
            prev = Some(self.insert_suffix(start, source, offset, prev));
        }

        trace!(
            "inserted word {} ({} chars), trie has {} nodes",
            source,
            word.len(),
            self.nodes.len()
        );
        Ok(())
    }

    /// Ends the build phase.
    pub fn freeze(self) -> SubstringIndex {
        debug!(
            "freezing substring trie: {} words, {} nodes",
            self.words.len(),
            self.nodes.len()
        );
        SubstringIndex::new(self.words, self.nodes)
    }

    /// Text spelled by a node, as bytes.
    pub(crate) fn text(&self, id: NodeId) -> &[u8] {
        let node = &self.nodes[id];
        if node.len == 0 {
            return &[];
        }
        &self.words[node.source].as_bytes()[node.offset..node.offset + node.len]
    }

    fn suffix(&self, source: usize, offset: usize) -> &[u8] {
        &self.words[source].as_bytes()[offset..]
    }

    /// Inserts `words[source][offset..]` below `start` and returns the node
    /// whose edge ends the suffix.
    ///
    /// `start` must already agree with the suffix on its first `level`
    /// characters. When `tracking` is given, its shortcut is pointed at the
    /// node that ends up holding the suffix.
    fn insert_suffix(
        &mut self,
        start: NodeId,
        source: usize,
        offset: usize,
        tracking: Option<NodeId>,
    ) -> NodeId {
        let suffix_len = self.words[source].len() - offset;
        let mut node = start;

        loop {
            let (level, len) = (self.nodes[node].level, self.nodes[node].len);
            let split = {
                let text = self.text(node);
                let suffix = self.suffix(source, offset);
                debug_assert!(
                    level <= suffix.len() && text[..level] == suffix[..level],
                    "node {} does not start the suffix it is asked to hold",
                    node
                );
                level + prefix_match(&text[level..], &suffix[level.min(suffix.len())..])
            };

            if split == suffix_len {
                // The edge already spells the whole suffix.
                if let Some(t) = tracking {
                    self.resolve_shortcut(t, node, None);
                }
                return node;
            }

            if split < len {
                return self.split_edge(node, split, source, offset, tracking);
            }

            // The suffix runs past the end of this edge.
            if self.nodes[node].is_leaf() {
                let n = &mut self.nodes[node];
                n.source = source;
                n.offset = offset;
                n.len = suffix_len;
                if let Some(t) = tracking {
                    self.resolve_shortcut(t, node, None);
                }
                return node;
            }

            let slot = alphabet::slot(self.suffix(source, offset)[split]);
            match self.nodes[node].child(slot) {
                Some(child) => node = child,
                None => {
                    let child = self.add_child(node, source, offset);
                    if let Some(t) = tracking {
                        self.resolve_shortcut(t, child, Some(node));
                    }
                    return child;
                }
            }
        }
    }

    /// Cuts `node`'s edge after `split` characters and hangs the old tail and
    /// the new suffix below it. Returns the node created for the suffix.
    fn split_edge(
        &mut self,
        node: NodeId,
        split: usize,
        source: usize,
        offset: usize,
        tracking: Option<NodeId>,
    ) -> NodeId {
        let tail = {
            let n = &mut self.nodes[node];
            let mut tail = TrieNode::new(n.source, n.offset, n.len, split + 1);
            tail.children = n.children.take();
            n.len = split;
            n.children = Some(Box::new([None; alphabet::ALPHABET_SIZE]));
            tail
        };
        let tail = self.push(tail);

        let fresh = self.add_child(node, source, offset);
        if let Some(t) = tracking {
            self.resolve_shortcut(t, fresh, Some(node));
        }
        self.attach(node, tail);
        fresh
    }

    /// Creates a leaf under `parent` for the whole of `words[source][offset..]`.
    fn add_child(&mut self, parent: NodeId, source: usize, offset: usize) -> NodeId {
        debug_assert!(
            self.suffix(source, offset).starts_with(self.text(parent)),
            "node {} is not a prefix of the suffix being added",
            parent
        );
        let level = self.nodes[parent].len + 1;
        let len = self.words[source].len() - offset;
        let child = self.push(TrieNode::new(source, offset, len, level));
        self.attach(parent, child);
        child
    }

    /// Links `child` under `parent` and seeds the child's shortcut.
    fn attach(&mut self, parent: NodeId, child: NodeId) {
        let level = self.nodes[child].level;
        debug_assert_eq!(self.nodes[parent].len + 1, level);

        let slot = alphabet::slot(self.text(child)[level - 1]);
        self.nodes[parent].set_child(slot, child);

        if self.nodes[child].shortcut.is_some() {
            return;
        }
        if let Some(shortcut) = self.nodes[parent].shortcut {
            let seeded = self.follow_without_head(shortcut, child);
            self.nodes[child].shortcut = Some(seeded);
        } else if self.nodes[parent].is_root() {
            self.nodes[child].shortcut = Some(parent);
        }
    }

    /// Walks down from `from` along `target`'s string minus its first
    /// character, stopping before reaching `target`'s own depth.
    fn follow_without_head(&self, from: NodeId, target: NodeId) -> NodeId {
        let goal = &self.nodes[target];
        let headless = match self.text(target) {
            [] | [_] => return from,
            [_, rest @ ..] => rest,
        };

        let mut node = from;
        loop {
            let n = &self.nodes[node];
            if n.is_leaf() || n.level + 1 >= goal.level || n.len >= headless.len() {
                return node;
            }
            let child = match n.child(alphabet::slot(headless[n.len])) {
                Some(c) if self.nodes[c].level < goal.level => c,
                _ => return node,
            };
            debug_assert!(
                headless.starts_with(&self.text(child)[..self.nodes[child].level]),
                "shortcut walk left the path of node {}",
                target
            );
            node = child;
        }
    }

    /// Points `tracking`'s shortcut at `candidate`, or at `fallback` when the
    /// candidate is not shallower than `tracking`.
    ///
    /// An existing shortcut is only replaced by a strictly deeper one that is
    /// still shallower than `tracking`.
    fn resolve_shortcut(&mut self, tracking: NodeId, candidate: NodeId, fallback: Option<NodeId>) {
        let own = self.nodes[tracking].level;
        let target = match fallback {
            Some(parent) if self.nodes[candidate].level >= own => parent,
            _ => candidate,
        };
        let depth = self.nodes[target].level;

        let replace = match self.nodes[tracking].shortcut {
            None => true,
            Some(current) => self.nodes[current].level < depth && depth < own,
        };
        if replace {
            self.nodes[tracking].shortcut = Some(target);
        }
    }

    fn push(&mut self, node: TrieNode) -> NodeId {
        self.nodes.push(node);
        self.nodes.len() - 1
    }
}

impl Default for SubstringTrie {
    fn default() -> Self {
        Self::new()
    }
}
