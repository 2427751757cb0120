//! Node implementation for the substring trie.
//!
//! Nodes live in a flat arena owned by the trie and refer to each other by
//! [`NodeId`]. A node does not store its edge label. Instead it points at a
//! suffix of one of the trie's stored words and records how much of it the
//! node spells; the edge is the tail of that text starting at `level - 1`.

use once_cell::sync::OnceCell;

use crate::alphabet::ALPHABET_SIZE;

/// Index of a node inside the trie's arena.
pub(crate) type NodeId = usize;

/// The root is always the first node in the arena.
pub(crate) const ROOT: NodeId = 0;

pub(crate) type Children = [Option<NodeId>; ALPHABET_SIZE];

/// A node of the compressed substring trie.
///
/// The node spells `words[source][offset..offset + len]`. Its first `level`
/// characters are consumed above it (the parent's string plus the branching
/// character), so the edge into the node covers positions `level - 1 .. len`.
#[derive(Debug)]
pub(crate) struct TrieNode {
    /// Word table index of the text this node spells
    pub source: usize,

    /// Start of the suffix inside the source word
    pub offset: usize,

    /// Length of the spelled string
    pub len: usize,

    /// Characters consumed from the root down to the start of this edge
    pub level: usize,

    /// Child nodes indexed by alphabet slot, allocated on first child
    pub children: Option<Box<Children>>,

    /// Node spelling this node's string without its first character, or a
    /// shallower node on that path.
    pub shortcut: Option<NodeId>,

    /// Number of distinct substrings ending on this edge or below it.
    ///
    /// Only written once the trie is frozen, so it never goes stale.
    pub cached_size: OnceCell<usize>,
}

impl TrieNode {
    /// Creates the root: an empty string with an empty child array.
    pub fn root() -> Self {
        TrieNode {
            source: 0,
            offset: 0,
            len: 0,
            level: 0,
            children: Some(Box::new([None; ALPHABET_SIZE])),
            shortcut: None,
            cached_size: OnceCell::new(),
        }
    }

    /// Creates a leaf spelling `len` characters of a word suffix.
    pub fn new(source: usize, offset: usize, len: usize, level: usize) -> Self {
        TrieNode {
            source,
            offset,
            len,
            level,
            children: None,
            shortcut: None,
            cached_size: OnceCell::new(),
        }
    }

    pub fn is_root(&self) -> bool {
        self.level == 0
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    /// Number of distinct substrings that end on this node's own edge.
    ///
    /// Every non-empty prefix of the edge is one substring. The root has no
    /// edge and contributes nothing.
    pub fn own_count(&self) -> usize {
        if self.is_root() {
            0
        } else {
            self.len + 1 - self.level
        }
    }

    pub fn child(&self, slot: usize) -> Option<NodeId> {
        self.children.as_ref().and_then(|c| c[slot])
    }

    /// Iterates over children in alphabet order.
    pub fn children(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.children.iter().flat_map(|c| c.iter().flatten().copied())
    }

    /// Sets the child in `slot`, allocating the child array if needed.
    pub fn set_child(&mut self, slot: usize, child: NodeId) {
        self.children
            .get_or_insert_with(|| Box::new([None; ALPHABET_SIZE]))[slot] = Some(child);
    }
}
