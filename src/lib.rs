//! # Substring Index
//!
//! Order-statistics queries over the distinct substrings of a set of words.
//!
//! This crate builds a compressed trie (a radix trie over the lowercase
//! alphabet) holding every suffix of every input word, which makes every path
//! from the root spell a distinct substring. Subtree sizes cached on the
//! frozen trie then answer "what is the k-th smallest distinct substring?"
//! without ever listing the substrings.
//!
//! ## Features
//!
//! - **Compact edges**: nodes refer to a slice of a stored word instead of
//!   owning their label
//! - **Shortcut links**: each suffix insertion resumes from where the previous,
//!   one character longer suffix ended up, instead of from the root
//! - **Sealed queries**: sizes are cached once the trie is frozen, so a query
//!   never sees a stale count
//!
//! ## Example
//!
//! ```rust
//! use substring_index::{build, OUT_OF_RANGE};
//!
//! let index = build(["ab", "bc"]).unwrap();
//!
//! // "a", "ab", "b", "bc", "c"
//! assert_eq!(index.len(), 5);
//! assert_eq!(index.answer(1), "ab");
//! assert_eq!(index.answer(5), OUT_OF_RANGE);
//! ```

pub mod alphabet;
mod index;
mod node;
mod trie;
mod util;

// Re-export public types
pub use crate::index::{Iter, SubstringIndex, OUT_OF_RANGE};
pub use crate::trie::SubstringTrie;

/// Builds an index over the distinct substrings of `words`.
///
/// Fails on the first word holding a character outside `a..=z`.
///
/// ```rust
/// use substring_index::build;
///
/// let index = build(vec!["aa".to_string()]).unwrap();
/// assert_eq!(index.iter().collect::<Vec<_>>(), vec!["a", "aa"]);
///
/// assert!(build(["ok", "not ok"]).is_err());
/// ```
pub fn build<I, S>(words: I) -> Result<SubstringIndex, Error>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut trie = SubstringTrie::new();
    for word in words {
        trie.insert(word.as_ref())?;
    }
    Ok(trie.freeze())
}

/// Errors that can occur while building an index
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A word contains a byte outside the lowercase alphabet
    #[error("word {word} has byte {byte:#04x} outside a-z at position {position}")]
    InvalidSymbol {
        /// Number of words stored before the offending one
        word: usize,
        /// Byte offset inside the word
        position: usize,
        /// The offending byte
        byte: u8,
    },
}
