//! The fixed, ordered alphabet the trie branches on.
//!
//! Words are restricted to the 26 lowercase ASCII letters. Every child array in
//! the trie has one slot per symbol, and slot order is symbol order, so walking
//! the slots front to back visits children in lexicographic order.

use crate::Error;

/// Number of symbols, and therefore the width of every child array.
pub const ALPHABET_SIZE: usize = 26;

const FIRST: u8 = b'a';

/// Returns the child slot for an already validated symbol.
#[inline]
pub fn slot(byte: u8) -> usize {
    debug_assert!(byte.is_ascii_lowercase(), "{byte:#04x} is not in the alphabet");
    (byte - FIRST) as usize
}

/// Returns the symbol stored in the given child slot.
#[inline]
pub fn symbol(slot: usize) -> u8 {
    debug_assert!(slot < ALPHABET_SIZE);
    FIRST + slot as u8
}

/// Checks that every byte of `word` belongs to the alphabet.
///
/// `word_index` is only used to label the error.
pub fn validate(word_index: usize, word: &str) -> Result<(), Error> {
    match word.bytes().position(|b| !b.is_ascii_lowercase()) {
        Some(position) => Err(Error::InvalidSymbol {
            word: word_index,
            position,
            byte: word.as_bytes()[position],
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_and_symbol_are_inverse() {
        for s in 0..ALPHABET_SIZE {
            assert_eq!(slot(symbol(s)), s);
        }
        assert_eq!(slot(b'a'), 0);
        assert_eq!(slot(b'z'), ALPHABET_SIZE - 1);
    }

    #[test]
    fn test_slot_order_matches_byte_order() {
        assert!(slot(b'b') < slot(b'c'));
        assert!(symbol(3) < symbol(4));
    }

    #[test]
    fn test_validate_accepts_lowercase() {
        assert!(validate(0, "hello").is_ok());
        assert!(validate(0, "").is_ok());
    }

    #[test]
    fn test_validate_reports_first_bad_byte() {
        let err = validate(3, "abC1").unwrap_err();
        assert_eq!(
            err,
            Error::InvalidSymbol {
                word: 3,
                position: 2,
                byte: b'C'
            }
        );

        // Multi-byte input is rejected on its first byte.
        let err = validate(0, "é").unwrap_err();
        assert!(matches!(err, Error::InvalidSymbol { position: 0, .. }));
    }
}
