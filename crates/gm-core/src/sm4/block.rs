//! Block representation helpers.

use crate::words::{load_be, store_be};

/// SM4 block size in bytes.
pub const BLOCK_SIZE: usize = 16;

/// SM4 block of 16 bytes.
pub type Block = [u8; BLOCK_SIZE];

/// Splits a block into its four big-endian words.
#[inline]
pub(crate) fn to_words(block: &Block) -> [u32; 4] {
    load_be(block)
}

/// Reassembles four words into a block.
#[inline]
pub(crate) fn from_words(words: &[u32; 4]) -> Block {
    let mut block = [0u8; BLOCK_SIZE];
    store_be(words, &mut block);
    block
}
