//! 32-bit word helpers shared by both primitives.
//!
//! Both SM4 and SM3 assemble words from bytes in big-endian order and
//! disassemble them the same way; swapping the order yields a plausible but
//! wrong result, so every conversion in the crate goes through these helpers.

/// Circular left rotation of `word` by `n` bits, `0 <= n <= 31`.
#[inline(always)]
pub const fn rotl(word: u32, n: u32) -> u32 {
    word.rotate_left(n)
}

/// Assembles `N` big-endian words from `4 * N` bytes.
///
/// `bytes` must hold at least `4 * N` bytes; trailing bytes are ignored.
#[inline]
pub fn load_be<const N: usize>(bytes: &[u8]) -> [u32; N] {
    let mut words = [0u32; N];
    for (word, chunk) in words.iter_mut().zip(bytes.chunks_exact(4)) {
        *word = u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
    }
    words
}

/// Disassembles `words` into `out` in big-endian order.
#[inline]
pub fn store_be(words: &[u32], out: &mut [u8]) {
    for (chunk, word) in out.chunks_exact_mut(4).zip(words.iter()) {
        chunk.copy_from_slice(&word.to_be_bytes());
    }
}
