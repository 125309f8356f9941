//! Optimized SM3 compression.
//!
//! Same arithmetic as `gm_core::sm3::compress`, restructured for throughput:
//! round constants are pre-rotated at compile time, the round-16 switch is
//! hoisted out of the loop, and `W'_j` is formed inline instead of stored.

use gm_core::sm3::compress::{p0, p1, EXPANDED_WORDS};
use gm_core::sm3::consts::{round_constant, IV, ROUNDS, SWITCH_ROUND};
use gm_core::sm3::{pad, ChainingValue, Digest, BLOCK_SIZE, DIGEST_SIZE};
use gm_core::words::{load_be, store_be};
use gm_core::GmError;

const fn rotated_constants() -> [u32; ROUNDS] {
    let mut out = [0u32; ROUNDS];
    let mut j = 0;
    while j < ROUNDS {
        out[j] = round_constant(j).rotate_left((j % 32) as u32);
        j += 1;
    }
    out
}

/// `T_j <<< (j mod 32)` for every round.
pub const ROTATED_T: [u32; ROUNDS] = rotated_constants();

macro_rules! rounds {
    ($range:expr, $w:ident, $regs:ident, $ff:expr, $gg:expr) => {
        for j in $range {
            let [a, b, c, d, e, f, g, h] = $regs;
            let a12 = a.rotate_left(12);
            let ss1 = a12.wrapping_add(e).wrapping_add(ROTATED_T[j]).rotate_left(7);
            let ss2 = ss1 ^ a12;
            let tt1 = $ff(a, b, c)
                .wrapping_add(d)
                .wrapping_add(ss2)
                .wrapping_add($w[j] ^ $w[j + 4]);
            let tt2 = $gg(e, f, g)
                .wrapping_add(h)
                .wrapping_add(ss1)
                .wrapping_add($w[j]);
            $regs = [tt1, a, b.rotate_left(9), c, p0(tt2), e, f.rotate_left(19), g];
        }
    };
}

#[inline(always)]
fn parity(x: u32, y: u32, z: u32) -> u32 {
    x ^ y ^ z
}

#[inline(always)]
fn majority(x: u32, y: u32, z: u32) -> u32 {
    (x & y) | (x & z) | (y & z)
}

#[inline(always)]
fn choice(x: u32, y: u32, z: u32) -> u32 {
    (x & y) | (!x & z)
}

fn compress_one(cv: &mut ChainingValue, block: &[u8]) {
    let head: [u32; 16] = load_be(block);
    let mut w = [0u32; EXPANDED_WORDS];
    w[..16].copy_from_slice(&head);
    for i in 16..EXPANDED_WORDS {
        w[i] = p1(w[i - 16] ^ w[i - 9] ^ w[i - 3].rotate_left(15))
            ^ w[i - 13].rotate_left(7)
            ^ w[i - 6];
    }

    let mut regs = *cv;
    rounds!(0..SWITCH_ROUND, w, regs, parity, parity);
    rounds!(SWITCH_ROUND..ROUNDS, w, regs, majority, choice);

    for (word, reg) in cv.iter_mut().zip(regs) {
        *word ^= reg;
    }
}

/// Compresses every 64-byte block of `blocks` into `cv`, in order.
///
/// Trailing bytes that do not fill a block are ignored.
pub fn compress_blocks(cv: &mut ChainingValue, blocks: &[u8]) {
    for block in blocks.chunks_exact(BLOCK_SIZE) {
        compress_one(cv, block);
    }
}

/// Hashes `message` by padding it into one buffer and compressing it in a
/// single pass. Fails only if the padded buffer cannot be allocated.
pub fn hash(message: &[u8]) -> Result<Digest, GmError> {
    let padded = pad(message)?;
    let mut cv = IV;
    compress_blocks(&mut cv, &padded);
    let mut out = [0u8; DIGEST_SIZE];
    store_be(&cv, &mut out);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gm_core::sm3::compress::compress;
    use rand::{Rng, RngCore, SeedableRng};
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn rotated_constants_wrap_at_thirty_two() {
        assert_eq!(ROTATED_T[0], 0x79cc_4519);
        assert_eq!(ROTATED_T[1], 0xf398_8a32);
        assert_eq!(ROTATED_T[16], 0x9d8a_7a87);
        assert_eq!(ROTATED_T[32], 0x7a87_9d8a);
        assert_eq!(ROTATED_T[48], ROTATED_T[16]);
    }

    #[test]
    fn single_block_matches_reference_compression() {
        let mut rng = ChaCha20Rng::from_seed([50u8; 32]);
        for _ in 0..256 {
            let mut block = [0u8; 64];
            rng.fill_bytes(&mut block);
            let mut expected = IV;
            compress(&mut expected, &block);
            let mut actual = IV;
            compress_blocks(&mut actual, &block);
            assert_eq!(actual, expected);
        }
    }

    #[test]
    fn hash_matches_reference_driver() {
        let mut rng = ChaCha20Rng::from_seed([51u8; 32]);
        for len in (0..200).chain([511, 512, 513, 4096]) {
            let mut message = vec![0u8; len];
            rng.fill_bytes(&mut message);
            assert_eq!(hash(&message), Ok(gm_core::sm3::hash(&message)), "length {len}");
        }
        let len = rng.gen_range(10_000..20_000);
        let message = vec![0xa5; len];
        assert_eq!(hash(&message), Ok(gm_core::sm3::hash(&message)));
    }
}
