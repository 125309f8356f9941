//! SM3 message expansion and compression function.

use crate::sm3::consts::{round_constant, ROUNDS, SWITCH_ROUND};
use crate::sm3::{ChainingValue, BLOCK_SIZE};
use crate::words::{load_be, rotl};

/// Number of expanded message words `W_0..W_67`.
pub const EXPANDED_WORDS: usize = 68;

/// Boolean function `FF_j`: XOR for early rounds, majority afterwards.
#[inline]
pub const fn ff(x: u32, y: u32, z: u32, j: usize) -> u32 {
    if j < SWITCH_ROUND {
        x ^ y ^ z
    } else {
        (x & y) | (x & z) | (y & z)
    }
}

/// Boolean function `GG_j`: XOR for early rounds, choice afterwards.
#[inline]
pub const fn gg(x: u32, y: u32, z: u32, j: usize) -> u32 {
    if j < SWITCH_ROUND {
        x ^ y ^ z
    } else {
        (x & y) | (!x & z)
    }
}

/// Permutation `P0`, applied to `TT2` in each round.
#[inline]
pub const fn p0(x: u32) -> u32 {
    x ^ rotl(x, 9) ^ rotl(x, 17)
}

/// Permutation `P1`, used by message expansion.
#[inline]
pub const fn p1(x: u32) -> u32 {
    x ^ rotl(x, 15) ^ rotl(x, 23)
}

/// Per-block message schedule, rebuilt for every block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MessageSchedule {
    /// `W_0..W_67`.
    pub expanded: [u32; EXPANDED_WORDS],
    /// `W'_j = W_j ^ W_{j+4}` for `j` in `0..64`.
    pub mixed: [u32; ROUNDS],
}

impl MessageSchedule {
    /// Expands one 64-byte block.
    pub fn expand(block: &[u8; BLOCK_SIZE]) -> Self {
        let head: [u32; 16] = load_be(block);
        let mut w = [0u32; EXPANDED_WORDS];
        w[..16].copy_from_slice(&head);
        for i in 16..EXPANDED_WORDS {
            w[i] = p1(w[i - 16] ^ w[i - 9] ^ rotl(w[i - 3], 15)) ^ rotl(w[i - 13], 7) ^ w[i - 6];
        }

        let mut mixed = [0u32; ROUNDS];
        for (j, m) in mixed.iter_mut().enumerate() {
            *m = w[j] ^ w[j + 4];
        }

        Self { expanded: w, mixed }
    }
}

/// Compresses one block into `cv` in place.
pub fn compress(cv: &mut ChainingValue, block: &[u8; BLOCK_SIZE]) {
    let schedule = MessageSchedule::expand(block);
    let [mut a, mut b, mut c, mut d, mut e, mut f, mut g, mut h] = *cv;

    for j in 0..ROUNDS {
        let a12 = rotl(a, 12);
        let ss1 = rotl(
            a12.wrapping_add(e)
                .wrapping_add(rotl(round_constant(j), (j % 32) as u32)),
            7,
        );
        let ss2 = ss1 ^ a12;
        let tt1 = ff(a, b, c, j)
            .wrapping_add(d)
            .wrapping_add(ss2)
            .wrapping_add(schedule.mixed[j]);
        let tt2 = gg(e, f, g, j)
            .wrapping_add(h)
            .wrapping_add(ss1)
            .wrapping_add(schedule.expanded[j]);
        d = c;
        c = rotl(b, 9);
        b = a;
        a = tt1;
        h = g;
        g = rotl(f, 19);
        f = e;
        e = p0(tt2);
    }

    for (word, reg) in cv.iter_mut().zip([a, b, c, d, e, f, g, h]) {
        *word ^= reg;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sm3::consts::IV;

    fn abc_block() -> [u8; 64] {
        let mut block = [0u8; 64];
        block[..3].copy_from_slice(b"abc");
        block[3] = 0x80;
        block[63] = 24;
        block
    }

    #[test]
    fn expansion_of_abc_block() {
        // Intermediate values from the GB/T 32905 worked example.
        let schedule = MessageSchedule::expand(&abc_block());
        assert_eq!(schedule.expanded[0], 0x6162_6380);
        assert_eq!(schedule.expanded[15], 0x0000_0018);
        assert_eq!(schedule.expanded[16], 0x9092_e200);
        assert_eq!(schedule.expanded[17], 0x0000_0000);
        assert_eq!(schedule.expanded[67], 0xb99c_0545);
        assert_eq!(schedule.mixed[0], 0x6162_6380);
        assert_eq!(schedule.mixed[63], 0x49e2_60d5);
    }

    #[test]
    fn compress_abc_block_gives_digest() {
        let mut cv = IV;
        compress(&mut cv, &abc_block());
        assert_eq!(
            cv,
            [
                0x66c7f0f4, 0x62eeedd9, 0xd1f2d46b, 0xdc10e4e2, 0x4167c487, 0x5cf2f7a2, 0x297da02b,
                0x8f4ba8e0,
            ]
        );
    }

    #[test]
    fn boolean_functions_switch_at_round_sixteen() {
        let (x, y, z) = (0xf0f0_f0f0, 0xff00_ff00, 0x0ff0_0ff0);
        assert_eq!(ff(x, y, z, 15), x ^ y ^ z);
        assert_eq!(gg(x, y, z, 15), x ^ y ^ z);
        assert_eq!(ff(x, y, z, 16), (x & y) | (x & z) | (y & z));
        assert_eq!(gg(x, y, z, 63), (x & y) | (!x & z));
    }
}
