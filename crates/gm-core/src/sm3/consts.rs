//! SM3 constants.

use crate::sm3::ChainingValue;

/// Initial chaining value.
pub const IV: ChainingValue = [
    0x7380166f, 0x4914b2b9, 0x172442d7, 0xda8a0600, 0xa96f30bc, 0x163138aa, 0xe38dee4d, 0xb0fb0e4e,
];

/// Round constant for rounds 0..16.
pub const T_LOW: u32 = 0x79cc4519;

/// Round constant for rounds 16..64.
pub const T_HIGH: u32 = 0x7a879d8a;

/// Number of compression rounds.
pub const ROUNDS: usize = 64;

/// Round at which the constant and the boolean functions switch definition.
pub const SWITCH_ROUND: usize = 16;

/// Returns `T_j` for round `j`.
#[inline]
pub const fn round_constant(j: usize) -> u32 {
    if j < SWITCH_ROUND {
        T_LOW
    } else {
        T_HIGH
    }
}
