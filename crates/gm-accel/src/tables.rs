//! Fused substitution + diffusion tables for SM4.
//!
//! Because both diffusion families are linear over GF(2), `L(S(w))` splits into
//! four independent per-byte lookups: `T_k[b] = L(S[b] << (24 - 8k))`, and
//! `L(S(w)) = T_0[w >> 24] ^ T_1[(w >> 16) & 0xff] ^ T_2[(w >> 8) & 0xff] ^ T_3[w & 0xff]`.

use gm_core::sm4::sbox::SBOX;
use gm_core::sm4::transform::{diffuse, Diffusion};

const ENTRIES: usize = 256;

/// Four 256-entry tables fusing the S-box with one diffusion family.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FusedTables {
    tables: [[u32; ENTRIES]; 4],
}

impl FusedTables {
    /// Builds the tables for `family` at compile time.
    pub const fn generate(family: Diffusion) -> Self {
        let mut tables = [[0u32; ENTRIES]; 4];
        let mut byte = 0;
        while byte < ENTRIES {
            let substituted = SBOX[byte] as u32;
            let mut position = 0;
            while position < 4 {
                let shift = (24 - 8 * position) as u32;
                tables[position][byte] = diffuse(substituted << shift, family);
                position += 1;
            }
            byte += 1;
        }
        Self { tables }
    }

    /// Reads the entry for `byte` at big-endian byte `position` (0..4).
    #[inline]
    pub fn get(&self, position: usize, byte: u8) -> u32 {
        self.tables[position][byte as usize]
    }

    /// Substitution followed by diffusion, in four lookups.
    #[inline(always)]
    pub fn compose(&self, word: u32) -> u32 {
        self.tables[0][(word >> 24) as usize]
            ^ self.tables[1][((word >> 16) & 0xff) as usize]
            ^ self.tables[2][((word >> 8) & 0xff) as usize]
            ^ self.tables[3][(word & 0xff) as usize]
    }
}

/// Tables for the cipher rounds (`L`).
pub static CIPHER_TABLES: FusedTables = FusedTables::generate(Diffusion::Cipher);

/// Tables for the key schedule (`L'`).
pub static KEY_TABLES: FusedTables = FusedTables::generate(Diffusion::KeySchedule);
