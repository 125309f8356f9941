//! Lane-parallel SM4 evaluator.
//!
//! Independent blocks are transposed into four word vectors of `LANES`
//! entries each, so every round applies the same arithmetic across all lanes.
//! The per-lane arithmetic is exactly the reference round; only the data
//! layout differs.

use gm_core::sm4::sbox::{CK, FK};
use gm_core::sm4::{Block, RoundKeys, Sm4Key, ROUNDS};
use gm_core::words::{load_be, store_be};

use crate::tables::{CIPHER_TABLES, KEY_TABLES};

/// Expands a master key using the fused key-schedule tables.
pub fn expand_key(key: &Sm4Key) -> RoundKeys {
    let mk: [u32; 4] = load_be(&key.0);
    let mut window = [mk[0] ^ FK[0], mk[1] ^ FK[1], mk[2] ^ FK[2], mk[3] ^ FK[3]];
    let mut round_keys = [0u32; ROUNDS];
    for (rk, &ck) in round_keys.iter_mut().zip(CK.iter()) {
        let [k0, k1, k2, k3] = window;
        let next = k0 ^ KEY_TABLES.compose(k1 ^ k2 ^ k3 ^ ck);
        window = [k1, k2, k3, next];
        *rk = next;
    }
    RoundKeys(round_keys)
}

/// SM4 evaluator that processes `LANES` blocks per round step.
#[derive(Clone, Debug)]
pub struct LaneCipher<const LANES: usize> {
    encrypt_keys: [u32; ROUNDS],
    decrypt_keys: [u32; ROUNDS],
}

impl<const LANES: usize> LaneCipher<LANES> {
    /// Prepares both key orders from an expanded schedule.
    pub fn new(round_keys: &RoundKeys) -> Self {
        Self {
            encrypt_keys: round_keys.0,
            decrypt_keys: round_keys.reversed().0,
        }
    }

    /// Encrypts every block in place.
    pub fn encrypt_blocks(&self, blocks: &mut [Block]) {
        for batch in blocks.chunks_mut(LANES) {
            run_batch::<LANES>(&self.encrypt_keys, batch);
        }
    }

    /// Decrypts every block in place.
    pub fn decrypt_blocks(&self, blocks: &mut [Block]) {
        for batch in blocks.chunks_mut(LANES) {
            run_batch::<LANES>(&self.decrypt_keys, batch);
        }
    }

    /// Encrypts a single block through a partially filled batch.
    pub fn encrypt_block(&self, block: &Block) -> Block {
        let mut out = [*block];
        self.encrypt_blocks(&mut out);
        out[0]
    }

    /// Decrypts a single block through a partially filled batch.
    pub fn decrypt_block(&self, block: &Block) -> Block {
        let mut out = [*block];
        self.decrypt_blocks(&mut out);
        out[0]
    }
}

/// Runs 32 rounds over up to `LANES` blocks. Unused lanes start at zero and
/// are never written back.
fn run_batch<const LANES: usize>(keys: &[u32; ROUNDS], batch: &mut [Block]) {
    debug_assert!(batch.len() <= LANES);
    let mut x = [[0u32; LANES]; 4];
    for (lane, block) in batch.iter().enumerate() {
        let words: [u32; 4] = load_be(block);
        for (row, word) in x.iter_mut().zip(words) {
            row[lane] = word;
        }
    }

    for &rk in keys {
        let [x0, x1, x2, x3] = x;
        let mut next = [0u32; LANES];
        for lane in 0..LANES {
            next[lane] = x0[lane] ^ CIPHER_TABLES.compose(x1[lane] ^ x2[lane] ^ x3[lane] ^ rk);
        }
        x = [x1, x2, x3, next];
    }

    for (lane, block) in batch.iter_mut().enumerate() {
        store_be(&[x[3][lane], x[2][lane], x[1][lane], x[0][lane]], block);
    }
}
