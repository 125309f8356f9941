//! SM4 key schedule and block encryption/decryption.

use crate::error::GmError;
use crate::sm4::block::{from_words, to_words, Block, BLOCK_SIZE};
use crate::sm4::key::{RoundKeys, Sm4Key, ROUNDS};
use crate::sm4::sbox::{CK, FK};
use crate::sm4::transform::{compose, Diffusion};

/// Expands a 128-bit master key into 32 round keys.
pub fn expand_key(key: &Sm4Key) -> RoundKeys {
    let mk = to_words(&key.0);
    let mut k0 = mk[0] ^ FK[0];
    let mut k1 = mk[1] ^ FK[1];
    let mut k2 = mk[2] ^ FK[2];
    let mut k3 = mk[3] ^ FK[3];

    let mut round_keys = [0u32; ROUNDS];
    for (rk, &ck) in round_keys.iter_mut().zip(CK.iter()) {
        let next = k0 ^ compose(k1 ^ k2 ^ k3 ^ ck, Diffusion::KeySchedule);
        k0 = k1;
        k1 = k2;
        k2 = k3;
        k3 = next;
        *rk = next;
    }

    RoundKeys(round_keys)
}

/// Derives the round-key schedule from a byte slice that must be exactly 16 bytes.
pub fn derive_schedule(master_key: &[u8]) -> Result<RoundKeys, GmError> {
    let key = Sm4Key::try_from(master_key)?;
    Ok(expand_key(&key))
}

/// Runs the 32 rounds over `block`, consuming one key per round, and returns
/// the final window in reverse word order.
///
/// Encryption and decryption differ only in the order of `keys`.
fn crypt_words<I>(block: &Block, keys: I) -> Block
where
    I: Iterator<Item = u32>,
{
    let [mut x0, mut x1, mut x2, mut x3] = to_words(block);

    for rk in keys {
        let next = x0 ^ compose(x1 ^ x2 ^ x3 ^ rk, Diffusion::Cipher);
        x0 = x1;
        x1 = x2;
        x2 = x3;
        x3 = next;
    }

    from_words(&[x3, x2, x1, x0])
}

/// Encrypts a single 16-byte block with pre-expanded round keys.
pub fn encrypt_block(block: &Block, round_keys: &RoundKeys) -> Block {
    crypt_words(block, round_keys.iter())
}

/// Decrypts a single 16-byte block with pre-expanded round keys.
pub fn decrypt_block(block: &Block, round_keys: &RoundKeys) -> Block {
    crypt_words(block, round_keys.iter().rev())
}

fn checked_block(input: &[u8]) -> Result<Block, GmError> {
    input.try_into().map_err(|_| GmError::InvalidBlockLength {
        expected: BLOCK_SIZE,
        got: input.len(),
    })
}

/// Encrypts a byte slice that must be exactly one block long.
pub fn encrypt(plaintext: &[u8], round_keys: &RoundKeys) -> Result<Block, GmError> {
    let block = checked_block(plaintext)?;
    Ok(encrypt_block(&block, round_keys))
}

/// Decrypts a byte slice that must be exactly one block long.
pub fn decrypt(ciphertext: &[u8], round_keys: &RoundKeys) -> Result<Block, GmError> {
    let block = checked_block(ciphertext)?;
    Ok(decrypt_block(&block, round_keys))
}
