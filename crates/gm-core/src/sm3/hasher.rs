//! SM3 padding, one-shot driver and incremental hasher.

use crate::error::GmError;
use crate::sm3::compress::compress;
use crate::sm3::consts::IV;
use crate::sm3::{ChainingValue, Digest, BLOCK_SIZE, DIGEST_SIZE};
use crate::words::store_be;

/// Bytes reserved at the end of the last block for the bit length.
const LENGTH_FIELD: usize = 8;

/// Largest remainder that still leaves room for the length field.
const SINGLE_TAIL_MAX: usize = BLOCK_SIZE - LENGTH_FIELD - 1;

/// The final one or two padded blocks of a message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tail {
    blocks: [[u8; BLOCK_SIZE]; 2],
    len: usize,
}

impl Tail {
    /// The padded blocks, in the order they must be compressed.
    pub fn blocks(&self) -> &[[u8; BLOCK_SIZE]] {
        &self.blocks[..self.len]
    }
}

/// Builds the padded tail for a message of `total_len` bytes whose last
/// `remainder.len() < 64` bytes did not fill a complete block.
///
/// A remainder of up to 55 bytes yields one block; 56..=63 bytes yield two,
/// with the bit length in the last 8 bytes of the second.
pub fn tail(remainder: &[u8], total_len: u64) -> Tail {
    debug_assert!(remainder.len() < BLOCK_SIZE);
    let r = remainder.len();
    let mut blocks = [[0u8; BLOCK_SIZE]; 2];
    blocks[0][..r].copy_from_slice(remainder);
    blocks[0][r] = 0x80;

    let len = if r <= SINGLE_TAIL_MAX { 1 } else { 2 };
    let bit_len = total_len.wrapping_mul(8).to_be_bytes();
    blocks[len - 1][BLOCK_SIZE - LENGTH_FIELD..].copy_from_slice(&bit_len);

    Tail { blocks, len }
}

fn finish(cv: &ChainingValue) -> Digest {
    let mut out = [0u8; DIGEST_SIZE];
    store_be(cv, &mut out);
    out
}

fn as_block(chunk: &[u8]) -> &[u8; BLOCK_SIZE] {
    chunk
        .try_into()
        .expect("chunks_exact yields full blocks")
}

/// One-shot SM3 digest of `message` (any length, including zero).
pub fn hash(message: &[u8]) -> Digest {
    let mut cv = IV;
    let blocks = message.chunks_exact(BLOCK_SIZE);
    let remainder = blocks.remainder();
    for block in blocks {
        compress(&mut cv, as_block(block));
    }
    for block in tail(remainder, message.len() as u64).blocks() {
        compress(&mut cv, block);
    }
    finish(&cv)
}

/// Materializes the fully padded message, a multiple of 64 bytes long.
pub fn pad(message: &[u8]) -> Result<Vec<u8>, GmError> {
    let full = message.len() - message.len() % BLOCK_SIZE;
    let padded_len = message
        .len()
        .checked_add(1 + LENGTH_FIELD)
        .and_then(|n| n.checked_next_multiple_of(BLOCK_SIZE))
        .ok_or(GmError::AllocationFailure { bytes: usize::MAX })?;

    let mut padded = Vec::new();
    padded
        .try_reserve_exact(padded_len)
        .map_err(|_| GmError::AllocationFailure { bytes: padded_len })?;
    padded.extend_from_slice(&message[..full]);
    for block in tail(&message[full..], message.len() as u64).blocks() {
        padded.extend_from_slice(block);
    }
    debug_assert_eq!(padded.len(), padded_len);
    Ok(padded)
}

/// Incremental SM3 hash context.
#[derive(Clone, Debug)]
pub struct Sm3 {
    /// Chaining value after the last full block.
    state: ChainingValue,
    /// Number of bytes absorbed so far.
    count: u64,
    /// Partial block buffer.
    buffer: [u8; BLOCK_SIZE],
    /// Number of bytes in the buffer.
    buffer_len: usize,
}

impl Default for Sm3 {
    fn default() -> Self {
        Self::new()
    }
}

impl Sm3 {
    /// Creates a context at the initial chaining value.
    pub fn new() -> Self {
        Self {
            state: IV,
            count: 0,
            buffer: [0u8; BLOCK_SIZE],
            buffer_len: 0,
        }
    }

    /// Absorbs `data`.
    pub fn update(&mut self, mut data: &[u8]) {
        self.count = self.count.wrapping_add(data.len() as u64);

        if self.buffer_len > 0 {
            let take = (BLOCK_SIZE - self.buffer_len).min(data.len());
            self.buffer[self.buffer_len..self.buffer_len + take].copy_from_slice(&data[..take]);
            self.buffer_len += take;
            data = &data[take..];
            if self.buffer_len < BLOCK_SIZE {
                return;
            }
            compress(&mut self.state, &self.buffer);
            self.buffer_len = 0;
        }

        let blocks = data.chunks_exact(BLOCK_SIZE);
        let rest = blocks.remainder();
        for block in blocks {
            compress(&mut self.state, as_block(block));
        }
        self.buffer[..rest.len()].copy_from_slice(rest);
        self.buffer_len = rest.len();
    }

    /// Pads, compresses the tail and returns the digest, leaving the context reset.
    pub fn finalize(&mut self) -> Digest {
        let pending = tail(&self.buffer[..self.buffer_len], self.count);
        for block in pending.blocks() {
            compress(&mut self.state, block);
        }
        let digest = finish(&self.state);
        self.reset();
        digest
    }

    /// Discards absorbed input and returns to the initial chaining value.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// One-shot convenience over [`Sm3::update`] and [`Sm3::finalize`].
    pub fn digest(data: &[u8]) -> Digest {
        let mut ctx = Self::new();
        ctx.update(data);
        ctx.finalize()
    }
}
