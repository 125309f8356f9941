//! SM3 cryptographic hash (GB/T 32905-2016).
//!
//! A 256-bit Merkle–Damgård hash over 64-byte blocks. The chaining value
//! starts at [`consts::IV`] and is XOR-folded with the output of the 64-round
//! compression function once per block.

pub mod compress;
pub mod consts;
mod hasher;

pub use self::hasher::{hash, pad, tail, Sm3, Tail};

/// SM3 output size in bytes.
pub const DIGEST_SIZE: usize = 32;

/// SM3 block size in bytes.
pub const BLOCK_SIZE: usize = 64;

/// A finished 32-byte SM3 digest.
pub type Digest = [u8; DIGEST_SIZE];

/// The eight-word running state.
pub type ChainingValue = [u32; 8];
