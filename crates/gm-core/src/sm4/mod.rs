//! SM4 block cipher (GB/T 32907-2016).
//!
//! The key schedule and the round engine share one nonlinear+linear building
//! block ([`transform::compose`]); they differ only in the diffusion family
//! and in the material fed into it.

mod block;
mod cipher;
mod key;
pub mod sbox;
pub mod transform;

pub use self::block::{Block, BLOCK_SIZE};
pub use self::cipher::{
    decrypt, decrypt_block, derive_schedule, encrypt, encrypt_block, expand_key,
};
pub use self::key::{RoundKeys, Sm4Key, KEY_SIZE, ROUNDS};
