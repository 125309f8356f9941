//! Reference SM4 and SM3 implementations used by the accelerated backends and the CLI.
//!
//! This crate intentionally mirrors GB/T 32907-2016 (SM4) and GB/T 32905-2016 (SM3)
//! and provides:
//! - SM4 key schedule and single-block encryption/decryption.
//! - SM3 compression, padding, one-shot and incremental hashing.
//! - Public types and constant tables shared across the workspace.
//!
//! The implementation aims for clarity and testability rather than constant-time
//! guarantees; it should not be treated as side-channel hardened.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod error;
pub mod sm3;
pub mod sm4;
pub mod words;

pub use crate::error::GmError;
pub use crate::sm3::{hash, Digest, Sm3};
pub use crate::sm4::{
    decrypt, decrypt_block, derive_schedule, encrypt, encrypt_block, expand_key, Block,
    RoundKeys, Sm4Key,
};
