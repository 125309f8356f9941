//! Accelerated SM4 and SM3 execution strategies.
//!
//! Everything here is a pure refactor of the reference engines in `gm_core`:
//! fused lookup tables generated at compile time, a lane-parallel multi-block
//! SM4 evaluator, and a restructured SM3 compression loop. A [`Backend`] is
//! picked by [`Capability`] so callers never branch on the host themselves.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod backend;
pub mod lanes;
pub mod sm3;
pub mod tables;

pub use backend::{detect, select, Backend, Capability, Scalar, Wide};
pub use lanes::LaneCipher;
