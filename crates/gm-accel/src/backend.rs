//! Capability detection and backend selection.

use cfg_if::cfg_if;
use gm_core::sm3::Digest;
use gm_core::sm4::{Block, RoundKeys, Sm4Key};
use gm_core::GmError;

use crate::lanes::{self, LaneCipher};

/// Vector width available on the running host.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Capability {
    /// 256-bit lanes (AVX2).
    Wide,
    /// 128-bit lanes (SSE2 or NEON).
    Narrow,
    /// No usable vector unit; stay on the scalar path.
    Portable,
}

impl Capability {
    /// Probes the running CPU.
    pub fn detect() -> Self {
        probe()
    }

    /// Number of 32-bit lanes processed per step.
    pub fn lanes(self) -> usize {
        match self {
            Self::Wide => 8,
            Self::Narrow => 4,
            Self::Portable => 1,
        }
    }
}

cfg_if! {
    if #[cfg(any(target_arch = "x86", target_arch = "x86_64"))] {
        fn probe() -> Capability {
            if std::arch::is_x86_feature_detected!("avx2") {
                Capability::Wide
            } else if std::arch::is_x86_feature_detected!("sse2") {
                Capability::Narrow
            } else {
                Capability::Portable
            }
        }
    } else if #[cfg(target_arch = "aarch64")] {
        // NEON is part of the aarch64 baseline.
        fn probe() -> Capability {
            Capability::Narrow
        }
    } else {
        fn probe() -> Capability {
            Capability::Portable
        }
    }
}

/// An execution strategy for SM4 and SM3.
///
/// Every implementation must produce byte-identical output to the reference
/// engines in `gm_core` for every input.
pub trait Backend {
    /// Short identifier, e.g. `"scalar"` or `"wide8"`.
    fn name(&self) -> &'static str;

    /// Derives the 32 round keys.
    fn expand_key(&self, key: &Sm4Key) -> RoundKeys;

    /// Encrypts independent blocks in place.
    fn encrypt_blocks(&self, round_keys: &RoundKeys, blocks: &mut [Block]);

    /// Decrypts independent blocks in place.
    fn decrypt_blocks(&self, round_keys: &RoundKeys, blocks: &mut [Block]);

    /// Hashes an arbitrary-length message.
    fn hash(&self, message: &[u8]) -> Result<Digest, GmError>;
}

/// Reference strategy delegating to `gm_core`.
#[derive(Clone, Copy, Debug, Default)]
pub struct Scalar;

impl Backend for Scalar {
    fn name(&self) -> &'static str {
        "scalar"
    }

    fn expand_key(&self, key: &Sm4Key) -> RoundKeys {
        gm_core::sm4::expand_key(key)
    }

    fn encrypt_blocks(&self, round_keys: &RoundKeys, blocks: &mut [Block]) {
        for block in blocks.iter_mut() {
            *block = gm_core::sm4::encrypt_block(block, round_keys);
        }
    }

    fn decrypt_blocks(&self, round_keys: &RoundKeys, blocks: &mut [Block]) {
        for block in blocks.iter_mut() {
            *block = gm_core::sm4::decrypt_block(block, round_keys);
        }
    }

    fn hash(&self, message: &[u8]) -> Result<Digest, GmError> {
        Ok(gm_core::sm3::hash(message))
    }
}

/// Table-driven strategy processing `LANES` blocks per round step.
#[derive(Clone, Copy, Debug, Default)]
pub struct Wide<const LANES: usize>;

impl<const LANES: usize> Backend for Wide<LANES> {
    fn name(&self) -> &'static str {
        match LANES {
            4 => "wide4",
            8 => "wide8",
            _ => "wide",
        }
    }

    fn expand_key(&self, key: &Sm4Key) -> RoundKeys {
        lanes::expand_key(key)
    }

    fn encrypt_blocks(&self, round_keys: &RoundKeys, blocks: &mut [Block]) {
        LaneCipher::<LANES>::new(round_keys).encrypt_blocks(blocks);
    }

    fn decrypt_blocks(&self, round_keys: &RoundKeys, blocks: &mut [Block]) {
        LaneCipher::<LANES>::new(round_keys).decrypt_blocks(blocks);
    }

    fn hash(&self, message: &[u8]) -> Result<Digest, GmError> {
        crate::sm3::hash(message)
    }
}

/// Returns the strategy matching `capability`.
pub fn select(capability: Capability) -> Box<dyn Backend + Send + Sync> {
    match capability {
        Capability::Wide => Box::new(Wide::<8>),
        Capability::Narrow => Box::new(Wide::<4>),
        Capability::Portable => Box::new(Scalar),
    }
}

/// Returns the best strategy for the running host.
pub fn detect() -> Box<dyn Backend + Send + Sync> {
    select(Capability::detect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lanes_follow_capability() {
        assert_eq!(Capability::Wide.lanes(), 8);
        assert_eq!(Capability::Narrow.lanes(), 4);
        assert_eq!(Capability::Portable.lanes(), 1);
    }

    #[test]
    fn select_maps_capability_to_backend() {
        assert_eq!(select(Capability::Wide).name(), "wide8");
        assert_eq!(select(Capability::Narrow).name(), "wide4");
        assert_eq!(select(Capability::Portable).name(), "scalar");
    }

    #[test]
    fn detected_backend_is_usable() {
        let backend = detect();
        let key = Sm4Key::from([0x11; 16]);
        let rks = backend.expand_key(&key);
        assert_eq!(rks, gm_core::sm4::expand_key(&key));
        assert_eq!(backend.hash(b"abc"), Ok(gm_core::sm3::hash(b"abc")));
    }
}
