//! SM4 word transformations.

use crate::sm4::sbox::sbox;
use crate::words::rotl;

/// Linear diffusion family applied after substitution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Diffusion {
    /// `L`, used by the 32 cipher rounds (encryption and decryption alike).
    Cipher,
    /// `L'`, used by the key schedule.
    KeySchedule,
}

/// Nonlinear substitution `tau`: each byte of `word` through the S-box.
#[inline]
pub const fn substitute(word: u32) -> u32 {
    let b0 = sbox((word >> 24) as u8) as u32;
    let b1 = sbox((word >> 16) as u8) as u32;
    let b2 = sbox((word >> 8) as u8) as u32;
    let b3 = sbox(word as u8) as u32;
    (b0 << 24) | (b1 << 16) | (b2 << 8) | b3
}

/// Round diffusion `L(B) = B ^ (B <<< 2) ^ (B <<< 10) ^ (B <<< 18) ^ (B <<< 24)`.
#[inline]
pub const fn diffuse_cipher(word: u32) -> u32 {
    word ^ rotl(word, 2) ^ rotl(word, 10) ^ rotl(word, 18) ^ rotl(word, 24)
}

/// Key-schedule diffusion `L'(B) = B ^ (B <<< 13) ^ (B <<< 23)`.
#[inline]
pub const fn diffuse_key(word: u32) -> u32 {
    word ^ rotl(word, 13) ^ rotl(word, 23)
}

/// Applies the linear layer of the given family.
#[inline]
pub const fn diffuse(word: u32, family: Diffusion) -> u32 {
    match family {
        Diffusion::Cipher => diffuse_cipher(word),
        Diffusion::KeySchedule => diffuse_key(word),
    }
}

/// Composite transform `T` (or `T'` for the key schedule): substitution then diffusion.
#[inline]
pub const fn compose(word: u32, family: Diffusion) -> u32 {
    diffuse(substitute(word), family)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substitute_maps_each_byte() {
        assert_eq!(substitute(0x0000_0000), 0xd6d6_d6d6);
        assert_eq!(substitute(0x0001_02ff), 0xd690_e948);
    }

    #[test]
    fn diffusion_is_linear() {
        let a = 0xdead_beef;
        let b = 0x0bad_f00d;
        assert_eq!(diffuse_cipher(a ^ b), diffuse_cipher(a) ^ diffuse_cipher(b));
        assert_eq!(diffuse_key(a ^ b), diffuse_key(a) ^ diffuse_key(b));
        assert_eq!(diffuse_cipher(0), 0);
    }

    #[test]
    fn diffusion_of_single_bit_sets_rotated_bits() {
        assert_eq!(diffuse_cipher(1), 1 | 1 << 2 | 1 << 10 | 1 << 18 | 1 << 24);
        assert_eq!(diffuse_key(1), 1 | 1 << 13 | 1 << 23);
    }

    #[test]
    fn compose_selects_family() {
        let word = 0x0123_4567;
        assert_eq!(
            compose(word, Diffusion::Cipher),
            diffuse_cipher(substitute(word))
        );
        assert_eq!(
            compose(word, Diffusion::KeySchedule),
            diffuse_key(substitute(word))
        );
    }
}
