//! Key types for SM4.

use crate::error::GmError;

/// SM4 master key size in bytes.
pub const KEY_SIZE: usize = 16;

/// Number of SM4 rounds, and of round keys.
pub const ROUNDS: usize = 32;

/// SM4 master key wrapper.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Sm4Key(pub [u8; KEY_SIZE]);

impl From<[u8; KEY_SIZE]> for Sm4Key {
    fn from(value: [u8; KEY_SIZE]) -> Self {
        Self(value)
    }
}

impl TryFrom<&[u8]> for Sm4Key {
    type Error = GmError;

    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        let bytes: [u8; KEY_SIZE] = value.try_into().map_err(|_| GmError::InvalidKeyLength {
            expected: KEY_SIZE,
            got: value.len(),
        })?;
        Ok(Self(bytes))
    }
}

/// The 32 round keys derived from one master key.
///
/// Always complete: there is no way to observe a partially derived schedule.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RoundKeys(pub [u32; ROUNDS]);

impl RoundKeys {
    /// Returns the round key at the requested index (0..32).
    #[inline]
    pub fn get(&self, round: usize) -> u32 {
        self.0[round]
    }

    /// Iterates the keys in encryption order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = u32> + '_ {
        self.0.iter().copied()
    }

    /// Returns the schedule in decryption order (key 31 first).
    pub fn reversed(&self) -> Self {
        let mut keys = self.0;
        keys.reverse();
        Self(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_from_slice_checks_length() {
        assert!(Sm4Key::try_from(&[0u8; 16][..]).is_ok());
        assert_eq!(
            Sm4Key::try_from(&[0u8; 15][..]),
            Err(GmError::InvalidKeyLength {
                expected: 16,
                got: 15
            })
        );
    }

    #[test]
    fn reversed_swaps_ends() {
        let keys = RoundKeys(core::array::from_fn(|i| i as u32));
        let rev = keys.reversed();
        assert_eq!(rev.get(0), 31);
        assert_eq!(rev.get(31), 0);
        assert_eq!(rev.reversed(), keys);
    }
}
