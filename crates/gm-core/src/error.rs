//! Error type shared by the SM4 and SM3 entry points.

/// Errors surfaced at the byte-slice boundary of the primitives.
///
/// The transforms themselves are total; every variant is either a caller
/// contract violation detected before any round runs, or host exhaustion.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum GmError {
    /// The master key was not exactly 16 bytes.
    #[error("invalid key length: expected {expected} bytes, got {got}")]
    InvalidKeyLength {
        /// Required length in bytes.
        expected: usize,
        /// Supplied length in bytes.
        got: usize,
    },
    /// The cipher input was not exactly one 16-byte block.
    #[error("invalid block length: expected {expected} bytes, got {got}")]
    InvalidBlockLength {
        /// Required length in bytes.
        expected: usize,
        /// Supplied length in bytes.
        got: usize,
    },
    /// A working buffer could not be reserved.
    #[error("allocation failure: could not reserve {bytes} bytes")]
    AllocationFailure {
        /// Size of the failed reservation.
        bytes: usize,
    },
}
