//! Error type shared by the cipher modules.

use thiserror::Error;

/// Failures a caller can meaningfully handle.
///
/// API misuse (wrong state, missing key or nonce) is a programming error
/// and panics instead; see the `# Panics` sections on the relevant methods.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CryptoError {
    /// An AES key slice was neither 16, 24, nor 32 bytes.
    #[error("AES key must be 16, 24, or 32 bytes, got {0}")]
    InvalidKeyLength(usize),

    /// The AES-GCM authentication tag did not match; the decrypted data
    /// must be discarded.
    #[error("AES-GCM authentication tag mismatch")]
    AuthenticationFailed,
}
