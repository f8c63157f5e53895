//! Cryptographic primitives: streaming digests, HMAC, PBKDF2, AES-GCM.
//!
//! Every algorithm is implemented from scratch; the only dependencies are
//! ambient (error derive, OS randomness, key zeroization) plus the sibling
//! `encoding` crate for base64 hash strings.
//!
//! # Modules
//!
//! - [`digest`] — generic streaming digest engine (Merkle–Damgård scaffold)
//! - [`sha256`] — SHA-256 (FIPS 180-4)
//! - [`md5`] — MD5 (RFC 1321)
//! - [`hmac`] — keyed MAC over any digest (RFC 2104)
//! - [`pbkdf2`] — PBKDF2-HMAC-SHA256 (RFC 8018) with passlib hash strings
//! - [`aes`] — AES-128/192/256 block cipher (FIPS 197), encrypt-only
//! - [`ghash`] — GF(2¹²⁸) polynomial MAC (NIST SP 800-38D)
//! - [`gcm`] — AES-GCM authenticated encryption (NIST SP 800-38D)
//! - [`constant_time`] — constant-time comparison

#![forbid(unsafe_code)]

pub mod aes;
pub mod constant_time;
pub mod digest;
pub mod error;
pub mod gcm;
pub mod ghash;
pub mod hmac;
pub mod md5;
pub mod pbkdf2;
pub mod sha256;

// Re-export the most commonly used items at the crate root for convenience.

pub use aes::Aes;
pub use constant_time::ct_eq;
pub use digest::{BlockCompressor, Digest, hex};
pub use error::CryptoError;
pub use gcm::AesGcm;
pub use ghash::Ghash;
pub use hmac::{Hmac, HmacMd5, HmacSha256, hmac_sha256};
pub use md5::{Md5, md5};
pub use sha256::{Sha256, sha256};
