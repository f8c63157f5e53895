//! Cryptographic primitives toolkit.
//!
//! A thin facade over the workspace crates:
//!
//! - [`crypto`] — streaming digests (SHA-256, MD5), HMAC, PBKDF2-HMAC-SHA256,
//!   and AES-GCM authenticated encryption, all implemented from scratch
//! - [`encoding`] — the base64 codecs (MIME, URL-safe, crypt-style) the
//!   hash-string formats are built on
//!
//! # Example
//!
//! ```
//! use crypto::AesGcm;
//!
//! let mut gcm = AesGcm::new();
//! gcm.set_key128(b"an example key!!");
//! let (ciphertext, tag) = gcm.seal(b"unique nonce", b"header", b"the payload");
//! let plaintext = gcm.open(b"unique nonce", b"header", &ciphertext, &tag).unwrap();
//! assert_eq!(plaintext, b"the payload");
//! ```

#![forbid(unsafe_code)]

pub use crypto;
pub use encoding;
