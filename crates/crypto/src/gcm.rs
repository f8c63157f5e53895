//! AES-GCM (Galois/Counter Mode) AEAD per NIST SP 800-38D.
//!
//! [`AesGcm`] is a streaming session: configure key, nonce, associated
//! data (and on the decrypt path the expected tag), start with
//! [`encrypt`](AesGcm::encrypt) or [`decrypt`](AesGcm::decrypt), push data
//! through [`update`](AesGcm::update) in any chunking, then read
//! [`authtag`](AesGcm::authtag) or check [`good`](AesGcm::good).
//!
//! ```text
//! INIT --encrypt()/decrypt()--> ENCRYPT|DECRYPT --authtag()/good()--> FINAL
//!   ^                                                                  |
//!   +------------------------------ clear() --------------------------+
//! ```
//!
//! Authentication always covers ciphertext: `update` folds its *output*
//! into GHASH while encrypting and its *input* while decrypting.

use crate::aes::{Aes, BLOCK_LEN};
use crate::error::CryptoError;
use crate::ghash::Ghash;

/// Authentication tag size in bytes.
pub const TAG_LEN: usize = 16;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum State {
    Init,
    Encrypt,
    Decrypt,
    Final,
}

/// Streaming AES-GCM session.
///
/// A session is reusable: [`clear`](AesGcm::clear) returns to `INIT` while
/// keeping the key, so one keyed instance can process many messages (each
/// under its own nonce).
pub struct AesGcm {
    aes: Aes,
    ghash: Ghash,
    authdata: Vec<u8>,
    nonce: Vec<u8>,
    /// Expected tag for the decrypt path, checked by `good()`.
    expected_tag: Vec<u8>,
    /// 128-bit counter block, incremented with full-width carry.
    counter: [u8; BLOCK_LEN],
    /// Keystream block reserved from J0; masks the tag, never data.
    key_stream0: [u8; BLOCK_LEN],
    /// Current data keystream block.
    key_stream: [u8; BLOCK_LEN],
    /// Consumption cursor into `key_stream` (0..16).
    pos: usize,
    tag: [u8; TAG_LEN],
    state: State,
}

impl Default for AesGcm {
    fn default() -> Self {
        Self::new()
    }
}

impl AesGcm {
    /// Create a session in `INIT` with no key material.
    pub fn new() -> Self {
        Self {
            aes: Aes::new(),
            ghash: Ghash::new(),
            authdata: Vec::new(),
            nonce: Vec::new(),
            expected_tag: Vec::new(),
            counter: [0u8; BLOCK_LEN],
            key_stream0: [0u8; BLOCK_LEN],
            key_stream: [0u8; BLOCK_LEN],
            pos: 0,
            tag: [0u8; TAG_LEN],
            state: State::Init,
        }
    }

    /// Configure AES-128 and derive the GHASH subkey.
    pub fn set_key128(&mut self, key: &[u8; 16]) -> &mut Self {
        self.aes.set_encrypt_key128(key);
        self.set_ghash_key();
        self
    }

    /// Configure AES-192 and derive the GHASH subkey.
    pub fn set_key192(&mut self, key: &[u8; 24]) -> &mut Self {
        self.aes.set_encrypt_key192(key);
        self.set_ghash_key();
        self
    }

    /// Configure AES-256 and derive the GHASH subkey.
    pub fn set_key256(&mut self, key: &[u8; 32]) -> &mut Self {
        self.aes.set_encrypt_key256(key);
        self.set_ghash_key();
        self
    }

    /// Configure AES from a key slice (16, 24, or 32 bytes).
    ///
    /// # Errors
    /// [`CryptoError::InvalidKeyLength`] for any other length.
    pub fn set_key(&mut self, key: &[u8]) -> Result<&mut Self, CryptoError> {
        self.aes.set_encrypt_key(key)?;
        self.set_ghash_key();
        Ok(self)
    }

    /// H = AES_K(0^128), fed to GHASH.
    fn set_ghash_key(&mut self) {
        let h = self.aes.encrypt(&[0u8; BLOCK_LEN]);
        self.ghash.set_key128(&h);
    }

    /// Set the associated data authenticated (but not encrypted) with the
    /// next message. Consulted at `encrypt()`/`decrypt()` time.
    pub fn add_authdata(&mut self, authdata: &[u8]) -> &mut Self {
        self.authdata = authdata.to_vec();
        self
    }

    /// Set the nonce for the next message. A 12-byte nonce takes the
    /// direct-counter path; any other length goes through GHASH.
    pub fn set_nonce(&mut self, nonce: &[u8]) -> &mut Self {
        self.nonce = nonce.to_vec();
        self
    }

    /// Supply the expected tag for the decrypt path, checked by
    /// [`good`](AesGcm::good).
    pub fn set_authtag(&mut self, tag: &[u8]) -> &mut Self {
        self.expected_tag = tag.to_vec();
        self
    }

    /// Start an encryption stream.
    ///
    /// # Panics
    /// Panics if the session is not in `INIT` (call
    /// [`clear`](AesGcm::clear) first), or if no key or nonce is set.
    pub fn encrypt(&mut self) -> &mut Self {
        self.begin(State::Encrypt)
    }

    /// Start a decryption stream. Identical setup to
    /// [`encrypt`](AesGcm::encrypt); only the GHASH ordering inside
    /// [`update`](AesGcm::update) differs.
    ///
    /// # Panics
    /// Same conditions as [`encrypt`](AesGcm::encrypt).
    pub fn decrypt(&mut self) -> &mut Self {
        self.begin(State::Decrypt)
    }

    fn begin(&mut self, next: State) -> &mut Self {
        assert!(
            self.state == State::Init,
            "encrypt()/decrypt() require a cleared session; call clear() first"
        );
        assert!(self.aes.is_keyed(), "a key must be set before encrypt()/decrypt()");
        assert!(!self.nonce.is_empty(), "a nonce must be set before encrypt()/decrypt()");

        self.reset_counter();
        self.tag = [0u8; TAG_LEN];
        self.ghash.set_authdata(&self.authdata);
        self.state = next;
        self
    }

    /// Build J0 from the nonce, reserve `keystream0 = E(J0)` for the tag
    /// mask, and advance to the first data keystream block.
    fn reset_counter(&mut self) {
        if self.nonce.len() == 12 {
            // J0 = nonce || 0x00000001
            self.counter[..12].copy_from_slice(&self.nonce);
            self.counter[12..].copy_from_slice(&[0, 0, 0, 1]);
        } else {
            // J0 = GHASH(nonce) with no associated data
            self.ghash.set_authdata(&[]);
            self.ghash.add(&self.nonce);
            self.counter = self.ghash.digest();
        }
        self.key_stream0 = self.aes.encrypt(&self.counter);
        self.increment_counter();
        self.pos = 0;
    }

    /// Fixed-width increment with carry propagation across all 16 bytes;
    /// no data-dependent branch. Regenerates the data keystream block.
    fn increment_counter(&mut self) {
        let mut carry = 1u16;
        for byte in self.counter.iter_mut().rev() {
            let sum = u16::from(*byte) + carry;
            *byte = sum as u8;
            carry = sum >> 8;
        }
        self.key_stream = self.aes.encrypt(&self.counter);
    }

    /// Transform the next chunk of the stream, returning ciphertext while
    /// encrypting and plaintext while decrypting. Chunks may straddle
    /// block boundaries arbitrarily.
    ///
    /// # Panics
    /// Panics unless preceded by [`encrypt`](AesGcm::encrypt) or
    /// [`decrypt`](AesGcm::decrypt) (and not yet finalized).
    pub fn update(&mut self, data: &[u8]) -> Vec<u8> {
        assert!(
            self.state == State::Encrypt || self.state == State::Decrypt,
            "update() requires encrypt() or decrypt()"
        );

        // GHASH covers ciphertext, never plaintext: fold the input before
        // decrypting, the output after encrypting.
        if self.state == State::Decrypt {
            self.ghash.add(data);
        }
        let mut out = Vec::with_capacity(data.len());
        for &byte in data {
            out.push(byte ^ self.key_stream[self.pos]);
            self.pos += 1;
            if self.pos == BLOCK_LEN {
                self.increment_counter();
                self.pos = 0;
            }
        }
        if self.state == State::Encrypt {
            self.ghash.add(&out);
        }
        out
    }

    /// Finalize GHASH with the lengths block, mask with `keystream0`, and
    /// return the 16-byte tag. Transitions to `FINAL`; further calls
    /// return the cached tag.
    ///
    /// # Panics
    /// Panics if called from `INIT`.
    pub fn authtag(&mut self) -> [u8; TAG_LEN] {
        match self.state {
            State::Encrypt | State::Decrypt => {
                let mut tag = self.ghash.digest();
                for (t, k) in tag.iter_mut().zip(self.key_stream0.iter()) {
                    *t ^= k;
                }
                self.tag = tag;
                self.state = State::Final;
            }
            State::Final => {}
            State::Init => panic!("authtag() requires encrypt() or decrypt()"),
        }
        self.tag
    }

    /// Finalize (via [`authtag`](AesGcm::authtag)) and compare against the
    /// expected tag from [`set_authtag`](AesGcm::set_authtag).
    ///
    /// The comparison runs exactly [`TAG_LEN`] iterations with a
    /// branch-free accumulator and no early return; a missing expected-tag
    /// byte reads as zero. On `false` the caller must discard the
    /// decrypted output.
    pub fn good(&mut self) -> bool {
        let tag = self.authtag();
        let mut diff = 0u8;
        for (i, &byte) in tag.iter().enumerate() {
            let expected = self.expected_tag.get(i).copied().unwrap_or(0);
            diff |= byte ^ expected;
        }
        diff == 0
    }

    /// Return to `INIT`, discarding the associated data, nonce, expected
    /// tag, cached tag, and cursor. Key material is untouched; replace it
    /// with `set_key*` if the next message needs a different key.
    pub fn clear(&mut self) -> &mut Self {
        self.authdata.clear();
        self.nonce.clear();
        self.expected_tag.clear();
        self.tag = [0u8; TAG_LEN];
        self.pos = 0;
        self.state = State::Init;
        self
    }

    /// One-shot encrypt: returns `(ciphertext, tag)`. Resets the session
    /// around the call; the key must already be set.
    pub fn seal(&mut self, nonce: &[u8], authdata: &[u8], plaintext: &[u8]) -> (Vec<u8>, [u8; TAG_LEN]) {
        self.clear().set_nonce(nonce).add_authdata(authdata).encrypt();
        let ciphertext = self.update(plaintext);
        let tag = self.authtag();
        self.clear();
        (ciphertext, tag)
    }

    /// One-shot decrypt-and-verify.
    ///
    /// # Errors
    /// [`CryptoError::AuthenticationFailed`] on tag mismatch; the
    /// decrypted bytes are dropped rather than returned.
    pub fn open(
        &mut self,
        nonce: &[u8],
        authdata: &[u8],
        ciphertext: &[u8],
        tag: &[u8; TAG_LEN],
    ) -> Result<Vec<u8>, CryptoError> {
        self.clear().set_nonce(nonce).add_authdata(authdata).set_authtag(tag).decrypt();
        let plaintext = self.update(ciphertext);
        let ok = self.good();
        self.clear();
        if ok {
            Ok(plaintext)
        } else {
            Err(CryptoError::AuthenticationFailed)
        }
    }
}
