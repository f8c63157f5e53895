//! HMAC implementation per RFC 2104 / RFC 4231.
//!
//! HMAC(K, m) = H((K' ⊕ opad) || H((K' ⊕ ipad) || m))
//! where K' is the key padded (or hashed down) to the block size.
//!
//! Generic over any [`BlockCompressor`], so the same construction serves
//! HMAC-SHA256 and HMAC-MD5.

use crate::digest::{BLOCK_LEN, BlockCompressor, Digest, hex};
use crate::md5::Md5Core;
use crate::sha256::Sha256Core;
use zeroize::Zeroize;

/// Streaming keyed authenticator over the digest algorithm `C`.
///
/// The key is fixed at construction; there is no rekey operation. Message
/// bytes extend the inner digest only; the outer pass runs lazily when the
/// MAC is read. Reading re-primes the instance, so a following
/// [`Hmac::add`] starts a fresh message under the same key.
pub struct Hmac<C: BlockCompressor> {
    /// Inner hash, primed with (K' ⊕ ipad).
    inner: Digest<C>,
    /// Inner key pad, kept to re-prime after a read.
    ipad: [u8; BLOCK_LEN],
    /// Outer key pad, used by the lazy outer pass.
    opad: [u8; BLOCK_LEN],
}

/// HMAC-SHA256 (32-byte MACs).
pub type HmacSha256 = Hmac<Sha256Core>;
/// HMAC-MD5 (16-byte MACs).
pub type HmacMd5 = Hmac<Md5Core>;

impl<C: BlockCompressor> Hmac<C> {
    /// Construct an authenticator for `key`.
    ///
    /// A key longer than the 64-byte block is hashed down first; a shorter
    /// one is zero-padded.
    pub fn new(key: &[u8]) -> Self {
        let mut k_prime = [0u8; BLOCK_LEN];
        if key.len() > BLOCK_LEN {
            let hashed = Digest::<C>::new().add(key).digest();
            k_prime[..C::OUT_LEN].copy_from_slice(&hashed);
        } else {
            k_prime[..key.len()].copy_from_slice(key);
        }

        let mut ipad = [0u8; BLOCK_LEN];
        let mut opad = [0u8; BLOCK_LEN];
        for i in 0..BLOCK_LEN {
            ipad[i] = k_prime[i] ^ 0x36;
            opad[i] = k_prime[i] ^ 0x5c;
        }
        k_prime.zeroize();

        let mut inner = Digest::new();
        inner.add(&ipad);
        Self { inner, ipad, opad }
    }

    /// Append message bytes to the inner digest.
    pub fn add(&mut self, data: &[u8]) -> &mut Self {
        self.inner.add(data);
        self
    }

    /// Compute `H(opad || H(ipad || message))`, then re-prime for the next
    /// message under the same key.
    pub fn digest(&mut self) -> Vec<u8> {
        let inner_digest = self.inner.digest(); // the read resets the inner engine
        self.inner.add(&self.ipad);
        let mut outer = Digest::<C>::new();
        outer.add(&self.opad).add(&inner_digest);
        outer.digest()
    }

    /// Like [`Hmac::digest`], rendered as lowercase hex.
    pub fn hexdigest(&mut self) -> String {
        hex(&self.digest())
    }
}

impl<C: BlockCompressor> Drop for Hmac<C> {
    fn drop(&mut self) {
        self.ipad.zeroize();
        self.opad.zeroize();
    }
}

/// One-shot HMAC-SHA256 convenience function.
pub fn hmac_sha256(key: &[u8], data: &[u8]) -> [u8; 32] {
    let mut out = [0u8; 32];
    out.copy_from_slice(&HmacSha256::new(key).add(data).digest());
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Helper to parse hex string to bytes
    fn from_hex(s: &str) -> Vec<u8> {
        let s = s.replace(' ', "");
        let mut v = Vec::with_capacity(s.len() / 2);
        let mut i = 0;
        while i < s.len() {
            let byte = u8::from_str_radix(&s[i..i + 2], 16).unwrap();
            v.push(byte);
            i += 2;
        }
        v
    }

    // RFC 4231 Test Vectors for HMAC-SHA256

    #[test]
    fn test_rfc4231_case1() {
        // Key  = 0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b (20 bytes)
        // Data = "Hi There"
        let key = from_hex("0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b");
        let tag = hmac_sha256(&key, b"Hi There");
        assert_eq!(
            hex(&tag),
            "b0344c61d8db38535ca8afceaf0bf12b881dc200c9833da726e9376c2e32cff7"
        );
    }

    #[test]
    fn test_rfc4231_case2() {
        // Key = "Jefe", Data = "what do ya want for nothing?"
        let mut mac = HmacSha256::new(b"Jefe");
        assert_eq!(
            mac.add(b"what do ya want for nothing?").hexdigest(),
            "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
        );
    }

    #[test]
    fn test_rfc4231_case3() {
        // Key  = aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa (20 bytes)
        // Data = 0xdd repeated 50 times
        let key = from_hex("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa");
        let tag = hmac_sha256(&key, &[0xddu8; 50]);
        assert_eq!(
            hex(&tag),
            "773ea91e36800e46854db8ebd09181a72959098b3ef8c122d9635514ced565fe"
        );
    }

    #[test]
    fn test_rfc4231_case4() {
        // Key  = 0102030405060708090a0b0c0d0e0f10111213141516171819 (25 bytes)
        // Data = 0xcd repeated 50 times
        let key = from_hex("0102030405060708090a0b0c0d0e0f10111213141516171819");
        let tag = hmac_sha256(&key, &[0xcdu8; 50]);
        assert_eq!(
            hex(&tag),
            "82558a389a443c0ea4cc819899f2083a85f0faa3e578f8077a2e3ff46729665b"
        );
    }

    #[test]
    fn test_rfc4231_case6() {
        // Key larger than block size (131 bytes): hashed down first
        let key = vec![0xaau8; 131];
        let tag = hmac_sha256(&key, b"Test Using Larger Than Block-Size Key - Hash Key First");
        assert_eq!(
            hex(&tag),
            "60e431591ee0b67f0d8a26aacbf5b77f8e0bc6213728c5140546040f0ee37f54"
        );
    }

    #[test]
    fn test_rfc4231_case7() {
        // Key and data both larger than the block size
        let key = vec![0xaau8; 131];
        let data = b"This is a test using a larger than block-size key and a larger than block-size data. The key needs to be hashed before being used by the HMAC algorithm.";
        let tag = hmac_sha256(&key, data);
        assert_eq!(
            hex(&tag),
            "9b09ffa71b942fcb27635fbcd5b0e944bfdc63644f0713938a7f51535c3a35e2"
        );
    }

    // RFC 2202 Test Vector for HMAC-MD5

    #[test]
    fn test_rfc2202_md5_case2() {
        let mut mac = HmacMd5::new(b"Jefe");
        assert_eq!(
            mac.add(b"what do ya want for nothing?").hexdigest(),
            "750c783e6ab0b503eaa86e310a5db738"
        );
    }

    #[test]
    fn test_streaming_matches_one_shot() {
        let key = b"secret key";
        let data = b"Hello, World! This is a test of streaming HMAC.";
        let expected = hmac_sha256(key, data);

        let mut mac = HmacSha256::new(key);
        mac.add(&data[..13]).add(&data[13..]);
        assert_eq!(mac.digest(), expected.to_vec());
    }

    #[test]
    fn test_read_reprimes_for_next_message() {
        let mut mac = HmacSha256::new(b"Jefe");
        let first = mac.add(b"what do ya want for nothing?").hexdigest();
        // Same message on the same instance must yield the same MAC
        let again = mac.add(b"what do ya want for nothing?").hexdigest();
        assert_eq!(first, again);
        // And a different message must match a fresh instance
        let other = mac.add(b"something else").digest();
        let mut fresh = HmacSha256::new(b"Jefe");
        assert_eq!(other, fresh.add(b"something else").digest());
    }

    #[test]
    fn test_block_sized_key_is_used_verbatim() {
        let key = [0x42u8; 64];
        let direct = hmac_sha256(&key, b"data");
        // A 64-byte key neither gets hashed nor padded
        let mut mac = HmacSha256::new(&key);
        assert_eq!(mac.add(b"data").digest(), direct.to_vec());
    }
}
