//! PBKDF2-HMAC-SHA256 per RFC 8018, with passlib-compatible hash strings.
//!
//! [`encrypt`] produces `$pbkdf2-sha256$<rounds>$<salt>$<key>` with the
//! salt and derived key in crypt-style base64, field-for-field compatible
//! with the passlib `pbkdf2_sha256` handler. [`verify`] parses such a
//! string and recomputes; any parse failure is an ordinary `false`, never
//! a panic.

use crate::constant_time::ct_eq;
use crate::hmac::HmacSha256;
use encoding::{decode_base64crypt, encode_base64crypt};
use zeroize::Zeroize;

/// Default iteration count for new hash strings.
pub const DEFAULT_ROUNDS: u32 = 6400;
/// Default random salt length in bytes.
pub const SALT_LEN: usize = 16;
/// Derived key length: one HMAC-SHA256 output.
pub const KEY_LEN: usize = 32;

/// Scheme tag inside the hash string.
const SCHEME: &str = "pbkdf2-sha256";

/// Derive a 32-byte key: `U1 = HMAC(password, salt || BE32(1))`,
/// `Uk = HMAC(password, Uk-1)`, key = `U1 ⊕ … ⊕ Urounds`.
///
/// The derived length equals one HMAC-SHA256 output, so exactly one
/// output block is produced.
///
/// # Panics
/// Panics if `rounds` is zero.
pub fn derive(password: &[u8], salt: &[u8], rounds: u32) -> [u8; KEY_LEN] {
    assert!(rounds >= 1, "PBKDF2 requires at least one round");

    let mut mac = HmacSha256::new(password);
    mac.add(salt).add(&1u32.to_be_bytes());
    let mut u = [0u8; KEY_LEN];
    u.copy_from_slice(&mac.digest());
    let mut key = u;

    for _ in 1..rounds {
        mac.add(&u);
        u.copy_from_slice(&mac.digest());
        for (k, &b) in key.iter_mut().zip(u.iter()) {
            *k ^= b;
        }
    }
    u.zeroize();
    key
}

/// Hash `password` with a fresh random 16-byte salt and the default round
/// count, producing a `$pbkdf2-sha256$…` hash string.
///
/// # Panics
/// Panics if the operating system RNG fails.
pub fn encrypt(password: &[u8]) -> String {
    let mut salt = [0u8; SALT_LEN];
    getrandom::fill(&mut salt).expect("operating system RNG failure");
    encrypt_with(password, DEFAULT_ROUNDS, &salt)
}

/// Hash `password` with a caller-supplied round count and salt.
///
/// # Panics
/// Panics if `rounds` is zero.
pub fn encrypt_with(password: &[u8], rounds: u32, salt: &[u8]) -> String {
    let key = derive(password, salt, rounds);
    format!(
        "${}${}${}${}",
        SCHEME,
        rounds,
        encode_base64crypt(salt),
        encode_base64crypt(&key)
    )
}

/// Check `password` against a `$pbkdf2-sha256$…` hash string.
///
/// Returns `false` on any malformed input — wrong field count, unknown
/// scheme, non-decimal or zero round count, undecodable salt or key, or a
/// key of the wrong length. The key comparison runs in constant time.
pub fn verify(password: &[u8], hash: &str) -> bool {
    let mut fields = hash.split('$');
    // the string starts with '$', so the first field is empty
    if fields.next() != Some("") {
        return false;
    }
    if fields.next() != Some(SCHEME) {
        return false;
    }
    let (Some(rounds_field), Some(salt_field), Some(key_field), None) =
        (fields.next(), fields.next(), fields.next(), fields.next())
    else {
        return false;
    };

    if rounds_field.is_empty() || !rounds_field.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    let Ok(rounds) = rounds_field.parse::<u32>() else {
        return false;
    };
    if rounds == 0 {
        return false;
    }
    let Some(salt) = decode_base64crypt(salt_field) else {
        return false;
    };
    let Some(key) = decode_base64crypt(key_field) else {
        return false;
    };
    if key.len() != KEY_LEN {
        return false;
    }

    let derived = derive(password, &salt, rounds);
    ct_eq(&derived, &key)
}
