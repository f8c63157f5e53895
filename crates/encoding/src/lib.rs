//! # Base64 Codecs
//!
//! Encoding and decoding across the three base64 alphabets used by the
//! crypto crates: MIME base64 (76-column wrapped), URL-safe base64
//! (unpadded), and crypt-style base64 (unpadded, `.` in place of `+`) as
//! used by PBKDF2 hash strings. **Zero external dependencies.**
//!
//! Decoders are strict: invalid characters, misplaced padding, impossible
//! lengths, and non-zero trailing bits all yield `None`. They never panic.

#![forbid(unsafe_code)]

/// Standard base64 alphabet (RFC 4648 §4).
const STD_ALPHABET: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

/// URL-safe base64 alphabet (RFC 4648 §5).
const URL_ALPHABET: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";

/// Crypt-style alphabet: the standard alphabet with `+` replaced by `.`,
/// as used inside `$pbkdf2-sha256$` hash strings.
const CRYPT_ALPHABET: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789./";

/// Maximum encoded line width for wrapped MIME output.
const LINE_WIDTH: usize = 76;

const fn invert(alphabet: &[u8; 64]) -> [i8; 256] {
    let mut table = [-1i8; 256];
    let mut i = 0;
    while i < 64 {
        table[alphabet[i] as usize] = i as i8;
        i += 1;
    }
    table
}

const STD_DECODE: [i8; 256] = invert(STD_ALPHABET);
const URL_DECODE: [i8; 256] = invert(URL_ALPHABET);
const CRYPT_DECODE: [i8; 256] = invert(CRYPT_ALPHABET);

/// Encode with MIME conventions: lines wrapped at 76 columns, each line
/// (including the last) terminated by `"\n"`.
pub fn encode_base64(data: &[u8]) -> String {
    encode_base64_with(data, "\n")
}

/// Encode with MIME conventions and a caller-chosen line terminator.
///
/// An empty `eol` disables wrapping and yields the bare encoding.
pub fn encode_base64_with(data: &[u8], eol: &str) -> String {
    let raw = encode_raw(STD_ALPHABET, data, true);
    if eol.is_empty() || raw.is_empty() {
        return raw;
    }
    let mut out = String::with_capacity(raw.len() + (raw.len() / LINE_WIDTH + 1) * eol.len());
    let mut offset = 0;
    while offset < raw.len() {
        let end = (offset + LINE_WIDTH).min(raw.len());
        // raw is pure ASCII, so byte positions never split a character
        out.push_str(&raw[offset..end]);
        out.push_str(eol);
        offset = end;
    }
    out
}

/// Encode with the URL-safe alphabet, without padding.
pub fn encode_base64url(data: &[u8]) -> String {
    encode_raw(URL_ALPHABET, data, false)
}

/// Encode with the crypt-style alphabet, without padding.
pub fn encode_base64crypt(data: &[u8]) -> String {
    encode_raw(CRYPT_ALPHABET, data, false)
}

/// Decode MIME base64. ASCII whitespace is skipped; padding is required.
///
/// Returns `None` on malformed input.
pub fn decode_base64(input: &str) -> Option<Vec<u8>> {
    decode_raw(&STD_DECODE, input, true, true)
}

/// Decode unpadded URL-safe base64. Returns `None` on malformed input.
pub fn decode_base64url(input: &str) -> Option<Vec<u8>> {
    decode_raw(&URL_DECODE, input, false, false)
}

/// Decode unpadded crypt-style base64. Returns `None` on malformed input.
pub fn decode_base64crypt(input: &str) -> Option<Vec<u8>> {
    decode_raw(&CRYPT_DECODE, input, false, false)
}

fn encode_raw(alphabet: &[u8; 64], data: &[u8], pad: bool) -> String {
    let mut out = String::with_capacity(data.len().div_ceil(3) * 4);
    let mut chunks = data.chunks_exact(3);
    for chunk in &mut chunks {
        let n = (u32::from(chunk[0]) << 16) | (u32::from(chunk[1]) << 8) | u32::from(chunk[2]);
        out.push(alphabet[(n >> 18) as usize & 0x3f] as char);
        out.push(alphabet[(n >> 12) as usize & 0x3f] as char);
        out.push(alphabet[(n >> 6) as usize & 0x3f] as char);
        out.push(alphabet[n as usize & 0x3f] as char);
    }
    match chunks.remainder() {
        [b0] => {
            let n = u32::from(*b0) << 16;
            out.push(alphabet[(n >> 18) as usize & 0x3f] as char);
            out.push(alphabet[(n >> 12) as usize & 0x3f] as char);
            if pad {
                out.push_str("==");
            }
        }
        [b0, b1] => {
            let n = (u32::from(*b0) << 16) | (u32::from(*b1) << 8);
            out.push(alphabet[(n >> 18) as usize & 0x3f] as char);
            out.push(alphabet[(n >> 12) as usize & 0x3f] as char);
            out.push(alphabet[(n >> 6) as usize & 0x3f] as char);
            if pad {
                out.push('=');
            }
        }
        _ => {}
    }
    out
}

fn decode_raw(table: &[i8; 256], input: &str, padded: bool, skip_ws: bool) -> Option<Vec<u8>> {
    let mut values: Vec<u8> = Vec::with_capacity(input.len());
    let mut pad_count = 0usize;
    for &byte in input.as_bytes() {
        if skip_ws && matches!(byte, b' ' | b'\t' | b'\r' | b'\n') {
            continue;
        }
        if padded && byte == b'=' {
            pad_count += 1;
            continue;
        }
        if pad_count > 0 {
            // data after padding
            return None;
        }
        let value = table[byte as usize];
        if value < 0 {
            return None;
        }
        values.push(value as u8);
    }

    if padded {
        if (values.len() + pad_count) % 4 != 0 {
            return None;
        }
        let expected_pad = match values.len() % 4 {
            0 => 0,
            2 => 2,
            3 => 1,
            _ => return None,
        };
        if pad_count != expected_pad {
            return None;
        }
    } else if values.len() % 4 == 1 {
        return None;
    }

    let mut out = Vec::with_capacity(values.len() * 3 / 4);
    let mut groups = values.chunks_exact(4);
    for group in &mut groups {
        let n = (u32::from(group[0]) << 18)
            | (u32::from(group[1]) << 12)
            | (u32::from(group[2]) << 6)
            | u32::from(group[3]);
        out.push((n >> 16) as u8);
        out.push((n >> 8) as u8);
        out.push(n as u8);
    }
    match groups.remainder() {
        [v0, v1] => {
            if v1 & 0x0f != 0 {
                // non-zero trailing bits
                return None;
            }
            out.push((v0 << 2) | (v1 >> 4));
        }
        [v0, v1, v2] => {
            if v2 & 0x03 != 0 {
                return None;
            }
            out.push((v0 << 2) | (v1 >> 4));
            out.push((v1 << 4) | (v2 >> 2));
        }
        _ => {}
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    // RFC 4648 §10 vectors

    #[test]
    fn rfc4648_encode() {
        assert_eq!(encode_base64_with(b"", ""), "");
        assert_eq!(encode_base64_with(b"f", ""), "Zg==");
        assert_eq!(encode_base64_with(b"fo", ""), "Zm8=");
        assert_eq!(encode_base64_with(b"foo", ""), "Zm9v");
        assert_eq!(encode_base64_with(b"foob", ""), "Zm9vYg==");
        assert_eq!(encode_base64_with(b"fooba", ""), "Zm9vYmE=");
        assert_eq!(encode_base64_with(b"foobar", ""), "Zm9vYmFy");
    }

    #[test]
    fn rfc4648_decode() {
        assert_eq!(decode_base64(""), Some(vec![]));
        assert_eq!(decode_base64("Zg=="), Some(b"f".to_vec()));
        assert_eq!(decode_base64("Zm8="), Some(b"fo".to_vec()));
        assert_eq!(decode_base64("Zm9v"), Some(b"foo".to_vec()));
        assert_eq!(decode_base64("Zm9vYg=="), Some(b"foob".to_vec()));
        assert_eq!(decode_base64("Zm9vYmE="), Some(b"fooba".to_vec()));
        assert_eq!(decode_base64("Zm9vYmFy"), Some(b"foobar".to_vec()));
    }

    #[test]
    fn wraps_at_76_columns() {
        // 60 input bytes encode to 80 characters: one full line plus 4
        let data: Vec<u8> = (0u8..60).collect();
        let encoded = encode_base64(&data);
        let lines: Vec<&str> = encoded.split('\n').collect();
        assert_eq!(lines.len(), 3); // two content lines plus trailing empty split
        assert_eq!(lines[0].len(), 76);
        assert_eq!(lines[1], "OTo7");
        assert_eq!(lines[2], "");
        assert_eq!(decode_base64(&encoded), Some(data));
    }

    #[test]
    fn custom_line_terminator() {
        let data: Vec<u8> = (0u8..60).collect();
        let encoded = encode_base64_with(&data, "\r\n");
        assert!(encoded.ends_with("OTo7\r\n"));
        assert_eq!(decode_base64(&encoded), Some(data));
    }

    #[test]
    fn empty_input_has_no_terminator() {
        assert_eq!(encode_base64(b""), "");
    }

    #[test]
    fn url_alphabet_differs() {
        // 0xfb 0xff 0xbf exercises the two alphabet-specific codepoints
        assert_eq!(encode_base64url(&[0xfb, 0xff, 0xbf]), "-_-_");
        assert_eq!(decode_base64url("-_-_"), Some(vec![0xfb, 0xff, 0xbf]));
        assert_eq!(encode_base64url(b"foobar"), "Zm9vYmFy");
    }

    #[test]
    fn url_is_unpadded() {
        assert_eq!(encode_base64url(b"f"), "Zg");
        assert_eq!(decode_base64url("Zg"), Some(b"f".to_vec()));
        // padding characters are not part of the unpadded alphabet
        assert_eq!(decode_base64url("Zg=="), None);
    }

    #[test]
    fn crypt_alphabet_maps_plus_to_dot() {
        assert_eq!(encode_base64crypt(&[0xfb, 0xff, 0xbf]), "././");
        assert_eq!(decode_base64crypt("././"), Some(vec![0xfb, 0xff, 0xbf]));
        assert_eq!(encode_base64crypt(&[0xff, 0xef]), "/.8");
        assert_eq!(decode_base64crypt("/.8"), Some(vec![0xff, 0xef]));
        // '+' belongs to the standard alphabet only
        assert_eq!(decode_base64crypt("+A"), None);
    }

    #[test]
    fn rejects_invalid_characters() {
        assert_eq!(decode_base64("Zm9v!"), None);
        assert_eq!(decode_base64url("Zm9v~"), None);
        assert_eq!(decode_base64crypt("Zm 9v"), None); // no whitespace skipping
    }

    #[test]
    fn rejects_misplaced_padding() {
        assert_eq!(decode_base64("Z=g="), None);
        assert_eq!(decode_base64("Zg==Zg=="), None);
        assert_eq!(decode_base64("Zg="), None);
        assert_eq!(decode_base64("Zm9v=="), None);
    }

    #[test]
    fn rejects_impossible_lengths() {
        assert_eq!(decode_base64("Z"), None);
        assert_eq!(decode_base64url("Z"), None);
        assert_eq!(decode_base64crypt("Zm9vY"), None);
    }

    #[test]
    fn rejects_nonzero_trailing_bits() {
        // "Zh" carries one byte plus non-zero spill bits; strict decode refuses
        assert_eq!(decode_base64url("Zg"), Some(b"f".to_vec()));
        assert_eq!(decode_base64url("Zh"), None);
        assert_eq!(decode_base64crypt("Zm8"), Some(vec![0x66, 0x6f]));
        assert_eq!(decode_base64crypt("Zm9"), None);
    }

    #[test]
    fn whitespace_skipped_in_mime_only() {
        assert_eq!(decode_base64("Zm9v\nYmFy"), Some(b"foobar".to_vec()));
        assert_eq!(decode_base64(" Zm9v\tYmFy\r\n"), Some(b"foobar".to_vec()));
        assert_eq!(decode_base64url("Zm9v\nYmFy"), None);
    }

    #[test]
    fn embedded_zero_bytes_roundtrip() {
        let data = vec![0u8, 0, 0, 1, 0, 255, 0];
        assert_eq!(decode_base64(&encode_base64(&data)), Some(data.clone()));
        assert_eq!(decode_base64url(&encode_base64url(&data)), Some(data.clone()));
        assert_eq!(decode_base64crypt(&encode_base64crypt(&data)), Some(data));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn mime_roundtrip(data in proptest::collection::vec(any::<u8>(), 0..256)) {
                prop_assert_eq!(decode_base64(&encode_base64(&data)), Some(data));
            }

            #[test]
            fn url_roundtrip(data in proptest::collection::vec(any::<u8>(), 0..256)) {
                prop_assert_eq!(decode_base64url(&encode_base64url(&data)), Some(data));
            }

            #[test]
            fn crypt_roundtrip(data in proptest::collection::vec(any::<u8>(), 0..256)) {
                prop_assert_eq!(decode_base64crypt(&encode_base64crypt(&data)), Some(data));
            }
        }
    }
}
