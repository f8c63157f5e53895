//! MD5 compression core per RFC 1321.
//!
//! Shares the streaming scaffold in [`crate::digest`] with SHA-256. The
//! word order and the length trailer are little-endian here, where SHA-256
//! is big-endian; that divergence is the whole reason the endianness hooks
//! exist on [`BlockCompressor`].

use crate::digest::{BLOCK_LEN, BlockCompressor, Digest};

/// The sine-derived constants T[i] = floor(2³² × |sin(i + 1)|).
const T: [u32; 64] = [
    0xd76aa478, 0xe8c7b756, 0x242070db, 0xc1bdceee,
    0xf57c0faf, 0x4787c62a, 0xa8304613, 0xfd469501,
    0x698098d8, 0x8b44f7af, 0xffff5bb1, 0x895cd7be,
    0x6b901122, 0xfd987193, 0xa679438e, 0x49b40821,
    0xf61e2562, 0xc040b340, 0x265e5a51, 0xe9b6c7aa,
    0xd62f105d, 0x02441453, 0xd8a1e681, 0xe7d3fbc8,
    0x21e1cde6, 0xc33707d6, 0xf4d50d87, 0x455a14ed,
    0xa9e3e905, 0xfcefa3f8, 0x676f02d9, 0x8d2a4c8a,
    0xfffa3942, 0x8771f681, 0x6d9d6122, 0xfde5380c,
    0xa4beea44, 0x4bdecfa9, 0xf6bb4b60, 0xbebfbc70,
    0x289b7ec6, 0xeaa127fa, 0xd4ef3085, 0x04881d05,
    0xd9d4d039, 0xe6db99e5, 0x1fa27cf8, 0xc4ac5665,
    0xf4292244, 0x432aff97, 0xab9423a7, 0xfc93a039,
    0x655b59c3, 0x8f0ccc92, 0xffeff47d, 0x85845dd1,
    0x6fa87e4f, 0xfe2ce6e0, 0xa3014314, 0x4e0811a1,
    0xf7537e82, 0xbd3af235, 0x2ad7d2bb, 0xeb86d391,
];

/// Per-round left-rotation amounts, four per round group.
const S: [u32; 16] = [
    7, 12, 17, 22,
    5, 9, 14, 20,
    4, 11, 16, 23,
    6, 10, 15, 21,
];

const STATE_INIT: [u32; 4] = [0x67452301, 0xefcdab89, 0x98badcfe, 0x10325476];

/// MD5 output size in bytes.
pub const OUT_LEN: usize = 16;

/// Streaming MD5 digest engine.
pub type Md5 = Digest<Md5Core>;

/// MD5 chaining state (4 × 32-bit words).
pub struct Md5Core {
    state: [u32; 4],
}

impl BlockCompressor for Md5Core {
    const OUT_LEN: usize = OUT_LEN;

    fn new() -> Self {
        Self { state: STATE_INIT }
    }

    fn reset(&mut self) {
        self.state = STATE_INIT;
    }

    /// Process a single 512-bit (64-byte) block.
    fn compress(&mut self, block: &[u8; BLOCK_LEN]) {
        // Message words are little-endian
        let mut m = [0u32; 16];
        for t in 0..16 {
            m[t] = u32::from_le_bytes([
                block[t * 4],
                block[t * 4 + 1],
                block[t * 4 + 2],
                block[t * 4 + 3],
            ]);
        }

        let mut a = self.state[0];
        let mut b = self.state[1];
        let mut c = self.state[2];
        let mut d = self.state[3];

        for i in 0..64 {
            // Round function and message-word index per round group (RFC 1321 §3.4)
            let (f, g) = match i / 16 {
                0 => ((b & c) | (!b & d), i),
                1 => ((d & b) | (!d & c), (5 * i + 1) % 16),
                2 => (b ^ c ^ d, (3 * i + 5) % 16),
                _ => (c ^ (b | !d), (7 * i) % 16),
            };
            let shift = S[(i / 16) * 4 + (i % 4)];

            let rotated = a
                .wrapping_add(f)
                .wrapping_add(T[i])
                .wrapping_add(m[g])
                .rotate_left(shift);

            let next_b = b.wrapping_add(rotated);
            a = d;
            d = c;
            c = b;
            b = next_b;
        }

        self.state[0] = self.state[0].wrapping_add(a);
        self.state[1] = self.state[1].wrapping_add(b);
        self.state[2] = self.state[2].wrapping_add(c);
        self.state[3] = self.state[3].wrapping_add(d);
    }

    /// The message length trailer is little-endian.
    fn length_field(bit_len: u64) -> [u8; 8] {
        bit_len.to_le_bytes()
    }

    fn emit(&self, out: &mut [u8]) {
        for (i, word) in self.state.iter().enumerate() {
            out[i * 4..i * 4 + 4].copy_from_slice(&word.to_le_bytes());
        }
    }
}

/// One-shot MD5 convenience function.
pub fn md5(data: &[u8]) -> [u8; OUT_LEN] {
    let mut out = [0u8; OUT_LEN];
    out.copy_from_slice(&Md5::new().add(data).digest());
    out
}
