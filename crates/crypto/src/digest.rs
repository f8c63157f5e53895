//! Generic streaming message-digest engine.
//!
//! SHA-256 and MD5 share the same 64-byte-block Merkle–Damgård scaffold and
//! differ only in their compression function and in the endianness of the
//! length trailer. The scaffold lives here, generic over a
//! [`BlockCompressor`] strategy; the per-algorithm cores live in
//! [`crate::sha256`] and [`crate::md5`].

/// Block size shared by both compressors, in bytes.
pub const BLOCK_LEN: usize = 64;

/// Compression-function strategy plugged into [`Digest`].
pub trait BlockCompressor {
    /// Digest output size in bytes.
    const OUT_LEN: usize;

    /// Chaining state seeded with the algorithm's initial constants.
    fn new() -> Self;

    /// Restore the chaining state to the initial constants.
    fn reset(&mut self);

    /// Fold one 64-byte block into the chaining state.
    fn compress(&mut self, block: &[u8; BLOCK_LEN]);

    /// Serialize the message bit length for the padding trailer:
    /// big-endian for SHA-256, little-endian for MD5.
    fn length_field(bit_len: u64) -> [u8; 8];

    /// Write the chaining state into `out`, which is `OUT_LEN` bytes long.
    fn emit(&self, out: &mut [u8]);
}

/// Streaming digest engine over a [`BlockCompressor`].
///
/// Operations mutate in place and return `&mut Self` for chaining. Reading
/// the digest with [`Digest::digest`] or [`Digest::hexdigest`]
/// re-initializes the engine, so a following [`Digest::add`] starts a fresh
/// message with no explicit reset.
pub struct Digest<C: BlockCompressor> {
    core: C,
    /// Partial block buffer. Invariant: `buf_len < BLOCK_LEN` between calls.
    buf: [u8; BLOCK_LEN],
    buf_len: usize,
    /// Total number of message bytes absorbed so far.
    total_len: u64,
    finished: bool,
}

impl<C: BlockCompressor> Default for Digest<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: BlockCompressor> Digest<C> {
    /// Create an engine in its creation state.
    pub fn new() -> Self {
        Self {
            core: C::new(),
            buf: [0u8; BLOCK_LEN],
            buf_len: 0,
            total_len: 0,
            finished: false,
        }
    }

    /// Return the engine to its creation state.
    pub fn reset(&mut self) -> &mut Self {
        self.core.reset();
        self.buf = [0u8; BLOCK_LEN];
        self.buf_len = 0;
        self.total_len = 0;
        self.finished = false;
        self
    }

    /// Append message bytes. Whole blocks are compressed immediately; the
    /// remainder is buffered.
    ///
    /// After a `finish()` (read or not), `add` starts a fresh message.
    pub fn add(&mut self, data: &[u8]) -> &mut Self {
        if self.finished {
            self.reset();
        }
        self.total_len += data.len() as u64;
        let mut offset = 0;

        // Top up a partially filled buffer first
        if self.buf_len > 0 {
            let space = BLOCK_LEN - self.buf_len;
            let to_copy = data.len().min(space);
            self.buf[self.buf_len..self.buf_len + to_copy].copy_from_slice(&data[..to_copy]);
            self.buf_len += to_copy;
            offset += to_copy;

            if self.buf_len == BLOCK_LEN {
                let block = self.buf;
                self.core.compress(&block);
                self.buf_len = 0;
            }
        }

        // Full blocks straight from the input
        while offset + BLOCK_LEN <= data.len() {
            let block: &[u8; BLOCK_LEN] = data[offset..offset + BLOCK_LEN].try_into().unwrap();
            self.core.compress(block);
            offset += BLOCK_LEN;
        }

        // Buffer the tail
        let remaining = data.len() - offset;
        if remaining > 0 {
            self.buf[..remaining].copy_from_slice(&data[offset..]);
            self.buf_len = remaining;
        }
        self
    }

    /// Apply Merkle–Damgård padding and compress the final block(s):
    /// a `0x80` byte, zeros up to the length field, then the message bit
    /// length in the compressor's endianness.
    ///
    /// Idempotent: a second `finish()` before any further `add` is a no-op.
    pub fn finish(&mut self) -> &mut Self {
        if self.finished {
            return self;
        }
        let total_bits = self.total_len.wrapping_mul(8);

        self.buf[self.buf_len] = 0x80;
        self.buf_len += 1;

        // No room for the 8-byte length field: close this block first
        if self.buf_len > BLOCK_LEN - 8 {
            for byte in &mut self.buf[self.buf_len..] {
                *byte = 0;
            }
            let block = self.buf;
            self.core.compress(&block);
            self.buf = [0u8; BLOCK_LEN];
            self.buf_len = 0;
        }

        for byte in &mut self.buf[self.buf_len..BLOCK_LEN - 8] {
            *byte = 0;
        }
        self.buf[BLOCK_LEN - 8..].copy_from_slice(&C::length_field(total_bits));
        let block = self.buf;
        self.core.compress(&block);
        self.finished = true;
        self
    }

    /// Finalize if needed, return the raw digest, and reset for reuse.
    pub fn digest(&mut self) -> Vec<u8> {
        self.finish();
        let mut out = vec![0u8; C::OUT_LEN];
        self.core.emit(&mut out);
        self.reset();
        out
    }

    /// Finalize if needed, return the lowercase hex digest, and reset.
    pub fn hexdigest(&mut self) -> String {
        hex(&self.digest())
    }
}

/// Lowercase hexadecimal rendering of a byte string.
pub fn hex(bytes: &[u8]) -> String {
    let mut s = String::with_capacity(bytes.len() * 2);
    for &b in bytes {
        s.push_str(&format!("{:02x}", b));
    }
    s
}
