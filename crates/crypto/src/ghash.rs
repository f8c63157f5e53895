//! GHASH, the GF(2¹²⁸) polynomial MAC inside AES-GCM (NIST SP 800-38D).
//!
//! Keyed by the subkey `H = AES_K(0¹²⁸)`. Associated data and ciphertext
//! are folded in 16-byte blocks: XOR into the accumulator, then a carry-less
//! multiply by `H` reduced modulo `x¹²⁸ + x⁷ + x² + x + 1`. Reading the
//! digest folds the big-endian bit-length block first.

/// GF(2¹²⁸) element as two words, big-endian bit order per GCM.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct GfElement {
    hi: u64,
    lo: u64,
}

impl GfElement {
    fn from_bytes(bytes: &[u8; 16]) -> Self {
        Self {
            hi: u64::from_be_bytes(bytes[..8].try_into().unwrap()),
            lo: u64::from_be_bytes(bytes[8..].try_into().unwrap()),
        }
    }

    fn to_bytes(self) -> [u8; 16] {
        let mut out = [0u8; 16];
        out[..8].copy_from_slice(&self.hi.to_be_bytes());
        out[8..].copy_from_slice(&self.lo.to_be_bytes());
        out
    }

    fn xor(self, other: Self) -> Self {
        Self {
            hi: self.hi ^ other.hi,
            lo: self.lo ^ other.lo,
        }
    }
}

/// Reduction polynomial x¹²⁸ + x⁷ + x² + x + 1, as 0xE1 shifted to the top.
const R_POLY: u64 = 0xE100_0000_0000_0000;

/// Carry-less multiplication in GF(2¹²⁸), bit by bit, MSB first.
///
/// This is polynomial arithmetic; integer multiplication must not be
/// substituted for the reduction.
fn gf_mul(x: GfElement, y: GfElement) -> GfElement {
    let mut z = GfElement::default();
    let mut v = x;

    for i in 0..128 {
        let bit = if i < 64 {
            (y.hi >> (63 - i)) & 1
        } else {
            (y.lo >> (127 - i)) & 1
        };
        if bit == 1 {
            z = z.xor(v);
        }

        // Shift V right one bit through the field
        let carry = v.hi & 1;
        v.hi >>= 1;
        v.lo = (v.lo >> 1) | (carry << 63);
        if carry == 1 {
            v.hi ^= R_POLY;
        }
    }

    z
}

/// Streaming GHASH accumulator.
///
/// Lifecycle: [`set_key128`](Ghash::set_key128) once per subkey, then per
/// message [`set_authdata`](Ghash::set_authdata) (which resets the
/// accumulator), any number of [`add`](Ghash::add) calls, and one
/// [`digest`](Ghash::digest) read, which folds the lengths block, returns
/// the tag, and resets everything but the subkey.
#[derive(Default)]
pub struct Ghash {
    /// Subkey H = AES_K(0¹²⁸).
    h: GfElement,
    acc: GfElement,
    /// Partial ciphertext block. Invariant: `buf_len < 16` between calls.
    buf: [u8; 16],
    buf_len: usize,
    /// Byte counts for the trailing lengths block.
    authdata_len: u64,
    text_len: u64,
}

impl Ghash {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fix the hash subkey. Does not disturb an in-progress accumulation.
    pub fn set_key128(&mut self, key: &[u8; 16]) -> &mut Self {
        self.h = GfElement::from_bytes(key);
        self
    }

    /// Reset the accumulator and fold the associated data, zero-padded to
    /// a 16-byte boundary.
    pub fn set_authdata(&mut self, authdata: &[u8]) -> &mut Self {
        self.acc = GfElement::default();
        self.buf_len = 0;
        self.text_len = 0;
        self.authdata_len = authdata.len() as u64;

        let mut blocks = authdata.chunks_exact(16);
        for block in &mut blocks {
            self.fold(block.try_into().unwrap());
        }
        let rem = blocks.remainder();
        if !rem.is_empty() {
            let mut block = [0u8; 16];
            block[..rem.len()].copy_from_slice(rem);
            self.fold(&block);
        }
        self
    }

    /// Stream text (ciphertext) bytes into the accumulator. Whole blocks
    /// fold immediately; the remainder is buffered until more data or the
    /// final read arrives.
    pub fn add(&mut self, data: &[u8]) -> &mut Self {
        self.text_len += data.len() as u64;
        let mut offset = 0;

        if self.buf_len > 0 {
            let space = 16 - self.buf_len;
            let to_copy = data.len().min(space);
            self.buf[self.buf_len..self.buf_len + to_copy].copy_from_slice(&data[..to_copy]);
            self.buf_len += to_copy;
            offset += to_copy;

            if self.buf_len == 16 {
                let block = self.buf;
                self.fold(&block);
                self.buf_len = 0;
            }
        }

        while offset + 16 <= data.len() {
            let block: &[u8; 16] = data[offset..offset + 16].try_into().unwrap();
            self.fold(block);
            offset += 16;
        }

        let remaining = data.len() - offset;
        if remaining > 0 {
            self.buf[..remaining].copy_from_slice(&data[offset..]);
            self.buf_len = remaining;
        }
        self
    }

    /// Zero-pad and fold any buffered tail, fold the lengths block
    /// (bit length of authdata ‖ bit length of text, big-endian 64-bit
    /// each), and return the 16-byte result. The accumulator and length
    /// counters reset for the next message; the subkey is retained.
    pub fn digest(&mut self) -> [u8; 16] {
        if self.buf_len > 0 {
            for byte in &mut self.buf[self.buf_len..] {
                *byte = 0;
            }
            let block = self.buf;
            self.fold(&block);
            self.buf_len = 0;
        }

        let mut lengths = [0u8; 16];
        lengths[..8].copy_from_slice(&self.authdata_len.wrapping_mul(8).to_be_bytes());
        lengths[8..].copy_from_slice(&self.text_len.wrapping_mul(8).to_be_bytes());
        self.fold(&lengths);

        let out = self.acc.to_bytes();
        self.acc = GfElement::default();
        self.authdata_len = 0;
        self.text_len = 0;
        out
    }

    #[inline]
    fn fold(&mut self, block: &[u8; 16]) {
        self.acc = gf_mul(self.acc.xor(GfElement::from_bytes(block)), self.h);
    }
}
