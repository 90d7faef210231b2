//! QUIC variable-length integers (RFC 9000 Section 16).
//!
//! The top two bits of the first byte give the total encoded length
//! (1, 2, 4 or 8 bytes); the remaining bits form the unsigned value.
//! [`Varint62Reader`] decodes integers incrementally so a value split
//! across transport reads survives without buffering or re-parsing.

/// Largest value representable as a varint62.
pub const VARINT62_MAX: u64 = (1 << 62) - 1;

/// Longest wire encoding of a varint62, in bytes.
pub const MAX_ENCODED_LENGTH: usize = 8;

/// Outcome of feeding input to a [`Varint62Reader`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Varint62Progress {
    /// The full integer has been read. `length` is the number of bytes
    /// the encoding occupied on the wire.
    Done { value: u64, length: u8 },
    /// The input ended mid-integer; feed more bytes to continue.
    Partial,
}

/// Incremental varint62 decoder.
///
/// The reader remembers how many bytes of the current integer it has
/// seen, so it can be driven with arbitrarily fragmented input. It never
/// consumes bytes past the end of the integer, and malformed input does
/// not exist at this layer: every byte sequence of the announced length
/// is a valid encoding.
#[derive(Debug, Clone, Default)]
pub struct Varint62Reader {
    length: u8,
    seen: u8,
    value: u64,
}

impl Varint62Reader {
    pub fn new() -> Self {
        Self::default()
    }

    /// True if no bytes of the current integer have been consumed yet.
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Consume bytes from `input` starting at `*cursor`, advancing the
    /// cursor past every byte used. On [`Varint62Progress::Done`] the
    /// reader resets itself and can read the next integer.
    pub fn read(&mut self, input: &[u8], cursor: &mut usize) -> Varint62Progress {
        if self.length == 0 {
            let Some(&first) = input.get(*cursor) else {
                return Varint62Progress::Partial;
            };
            *cursor += 1;
            self.length = 1 << (first >> 6);
            self.seen = 1;
            self.value = u64::from(first & 0x3f);
        }

        while self.seen < self.length {
            let Some(&byte) = input.get(*cursor) else {
                return Varint62Progress::Partial;
            };
            *cursor += 1;
            self.seen += 1;
            self.value = self.value << 8 | u64::from(byte);
        }

        let progress = Varint62Progress::Done {
            value: self.value,
            length: self.length,
        };
        *self = Self::default();
        progress
    }
}

/// Decode one varint62 from `buf` at `*pos`, advancing `*pos` past it.
///
/// Returns `None` without advancing if the buffer ends mid-integer.
pub fn decode(buf: &[u8], pos: &mut usize) -> Option<u64> {
    let first = *buf.get(*pos)?;
    let length = 1usize << (first >> 6);
    let end = *pos + length;
    if end > buf.len() {
        return None;
    }
    let mut value = u64::from(first & 0x3f);
    for &byte in &buf[*pos + 1..end] {
        value = value << 8 | u64::from(byte);
    }
    *pos = end;
    Some(value)
}

/// Encode `value` in its shortest varint62 form.
///
/// Returns `None` for values above [`VARINT62_MAX`], which have no
/// encoding.
pub fn encode(value: u64) -> Option<Vec<u8>> {
    if value < 1 << 6 {
        Some(vec![value as u8])
    } else if value < 1 << 14 {
        Some((value as u16 | 0x4000).to_be_bytes().to_vec())
    } else if value < 1 << 30 {
        Some((value as u32 | 0x8000_0000).to_be_bytes().to_vec())
    } else if value <= VARINT62_MAX {
        Some((value | 0xc000_0000_0000_0000).to_be_bytes().to_vec())
    } else {
        None
    }
}
