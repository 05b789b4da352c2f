//! Sequential little-endian reads and writes over a byte buffer.
//!
//! A `Cursor` keeps a position that advances after every field. Reading works
//! over anything that can be viewed as a byte slice; writing needs an owned
//! `Vec<u8>` so the buffer can grow. A write inside the current length
//! overwrites, a write at or past the end appends, which lets a header be
//! patched after the payload that follows it is known.

/// Width in bytes of a lump or texture name on the wire
pub const NAME_LEN: usize = 8;

#[derive(Debug, Clone)]
pub struct Cursor<B> {
    buf: B,
    pos: usize,
}

impl<B> Cursor<B> {
    pub fn new(buf: B) -> Self {
        Cursor { buf, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn set_position(&mut self, pos: usize) {
        self.pos = pos;
    }

    pub fn into_inner(self) -> B {
        self.buf
    }
}

impl<B: AsRef<[u8]>> Cursor<B> {
    pub fn len(&self) -> usize {
        self.buf.as_ref().len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.as_ref().is_empty()
    }

    pub fn remaining(&self) -> usize {
        self.len().saturating_sub(self.pos)
    }

    /// Take the next `n` bytes.
    ///
    /// # Panics
    ///
    /// Reading past the end of the buffer is a caller bug: lump sizes are
    /// validated against the record width before any record is decoded.
    pub fn read_bytes(&mut self, n: usize) -> &[u8] {
        let start = self.pos;
        let end = start + n;
        let data = self.buf.as_ref();
        assert!(
            end <= data.len(),
            "cursor read of {} bytes at {} overruns buffer of {}",
            n,
            start,
            data.len()
        );
        self.pos = end;
        &data[start..end]
    }

    pub fn read_u8(&mut self) -> u8 {
        self.read_bytes(1)[0]
    }

    pub fn read_i16(&mut self) -> i16 {
        let b = self.read_bytes(2);
        i16::from_le_bytes([b[0], b[1]])
    }

    pub fn read_i32(&mut self) -> i32 {
        let b = self.read_bytes(4);
        i32::from_le_bytes([b[0], b[1], b[2], b[3]])
    }

    /// Read an 8 byte name field, stopping at the first zero byte. Each byte
    /// becomes the char with the same value, so `write_name` gives back the
    /// exact bytes.
    pub fn read_name(&mut self) -> String {
        let raw = self.read_bytes(NAME_LEN);
        let len = raw.iter().position(|b| *b == 0).unwrap_or(NAME_LEN);
        raw[..len].iter().map(|&b| char::from(b)).collect()
    }
}

impl Cursor<Vec<u8>> {
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        if self.pos > self.buf.len() {
            self.buf.resize(self.pos, 0);
        }
        let overlap = (self.buf.len() - self.pos).min(bytes.len());
        self.buf[self.pos..self.pos + overlap].copy_from_slice(&bytes[..overlap]);
        self.buf.extend_from_slice(&bytes[overlap..]);
        self.pos += bytes.len();
    }

    pub fn write_u8(&mut self, v: u8) {
        self.write_bytes(&[v]);
    }

    pub fn write_i16(&mut self, v: i16) {
        self.write_bytes(&v.to_le_bytes());
    }

    pub fn write_i32(&mut self, v: i32) {
        self.write_bytes(&v.to_le_bytes());
    }

    /// Write an 8 byte name field, one byte per char. Longer names are cut at
    /// 8 chars, shorter ones are zero padded. Chars above `U+00FF` have no
    /// byte and are written as `?`.
    pub fn write_name(&mut self, name: &str) {
        let mut field = [0u8; NAME_LEN];
        for (dst, ch) in field.iter_mut().zip(name.chars()) {
            *dst = u8::try_from(ch).unwrap_or(b'?');
        }
        self.write_bytes(&field);
    }
}
