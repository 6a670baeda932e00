//! Bit-level packing between logical bitstreams and byte sources/sinks.
//!
//! Bits are ordered most-significant first within each byte.

use std::io::{self, Read, Write};

use crate::huffman::Code;

/// Packs bits into bytes and emits each byte as soon as it fills.
pub struct BitWriter<W: Write> {
    sink: W,
    buffer: u8,
    filled: u8,
    bits_written: u64,
}

impl<W: Write> BitWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            sink,
            buffer: 0,
            filled: 0,
            bits_written: 0,
        }
    }

    pub fn write_bit(&mut self, bit: bool) -> io::Result<()> {
        self.buffer = (self.buffer << 1) | bit as u8;
        self.filled += 1;
        self.bits_written += 1;
        if self.filled == 8 {
            self.sink.write_all(&[self.buffer])?;
            self.buffer = 0;
            self.filled = 0;
        }
        Ok(())
    }

    /// Writes all eight bits of `byte`, high bit first.
    pub fn write_byte(&mut self, byte: u8) -> io::Result<()> {
        for shift in (0..8).rev() {
            self.write_bit((byte >> shift) & 1 == 1)?;
        }
        Ok(())
    }

    pub fn write_code(&mut self, code: &Code) -> io::Result<()> {
        for &bit in code.bits() {
            self.write_bit(bit)?;
        }
        Ok(())
    }

    /// Zero-pads a partial byte and emits it. No-op on a byte boundary.
    pub fn align(&mut self) -> io::Result<()> {
        if self.filled > 0 {
            let byte = self.buffer << (8 - self.filled);
            self.sink.write_all(&[byte])?;
            self.buffer = 0;
            self.filled = 0;
        }
        Ok(())
    }

    /// Logical bits written so far, padding excluded.
    pub fn bits_written(&self) -> u64 {
        self.bits_written
    }

    /// Pads the final byte, flushes, and hands back the sink.
    pub fn finish(mut self) -> io::Result<W> {
        self.align()?;
        self.sink.flush()?;
        Ok(self.sink)
    }
}

/// Unpacks bits from a byte source one at a time.
pub struct BitReader<R: Read> {
    source: R,
    current: u8,
    remaining: u8,
    bytes_read: u64,
}

impl<R: Read> BitReader<R> {
    pub fn new(source: R) -> Self {
        Self {
            source,
            current: 0,
            remaining: 0,
            bytes_read: 0,
        }
    }

    /// Next bit, or `None` once the source is exhausted.
    pub fn read_bit(&mut self) -> io::Result<Option<bool>> {
        if self.remaining == 0 {
            match self.source.by_ref().bytes().next().transpose()? {
                Some(byte) => {
                    self.current = byte;
                    self.remaining = 8;
                    self.bytes_read += 1;
                }
                None => return Ok(None),
            }
        }
        self.remaining -= 1;
        Ok(Some((self.current >> self.remaining) & 1 == 1))
    }

    /// Next eight bits as a byte, or `None` if fewer than eight remain.
    pub fn read_byte(&mut self) -> io::Result<Option<u8>> {
        let mut byte = 0u8;
        for _ in 0..8 {
            match self.read_bit()? {
                Some(bit) => byte = (byte << 1) | bit as u8,
                None => return Ok(None),
            }
        }
        Ok(Some(byte))
    }

    /// Drops the unread bits of the current byte.
    pub fn align(&mut self) {
        self.remaining = 0;
    }

    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }
}
