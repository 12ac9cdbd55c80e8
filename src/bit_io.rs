//! Bit-granular reading and writing on top of byte streams.
//!
//! The codec only talks to [`BitSource`] and [`BitSink`]. [`BitReader`] and
//! [`BitWriter`] are the stream-backed implementations; both pack bits
//! MSB-first, so a field of width `n` occupies the next `n` bits with its
//! most significant bit first.

use std::io::{self, ErrorKind, Read, Seek, SeekFrom, Write};

use bitvec::prelude::*;

/// Something bits can be pulled from, `width` at a time.
pub trait BitSource {
    /// Reads the next `width` bits (1..=32) as an unsigned value.
    ///
    /// Returns `Ok(None)` when fewer than `width` bits remain. The bits that
    /// were left are consumed and dropped, so the source stays at end of
    /// stream until rewound.
    fn read_bits(&mut self, width: u8) -> io::Result<Option<u32>>;

    /// Repositions the source at the first bit of the stream.
    fn rewind(&mut self) -> io::Result<()>;
}

/// Something bits can be pushed into.
pub trait BitSink {
    /// Writes the low `width` bits (0..=32) of `value`.
    fn write_bits(&mut self, width: u8, value: u32) -> io::Result<()>;

    /// Flushes the final partial byte (zero padded) and the underlying writer.
    fn close(&mut self) -> io::Result<()>;

    /// Writes a code one bit at a time in order.
    fn write_code(&mut self, code: &BitSlice<u8, Msb0>) -> io::Result<()> {
        for bit in code.iter().by_vals() {
            self.write_bits(1, bit as u32)?;
        }
        Ok(())
    }
}

pub struct BitReader<R> {
    inner: R,
    // current byte, consumed from the high end
    buffer: u8,
    bits_left: u8,
    bits_read: u64,
}

impl<R: Read + Seek> BitReader<R> {
    pub fn new(inner: R) -> Self {
        BitReader {
            inner,
            buffer: 0,
            bits_left: 0,
            bits_read: 0,
        }
    }

    /// Total bits handed out since construction or the last rewind.
    pub fn bits_read(&self) -> u64 {
        self.bits_read
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    // false at end of stream
    fn fill(&mut self) -> io::Result<bool> {
        let mut byte = [0u8; 1];
        loop {
            match self.inner.read(&mut byte) {
                Ok(0) => return Ok(false),
                Ok(_) => {
                    self.buffer = byte[0];
                    self.bits_left = 8;
                    return Ok(true);
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }
}

impl<R: Read + Seek> BitSource for BitReader<R> {
    fn read_bits(&mut self, width: u8) -> io::Result<Option<u32>> {
        if width == 0 || width > 32 {
            return Err(io::Error::new(
                ErrorKind::InvalidInput,
                format!("cannot read {} bits at once", width),
            ));
        }

        let mut value: u32 = 0;
        let mut remaining = width;
        while remaining > 0 {
            if self.bits_left == 0 && !self.fill()? {
                // partial value is dropped; not counted in bits_read
                return Ok(None);
            }
            let take = remaining.min(self.bits_left);
            let shift = self.bits_left - take;
            let mask = ((1u16 << take) - 1) as u8;
            let bits = (self.buffer >> shift) & mask;

            value = (value << take) | bits as u32;
            self.bits_left -= take;
            remaining -= take;
        }

        self.bits_read += width as u64;
        Ok(Some(value))
    }

    fn rewind(&mut self) -> io::Result<()> {
        self.inner.seek(SeekFrom::Start(0))?;
        self.buffer = 0;
        self.bits_left = 0;
        self.bits_read = 0;
        Ok(())
    }
}

pub struct BitWriter<W: Write> {
    inner: W,
    buffer: u8,
    bit_count: u8,
    bits_written: u64,
}

impl<W: Write> BitWriter<W> {
    pub fn new(inner: W) -> Self {
        BitWriter {
            inner,
            buffer: 0,
            bit_count: 0,
            bits_written: 0,
        }
    }

    /// Total bits accepted so far, not counting padding.
    pub fn bits_written(&self) -> u64 {
        self.bits_written
    }

    /// Closes the writer and hands back the underlying stream.
    pub fn finish(mut self) -> io::Result<W> {
        self.close()?;
        Ok(self.inner)
    }

    fn push_bit(&mut self, bit: bool) -> io::Result<()> {
        if bit {
            // set bit with OR and mask
            self.buffer |= 1 << (7 - self.bit_count);
        }
        self.bit_count += 1;
        self.bits_written += 1;

        if self.bit_count == 8 {
            self.inner.write_all(&[self.buffer])?;
            self.buffer = 0;
            self.bit_count = 0;
        }
        Ok(())
    }
}

impl<W: Write> BitSink for BitWriter<W> {
    fn write_bits(&mut self, width: u8, value: u32) -> io::Result<()> {
        if width > 32 {
            return Err(io::Error::new(
                ErrorKind::InvalidInput,
                format!("cannot write {} bits at once", width),
            ));
        }
        for bit_pos in (0..width).rev() {
            let bit = (value >> bit_pos) & 1;
            self.push_bit(bit != 0)?;
        }
        Ok(())
    }

    fn close(&mut self) -> io::Result<()> {
        if self.bit_count > 0 {
            self.inner.write_all(&[self.buffer])?;
            self.buffer = 0;
            self.bit_count = 0;
        }
        self.inner.flush()
    }
}
