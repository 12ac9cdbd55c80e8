use std::io::Cursor;

use log::debug;

use crate::bit_io::{BitReader, BitSink, BitSource, BitWriter};
use crate::code_table::CodeTable;
use crate::error::{HuffmanError, Result};
use crate::frequency::FrequencyTable;
use crate::hufftree::{HuffNode, HuffmanTree};
use crate::metadata::{self, BITS_PER_INT, BITS_PER_WORD, PSEUDO_EOF, SYMBOL_WIDTH};

/// What one compression pass produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressStats {
    pub bytes_in: u64,
    pub leaves: usize,
    /// Magic plus tree.
    pub header_bits: u64,
    /// Codes for every input byte and the closing `PSEUDO_EOF`.
    pub body_bits: u64,
}

impl CompressStats {
    /// Size of the output once the last byte is padded.
    pub fn bytes_out(&self) -> u64 {
        (self.header_bits + self.body_bits).div_ceil(8)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecompressStats {
    pub bytes_out: u64,
    pub leaves: usize,
    /// Body bits consumed up to and including the `PSEUDO_EOF` code.
    pub body_bits: u64,
}

/// A code tree and its code table, valid for a single stream.
pub struct HuffmanCodec {
    tree: HuffmanTree,
    encode_table: CodeTable,
}

impl HuffmanCodec {
    pub fn new(tree: HuffmanTree) -> Self {
        let encode_table = tree.generate_table();
        HuffmanCodec { tree, encode_table }
    }

    /// Counts the source and builds the tree. Leaves the source at its end.
    pub fn from_source<S: BitSource + ?Sized>(source: &mut S) -> Result<Self> {
        let frequencies = FrequencyTable::count(source)?;
        let tree = HuffmanTree::from_frequencies(&frequencies)?;
        Ok(Self::new(tree))
    }

    /// Checks the magic number and rebuilds the tree that follows it.
    pub fn read_header<S: BitSource + ?Sized>(source: &mut S) -> Result<Self> {
        metadata::read_magic(source)?;
        let tree = HuffmanTree::deserialize(source)?;
        Ok(Self::new(tree))
    }

    pub fn tree(&self) -> &HuffmanTree {
        &self.tree
    }

    pub fn code_table(&self) -> &CodeTable {
        &self.encode_table
    }

    /// Writes the magic number and the tree; returns the bits written.
    pub fn write_header<S: BitSink + ?Sized>(&self, sink: &mut S) -> Result<u64> {
        metadata::write_magic(sink)?;
        self.tree.serialize(sink)?;

        // one marker per node, plus a symbol field per leaf
        let leaves = self.tree.leaf_count() as u64;
        let nodes = 2 * leaves - 1;
        Ok(BITS_PER_INT as u64 + nodes + leaves * SYMBOL_WIDTH as u64)
    }

    /// Writes the code of every byte left in `source`, then the `PSEUDO_EOF`
    /// code. Returns `(bytes read, bits written)`.
    pub fn encode<R, W>(&self, source: &mut R, sink: &mut W) -> Result<(u64, u64)>
    where
        R: BitSource + ?Sized,
        W: BitSink + ?Sized,
    {
        let mut bytes = 0u64;
        let mut bits = 0u64;

        while let Some(byte) = source.read_bits(BITS_PER_WORD)? {
            bits += self.write_symbol(byte as u16, sink)?;
            bytes += 1;
        }
        bits += self.write_symbol(PSEUDO_EOF, sink)?;

        Ok((bytes, bits))
    }

    fn write_symbol<W: BitSink + ?Sized>(&self, symbol: u16, sink: &mut W) -> Result<u64> {
        let code = self
            .encode_table
            .get(symbol)
            .ok_or(HuffmanError::UnknownSymbol(symbol))?;
        sink.write_code(code)?;
        Ok(code.len() as u64)
    }

    /// Walks the tree one bit at a time, writing a byte at every leaf, until
    /// the `PSEUDO_EOF` leaf. Returns `(bytes written, bits read)`.
    pub fn decode<R, W>(&self, source: &mut R, sink: &mut W) -> Result<(u64, u64)>
    where
        R: BitSource + ?Sized,
        W: BitSink + ?Sized,
    {
        let root = &self.tree.root;
        if let HuffNode::Leaf { symbol, .. } = root {
            // a lone leaf consumes no bits, so only PSEUDO_EOF can end the body
            if *symbol != PSEUDO_EOF {
                return Err(HuffmanError::TruncatedBody);
            }
        }

        let mut bytes = 0u64;
        let mut bits = 0u64;
        let mut current = root;
        loop {
            match current {
                HuffNode::Leaf { symbol, .. } => {
                    if *symbol == PSEUDO_EOF {
                        break;
                    }
                    sink.write_bits(BITS_PER_WORD, *symbol as u32)?;
                    bytes += 1;
                    current = root;
                }
                HuffNode::Internal { left, right, .. } => {
                    let bit = source
                        .read_bits(1)?
                        .ok_or(HuffmanError::TruncatedBody)?;
                    bits += 1;
                    current = if bit == 0 { left } else { right };
                }
            }
        }

        Ok((bytes, bits))
    }
}

/// Compresses everything in `source` into `sink`, then closes `sink`.
///
/// The source is read twice: once to count, and again after a rewind to
/// encode.
pub fn compress<R, W>(source: &mut R, sink: &mut W) -> Result<CompressStats>
where
    R: BitSource + ?Sized,
    W: BitSink + ?Sized,
{
    let codec = HuffmanCodec::from_source(source)?;
    let header_bits = codec.write_header(sink)?;

    source.rewind()?;
    let (bytes_in, body_bits) = codec.encode(source, sink)?;
    sink.close()?;

    let stats = CompressStats {
        bytes_in,
        leaves: codec.tree().leaf_count(),
        header_bits,
        body_bits,
    };
    debug!(
        "compressed {} bytes: {} leaves, {} header bits, {} body bits",
        stats.bytes_in, stats.leaves, stats.header_bits, stats.body_bits
    );
    Ok(stats)
}

/// Decompresses `source` into `sink`, then closes `sink`.
///
/// Nothing is written if the magic number doesn't match.
pub fn decompress<R, W>(source: &mut R, sink: &mut W) -> Result<DecompressStats>
where
    R: BitSource + ?Sized,
    W: BitSink + ?Sized,
{
    let codec = HuffmanCodec::read_header(source)?;
    let (bytes_out, body_bits) = codec.decode(source, sink)?;
    sink.close()?;

    let stats = DecompressStats {
        bytes_out,
        leaves: codec.tree().leaf_count(),
        body_bits,
    };
    debug!(
        "decompressed {} bytes: {} leaves, {} body bits",
        stats.bytes_out, stats.leaves, stats.body_bits
    );
    Ok(stats)
}

pub fn compress_bytes(data: &[u8]) -> Result<Vec<u8>> {
    let mut reader = BitReader::new(Cursor::new(data));
    let mut writer = BitWriter::new(Vec::new());
    compress(&mut reader, &mut writer)?;
    Ok(writer.finish()?)
}

pub fn decompress_bytes(data: &[u8]) -> Result<Vec<u8>> {
    let mut reader = BitReader::new(Cursor::new(data));
    let mut writer = BitWriter::new(Vec::new());
    decompress(&mut reader, &mut writer)?;
    Ok(writer.finish()?)
}
