//! # tree_huff
//!
//! Lossless Huffman compression with a self-describing header: the code tree
//! travels in front of the payload as a preorder bit encoding, and the payload
//! ends with the code of a sentinel symbol, `PSEUDO_EOF`, instead of a length.
//!
//! ## Quick Start
//!
//! ```rust
//! use tree_huff::{compress_bytes, decompress_bytes};
//!
//! let original = b"abracadabra";
//! let compressed = compress_bytes(original)?;
//! let restored = decompress_bytes(&compressed)?;
//! assert_eq!(restored, original);
//! # Ok::<(), tree_huff::HuffmanError>(())
//! ```
//!
//! Streams go through [`BitReader`] and [`BitWriter`]; the reader must be
//! seekable, since compression reads its input twice.
//!
//! ```rust,no_run
//! use std::fs::File;
//! use std::io::{BufReader, BufWriter};
//! use tree_huff::{compress, BitReader, BitWriter};
//!
//! let mut input = BitReader::new(BufReader::new(File::open("input.txt")?));
//! let mut output = BitWriter::new(BufWriter::new(File::create("input.txt.hf")?));
//! let stats = compress(&mut input, &mut output)?;
//! println!("{} bytes in, {} bytes out", stats.bytes_in, stats.bytes_out());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod bit_io;
pub mod code_table;
pub mod error;
pub mod frequency;
pub mod huffman_codec;
pub mod hufftree;
pub mod metadata;

// Internal modules - not part of public API
mod min_heap;

// Re-export main types for convenience
pub use bit_io::{BitReader, BitSink, BitSource, BitWriter};
pub use error::{HuffmanError, Result};
pub use huffman_codec::{
    compress, compress_bytes, decompress, decompress_bytes, CompressStats, DecompressStats,
    HuffmanCodec,
};
pub use hufftree::HuffmanTree;
