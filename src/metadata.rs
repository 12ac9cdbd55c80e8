//! Format constants and the magic number that opens every compressed stream.

use crate::bit_io::{BitSink, BitSource};
use crate::error::{HuffmanError, Result};

pub const BITS_PER_WORD: u8 = 8;
pub const BITS_PER_INT: u8 = 32;
/// Number of byte symbols.
pub const ALPH_SIZE: usize = 1 << BITS_PER_WORD;
/// Sentinel symbol marking the logical end of the body.
pub const PSEUDO_EOF: u16 = ALPH_SIZE as u16;
/// Width of a leaf's symbol field in the tree header; wide enough for `PSEUDO_EOF`.
pub const SYMBOL_WIDTH: u8 = BITS_PER_WORD + 1;
/// Number of distinct symbols, bytes plus the sentinel.
pub const SYMBOL_COUNT: usize = ALPH_SIZE + 1;

pub const HUFF_NUMBER: u32 = 0xface_8200;
/// Magic for a stream whose header is a preorder tree.
pub const HUFF_TREE: u32 = HUFF_NUMBER | 1;

pub fn write_magic<S: BitSink + ?Sized>(sink: &mut S) -> Result<()> {
    sink.write_bits(BITS_PER_INT, HUFF_TREE)?;
    Ok(())
}

/// Reads the first 32 bits and checks them against [`HUFF_TREE`].
///
/// A stream shorter than 32 bits is a bad header with nothing `found`.
pub fn read_magic<S: BitSource + ?Sized>(source: &mut S) -> Result<()> {
    let found = source.read_bits(BITS_PER_INT)?;

    if found != Some(HUFF_TREE) {
        return Err(HuffmanError::BadMagicHeader {
            expected: HUFF_TREE,
            found,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::bit_io::{BitReader, BitWriter};

    #[test]
    fn test_magic_roundtrip() {
        let mut writer = BitWriter::new(Vec::new());
        write_magic(&mut writer).unwrap();
        let bytes = writer.finish().unwrap();
        assert_eq!(bytes, vec![0xfa, 0xce, 0x82, 0x01]);

        let mut reader = BitReader::new(Cursor::new(bytes));
        read_magic(&mut reader).unwrap();
    }

    #[test]
    fn test_bad_magic() {
        let mut reader = BitReader::new(Cursor::new(vec![0xfa, 0xce, 0x82, 0x00]));
        match read_magic(&mut reader) {
            Err(HuffmanError::BadMagicHeader { found, .. }) => {
                assert_eq!(found, Some(HUFF_NUMBER))
            }
            other => panic!("expected bad magic, got {:?}", other),
        }
    }

    #[test]
    fn test_short_magic() {
        let mut reader = BitReader::new(Cursor::new(vec![0xfa, 0xce]));
        assert!(matches!(
            read_magic(&mut reader),
            Err(HuffmanError::BadMagicHeader { found: None, .. })
        ));

        let mut empty = BitReader::new(Cursor::new(Vec::new()));
        let err = read_magic(&mut empty).unwrap_err();
        assert_eq!(
            err.to_string(),
            "illegal header: expected magic 0xface8201, found end of stream"
        );
    }
}
