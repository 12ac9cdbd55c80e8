//! Fixed-format scenarios: degenerate alphabets and damaged streams.

use std::io::Cursor;

use tree_huff::hufftree::HuffNode;
use tree_huff::metadata::{HUFF_TREE, PSEUDO_EOF};
use tree_huff::{
    compress_bytes, decompress, decompress_bytes, BitReader, BitWriter, HuffmanCodec,
    HuffmanError,
};

fn codec_for(compressed: &[u8]) -> HuffmanCodec {
    let mut reader = BitReader::new(Cursor::new(compressed));
    HuffmanCodec::read_header(&mut reader).unwrap()
}

#[test]
fn test_empty_stream_has_single_leaf() {
    let compressed = compress_bytes(&[]).unwrap();
    let codec = codec_for(&compressed);

    assert_eq!(codec.tree().leaf_count(), 1);
    assert!(matches!(
        codec.tree().root,
        HuffNode::Leaf { symbol: PSEUDO_EOF, .. }
    ));
    assert_eq!(decompress_bytes(&compressed).unwrap(), Vec::<u8>::new());
}

#[test]
fn test_repeated_byte_uses_one_bit_codes() {
    let data = vec![0x41u8; 1000];
    let compressed = compress_bytes(&data).unwrap();
    let codec = codec_for(&compressed);

    let mut leaves = codec.tree().leaves();
    leaves.sort();
    assert_eq!(leaves, vec![0x41, PSEUDO_EOF]);

    let table = codec.code_table();
    let a = table.get(0x41).unwrap();
    let eof = table.get(PSEUDO_EOF).unwrap();
    assert_eq!(a.len(), 1);
    assert_eq!(eof.len(), 1);
    assert_ne!(a[0], eof[0]);

    // 32 magic + 21 header + 1001 body bits
    assert_eq!(compressed.len(), (32 + 21 + 1001 + 7) / 8);
    assert_eq!(decompress_bytes(&compressed).unwrap(), data);
}

#[test]
fn test_starts_with_magic() {
    let compressed = compress_bytes(b"xyz").unwrap();
    assert_eq!(compressed[..4], HUFF_TREE.to_be_bytes());
}

#[test]
fn test_bad_magic_rejected() {
    let mut compressed = compress_bytes(b"some ordinary text").unwrap();
    compressed[3] = 0x00;

    let mut reader = BitReader::new(Cursor::new(compressed));
    let mut writer = BitWriter::new(Vec::new());
    match decompress(&mut reader, &mut writer) {
        Err(HuffmanError::BadMagicHeader { expected, found }) => {
            assert_eq!(expected, HUFF_TREE);
            assert_eq!(found, Some(HUFF_TREE & !1));
        }
        other => panic!("expected BadMagicHeader, got {:?}", other),
    }
    assert_eq!(writer.finish().unwrap(), Vec::<u8>::new());
}

#[test]
fn test_plain_text_is_not_a_stream() {
    assert!(matches!(
        decompress_bytes(b"just some bytes"),
        Err(HuffmanError::BadMagicHeader { .. })
    ));
}

#[test]
fn test_truncated_body_rejected() {
    let data: Vec<u8> = (0..2000).map(|i| (i % 97) as u8).collect();
    let compressed = compress_bytes(&data).unwrap();

    // keep the whole header, drop most of the body
    let cut = compressed.len() / 2;
    assert!(matches!(
        decompress_bytes(&compressed[..cut]),
        Err(HuffmanError::TruncatedBody)
    ));
}

#[test]
fn test_truncated_header_rejected() {
    let data: Vec<u8> = (0..=255).collect();
    let compressed = compress_bytes(&data).unwrap();

    assert!(matches!(
        decompress_bytes(&compressed[..40]),
        Err(HuffmanError::TruncatedHeader)
    ));
}

#[test]
fn test_stream_shorter_than_magic_rejected() {
    let compressed = compress_bytes(b"abc").unwrap();

    for short in [&b""[..], &compressed[..2]] {
        let mut reader = BitReader::new(Cursor::new(short));
        let mut writer = BitWriter::new(Vec::new());
        assert!(matches!(
            decompress(&mut reader, &mut writer),
            Err(HuffmanError::BadMagicHeader { found: None, .. })
        ));
        assert_eq!(writer.finish().unwrap(), Vec::<u8>::new());
    }
}

#[test]
fn test_trailing_garbage_ignored() {
    let data = b"bytes after PSEUDO_EOF are never read";
    let mut compressed = compress_bytes(data).unwrap();
    compressed.extend_from_slice(&[0xaa; 16]);
    assert_eq!(decompress_bytes(&compressed).unwrap(), data);
}
