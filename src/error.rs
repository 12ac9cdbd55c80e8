use std::io;

use thiserror::Error;

use crate::min_heap::HeapErr;

pub type Result<T> = std::result::Result<T, HuffmanError>;

#[derive(Error, Debug)]
pub enum HuffmanError {
    /// `found` is `None` when the stream ends before 32 bits.
    #[error("illegal header: expected magic {expected:#010x}, found {}", found_magic(.found))]
    BadMagicHeader { expected: u32, found: Option<u32> },

    #[error("stream ended while reading the tree header")]
    TruncatedHeader,

    #[error("stream ended before PSEUDO_EOF was decoded")]
    TruncatedBody,

    #[error("no symbols to build a tree from")]
    EmptyAlphabet,

    #[error("symbol {0} has no code")]
    UnknownSymbol(u16),

    // a run of internal markers deeper than any tree over the alphabet
    #[error("tree header nests deeper than {max} levels")]
    TreeTooDeep { max: usize },

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl From<HeapErr> for HuffmanError {
    fn from(e: HeapErr) -> Self {
        match e {
            // the merge loop only underflows when it started with nothing
            HeapErr::HeapUnderflow => HuffmanError::EmptyAlphabet,
        }
    }
}

fn found_magic(found: &Option<u32>) -> String {
    match found {
        Some(value) => format!("{:#010x}", value),
        None => "end of stream".to_string(),
    }
}
