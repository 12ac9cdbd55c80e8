//! Symbol counts gathered from a first pass over the input.

use log::trace;

use crate::bit_io::BitSource;
use crate::error::Result;
use crate::metadata::{BITS_PER_WORD, PSEUDO_EOF, SYMBOL_COUNT};

/// Occurrence count per symbol, indexed by symbol value.
///
/// The `PSEUDO_EOF` slot is never filled from data; see
/// [`FrequencyTable::weights`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: [u64; SYMBOL_COUNT],
}

impl FrequencyTable {
    pub fn new() -> Self {
        FrequencyTable {
            counts: [0; SYMBOL_COUNT],
        }
    }

    /// Reads 8-bit chunks until the source runs dry, tallying each one.
    pub fn count<S: BitSource + ?Sized>(source: &mut S) -> Result<Self> {
        let mut table = FrequencyTable::new();
        while let Some(byte) = source.read_bits(BITS_PER_WORD)? {
            table.counts[byte as usize] += 1;
        }
        trace!("frequencies: {:?}", table.nonzero().collect::<Vec<_>>());
        Ok(table)
    }

    pub fn from_bytes(bytes: &[u8]) -> Self {
        bytes.iter().fold(FrequencyTable::new(), |mut acc, &byte| {
            acc.counts[byte as usize] += 1;
            acc
        })
    }

    /// Count for `symbol`; zero for anything outside the alphabet.
    pub fn get(&self, symbol: u16) -> u64 {
        self.counts.get(symbol as usize).copied().unwrap_or(0)
    }

    /// Number of bytes counted.
    pub fn total(&self) -> u64 {
        self.counts[..PSEUDO_EOF as usize].iter().sum()
    }

    /// Symbols with a nonzero count, in ascending symbol order.
    pub fn nonzero(&self) -> impl Iterator<Item = (u16, u64)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|&(_, &count)| count > 0)
            .map(|(symbol, &count)| (symbol as u16, count))
    }

    /// Counts as the tree builder sees them: every nonzero byte, plus
    /// `PSEUDO_EOF` with weight 1.
    pub fn weights(&self) -> impl Iterator<Item = (u16, u64)> + '_ {
        self.nonzero()
            .filter(|&(symbol, _)| symbol != PSEUDO_EOF)
            .chain(std::iter::once((PSEUDO_EOF, 1)))
    }
}

impl Default for FrequencyTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::bit_io::BitReader;

    #[test]
    fn test_count_from_source() {
        let mut reader = BitReader::new(Cursor::new(b"abracadabra".to_vec()));
        let table = FrequencyTable::count(&mut reader).unwrap();

        assert_eq!(table.get(b'a' as u16), 5);
        assert_eq!(table.get(b'b' as u16), 2);
        assert_eq!(table.get(b'r' as u16), 2);
        assert_eq!(table.get(b'c' as u16), 1);
        assert_eq!(table.get(b'd' as u16), 1);
        assert_eq!(table.get(PSEUDO_EOF), 0);
        assert_eq!(table.total(), 11);
        assert_eq!(table, FrequencyTable::from_bytes(b"abracadabra"));
    }

    #[test]
    fn test_get_outside_alphabet() {
        let table = FrequencyTable::from_bytes(&[0xff; 4]);
        assert_eq!(table.get(0xff), 4);
        assert_eq!(table.get(PSEUDO_EOF + 1), 0);
        assert_eq!(table.get(u16::MAX), 0);
    }

    #[test]
    fn test_weights_force_pseudo_eof() {
        let table = FrequencyTable::from_bytes(&[]);
        let weights: Vec<_> = table.weights().collect();
        assert_eq!(weights, vec![(PSEUDO_EOF, 1)]);

        let table = FrequencyTable::from_bytes(&[7, 7, 3]);
        let weights: Vec<_> = table.weights().collect();
        assert_eq!(weights, vec![(3, 1), (7, 2), (PSEUDO_EOF, 1)]);
    }
}
