use bitvec::prelude::*;

use crate::hufftree::{HuffNode, HuffmanTree};
use crate::metadata::SYMBOL_COUNT;

pub type Code = BitVec<u8, Msb0>;

/// Root-to-leaf path for every symbol in a tree; `0` is left, `1` is right.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTable {
    codes: Vec<Option<Code>>,
}

impl CodeTable {
    pub fn from_tree(tree: &HuffmanTree) -> Self {
        let mut table = CodeTable {
            codes: vec![None; SYMBOL_COUNT],
        };
        let mut path = Code::new();
        table.walk(&tree.root, &mut path);
        table
    }

    fn walk(&mut self, node: &HuffNode, path: &mut Code) {
        match node {
            HuffNode::Leaf { symbol, .. } => {
                // a lone root leaf gets the empty code
                self.codes[*symbol as usize] = Some(path.clone());
            }
            HuffNode::Internal { left, right, .. } => {
                path.push(false);
                self.walk(left, path);
                path.pop();

                path.push(true);
                self.walk(right, path);
                path.pop();
            }
        }
    }

    pub fn get(&self, symbol: u16) -> Option<&BitSlice<u8, Msb0>> {
        self.codes
            .get(symbol as usize)
            .and_then(|code| code.as_deref())
    }

    /// Symbols that have a code, with their codes, in ascending symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (u16, &BitSlice<u8, Msb0>)> + '_ {
        self.codes
            .iter()
            .enumerate()
            .filter_map(|(symbol, code)| code.as_deref().map(|c| (symbol as u16, c)))
    }

    pub fn len(&self) -> usize {
        self.codes.iter().filter(|code| code.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_prefix_free(&self) -> bool {
        let codes: Vec<&BitSlice<u8, Msb0>> = self.iter().map(|(_, code)| code).collect();
        codes.iter().enumerate().all(|(i, &a)| {
            codes
                .iter()
                .enumerate()
                .all(|(j, &b)| i == j || !b.starts_with(a))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::PSEUDO_EOF;

    #[test]
    fn test_single_leaf_has_empty_code() {
        let tree = HuffmanTree::from_bytes(b"").unwrap();
        let table = tree.generate_table();
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(PSEUDO_EOF).map(|c| c.len()), Some(0));
    }

    #[test]
    fn test_repeated_byte_gets_one_bit() {
        let tree = HuffmanTree::from_bytes(&[0x41; 1000]).unwrap();
        let table = tree.generate_table();
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(PSEUDO_EOF).unwrap(), bits![u8, Msb0; 0]);
        assert_eq!(table.get(0x41).unwrap(), bits![u8, Msb0; 1]);
        assert!(table.get(0x42).is_none());
    }

    #[test]
    fn test_codes_follow_tree_paths() {
        // a:2 b:1 eof:1 -> (a, (b, eof))
        let tree = HuffmanTree::from_bytes(b"aab").unwrap();
        let table = tree.generate_table();
        assert_eq!(table.get(b'a' as u16).unwrap(), bits![u8, Msb0; 0]);
        assert_eq!(table.get(b'b' as u16).unwrap(), bits![u8, Msb0; 1, 0]);
        assert_eq!(table.get(PSEUDO_EOF).unwrap(), bits![u8, Msb0; 1, 1]);
        assert!(table.is_prefix_free());
    }

    #[test]
    fn test_frequent_symbols_get_shorter_codes() {
        let text = b"aaaaaaaaaaaaaaaabbbbbbbbccccdde";
        let table = HuffmanTree::from_bytes(text).unwrap().generate_table();
        let len = |b: u8| table.get(b as u16).unwrap().len();
        assert!(len(b'a') <= len(b'b'));
        assert!(len(b'b') <= len(b'c'));
        assert!(len(b'c') <= len(b'e'));
        assert!(table.is_prefix_free());
    }
}
