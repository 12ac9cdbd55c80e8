use std::fmt;

use log::{debug, trace};

use crate::bit_io::{BitSink, BitSource};
use crate::code_table::CodeTable;
use crate::error::{HuffmanError, Result};
use crate::frequency::FrequencyTable;
use crate::metadata::{PSEUDO_EOF, SYMBOL_COUNT, SYMBOL_WIDTH};
use crate::min_heap::MinHeap;

// no tree over the alphabet can be deeper than this
const MAX_DEPTH: usize = SYMBOL_COUNT - 1;

#[derive(Debug, Clone)]
pub struct HuffmanTree {
    pub root: HuffNode,
}

impl HuffmanTree {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        HuffmanTree::from_frequencies(&FrequencyTable::from_bytes(bytes))
    }

    /// Merges the two lightest nodes until one remains.
    ///
    /// `PSEUDO_EOF` always enters with weight 1. Leaves enter the heap in
    /// ascending symbol order and equal weights leave it first-in first-out,
    /// so the same counts always produce the same tree.
    pub fn from_frequencies(frequencies: &FrequencyTable) -> Result<Self> {
        let leaves = frequencies
            .weights()
            .map(|(symbol, weight)| (weight, HuffNode::new(symbol, weight)));
        let mut heap = MinHeap::build(leaves);
        if heap.is_empty() {
            return Err(HuffmanError::EmptyAlphabet);
        }

        while heap.heap_size() > 1 {
            let (_, left) = heap.extract_min()?;
            let (_, right) = heap.extract_min()?;
            let merged = HuffNode::merge(left, right);
            heap.insert(merged.weight(), merged);
        }
        let (_, root) = heap.extract_min()?;

        let tree = HuffmanTree { root };
        debug!(
            "built tree: {} leaves, weight {}",
            tree.leaf_count(),
            tree.root.weight()
        );
        trace!("tree:\n{}", tree);
        Ok(tree)
    }

    pub fn generate_table(&self) -> CodeTable {
        CodeTable::from_tree(self)
    }

    /// Writes the preorder header: `0` then both subtrees for an internal
    /// node, `1` then the 9-bit symbol for a leaf.
    pub fn serialize<S: BitSink + ?Sized>(&self, sink: &mut S) -> Result<()> {
        self.root.serialize(sink)
    }

    /// Rebuilds a tree from a preorder header. Leaf weights come back as 0.
    pub fn deserialize<S: BitSource + ?Sized>(source: &mut S) -> Result<Self> {
        let root = HuffNode::deserialize(source, 0)?;
        Ok(HuffmanTree { root })
    }

    pub fn leaf_count(&self) -> usize {
        self.root.leaf_count()
    }

    /// Leaf symbols in preorder, i.e. left to right.
    pub fn leaves(&self) -> Vec<u16> {
        let mut symbols = Vec::new();
        self.root.collect_leaves(&mut symbols);
        symbols
    }

    /// Same shape and same symbols in the same positions; weights ignored.
    pub fn structurally_eq(&self, other: &HuffmanTree) -> bool {
        self.root.structurally_eq(&other.root)
    }

    fn fmt_node(
        f: &mut fmt::Formatter<'_>,
        node: &HuffNode,
        depth: usize,
        label: &str,
    ) -> fmt::Result {
        let indent = "  ".repeat(depth);
        match node {
            HuffNode::Leaf { symbol, weight } => {
                writeln!(
                    f,
                    "{}{}-> Leaf: {} [weight: {}]",
                    indent,
                    label,
                    SymbolName(*symbol),
                    weight
                )
            }
            HuffNode::Internal {
                weight,
                left,
                right,
            } => {
                writeln!(f, "{}{}-> Internal [weight: {}]", indent, label, weight)?;
                Self::fmt_node(f, left, depth + 1, "L")?;
                Self::fmt_node(f, right, depth + 1, "R")
            }
        }
    }
}

impl fmt::Display for HuffmanTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        HuffmanTree::fmt_node(f, &self.root, 0, "root")
    }
}

struct SymbolName(u16);

impl fmt::Display for SymbolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            PSEUDO_EOF => write!(f, "PSEUDO_EOF"),
            s if s < 0x80 && (s as u8).is_ascii_graphic() => {
                write!(f, "'{}' ({})", s as u8 as char, s)
            }
            s => write!(f, "{}", s),
        }
    }
}

#[derive(Debug, Clone)]
pub enum HuffNode {
    Leaf {
        weight: u64,
        symbol: u16,
    },
    Internal {
        weight: u64,
        left: Box<HuffNode>,
        right: Box<HuffNode>,
    },
}

impl HuffNode {
    pub fn new(symbol: u16, weight: u64) -> Self {
        HuffNode::Leaf { weight, symbol }
    }

    pub fn weight(&self) -> u64 {
        match self {
            HuffNode::Leaf { weight, .. } => *weight,
            HuffNode::Internal { weight, .. } => *weight,
        }
    }

    pub fn merge(left: Self, right: Self) -> Self {
        // left came out of the heap first
        let weight = left.weight() + right.weight();
        HuffNode::Internal {
            weight,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    fn serialize<S: BitSink + ?Sized>(&self, sink: &mut S) -> Result<()> {
        match self {
            HuffNode::Leaf { symbol, .. } => {
                sink.write_bits(1, 1)?;
                sink.write_bits(SYMBOL_WIDTH, *symbol as u32)?;
            }
            HuffNode::Internal { left, right, .. } => {
                sink.write_bits(1, 0)?;
                left.serialize(sink)?;
                right.serialize(sink)?;
            }
        }
        Ok(())
    }

    fn deserialize<S: BitSource + ?Sized>(source: &mut S, depth: usize) -> Result<Self> {
        if depth > MAX_DEPTH {
            return Err(HuffmanError::TreeTooDeep { max: MAX_DEPTH });
        }

        let marker = source.read_bits(1)?.ok_or(HuffmanError::TruncatedHeader)?;
        if marker == 0 {
            let left = HuffNode::deserialize(source, depth + 1)?;
            let right = HuffNode::deserialize(source, depth + 1)?;
            return Ok(HuffNode::merge(left, right));
        }

        let value = source
            .read_bits(SYMBOL_WIDTH)?
            .ok_or(HuffmanError::TruncatedHeader)?;
        if value > PSEUDO_EOF as u32 {
            return Err(HuffmanError::UnknownSymbol(value as u16));
        }
        Ok(HuffNode::new(value as u16, 0))
    }

    fn leaf_count(&self) -> usize {
        match self {
            HuffNode::Leaf { .. } => 1,
            HuffNode::Internal { left, right, .. } => left.leaf_count() + right.leaf_count(),
        }
    }

    fn collect_leaves(&self, symbols: &mut Vec<u16>) {
        match self {
            HuffNode::Leaf { symbol, .. } => symbols.push(*symbol),
            HuffNode::Internal { left, right, .. } => {
                left.collect_leaves(symbols);
                right.collect_leaves(symbols);
            }
        }
    }

    fn structurally_eq(&self, other: &HuffNode) -> bool {
        match (self, other) {
            (HuffNode::Leaf { symbol: a, .. }, HuffNode::Leaf { symbol: b, .. }) => a == b,
            (
                HuffNode::Internal {
                    left: l1,
                    right: r1,
                    ..
                },
                HuffNode::Internal {
                    left: l2,
                    right: r2,
                    ..
                },
            ) => l1.structurally_eq(l2) && r1.structurally_eq(r2),
            _ => false,
        }
    }
}
