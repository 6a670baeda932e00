use std::collections::HashMap;
use std::fmt;

use log::{debug, trace};

use crate::error::Result;
use crate::frequency::{FrequencyTable, Symbol};
use crate::heap::PriorityQueue;

/// A Huffman tree node. Internal nodes own their children outright.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Node {
    Leaf {
        byte: Symbol,
        freq: u64,
    },
    Internal {
        freq: u64,
        left: Box<Node>,
        right: Box<Node>,
    },
}

impl Node {
    pub fn freq(&self) -> u64 {
        match self {
            Node::Leaf { freq, .. } => *freq,
            Node::Internal { freq, .. } => *freq,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }

    pub fn leaf_count(&self) -> usize {
        match self {
            Node::Leaf { .. } => 1,
            Node::Internal { left, right, .. } => left.leaf_count() + right.leaf_count(),
        }
    }

    pub fn internal_count(&self) -> usize {
        match self {
            Node::Leaf { .. } => 0,
            Node::Internal { left, right, .. } => {
                1 + left.internal_count() + right.internal_count()
            }
        }
    }

    /// Longest root-to-leaf path, in edges.
    pub fn depth(&self) -> usize {
        match self {
            Node::Leaf { .. } => 0,
            Node::Internal { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }

    fn merge(left: Node, right: Node) -> Node {
        Node::Internal {
            freq: left.freq() + right.freq(),
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Wraps a lone leaf so its symbol gets the one-bit code `0`.
    ///
    /// The right child is a zero-frequency placeholder repeating the symbol,
    /// keeping every internal node two-childed.
    fn degenerate(byte: Symbol, freq: u64) -> Node {
        Node::merge(Node::Leaf { byte, freq }, Node::Leaf { byte, freq: 0 })
    }
}

pub type HuffmanTree = Node;

/// Builds the tree for every symbol with a nonzero count.
///
/// Returns `Ok(None)` for an empty table. A single distinct symbol yields an
/// internal root over that leaf and a placeholder.
pub fn build_huffman_tree(frequencies: &FrequencyTable) -> Result<Option<HuffmanTree>> {
    let distinct = frequencies.distinct();
    debug!("Building Huffman tree from {} unique symbols", distinct);

    let mut queue = PriorityQueue::with_capacity(distinct)?;
    for (byte, freq) in frequencies.present() {
        queue.insert(Node::Leaf { byte, freq })?;
    }

    let root = loop {
        let Some(left) = queue.extract_min() else {
            debug!("Empty frequency table, no tree built");
            return Ok(None);
        };
        let Some(right) = queue.extract_min() else {
            break left;
        };
        queue.insert(Node::merge(left, right))?;
    };

    let root = match root {
        Node::Leaf { byte, freq } => {
            debug!("Single symbol {:#04x}, synthesizing internal root", byte);
            Node::degenerate(byte, freq)
        }
        internal => internal,
    };

    debug!(
        "Tree construction complete: {} leaves, {} internal, depth {}",
        root.leaf_count(),
        root.internal_count(),
        root.depth()
    );
    Ok(Some(root))
}

/// Root-to-leaf path of a symbol; `false` is left, `true` is right.
#[derive(Debug, Clone, Default, Eq, PartialEq, Hash)]
pub struct Code {
    bits: Vec<bool>,
}

impl Code {
    pub fn bits(&self) -> &[bool] {
        &self.bits
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn is_prefix_of(&self, other: &Code) -> bool {
        other.bits.starts_with(&self.bits)
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &bit in &self.bits {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

pub type CodeTable = HashMap<Symbol, Code>;

/// Derives every symbol's code in one depth-first pass.
///
/// When a symbol labels more than one leaf, its left-most path wins.
pub fn build_code_table(root: &Node) -> CodeTable {
    let mut table = CodeTable::new();
    let mut path = Vec::new();
    assign_codes(root, &mut path, &mut table);
    debug!("Code table built: {} entries", table.len());
    table
}

fn assign_codes(node: &Node, path: &mut Vec<bool>, table: &mut CodeTable) {
    match node {
        Node::Leaf { byte, .. } => {
            table.entry(*byte).or_insert_with(|| {
                let code = Code { bits: path.clone() };
                trace!(
                    "Assigning code to byte {:#04x} ('{}') : '{}'",
                    byte,
                    (*byte as char).escape_default(),
                    code
                );
                code
            });
        }
        Node::Internal { left, right, .. } => {
            path.push(false);
            assign_codes(left, path, table);
            path.pop();
            path.push(true);
            assign_codes(right, path, table);
            path.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree_for(data: &[u8]) -> Node {
        build_huffman_tree(&FrequencyTable::from_bytes(data))
            .unwrap()
            .unwrap()
    }

    fn assert_internal_sums(node: &Node) {
        if let Node::Internal { freq, left, right } = node {
            assert_eq!(*freq, left.freq() + right.freq());
            assert_internal_sums(left);
            assert_internal_sums(right);
        }
    }

    #[test]
    fn empty_input_builds_nothing() {
        let tree = build_huffman_tree(&FrequencyTable::from_bytes(&[])).unwrap();
        assert!(tree.is_none());
    }

    #[test]
    fn most_frequent_symbol_gets_shortest_code() {
        let tree = tree_for(b"aaaabbbcc");
        assert_eq!(tree.leaf_count(), 3);
        assert_eq!(tree.freq(), 9);
        assert_internal_sums(&tree);

        let table = build_code_table(&tree);
        assert_eq!(table[&b'a'].len(), 1);
        assert_eq!(table[&b'b'].len(), 2);
        assert_eq!(table[&b'c'].len(), 2);
    }

    #[test]
    fn single_symbol_gets_one_bit_code() {
        let tree = tree_for(&[b'a'; 1000]);
        assert!(!tree.is_leaf());
        assert_eq!(tree.freq(), 1000);
        assert_internal_sums(&tree);

        let table = build_code_table(&tree);
        assert_eq!(table.len(), 1);
        assert_eq!(table[&b'a'].to_string(), "0");
    }

    #[test]
    fn full_alphabet_has_255_internal_nodes() {
        let mut counts = [0u64; 256];
        for (i, c) in counts.iter_mut().enumerate() {
            *c = i as u64 + 1;
        }
        let tree = build_huffman_tree(&FrequencyTable::from_counts(counts))
            .unwrap()
            .unwrap();
        assert_eq!(tree.leaf_count(), 256);
        assert_eq!(tree.internal_count(), 255);
        assert_internal_sums(&tree);
        assert_eq!(build_code_table(&tree).len(), 256);
    }

    #[test]
    fn codes_are_prefix_free() {
        let tree = tree_for(b"the quick brown fox jumps over the lazy dog");
        let table = build_code_table(&tree);
        for (a, code_a) in &table {
            assert!(!code_a.is_empty());
            for (b, code_b) in &table {
                if a != b {
                    assert!(!code_a.is_prefix_of(code_b), "{a} prefixes {b}");
                }
            }
        }
    }

    #[test]
    fn code_displays_as_bit_string() {
        let code = Code {
            bits: vec![true, false, true, true],
        };
        assert_eq!(code.to_string(), "1011");
        assert_eq!(code.len(), 4);
    }
}
