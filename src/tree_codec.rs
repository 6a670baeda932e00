//! Preorder tree serialization.
//!
//! A leaf is a `1` bit followed by its 8-bit symbol; an internal node is a
//! `0` bit followed by its left then right subtree. No size field is needed.

use std::io::{self, Read, Write};

use log::debug;

use crate::bits::{BitReader, BitWriter};
use crate::error::{Error, Result};
use crate::frequency::SYMBOL_COUNT;
use crate::huffman::Node;

/// Deepest root-to-leaf path a real tree can have (256 leaves in a chain).
pub const MAX_TREE_DEPTH: usize = SYMBOL_COUNT - 1;

/// Serialized size of `root` in bits, before byte padding.
pub fn tree_bits(root: &Node) -> u64 {
    match root {
        Node::Leaf { .. } => 9,
        Node::Internal { left, right, .. } => 1 + tree_bits(left) + tree_bits(right),
    }
}

pub fn write_tree<W: Write>(root: &Node, writer: &mut BitWriter<W>) -> io::Result<()> {
    match root {
        Node::Leaf { byte, .. } => {
            writer.write_bit(true)?;
            writer.write_byte(*byte)
        }
        Node::Internal { left, right, .. } => {
            writer.write_bit(false)?;
            write_tree(left, writer)?;
            write_tree(right, writer)
        }
    }
}

/// Reads one tree. Frequencies are not serialized and come back as zero.
pub fn read_tree<R: Read>(reader: &mut BitReader<R>) -> Result<Node> {
    let mut leaves = 0;
    let root = read_node(reader, 0, &mut leaves)?;
    debug!(
        "Tree read: {} leaves, depth {}, {} bytes consumed",
        leaves,
        root.depth(),
        reader.bytes_read()
    );
    Ok(root)
}

fn read_node<R: Read>(reader: &mut BitReader<R>, depth: usize, leaves: &mut usize) -> Result<Node> {
    if depth > MAX_TREE_DEPTH {
        return Err(Error::malformed_tree(format!(
            "depth exceeds {MAX_TREE_DEPTH}"
        )));
    }
    let Some(marker) = reader.read_bit()? else {
        return Err(Error::malformed_tree("bit source exhausted at node marker"));
    };

    if marker {
        let Some(byte) = reader.read_byte()? else {
            return Err(Error::malformed_tree("bit source exhausted inside leaf symbol"));
        };
        *leaves += 1;
        if *leaves > SYMBOL_COUNT {
            return Err(Error::malformed_tree(format!(
                "more than {SYMBOL_COUNT} leaves"
            )));
        }
        return Ok(Node::Leaf { byte, freq: 0 });
    }

    let left = read_node(reader, depth + 1, leaves)?;
    let right = read_node(reader, depth + 1, leaves)?;
    Ok(Node::Internal {
        freq: 0,
        left: Box::new(left),
        right: Box::new(right),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frequency::FrequencyTable;
    use crate::huffman::build_huffman_tree;

    fn serialize(root: &Node) -> Vec<u8> {
        let mut writer = BitWriter::new(Vec::new());
        write_tree(root, &mut writer).unwrap();
        writer.finish().unwrap()
    }

    fn symbols(node: &Node, out: &mut Vec<u8>) {
        match node {
            Node::Leaf { byte, .. } => out.push(*byte),
            Node::Internal { left, right, .. } => {
                symbols(left, out);
                symbols(right, out);
            }
        }
    }

    #[test]
    fn three_leaf_tree_layout() {
        let tree = build_huffman_tree(&FrequencyTable::from_bytes(b"aaaabbbcc"))
            .unwrap()
            .unwrap();
        // 0 1'a' 0 1'c' 1'b' = 2 internal markers + 3 leaves
        assert_eq!(tree_bits(&tree), 2 + 3 * 9);
        let bytes = serialize(&tree);
        assert_eq!(bytes.len(), 4);
        // 0, 1, 0110_0001 ('a'), ...
        assert_eq!(bytes[0], 0b0101_1000);

        let back = read_tree(&mut BitReader::new(bytes.as_slice())).unwrap();
        let (mut want, mut got) = (Vec::new(), Vec::new());
        symbols(&tree, &mut want);
        symbols(&back, &mut got);
        assert_eq!(want, got);
        assert_eq!(back.leaf_count(), 3);
        assert_eq!(back.internal_count(), 2);
    }

    #[test]
    fn full_alphabet_is_2559_bits() {
        let mut counts = [0u64; 256];
        for (i, c) in counts.iter_mut().enumerate() {
            *c = 1000 + i as u64;
        }
        let tree = build_huffman_tree(&FrequencyTable::from_counts(counts))
            .unwrap()
            .unwrap();
        assert_eq!(tree_bits(&tree), 256 * 9 + 255);
        assert_eq!(serialize(&tree).len(), 320);
    }

    #[test]
    fn truncated_tree_is_malformed() {
        let tree = build_huffman_tree(&FrequencyTable::from_bytes(b"abcdefgh"))
            .unwrap()
            .unwrap();
        let bytes = serialize(&tree);
        let cut = &bytes[..bytes.len() - 1];
        let err = read_tree(&mut BitReader::new(cut)).unwrap_err();
        assert!(matches!(err, Error::MalformedTree { .. }));
    }

    #[test]
    fn endless_internal_markers_are_rejected() {
        let zeros = vec![0u8; 64];
        let err = read_tree(&mut BitReader::new(zeros.as_slice())).unwrap_err();
        assert!(matches!(err, Error::MalformedTree { .. }));
    }

    #[test]
    fn empty_source_is_malformed() {
        let err = read_tree(&mut BitReader::new(&[0u8; 0][..])).unwrap_err();
        assert!(err.is_corrupt_input());
    }
}
