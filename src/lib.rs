//! Static Huffman compression of arbitrary byte streams.
//!
//! A compressed stream is a 1024-byte frequency header (256 little-endian
//! `u32` counts), the preorder-serialized code tree padded to a byte
//! boundary, and the packed code bits with the final byte zero-padded.
//! Empty input compresses to the header alone.
//!
//! ```
//! let packed = huffman_static::compress_bytes(b"aaaabbbcc")?;
//! assert_eq!(huffman_static::decompress_bytes(&packed)?, b"aaaabbbcc");
//! # Ok::<(), huffman_static::Error>(())
//! ```

pub mod bits;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod frequency;
pub mod heap;
pub mod huffman;
pub mod tree_codec;

pub use decoder::{decompress, decompress_bytes};
pub use encoder::{compress, compress_bytes, CompressStats};
pub use error::{Error, Result};
pub use frequency::{FrequencyTable, Symbol, HEADER_LEN, SYMBOL_COUNT};
pub use huffman::{build_code_table, build_huffman_tree, Code, CodeTable, HuffmanTree, Node};
pub use tree_codec::MAX_TREE_DEPTH;
