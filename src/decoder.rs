use std::io::{BufReader, Read, Write};
use std::time::Instant;

use log::{debug, info, trace};

use crate::bits::BitReader;
use crate::error::{Error, Result};
use crate::frequency::FrequencyTable;
use crate::huffman::Node;
use crate::tree_codec::read_tree;

/// Upper bound on the output buffer reserved up front from an unverified header.
const PREALLOC_LIMIT: u64 = 1 << 20;

/// Decompresses a stream written by [`crate::compress`] into `sink`.
///
/// Nothing reaches `sink` unless the whole data section decodes and its
/// symbol counts match the header. Returns the header's frequency table.
pub fn decompress<R: Read, W: Write>(source: R, mut sink: W) -> Result<FrequencyTable> {
    info!("--- Start Decoding ---");
    let mut source = BufReader::new(source);
    let freq = FrequencyTable::read_header(&mut source)?;
    let total = freq.total();

    if total == 0 {
        info!("Header describes empty input, nothing to decode");
        return Ok(freq);
    }

    let mut reader = BitReader::new(&mut source);
    let tree = read_tree(&mut reader)?;
    reader.align();

    let decoded = decode_data(&tree, &mut reader, total)?;
    verify_frequencies(&freq, &decoded)?;

    sink.write_all(&decoded)?;
    sink.flush()?;
    info!("Decoded {} bytes", decoded.len());
    Ok(freq)
}

/// Walks the tree bit by bit until `total` symbols are out; padding after
/// the last symbol is never read.
fn decode_data<R: Read>(root: &Node, reader: &mut BitReader<R>, total: u64) -> Result<Vec<u8>> {
    debug!("Starting bitstream decoding of {} symbols...", total);
    let start_time = Instant::now();
    let data_start = reader.bytes_read();

    let mut result = Vec::with_capacity(total.min(PREALLOC_LIMIT) as usize);
    let mut current = root;

    while (result.len() as u64) < total {
        let Some(bit) = reader.read_bit()? else {
            return Err(Error::TruncatedData {
                expected: total,
                decoded: result.len() as u64,
            });
        };
        let next: &Node = match current {
            Node::Internal { left, right, .. } => {
                if bit {
                    &**right
                } else {
                    &**left
                }
            }
            Node::Leaf { .. } => return Err(Error::malformed_tree("root is a leaf")),
        };
        match next {
            Node::Leaf { byte, .. } => {
                result.push(*byte);
                current = root;
            }
            Node::Internal { .. } => current = next,
        }
    }

    trace!("Consumed {} data bytes", reader.bytes_read() - data_start);
    debug!("Bitstream decoding finished in {:.2?}.", start_time.elapsed());
    Ok(result)
}

fn verify_frequencies(expected: &FrequencyTable, decoded: &[u8]) -> Result<()> {
    let actual = FrequencyTable::from_bytes(decoded);
    for symbol in 0..=u8::MAX {
        if expected.get(symbol) != actual.get(symbol) {
            return Err(Error::FrequencyMismatch {
                symbol,
                expected: expected.get(symbol),
                actual: actual.get(symbol),
            });
        }
    }
    Ok(())
}

/// Decompresses an in-memory buffer.
pub fn decompress_bytes(data: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    decompress(data, &mut out)?;
    Ok(out)
}
