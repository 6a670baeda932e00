use std::io::{BufWriter, Read, Write};

use log::{debug, error, info};

use crate::bits::BitWriter;
use crate::error::{Error, Result};
use crate::frequency::{FrequencyTable, HEADER_LEN};
use crate::huffman::{build_code_table, build_huffman_tree, CodeTable};
use crate::tree_codec::{tree_bits, write_tree};

/// What a compression run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct CompressStats {
    pub input_len: u64,
    pub output_len: u64,
    /// Serialized tree size before byte padding.
    pub tree_bits: u64,
    pub distinct_symbols: usize,
    /// Shannon entropy of the input, bits per symbol.
    pub entropy: f64,
}

impl CompressStats {
    /// Percentage of the input saved; negative when output grew.
    pub fn ratio(&self) -> f64 {
        if self.input_len == 0 {
            return 0.0;
        }
        100.0 * (1.0 - self.output_len as f64 / self.input_len as f64)
    }
}

/// Compresses everything `source` yields into `sink`.
///
/// The input is read to the end first, since the tree needs a full
/// frequency pass before any code can be emitted.
pub fn compress<R: Read, W: Write>(mut source: R, sink: W) -> Result<CompressStats> {
    let mut data = Vec::new();
    source.read_to_end(&mut data)?;
    info!("Compressing {} bytes", data.len());

    let freq = FrequencyTable::from_bytes(&data);
    let mut sink = BufWriter::new(sink);
    freq.write_header(&mut sink)?;

    let mut stats = CompressStats {
        input_len: data.len() as u64,
        output_len: HEADER_LEN as u64,
        tree_bits: 0,
        distinct_symbols: freq.distinct(),
        entropy: freq.entropy(),
    };

    let Some(tree) = build_huffman_tree(&freq)? else {
        sink.flush()?;
        info!("Empty input, wrote header only");
        return Ok(stats);
    };

    let mut writer = BitWriter::new(&mut sink);
    write_tree(&tree, &mut writer)?;
    writer.align()?;
    stats.tree_bits = tree_bits(&tree);
    let tree_len = stats.tree_bits.div_ceil(8);
    debug!("Tree section: {} bits in {} bytes", stats.tree_bits, tree_len);

    let table = build_code_table(&tree);
    let data_bits = encode_data(&data, &table, &mut writer)?;
    writer.finish()?;
    sink.flush()?;

    let data_len = data_bits.div_ceil(8);
    debug!("Data section: {} bits in {} bytes", data_bits, data_len);
    stats.output_len += tree_len + data_len;

    info!(
        "Compressed {} -> {} bytes ({:.2}% saved, entropy {:.4} bits/symbol)",
        stats.input_len,
        stats.output_len,
        stats.ratio(),
        stats.entropy
    );
    Ok(stats)
}

/// Emits each symbol's code; returns the number of data bits written.
fn encode_data<W: Write>(
    data: &[u8],
    table: &CodeTable,
    writer: &mut BitWriter<W>,
) -> Result<u64> {
    debug!("Starting data encoding...");
    let start = writer.bits_written();
    for &byte in data {
        let Some(code) = table.get(&byte) else {
            error!("Symbol {:#04x} found in data but not in code table", byte);
            return Err(Error::MissingCode { symbol: byte });
        };
        writer.write_code(code)?;
    }
    Ok(writer.bits_written() - start)
}

/// Compresses an in-memory buffer.
pub fn compress_bytes(data: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    compress(data, &mut out)?;
    Ok(out)
}
