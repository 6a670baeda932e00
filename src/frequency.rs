//! Per-symbol occurrence counts and the fixed-width header that carries them.

use std::io::{Read, Write};

use log::debug;

use crate::error::{Error, Result};

/// One byte value being compressed.
pub type Symbol = u8;

/// Number of distinct symbols a byte can take.
pub const SYMBOL_COUNT: usize = 256;

/// Serialized header size: one little-endian `u32` per symbol.
pub const HEADER_LEN: usize = SYMBOL_COUNT * 4;

/// Occurrence count for each of the 256 byte values.
///
/// Every entry is present; absent symbols count zero. The sum of all
/// entries equals the length of the input the table was built from.
#[derive(Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: [u64; SYMBOL_COUNT],
}

impl FrequencyTable {
    /// Counts every byte of `data` in one pass.
    pub fn from_bytes(data: &[u8]) -> Self {
        let mut counts = [0u64; SYMBOL_COUNT];
        for &byte in data {
            counts[byte as usize] += 1;
        }
        Self { counts }
    }

    /// Builds a table from explicit counts.
    pub fn from_counts(counts: [u64; SYMBOL_COUNT]) -> Self {
        Self { counts }
    }

    pub fn get(&self, symbol: Symbol) -> u64 {
        self.counts[symbol as usize]
    }

    pub fn counts(&self) -> &[u64; SYMBOL_COUNT] {
        &self.counts
    }

    /// Total number of symbols, i.e. the original input length.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Number of symbols with a nonzero count.
    pub fn distinct(&self) -> usize {
        self.counts.iter().filter(|&&c| c > 0).count()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.iter().all(|&c| c == 0)
    }

    /// Symbols with a nonzero count, ascending, paired with their counts.
    pub fn present(&self) -> impl Iterator<Item = (Symbol, u64)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|&(_, &count)| count > 0)
            .map(|(symbol, &count)| (symbol as Symbol, count))
    }

    /// Shannon entropy in bits per symbol; 0.0 for an empty table.
    pub fn entropy(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        let total_f = total as f64;

        let entropy: f64 = self
            .present()
            .map(|(_, count)| {
                let p = count as f64 / total_f;
                -p * p.log2()
            })
            .sum();

        debug!(
            "Calculated entropy: {:.4} bits/symbol (total samples: {})",
            entropy, total
        );
        entropy
    }

    /// Writes the 1024-byte header, ascending symbol order.
    ///
    /// Fails without writing anything if a count does not fit in `u32`.
    pub fn write_header<W: Write>(&self, sink: &mut W) -> Result<()> {
        let mut bytes = Vec::with_capacity(HEADER_LEN);
        for (symbol, &count) in self.counts.iter().enumerate() {
            let count32 = u32::try_from(count).map_err(|_| Error::SymbolCountOverflow {
                symbol: symbol as Symbol,
                count,
            })?;
            bytes.extend_from_slice(&count32.to_le_bytes());
        }
        sink.write_all(&bytes)?;
        debug!("Header written: {} bytes", bytes.len());
        Ok(())
    }

    /// Reads a header written by [`FrequencyTable::write_header`].
    pub fn read_header<R: Read>(source: &mut R) -> Result<Self> {
        let mut bytes = Vec::with_capacity(HEADER_LEN);
        source
            .by_ref()
            .take(HEADER_LEN as u64)
            .read_to_end(&mut bytes)?;
        if bytes.len() < HEADER_LEN {
            return Err(Error::TruncatedHeader {
                bytes_read: bytes.len(),
            });
        }

        let mut counts = [0u64; SYMBOL_COUNT];
        for (count, chunk) in counts.iter_mut().zip(bytes.chunks_exact(4)) {
            *count = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]) as u64;
        }
        let table = Self { counts };
        debug!(
            "Header read: {} distinct symbols, {} total",
            table.distinct(),
            table.total()
        );
        Ok(table)
    }
}

impl std::fmt::Debug for FrequencyTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.present()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_sum_to_input_length() {
        let table = FrequencyTable::from_bytes(b"aaaabbbcc");
        assert_eq!(table.get(b'a'), 4);
        assert_eq!(table.get(b'b'), 3);
        assert_eq!(table.get(b'c'), 2);
        assert_eq!(table.get(b'z'), 0);
        assert_eq!(table.total(), 9);
        assert_eq!(table.distinct(), 3);
    }

    #[test]
    fn present_is_ascending() {
        let table = FrequencyTable::from_bytes(b"zyxzz");
        let present: Vec<_> = table.present().collect();
        assert_eq!(present, vec![(b'x', 1), (b'y', 1), (b'z', 3)]);
    }

    #[test]
    fn empty_table() {
        let table = FrequencyTable::from_bytes(&[]);
        assert!(table.is_empty());
        assert_eq!(table.total(), 0);
        assert_eq!(table.entropy(), 0.0);
    }

    #[test]
    fn entropy_of_uniform_pair_is_one_bit() {
        let table = FrequencyTable::from_bytes(b"abab");
        assert!((table.entropy() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn header_is_little_endian_and_fixed_width() {
        let table = FrequencyTable::from_bytes(b"aab");
        let mut out = Vec::new();
        table.write_header(&mut out).unwrap();
        assert_eq!(out.len(), HEADER_LEN);
        let a = b'a' as usize * 4;
        assert_eq!(&out[a..a + 4], &[2, 0, 0, 0]);
        let b = b'b' as usize * 4;
        assert_eq!(&out[b..b + 4], &[1, 0, 0, 0]);

        let back = FrequencyTable::read_header(&mut out.as_slice()).unwrap();
        assert_eq!(back, table);
    }

    #[test]
    fn short_header_is_truncated() {
        let bytes = vec![0u8; 100];
        let err = FrequencyTable::read_header(&mut bytes.as_slice()).unwrap_err();
        assert!(matches!(err, Error::TruncatedHeader { bytes_read: 100 }));
    }

    #[test]
    fn oversized_count_is_rejected_before_writing() {
        let mut counts = [0u64; SYMBOL_COUNT];
        counts[7] = u32::MAX as u64 + 1;
        let mut out = Vec::new();
        let err = FrequencyTable::from_counts(counts)
            .write_header(&mut out)
            .unwrap_err();
        assert!(matches!(err, Error::SymbolCountOverflow { symbol: 7, .. }));
        assert!(out.is_empty());
    }
}
