//! Error types for compression and decompression.

use thiserror::Error;

/// Result type alias for codec operations.
pub type Result<T> = core::result::Result<T, Error>;

/// Codec error types.
#[derive(Debug, Error)]
pub enum Error {
    /// Could not reserve storage for the priority queue.
    #[error("allocation failed: could not reserve {requested} queue slots")]
    AllocationFailed { requested: usize },

    /// Insert into a priority queue that is already at capacity.
    #[error("priority queue full: capacity {capacity}")]
    QueueFull { capacity: usize },

    /// A symbol occurs more often than the header can record.
    #[error("symbol {symbol:#04x} occurs {count} times, header limit is u32::MAX")]
    SymbolCountOverflow { symbol: u8, count: u64 },

    /// Encoding met a symbol the code table has no entry for.
    #[error("no code for symbol {symbol:#04x}")]
    MissingCode { symbol: u8 },

    /// Input ended inside the frequency header.
    #[error("truncated header: got {bytes_read} of 1024 bytes")]
    TruncatedHeader { bytes_read: usize },

    /// Tree section is incomplete or describes an impossible tree.
    #[error("malformed tree: {reason}")]
    MalformedTree { reason: String },

    /// Data section ended before every symbol was decoded.
    #[error("truncated data: expected {expected} symbols, decoded {decoded}")]
    TruncatedData { expected: u64, decoded: u64 },

    /// Decoded output disagrees with the header's frequency table.
    #[error("frequency mismatch for symbol {symbol:#04x}: header says {expected}, decoded {actual}")]
    FrequencyMismatch {
        symbol: u8,
        expected: u64,
        actual: u64,
    },

    /// I/O error from the byte source or sink.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn malformed_tree(reason: impl Into<String>) -> Self {
        Error::MalformedTree {
            reason: reason.into(),
        }
    }

    /// True when the error means the compressed input is damaged.
    pub fn is_corrupt_input(&self) -> bool {
        matches!(
            self,
            Error::TruncatedHeader { .. }
                | Error::MalformedTree { .. }
                | Error::TruncatedData { .. }
                | Error::FrequencyMismatch { .. }
        )
    }
}
