use thiserror::Error;

/// Failures raised by the encode/decode core.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodecError {
    /// The text holds a character the code table has no entry for.
    #[error("no code for symbol {symbol:?}")]
    MissingCodeEntry { symbol: char },

    /// The bit-string ended in the middle of a code.
    #[error("bit-string ends mid-code after {consumed} bits")]
    TruncatedBitStream { consumed: usize },

    #[error("invalid bit {bit:?} at position {position}")]
    InvalidBit { bit: char, position: usize },

    #[error("symbol {symbol:?} has a zero frequency")]
    ZeroFrequency { symbol: char },

    /// A non-empty bit-string came with nothing to decode it against.
    #[error("{len} bits given with an empty frequency table")]
    MissingTable { len: usize },

    #[error("cannot build a tree from an empty frequency table")]
    EmptyTable,

    /// Counts in the table sum past `usize::MAX`.
    #[error("frequency table total overflows")]
    FrequencyOverflow,

    #[error("cannot allocate {count} copies of {symbol:?}")]
    OutputTooLarge { symbol: char, count: usize },
}

pub type Result<T> = std::result::Result<T, CodecError>;
