/// Vector codec errors. Decoding malformed bytes always fails loudly,
/// never returning a silent zero-length vector.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    #[error("encoded vector truncated: {len} bytes is shorter than the header")]
    Truncated { len: usize },

    #[error("encoded vector declares {declared} elements but carries {actual}")]
    LengthMismatch { declared: usize, actual: usize },

    #[error("encoded vector has {extra} trailing bytes")]
    TrailingBytes { extra: usize },

    #[error("vector has {actual} dimensions, expected {expected}")]
    DimensionMismatch { expected: usize, actual: usize },
}
