//! Encoding errors shared by every crate that touches trits or trytes.

use thiserror::Error;

/// Failure to convert between bytes, trits, trytes and integer fields.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodingError {
    #[error("invalid tryte character {0:?}")]
    InvalidTryte(char),

    #[error("invalid trit value {0}")]
    InvalidTrit(i8),

    #[error("trit length {len} is not a multiple of {multiple}")]
    InvalidLength { len: usize, multiple: usize },

    #[error("expected length {expected}, got {actual}")]
    WrongLength { expected: usize, actual: usize },

    #[error("value {value} does not fit in {width} trits")]
    Overflow { value: i128, width: usize },

    #[error("{field} value {value} is out of range")]
    OutOfRange { field: &'static str, value: i128 },

    #[error("tryte pair value {0} is outside the byte range")]
    ByteOutOfRange(i16),

    #[error("character {0:?} cannot be encoded as ascii trytes")]
    NonAscii(char),
}
