use tangle_types::EncodingError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    #[error(transparent)]
    Encoding(#[from] EncodingError),

    #[error("address has no checksum")]
    MissingChecksum,

    #[error("invalid address checksum: expected {expected}, got {actual}")]
    InvalidChecksum { expected: String, actual: String },
}
