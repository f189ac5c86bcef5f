use tangle_types::{EncodingError, SecurityLevel};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BundleError {
    #[error(transparent)]
    Encoding(#[from] EncodingError),

    #[error("bundle has no transfers")]
    EmptyBundle,

    #[error("output {index} has negative value {value}")]
    NegativeOutput { index: usize, value: i64 },

    #[error("input {index} must have a negative value, got {value}")]
    NonNegativeInput { index: usize, value: i64 },

    #[error("bundle is imbalanced: inputs {inputs}, outputs {outputs}")]
    ImbalancedBundle { inputs: i128, outputs: i128 },

    #[error("{inputs} inputs but {key_indices} key indices")]
    TooManyInputs { inputs: usize, key_indices: usize },

    #[error("input {index} uses security level {actual}, bundle uses {expected}")]
    SecurityLevelMismatch {
        index: usize,
        expected: SecurityLevel,
        actual: SecurityLevel,
    },

    #[error("input {index} address is not derived from key index {key_index}")]
    InputAddressMismatch { index: usize, key_index: u64 },

    #[error("message of output {index}: {source}")]
    Message {
        index: usize,
        #[source]
        source: EncodingError,
    },

    #[error("invalid bundle: {0}")]
    InvalidBundle(#[from] InvalidBundleReason),
}

/// Why a bundle failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidBundleReason {
    #[error("no transactions")]
    Empty,

    #[error("expected current index {expected}, found {actual}")]
    IndexGap { expected: usize, actual: usize },

    #[error("transaction {index} disagrees on the last index")]
    LastIndexMismatch { index: usize },

    #[error("tail declares {declared} transactions, found {actual}")]
    LengthMismatch { declared: usize, actual: usize },

    #[error("transaction {index} carries a different bundle hash")]
    BundleHashMismatch { index: usize },

    #[error("recomputed essence hash does not match the bundle hash")]
    EssenceHash,

    #[error("values sum to {sum}")]
    ValueImbalance { sum: i128 },

    #[error("signature of input {index} does not verify")]
    InvalidSignature { index: usize },

    #[error("transaction {index} does not hash to the requested hash")]
    TransactionHash { index: usize },

    #[error("transaction {index} cannot be decoded: {source}")]
    Malformed {
        index: usize,
        #[source]
        source: EncodingError,
    },
}
