use tangle_bundle::BundleError;
use tangle_types::{EncodingError, Hash};
use tangle_work::WorkError;
use thiserror::Error;

use crate::node::NodeError;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Node(#[from] NodeError),

    #[error(transparent)]
    Encoding(#[from] EncodingError),

    #[error(transparent)]
    Bundle(#[from] BundleError),

    #[error(transparent)]
    Work(#[from] WorkError),

    #[error("no unused address up to index {max_index}")]
    Exhausted { max_index: u64 },

    #[error("transaction {hash} has current index {current_index}, not a tail")]
    NotATail { hash: Hash, current_index: usize },

    #[error("bundle exceeds {max} transactions")]
    BundleTooLong { max: usize },

    #[error("node does not know transaction {0}")]
    TransactionNotFound(Hash),

    #[error("config error: {0}")]
    Config(String),
}
