//! Rebuilding a bundle by walking trunk references from its tail.

use tangle_bundle::{decode_transaction, validate_bundle, BundleError, InvalidBundleReason};
use tangle_crypto::transaction_hash;
use tangle_types::{Bundle, Hash, Transaction};

use crate::node::{NodeApi, NodeError};
use crate::ClientError;

/// Fetches one transaction and checks the node returned what was asked for.
fn fetch<N: NodeApi + ?Sized>(
    node: &N,
    hash: &Hash,
    index: usize,
) -> Result<Transaction, ClientError> {
    let mut trytes = node.get_trytes(std::slice::from_ref(hash))?;
    if trytes.len() != 1 {
        return Err(NodeError::Response(format!(
            "asked for 1 transaction, got {}",
            trytes.len()
        ))
        .into());
    }
    let trytes = trytes.swap_remove(0);
    if trytes.is_empty() || trytes.bytes().all(|b| b == b'9') {
        return Err(ClientError::TransactionNotFound(*hash));
    }
    let tx = decode_transaction(&trytes, index)?;
    if transaction_hash(&tx)? != *hash {
        return Err(BundleError::from(InvalidBundleReason::TransactionHash { index }).into());
    }
    Ok(tx)
}

/// Collects the bundle starting at `tail` without validating it.
///
/// Stops at the transaction whose current index equals its last index, or
/// fails once more than `max_len` transactions would be needed.
#[tracing::instrument(level = "debug", skip_all, fields(tail = %tail, max_len))]
pub fn traverse_bundle<N: NodeApi + ?Sized>(
    node: &N,
    tail: &Hash,
    max_len: usize,
) -> Result<Bundle, ClientError> {
    let first = fetch(node, tail, 0)?;
    if !first.is_tail() {
        return Err(ClientError::NotATail {
            hash: *tail,
            current_index: first.current_index,
        });
    }
    if first.last_index >= max_len {
        return Err(ClientError::BundleTooLong { max: max_len });
    }

    let mut transactions = vec![first];
    loop {
        let current = &transactions[transactions.len() - 1];
        if current.current_index >= current.last_index {
            break;
        }
        if transactions.len() >= max_len {
            return Err(ClientError::BundleTooLong { max: max_len });
        }
        let next_hash = current.trunk;
        let next = fetch(node, &next_hash, transactions.len())?;
        tracing::trace!(
            index = next.current_index,
            hash = %next_hash,
            "fetched bundle transaction"
        );
        transactions.push(next);
    }

    Ok(Bundle::new(transactions))
}

/// Walks the bundle from `tail` and validates it.
pub fn traverse_and_validate<N: NodeApi + ?Sized>(
    node: &N,
    tail: &Hash,
    max_len: usize,
) -> Result<Bundle, ClientError> {
    let bundle = traverse_bundle(node, tail, max_len)?;
    validate_bundle(&bundle)?;
    tracing::debug!(tail = %tail, transactions = bundle.len(), "bundle validated");
    Ok(bundle)
}
