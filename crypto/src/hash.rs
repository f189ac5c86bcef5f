//! Curl-P-81 hashing for transactions and bundles.

use tangle_types::{EncodingError, Hash, Transaction, Trit};

use crate::curl::{CurlP, Sponge};

/// Hash arbitrary trits with Curl-P-81.
pub fn curl_hash(input: &[Trit]) -> Hash {
    CurlP::default().digest(input)
}

/// Hash of all 8019 trits of a transaction.
pub fn transaction_hash(tx: &Transaction) -> Result<Hash, EncodingError> {
    Ok(curl_hash(&tx.to_trits()?))
}

/// Bundle hash over the essences of `transactions`, absorbed in slice order.
pub fn bundle_hash(transactions: &[Transaction]) -> Result<Hash, EncodingError> {
    let mut curl = CurlP::default();
    for tx in transactions {
        curl.absorb(&tx.essence_trits()?);
    }
    let mut out = [0; tangle_types::HASH_TRITS];
    curl.squeeze_into(&mut out);
    Ok(Hash::new(out))
}
