//! Proof-of-work checks.

use tangle_crypto::transaction_hash;
use tangle_types::{Bundle, EncodingError, Hash, Transaction};

/// True when `hash` ends in at least `min_weight_magnitude` zero trits.
pub fn meets_min_weight(hash: &Hash, min_weight_magnitude: u8) -> bool {
    hash.trailing_zeros() >= min_weight_magnitude as usize
}

/// Hashes `transaction` and checks its weight.
pub fn validate_work(transaction: &Transaction, min_weight_magnitude: u8) -> Result<bool, EncodingError> {
    Ok(meets_min_weight(&transaction_hash(transaction)?, min_weight_magnitude))
}

/// Checks the weight of every transaction and that each non-head
/// transaction's trunk is the hash of the next one.
pub fn validate_attachment(bundle: &Bundle, min_weight_magnitude: u8) -> Result<bool, EncodingError> {
    let hashes = bundle
        .iter()
        .map(transaction_hash)
        .collect::<Result<Vec<_>, _>>()?;
    if !hashes.iter().all(|h| meets_min_weight(h, min_weight_magnitude)) {
        return Ok(false);
    }
    let linked = bundle
        .transactions()
        .windows(2)
        .zip(&hashes[1..])
        .all(|(pair, next_hash)| pair[0].trunk == *next_hash);
    Ok(linked)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weight_counts_trailing_trits() {
        let mut trits = [1; 243];
        trits[240..].fill(0);
        let hash = Hash::new(trits);
        assert!(meets_min_weight(&hash, 3));
        assert!(!meets_min_weight(&hash, 4));
        assert!(meets_min_weight(&Hash::NULL, 243));
    }

    #[test]
    fn zero_weight_always_passes() {
        assert!(validate_work(&Transaction::default(), 0).unwrap());
    }
}
