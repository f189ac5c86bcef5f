//! Stateless bundle validation.

use tangle_crypto::{bundle_hash, verify_signature};
use tangle_types::{Bundle, Fragment, Transaction};

use crate::error::{BundleError, InvalidBundleReason};

/// Most fragments an input signature can span (security level 3).
const MAX_SIGNATURE_FRAGMENTS: usize = 3;

/// Validate a complete bundle without consulting a node.
///
/// Checks, in order: index continuity, agreement with the tail on the last
/// index and the bundle hash, the declared length, a zero value sum, the recomputed essence hash, and every
/// input signature. The first violation is reported.
pub fn validate_bundle(bundle: &Bundle) -> Result<(), BundleError> {
    let transactions = bundle.transactions();
    let tail = transactions.first().ok_or(InvalidBundleReason::Empty)?;
    let last_index = tail.last_index;

    for (expected, tx) in transactions.iter().enumerate() {
        if tx.current_index != expected {
            return Err(InvalidBundleReason::IndexGap {
                expected,
                actual: tx.current_index,
            }
            .into());
        }
        if tx.last_index != last_index {
            return Err(InvalidBundleReason::LastIndexMismatch { index: expected }.into());
        }
        if tx.bundle != tail.bundle {
            return Err(InvalidBundleReason::BundleHashMismatch { index: expected }.into());
        }
    }
    if transactions.len() != last_index + 1 {
        return Err(InvalidBundleReason::LengthMismatch {
            declared: last_index + 1,
            actual: transactions.len(),
        }
        .into());
    }

    let sum = bundle.value_sum();
    if sum != 0 {
        return Err(InvalidBundleReason::ValueImbalance { sum }.into());
    }

    if bundle_hash(transactions)? != tail.bundle {
        return Err(InvalidBundleReason::EssenceHash.into());
    }

    for (index, tx) in transactions.iter().enumerate() {
        if tx.value >= 0 {
            continue;
        }
        let fragments = signature_fragments(&transactions[index..]);
        if !verify_signature(&tx.address, &fragments, &tail.bundle) {
            tracing::debug!(index, address = %tx.address, "signature rejected");
            return Err(InvalidBundleReason::InvalidSignature { index }.into());
        }
    }

    Ok(())
}

/// Decodes one transaction; `index` identifies it in the error.
///
/// A string that does not decode is reported as an invalid bundle.
pub fn decode_transaction(trytes: &str, index: usize) -> Result<Transaction, BundleError> {
    Transaction::from_trytes(trytes)
        .map_err(|source| InvalidBundleReason::Malformed { index, source }.into())
}

/// Decodes tryte strings received in any order and validates the bundle.
pub fn validate_bundle_trytes<I, S>(trytes: I) -> Result<Bundle, BundleError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let transactions = trytes
        .into_iter()
        .enumerate()
        .map(|(index, t)| decode_transaction(t.as_ref(), index))
        .collect::<Result<Vec<_>, _>>()?;
    let bundle = Bundle::new(transactions);
    validate_bundle(&bundle)?;
    Ok(bundle)
}

/// The input transaction's fragment followed by those of its zero-value
/// continuations at the same address.
fn signature_fragments(from_input: &[Transaction]) -> Vec<Fragment> {
    let input = &from_input[0];
    let continuations = from_input[1..]
        .iter()
        .take_while(|tx| tx.value == 0 && tx.address == input.address);
    std::iter::once(input)
        .chain(continuations)
        .take(MAX_SIGNATURE_FRAGMENTS)
        .map(|tx| tx.signature_message_fragment.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BundleBuilder;
    use tangle_crypto::derive_address;
    use tangle_types::{Address, Input, SecurityLevel, Seed, Transfer};

    fn seed() -> Seed {
        Seed::from_trytes("VALIDATORSEED").unwrap()
    }

    fn signed_bundle(security: SecurityLevel) -> Bundle {
        let recipient: Address = "Q".repeat(81).parse().unwrap();
        BundleBuilder::new(security)
            .output(Transfer::new(recipient, 8))
            .input(Input {
                address: derive_address(&seed(), 3, security),
                balance: 8,
                key_index: 3,
                security,
            })
            .build(&seed())
            .unwrap()
    }

    fn invalid(bundle: &Bundle) -> InvalidBundleReason {
        match validate_bundle(bundle) {
            Err(BundleError::InvalidBundle(reason)) => reason,
            other => panic!("expected invalid bundle, got {other:?}"),
        }
    }

    #[test]
    fn built_bundles_validate() {
        for security in [SecurityLevel::Low, SecurityLevel::Medium, SecurityLevel::High] {
            let bundle = signed_bundle(security);
            assert_eq!(bundle.len(), 1 + security.fragments());
            assert!(validate_bundle(&bundle).is_ok());
        }
    }

    #[test]
    fn empty_bundle_is_invalid() {
        assert_eq!(invalid(&Bundle::new(Vec::new())), InvalidBundleReason::Empty);
    }

    #[test]
    fn missing_transaction_is_an_index_gap() {
        let mut txs = signed_bundle(SecurityLevel::Medium).into_transactions();
        txs.remove(1);
        assert_eq!(
            invalid(&Bundle::new(txs)),
            InvalidBundleReason::IndexGap {
                expected: 1,
                actual: 2
            }
        );
    }

    #[test]
    fn missing_final_transaction_is_short() {
        let mut txs = signed_bundle(SecurityLevel::Medium).into_transactions();
        txs.pop();
        assert_eq!(
            invalid(&Bundle::new(txs)),
            InvalidBundleReason::LengthMismatch {
                declared: 3,
                actual: 2
            }
        );
    }

    #[test]
    fn continuation_disagreeing_with_tail_on_last_index() {
        let mut bundle = signed_bundle(SecurityLevel::Low);
        bundle.transactions_mut()[1].last_index = 4;
        assert_eq!(
            invalid(&bundle),
            InvalidBundleReason::LastIndexMismatch { index: 1 }
        );
    }

    #[test]
    fn trytes_validate_in_any_order() {
        let bundle = signed_bundle(SecurityLevel::Low);
        let trytes = bundle.to_trytes().unwrap();
        assert_eq!(validate_bundle_trytes(trytes.iter().rev()).unwrap(), bundle);
    }

    #[test]
    fn undecodable_trytes_are_malformed() {
        let mut trytes = signed_bundle(SecurityLevel::Low).to_trytes().unwrap();
        // A negative timestamp cannot be decoded.
        let mut trits = tangle_types::trytes_to_trits(&trytes[1]).unwrap();
        trits[tangle_types::transaction::layout::TIMESTAMP.end - 1] = -1;
        trytes[1] = tangle_types::trits_to_trytes(&trits).unwrap();
        assert!(matches!(
            validate_bundle_trytes(&trytes),
            Err(BundleError::InvalidBundle(InvalidBundleReason::Malformed {
                index: 1,
                ..
            }))
        ));
    }

    #[test]
    fn mismatched_bundle_hash_detected() {
        let mut bundle = signed_bundle(SecurityLevel::Low);
        bundle.transactions_mut()[1].bundle = "X".repeat(81).parse().unwrap();
        assert_eq!(
            invalid(&bundle),
            InvalidBundleReason::BundleHashMismatch { index: 1 }
        );
    }

    #[test]
    fn value_change_is_imbalanced() {
        let mut bundle = signed_bundle(SecurityLevel::Low);
        bundle.transactions_mut()[0].value += 1;
        assert_eq!(invalid(&bundle), InvalidBundleReason::ValueImbalance { sum: 1 });
    }

    #[test]
    fn balanced_value_shift_breaks_the_essence() {
        let mut bundle = signed_bundle(SecurityLevel::Low);
        let txs = bundle.transactions_mut();
        txs[0].value += 1;
        txs[1].value -= 1;
        assert_eq!(invalid(&bundle), InvalidBundleReason::EssenceHash);
    }

    #[test]
    fn tampered_signature_detected() {
        let mut bundle = signed_bundle(SecurityLevel::Medium);
        bundle.transactions_mut()[2].signature_message_fragment = Fragment::empty();
        assert_eq!(
            invalid(&bundle),
            InvalidBundleReason::InvalidSignature { index: 1 }
        );
    }

    #[test]
    fn validation_is_repeatable() {
        let bundle = signed_bundle(SecurityLevel::Low);
        assert_eq!(validate_bundle(&bundle), validate_bundle(&bundle));
    }
}
