//! Bundle construction.
//!
//! Transactions are laid out outputs first, then one transaction per key
//! fragment of every input, then the optional remainder. The essence hash is
//! rerolled by bumping the tail's obsolete tag until signing it cannot expose
//! an unhashed key segment.

use tangle_crypto::{bundle_hash, is_insecure};
use tangle_types::{
    Address, Bundle, Clock, Fragment, Hash, Input, SecurityLevel, Seed, SystemClock, Tag,
    Transaction, Transfer, FRAGMENT_TRYTES,
};

use crate::signer::{sign_inputs, InputSlot};
use crate::BundleError;

/// Collects outputs, inputs and a remainder address, then builds a signed bundle.
pub struct BundleBuilder<C = SystemClock> {
    security: SecurityLevel,
    clock: C,
    outputs: Vec<Transfer>,
    inputs: Vec<Input>,
    remainder: Option<Address>,
}

impl BundleBuilder<SystemClock> {
    pub fn new(security: SecurityLevel) -> Self {
        Self {
            security,
            clock: SystemClock,
            outputs: Vec::new(),
            inputs: Vec::new(),
            remainder: None,
        }
    }
}

impl<C: Clock> BundleBuilder<C> {
    pub fn with_clock<D: Clock>(self, clock: D) -> BundleBuilder<D> {
        BundleBuilder {
            security: self.security,
            clock,
            outputs: self.outputs,
            inputs: self.inputs,
            remainder: self.remainder,
        }
    }

    pub fn output(mut self, transfer: Transfer) -> Self {
        self.outputs.push(transfer);
        self
    }

    pub fn outputs(mut self, transfers: impl IntoIterator<Item = Transfer>) -> Self {
        self.outputs.extend(transfers);
        self
    }

    pub fn input(mut self, input: Input) -> Self {
        self.inputs.push(input);
        self
    }

    /// Address receiving whatever the inputs hold beyond the outputs.
    pub fn remainder(mut self, address: Address) -> Self {
        self.remainder = Some(address);
        self
    }

    /// Lays out, finalizes and signs the bundle.
    pub fn build(self, seed: &Seed) -> Result<Bundle, BundleError> {
        let (mut transactions, slots) = self.layout()?;
        let hash = finalize(&mut transactions)?;
        sign_inputs(&mut transactions, &hash, seed, &slots)?;
        Ok(Bundle::new(transactions))
    }

    /// Builds a bundle that moves no value, so nothing needs signing.
    pub fn build_unsigned(self) -> Result<Bundle, BundleError> {
        if !self.inputs.is_empty() {
            return Err(BundleError::TooManyInputs {
                inputs: self.inputs.len(),
                key_indices: 0,
            });
        }
        let (mut transactions, _) = self.layout()?;
        finalize(&mut transactions)?;
        Ok(Bundle::new(transactions))
    }

    fn layout(&self) -> Result<(Vec<Transaction>, Vec<InputSlot<'_>>), BundleError> {
        if self.outputs.is_empty() && self.inputs.is_empty() {
            return Err(BundleError::EmptyBundle);
        }
        let surplus = self.check_balance()?;

        let timestamp = self.clock.now().as_secs();
        let mut transactions = Vec::new();
        let mut tag = Tag::EMPTY;

        for (index, output) in self.outputs.iter().enumerate() {
            let fragments = message_fragments(&output.message)
                .map_err(|source| BundleError::Message { index, source })?;
            for (i, fragment) in fragments.into_iter().enumerate() {
                transactions.push(Transaction {
                    signature_message_fragment: fragment,
                    address: output.address.without_checksum(),
                    value: if i == 0 { output.value } else { 0 },
                    obsolete_tag: output.tag,
                    tag: output.tag,
                    timestamp,
                    ..Transaction::default()
                });
            }
            tag = output.tag;
        }

        let mut slots = Vec::with_capacity(self.inputs.len());
        for (index, input) in self.inputs.iter().enumerate() {
            if input.security != self.security {
                return Err(BundleError::SecurityLevelMismatch {
                    index,
                    expected: self.security,
                    actual: input.security,
                });
            }
            slots.push(InputSlot {
                input,
                first_tx: transactions.len(),
            });
            for i in 0..input.security.fragments() {
                transactions.push(Transaction {
                    address: input.address.without_checksum(),
                    value: if i == 0 { -(input.balance as i64) } else { 0 },
                    obsolete_tag: tag,
                    tag,
                    timestamp,
                    ..Transaction::default()
                });
            }
        }

        if let (Some(address), true) = (&self.remainder, surplus > 0) {
            transactions.push(Transaction {
                address: address.without_checksum(),
                value: surplus as i64,
                obsolete_tag: tag,
                tag,
                timestamp,
                ..Transaction::default()
            });
        }

        let last_index = transactions.len() - 1;
        for (i, tx) in transactions.iter_mut().enumerate() {
            tx.current_index = i;
            tx.last_index = last_index;
        }
        Ok((transactions, slots))
    }

    /// Returns the input surplus left for the remainder address.
    fn check_balance(&self) -> Result<i128, BundleError> {
        let mut outputs: i128 = 0;
        for (index, output) in self.outputs.iter().enumerate() {
            if output.value < 0 {
                return Err(BundleError::NegativeOutput {
                    index,
                    value: output.value,
                });
            }
            outputs += output.value as i128;
        }
        let inputs: i128 = self.inputs.iter().map(|i| i.balance as i128).sum();
        let surplus = inputs - outputs;
        if surplus < 0 || (surplus > 0 && self.remainder.is_none()) {
            return Err(BundleError::ImbalancedBundle {
                inputs: -inputs,
                outputs,
            });
        }
        Ok(surplus)
    }
}

/// Splits a tryte message into 2187-tryte fragments; an empty message still
/// takes one transaction.
fn message_fragments(message: &str) -> Result<Vec<Fragment>, tangle_types::EncodingError> {
    if message.is_empty() {
        return Ok(vec![Fragment::empty()]);
    }
    let symbols: Vec<char> = message.chars().collect();
    symbols
        .chunks(FRAGMENT_TRYTES)
        .map(|chunk| Fragment::from_trytes(&chunk.iter().collect::<String>()))
        .collect()
}

/// Computes the bundle hash, rerolling the tail's obsolete tag until the
/// normalized hash is safe to sign, and stores it on every transaction.
fn finalize(transactions: &mut [Transaction]) -> Result<Hash, BundleError> {
    let mut rerolls = 0u32;
    loop {
        let hash = bundle_hash(transactions)?;
        if !is_insecure(&hash) {
            for tx in transactions.iter_mut() {
                tx.bundle = hash;
            }
            tracing::info!(
                bundle = %hash,
                transactions = transactions.len(),
                rerolls,
                "bundle finalized"
            );
            return Ok(hash);
        }
        transactions[0].obsolete_tag.increment();
        rerolls += 1;
    }
}

/// Builds a bundle spending `inputs` (negative values) into `outputs`.
///
/// `inputs_key_index[i]` is the key index of `inputs[i]`, derived at
/// `security`. Values must balance exactly; use [`BundleBuilder`] for a
/// remainder address.
pub fn build_bundle<C: Clock>(
    seed: &Seed,
    security: SecurityLevel,
    inputs: &[Transfer],
    outputs: &[Transfer],
    inputs_key_index: &[u64],
    clock: C,
) -> Result<Bundle, BundleError> {
    if inputs.len() != inputs_key_index.len() {
        return Err(BundleError::TooManyInputs {
            inputs: inputs.len(),
            key_indices: inputs_key_index.len(),
        });
    }
    let mut builder = BundleBuilder::new(security)
        .with_clock(clock)
        .outputs(outputs.iter().cloned());
    for (index, (transfer, &key_index)) in inputs.iter().zip(inputs_key_index).enumerate() {
        if transfer.value >= 0 {
            return Err(BundleError::NonNegativeInput {
                index,
                value: transfer.value,
            });
        }
        builder = builder.input(Input {
            address: transfer.address,
            balance: transfer.value.unsigned_abs(),
            key_index,
            security,
        });
    }
    if inputs.is_empty() {
        builder.build_unsigned()
    } else {
        builder.build(seed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate_bundle;
    use tangle_crypto::derive_address;
    use tangle_types::Timestamp;

    struct FixedClock;

    impl Clock for FixedClock {
        fn now(&self) -> Timestamp {
            Timestamp::from_secs(1_700_000_000)
        }
    }

    fn seed() -> Seed {
        Seed::from_trytes("BUILDERSEED").unwrap()
    }

    fn recipient() -> Address {
        "R".repeat(81).parse().unwrap()
    }

    fn funded_input(index: u64, balance: u64) -> Input {
        Input {
            address: derive_address(&seed(), index, SecurityLevel::Low),
            balance,
            key_index: index,
            security: SecurityLevel::Low,
        }
    }

    #[test]
    fn zero_value_bundle_with_message() {
        let bundle = BundleBuilder::new(SecurityLevel::Low)
            .with_clock(FixedClock)
            .output(Transfer::new(recipient(), 0).with_message("HELLO"))
            .build_unsigned()
            .unwrap();
        assert_eq!(bundle.len(), 1);
        let tail = bundle.tail().unwrap();
        assert!(tail.signature_message_fragment.to_string().starts_with("HELLO9"));
        assert_eq!(tail.timestamp, 1_700_000_000);
        assert!(validate_bundle(&bundle).is_ok());
    }

    #[test]
    fn ascii_message_reads_back_from_the_fragment() {
        let bundle = BundleBuilder::new(SecurityLevel::Low)
            .output(
                Transfer::new(recipient(), 0)
                    .with_ascii_message("Hello, tangle!")
                    .unwrap(),
            )
            .build_unsigned()
            .unwrap();
        let fragment = bundle.tail().unwrap().signature_message_fragment.to_string();
        assert_eq!(
            tangle_types::trytes_to_ascii_trimmed(&fragment[..FRAGMENT_TRYTES - 1]).unwrap(),
            "Hello, tangle!"
        );
    }

    #[test]
    fn long_message_spans_transactions() {
        let message = "A".repeat(FRAGMENT_TRYTES * 2 + 1);
        let bundle = BundleBuilder::new(SecurityLevel::Low)
            .output(Transfer::new(recipient(), 0).with_message(message))
            .build_unsigned()
            .unwrap();
        assert_eq!(bundle.len(), 3);
        assert!(bundle.iter().all(|tx| tx.value == 0 && tx.last_index == 2));
        assert!(validate_bundle(&bundle).is_ok());
    }

    #[test]
    fn exact_message_length_uses_one_transaction() {
        let bundle = BundleBuilder::new(SecurityLevel::Low)
            .output(Transfer::new(recipient(), 0).with_message("B".repeat(FRAGMENT_TRYTES)))
            .build_unsigned()
            .unwrap();
        assert_eq!(bundle.len(), 1);
    }

    #[test]
    fn bad_message_names_the_output() {
        let err = BundleBuilder::new(SecurityLevel::Low)
            .output(Transfer::new(recipient(), 0))
            .output(Transfer::new(recipient(), 0).with_message("not trytes"))
            .build_unsigned()
            .unwrap_err();
        assert!(matches!(err, BundleError::Message { index: 1, .. }));
    }

    #[test]
    fn signed_transfer_with_remainder() {
        let remainder = derive_address(&seed(), 9, SecurityLevel::Low);
        let bundle = BundleBuilder::new(SecurityLevel::Low)
            .with_clock(FixedClock)
            .output(Transfer::new(recipient(), 3).with_tag("PAYMENT".parse().unwrap()))
            .input(funded_input(0, 10))
            .remainder(remainder)
            .build(&seed())
            .unwrap();
        let values: Vec<_> = bundle.iter().map(|tx| tx.value).collect();
        assert_eq!(values, vec![3, -10, 7]);
        assert_eq!(bundle.transactions()[2].address, remainder);
        assert!(bundle.transactions()[2].tag.to_string().starts_with("PAYMENT"));
        assert!(!bundle.transactions()[1].signature_message_fragment.is_empty());
        assert!(validate_bundle(&bundle).is_ok());
    }

    #[test]
    fn finalized_hash_is_safe_to_sign() {
        let bundle = BundleBuilder::new(SecurityLevel::Low)
            .output(Transfer::new(recipient(), 2))
            .input(funded_input(1, 2))
            .build(&seed())
            .unwrap();
        assert!(!is_insecure(bundle.hash().unwrap()));
        assert!(bundle.iter().all(|tx| tx.bundle == *bundle.hash().unwrap()));
    }

    #[test]
    fn surplus_without_remainder_is_imbalanced() {
        let err = BundleBuilder::new(SecurityLevel::Low)
            .output(Transfer::new(recipient(), 3))
            .input(funded_input(0, 10))
            .build(&seed())
            .unwrap_err();
        assert_eq!(
            err,
            BundleError::ImbalancedBundle {
                inputs: -10,
                outputs: 3
            }
        );
    }

    #[test]
    fn insufficient_inputs_are_imbalanced() {
        let err = BundleBuilder::new(SecurityLevel::Low)
            .output(Transfer::new(recipient(), 11))
            .input(funded_input(0, 10))
            .remainder(recipient())
            .build(&seed())
            .unwrap_err();
        assert!(matches!(err, BundleError::ImbalancedBundle { .. }));
    }

    #[test]
    fn negative_output_rejected() {
        let err = BundleBuilder::new(SecurityLevel::Low)
            .output(Transfer::new(recipient(), -1))
            .build_unsigned()
            .unwrap_err();
        assert_eq!(err, BundleError::NegativeOutput { index: 0, value: -1 });
    }

    #[test]
    fn empty_builder_rejected() {
        let err = BundleBuilder::new(SecurityLevel::Low).build_unsigned().unwrap_err();
        assert_eq!(err, BundleError::EmptyBundle);
    }

    #[test]
    fn input_security_must_match_bundle() {
        let err = BundleBuilder::new(SecurityLevel::Medium)
            .output(Transfer::new(recipient(), 10))
            .input(funded_input(0, 10))
            .build(&seed())
            .unwrap_err();
        assert!(matches!(err, BundleError::SecurityLevelMismatch { index: 0, .. }));
    }

    #[test]
    fn build_bundle_balances_exactly() {
        let input_address = derive_address(&seed(), 4, SecurityLevel::Medium);
        let bundle = build_bundle(
            &seed(),
            SecurityLevel::Medium,
            &[Transfer::new(input_address, -5)],
            &[Transfer::new(recipient(), 5)],
            &[4],
            FixedClock,
        )
        .unwrap();
        // one output, two fragments for the medium-security input
        assert_eq!(bundle.len(), 3);
        assert_eq!(bundle.value_sum(), 0);
        assert!(validate_bundle(&bundle).is_ok());
    }

    #[test]
    fn build_bundle_key_index_count_must_match() {
        let err = build_bundle(
            &seed(),
            SecurityLevel::Low,
            &[Transfer::new(recipient(), -5)],
            &[Transfer::new(recipient(), 5)],
            &[],
            FixedClock,
        )
        .unwrap_err();
        assert_eq!(
            err,
            BundleError::TooManyInputs {
                inputs: 1,
                key_indices: 0
            }
        );
    }

    #[test]
    fn build_bundle_detects_security_mismatch() {
        let low_address = derive_address(&seed(), 2, SecurityLevel::Low);
        let err = build_bundle(
            &seed(),
            SecurityLevel::Medium,
            &[Transfer::new(low_address, -5)],
            &[Transfer::new(recipient(), 5)],
            &[2],
            FixedClock,
        )
        .unwrap_err();
        assert_eq!(
            err,
            BundleError::SecurityLevelMismatch {
                index: 0,
                expected: SecurityLevel::Medium,
                actual: SecurityLevel::Low
            }
        );
    }

    #[test]
    fn build_bundle_rejects_foreign_address() {
        let err = build_bundle(
            &seed(),
            SecurityLevel::Low,
            &[Transfer::new(recipient(), -5)],
            &[Transfer::new(recipient(), 5)],
            &[0],
            FixedClock,
        )
        .unwrap_err();
        assert_eq!(
            err,
            BundleError::InputAddressMismatch {
                index: 0,
                key_index: 0
            }
        );
    }

    #[test]
    fn build_bundle_requires_exact_balance() {
        let input_address = derive_address(&seed(), 0, SecurityLevel::Low);
        let err = build_bundle(
            &seed(),
            SecurityLevel::Low,
            &[Transfer::new(input_address, -6)],
            &[Transfer::new(recipient(), 5)],
            &[0],
            FixedClock,
        )
        .unwrap_err();
        assert!(matches!(err, BundleError::ImbalancedBundle { .. }));
    }

    #[test]
    fn build_bundle_rejects_positive_input() {
        let err = build_bundle(
            &seed(),
            SecurityLevel::Low,
            &[Transfer::new(recipient(), 5)],
            &[Transfer::new(recipient(), 5)],
            &[0],
            FixedClock,
        )
        .unwrap_err();
        assert_eq!(err, BundleError::NonNegativeInput { index: 0, value: 5 });
    }
}
