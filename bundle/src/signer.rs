//! Writes one-time signatures into a finalized bundle.

use tangle_crypto::PrivateKey;
use tangle_types::{Hash, Input, SecurityLevel, Seed, Transaction};

use crate::BundleError;

/// Where an input's transactions start within the bundle.
#[derive(Clone, Debug)]
pub(crate) struct InputSlot<'a> {
    pub input: &'a Input,
    pub first_tx: usize,
}

/// Derives each input's key, checks it owns the input address and writes the
/// signature fragments over the input transaction and its continuations.
pub(crate) fn sign_inputs(
    transactions: &mut [Transaction],
    bundle_hash: &Hash,
    seed: &Seed,
    slots: &[InputSlot<'_>],
) -> Result<(), BundleError> {
    for (index, slot) in slots.iter().enumerate() {
        let input = slot.input;
        let key = PrivateKey::derive(seed, input.key_index, input.security);
        if key.address() != input.address {
            return Err(diagnose_mismatch(seed, index, input));
        }
        tracing::debug!(
            index,
            key_index = input.key_index,
            security = %input.security,
            "signing input"
        );
        let fragments = key.sign(bundle_hash);
        let targets = &mut transactions[slot.first_tx..slot.first_tx + fragments.len()];
        for (tx, fragment) in targets.iter_mut().zip(fragments) {
            tx.signature_message_fragment = fragment;
        }
    }
    Ok(())
}

/// Distinguishes a wrong security level from an address the seed does not own.
fn diagnose_mismatch(seed: &Seed, index: usize, input: &Input) -> BundleError {
    let levels = [SecurityLevel::Low, SecurityLevel::Medium, SecurityLevel::High];
    for actual in levels.into_iter().filter(|&l| l != input.security) {
        if PrivateKey::derive(seed, input.key_index, actual).address() == input.address {
            return BundleError::SecurityLevelMismatch {
                index,
                expected: input.security,
                actual,
            };
        }
    }
    BundleError::InputAddressMismatch {
        index,
        key_index: input.key_index,
    }
}
