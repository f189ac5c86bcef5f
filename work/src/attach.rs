//! Linking a bundle into the tangle and doing its proof-of-work.

use tangle_crypto::curl_hash;
use tangle_types::transaction::layout;
use tangle_types::{Bundle, Clock, Hash, SystemClock, MAX_TIMESTAMP};

use crate::generator::{WorkCancel, WorkGenerator};
use crate::WorkError;

/// The two existing transactions a bundle will approve.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tips {
    pub trunk: Hash,
    pub branch: Hash,
}

impl Tips {
    pub fn new(trunk: Hash, branch: Hash) -> Self {
        Self { trunk, branch }
    }

    /// Parses tips handed over as tryte strings.
    pub fn from_trytes(trunk: &str, branch: &str) -> Result<Self, WorkError> {
        let parse = |tip: &'static str, trytes: &str| {
            trytes
                .parse::<Hash>()
                .map_err(|source| WorkError::InvalidTips { tip, source })
        };
        Ok(Self {
            trunk: parse("trunk", trunk)?,
            branch: parse("branch", branch)?,
        })
    }
}

/// Attaches bundles with a [`WorkGenerator`], stamping attachment times
/// from a [`Clock`].
pub struct Attacher<C = SystemClock> {
    generator: WorkGenerator,
    clock: C,
}

impl Attacher<SystemClock> {
    pub fn new(generator: WorkGenerator) -> Self {
        Self {
            generator,
            clock: SystemClock,
        }
    }
}

impl<C: Clock> Attacher<C> {
    pub fn with_clock<D: Clock>(self, clock: D) -> Attacher<D> {
        Attacher {
            generator: self.generator,
            clock,
        }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Fills trunk, branch, attachment fields and nonce of every transaction.
    ///
    /// Runs from the last index down to the tail. The last transaction
    /// approves both tips; every earlier one approves the next transaction
    /// as trunk and the trunk tip as branch.
    pub fn attach(
        &self,
        bundle: Bundle,
        tips: &Tips,
        min_weight_magnitude: u8,
        cancel: &WorkCancel,
    ) -> Result<Bundle, WorkError> {
        if bundle.is_empty() {
            return Err(WorkError::EmptyBundle);
        }
        let mut transactions = bundle.into_transactions();
        let mut next: Option<Hash> = None;

        for tx in transactions.iter_mut().rev() {
            (tx.trunk, tx.branch) = match next {
                Some(hash) => (hash, tips.trunk),
                None => (tips.trunk, tips.branch),
            };
            if tx.tag.is_empty() {
                tx.tag = tx.obsolete_tag;
            }
            tx.attachment_timestamp = self.clock.now().as_millis() as i64;
            tx.attachment_timestamp_lower_bound = 0;
            tx.attachment_timestamp_upper_bound = MAX_TIMESTAMP;

            let mut trits = tx.to_trits()?;
            let nonce = self
                .generator
                .search(&trits, min_weight_magnitude, cancel)?;
            trits[layout::NONCE].copy_from_slice(nonce.as_trits());
            tx.nonce = nonce;

            let hash = curl_hash(&trits);
            tracing::debug!(index = tx.current_index, hash = %hash, "transaction attached");
            next = Some(hash);
        }

        let bundle = Bundle::new(transactions);
        if let Some(tail) = next {
            tracing::info!(tail = %tail, transactions = bundle.len(), "bundle attached");
        }
        Ok(bundle)
    }
}

/// Attaches with the global rayon pool and the system clock.
pub fn attach(
    bundle: Bundle,
    trunk: Hash,
    branch: Hash,
    min_weight_magnitude: u8,
    cancel: &WorkCancel,
) -> Result<Bundle, WorkError> {
    Attacher::new(WorkGenerator::default()).attach(
        bundle,
        &Tips::new(trunk, branch),
        min_weight_magnitude,
        cancel,
    )
}
